// All mutable simulation state for one game instance, owned exclusively by
// that instance's tick loop.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::domain::map::MapGraph;
use crate::domain::math::Vec2;
use crate::domain::rng::SeededRandom;
use crate::domain::state::{
    ChatMessage, GlassZoneState, LootContainerState, ObjectiveState, PickupKind, PlayerId,
    SimBullet, SimEnemy, SimPickup, SimPing, SimPlayer, SimProjectile,
};
use crate::domain::tuning::EnemyKind;
use crate::domain::area::LootKind;

/// Non-player causes of damage, for events and kill attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    Enemy,
    Projectile,
    Starvation,
    Freezing,
    Fire,
    SelfInflicted,
}

/// Discrete events produced during a tick, drained into the outbound
/// snapshot stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SimEvent {
    LevelUp {
        level: u32,
    },
    Kill {
        killer: PlayerId,
        enemy_kind: EnemyKind,
        /// Cosmetic line embedding the victim's generated identity.
        obituary: String,
        headshot: bool,
        score: u32,
    },
    BossSpawned {
        enemy_id: u64,
    },
    PickupCollected {
        player: PlayerId,
        kind: PickupKind,
    },
    ContainerLooted {
        player: PlayerId,
        container_id: String,
        loot: LootKind,
    },
    ObjectiveCollected {
        player: PlayerId,
        objective_id: String,
        remaining: u32,
    },
    EscapeActivated,
    GlassBroken {
        glass_id: String,
        player: PlayerId,
    },
    EnemyHit {
        enemy_id: u64,
        damage: f32,
        headshot: bool,
    },
    PlayerDamaged {
        player: PlayerId,
        damage: f32,
        source: DamageSource,
    },
    PlayerDowned {
        player: PlayerId,
    },
    PlayerRevived {
        player: PlayerId,
        by: PlayerId,
    },
    PingPlaced {
        player: PlayerId,
        position: Vec2,
    },
    EnemyAggro {
        enemy_id: u64,
    },
    PlayerEscaped {
        player: PlayerId,
    },
    GameOver {
        victory: bool,
    },
    Chat(ChatMessage),
}

pub struct WorldState {
    pub tick: u64,
    pub rng: SeededRandom,

    pub players: Vec<SimPlayer>,
    pub enemies: Vec<SimEnemy>,
    pub bullets: Vec<SimBullet>,
    pub projectiles: Vec<SimProjectile>,
    pub pickups: Vec<SimPickup>,
    pub pings: Vec<SimPing>,
    pub chat: VecDeque<ChatMessage>,

    pub container_states: HashMap<String, LootContainerState>,
    pub glass_states: HashMap<String, GlassZoneState>,
    pub objective_states: HashMap<String, ObjectiveState>,

    pub escape_active: bool,
    pub level: u32,
    pub total_kills: u32,
    pub boss_spawned: bool,
    pub boss_killed: bool,

    pub enemy_spawn_timer: u32,
    pub pickup_spawn_timer: u32,
    next_entity_id: u64,

    pub events: Vec<SimEvent>,
    /// Enemy ids removed this tick; the loop purges their path cache.
    pub departed_enemies: Vec<u64>,

    pub game_over: bool,
    pub victory: bool,
}

impl WorldState {
    /// Seeds the mutable world from the generated map and the lobby roster.
    /// Player colors and spawn slots are assigned in roster order.
    pub fn new(seed: u32, graph: &MapGraph, roster: &[(PlayerId, String)]) -> Self {
        // Offset stream so the simulation never replays map generation draws.
        let rng = SeededRandom::new(seed ^ 0x9E37_79B9);

        let colors = [
            "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0",
            "#f032e6",
        ];
        let players = roster
            .iter()
            .enumerate()
            .map(|(index, (id, name))| {
                let spawn = graph
                    .spawn_points
                    .get(index % graph.spawn_points.len().max(1))
                    .map(|point| point.position)
                    .unwrap_or(Vec2::ZERO);
                SimPlayer::new(
                    id.clone(),
                    name.clone(),
                    spawn,
                    colors[index % colors.len()].to_string(),
                )
            })
            .collect();

        let container_states = graph
            .loot_containers
            .iter()
            .map(|container| (container.id.clone(), LootContainerState::default()))
            .collect();
        let glass_states = graph
            .glass_zones
            .iter()
            .map(|zone| (zone.id.clone(), GlassZoneState::default()))
            .collect();
        let objective_states = graph
            .objectives
            .iter()
            .map(|objective| (objective.id.clone(), ObjectiveState::default()))
            .collect();

        Self {
            tick: 0,
            rng,
            players,
            enemies: Vec::new(),
            bullets: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            pings: Vec::new(),
            chat: VecDeque::new(),
            container_states,
            glass_states,
            objective_states,
            escape_active: false,
            level: 1,
            total_kills: 0,
            boss_spawned: false,
            boss_killed: false,
            enemy_spawn_timer: 0,
            pickup_spawn_timer: 0,
            next_entity_id: 1,
            events: Vec::new(),
            departed_enemies: Vec::new(),
            game_over: false,
            victory: false,
        }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn find_player(&self, id: &str) -> Option<&SimPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn find_player_mut(&mut self, id: &str) -> Option<&mut SimPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Nearest player that can still be targeted, with its distance.
    pub fn nearest_active_player(&self, from: Vec2) -> Option<(&SimPlayer, f32)> {
        self.players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| (p, p.position.distance_to(from)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
