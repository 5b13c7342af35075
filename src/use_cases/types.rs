// Use-case level inputs/outputs for the game loop.

use std::collections::HashMap;

use crate::domain::area::LootKind;
use crate::domain::math::Vec2;
use crate::domain::state::{
    BulletSnapshot, ChatMessage, EnemySnapshot, GlassZoneState, LootContainerState, MoveInput,
    ObjectiveState, PickupSnapshot, PingSnapshot, PlayerId, PlayerSnapshot, ProjectileSnapshot,
    Weapon,
};
use crate::domain::world::SimEvent;

/// Inbound player intents, delivered by the transport layer one per
/// message and applied between ticks.
#[derive(Debug, Clone)]
pub enum GameIntent {
    Input {
        player_id: PlayerId,
        input: MoveInput,
    },
    Fire {
        player_id: PlayerId,
        origin: Vec2,
        height: f32,
        direction: Vec2,
        weapon: Weapon,
        damage: f32,
    },
    Melee {
        player_id: PlayerId,
        origin: Vec2,
        direction: Vec2,
        weapon: Weapon,
        damage: f32,
        range: f32,
    },
    DamageSelf {
        player_id: PlayerId,
        damage: f32,
        /// Free-form cause reported by the client, e.g. "fall" or "trap".
        source: String,
    },
    Revive {
        player_id: PlayerId,
        target_id: PlayerId,
    },
    CollectPickup {
        player_id: PlayerId,
        pickup_id: u64,
    },
    LootContainer {
        player_id: PlayerId,
        container_id: String,
    },
    CollectObjective {
        player_id: PlayerId,
        objective_id: String,
    },
    AttemptEscape {
        player_id: PlayerId,
    },
    BreakGlass {
        player_id: PlayerId,
        glass_id: String,
    },
    Chat {
        player_id: PlayerId,
        text: String,
    },
    Ping {
        player_id: PlayerId,
        position: Vec2,
    },
    Leave {
        player_id: PlayerId,
    },
}

/// What an intent did. Invalid requests land on `Rejected`, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Accepted,
    Rejected,
    /// Loot award; `LootKind::Nothing` is a legitimate empty find.
    Loot(LootKind),
    /// Enemy ids struck by a melee swing.
    MeleeHits(Vec<u64>),
}

/// High-level lifecycle of one game instance.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceState {
    Preparing,
    Running,
    Ended { victory: bool },
}

/// Full per-tick snapshot broadcast to the transport layer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WorldUpdate {
    pub tick: u64,
    pub level: u32,
    pub total_kills: u32,
    pub escape_active: bool,
    pub players: Vec<PlayerSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub pings: Vec<PingSnapshot>,
    pub container_states: HashMap<String, LootContainerState>,
    pub glass_states: HashMap<String, GlassZoneState>,
    pub objective_states: HashMap<String, ObjectiveState>,
    pub chat: Vec<ChatMessage>,
    /// Discrete events that happened during this tick.
    pub events: Vec<SimEvent>,
}
