// The authoritative simulation for one game instance, and the world task
// that drives it at a fixed tick rate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::info;

use crate::domain::area::AreaDefinition;
use crate::domain::collision::CollisionResolver;
use crate::domain::map::{MapGenerator, MapGraph};
use crate::domain::math::Vec2;
use crate::domain::path::PathPlanner;
use crate::domain::state::{ChatMessage, DamageOutcome, MoveInput, PlayerId, SimPing};
use crate::domain::systems::{combat, enemy_ai, objectives, spawning, survival};
use crate::domain::tuning::PlayerTuning;
use crate::domain::tuning::combat::{BULLET_SPEED, CHAT_LOG_CAP, CHAT_MAX_LEN, TICK_DT};
use crate::domain::world::{DamageSource, SimEvent, WorldState};
use crate::use_cases::pathfinding::PathfindingService;
use crate::use_cases::types::{GameIntent, InstanceState, IntentOutcome, WorldUpdate};

pub struct GameSimulation {
    game_id: String,
    graph: Arc<MapGraph>,
    resolver: CollisionResolver,
    pathfinder: PathfindingService,
    world: WorldState,
}

impl GameSimulation {
    /// Generates the map, seeds the world from the roster and spawns the
    /// instance's pathfinding worker. Must run inside a tokio runtime.
    pub fn new(
        game_id: &str,
        seed: u32,
        area: &AreaDefinition,
        roster: &[(PlayerId, String)],
        path_batch_ticks: u64,
    ) -> Self {
        let generated = MapGenerator::generate(seed, area);
        let grid = Arc::new(generated.grid);
        let graph = Arc::new(generated.graph);
        let world = WorldState::new(seed, &graph, roster);
        info!(
            game_id,
            seed,
            players = roster.len(),
            buildings = graph.buildings.len(),
            "game instance created"
        );
        Self {
            game_id: game_id.to_string(),
            resolver: CollisionResolver::new(grid.clone()),
            pathfinder: PathfindingService::spawn(grid, path_batch_ticks),
            graph,
            world,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// The immutable map, shared with the transport layer for the one-time
    /// static export.
    pub fn graph(&self) -> &Arc<MapGraph> {
        &self.graph
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn is_over(&self) -> bool {
        self.world.game_over
    }

    pub fn victory(&self) -> bool {
        self.world.victory
    }

    /// Advances the simulation one frame in the fixed step order and
    /// returns the resulting snapshot.
    pub fn tick(&mut self) -> WorldUpdate {
        self.world.tick += 1;

        spawning::tick_enemy_spawns(&mut self.world, &self.graph, &self.resolver);
        spawning::tick_boss_spawn(&mut self.world, &self.graph, &self.resolver);
        spawning::tick_pickup_spawns(&mut self.world, &self.graph, &self.resolver);

        self.pathfinder.maybe_flush(self.world.tick);
        self.pathfinder.poll_results();

        enemy_ai::tick_enemies(
            &mut self.world,
            self.graph.bounds,
            &self.resolver,
            &mut self.pathfinder,
        );
        combat::tick_bullets(&mut self.world, &self.resolver);
        combat::tick_projectiles(&mut self.world, &self.resolver);
        survival::tick_survival(&mut self.world, &self.graph);
        survival::tick_downed(&mut self.world);
        objectives::tick_objectives(&mut self.world);
        objectives::tick_progression(&mut self.world);

        // Dead enemies lose their cached paths in the same tick.
        let departed: Vec<u64> = self.world.departed_enemies.drain(..).collect();
        for enemy_id in departed {
            self.pathfinder.forget(enemy_id);
        }

        self.snapshot()
    }

    /// Builds the outbound snapshot, draining this tick's events.
    pub fn snapshot(&mut self) -> WorldUpdate {
        WorldUpdate {
            tick: self.world.tick,
            level: self.world.level,
            total_kills: self.world.total_kills,
            escape_active: self.world.escape_active,
            players: self.world.players.iter().map(Into::into).collect(),
            enemies: self.world.enemies.iter().map(Into::into).collect(),
            bullets: self.world.bullets.iter().map(Into::into).collect(),
            projectiles: self.world.projectiles.iter().map(Into::into).collect(),
            pickups: self.world.pickups.iter().map(Into::into).collect(),
            pings: self.world.pings.iter().map(Into::into).collect(),
            container_states: self.world.container_states.clone(),
            glass_states: self.world.glass_states.clone(),
            objective_states: self.world.objective_states.clone(),
            chat: self.world.chat.iter().cloned().collect(),
            events: std::mem::take(&mut self.world.events),
        }
    }

    /// Applies a single inbound intent. Invalid requests are no-ops with a
    /// `Rejected` outcome; nothing here can panic the loop.
    pub fn apply_intent(&mut self, intent: GameIntent) -> IntentOutcome {
        match intent {
            GameIntent::Input { player_id, input } => self.apply_input(&player_id, input),
            GameIntent::Fire {
                player_id,
                origin,
                height,
                direction,
                weapon,
                damage,
            } => {
                let origin = self.graph.bounds.clamp(origin);
                let accepted = combat::fire_bullet(
                    &mut self.world,
                    &player_id,
                    origin,
                    height,
                    direction,
                    weapon,
                    damage,
                    BULLET_SPEED,
                );
                if accepted {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::Melee {
                player_id,
                origin,
                direction,
                weapon,
                damage,
                range,
            } => {
                let can_attack = self
                    .world
                    .find_player(&player_id)
                    .is_some_and(|player| player.is_active());
                if !can_attack {
                    return IntentOutcome::Rejected;
                }
                let origin = self.graph.bounds.clamp(origin);
                let hits = combat::resolve_melee(
                    &mut self.world,
                    &player_id,
                    origin,
                    direction,
                    weapon,
                    damage,
                    range,
                );
                IntentOutcome::MeleeHits(hits)
            }
            GameIntent::DamageSelf {
                player_id,
                damage,
                source,
            } => {
                let damage = damage.max(0.0);
                let Some(player) = self.world.find_player_mut(&player_id) else {
                    return IntentOutcome::Rejected;
                };
                let outcome = player.apply_damage(damage);
                if outcome == DamageOutcome::None {
                    return IntentOutcome::Rejected;
                }
                tracing::debug!(player_id = %player_id, damage, source = %source, "self damage");
                self.world.push_event(SimEvent::PlayerDamaged {
                    player: player_id.clone(),
                    damage,
                    source: DamageSource::SelfInflicted,
                });
                if outcome == DamageOutcome::Downed {
                    self.world
                        .push_event(SimEvent::PlayerDowned { player: player_id });
                }
                IntentOutcome::Accepted
            }
            GameIntent::Revive {
                player_id,
                target_id,
            } => {
                if survival::revive_player(&mut self.world, &player_id, &target_id) {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::CollectPickup {
                player_id,
                pickup_id,
            } => {
                if objectives::collect_pickup(&mut self.world, &player_id, pickup_id) {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::LootContainer {
                player_id,
                container_id,
            } => {
                match objectives::loot_container(
                    &mut self.world,
                    &self.graph,
                    &player_id,
                    &container_id,
                ) {
                    Some(loot) => IntentOutcome::Loot(loot),
                    None => IntentOutcome::Rejected,
                }
            }
            GameIntent::CollectObjective {
                player_id,
                objective_id,
            } => {
                if objectives::collect_objective(
                    &mut self.world,
                    &self.graph,
                    &player_id,
                    &objective_id,
                ) {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::AttemptEscape { player_id } => {
                if objectives::attempt_escape(&mut self.world, &self.graph, &player_id) {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::BreakGlass {
                player_id,
                glass_id,
            } => {
                if objectives::break_glass(&mut self.world, &self.graph, &player_id, &glass_id) {
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
            GameIntent::Chat { player_id, text } => self.apply_chat(&player_id, &text),
            GameIntent::Ping {
                player_id,
                position,
            } => {
                if self.world.find_player(&player_id).is_none() {
                    return IntentOutcome::Rejected;
                }
                let position = self.graph.bounds.clamp(position);
                let id = self.world.next_id();
                let created_tick = self.world.tick;
                self.world.pings.push(SimPing {
                    id,
                    player: player_id.clone(),
                    position,
                    created_tick,
                });
                self.world.push_event(SimEvent::PingPlaced {
                    player: player_id,
                    position,
                });
                IntentOutcome::Accepted
            }
            GameIntent::Leave { player_id } => {
                let before = self.world.players.len();
                self.world.players.retain(|player| player.id != player_id);
                if self.world.players.len() < before {
                    info!(player_id = %player_id, "player left");
                    IntentOutcome::Accepted
                } else {
                    IntentOutcome::Rejected
                }
            }
        }
    }

    /// Movement and rotation. Malformed values are rejected, out-of-bounds
    /// destinations clamp to the map rather than erroring.
    fn apply_input(&mut self, player_id: &str, input: MoveInput) -> IntentOutcome {
        if !(input.dx.is_finite()
            && input.dz.is_finite()
            && input.yaw.is_finite()
            && input.pitch.is_finite())
        {
            return IntentOutcome::Rejected;
        }
        let Some(index) = self
            .world
            .players
            .iter()
            .position(|player| player.id == player_id)
        else {
            return IntentOutcome::Rejected;
        };
        if !self.world.players[index].is_active() {
            return IntentOutcome::Rejected;
        }

        let tuning = PlayerTuning::default();
        let mut direction = Vec2::new(input.dx.clamp(-1.0, 1.0), input.dz.clamp(-1.0, 1.0));
        if direction.length() > 1.0 {
            direction = direction.normalized();
        }
        // Exhausted players shamble.
        let fatigue = if self.world.players[index].energy <= 0.0 {
            0.6
        } else {
            1.0
        };

        let current = self.world.players[index].position;
        let desired = self
            .graph
            .bounds
            .clamp(current + direction.scaled(tuning.move_speed * fatigue * TICK_DT));
        let resolved = self
            .resolver
            .move_with_collision(current, desired, tuning.radius);

        let player = &mut self.world.players[index];
        player.position = resolved;
        player.yaw = input.yaw;
        player.pitch = input.pitch;
        player.last_input = input;
        IntentOutcome::Accepted
    }

    fn apply_chat(&mut self, player_id: &str, text: &str) -> IntentOutcome {
        let trimmed: String = text.trim().chars().take(CHAT_MAX_LEN).collect();
        if trimmed.is_empty() {
            return IntentOutcome::Rejected;
        }
        let Some(player) = self.world.find_player(player_id) else {
            return IntentOutcome::Rejected;
        };
        let message = ChatMessage {
            player: player.id.clone(),
            name: player.name.clone(),
            text: trimmed,
            tick: self.world.tick,
        };
        self.world.chat.push_back(message.clone());
        while self.world.chat.len() > CHAT_LOG_CAP {
            self.world.chat.pop_front();
        }
        self.world.push_event(SimEvent::Chat(message));
        IntentOutcome::Accepted
    }
}

/// Drives one game instance at the fixed tick rate until shutdown or game
/// over. Inbound intents drain at the top of every frame.
pub async fn world_task(
    mut sim: GameSimulation,
    mut intent_rx: mpsc::Receiver<GameIntent>,
    snapshot_tx: broadcast::Sender<WorldUpdate>,
    state_tx: watch::Sender<InstanceState>,
    tick_interval: Duration,
    shutdown: Arc<tokio::sync::Notify>,
) {
    let _ = state_tx.send(InstanceState::Running);
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(game_id = %sim.game_id(), "game instance shut down");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(intent) = intent_rx.try_recv() {
            let _ = sim.apply_intent(intent);
        }

        let update = sim.tick();
        let _ = snapshot_tx.send(update);

        if sim.is_over() {
            let _ = state_tx.send(InstanceState::Ended {
                victory: sim.victory(),
            });
            info!(game_id = %sim.game_id(), victory = sim.victory(), "match ended");
            break;
        }
    }
}
