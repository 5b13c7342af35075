// Registry of running game instances. Owned by the orchestration layer and
// passed around explicitly; the core keeps no ambient global state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, RwLock, broadcast, mpsc, watch};
use tracing::info;

use crate::domain::area::AreaDefinition;
use crate::domain::map::MapGraph;
use crate::domain::state::PlayerId;
use crate::use_cases::game::{GameSimulation, world_task};
use crate::use_cases::types::{GameIntent, InstanceState, WorldUpdate};

/// Shared configuration for spawning game instances.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Capacity for inbound player intents.
    pub intent_channel_capacity: usize,
    /// Capacity for broadcast world snapshots.
    pub snapshot_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Ticks between pathfinding batch dispatches.
    pub path_batch_ticks: u64,
}

/// Errors returned by registry operations.
#[derive(Debug)]
pub enum GameError {
    /// Game id already exists and cannot be re-created.
    AlreadyExists,
}

/// Per-instance channels handed to the transport layer.
#[derive(Clone)]
pub struct GameHandle {
    /// Identifier clients use to target this instance.
    pub game_id: Arc<str>,
    /// Sender for player intents into the instance's world task.
    pub intent_tx: mpsc::Sender<GameIntent>,
    /// Broadcast sender for per-tick world snapshots.
    pub snapshot_tx: broadcast::Sender<WorldUpdate>,
    /// Watch sender for high-level instance state changes.
    pub state_tx: watch::Sender<InstanceState>,
    /// The static map, serialized once per client at join.
    pub map: Arc<MapGraph>,
    /// Signals the world task to stop and release its worker.
    shutdown: Arc<Notify>,
}

impl GameHandle {
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Thread-safe registry of active instances.
pub struct GameRegistry {
    settings: GameSettings,
    games: RwLock<HashMap<String, GameHandle>>,
}

impl GameRegistry {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            games: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new game instance and spawns its world task. The returned
    /// handle carries the initial map for the one-time static export.
    pub async fn create_game(
        &self,
        game_id: String,
        seed: u32,
        area: &AreaDefinition,
        roster: Vec<(PlayerId, String)>,
    ) -> Result<GameHandle, GameError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game_id) {
            return Err(GameError::AlreadyExists);
        }

        let sim = GameSimulation::new(
            &game_id,
            seed,
            area,
            &roster,
            self.settings.path_batch_ticks,
        );
        let map = sim.graph().clone();

        // Channel wiring for the instance's world loop.
        let (intent_tx, intent_rx) =
            mpsc::channel::<GameIntent>(self.settings.intent_channel_capacity);
        let (snapshot_tx, _snapshot_rx) =
            broadcast::channel::<WorldUpdate>(self.settings.snapshot_broadcast_capacity);
        let (state_tx, _state_rx) = watch::channel(InstanceState::Preparing);
        let shutdown = Arc::new(Notify::new());

        tokio::spawn(world_task(
            sim,
            intent_rx,
            snapshot_tx.clone(),
            state_tx.clone(),
            self.settings.tick_interval,
            shutdown.clone(),
        ));

        let handle = GameHandle {
            game_id: Arc::from(game_id.clone()),
            intent_tx,
            snapshot_tx,
            state_tx,
            map,
            shutdown,
        };
        games.insert(game_id.clone(), handle.clone());
        info!(game_id = %game_id, "game registered");
        Ok(handle)
    }

    pub async fn get_game(&self, game_id: &str) -> Option<GameHandle> {
        let games = self.games.read().await;
        games.get(game_id).cloned()
    }

    /// Stops the instance's world task (which drops the pathfinding worker
    /// and all pending requests) and forgets the handle.
    pub async fn remove_game(&self, game_id: &str) -> bool {
        let mut games = self.games.write().await;
        match games.remove(game_id) {
            Some(handle) => {
                handle.shutdown();
                info!(game_id = %game_id, "game removed");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GameSettings {
        GameSettings {
            intent_channel_capacity: 64,
            snapshot_broadcast_capacity: 16,
            tick_interval: Duration::from_millis(5),
            path_batch_ticks: 4,
        }
    }

    fn roster() -> Vec<(PlayerId, String)> {
        vec![("p1".to_string(), "Alice".to_string())]
    }

    #[tokio::test]
    async fn when_game_id_is_taken_then_create_fails() {
        let registry = GameRegistry::new(settings());
        let area = AreaDefinition::default();
        registry
            .create_game("g1".to_string(), 1, &area, roster())
            .await
            .expect("first create should succeed");
        let second = registry
            .create_game("g1".to_string(), 2, &area, roster())
            .await;
        assert!(matches!(second, Err(GameError::AlreadyExists)));
    }

    #[tokio::test]
    async fn when_game_is_removed_then_lookup_misses() {
        let registry = GameRegistry::new(settings());
        let area = AreaDefinition::default();
        registry
            .create_game("g2".to_string(), 7, &area, roster())
            .await
            .expect("create should succeed");
        assert!(registry.get_game("g2").await.is_some());
        assert!(registry.remove_game("g2").await);
        assert!(registry.get_game("g2").await.is_none());
        assert!(!registry.remove_game("g2").await);
    }

    #[tokio::test]
    async fn when_game_runs_then_snapshots_arrive() {
        let registry = GameRegistry::new(settings());
        let area = AreaDefinition::default();
        let handle = registry
            .create_game("g3".to_string(), 11, &area, roster())
            .await
            .expect("create should succeed");
        let mut snapshots = handle.snapshot_tx.subscribe();
        let update = tokio::time::timeout(Duration::from_secs(2), snapshots.recv())
            .await
            .expect("snapshot within deadline")
            .expect("broadcast open");
        assert!(update.tick >= 1);
        assert_eq!(update.players.len(), 1);
        registry.remove_game("g3").await;
    }
}
