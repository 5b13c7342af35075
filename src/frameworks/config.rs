use std::{env, time::Duration};

use crate::use_cases::GameSettings;

// Runtime constants (not gameplay tuning).

pub const INTENT_CHANNEL_CAPACITY: usize = 1024;
pub const SNAPSHOT_BROADCAST_CAPACITY: usize = 128;

/// 30 Hz authoritative tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 30);
/// Pathfinding requests batch up for this long before dispatch.
pub const PATH_BATCH_INTERVAL: Duration = Duration::from_millis(750);

pub fn path_batch_ticks() -> u64 {
    (PATH_BATCH_INTERVAL.as_millis() / TICK_INTERVAL.as_millis()).max(1) as u64
}

pub fn default_settings() -> GameSettings {
    GameSettings {
        intent_channel_capacity: INTENT_CHANNEL_CAPACITY,
        snapshot_broadcast_capacity: SNAPSHOT_BROADCAST_CAPACITY,
        tick_interval: TICK_INTERVAL,
        path_batch_ticks: path_batch_ticks(),
    }
}

/// Seed for the standalone headless run.
pub fn demo_seed() -> u32 {
    env::var("GAME_SIM_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1337)
}
