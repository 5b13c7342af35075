/// Per-level progression table. `kill_target` is the running kill total
/// needed to leave the level; milestone levels also require the boss cycle.
#[derive(Debug, Clone, Copy)]
pub struct LevelTuning {
    pub kill_target: u32,
    pub max_enemies: u32,
    pub enemy_spawn_interval_ticks: u32,
    pub milestone: bool,
    /// Kill total at which the milestone boss appears.
    pub boss_trigger_kills: u32,
}

const LEVELS: [LevelTuning; 10] = [
    LevelTuning {
        kill_target: 5,
        max_enemies: 8,
        enemy_spawn_interval_ticks: 90,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 12,
        max_enemies: 10,
        enemy_spawn_interval_ticks: 80,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 20,
        max_enemies: 12,
        enemy_spawn_interval_ticks: 75,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 30,
        max_enemies: 14,
        enemy_spawn_interval_ticks: 70,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 45,
        max_enemies: 16,
        enemy_spawn_interval_ticks: 65,
        milestone: true,
        boss_trigger_kills: 35,
    },
    LevelTuning {
        kill_target: 60,
        max_enemies: 16,
        enemy_spawn_interval_ticks: 60,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 80,
        max_enemies: 18,
        enemy_spawn_interval_ticks: 55,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 100,
        max_enemies: 20,
        enemy_spawn_interval_ticks: 50,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 125,
        max_enemies: 22,
        enemy_spawn_interval_ticks: 45,
        milestone: false,
        boss_trigger_kills: 0,
    },
    LevelTuning {
        kill_target: 150,
        max_enemies: 24,
        enemy_spawn_interval_ticks: 40,
        milestone: true,
        boss_trigger_kills: 135,
    },
];

/// Levels are 1-based; levels past the table reuse the final row.
pub fn level_tuning(level: u32) -> &'static LevelTuning {
    let index = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[index]
}

/// Multiplicative enemy stat growth per level.
const LEVEL_STAT_GROWTH: f32 = 0.12;

pub fn level_scale(level: u32) -> f32 {
    1.0 + (level.max(1) - 1) as f32 * LEVEL_STAT_GROWTH
}

/// Spawn pressure grows with the lobby size.
pub fn difficulty_multiplier(player_count: usize) -> f32 {
    1.0 + (player_count.max(1) - 1) as f32 * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_clamps_out_of_range_levels() {
        assert_eq!(level_tuning(0).kill_target, level_tuning(1).kill_target);
        assert_eq!(level_tuning(99).kill_target, 150);
    }

    #[test]
    fn kill_targets_are_strictly_increasing() {
        for level in 1..10 {
            assert!(level_tuning(level).kill_target < level_tuning(level + 1).kill_target);
        }
    }

    #[test]
    fn difficulty_scales_with_player_count() {
        assert_eq!(difficulty_multiplier(1), 1.0);
        assert!((difficulty_multiplier(3) - 1.6).abs() < 1e-6);
    }
}
