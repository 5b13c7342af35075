use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Normal,
    Runner,
    Brute,
    Thrower,
    Boss,
}

/// Base stats per enemy type before level scaling and per-instance jitter.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTypeTuning {
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Center of the headshot band.
    pub head_height: f32,
    /// Upper edge of the body hit band.
    pub body_height: f32,
    pub head_multiplier: f32,
    pub aggro_radius: f32,
    pub ranged: bool,
    pub throw_range: f32,
    pub throw_cooldown_ticks: u32,
    pub kill_score: u32,
}

impl EnemyKind {
    pub fn tuning(self) -> EnemyTypeTuning {
        match self {
            EnemyKind::Normal => EnemyTypeTuning {
                max_health: 30.0,
                speed: 2.0,
                damage: 10.0,
                head_height: 1.7,
                body_height: 1.9,
                head_multiplier: 2.0,
                aggro_radius: 18.0,
                ranged: false,
                throw_range: 0.0,
                throw_cooldown_ticks: 0,
                kill_score: 10,
            },
            EnemyKind::Runner => EnemyTypeTuning {
                max_health: 20.0,
                speed: 3.6,
                damage: 6.0,
                head_height: 1.6,
                body_height: 1.8,
                head_multiplier: 2.0,
                aggro_radius: 22.0,
                ranged: false,
                throw_range: 0.0,
                throw_cooldown_ticks: 0,
                kill_score: 10,
            },
            EnemyKind::Brute => EnemyTypeTuning {
                max_health: 90.0,
                speed: 1.3,
                damage: 22.0,
                head_height: 2.1,
                body_height: 2.4,
                head_multiplier: 1.5,
                aggro_radius: 16.0,
                ranged: false,
                throw_range: 0.0,
                throw_cooldown_ticks: 0,
                kill_score: 10,
            },
            EnemyKind::Thrower => EnemyTypeTuning {
                max_health: 25.0,
                speed: 1.8,
                damage: 12.0,
                head_height: 1.7,
                body_height: 1.9,
                head_multiplier: 2.0,
                aggro_radius: 24.0,
                ranged: true,
                throw_range: 18.0,
                throw_cooldown_ticks: 90,
                kill_score: 10,
            },
            EnemyKind::Boss => EnemyTypeTuning {
                max_health: 600.0,
                speed: 1.6,
                damage: 35.0,
                head_height: 2.4,
                body_height: 2.8,
                head_multiplier: 1.5,
                aggro_radius: 40.0,
                ranged: false,
                throw_range: 0.0,
                throw_cooldown_ticks: 0,
                // Boss kills are worth ten normal kills.
                kill_score: 100,
            },
        }
    }
}

/// Spawn weights for regular (non-boss) enemies.
pub const SPAWN_WEIGHTS: [(EnemyKind, f64); 4] = [
    (EnemyKind::Normal, 6.0),
    (EnemyKind::Runner, 2.0),
    (EnemyKind::Brute, 1.0),
    (EnemyKind::Thrower, 1.5),
];
