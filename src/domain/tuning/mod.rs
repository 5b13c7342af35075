// Gameplay tuning, split per concern. Numbers only; no behavior.

pub mod combat;
pub mod enemy;
pub mod level;
pub mod player;
pub mod survival;

pub use enemy::{EnemyKind, EnemyTypeTuning};
pub use level::{LevelTuning, difficulty_multiplier, level_scale, level_tuning};
pub use player::PlayerTuning;
pub use survival::SurvivalTuning;
