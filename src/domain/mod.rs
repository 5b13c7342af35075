// Domain layer: deterministic generation, collision, pathfinding and the
// per-tick simulation rules. No I/O and no async in this layer.

pub mod area;
pub mod collision;
pub mod map;
pub mod math;
pub mod noise;
pub mod path;
pub mod rng;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use math::Vec2;
pub use rng::SeededRandom;
