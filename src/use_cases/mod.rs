// Use cases layer: application workflows around the domain simulation.

pub mod game;
pub mod pathfinding;
pub mod registry;
pub mod types;

pub use game::GameSimulation;
pub use registry::{GameError, GameHandle, GameRegistry, GameSettings};
pub use types::{GameIntent, InstanceState, IntentOutcome, WorldUpdate};
