// Per-tick systems. Each one is a plain function over the world state so
// the loop controls ordering explicitly.

pub mod combat;
pub mod enemy_ai;
pub mod objectives;
pub mod spawning;
pub mod survival;
