// Shared helpers for simulation scenario tests.

use game_sim::domain::area::AreaDefinition;
use game_sim::domain::math::Vec2;
use game_sim::domain::state::{AiState, Identity, SimEnemy};
use game_sim::domain::tuning::EnemyKind;
use game_sim::use_cases::GameSimulation;

pub const PATH_BATCH_TICKS: u64 = 22;

pub fn new_sim(seed: u32, players: &[(&str, &str)]) -> GameSimulation {
    let area = AreaDefinition::default();
    let roster: Vec<(String, String)> = players
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();
    GameSimulation::new("test-game", seed, &area, &roster, PATH_BATCH_TICKS)
}

/// Drops an enemy with unscaled base stats directly into the world.
#[allow(dead_code)]
pub fn spawn_enemy_at(sim: &mut GameSimulation, kind: EnemyKind, position: Vec2) -> u64 {
    let base = kind.tuning();
    let world = sim.world_mut();
    let id = world.next_id();
    world.enemies.push(SimEnemy {
        id,
        kind,
        identity: Identity {
            name: "Test Subject".to_string(),
            age: 30,
            net_worth: 0,
        },
        position,
        rotation: 0.0,
        health: base.max_health,
        max_health: base.max_health,
        speed: base.speed,
        damage: base.damage,
        aggro: false,
        target: None,
        state: AiState::Idle,
        melee_cooldown: 0,
        throw_cooldown: 0,
        last_path_request_tick: None,
        patrol_target: None,
        stuck_counter: 0,
    });
    id
}

#[allow(dead_code)]
pub fn place_player(sim: &mut GameSimulation, player_id: &str, position: Vec2) {
    let player = sim
        .world_mut()
        .find_player_mut(player_id)
        .expect("player should exist");
    player.position = position;
}

/// A walkable position near `start` with clear line of sight from it, at a
/// comfortable bullet-test distance.
#[allow(dead_code)]
pub fn clear_spot_near(sim: &GameSimulation, start: Vec2) -> Vec2 {
    let offsets = [
        Vec2::new(2.0, 0.0),
        Vec2::new(-2.0, 0.0),
        Vec2::new(0.0, 2.0),
        Vec2::new(0.0, -2.0),
        Vec2::new(3.0, 0.0),
        Vec2::new(0.0, 3.0),
        Vec2::new(2.0, 2.0),
    ];
    for offset in offsets {
        let candidate = start + offset;
        let resolver = sim.resolver();
        if resolver.is_circle_walkable(candidate, 0.45)
            && resolver.has_line_of_sight(start, candidate)
        {
            return candidate;
        }
    }
    panic!("no clear spot near {start:?}");
}
