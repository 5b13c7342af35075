// Enemy, boss and pickup spawners. All rates come from the level table
// scaled by the lobby-size difficulty multiplier.

use tracing::debug;

use crate::domain::collision::CollisionResolver;
use crate::domain::map::MapGraph;
use crate::domain::math::Vec2;
use crate::domain::state::{AiState, Identity, PickupKind, SimEnemy, SimPickup};
use crate::domain::tuning::combat::{
    ENEMY_SPEED_JITTER, PICKUP_SPAWN_BASE_TICKS, PICKUP_SPAWN_PER_LEVEL_TICKS,
    PICKUPS_PER_PLAYER,
};
use crate::domain::tuning::enemy::SPAWN_WEIGHTS;
use crate::domain::tuning::{EnemyKind, difficulty_multiplier, level_scale, level_tuning};
use crate::domain::world::{SimEvent, WorldState};

const GIVEN_NAMES: [&str; 24] = [
    "Mara", "Otis", "Priya", "Len", "Sasha", "Hugo", "Wren", "Felix", "Ida", "Nilo", "Greta",
    "Omar", "Tess", "Viggo", "Rhea", "Cole", "Anya", "Bram", "Sufia", "Dex", "Lotte", "Ivo",
    "Nadia", "Pax",
];

const FAMILY_NAMES: [&str; 20] = [
    "Okafor", "Lindqvist", "Moreau", "Tanaka", "Petrov", "Alvarez", "Nguyen", "Kowalski",
    "Hassan", "Berg", "Costa", "Novak", "Ito", "Fischer", "Reyes", "Dubois", "Larsen", "Singh",
    "Vargas", "Chen",
];

impl WorldState {
    /// Deterministic cosmetic backstory for a freshly spawned enemy.
    fn roll_identity(&mut self) -> Identity {
        let given = self.rng.pick(&GIVEN_NAMES).copied().unwrap_or("Sam");
        let family = self.rng.pick(&FAMILY_NAMES).copied().unwrap_or("Doe");
        let age = self.rng.int(19, 72) as u32;
        let net_worth = self.rng.gaussian(45_000.0, 60_000.0).abs() as u32;
        Identity {
            name: format!("{given} {family}"),
            age,
            net_worth,
        }
    }
}

/// Step 1 of the tick: maybe add one regular enemy.
pub fn tick_enemy_spawns(
    world: &mut WorldState,
    graph: &MapGraph,
    resolver: &CollisionResolver,
) {
    let tuning = level_tuning(world.level);
    let difficulty = difficulty_multiplier(world.players.len());
    let cap = (tuning.max_enemies as f32 * difficulty) as usize;
    // The boss occupies a slot of its own on top of the regular cap.
    let regular = world
        .enemies
        .iter()
        .filter(|e| e.kind != EnemyKind::Boss)
        .count();
    if regular >= cap {
        return;
    }

    world.enemy_spawn_timer += 1;
    let interval = (tuning.enemy_spawn_interval_ticks as f32 / difficulty) as u32;
    if world.enemy_spawn_timer < interval.max(1) {
        return;
    }
    world.enemy_spawn_timer = 0;

    let Some(&kind) = world.rng.pick_weighted(&SPAWN_WEIGHTS) else {
        return;
    };
    let _ = spawn_enemy(world, graph, resolver, kind);
}

/// Step 2: milestone boss, once per milestone level past the trigger.
pub fn tick_boss_spawn(world: &mut WorldState, graph: &MapGraph, resolver: &CollisionResolver) {
    let tuning = level_tuning(world.level);
    if !tuning.milestone || world.boss_spawned {
        return;
    }
    if world.total_kills < tuning.boss_trigger_kills {
        return;
    }
    if let Some(id) = spawn_enemy(world, graph, resolver, EnemyKind::Boss) {
        world.boss_spawned = true;
        world.push_event(SimEvent::BossSpawned { enemy_id: id });
        debug!(enemy_id = id, level = world.level, "boss spawned");
    }
}

fn spawn_enemy(
    world: &mut WorldState,
    graph: &MapGraph,
    resolver: &CollisionResolver,
    kind: EnemyKind,
) -> Option<u64> {
    let zone = world.rng.pick(&graph.enemy_spawn_zones).copied()?;
    let jitter = Vec2::new(world.rng.float(-3.0, 3.0), world.rng.float(-3.0, 3.0));
    let position = resolver.find_nearest_walkable(graph.bounds.clamp(zone + jitter), 6.0)?;

    let base = kind.tuning();
    let scale = level_scale(world.level);
    let speed_jitter =
        1.0 + world.rng.float(-ENEMY_SPEED_JITTER, ENEMY_SPEED_JITTER);
    let identity = world.roll_identity();
    let id = world.next_id();
    world.enemies.push(SimEnemy {
        id,
        kind,
        identity,
        position,
        rotation: 0.0,
        health: base.max_health * scale,
        max_health: base.max_health * scale,
        speed: base.speed * scale * speed_jitter,
        damage: base.damage * scale,
        aggro: false,
        target: None,
        state: AiState::Idle,
        melee_cooldown: 0,
        throw_cooldown: 0,
        last_path_request_tick: None,
        patrol_target: None,
        stuck_counter: 0,
    });
    Some(id)
}

/// Step 3: periodic supply drops, slower at higher levels.
pub fn tick_pickup_spawns(
    world: &mut WorldState,
    graph: &MapGraph,
    resolver: &CollisionResolver,
) {
    let cap = PICKUPS_PER_PLAYER * world.players.len().max(1);
    if world.pickups.len() >= cap {
        return;
    }
    world.pickup_spawn_timer += 1;
    let interval =
        PICKUP_SPAWN_BASE_TICKS + PICKUP_SPAWN_PER_LEVEL_TICKS * (world.level - 1);
    if world.pickup_spawn_timer < interval {
        return;
    }
    world.pickup_spawn_timer = 0;

    const KINDS: [(PickupKind, f64); 4] = [
        (PickupKind::Food, 3.0),
        (PickupKind::Ammo, 3.0),
        (PickupKind::Medkit, 1.5),
        (PickupKind::Energy, 2.0),
    ];
    let Some(&kind) = world.rng.pick_weighted(&KINDS) else {
        return;
    };

    for _ in 0..20 {
        let half = graph.bounds.width() / 2.0 - 5.0;
        let candidate = Vec2::new(
            world.rng.float(-half, half),
            world.rng.float(-half, half),
        );
        if !resolver.is_walkable(candidate) {
            continue;
        }
        let id = world.next_id();
        world.pickups.push(SimPickup {
            id,
            kind,
            position: candidate,
            rotation: 0.0,
        });
        break;
    }
}

/// Drops a death reward at the given position, used by combat resolution.
pub fn drop_death_pickup(world: &mut WorldState, position: Vec2) {
    const DROPS: [(PickupKind, f64); 3] = [
        (PickupKind::Ammo, 4.0),
        (PickupKind::Food, 2.0),
        (PickupKind::Medkit, 1.0),
    ];
    let Some(&kind) = world.rng.pick_weighted(&DROPS) else {
        return;
    };
    let id = world.next_id();
    world.pickups.push(SimPickup {
        id,
        kind,
        position,
        rotation: 0.0,
    });
}
