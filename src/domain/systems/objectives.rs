// Loot, objectives, escape and level progression. All invalid requests are
// no-ops returning a failure indicator; nothing in here can abort a tick.

use tracing::info;

use crate::domain::area::LootKind;
use crate::domain::map::MapGraph;
use crate::domain::state::{PickupKind, Weapon};
use crate::domain::tuning::combat::{GLASS_AGGRO_RADIUS, PING_TTL_TICKS};
use crate::domain::tuning::level_tuning;
use crate::domain::world::{SimEvent, WorldState};

/// Maximum reach for collecting pickups, containers and objectives.
const INTERACT_RANGE: f32 = 2.5;

pub fn collect_pickup(world: &mut WorldState, player_id: &str, pickup_id: u64) -> bool {
    let Some(index) = world.pickups.iter().position(|p| p.id == pickup_id) else {
        return false;
    };
    let position = world.pickups[index].position;
    let kind = world.pickups[index].kind;

    let Some(player) = world.find_player_mut(player_id) else {
        return false;
    };
    if !player.is_active() || player.position.distance_to(position) > INTERACT_RANGE {
        return false;
    }

    match kind {
        PickupKind::Food => player.hunger = (player.hunger + 40.0).clamp(0.0, 100.0),
        PickupKind::Ammo => player.ammo += 30,
        PickupKind::Medkit => player.heal(50.0),
        PickupKind::Energy => player.energy = (player.energy + 40.0).clamp(0.0, 100.0),
    }

    world.pickups.remove(index);
    world.push_event(SimEvent::PickupCollected {
        player: player_id.to_string(),
        kind,
    });
    true
}

/// Opens a container. `None` means the request was invalid or the container
/// was already looted; `Some(LootKind::Nothing)` is a valid empty find.
pub fn loot_container(
    world: &mut WorldState,
    graph: &MapGraph,
    player_id: &str,
    container_id: &str,
) -> Option<LootKind> {
    let container = graph
        .loot_containers
        .iter()
        .find(|container| container.id == container_id)?;

    let reachable = world
        .find_player(player_id)
        .is_some_and(|player| {
            player.is_active()
                && player.position.distance_to(container.position) <= INTERACT_RANGE
        });
    if !reachable {
        return None;
    }

    let state = world.container_states.get_mut(container_id)?;
    if state.looted {
        return None;
    }
    state.looted = true;

    let payload = container.payload;
    if let Some(player) = world.find_player_mut(player_id) {
        match payload {
            LootKind::Food => player.hunger = (player.hunger + 40.0).clamp(0.0, 100.0),
            LootKind::Ammo => player.ammo += 20,
            LootKind::Medkit => player.heal(50.0),
            LootKind::Weapon => {
                player.weapons[1] = Weapon::Shotgun;
                player.ammo += 12;
            }
            LootKind::Warmth => player.warmth = (player.warmth + 40.0).clamp(0.0, 100.0),
            LootKind::Nothing => {}
        }
    }

    world.push_event(SimEvent::ContainerLooted {
        player: player_id.to_string(),
        container_id: container_id.to_string(),
        loot: payload,
    });
    Some(payload)
}

pub fn collect_objective(
    world: &mut WorldState,
    graph: &MapGraph,
    player_id: &str,
    objective_id: &str,
) -> bool {
    let Some(objective) = graph
        .objectives
        .iter()
        .find(|objective| objective.id == objective_id)
    else {
        return false;
    };
    let reachable = world
        .find_player(player_id)
        .is_some_and(|player| {
            player.is_active()
                && player.position.distance_to(objective.position) <= INTERACT_RANGE
        });
    if !reachable {
        return false;
    }

    let Some(state) = world.objective_states.get_mut(objective_id) else {
        return false;
    };
    if state.collected {
        return false;
    }
    state.collected = true;

    let remaining = world
        .objective_states
        .values()
        .filter(|state| !state.collected)
        .count() as u32;
    world.push_event(SimEvent::ObjectiveCollected {
        player: player_id.to_string(),
        objective_id: objective_id.to_string(),
        remaining,
    });
    info!(player_id = %player_id, objective_id = %objective_id, remaining, "objective collected");
    true
}

/// Succeeds only inside the active escape zone.
pub fn attempt_escape(world: &mut WorldState, graph: &MapGraph, player_id: &str) -> bool {
    if !world.escape_active {
        return false;
    }
    let zone = &graph.escape_zone;
    let Some(player) = world.find_player_mut(player_id) else {
        return false;
    };
    if !player.is_active() || player.position.distance_to(zone.position) > zone.radius {
        return false;
    }
    player.escaped = true;
    world.push_event(SimEvent::PlayerEscaped {
        player: player_id.to_string(),
    });
    info!(player_id = %player_id, "player escaped");
    true
}

/// Marks glass broken and wakes every enemy in earshot onto the breaker.
pub fn break_glass(
    world: &mut WorldState,
    graph: &MapGraph,
    player_id: &str,
    glass_id: &str,
) -> bool {
    let Some(zone) = graph.glass_zones.iter().find(|zone| zone.id == glass_id) else {
        return false;
    };
    let Some(state) = world.glass_states.get_mut(glass_id) else {
        return false;
    };
    if state.broken {
        return false;
    }
    state.broken = true;

    let center = zone.rect.center;
    let mut woken = Vec::new();
    for enemy in &mut world.enemies {
        if enemy.position.distance_to(center) <= GLASS_AGGRO_RADIUS && !enemy.aggro {
            enemy.aggro = true;
            enemy.target = Some(player_id.to_string());
            woken.push(enemy.id);
        }
    }
    for enemy_id in woken {
        world.push_event(SimEvent::EnemyAggro { enemy_id });
    }
    world.push_event(SimEvent::GlassBroken {
        glass_id: glass_id.to_string(),
        player: player_id.to_string(),
    });
    true
}

/// Step 10-11 of the tick: one-shot escape activation, cosmetic pickup
/// spin and stale ping pruning.
pub fn tick_objectives(world: &mut WorldState) {
    if !world.escape_active
        && !world.objective_states.is_empty()
        && world.objective_states.values().all(|state| state.collected)
    {
        world.escape_active = true;
        world.push_event(SimEvent::EscapeActivated);
        info!("all objectives collected, escape zone active");
    }

    for pickup in &mut world.pickups {
        pickup.rotation = (pickup.rotation + 2.0) % 360.0;
    }

    let now = world.tick;
    world
        .pings
        .retain(|ping| now.saturating_sub(ping.created_tick) < PING_TTL_TICKS as u64);
}

/// Step 12 of the tick: level advancement and end-of-game detection.
pub fn tick_progression(world: &mut WorldState) {
    let tuning = level_tuning(world.level);
    let boss_cycle_done = !tuning.milestone || (world.boss_spawned && world.boss_killed);
    if world.total_kills >= tuning.kill_target && boss_cycle_done {
        world.level += 1;
        world.boss_spawned = false;
        world.boss_killed = false;
        world.push_event(SimEvent::LevelUp { level: world.level });
        info!(level = world.level, kills = world.total_kills, "level up");
    }

    if world.game_over || world.players.is_empty() {
        return;
    }
    let all_settled = world
        .players
        .iter()
        .all(|player| !player.alive || player.escaped);
    if !all_settled {
        return;
    }
    world.game_over = true;
    world.victory = world.players.iter().any(|player| player.escaped);
    world.push_event(SimEvent::GameOver {
        victory: world.victory,
    });
    info!(victory = world.victory, "game over");
}
