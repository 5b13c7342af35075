// Enemy behavior state machine. Transition priority per tick: no target ->
// idle; ranged attack window; direct chase on sight; otherwise the
// pathfinding branch with patrol/wait fallbacks.

use crate::domain::collision::CollisionResolver;
use crate::domain::map::MapBounds;
use crate::domain::math::Vec2;
use crate::domain::path::{PathPlanner, PathQuery};
use crate::domain::state::{AiState, DamageOutcome, SimEnemy, SimProjectile};
use crate::domain::tuning::combat::{
    ENEMY_BACKOFF_RANGE, ENEMY_CHASE_RANGE, ENEMY_MELEE_COOLDOWN_TICKS, ENEMY_MELEE_RANGE,
    ENEMY_RADIUS, PATH_REFRESH_TICKS, PATROL_RADIUS, PATROL_REFRESH_CHANCE,
    PROJECTILE_LAUNCH_HEIGHT, PROJECTILE_SPEED, PROJECTILE_TTL_TICKS, STUCK_FRACTION, TICK_DT,
};
use crate::domain::world::{DamageSource, SimEvent, WorldState};

/// Step 5 of the tick: advance every enemy one step of its state machine.
pub fn tick_enemies(
    world: &mut WorldState,
    bounds: MapBounds,
    resolver: &CollisionResolver,
    planner: &mut dyn PathPlanner,
) {
    // Enemies leave the world while we walk them so the rest of the state
    // stays mutably reachable.
    let mut enemies = std::mem::take(&mut world.enemies);

    for enemy in &mut enemies {
        enemy.melee_cooldown = enemy.melee_cooldown.saturating_sub(1);
        enemy.throw_cooldown = enemy.throw_cooldown.saturating_sub(1);

        let Some(target_pos) = resolve_target(world, enemy) else {
            enemy.state = AiState::Idle;
            continue;
        };

        let to_target = target_pos - enemy.position;
        let distance = to_target.length();
        enemy.rotation = to_target.z.atan2(to_target.x);

        let tuning = enemy.kind.tuning();
        let sees_target = resolver.has_line_of_sight(enemy.position, target_pos);

        if tuning.ranged && sees_target && distance <= tuning.throw_range {
            enemy.state = AiState::Attacking;
            if distance < ENEMY_BACKOFF_RANGE {
                let away = to_target.normalized().scaled(-1.0);
                attempt_move(enemy, away, enemy.speed * 0.5, resolver);
            }
            if enemy.throw_cooldown == 0 {
                throw_projectile(world, enemy, target_pos);
                enemy.throw_cooldown = tuning.throw_cooldown_ticks;
            }
        } else if sees_target && distance <= ENEMY_CHASE_RANGE {
            enemy.state = AiState::Chasing;
            attempt_move(enemy, to_target.normalized(), enemy.speed, resolver);
        } else {
            pursue_via_path(world, enemy, target_pos, bounds, resolver, planner, tuning.ranged);
        }

        if !tuning.ranged && distance <= ENEMY_MELEE_RANGE && enemy.melee_cooldown == 0 {
            strike_target(world, enemy);
            enemy.melee_cooldown = ENEMY_MELEE_COOLDOWN_TICKS;
        }
    }

    world.enemies = enemies;
}

/// Validates the current weak target reference or acquires a new one. A
/// lookup miss is simply "no target"; disturbed (aggro) enemies hunt the
/// nearest player regardless of radius.
fn resolve_target(world: &mut WorldState, enemy: &mut SimEnemy) -> Option<Vec2> {
    if let Some(target_id) = &enemy.target {
        if let Some(player) = world.find_player(target_id) {
            if player.is_active() {
                return Some(player.position);
            }
        }
        enemy.target = None;
    }

    let (candidate_id, candidate_pos, candidate_distance) = {
        let (player, distance) = world.nearest_active_player(enemy.position)?;
        (player.id.clone(), player.position, distance)
    };
    if !enemy.aggro && candidate_distance > enemy.kind.tuning().aggro_radius {
        return None;
    }
    if !enemy.aggro {
        enemy.aggro = true;
        world.push_event(SimEvent::EnemyAggro { enemy_id: enemy.id });
    }
    enemy.target = Some(candidate_id);
    Some(candidate_pos)
}

/// Moves through the collision resolver and tracks the stuck counter.
fn attempt_move(enemy: &mut SimEnemy, direction: Vec2, speed: f32, resolver: &CollisionResolver) {
    let desired = enemy.position + direction.scaled(speed * TICK_DT);
    let resolved = resolver.move_with_collision(enemy.position, desired, ENEMY_RADIUS);
    let attempted = desired.distance_to(enemy.position);
    let actual = resolved.distance_to(enemy.position);
    if attempted > 1e-4 && actual < attempted * STUCK_FRACTION {
        enemy.stuck_counter += 1;
    } else {
        enemy.stuck_counter = 0;
    }
    enemy.position = resolved;
}

#[allow(clippy::too_many_arguments)]
fn pursue_via_path(
    world: &mut WorldState,
    enemy: &mut SimEnemy,
    target_pos: Vec2,
    bounds: MapBounds,
    resolver: &CollisionResolver,
    planner: &mut dyn PathPlanner,
    ranged: bool,
) {
    // Refresh at most once per second; never in a tight loop.
    let refresh_due = enemy
        .last_path_request_tick
        .is_none_or(|tick| world.tick.saturating_sub(tick) >= PATH_REFRESH_TICKS as u64);
    if refresh_due {
        planner.request_path(enemy.id, enemy.position, target_pos);
        enemy.last_path_request_tick = Some(world.tick);
    }

    match planner.path_state(enemy.id) {
        PathQuery::Ready => {
            if let Some(direction) = planner.move_direction(enemy.id, enemy.position) {
                enemy.state = AiState::Pathfinding;
                attempt_move(enemy, direction, enemy.speed, resolver);
                return;
            }
            // Path exhausted without reaching the target; wait for refresh.
            enemy.state = AiState::Waiting;
        }
        PathQuery::Failed => {
            if ranged {
                // Ranged types hold position and rely on opportunistic sight.
                enemy.state = AiState::Waiting;
            } else {
                patrol(world, enemy, bounds, resolver);
            }
        }
        PathQuery::Pending | PathQuery::NotRequested => {
            enemy.state = AiState::Waiting;
        }
    }
}

fn patrol(
    world: &mut WorldState,
    enemy: &mut SimEnemy,
    bounds: MapBounds,
    resolver: &CollisionResolver,
) {
    enemy.state = AiState::Patrolling;

    let reached = enemy
        .patrol_target
        .is_some_and(|target| target.distance_to(enemy.position) < 1.0);
    if enemy.patrol_target.is_none()
        || reached
        || world.rng.chance(PATROL_REFRESH_CHANCE)
    {
        let angle = world.rng.float(0.0, std::f32::consts::TAU);
        let radius = world.rng.float(3.0, PATROL_RADIUS);
        let candidate = bounds.clamp(Vec2::new(
            enemy.position.x + angle.cos() * radius,
            enemy.position.z + angle.sin() * radius,
        ));
        enemy.patrol_target = resolver.find_nearest_walkable(candidate, 4.0);
    }

    if let Some(target) = enemy.patrol_target {
        let direction = (target - enemy.position).normalized();
        attempt_move(enemy, direction, enemy.speed * 0.6, resolver);
    }
}

fn throw_projectile(world: &mut WorldState, enemy: &SimEnemy, target_pos: Vec2) {
    let to_target = target_pos - enemy.position;
    let distance = to_target.length();
    let flight_time = (distance / PROJECTILE_SPEED).max(0.1);
    let id = world.next_id();
    world.projectiles.push(SimProjectile {
        id,
        owner_enemy: enemy.id,
        position: enemy.position,
        height: PROJECTILE_LAUNCH_HEIGHT,
        velocity: to_target.normalized().scaled(PROJECTILE_SPEED),
        // Lob so the arc peaks mid-flight.
        vertical_velocity: 0.5 * crate::domain::tuning::combat::PROJECTILE_GRAVITY * flight_time,
        damage: enemy.damage,
        ttl: PROJECTILE_TTL_TICKS,
    });
}

fn strike_target(world: &mut WorldState, enemy: &SimEnemy) {
    let Some(target_id) = enemy.target.clone() else {
        return;
    };
    let damage = enemy.damage;
    let Some(player) = world.find_player_mut(&target_id) else {
        return;
    };
    let outcome = player.apply_damage(damage);
    match outcome {
        DamageOutcome::Absorbed => world.push_event(SimEvent::PlayerDamaged {
            player: target_id,
            damage,
            source: DamageSource::Enemy,
        }),
        DamageOutcome::Downed => {
            world.push_event(SimEvent::PlayerDamaged {
                player: target_id.clone(),
                damage,
                source: DamageSource::Enemy,
            });
            world.push_event(SimEvent::PlayerDowned { player: target_id });
        }
        DamageOutcome::None => {}
    }
}
