// Bullet and projectile integration plus hit resolution. Enemy death is
// handled here in the same tick it is detected.

use tracing::info;

use crate::domain::collision::CollisionResolver;
use crate::domain::math::Vec2;
use crate::domain::state::{DamageOutcome, Perk, PlayerId, SimBullet, Weapon};
use crate::domain::systems::spawning::drop_death_pickup;
use crate::domain::tuning::EnemyKind;
use crate::domain::tuning::combat::{
    BULLET_HIT_RADIUS, BULLET_TTL_TICKS, HEAD_BAND, HEADHUNTER_BONUS,
    KILL_SCORE_HEADSHOT_BONUS, MELEE_CONE_COS, PICKUP_DROP_CHANCE, PROJECTILE_GRAVITY,
    PROJECTILE_HIT_RADIUS, TICK_DT,
};
use crate::domain::world::{DamageSource, SimEvent, WorldState};

/// Spawns a bullet for a weapon-fire intent. Rejected when the shooter
/// cannot act or has no ammo left.
pub fn fire_bullet(
    world: &mut WorldState,
    owner: &str,
    origin: Vec2,
    height: f32,
    direction: Vec2,
    weapon: Weapon,
    damage: f32,
    speed: f32,
) -> bool {
    let Some(player) = world.find_player_mut(owner) else {
        return false;
    };
    if !player.is_active() || player.ammo == 0 {
        return false;
    }
    player.ammo -= 1;

    let id = world.next_id();
    world.bullets.push(SimBullet {
        id,
        owner: owner.to_string(),
        position: origin,
        height,
        velocity: direction.normalized().scaled(speed),
        damage,
        weapon,
        ttl: BULLET_TTL_TICKS,
    });
    true
}

/// Step 6 of the tick: integrate bullets and resolve enemy hits.
pub fn tick_bullets(world: &mut WorldState, resolver: &CollisionResolver) {
    let mut bullets = std::mem::take(&mut world.bullets);

    for bullet in &mut bullets {
        let previous = bullet.position;
        bullet.position = bullet.position + bullet.velocity.scaled(TICK_DT);
        bullet.ttl = bullet.ttl.saturating_sub(1);

        if bullet.ttl == 0 || !resolver.is_walkable(bullet.position) {
            bullet.ttl = 0;
            continue;
        }

        // Swept check: closest approach of the segment flown this tick.
        let hit = world
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| {
                segment_distance(previous, bullet.position, enemy.position)
                    <= BULLET_HIT_RADIUS
            })
            .map(|(index, _)| index)
            .next();
        let Some(enemy_index) = hit else {
            continue;
        };

        let enemy = &world.enemies[enemy_index];
        let tuning = enemy.kind.tuning();
        let headshot = (bullet.height - tuning.head_height).abs() <= HEAD_BAND;
        if !headshot && bullet.height > tuning.body_height {
            // Passed over the target entirely.
            continue;
        }

        let mut damage = bullet.damage;
        if headshot {
            let mut multiplier = tuning.head_multiplier;
            if world
                .find_player(&bullet.owner)
                .is_some_and(|p| p.perks.contains(&Perk::Headhunter))
            {
                multiplier += HEADHUNTER_BONUS;
            }
            damage *= multiplier;
        }

        let enemy_id = world.enemies[enemy_index].id;
        let owner = bullet.owner.clone();
        damage_enemy(world, enemy_id, damage, headshot, Some(&owner));
        bullet.ttl = 0;
    }

    bullets.retain(|bullet| bullet.ttl > 0);
    world.bullets = bullets;
}

/// Step 7 of the tick: gravity-arc projectiles against players.
pub fn tick_projectiles(world: &mut WorldState, resolver: &CollisionResolver) {
    let mut projectiles = std::mem::take(&mut world.projectiles);

    for projectile in &mut projectiles {
        projectile.position = projectile.position + projectile.velocity.scaled(TICK_DT);
        projectile.height += projectile.vertical_velocity * TICK_DT;
        projectile.vertical_velocity -= PROJECTILE_GRAVITY * TICK_DT;
        projectile.ttl = projectile.ttl.saturating_sub(1);

        if projectile.ttl == 0
            || projectile.height <= 0.0
            || !resolver.is_walkable(projectile.position)
        {
            projectile.ttl = 0;
            continue;
        }
        if projectile.height > 2.2 {
            continue;
        }

        let hit_id = world
            .players
            .iter()
            .filter(|player| player.is_active())
            .find(|player| {
                player.position.distance_to(projectile.position) <= PROJECTILE_HIT_RADIUS
            })
            .map(|player| player.id.clone());
        let Some(player_id) = hit_id else {
            continue;
        };

        let damage = projectile.damage;
        if let Some(player) = world.find_player_mut(&player_id) {
            let outcome = player.apply_damage(damage);
            world.push_event(SimEvent::PlayerDamaged {
                player: player_id.clone(),
                damage,
                source: DamageSource::Projectile,
            });
            if outcome == DamageOutcome::Downed {
                world.push_event(SimEvent::PlayerDowned { player: player_id });
            }
        }
        projectile.ttl = 0;
    }

    projectiles.retain(|projectile| projectile.ttl > 0);
    world.projectiles = projectiles;
}

/// Cone check for a melee-attack intent. Returns the ids of every enemy
/// hit, after applying damage to each.
pub fn resolve_melee(
    world: &mut WorldState,
    attacker: &str,
    origin: Vec2,
    direction: Vec2,
    _weapon: Weapon,
    damage: f32,
    range: f32,
) -> Vec<u64> {
    let forward = direction.normalized();
    let targets: Vec<u64> = world
        .enemies
        .iter()
        .filter(|enemy| {
            let offset = enemy.position - origin;
            let distance = offset.length();
            distance <= range && forward.dot(offset.normalized()) > MELEE_CONE_COS
        })
        .map(|enemy| enemy.id)
        .collect();

    for &enemy_id in &targets {
        damage_enemy(world, enemy_id, damage, false, Some(attacker));
    }
    targets
}

/// Applies damage to an enemy and, if it dies, finishes the kill in the
/// same tick: scoring, obituary, drop roll and removal. Returns true when
/// the enemy died.
pub fn damage_enemy(
    world: &mut WorldState,
    enemy_id: u64,
    damage: f32,
    headshot: bool,
    killer: Option<&str>,
) -> bool {
    let Some(index) = world.enemies.iter().position(|enemy| enemy.id == enemy_id) else {
        return false;
    };

    let enemy = &mut world.enemies[index];
    enemy.health = (enemy.health - damage).max(0.0);
    world.push_event(SimEvent::EnemyHit {
        enemy_id,
        damage,
        headshot,
    });
    if world.enemies[index].health > 0.0 {
        return false;
    }

    let enemy = world.enemies.remove(index);
    world.departed_enemies.push(enemy.id);
    world.total_kills += 1;
    if enemy.kind == EnemyKind::Boss {
        world.boss_killed = true;
    }

    let mut score = enemy.kind.tuning().kill_score;
    if headshot {
        score += KILL_SCORE_HEADSHOT_BONUS;
    }
    let killer_id: PlayerId = killer.unwrap_or_default().to_string();
    if let Some(player) = world.find_player_mut(&killer_id) {
        player.score += score;
        player.kills += 1;
    }

    let obituary = format!(
        "{} ({}, est. net worth ${}) won't be needing it anymore",
        enemy.identity.name, enemy.identity.age, enemy.identity.net_worth
    );
    info!(
        enemy_id = enemy.id,
        killer = %killer_id,
        headshot,
        "enemy down"
    );
    world.push_event(SimEvent::Kill {
        killer: killer_id,
        enemy_kind: enemy.kind,
        obituary,
        headshot,
        score,
    });

    if world.rng.chance(PICKUP_DROP_CHANCE) {
        drop_death_pickup(world, enemy.position);
    }
    true
}

/// Distance from a point to the segment `a..b`.
fn segment_distance(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    let ab = b - a;
    let length_sq = ab.dot(ab);
    if length_sq < 1e-8 {
        return point.distance_to(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance_to(a + ab.scaled(t))
}
