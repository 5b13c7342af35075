// Survival stat decay, environmental damage and the downed countdown.

use tracing::info;

use crate::domain::map::MapGraph;
use crate::domain::state::{DamageOutcome, Perk};
use crate::domain::tuning::SurvivalTuning;
use crate::domain::world::{DamageSource, SimEvent, WorldState};

/// Step 8 of the tick: hunger/warmth/energy decay plus starvation, cold and
/// fire proximity. Stats stay clamped to 0..=100 throughout.
pub fn tick_survival(world: &mut WorldState, graph: &MapGraph) {
    let tuning = SurvivalTuning::default();
    let mut players = std::mem::take(&mut world.players);

    for player in &mut players {
        if !player.alive || player.escaped || player.is_downed {
            continue;
        }

        let hunger_rate = if player.perks.contains(&Perk::IronStomach) {
            tuning.hunger_decay_per_tick * 0.5
        } else {
            tuning.hunger_decay_per_tick
        };
        let warmth_rate = if player.perks.contains(&Perk::ThickCoat) {
            tuning.warmth_decay_per_tick * 0.5
        } else {
            tuning.warmth_decay_per_tick
        };
        player.hunger -= hunger_rate;
        player.warmth -= warmth_rate;

        let moving = player.last_input.dx.abs() + player.last_input.dz.abs() > 1e-3;
        if moving {
            player.energy -= tuning.energy_decay_per_tick;
        } else {
            player.energy += tuning.energy_rest_per_tick;
        }

        // Barrel fires warm you up close and burn you point-blank.
        let nearest_fire = graph
            .barrel_fires
            .iter()
            .map(|fire| fire.position.distance_to(player.position))
            .min_by(|a, b| a.total_cmp(b));
        if let Some(distance) = nearest_fire {
            if distance <= tuning.fire_warmth_radius {
                player.warmth += tuning.fire_warmth_per_tick;
            }
            if distance <= tuning.fire_burn_radius {
                let outcome = player.apply_damage(tuning.fire_burn_damage_per_tick);
                world.push_event(SimEvent::PlayerDamaged {
                    player: player.id.clone(),
                    damage: tuning.fire_burn_damage_per_tick,
                    source: DamageSource::Fire,
                });
                if outcome == DamageOutcome::Downed {
                    world.push_event(SimEvent::PlayerDowned {
                        player: player.id.clone(),
                    });
                }
            }
        }

        player.hunger = player.hunger.clamp(0.0, 100.0);
        player.warmth = player.warmth.clamp(0.0, 100.0);
        player.energy = player.energy.clamp(0.0, 100.0);

        // Bottomed-out stats hurt on a fixed cadence.
        if player.hunger <= 0.0 {
            player.starve_tick += 1;
            if player.starve_tick >= tuning.starvation_interval_ticks {
                player.starve_tick = 0;
                let outcome = player.apply_damage(tuning.starvation_damage);
                world.push_event(SimEvent::PlayerDamaged {
                    player: player.id.clone(),
                    damage: tuning.starvation_damage,
                    source: DamageSource::Starvation,
                });
                if outcome == DamageOutcome::Downed {
                    world.push_event(SimEvent::PlayerDowned {
                        player: player.id.clone(),
                    });
                }
            }
        } else {
            player.starve_tick = 0;
        }
        if player.warmth <= 0.0 {
            player.freeze_tick += 1;
            if player.freeze_tick >= tuning.freezing_interval_ticks {
                player.freeze_tick = 0;
                let outcome = player.apply_damage(tuning.freezing_damage);
                world.push_event(SimEvent::PlayerDamaged {
                    player: player.id.clone(),
                    damage: tuning.freezing_damage,
                    source: DamageSource::Freezing,
                });
                if outcome == DamageOutcome::Downed {
                    world.push_event(SimEvent::PlayerDowned {
                        player: player.id.clone(),
                    });
                }
            }
        } else {
            player.freeze_tick = 0;
        }
    }

    world.players = players;
}

const REVIVE_RANGE: f32 = 3.0;

/// Handles a revive intent. Only a nearby active teammate can pick a downed
/// player back up; anything else is a no-op.
pub fn revive_player(world: &mut WorldState, reviver_id: &str, target_id: &str) -> bool {
    if reviver_id == target_id {
        return false;
    }
    let reviver_pos = match world.find_player(reviver_id) {
        Some(reviver) if reviver.is_active() => reviver.position,
        _ => return false,
    };
    let Some(target) = world.find_player_mut(target_id) else {
        return false;
    };
    if !target.is_downed || reviver_pos.distance_to(target.position) > REVIVE_RANGE {
        return false;
    }

    target.is_downed = false;
    target.downed_timer = 0;
    target.health = crate::domain::tuning::PlayerTuning::default().revive_health;
    world.push_event(SimEvent::PlayerRevived {
        player: target_id.to_string(),
        by: reviver_id.to_string(),
    });
    info!(player_id = %target_id, by = %reviver_id, "player revived");
    true
}

/// Step 9 of the tick: downed players bleed out when nobody reaches them.
pub fn tick_downed(world: &mut WorldState) {
    for player in &mut world.players {
        if !player.is_downed {
            continue;
        }
        player.downed_timer = player.downed_timer.saturating_sub(1);
        if player.downed_timer == 0 {
            player.is_downed = false;
            player.alive = false;
            info!(player_id = %player.id, "player bled out");
        }
    }
}
