// Stages 7-9: loot containers, objectives and the escape zone, then player
// spawn points and enemy spawn zones.

use crate::domain::area::{LootKind, PlacementPolicy};
use crate::domain::map::generator::{MapGenerator, PLACEMENT_ATTEMPTS};
use crate::domain::map::{
    Building, EscapeZone, LootContainer, ObjectiveItem, Overpass, Prop, Road, RoadOrientation,
    SIDES, Side, SpawnPoint,
};
use crate::domain::math::{Rect, Vec2};

const ESCAPE_ZONE_RADIUS: f32 = 6.0;

impl<'a> MapGenerator<'a> {
    pub(super) fn place_loot_containers(
        &mut self,
        roads: &[Road],
        buildings: &[Building],
    ) -> Vec<LootContainer> {
        let type_weights: Vec<(usize, f64)> = self
            .area
            .container_types
            .iter()
            .enumerate()
            .map(|(i, def)| (i, def.weight))
            .collect();
        // Only rooms that can actually be entered receive containers.
        let interiors: Vec<Rect> = buildings
            .iter()
            .filter_map(|b| b.interior.as_ref())
            .filter(|interior| !interior.barricaded)
            .map(|interior| interior.bounds)
            .collect();

        let mut containers = Vec::new();
        for i in 0..self.area.loot_container_count {
            let Some(&type_index) = self.rng.pick_weighted(&type_weights) else {
                break;
            };
            let def = &self.area.container_types[type_index];

            let mut placed = None;
            for _ in 0..PLACEMENT_ATTEMPTS {
                let candidate = match def.placement {
                    PlacementPolicy::Interior if !interiors.is_empty() => {
                        let index = self.rng.int(0, interiors.len() as i32 - 1) as usize;
                        let room = &interiors[index];
                        Vec2::new(
                            self.rng.float(room.min_x() + 0.5, room.max_x() - 0.5),
                            self.rng.float(room.min_z() + 0.5, room.max_z() - 0.5),
                        )
                    }
                    PlacementPolicy::Alley if !buildings.is_empty() => {
                        let index = self.rng.int(0, buildings.len() as i32 - 1) as usize;
                        self.point_beside_wall(&buildings[index].rect, 1.5)
                    }
                    PlacementPolicy::Road if !roads.is_empty() => {
                        let index = self.rng.int(0, roads.len() as i32 - 1) as usize;
                        let road = &roads[index];
                        let t = self.rng.float(0.05, 0.95);
                        let edge = self.rng.float(-road.width / 2.0 + 0.5, road.width / 2.0 - 0.5);
                        let point = road.centerline_point(t);
                        match road.orientation {
                            RoadOrientation::Horizontal => Vec2::new(point.x, point.z + edge),
                            RoadOrientation::Vertical => Vec2::new(point.x + edge, point.z),
                        }
                    }
                    // Any, or a policy whose anchors don't exist on this map.
                    _ => {
                        let point = self.random_open_point(3.0);
                        if buildings.iter().any(|b| b.rect.contains(point)) {
                            continue;
                        }
                        point
                    }
                };
                if !self.bounds.contains(candidate) {
                    continue;
                }
                placed = Some(candidate);
                break;
            }
            let Some(position) = placed else {
                continue;
            };

            let loot_weights: Vec<(LootKind, f64)> = def
                .loot_table
                .iter()
                .map(|entry| (entry.loot, entry.weight))
                .collect();
            let payload = self
                .rng
                .pick_weighted(&loot_weights)
                .copied()
                .unwrap_or(LootKind::Nothing);

            containers.push(LootContainer {
                id: format!("container-{i}"),
                kind: def.kind,
                position,
                payload,
            });
        }
        containers
    }

    pub(super) fn place_objectives(
        &mut self,
        buildings: &[Building],
    ) -> (Vec<ObjectiveItem>, EscapeZone) {
        let mut rooms: Vec<Rect> = buildings
            .iter()
            .filter_map(|b| b.interior.as_ref())
            .filter(|interior| !interior.barricaded)
            .map(|interior| interior.bounds)
            .collect();
        self.rng.shuffle(&mut rooms);

        let mut objectives = Vec::new();
        for k in 0..self.area.objective_count {
            if let Some(room) = rooms.get(k as usize) {
                let position = Vec2::new(
                    self.rng.float(room.min_x() + 0.6, room.max_x() - 0.6),
                    self.rng.float(room.min_z() + 0.6, room.max_z() - 0.6),
                );
                objectives.push(ObjectiveItem {
                    id: format!("objective-{k}"),
                    position,
                    in_interior: true,
                });
                continue;
            }
            // Not enough enterable rooms; fall back to open ground.
            for _ in 0..PLACEMENT_ATTEMPTS {
                let position = self.random_open_point(10.0);
                if buildings.iter().any(|b| b.rect.contains(position)) {
                    continue;
                }
                objectives.push(ObjectiveItem {
                    id: format!("objective-{k}"),
                    position,
                    in_interior: false,
                });
                break;
            }
        }

        let edge = *self.rng.pick(&SIDES).unwrap_or(&Side::North);
        let along = self.rng.float(0.15, 0.85);
        let min = self.bounds.min;
        let max = self.bounds.max;
        let position = match edge {
            Side::North => Vec2::new(
                min.x + self.bounds.width() * along,
                max.z - ESCAPE_ZONE_RADIUS,
            ),
            Side::South => Vec2::new(
                min.x + self.bounds.width() * along,
                min.z + ESCAPE_ZONE_RADIUS,
            ),
            Side::East => Vec2::new(
                max.x - ESCAPE_ZONE_RADIUS,
                min.z + self.bounds.depth() * along,
            ),
            Side::West => Vec2::new(
                min.x + ESCAPE_ZONE_RADIUS,
                min.z + self.bounds.depth() * along,
            ),
        };
        let escape_zone = EscapeZone {
            position,
            radius: ESCAPE_ZONE_RADIUS,
            edge,
        };

        (objectives, escape_zone)
    }

    pub(super) fn place_spawn_points(
        &mut self,
        buildings: &[Building],
        props: &[Prop],
        overpasses: &[Overpass],
    ) -> Vec<SpawnPoint> {
        let mut points = Vec::new();
        for i in 0..self.area.spawn_point_count {
            let mut chosen = None;
            for _ in 0..PLACEMENT_ATTEMPTS {
                let angle = self.rng.float(0.0, std::f32::consts::TAU);
                let radius = self.rng.float(0.0, self.area.protected_zone_radius * 0.8);
                let candidate = Vec2::new(angle.cos() * radius, angle.sin() * radius);
                if position_obstructed(candidate, buildings, props, overpasses) {
                    continue;
                }
                chosen = Some(candidate);
                break;
            }
            points.push(SpawnPoint {
                id: format!("spawn-{i}"),
                // The protected zone excludes buildings, so exhaustion here
                // means prop clutter; dropping back to the origin is safe.
                position: chosen.unwrap_or(Vec2::ZERO),
            });
        }
        points
    }

    /// Coarse lattice of enemy spawn cells, kept away from the protected
    /// center and out of blocking geometry.
    pub(super) fn mark_enemy_zones(
        &mut self,
        buildings: &[Building],
        props: &[Prop],
        overpasses: &[Overpass],
    ) -> Vec<Vec2> {
        let cell = self.area.enemy_zone_cell;
        let half = self.area.half_size();
        let cells_per_axis = (self.area.map_size / cell) as i32;

        let mut zones = Vec::new();
        for cz in 0..cells_per_axis {
            for cx in 0..cells_per_axis {
                let center = Vec2::new(
                    -half + (cx as f32 + 0.5) * cell,
                    -half + (cz as f32 + 0.5) * cell,
                );
                if center.length() < self.area.enemy_zone_min_distance {
                    continue;
                }
                if position_obstructed(center, buildings, props, overpasses) {
                    continue;
                }
                zones.push(center);
            }
        }
        zones
    }
}

fn position_obstructed(
    position: Vec2,
    buildings: &[Building],
    props: &[Prop],
    overpasses: &[Overpass],
) -> bool {
    buildings.iter().any(|b| b.rect.expanded(0.5).contains(position))
        || props
            .iter()
            .any(|p| p.blocks_movement() && p.footprint.expanded(0.5).contains(position))
        || overpasses.iter().any(|overpass| {
            let reach = overpass.pillar_half_extent + 0.5;
            overpass
                .pillars
                .iter()
                .any(|pillar| (pillar.x - position.x).abs() < reach
                    && (pillar.z - position.z).abs() < reach)
        })
}
