// Stage 6: prop scatter. Trash rides the noise field, vehicles follow road
// centerlines, the rest lean on buildings and landmarks.

use crate::domain::map::generator::{MapGenerator, PLACEMENT_ATTEMPTS};
use crate::domain::map::{
    BarrelFire, Building, FurnishingKind, GlassZone, Overpass, Prop, PropKind, Road,
    RoadOrientation, VehicleKind,
};
use crate::domain::math::{Rect, Vec2};

const VEHICLE_WEIGHTS: [(VehicleKind, f64); 4] = [
    (VehicleKind::Car, 5.0),
    (VehicleKind::Van, 2.0),
    (VehicleKind::Bus, 1.0),
    (VehicleKind::Truck, 1.5),
];

const FURNISHING_KINDS: [FurnishingKind; 4] = [
    FurnishingKind::Lamp,
    FurnishingKind::Bench,
    FurnishingKind::Hydrant,
    FurnishingKind::Mailbox,
];

impl<'a> MapGenerator<'a> {
    pub(super) fn scatter_props(
        &mut self,
        roads: &[Road],
        buildings: &[Building],
        fires: &[BarrelFire],
        overpasses: &[Overpass],
    ) -> Vec<Prop> {
        let mut props = Vec::new();
        self.scatter_trash(buildings, &mut props);
        self.place_vehicles(roads, &mut props);
        self.place_street_furniture(roads, &mut props);
        self.place_dumpsters(buildings, &mut props);
        self.place_shelters(buildings, fires, overpasses, &mut props);
        props
    }

    /// Coherent-noise clustering: a threshold over the fbm field gates
    /// candidate lattice cells; each accepted cell spawns a small
    /// Gaussian-jittered cluster.
    fn scatter_trash(&mut self, buildings: &[Building], props: &mut Vec<Prop>) {
        let half = self.area.half_size();
        let step = self.area.trash_cell_step;
        let threshold = self.area.trash_noise_threshold;

        let cells_per_axis = (self.area.map_size / step) as i32;
        for cz in 0..cells_per_axis {
            for cx in 0..cells_per_axis {
                let cell = Vec2::new(
                    -half + (cx as f32 + 0.5) * step,
                    -half + (cz as f32 + 0.5) * step,
                );
                let density = self.noise.fbm(cell.x * 0.08, cell.z * 0.08, 3, 2.0, 0.5);
                if density < threshold || !self.rng.chance(0.3) {
                    continue;
                }

                let pieces = self.rng.int(2, 5);
                for _ in 0..pieces {
                    let position = Vec2::new(
                        self.rng.gaussian(cell.x, 1.0),
                        self.rng.gaussian(cell.z, 1.0),
                    );
                    if !self.bounds.contains(position)
                        || buildings.iter().any(|b| b.rect.contains(position))
                    {
                        continue;
                    }
                    props.push(Prop {
                        id: format!("prop-{}", props.len()),
                        kind: PropKind::Trash,
                        position,
                        rotation: self.rng.float(0.0, 360.0),
                        footprint: Rect::new(position, 0.5, 0.5),
                    });
                }
            }
        }
    }

    fn place_vehicles(&mut self, roads: &[Road], props: &mut Vec<Prop>) {
        if roads.is_empty() {
            return;
        }
        let vehicle_start = props.len();
        for _ in 0..self.area.vehicle_count {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let road_index = self.rng.int(0, roads.len() as i32 - 1) as usize;
                let road = &roads[road_index];
                let t = self.rng.float(0.05, 0.95);
                let lane = self.rng.float(-road.width / 4.0, road.width / 4.0);
                let Some(&kind) = self.rng.pick_weighted(&VEHICLE_WEIGHTS) else {
                    break;
                };
                let (length, width) = kind.dims();

                let center_point = road.centerline_point(t);
                let (position, footprint, rotation) = match road.orientation {
                    RoadOrientation::Horizontal => {
                        let position = Vec2::new(center_point.x, center_point.z + lane);
                        (position, Rect::new(position, length, width), 0.0)
                    }
                    RoadOrientation::Vertical => {
                        let position = Vec2::new(center_point.x + lane, center_point.z);
                        (position, Rect::new(position, width, length), 90.0)
                    }
                };

                let overlapping = props[vehicle_start..]
                    .iter()
                    .any(|other| other.footprint.overlaps(&footprint, 0.5));
                if overlapping {
                    continue;
                }
                props.push(Prop {
                    id: format!("prop-{}", props.len()),
                    kind: PropKind::Vehicle(kind),
                    position,
                    rotation,
                    footprint,
                });
                break;
            }
        }
    }

    fn place_street_furniture(&mut self, roads: &[Road], props: &mut Vec<Prop>) {
        for road in roads {
            let length = road.span.1 - road.span.0;
            let count = (length / self.area.street_furniture_spacing) as u32;
            for k in 0..count {
                let along = road.span.0 + self.area.street_furniture_spacing * (k as f32 + 0.5);
                // Alternate sides of the road.
                let side = if k % 2 == 0 { 1.0 } else { -1.0 };
                let offset = side * (road.width / 2.0 + self.area.sidewalk_width / 2.0);
                let position = match road.orientation {
                    RoadOrientation::Horizontal => Vec2::new(along, road.center + offset),
                    RoadOrientation::Vertical => Vec2::new(road.center + offset, along),
                };
                let Some(&kind) = self.rng.pick(&FURNISHING_KINDS) else {
                    continue;
                };
                props.push(Prop {
                    id: format!("prop-{}", props.len()),
                    kind: PropKind::StreetFurniture(kind),
                    position,
                    rotation: if side > 0.0 { 180.0 } else { 0.0 },
                    footprint: Rect::new(position, 0.5, 0.5),
                });
            }
        }
    }

    fn place_dumpsters(&mut self, buildings: &[Building], props: &mut Vec<Prop>) {
        if buildings.is_empty() {
            return;
        }
        for _ in 0..self.area.dumpster_count {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let index = self.rng.int(0, buildings.len() as i32 - 1) as usize;
                let building = &buildings[index];
                // Dumpsters hug the back and side walls; the facade (the
                // wall the rotation faces) rarely gets one.
                let facade = ((building.rotation / 90) % 4) as usize;
                let side_weights: Vec<(usize, f64)> = (0..4)
                    .map(|side| (side, if side == facade { 1.0 } else { 3.0 }))
                    .collect();
                let wall = self.rng.pick_weighted(&side_weights).copied().unwrap_or(0);
                let position = self.wall_point(&building.rect, wall, 1.2);
                if !self.bounds.contains(position)
                    || buildings.iter().any(|b| b.rect.contains(position))
                {
                    continue;
                }
                let footprint = Rect::new(position, 2.2, 1.4);
                let collides = props
                    .iter()
                    .any(|other| other.blocks_movement() && other.footprint.overlaps(&footprint, 0.3));
                if collides {
                    continue;
                }
                props.push(Prop {
                    id: format!("prop-{}", props.len()),
                    kind: PropKind::Dumpster,
                    position,
                    rotation: self.rng.float(0.0, 360.0),
                    footprint,
                });
                break;
            }
        }
    }

    fn place_shelters(
        &mut self,
        buildings: &[Building],
        fires: &[BarrelFire],
        overpasses: &[Overpass],
        props: &mut Vec<Prop>,
    ) {
        for _ in 0..self.area.shelter_count {
            for _ in 0..PLACEMENT_ATTEMPTS {
                // Survivors camp near warmth and cover.
                let anchor = if self.rng.chance(0.6) && !fires.is_empty() {
                    let index = self.rng.int(0, fires.len() as i32 - 1) as usize;
                    fires[index].position
                } else if !overpasses.is_empty() && self.rng.chance(0.5) {
                    let overpass = &overpasses[0];
                    if overpass.pillars.is_empty() {
                        self.random_open_point(8.0)
                    } else {
                        let index = self.rng.int(0, overpass.pillars.len() as i32 - 1) as usize;
                        overpass.pillars[index]
                    }
                } else {
                    self.random_open_point(8.0)
                };

                let position = Vec2::new(
                    self.rng.gaussian(anchor.x, 2.5),
                    self.rng.gaussian(anchor.z, 2.5),
                );
                if !self.bounds.contains(position)
                    || buildings.iter().any(|b| b.rect.contains(position))
                {
                    continue;
                }
                props.push(Prop {
                    id: format!("prop-{}", props.len()),
                    kind: PropKind::Shelter,
                    position,
                    rotation: self.rng.float(0.0, 360.0),
                    footprint: Rect::new(position, 2.5, 2.5),
                });
                break;
            }
        }
    }

    pub(super) fn place_glass_zones(&mut self, buildings: &[Building]) -> Vec<GlassZone> {
        let mut zones = Vec::new();
        if buildings.is_empty() {
            return zones;
        }
        for i in 0..self.area.glass_zone_count {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let index = self.rng.int(0, buildings.len() as i32 - 1) as usize;
                let building = &buildings[index];
                let position = self.point_beside_wall(&building.rect, 0.8);
                if !self.bounds.contains(position) {
                    continue;
                }
                // Long axis runs along the wall the shards fell from.
                let beside_vertical_wall = position.x < building.rect.min_x()
                    || position.x > building.rect.max_x();
                let rect = if beside_vertical_wall {
                    Rect::new(position, 1.0, 2.2)
                } else {
                    Rect::new(position, 2.2, 1.0)
                };
                zones.push(GlassZone {
                    id: format!("glass-{i}"),
                    rect,
                });
                break;
            }
        }
        zones
    }
}
