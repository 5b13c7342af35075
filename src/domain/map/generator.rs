// Seed-driven map construction. Stages run in a strict order so a given
// (seed, area) pair always consumes the RNG identically and reproduces the
// same graph byte for byte.

use crate::domain::area::AreaDefinition;
use crate::domain::map::{
    BarrelFire, Block, Building, CollisionGrid, Door, Furniture, FurnitureKind, GeneratedMap,
    Interior, MapBounds, MapGraph, Overpass, Road, RoadOrientation, SIDES, Side, Window,
};
use crate::domain::math::{Rect, Vec2};
use crate::domain::noise::NoiseField;
use crate::domain::rng::SeededRandom;

/// Bounded attempts for every rejection-sampled placement. Exhaustion skips
/// the slot; generation itself never fails.
pub(super) const PLACEMENT_ATTEMPTS: u32 = 20;

/// Thickness of the wall ring between a building footprint and its interior.
const INTERIOR_WALL: f32 = 0.6;

const FURNITURE_KINDS: [FurnitureKind; 5] = [
    FurnitureKind::Table,
    FurnitureKind::Shelf,
    FurnitureKind::Mattress,
    FurnitureKind::Chair,
    FurnitureKind::Counter,
];

pub struct MapGenerator<'a> {
    pub(super) area: &'a AreaDefinition,
    pub(super) rng: SeededRandom,
    pub(super) noise: NoiseField,
    pub(super) bounds: MapBounds,
}

impl<'a> MapGenerator<'a> {
    /// Builds the complete map graph and collision grid for one game
    /// instance. Runs once, synchronously, at game start.
    pub fn generate(seed: u32, area: &'a AreaDefinition) -> GeneratedMap {
        let mut rng = SeededRandom::new(seed);
        let noise = NoiseField::new(&mut rng);
        let mut generator = MapGenerator {
            area,
            rng,
            noise,
            bounds: MapBounds::centered(area.map_size),
        };
        generator.run()
    }

    fn run(&mut self) -> GeneratedMap {
        let roads = self.place_roads();
        let sidewalks = self.place_sidewalks(&roads);
        let blocks = self.carve_blocks(&roads);
        let buildings = self.place_buildings(&blocks);
        let overpasses = self.place_overpasses();
        let barrel_fires = self.place_barrel_fires(&buildings);
        let props = self.scatter_props(&roads, &buildings, &barrel_fires, &overpasses);
        let glass_zones = self.place_glass_zones(&buildings);
        let loot_containers = self.place_loot_containers(&roads, &buildings);
        let (objectives, escape_zone) = self.place_objectives(&buildings);
        let spawn_points = self.place_spawn_points(&buildings, &props, &overpasses);
        let enemy_spawn_zones = self.mark_enemy_zones(&buildings, &props, &overpasses);

        let graph = MapGraph {
            theme: self.area.theme.clone(),
            bounds: self.bounds,
            roads,
            sidewalks,
            blocks,
            buildings,
            overpasses,
            barrel_fires,
            props,
            glass_zones,
            loot_containers,
            objectives,
            escape_zone,
            spawn_points,
            enemy_spawn_zones,
        };
        // Rasterization always runs last; it reads every prior stage.
        let grid = rasterize(&graph);
        GeneratedMap { graph, grid }
    }

    fn place_roads(&mut self) -> Vec<Road> {
        let mut roads = Vec::new();
        self.lay_road_axis(
            self.area.horizontal_roads,
            RoadOrientation::Horizontal,
            &mut roads,
        );
        self.lay_road_axis(
            self.area.vertical_roads,
            RoadOrientation::Vertical,
            &mut roads,
        );
        roads
    }

    fn lay_road_axis(
        &mut self,
        count: u32,
        orientation: RoadOrientation,
        roads: &mut Vec<Road>,
    ) {
        let half = self.area.half_size();
        let spacing = self.area.map_size / (count + 1) as f32;
        for i in 0..count {
            let jitter = self.rng.float(-self.area.road_jitter, self.area.road_jitter);
            let center = (-half + spacing * (i + 1) as f32 + jitter)
                .clamp(-half + spacing * 0.5, half - spacing * 0.5);
            let tag = match orientation {
                RoadOrientation::Horizontal => "h",
                RoadOrientation::Vertical => "v",
            };
            roads.push(Road {
                id: format!("road-{tag}-{i}"),
                orientation,
                center,
                width: self.area.road_width,
                span: (-half, half),
            });
        }
    }

    fn place_sidewalks(&mut self, roads: &[Road]) -> Vec<super::Sidewalk> {
        let mut sidewalks = Vec::new();
        for road in roads {
            for (side_index, direction) in [-1.0f32, 1.0].iter().enumerate() {
                let offset = direction * (road.width / 2.0 + self.area.sidewalk_width / 2.0);
                let rect = match road.orientation {
                    RoadOrientation::Horizontal => Rect::new(
                        Vec2::new(0.0, road.center + offset),
                        self.area.map_size,
                        self.area.sidewalk_width,
                    ),
                    RoadOrientation::Vertical => Rect::new(
                        Vec2::new(road.center + offset, 0.0),
                        self.area.sidewalk_width,
                        self.area.map_size,
                    ),
                };
                sidewalks.push(super::Sidewalk {
                    id: format!("{}-walk-{side_index}", road.id),
                    road_id: road.id.clone(),
                    rect,
                });
            }
        }
        sidewalks
    }

    fn carve_blocks(&mut self, roads: &[Road]) -> Vec<Block> {
        let half = self.area.half_size();
        // Cut coordinates per axis: map edges plus road edges (centerline
        // offset by half road width and the sidewalk strip).
        let edge_offset = self.area.road_width / 2.0 + self.area.sidewalk_width;

        let mut x_cuts = vec![(-half, 0.0), (half, 0.0)];
        let mut z_cuts = vec![(-half, 0.0), (half, 0.0)];
        for road in roads {
            match road.orientation {
                RoadOrientation::Vertical => x_cuts.push((road.center, edge_offset)),
                RoadOrientation::Horizontal => z_cuts.push((road.center, edge_offset)),
            }
        }
        x_cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        z_cuts.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut blocks = Vec::new();
        for xi in 0..x_cuts.len() - 1 {
            for zi in 0..z_cuts.len() - 1 {
                let min_x = x_cuts[xi].0 + x_cuts[xi].1;
                let max_x = x_cuts[xi + 1].0 - x_cuts[xi + 1].1;
                let min_z = z_cuts[zi].0 + z_cuts[zi].1;
                let max_z = z_cuts[zi + 1].0 - z_cuts[zi + 1].1;

                let width = max_x - min_x;
                let depth = max_z - min_z;
                if width < self.area.min_block_extent || depth < self.area.min_block_extent {
                    continue;
                }
                blocks.push(Block {
                    id: format!("block-{}", blocks.len()),
                    rect: Rect::new(
                        Vec2::new((min_x + max_x) / 2.0, (min_z + max_z) / 2.0),
                        width,
                        depth,
                    ),
                });
            }
        }
        blocks
    }

    fn place_buildings(&mut self, blocks: &[Block]) -> Vec<Building> {
        let mut buildings = Vec::new();
        let type_weights: Vec<(usize, f64)> = self
            .area
            .building_types
            .iter()
            .enumerate()
            .map(|(i, def)| (i, def.weight))
            .collect();

        for block in blocks {
            let slots = ((block.rect.area() * self.area.building_density) as u32).max(1);
            let block_start = buildings.len();

            for _ in 0..slots {
                for _ in 0..PLACEMENT_ATTEMPTS {
                    let Some(&type_index) = self.rng.pick_weighted(&type_weights) else {
                        break;
                    };
                    let def = &self.area.building_types[type_index];
                    let rotation = *self
                        .rng
                        .pick(&[0u16, 90, 180, 270])
                        .unwrap_or(&0);
                    let mut width = self.rng.float(def.width.0, def.width.1);
                    let mut depth = self.rng.float(def.depth.0, def.depth.1);
                    if rotation == 90 || rotation == 270 {
                        std::mem::swap(&mut width, &mut depth);
                    }
                    if width >= block.rect.width || depth >= block.rect.depth {
                        continue;
                    }

                    let center = Vec2::new(
                        self.rng.float(
                            block.rect.min_x() + width / 2.0,
                            block.rect.max_x() - width / 2.0,
                        ),
                        self.rng.float(
                            block.rect.min_z() + depth / 2.0,
                            block.rect.max_z() - depth / 2.0,
                        ),
                    );
                    let rect = Rect::new(center, width, depth);

                    let overlapping = buildings[block_start..]
                        .iter()
                        .any(|existing: &Building| {
                            existing.rect.overlaps(&rect, self.area.building_margin)
                        });
                    if overlapping
                        || circle_overlaps_rect(
                            Vec2::ZERO,
                            self.area.protected_zone_radius,
                            &rect,
                        )
                    {
                        continue;
                    }

                    let floors = self.rng.int(1, def.max_floors as i32) as u32;
                    let windows = self.build_windows(&rect, floors);
                    let interior = if self.rng.chance(def.interior_chance) {
                        self.build_interior(&rect, def.barricade_chance)
                    } else {
                        None
                    };
                    buildings.push(Building {
                        id: format!("building-{}", buildings.len()),
                        kind: def.kind,
                        rect,
                        rotation,
                        floors,
                        windows,
                        interior,
                    });
                    break;
                }
            }
        }
        buildings
    }

    fn build_windows(&mut self, rect: &Rect, floors: u32) -> Vec<Window> {
        let mut windows = Vec::new();
        for floor in 0..floors {
            for side in SIDES {
                let wall_length = match side {
                    Side::North | Side::South => rect.width,
                    Side::East | Side::West => rect.depth,
                };
                let count = ((wall_length / 3.0) as u32).max(1);
                for index in 0..count {
                    windows.push(Window {
                        floor,
                        side,
                        index,
                        boarded: self.rng.chance(self.area.window_boarded_chance),
                        broken: self.rng.chance(self.area.window_broken_chance),
                        lit: self.rng.chance(self.area.window_lit_chance),
                    });
                }
            }
        }
        windows
    }

    fn build_interior(&mut self, rect: &Rect, barricade_chance: f64) -> Option<Interior> {
        let room_width = rect.width - INTERIOR_WALL * 2.0;
        let room_depth = rect.depth - INTERIOR_WALL * 2.0;
        if room_width < 3.0 || room_depth < 3.0 {
            return None;
        }
        let bounds = Rect::new(rect.center, room_width, room_depth);

        let side = *self.rng.pick(&SIDES)?;
        let along = self.rng.float(0.25, 0.75);
        let position = match side {
            Side::North => Vec2::new(
                rect.min_x() + rect.width * along,
                rect.max_z() - INTERIOR_WALL / 2.0,
            ),
            Side::South => Vec2::new(
                rect.min_x() + rect.width * along,
                rect.min_z() + INTERIOR_WALL / 2.0,
            ),
            Side::East => Vec2::new(
                rect.max_x() - INTERIOR_WALL / 2.0,
                rect.min_z() + rect.depth * along,
            ),
            Side::West => Vec2::new(
                rect.min_x() + INTERIOR_WALL / 2.0,
                rect.min_z() + rect.depth * along,
            ),
        };

        let piece_count = self.rng.int(2, 6);
        let mut furniture = Vec::new();
        for _ in 0..piece_count {
            let kind = *self.rng.pick(&FURNITURE_KINDS)?;
            furniture.push(Furniture {
                kind,
                position: Vec2::new(
                    self.rng.float(bounds.min_x() + 0.8, bounds.max_x() - 0.8),
                    self.rng.float(bounds.min_z() + 0.8, bounds.max_z() - 0.8),
                ),
                rotation: self.rng.float(0.0, 360.0),
            });
        }

        Some(Interior {
            bounds,
            door: Door {
                side,
                position,
                width: 1.2,
            },
            barricaded: self.rng.chance(barricade_chance),
            furniture,
            loot_multiplier: self.rng.float(1.0, 2.0),
        })
    }

    fn place_overpasses(&mut self) -> Vec<Overpass> {
        let half = self.area.half_size();
        let mut overpasses = Vec::new();
        for i in 0..self.area.overpass_count {
            let orientation = if self.rng.chance(0.5) {
                RoadOrientation::Horizontal
            } else {
                RoadOrientation::Vertical
            };
            let center = self.rng.float(-half * 0.7, half * 0.7);
            let height = self.rng.float(5.0, 7.0);

            let pillar_spacing = 8.0;
            let pillar_count = (self.area.map_size / pillar_spacing) as u32;
            let mut pillars = Vec::new();
            for p in 0..pillar_count {
                let along = -half + pillar_spacing * (p as f32 + 0.5);
                pillars.push(match orientation {
                    RoadOrientation::Horizontal => Vec2::new(along, center),
                    RoadOrientation::Vertical => Vec2::new(center, along),
                });
            }
            overpasses.push(Overpass {
                id: format!("overpass-{i}"),
                orientation,
                center,
                height,
                pillars,
                pillar_half_extent: 0.6,
            });
        }
        overpasses
    }

    fn place_barrel_fires(&mut self, buildings: &[Building]) -> Vec<BarrelFire> {
        let mut fires = Vec::new();
        for i in 0..self.area.barrel_fire_count {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let position = if !buildings.is_empty()
                    && self.rng.chance(self.area.barrel_fire_wall_bias)
                {
                    // Lean against a random building wall.
                    let index = self.rng.int(0, buildings.len() as i32 - 1) as usize;
                    self.point_beside_wall(&buildings[index].rect, 1.5)
                } else {
                    self.random_open_point(5.0)
                };
                if buildings.iter().any(|b| b.rect.contains(position)) {
                    continue;
                }
                fires.push(BarrelFire {
                    id: format!("fire-{i}"),
                    position,
                });
                break;
            }
        }
        fires
    }

    /// Uniform point inside the bounds, inset from every edge.
    pub(super) fn random_open_point(&mut self, inset: f32) -> Vec2 {
        let half = self.area.half_size() - inset;
        Vec2::new(self.rng.float(-half, half), self.rng.float(-half, half))
    }

    /// Point just outside a random wall of the rectangle.
    pub(super) fn point_beside_wall(&mut self, rect: &Rect, offset: f32) -> Vec2 {
        let side = self.rng.int(0, 3) as usize;
        self.wall_point(rect, side, offset)
    }

    /// Point just outside a specific wall, indexed in `SIDES` order.
    pub(super) fn wall_point(&mut self, rect: &Rect, side_index: usize, offset: f32) -> Vec2 {
        let along = self.rng.float(0.1, 0.9);
        match SIDES[side_index % 4] {
            Side::North => Vec2::new(
                rect.min_x() + rect.width * along,
                rect.max_z() + offset,
            ),
            Side::South => Vec2::new(
                rect.min_x() + rect.width * along,
                rect.min_z() - offset,
            ),
            Side::East => Vec2::new(
                rect.max_x() + offset,
                rect.min_z() + rect.depth * along,
            ),
            Side::West => Vec2::new(
                rect.min_x() - offset,
                rect.min_z() + rect.depth * along,
            ),
        }
    }
}

pub(super) fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = Vec2::new(
        center.x.clamp(rect.min_x(), rect.max_x()),
        center.z.clamp(rect.min_z(), rect.max_z()),
    );
    nearest.distance_to(center) < radius
}

/// Stage 10: rasterize blocking geometry, then re-open non-barricaded
/// interiors and their door gaps.
fn rasterize(graph: &MapGraph) -> CollisionGrid {
    let mut grid = CollisionGrid::new(graph.bounds);

    for building in &graph.buildings {
        grid.block_rect(&building.rect);
    }
    for overpass in &graph.overpasses {
        for pillar in &overpass.pillars {
            grid.block_rect(&Rect::new(
                *pillar,
                overpass.pillar_half_extent * 2.0,
                overpass.pillar_half_extent * 2.0,
            ));
        }
    }
    for prop in &graph.props {
        if prop.blocks_movement() {
            grid.block_rect(&prop.footprint);
        }
    }

    for building in &graph.buildings {
        let Some(interior) = &building.interior else {
            continue;
        };
        if interior.barricaded {
            continue;
        }
        grid.clear_rect(&interior.bounds);
        // The door gap pierces the wall ring between footprint and room.
        let through = INTERIOR_WALL * 2.0 + 1.0;
        let door_rect = match interior.door.side {
            Side::North | Side::South => {
                Rect::new(interior.door.position, interior.door.width, through)
            }
            Side::East | Side::West => {
                Rect::new(interior.door.position, through, interior.door.width)
            }
        };
        grid.clear_rect(&door_rect);
    }

    grid
}
