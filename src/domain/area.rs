// Declarative per-biome generation parameters. Consumed as external config
// by the map generator; never mutated by the core.

use serde::{Deserialize, Serialize};

/// Everything the generator needs to know about one biome: road layout,
/// building mix, prop densities, loot tables and theme. Deserializable so
/// the orchestration layer can ship area documents from disk or a service.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaDefinition {
    pub theme: String,
    /// Side length of the square map in world units, centered on the origin.
    pub map_size: f32,

    pub horizontal_roads: u32,
    pub vertical_roads: u32,
    pub road_width: f32,
    /// Maximum absolute jitter applied to the evenly spaced road positions.
    pub road_jitter: f32,
    pub sidewalk_width: f32,

    /// Blocks narrower than this on either axis are discarded.
    pub min_block_extent: f32,

    /// Building slots per square unit of block area.
    pub building_density: f32,
    /// Padding margin for the building overlap rejection test.
    pub building_margin: f32,
    pub building_types: Vec<BuildingTypeDef>,
    pub window_boarded_chance: f64,
    pub window_broken_chance: f64,
    pub window_lit_chance: f64,

    pub overpass_count: u32,
    pub barrel_fire_count: u32,
    /// Probability that a barrel fire is placed against a building wall.
    pub barrel_fire_wall_bias: f64,

    /// fbm threshold above which a candidate cell may spawn a trash cluster.
    pub trash_noise_threshold: f32,
    /// Spacing of the candidate cell lattice for trash clustering.
    pub trash_cell_step: f32,
    pub vehicle_count: u32,
    pub street_furniture_spacing: f32,
    pub dumpster_count: u32,
    pub shelter_count: u32,
    pub glass_zone_count: u32,

    pub loot_container_count: u32,
    pub container_types: Vec<ContainerTypeDef>,

    pub objective_count: u32,
    pub spawn_point_count: u32,
    /// Radius of the central zone kept clear of buildings for player spawns.
    pub protected_zone_radius: f32,
    /// Cell size of the coarse enemy spawn zone lattice.
    pub enemy_zone_cell: f32,
    /// Enemy spawn zones closer to the origin than this are discarded.
    pub enemy_zone_min_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Apartment,
    Shop,
    Office,
    Warehouse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildingTypeDef {
    pub kind: BuildingKind,
    pub weight: f64,
    /// Inclusive sampling range for footprint width.
    pub width: (f32, f32),
    pub depth: (f32, f32),
    pub max_floors: u32,
    pub interior_chance: f64,
    pub barricade_chance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Crate,
    GarbageBag,
    Cooler,
    Toolbox,
}

/// Where a container type is allowed to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    Interior,
    Alley,
    Road,
    Any,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerTypeDef {
    pub kind: ContainerKind,
    pub weight: f64,
    pub placement: PlacementPolicy,
    /// Weighted loot outcomes, including an explicit empty result.
    pub loot_table: Vec<LootEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LootEntry {
    pub loot: LootKind,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootKind {
    Food,
    Ammo,
    Medkit,
    Weapon,
    Warmth,
    Nothing,
}

impl Default for AreaDefinition {
    /// The downtown biome the integration tests generate against.
    fn default() -> Self {
        Self {
            theme: "downtown".to_string(),
            map_size: 220.0,
            horizontal_roads: 3,
            vertical_roads: 3,
            road_width: 8.0,
            road_jitter: 6.0,
            sidewalk_width: 2.0,
            min_block_extent: 18.0,
            building_density: 0.004,
            building_margin: 2.5,
            building_types: vec![
                BuildingTypeDef {
                    kind: BuildingKind::Apartment,
                    weight: 4.0,
                    width: (10.0, 16.0),
                    depth: (10.0, 16.0),
                    max_floors: 4,
                    interior_chance: 0.5,
                    barricade_chance: 0.25,
                },
                BuildingTypeDef {
                    kind: BuildingKind::Shop,
                    weight: 3.0,
                    width: (8.0, 12.0),
                    depth: (8.0, 12.0),
                    max_floors: 2,
                    interior_chance: 0.7,
                    barricade_chance: 0.15,
                },
                BuildingTypeDef {
                    kind: BuildingKind::Office,
                    weight: 2.0,
                    width: (12.0, 18.0),
                    depth: (12.0, 18.0),
                    max_floors: 6,
                    interior_chance: 0.3,
                    barricade_chance: 0.3,
                },
                BuildingTypeDef {
                    kind: BuildingKind::Warehouse,
                    weight: 1.0,
                    width: (14.0, 20.0),
                    depth: (12.0, 18.0),
                    max_floors: 1,
                    interior_chance: 0.6,
                    barricade_chance: 0.2,
                },
            ],
            window_boarded_chance: 0.3,
            window_broken_chance: 0.2,
            window_lit_chance: 0.1,
            overpass_count: 1,
            barrel_fire_count: 10,
            barrel_fire_wall_bias: 0.6,
            trash_noise_threshold: 0.25,
            trash_cell_step: 2.0,
            vehicle_count: 24,
            street_furniture_spacing: 14.0,
            dumpster_count: 12,
            shelter_count: 6,
            glass_zone_count: 10,
            loot_container_count: 40,
            container_types: vec![
                ContainerTypeDef {
                    kind: ContainerKind::Crate,
                    weight: 3.0,
                    placement: PlacementPolicy::Interior,
                    loot_table: vec![
                        LootEntry {
                            loot: LootKind::Weapon,
                            weight: 2.0,
                        },
                        LootEntry {
                            loot: LootKind::Ammo,
                            weight: 4.0,
                        },
                        LootEntry {
                            loot: LootKind::Medkit,
                            weight: 2.0,
                        },
                        LootEntry {
                            loot: LootKind::Nothing,
                            weight: 2.0,
                        },
                    ],
                },
                ContainerTypeDef {
                    kind: ContainerKind::GarbageBag,
                    weight: 4.0,
                    placement: PlacementPolicy::Alley,
                    loot_table: vec![
                        LootEntry {
                            loot: LootKind::Food,
                            weight: 3.0,
                        },
                        LootEntry {
                            loot: LootKind::Warmth,
                            weight: 1.0,
                        },
                        LootEntry {
                            loot: LootKind::Nothing,
                            weight: 6.0,
                        },
                    ],
                },
                ContainerTypeDef {
                    kind: ContainerKind::Cooler,
                    weight: 2.0,
                    placement: PlacementPolicy::Road,
                    loot_table: vec![
                        LootEntry {
                            loot: LootKind::Food,
                            weight: 6.0,
                        },
                        LootEntry {
                            loot: LootKind::Nothing,
                            weight: 2.0,
                        },
                    ],
                },
                ContainerTypeDef {
                    kind: ContainerKind::Toolbox,
                    weight: 2.0,
                    placement: PlacementPolicy::Any,
                    loot_table: vec![
                        LootEntry {
                            loot: LootKind::Ammo,
                            weight: 3.0,
                        },
                        LootEntry {
                            loot: LootKind::Weapon,
                            weight: 1.0,
                        },
                        LootEntry {
                            loot: LootKind::Nothing,
                            weight: 3.0,
                        },
                    ],
                },
            ],
            objective_count: 3,
            spawn_point_count: 8,
            protected_zone_radius: 16.0,
            enemy_zone_cell: 8.0,
            enemy_zone_min_distance: 40.0,
        }
    }
}

impl AreaDefinition {
    pub fn half_size(&self) -> f32 {
        self.map_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_area_parses_back_from_json() {
        let json = r#"{
            "theme": "docklands",
            "map_size": 180.0,
            "horizontal_roads": 2,
            "vertical_roads": 2,
            "road_width": 7.0,
            "road_jitter": 4.0,
            "sidewalk_width": 1.5,
            "min_block_extent": 16.0,
            "building_density": 0.003,
            "building_margin": 2.0,
            "building_types": [
                {
                    "kind": "warehouse",
                    "weight": 1.0,
                    "width": [14.0, 20.0],
                    "depth": [12.0, 18.0],
                    "max_floors": 1,
                    "interior_chance": 0.6,
                    "barricade_chance": 0.2
                }
            ],
            "window_boarded_chance": 0.3,
            "window_broken_chance": 0.2,
            "window_lit_chance": 0.1,
            "overpass_count": 0,
            "barrel_fire_count": 4,
            "barrel_fire_wall_bias": 0.6,
            "trash_noise_threshold": 0.25,
            "trash_cell_step": 2.0,
            "vehicle_count": 8,
            "street_furniture_spacing": 14.0,
            "dumpster_count": 4,
            "shelter_count": 2,
            "glass_zone_count": 4,
            "loot_container_count": 12,
            "container_types": [
                {
                    "kind": "crate",
                    "weight": 1.0,
                    "placement": "any",
                    "loot_table": [
                        { "loot": "ammo", "weight": 1.0 },
                        { "loot": "nothing", "weight": 1.0 }
                    ]
                }
            ],
            "objective_count": 3,
            "spawn_point_count": 4,
            "protected_zone_radius": 14.0,
            "enemy_zone_cell": 8.0,
            "enemy_zone_min_distance": 30.0
        }"#;

        let area: AreaDefinition = serde_json::from_str(json).expect("area should deserialize");
        assert_eq!(area.theme, "docklands");
        assert_eq!(area.building_types[0].kind, BuildingKind::Warehouse);
        assert_eq!(
            area.container_types[0].placement,
            PlacementPolicy::Any
        );
    }
}
