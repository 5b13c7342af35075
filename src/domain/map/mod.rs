// Static map graph produced once per game instance. Everything in here is
// immutable after generation; mutable looted/broken flags live in the
// simulation state keyed by these entity ids.

pub mod generator;
pub mod grid;
pub mod loot;
pub mod props;

use serde::Serialize;

use crate::domain::area::{BuildingKind, ContainerKind, LootKind};
use crate::domain::math::{Rect, Vec2};

pub use generator::MapGenerator;
pub use grid::{CollisionGrid, GRID_RESOLUTION};

/// World-space extent of the map, centered on the origin.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MapBounds {
    pub fn centered(size: f32) -> Self {
        let half = size / 2.0;
        Self {
            min: Vec2::new(-half, -half),
            max: Vec2::new(half, half),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadOrientation {
    Horizontal,
    Vertical,
}

/// One main road: an axis-aligned strip across the full map extent.
#[derive(Debug, Clone, Serialize)]
pub struct Road {
    pub id: String,
    pub orientation: RoadOrientation,
    /// Centerline coordinate on the perpendicular axis.
    pub center: f32,
    pub width: f32,
    /// Extent of the centerline along the road's own axis.
    pub span: (f32, f32),
}

impl Road {
    /// Point on the centerline at parameter `t` in `[0, 1]`.
    pub fn centerline_point(&self, t: f32) -> Vec2 {
        let along = self.span.0 + (self.span.1 - self.span.0) * t;
        match self.orientation {
            RoadOrientation::Horizontal => Vec2::new(along, self.center),
            RoadOrientation::Vertical => Vec2::new(self.center, along),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sidewalk {
    pub id: String,
    pub road_id: String,
    pub rect: Rect,
}

/// Rectangular city block carved out between road centerlines.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub id: String,
    pub rect: Rect,
}

/// Compass side of an axis-aligned rectangle (north is +z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    North,
    South,
    East,
    West,
}

pub const SIDES: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

#[derive(Debug, Clone, Serialize)]
pub struct Window {
    pub floor: u32,
    pub side: Side,
    pub index: u32,
    pub boarded: bool,
    pub broken: bool,
    pub lit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    Table,
    Shelf,
    Mattress,
    Chair,
    Counter,
}

#[derive(Debug, Clone, Serialize)]
pub struct Furniture {
    pub kind: FurnitureKind,
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Door {
    pub side: Side,
    /// Center of the door opening on the wall it pierces.
    pub position: Vec2,
    pub width: f32,
}

/// Enterable room owned 1:1 by its building; lifetime equals the building's.
#[derive(Debug, Clone, Serialize)]
pub struct Interior {
    pub bounds: Rect,
    pub door: Door,
    pub barricaded: bool,
    pub furniture: Vec<Furniture>,
    pub loot_multiplier: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Building {
    pub id: String,
    pub kind: BuildingKind,
    pub rect: Rect,
    /// Axis-aligned rotation in degrees, one of 0/90/180/270.
    pub rotation: u16,
    pub floors: u32,
    pub windows: Vec<Window>,
    pub interior: Option<Interior>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overpass {
    pub id: String,
    pub orientation: RoadOrientation,
    pub center: f32,
    pub height: f32,
    pub pillars: Vec<Vec2>,
    /// Half extent of the square pillar footprint.
    pub pillar_half_extent: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarrelFire {
    pub id: String,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Car,
    Van,
    Bus,
    Truck,
}

impl VehicleKind {
    /// Footprint (length along the road, width across it).
    pub fn dims(self) -> (f32, f32) {
        match self {
            VehicleKind::Car => (4.2, 1.8),
            VehicleKind::Van => (5.2, 2.0),
            VehicleKind::Bus => (11.0, 2.5),
            VehicleKind::Truck => (8.0, 2.4),
        }
    }

    /// Large vehicles block the collision grid; cars stay passable cover.
    pub fn blocks_movement(self) -> bool {
        !matches!(self, VehicleKind::Car)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnishingKind {
    Lamp,
    Bench,
    Hydrant,
    Mailbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum PropKind {
    Trash,
    Vehicle(VehicleKind),
    StreetFurniture(FurnishingKind),
    Dumpster,
    Shelter,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prop {
    pub id: String,
    pub kind: PropKind,
    pub position: Vec2,
    pub rotation: f32,
    pub footprint: Rect,
}

impl Prop {
    pub fn blocks_movement(&self) -> bool {
        match self.kind {
            PropKind::Vehicle(kind) => kind.blocks_movement(),
            PropKind::Dumpster => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GlassZone {
    pub id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize)]
pub struct LootContainer {
    pub id: String,
    pub kind: ContainerKind,
    pub position: Vec2,
    /// Loot outcome rolled at generation time; may be `Nothing`.
    pub payload: LootKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveItem {
    pub id: String,
    pub position: Vec2,
    pub in_interior: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EscapeZone {
    pub position: Vec2,
    pub radius: f32,
    pub edge: Side,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpawnPoint {
    pub id: String,
    pub position: Vec2,
}

/// The full static map. Serialized once per game instance for client-side
/// rendering.
#[derive(Debug, Clone, Serialize)]
pub struct MapGraph {
    pub theme: String,
    pub bounds: MapBounds,
    pub roads: Vec<Road>,
    pub sidewalks: Vec<Sidewalk>,
    pub blocks: Vec<Block>,
    pub buildings: Vec<Building>,
    pub overpasses: Vec<Overpass>,
    pub barrel_fires: Vec<BarrelFire>,
    pub props: Vec<Prop>,
    pub glass_zones: Vec<GlassZone>,
    pub loot_containers: Vec<LootContainer>,
    pub objectives: Vec<ObjectiveItem>,
    pub escape_zone: EscapeZone,
    pub spawn_points: Vec<SpawnPoint>,
    pub enemy_spawn_zones: Vec<Vec2>,
}

impl MapGraph {
    /// True if the point lies inside any building footprint.
    pub fn inside_building(&self, point: Vec2) -> bool {
        self.buildings.iter().any(|b| b.rect.contains(point))
    }
}

/// Generation output: the immutable graph plus its rasterized grid.
pub struct GeneratedMap {
    pub graph: MapGraph,
    pub grid: CollisionGrid,
}
