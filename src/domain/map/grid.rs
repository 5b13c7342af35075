// Rasterized walkability grid derived from the map graph. Built once at
// generation time, read-only afterwards.

use crate::domain::map::MapBounds;
use crate::domain::math::{Rect, Vec2};

/// World units per grid cell.
pub const GRID_RESOLUTION: f32 = 0.5;

const WALKABLE: u8 = 0;
const BLOCKED: u8 = 1;

/// One byte per cell; nonzero means blocked.
pub struct CollisionGrid {
    width: usize,
    height: usize,
    origin: Vec2,
    cells: Vec<u8>,
}

impl CollisionGrid {
    pub fn new(bounds: MapBounds) -> Self {
        let width = (bounds.width() / GRID_RESOLUTION).ceil() as usize;
        let height = (bounds.depth() / GRID_RESOLUTION).ceil() as usize;
        Self {
            width,
            height,
            origin: bounds.min,
            cells: vec![WALKABLE; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw cell bytes, exposed for determinism hashing in tests.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Grid coordinates for a world point, or `None` when out of bounds.
    pub fn world_to_cell(&self, point: Vec2) -> Option<(usize, usize)> {
        let gx = (point.x - self.origin.x) / GRID_RESOLUTION;
        let gz = (point.z - self.origin.z) / GRID_RESOLUTION;
        if gx < 0.0 || gz < 0.0 {
            return None;
        }
        let gx = gx as usize;
        let gz = gz as usize;
        if gx >= self.width || gz >= self.height {
            return None;
        }
        Some((gx, gz))
    }

    /// World-space center of a cell.
    pub fn cell_center(&self, gx: usize, gz: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + (gx as f32 + 0.5) * GRID_RESOLUTION,
            self.origin.z + (gz as f32 + 0.5) * GRID_RESOLUTION,
        )
    }

    pub fn is_cell_walkable(&self, gx: usize, gz: usize) -> bool {
        if gx >= self.width || gz >= self.height {
            return false;
        }
        self.cells[gz * self.width + gx] == WALKABLE
    }

    /// Out-of-bounds points count as blocked.
    pub fn is_walkable(&self, point: Vec2) -> bool {
        match self.world_to_cell(point) {
            Some((gx, gz)) => self.is_cell_walkable(gx, gz),
            None => false,
        }
    }

    pub fn set_blocked(&mut self, gx: usize, gz: usize) {
        if gx < self.width && gz < self.height {
            self.cells[gz * self.width + gx] = BLOCKED;
        }
    }

    pub fn set_walkable(&mut self, gx: usize, gz: usize) {
        if gx < self.width && gz < self.height {
            self.cells[gz * self.width + gx] = WALKABLE;
        }
    }

    /// Marks every cell whose center lies within the rectangle.
    pub fn block_rect(&mut self, rect: &Rect) {
        self.fill_rect(rect, BLOCKED);
    }

    /// Re-opens every cell whose center lies within the rectangle.
    pub fn clear_rect(&mut self, rect: &Rect) {
        self.fill_rect(rect, WALKABLE);
    }

    fn fill_rect(&mut self, rect: &Rect, value: u8) {
        let min_gx = ((rect.min_x() - self.origin.x) / GRID_RESOLUTION).floor().max(0.0) as usize;
        let min_gz = ((rect.min_z() - self.origin.z) / GRID_RESOLUTION).floor().max(0.0) as usize;
        let max_gx = ((rect.max_x() - self.origin.x) / GRID_RESOLUTION).ceil() as usize;
        let max_gz = ((rect.max_z() - self.origin.z) / GRID_RESOLUTION).ceil() as usize;

        for gz in min_gz..max_gz.min(self.height) {
            for gx in min_gx..max_gx.min(self.width) {
                let center = self.cell_center(gx, gz);
                if rect.contains(center) {
                    self.cells[gz * self.width + gx] = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> CollisionGrid {
        CollisionGrid::new(MapBounds::centered(20.0))
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = small_grid();
        assert!(!grid.is_walkable(Vec2::new(100.0, 0.0)));
        assert!(grid.is_walkable(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn block_then_clear_round_trips() {
        let mut grid = small_grid();
        let rect = Rect::new(Vec2::new(2.0, 2.0), 4.0, 4.0);
        grid.block_rect(&rect);
        assert!(!grid.is_walkable(Vec2::new(2.0, 2.0)));
        assert!(grid.is_walkable(Vec2::new(-5.0, -5.0)));
        grid.clear_rect(&rect);
        assert!(grid.is_walkable(Vec2::new(2.0, 2.0)));
    }
}
