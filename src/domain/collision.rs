// Movement resolution and visibility queries over the static grid. All
// methods are pure reads, safe to share across the tick loop and the
// pathfinding worker.

use std::sync::Arc;

use crate::domain::map::{CollisionGrid, GRID_RESOLUTION};
use crate::domain::math::Vec2;

const SLIDE_SMOOTHING: f32 = 0.8;

const DIAGONAL: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Fixed probe directions, cardinals first. The ordering is part of the
/// movement contract: the first walkable probe wins.
const PROBE_DIRECTIONS: [Vec2; 8] = [
    Vec2 { x: 1.0, z: 0.0 },
    Vec2 { x: -1.0, z: 0.0 },
    Vec2 { x: 0.0, z: 1.0 },
    Vec2 { x: 0.0, z: -1.0 },
    Vec2 { x: DIAGONAL, z: DIAGONAL },
    Vec2 { x: DIAGONAL, z: -DIAGONAL },
    Vec2 { x: -DIAGONAL, z: DIAGONAL },
    Vec2 { x: -DIAGONAL, z: -DIAGONAL },
];

#[derive(Clone)]
pub struct CollisionResolver {
    grid: Arc<CollisionGrid>,
}

impl CollisionResolver {
    pub fn new(grid: Arc<CollisionGrid>) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Arc<CollisionGrid> {
        &self.grid
    }

    pub fn is_walkable(&self, point: Vec2) -> bool {
        self.grid.is_walkable(point)
    }

    /// Center plus 8 evenly spaced rim points. An approximation: a circle
    /// can report blocked at sharp concave corners even when its center
    /// fits. Kept as-is for movement-feel parity.
    pub fn is_circle_walkable(&self, center: Vec2, radius: f32) -> bool {
        if !self.grid.is_walkable(center) {
            return false;
        }
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_4;
            let rim = Vec2::new(
                center.x + angle.cos() * radius,
                center.z + angle.sin() * radius,
            );
            if !self.grid.is_walkable(rim) {
                return false;
            }
        }
        true
    }

    /// Resolves a desired move against the grid. Tries, in order: the full
    /// move, axis-separated slides at shrinking fractions, eight half-length
    /// directional probes, and finally staying put. Ordering is canonical.
    pub fn move_with_collision(&self, current: Vec2, desired: Vec2, radius: f32) -> Vec2 {
        if self.is_circle_walkable(desired, radius) {
            return desired;
        }

        let delta = desired - current;
        for i in 1..=4 {
            let fraction = 1.0 - i as f32 * 0.2;
            let slide_x = Vec2::new(
                current.x + delta.x * SLIDE_SMOOTHING * fraction,
                current.z,
            );
            if self.is_circle_walkable(slide_x, radius) {
                return slide_x;
            }
        }
        for i in 1..=4 {
            let fraction = 1.0 - i as f32 * 0.2;
            let slide_z = Vec2::new(
                current.x,
                current.z + delta.z * SLIDE_SMOOTHING * fraction,
            );
            if self.is_circle_walkable(slide_z, radius) {
                return slide_z;
            }
        }

        let length = delta.length();
        if length > 1e-4 {
            let step = length * 0.5;
            for direction in PROBE_DIRECTIONS {
                let probe = current + direction.scaled(step);
                if self.is_circle_walkable(probe, radius) {
                    return probe;
                }
            }
        }
        current
    }

    /// Discretizes the segment at grid resolution; any blocked intermediate
    /// cell breaks sight. Near-zero segments trivially succeed.
    pub fn has_line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance < GRID_RESOLUTION {
            return true;
        }
        let direction = delta.normalized();
        let steps = (distance / GRID_RESOLUTION).ceil() as u32;
        for i in 1..steps {
            let sample = from + direction.scaled(i as f32 * GRID_RESOLUTION);
            if !self.grid.is_walkable(sample) {
                return false;
            }
        }
        true
    }

    /// Expanding ring search in resolution-sized steps, at least 8 angular
    /// samples per ring.
    pub fn find_nearest_walkable(&self, point: Vec2, max_radius: f32) -> Option<Vec2> {
        if self.grid.is_walkable(point) {
            return Some(point);
        }
        let rings = (max_radius / GRID_RESOLUTION).ceil() as u32;
        for ring in 1..=rings {
            let radius = ring as f32 * GRID_RESOLUTION;
            let circumference = std::f32::consts::TAU * radius;
            let samples = ((circumference / GRID_RESOLUTION).ceil() as u32).max(8);
            for k in 0..samples {
                let angle = k as f32 * std::f32::consts::TAU / samples as f32;
                let candidate = Vec2::new(
                    point.x + angle.cos() * radius,
                    point.z + angle.sin() * radius,
                );
                if self.grid.is_walkable(candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::MapBounds;
    use crate::domain::math::Rect;

    fn resolver_with_wall() -> CollisionResolver {
        let mut grid = CollisionGrid::new(MapBounds::centered(40.0));
        // Vertical wall at x = 5 spanning most of the map.
        grid.block_rect(&Rect::new(Vec2::new(5.0, 0.0), 1.0, 30.0));
        CollisionResolver::new(Arc::new(grid))
    }

    #[test]
    fn full_move_passes_in_open_space() {
        let resolver = resolver_with_wall();
        let result =
            resolver.move_with_collision(Vec2::new(-5.0, 0.0), Vec2::new(-3.0, 1.0), 0.4);
        assert_eq!(result, Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn blocked_move_slides_along_the_wall() {
        let resolver = resolver_with_wall();
        let current = Vec2::new(3.5, 0.0);
        let desired = Vec2::new(5.0, 2.0);
        let result = resolver.move_with_collision(current, desired, 0.4);
        assert!(resolver.is_circle_walkable(result, 0.4));
        assert_ne!(result, desired);
    }

    #[test]
    fn totally_blocked_move_returns_start() {
        let mut grid = CollisionGrid::new(MapBounds::centered(20.0));
        // Everything except a single pocket is blocked.
        grid.block_rect(&Rect::new(Vec2::ZERO, 20.0, 20.0));
        grid.clear_rect(&Rect::new(Vec2::new(-8.0, -8.0), 1.0, 1.0));
        let resolver = CollisionResolver::new(Arc::new(grid));

        let start = Vec2::new(-8.0, -8.0);
        let result = resolver.move_with_collision(start, Vec2::new(0.0, 0.0), 0.3);
        assert_eq!(result, start);
    }

    #[test]
    fn wall_breaks_line_of_sight() {
        let resolver = resolver_with_wall();
        assert!(!resolver.has_line_of_sight(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)));
        assert!(resolver.has_line_of_sight(Vec2::new(-10.0, 0.0), Vec2::new(0.0, 0.0)));
        // Degenerate segment.
        assert!(resolver.has_line_of_sight(Vec2::new(5.0, 0.0), Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn nearest_walkable_escapes_a_blocked_cell() {
        let resolver = resolver_with_wall();
        let inside_wall = Vec2::new(5.0, 0.0);
        let found = resolver
            .find_nearest_walkable(inside_wall, 5.0)
            .expect("open space nearby");
        assert!(resolver.is_walkable(found));
    }
}
