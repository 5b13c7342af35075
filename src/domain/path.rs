// Grid A* used by the pathfinding worker. Pure computation over the shared
// collision grid; the batching and caching around it live in use_cases.

use std::collections::BinaryHeap;

use crate::domain::map::CollisionGrid;
use crate::domain::math::Vec2;

/// Expansion cap bounding worst-case latency. Exceeding it yields "no
/// path", never an unbounded search.
pub const MAX_EXPANSIONS: u32 = 2000;

/// How far (in cells) a blocked endpoint may be snapped to walkable ground.
const SNAP_RADIUS_CELLS: i32 = 20;

/// Interior waypoints with in/out directions this parallel get dropped.
const COLINEAR_DOT: f32 = 0.95;

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Observable lifecycle of one entity's path request. `Failed` is distinct
/// from both "still pending" and "never requested"; consumers pick between
/// waiting and falling back to local behavior based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathQuery {
    NotRequested,
    Pending,
    Ready,
    Failed,
}

/// Seam between the AI systems and whatever executes A*. The simulation
/// only ever enqueues requests and polls cached results; the execution
/// model behind the trait stays hidden.
pub trait PathPlanner {
    fn request_path(&mut self, entity_id: u64, start: Vec2, goal: Vec2);
    fn path_state(&self, entity_id: u64) -> PathQuery;
    /// Unit direction toward the next waypoint, advancing the cursor past
    /// any waypoint already within reach. `None` when exhausted or absent.
    fn move_direction(&mut self, entity_id: u64, position: Vec2) -> Option<Vec2>;
    fn forget(&mut self, entity_id: u64);
}

/// Computes a simplified waypoint path from `start` to `goal`, or `None`
/// when no route exists within the expansion cap.
pub fn find_path(grid: &CollisionGrid, start: Vec2, goal: Vec2) -> Option<Vec<Vec2>> {
    let start_cell = snap_to_walkable(grid, start)?;
    let goal_cell = snap_to_walkable(grid, goal)?;
    if start_cell == goal_cell {
        return Some(vec![grid.cell_center(goal_cell.0, goal_cell.1)]);
    }

    let cells = a_star(grid, start_cell, goal_cell)?;
    let waypoints: Vec<Vec2> = cells
        .iter()
        .map(|&(gx, gz)| grid.cell_center(gx, gz))
        .collect();
    Some(simplify(waypoints))
}

/// Returns the cell for `point`, snapped to the nearest walkable cell via a
/// square ring search when the cell itself is blocked.
fn snap_to_walkable(grid: &CollisionGrid, point: Vec2) -> Option<(usize, usize)> {
    let (gx, gz) = grid.world_to_cell(point).or_else(|| {
        // Out-of-bounds requests clamp to the grid edge first.
        let clamped = Vec2::new(
            point
                .x
                .clamp(grid.cell_center(0, 0).x, grid.cell_center(grid.width() - 1, 0).x),
            point
                .z
                .clamp(grid.cell_center(0, 0).z, grid.cell_center(0, grid.height() - 1).z),
        );
        grid.world_to_cell(clamped)
    })?;

    if grid.is_cell_walkable(gx, gz) {
        return Some((gx, gz));
    }
    for ring in 1..=SNAP_RADIUS_CELLS {
        for dz in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs().max(dz.abs()) != ring {
                    continue;
                }
                let nx = gx as i32 + dx;
                let nz = gz as i32 + dz;
                if nx < 0 || nz < 0 {
                    continue;
                }
                let (nx, nz) = (nx as usize, nz as usize);
                if grid.is_cell_walkable(nx, nz) {
                    return Some((nx, nz));
                }
            }
        }
    }
    None
}

#[derive(PartialEq)]
struct OpenNode {
    f_score: f32,
    index: usize,
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the BinaryHeap pops the lowest f-score first.
        other.f_score.total_cmp(&self.f_score)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn a_star(
    grid: &CollisionGrid,
    start: (usize, usize),
    goal: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let width = grid.width();
    let cell_count = width * grid.height();

    let mut g_scores = vec![f32::INFINITY; cell_count];
    let mut came_from = vec![usize::MAX; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();

    let start_index = start.1 * width + start.0;
    let goal_index = goal.1 * width + goal.0;
    g_scores[start_index] = 0.0;
    open.push(OpenNode {
        f_score: heuristic(start, goal),
        index: start_index,
    });

    let mut expansions = 0u32;
    while let Some(node) = open.pop() {
        if closed[node.index] {
            continue;
        }
        closed[node.index] = true;

        if node.index == goal_index {
            return Some(reconstruct(&came_from, node.index, width));
        }

        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return None;
        }

        let cx = node.index % width;
        let cz = node.index / width;
        for (dx, dz) in [
            (1i32, 0i32),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ] {
            let nx = cx as i32 + dx;
            let nz = cz as i32 + dz;
            if nx < 0 || nz < 0 {
                continue;
            }
            let (nx, nz) = (nx as usize, nz as usize);
            if !grid.is_cell_walkable(nx, nz) {
                continue;
            }
            let diagonal = dx != 0 && dz != 0;
            // No corner cutting: a diagonal needs both cardinals open.
            if diagonal
                && !(grid.is_cell_walkable(nx, cz) && grid.is_cell_walkable(cx, nz))
            {
                continue;
            }
            let neighbor_index = nz * width + nx;
            if closed[neighbor_index] {
                continue;
            }
            let step_cost = if diagonal { SQRT_2 } else { 1.0 };
            let tentative = g_scores[node.index] + step_cost;
            if tentative < g_scores[neighbor_index] {
                g_scores[neighbor_index] = tentative;
                came_from[neighbor_index] = node.index;
                open.push(OpenNode {
                    f_score: tentative + heuristic((nx, nz), goal),
                    index: neighbor_index,
                });
            }
        }
    }
    None
}

fn heuristic(from: (usize, usize), to: (usize, usize)) -> f32 {
    let dx = from.0 as f32 - to.0 as f32;
    let dz = from.1 as f32 - to.1 as f32;
    (dx * dx + dz * dz).sqrt()
}

fn reconstruct(came_from: &[usize], mut index: usize, width: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    loop {
        cells.push((index % width, index / width));
        index = came_from[index];
        if index == usize::MAX {
            break;
        }
    }
    cells.reverse();
    cells
}

/// Drops interior waypoints whose incoming and outgoing directions are
/// nearly colinear, shrinking the list without changing the corridor.
fn simplify(waypoints: Vec<Vec2>) -> Vec<Vec2> {
    if waypoints.len() <= 2 {
        return waypoints;
    }
    let mut simplified = vec![waypoints[0]];
    for i in 1..waypoints.len() - 1 {
        let incoming = (waypoints[i] - simplified[simplified.len() - 1]).normalized();
        let outgoing = (waypoints[i + 1] - waypoints[i]).normalized();
        if incoming.dot(outgoing) <= COLINEAR_DOT {
            simplified.push(waypoints[i]);
        }
    }
    simplified.push(waypoints[waypoints.len() - 1]);
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::MapBounds;
    use crate::domain::math::Rect;

    fn grid_with_wall() -> CollisionGrid {
        let mut grid = CollisionGrid::new(MapBounds::centered(40.0));
        // Wall across the middle with a gap near the south end.
        grid.block_rect(&Rect::new(Vec2::new(0.0, 2.5), 1.0, 35.0));
        grid.clear_rect(&Rect::new(Vec2::new(0.0, -14.0), 1.5, 2.0));
        grid
    }

    #[test]
    fn path_routes_through_the_gap() {
        let grid = grid_with_wall();
        let path = find_path(&grid, Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0))
            .expect("gap should be reachable");
        assert!(path.len() >= 2);
        // The route has to dip south to the opening.
        assert!(path.iter().any(|p| p.z < -12.0));
    }

    #[test]
    fn consecutive_waypoints_stay_mutually_visible() {
        let grid = grid_with_wall();
        let path = find_path(&grid, Vec2::new(-10.0, 5.0), Vec2::new(10.0, 5.0))
            .expect("path exists");
        let resolver =
            crate::domain::collision::CollisionResolver::new(std::sync::Arc::new(grid));
        for pair in path.windows(2) {
            assert!(
                resolver.has_line_of_sight(pair[0], pair[1]),
                "waypoints {:?} -> {:?} crossed a wall",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn sealed_goal_yields_no_path() {
        let mut grid = CollisionGrid::new(MapBounds::centered(40.0));
        // A chamber with walkable inside but no opening.
        grid.block_rect(&Rect::new(Vec2::new(10.0, 10.0), 6.0, 6.0));
        grid.clear_rect(&Rect::new(Vec2::new(10.0, 10.0), 3.0, 3.0));
        assert!(find_path(&grid, Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn blocked_start_snaps_to_nearby_ground() {
        let grid = grid_with_wall();
        // Start inside the wall itself.
        let path = find_path(&grid, Vec2::new(0.0, 5.0), Vec2::new(-10.0, 5.0));
        assert!(path.is_some());
    }

    #[test]
    fn straight_runs_collapse_to_endpoints() {
        let grid = CollisionGrid::new(MapBounds::centered(40.0));
        let path = find_path(&grid, Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0))
            .expect("open field path");
        assert!(path.len() <= 3, "straight path kept {} waypoints", path.len());
    }
}
