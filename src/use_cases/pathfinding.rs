// Asynchronous pathfinding service. The tick loop only enqueues requests
// and polls cached results; A* runs on a separate worker task fed with
// batched request messages, so a slow search can never stall a tick.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::map::CollisionGrid;
use crate::domain::math::Vec2;
use crate::domain::path::{self, PathPlanner, PathQuery};
use crate::domain::tuning::combat::WAYPOINT_RADIUS;

#[derive(Debug, Clone)]
pub struct PathRequest {
    pub entity_id: u64,
    pub start: Vec2,
    pub goal: Vec2,
}

#[derive(Debug, Clone)]
pub struct PathResult {
    pub entity_id: u64,
    pub waypoints: Option<Vec<Vec2>>,
}

struct PathEntry {
    query: PathQuery,
    waypoints: Vec<Vec2>,
    cursor: usize,
}

pub struct PathfindingService {
    grid: Arc<CollisionGrid>,
    queue: Vec<PathRequest>,
    batch_tx: mpsc::Sender<Vec<PathRequest>>,
    result_rx: mpsc::Receiver<Vec<PathResult>>,
    cache: HashMap<u64, PathEntry>,
    /// Ticks between batch dispatches.
    flush_interval_ticks: u64,
    last_flush_tick: u64,
    /// One restart is attempted when the worker dies; after that requests
    /// are dropped silently and consumers fall back to local behavior.
    restart_attempted: bool,
    worker_down: bool,
}

impl PathfindingService {
    /// Spawns the worker task for one game instance. The worker holds its
    /// own `Arc` to the immutable grid; no locking is involved.
    pub fn spawn(grid: Arc<CollisionGrid>, flush_interval_ticks: u64) -> Self {
        let (batch_tx, result_rx) = spawn_worker(grid.clone());
        Self {
            grid,
            queue: Vec::new(),
            batch_tx,
            result_rx,
            cache: HashMap::new(),
            flush_interval_ticks,
            last_flush_tick: 0,
            restart_attempted: false,
            worker_down: false,
        }
    }

    /// Dispatches the queued batch when the cadence interval has elapsed.
    pub fn maybe_flush(&mut self, tick: u64) {
        if tick.saturating_sub(self.last_flush_tick) < self.flush_interval_ticks {
            return;
        }
        self.last_flush_tick = tick;
        if self.queue.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.queue);
        if self.worker_down {
            self.fail_batch(&batch);
            return;
        }
        if let Err(error) = self.batch_tx.try_send(batch) {
            match error {
                // Backpressure: shed this batch, the cadence will retry.
                mpsc::error::TrySendError::Full(batch) => self.fail_batch(&batch),
                // A closed channel means the worker died.
                mpsc::error::TrySendError::Closed(batch) => self.handle_worker_failure(batch),
            }
        }
    }

    /// Drains any finished batches into the per-entity cache.
    pub fn poll_results(&mut self) {
        while let Ok(results) = self.result_rx.try_recv() {
            for result in results {
                let entry = match result.waypoints {
                    Some(waypoints) if !waypoints.is_empty() => PathEntry {
                        query: PathQuery::Ready,
                        waypoints,
                        cursor: 0,
                    },
                    // A zero-length path is a failure, distinct from
                    // "no path yet requested".
                    _ => PathEntry {
                        query: PathQuery::Failed,
                        waypoints: Vec::new(),
                        cursor: 0,
                    },
                };
                self.cache.insert(result.entity_id, entry);
            }
        }
    }

    fn handle_worker_failure(&mut self, batch: Vec<PathRequest>) {
        if self.restart_attempted {
            self.worker_down = true;
            self.fail_batch(&batch);
            return;
        }
        warn!("pathfinding worker unreachable, restarting");
        self.restart_attempted = true;
        let (batch_tx, result_rx) = spawn_worker(self.grid.clone());
        self.batch_tx = batch_tx;
        self.result_rx = result_rx;
        if self.batch_tx.try_send(batch).is_err() {
            self.worker_down = true;
        }
    }

    fn fail_batch(&mut self, batch: &[PathRequest]) {
        for request in batch {
            self.cache.insert(
                request.entity_id,
                PathEntry {
                    query: PathQuery::Failed,
                    waypoints: Vec::new(),
                    cursor: 0,
                },
            );
        }
    }
}

impl PathPlanner for PathfindingService {
    /// Enqueues without blocking. A refresh for an entity that already has
    /// a usable path keeps the old waypoints until the reply lands.
    fn request_path(&mut self, entity_id: u64, start: Vec2, goal: Vec2) {
        // One queued request per entity; the newest goal wins.
        self.queue.retain(|request| request.entity_id != entity_id);
        self.queue.push(PathRequest {
            entity_id,
            start,
            goal,
        });
        match self.cache.get(&entity_id) {
            Some(entry) if entry.query == PathQuery::Ready => {}
            _ => {
                self.cache.insert(
                    entity_id,
                    PathEntry {
                        query: PathQuery::Pending,
                        waypoints: Vec::new(),
                        cursor: 0,
                    },
                );
            }
        }
    }

    fn path_state(&self, entity_id: u64) -> PathQuery {
        self.cache
            .get(&entity_id)
            .map(|entry| entry.query)
            .unwrap_or(PathQuery::NotRequested)
    }

    fn move_direction(&mut self, entity_id: u64, position: Vec2) -> Option<Vec2> {
        let entry = self.cache.get_mut(&entity_id)?;
        if entry.query != PathQuery::Ready {
            return None;
        }
        while entry.cursor < entry.waypoints.len()
            && entry.waypoints[entry.cursor].distance_to(position) < WAYPOINT_RADIUS
        {
            entry.cursor += 1;
        }
        let next = entry.waypoints.get(entry.cursor)?;
        Some((*next - position).normalized())
    }

    fn forget(&mut self, entity_id: u64) {
        self.cache.remove(&entity_id);
        self.queue.retain(|request| request.entity_id != entity_id);
    }
}

fn spawn_worker(
    grid: Arc<CollisionGrid>,
) -> (
    mpsc::Sender<Vec<PathRequest>>,
    mpsc::Receiver<Vec<PathResult>>,
) {
    let (batch_tx, batch_rx) = mpsc::channel::<Vec<PathRequest>>(64);
    let (result_tx, result_rx) = mpsc::channel::<Vec<PathResult>>(64);
    tokio::spawn(pathfinding_worker(grid, batch_rx, result_tx));
    (batch_tx, result_rx)
}

/// Worker loop: compute every request in a batch, reply, repeat. Exits when
/// the service side drops its channels at game teardown.
async fn pathfinding_worker(
    grid: Arc<CollisionGrid>,
    mut batch_rx: mpsc::Receiver<Vec<PathRequest>>,
    result_tx: mpsc::Sender<Vec<PathResult>>,
) {
    while let Some(batch) = batch_rx.recv().await {
        let results: Vec<PathResult> = batch
            .into_iter()
            .map(|request| PathResult {
                entity_id: request.entity_id,
                waypoints: path::find_path(&grid, request.start, request.goal),
            })
            .collect();
        debug!(count = results.len(), "path batch computed");
        if result_tx.send(results).await.is_err() {
            // Instance torn down; discard and exit.
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::MapBounds;

    fn open_grid() -> Arc<CollisionGrid> {
        Arc::new(CollisionGrid::new(MapBounds::centered(40.0)))
    }

    #[tokio::test]
    async fn when_no_request_was_made_then_state_is_not_requested() {
        let service = PathfindingService::spawn(open_grid(), 1);
        assert_eq!(service.path_state(7), PathQuery::NotRequested);
    }

    #[tokio::test]
    async fn when_batch_completes_then_path_becomes_ready() {
        let mut service = PathfindingService::spawn(open_grid(), 1);
        service.request_path(1, Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(service.path_state(1), PathQuery::Pending);

        service.maybe_flush(10);
        // Give the worker a moment to reply.
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            service.poll_results();
            if service.path_state(1) == PathQuery::Ready {
                break;
            }
        }
        assert_eq!(service.path_state(1), PathQuery::Ready);

        let direction = service
            .move_direction(1, Vec2::new(-10.0, 0.0))
            .expect("path should give a direction");
        assert!(direction.x > 0.9);
    }

    #[tokio::test]
    async fn when_entity_is_forgotten_then_cache_is_cleared() {
        let mut service = PathfindingService::spawn(open_grid(), 1);
        service.request_path(3, Vec2::ZERO, Vec2::new(5.0, 5.0));
        service.forget(3);
        assert_eq!(service.path_state(3), PathQuery::NotRequested);
        assert!(service.queue.is_empty());
    }
}
