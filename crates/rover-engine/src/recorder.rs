//! The shared exploration map.

use indexmap::{IndexMap, IndexSet};
use rover_core::{Classification, Point, ScannedPoint};

/// Visited points and detected obstacle points, shared by every robot.
///
/// Inserts are idempotent and nothing is ever evicted; both collections
/// are cleared together by [`clear()`](Self::clear). Iteration follows
/// first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct TrailRecorder {
    visited: IndexSet<Point>,
    obstacles: IndexMap<Point, Classification>,
}

impl TrailRecorder {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited point. Returns `true` if it was new.
    pub fn record_visited(&mut self, p: Point) -> bool {
        self.visited.insert(p)
    }

    /// Record an obstacle point. A repeated point keeps its position in
    /// iteration order and takes the latest classification.
    pub fn record_obstacle(&mut self, p: Point, classification: Classification) {
        self.obstacles.insert(p, classification);
    }

    /// Record a sensor detection.
    pub fn record_detection(&mut self, detection: ScannedPoint) {
        self.record_obstacle(detection.point, detection.classification);
    }

    /// Whether `p` is on the map, as a visited point or an obstacle.
    pub fn contains(&self, p: Point) -> bool {
        self.visited.contains(&p) || self.obstacles.contains_key(&p)
    }

    /// Classification recorded for an obstacle point.
    pub fn obstacle_at(&self, p: Point) -> Option<Classification> {
        self.obstacles.get(&p).copied()
    }

    /// Visited points in insertion order.
    pub fn visited(&self) -> &IndexSet<Point> {
        &self.visited
    }

    /// Obstacle points in insertion order.
    pub fn obstacles(&self) -> &IndexMap<Point, Classification> {
        &self.obstacles
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.visited.clear();
        self.obstacles.clear();
    }

    /// Owned copy for a renderer.
    pub fn snapshot(&self) -> TrailSnapshot {
        TrailSnapshot {
            visited: self.visited.iter().copied().collect(),
            obstacles: self.obstacles.iter().map(|(p, c)| (*p, *c)).collect(),
        }
    }
}

/// Owned copy of a [`TrailRecorder`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrailSnapshot {
    /// Visited points in insertion order.
    pub visited: Vec<Point>,
    /// Obstacle points with their latest classification.
    pub obstacles: Vec<(Point, Classification)>,
}
