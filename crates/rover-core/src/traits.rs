//! Core traits: the occupancy query that sensing and movement are
//! written against.

use crate::geometry::Point;
use crate::obstacle::{ObstacleKind, ObstacleRef};

/// Point-level occupancy of the arena.
///
/// Implemented by the collision detector over a borrowed arena, and by
/// test doubles. Coordinates outside the arena are ordinary space: an
/// implementation reports a point as blocked only when an obstacle
/// covers it.
pub trait Occupancy {
    /// The first obstacle covering `p`, if any.
    fn blocked_at(&self, p: Point) -> Option<ObstacleRef>;

    /// Whether an obstacle of `kind` covers `p`.
    fn blocked_by(&self, kind: ObstacleKind, p: Point) -> bool;

    /// Whether any obstacle covers `p`.
    fn is_blocked(&self, p: Point) -> bool {
        self.blocked_at(p).is_some()
    }
}
