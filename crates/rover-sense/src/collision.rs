//! Point and footprint collision queries against an arena.

use rover_arena::Arena;
use rover_core::{ObstacleKind, ObstacleRef, Occupancy, Point};

use crate::footprint::Footprint;
use crate::sensor::{march, SensorConfig};

/// Read-only collision queries over a borrowed [`Arena`].
///
/// The single source of truth for "can a robot occupy this pose".
/// Obstacles are tested through their bounding boxes with closed-interval
/// containment, in the order hills, rocks, walls, cliffs. Coordinates
/// outside the arena are ordinary space; only walls bound it.
#[derive(Clone, Copy, Debug)]
pub struct CollisionDetector<'a> {
    arena: &'a Arena,
    footprint: Footprint,
}

impl<'a> CollisionDetector<'a> {
    /// A detector for the standard robot footprint.
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_footprint(arena, Footprint::ROBOT)
    }

    /// A detector for a custom footprint.
    pub fn with_footprint(arena: &'a Arena, footprint: Footprint) -> Self {
        Self { arena, footprint }
    }

    /// The arena being queried.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// The footprint used by [`can_occupy`](Self::can_occupy) and
    /// [`can_rotate`](Self::can_rotate).
    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Whether the axis-aligned body centred on `(x, y)` is collision-free.
    pub fn can_occupy(&self, x: i32, y: i32) -> bool {
        self.footprint.fits(self, Point::new(x, y))
    }

    /// Whether the body centred on `(x, y)` and rotated by `heading` is
    /// collision-free.
    pub fn can_rotate(&self, x: i32, y: i32, heading: f64) -> bool {
        self.footprint.fits_rotated(self, Point::new(x, y), heading)
    }

    /// Free beam samples along `angle` before the first blocked one.
    ///
    /// Ranges from 0 (the centre itself is blocked) to
    /// [`SensorConfig::max_steps`] (nothing in range).
    pub fn clearance(&self, x: i32, y: i32, angle: f64, beam: &SensorConfig) -> u32 {
        let mut clear = 0;
        for (_, p) in march(Point::new(x, y), angle, beam) {
            if self.is_blocked(p) {
                break;
            }
            clear += 1;
        }
        clear
    }
}

impl Occupancy for CollisionDetector<'_> {
    fn blocked_at(&self, p: Point) -> Option<ObstacleRef> {
        ObstacleKind::ALL.into_iter().find_map(|kind| {
            self.arena
                .obstacles(kind)
                .iter()
                .position(|o| o.contains(p))
                .map(|index| ObstacleRef { kind, index })
        })
    }

    fn blocked_by(&self, kind: ObstacleKind, p: Point) -> bool {
        self.arena.obstacles(kind).iter().any(|o| o.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::Obstacle;

    fn walled() -> Arena {
        Arena::walled(800, 500, 20).unwrap()
    }

    #[test]
    fn border_walls_block_edges() {
        let arena = walled();
        let det = CollisionDetector::new(&arena);
        assert!(det.is_blocked(Point::new(0, 0)));
        assert!(det.is_blocked(Point::new(400, 20)));
        assert!(!det.is_blocked(Point::new(400, 21)));
        assert!(det.is_blocked(Point::new(780, 250)));
        assert!(!det.is_blocked(Point::new(779, 250)));
    }

    #[test]
    fn outside_the_arena_is_open() {
        let arena = walled();
        let det = CollisionDetector::new(&arena);
        assert!(!det.is_blocked(Point::new(-50, -50)));
        assert!(!det.is_blocked(Point::new(900, 600)));
    }

    #[test]
    fn hills_are_reported_before_rocks() {
        let mut arena = walled();
        arena.push(Obstacle::rectangle(ObstacleKind::Rock, 300, 300, 20, 20).unwrap());
        arena.push(Obstacle::rectangle(ObstacleKind::Hill, 290, 290, 40, 40).unwrap());
        let det = CollisionDetector::new(&arena);
        let hit = det.blocked_at(Point::new(305, 305)).unwrap();
        assert_eq!(hit.kind, ObstacleKind::Hill);
        assert!(det.blocked_by(ObstacleKind::Rock, Point::new(305, 305)));
    }

    #[test]
    fn can_occupy_respects_box_extent() {
        let arena = walled();
        let det = CollisionDetector::new(&arena);
        // Left wall covers x <= 20; body spans x-12..=x+12.
        assert!(det.can_occupy(33, 250));
        assert!(!det.can_occupy(32, 250));
        // Top wall covers y <= 20; body spans y-25..=y+24.
        assert!(det.can_occupy(400, 46));
        assert!(!det.can_occupy(400, 45));
        // Bottom wall starts at y = 480.
        assert!(det.can_occupy(400, 455));
        assert!(!det.can_occupy(400, 456));
    }

    #[test]
    fn can_rotate_detects_swept_corner() {
        let arena = walled();
        let det = CollisionDetector::new(&arena);
        // Upright clearance of 13 from the left wall, but a quarter turn
        // swings the long axis into it.
        assert!(det.can_rotate(34, 250, 0.0));
        assert!(!det.can_rotate(34, 250, std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn clearance_counts_free_samples() {
        let arena = walled();
        let det = CollisionDetector::new(&arena);
        let beam = SensorConfig::default();
        assert_eq!(det.clearance(400, 250, 0.0, &beam), 32);
        // Heading up from y=120: samples at 120, 115, ..., 25 are free,
        // 20 is the wall.
        assert_eq!(det.clearance(400, 120, -std::f64::consts::FRAC_PI_2, &beam), 20);
        // Centre inside a wall.
        assert_eq!(det.clearance(10, 10, 0.0, &beam), 0);
    }
}
