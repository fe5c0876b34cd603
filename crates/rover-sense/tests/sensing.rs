//! Sensing and collision scenarios in the standard walled arena.

use std::f64::consts::{FRAC_PI_2, PI};

use proptest::prelude::*;
use rover_core::{Classification, ObstacleKind, Occupancy, Point, Rect};
use rover_sense::{march, CollisionDetector, Sensor, SensorConfig};
use rover_test_utils::{
    arena_with, cliff, hill, rock, seeded_rng, walled_arena, CountingOccupancy, MockOccupancy,
};

#[test]
fn clear_arena_centre_sees_nothing() {
    let arena = walled_arena();
    let det = CollisionDetector::new(&arena);
    let sensor = Sensor::default();
    let mut rng = seeded_rng(0);
    for k in 0..64 {
        let heading = f64::from(k) * PI / 32.0;
        assert!(sensor.scan(&det, Point::new(400, 250), heading, &mut rng).is_empty());
    }
}

#[test]
fn wall_comes_into_range() {
    let arena = walled_arena();
    let det = CollisionDetector::new(&arena);
    let sensor = Sensor::default();

    let hit = sensor.cast(&det, Point::new(400, 120), -FRAC_PI_2).unwrap();
    assert_eq!(hit.point, Point::new(400, 20));
    assert_eq!(hit.step, 20);
    assert_eq!(hit.obstacle.kind, ObstacleKind::Wall);
    assert_eq!(hit.classification, Classification::Barrier);

    // One sample further away and the wall is out of range.
    assert!(sensor.cast(&det, Point::new(400, 176), -FRAC_PI_2).is_none());
}

#[test]
fn rock_under_hill_is_tagged_rock() {
    let arena = arena_with([hill(300, 240, 40, 20), rock(300, 245, 10)]);
    let det = CollisionDetector::new(&arena);
    let sensor = Sensor::default();

    let hit = sensor.cast(&det, Point::new(250, 250), 0.0).unwrap();
    assert_eq!(hit.point, Point::new(300, 250));
    assert_eq!(hit.obstacle.kind, ObstacleKind::Hill);
    assert_eq!(hit.classification, Classification::Rock);

    let hit = sensor.cast(&det, Point::new(250, 242), 0.0).unwrap();
    assert_eq!(hit.point, Point::new(300, 242));
    assert_eq!(hit.classification, Classification::Barrier);
}

#[test]
fn cliffs_block_through_their_bounding_box() {
    let arena = arena_with([cliff(300, 200, 50)]);
    let det = CollisionDetector::new(&arena);
    // Corner of the bounding square, outside the inscribed circle.
    assert!(det.is_blocked(Point::new(300, 200)));
    assert!(det.blocked_by(ObstacleKind::Cliff, Point::new(350, 250)));
}

#[test]
fn mock_occupancy_drives_the_sensor() {
    let occ = MockOccupancy::new().block(ObstacleKind::Rock, Rect::new(30, -5, 10, 10));
    let counting = CountingOccupancy::new(occ);
    let hit = Sensor::default().cast(&counting, Point::new(0, 0), 0.0).unwrap();
    assert_eq!(hit.step, 6);
    assert_eq!(hit.classification, Classification::Rock);
    assert_eq!(counting.queries(), 7);
}

#[test]
fn clearance_and_occupancy_agree_near_a_hill() {
    let arena = arena_with([hill(400, 200, 60, 60)]);
    let det = CollisionDetector::new(&arena);
    let beam = SensorConfig::default();
    assert_eq!(det.clearance(350, 230, 0.0, &beam), 10);
    assert!(det.can_occupy(387, 230));
    assert!(!det.can_occupy(388, 230));
}

proptest! {
    #[test]
    fn hits_lie_on_the_beam(
        x in 40i32..760,
        y in 40i32..460,
        heading in -10.0f64..10.0,
        seed in any::<u64>(),
    ) {
        let arena = arena_with([hill(300, 150, 80, 60), rock(550, 320, 25), cliff(150, 300, 60)]);
        let det = CollisionDetector::new(&arena);
        let sensor = Sensor::default();
        let origin = Point::new(x, y);
        let beam = sensor.config().clone();

        match sensor.cast(&det, origin, heading) {
            Some(hit) => {
                prop_assert!(hit.step < beam.max_steps());
                let samples: Vec<_> = march(origin, heading, &beam).collect();
                prop_assert_eq!(samples[hit.step as usize].1, hit.point);
                for (_, p) in &samples[..hit.step as usize] {
                    prop_assert!(!det.is_blocked(*p));
                }
                prop_assert_eq!(det.clearance(x, y, heading, &beam), hit.step);

                let mut rng = seeded_rng(seed);
                let found = sensor.scan(&det, origin, heading, &mut rng);
                prop_assert_eq!(found.len(), 1);
                prop_assert!((found[0].point.x - hit.point.x).abs() <= 10);
                prop_assert!((found[0].point.y - hit.point.y).abs() <= 10);
            }
            None => {
                prop_assert_eq!(det.clearance(x, y, heading, &beam), beam.max_steps());
            }
        }
    }
}
