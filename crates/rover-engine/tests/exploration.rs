//! Lockstep exploration scenarios.

use proptest::prelude::*;
use rover_arena::ArenaGenerator;
use rover_core::{Point, RobotId};
use rover_engine::{
    ControllerConfig, CursorStep, ExplorationController, MotionState, Robot, SimEvent,
    Simulation, SimulationConfig,
};
use rover_sense::{CollisionDetector, Sensor};
use rover_test_utils::{arena_with, hill, rock, seeded_rng, walled_arena};

fn sim_with(robots: Vec<Robot>) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::with_seed(42)).unwrap();
    sim.initialize(walled_arena(), robots);
    sim
}

fn reverse_until_finished(sim: &mut Simulation) -> u32 {
    for _ in 0..100 {
        sim.reverse_tick();
        if let Some(steps) = sim.drain_events().into_iter().find_map(|e| match e {
            SimEvent::ReversalFinished { steps, .. } => Some(steps),
            _ => None,
        }) {
            return steps;
        }
    }
    panic!("reversal episode never finished");
}

// ── Wall scenario ───────────────────────────────────────────────

#[test]
fn blocked_by_wall_starts_reversing_in_same_tick() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(767, 250), 0.0)]);
    sim.explore_tick();

    let robot = sim.robot(RobotId(0)).unwrap();
    assert_eq!(robot.state(), MotionState::Reversing);
    assert!(robot.is_moving_backwards());
    assert_eq!(robot.position(), Point::new(767, 250));

    let (sin, cos) = robot.heading().sin_cos();
    let (bx, by) = robot.back_vector();
    assert!((bx + 3.0 * cos).abs() < 1e-9);
    assert!((by + 3.0 * sin).abs() < 1e-9);

    assert_eq!(sim.metrics().blocked_steps, 1);
    let events = sim.drain_events();
    assert!(events.contains(&SimEvent::ReversalStarted {
        robot: RobotId(0),
        at: Point::new(767, 250),
    }));
}

#[test]
fn reversing_robot_skips_forward_ticks() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(767, 250), 0.0)]);
    sim.explore_tick();
    let before = sim.robot(RobotId(0)).unwrap().clone();
    sim.explore_tick();
    assert_eq!(sim.robot(RobotId(0)).unwrap(), &before);
}

#[test]
fn reversal_is_bounded_and_resets() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(767, 250), 0.0)]);
    sim.explore_tick();
    let steps = reverse_until_finished(&mut sim);

    assert!(steps > 0 && steps <= 17, "steps = {steps}");
    let robot = sim.robot(RobotId(0)).unwrap();
    assert_eq!(robot.back_steps(), 0);
    assert!(!robot.is_moving_backwards());
    assert!(robot.is_wiggling());
    assert_eq!(sim.metrics().reversal_episodes, 1);
    assert_eq!(sim.metrics().back_steps, u64::from(steps));

    // The next forward tick leaves the transient state.
    sim.explore_tick();
    let state = sim.robot(RobotId(0)).unwrap().state();
    assert!(matches!(
        state,
        MotionState::Wiggling | MotionState::Avoiding | MotionState::Reversing
    ));
}

#[test]
fn blocked_back_step_ends_episode_early() {
    // Wedged between the right wall and a hill directly behind.
    let arena = arena_with([hill(725, 200, 29, 100)]);
    let mut sim = Simulation::new(SimulationConfig::with_seed(1)).unwrap();
    sim.initialize(arena, vec![Robot::new(RobotId(0), Point::new(767, 250), 0.0)]);

    sim.explore_tick();
    assert!(sim.robot(RobotId(0)).unwrap().is_moving_backwards());
    let steps = reverse_until_finished(&mut sim);
    assert!(steps < 17, "steps = {steps}");
}

#[test]
fn finished_reversal_resumes_every_robot() {
    let mut sim = sim_with(vec![
        Robot::new(RobotId(0), Point::new(767, 250), 0.0),
        Robot::new(RobotId(1), Point::new(300, 250), 0.0),
    ]);
    sim.explore_tick();
    assert!(sim.robot(RobotId(0)).unwrap().is_moving_backwards());
    assert!(!sim.robot(RobotId(1)).unwrap().is_moving_backwards());

    // Step until the episode is one tick from ending, then watch robot 1.
    while sim.robot(RobotId(0)).unwrap().back_steps() < 17 {
        assert!(!sim.reverse_tick());
    }
    let other = sim.robot(RobotId(1)).unwrap();
    let expected = other.heading() - other.rotation_factor() / 10.0;
    assert!(sim.reverse_tick());
    assert!((sim.robot(RobotId(1)).unwrap().heading() - expected).abs() < 1e-12);
}

#[test]
fn robots_around_a_hill_start_clear() {
    let arena = arena_with([hill(340, 220, 60, 60)]);
    let mut robots: Vec<Robot> = Vec::new();
    for y in [229, 230] {
        for dx in (0..60).step_by(6) {
            for k in 0..16u32 {
                let id = RobotId(robots.len() as u32);
                let heading = f64::from(k) * std::f64::consts::FRAC_PI_8 + 0.005;
                robots.push(Robot::new(id, Point::new(300 + dx, y), heading));
            }
        }
    }
    let mut sim = Simulation::new(SimulationConfig::with_seed(6)).unwrap();
    sim.initialize(arena, robots);

    let det = CollisionDetector::new(sim.arena());
    for robot in sim.robots() {
        let p = robot.position();
        assert!(robot.placement_adjusted());
        assert!(
            det.can_rotate(p.x, p.y, robot.heading()),
            "{:?} at {p:?} heading {}",
            robot.id(),
            robot.heading()
        );
    }
}

// ── Sensing during exploration ──────────────────────────────────

#[test]
fn open_space_records_trail_without_detections() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(400, 250), 0.0)]);
    for _ in 0..10 {
        sim.explore_tick();
    }
    assert_eq!(sim.metrics().detections, 0);
    assert!(sim.trail().obstacles().is_empty());
    assert!(!sim.trail().visited().is_empty());
    assert!(sim.trail().visited().len() <= 10);
    assert_eq!(sim.robot(RobotId(0)).unwrap().state(), MotionState::Wiggling);
}

#[test]
fn rock_detections_are_classified() {
    let mut sim = Simulation::new(SimulationConfig::with_seed(4)).unwrap();
    sim.initialize(
        arena_with([rock(470, 240, 20)]),
        vec![Robot::new(RobotId(0), Point::new(400, 250), 0.0)],
    );
    sim.explore_tick();
    let classes: Vec<_> = sim.trail().obstacles().values().copied().collect();
    assert_eq!(classes, vec![rover_core::Classification::Rock]);
    assert_eq!(
        sim.robot(RobotId(0)).unwrap().state(),
        MotionState::Avoiding
    );
}

#[test]
fn wiggle_tick_alternates_drift() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(400, 250), 0.0)]);
    let rf = sim.robot(RobotId(0)).unwrap().rotation_factor();
    assert_eq!(sim.wiggle_tick(), 1);
    assert_eq!(sim.robot(RobotId(0)).unwrap().rotation_factor(), -rf);
    assert_eq!(sim.wiggle_tick(), 1);
    assert_eq!(sim.robot(RobotId(0)).unwrap().rotation_factor(), rf);
}

// ── Manual control ──────────────────────────────────────────────

#[test]
fn cursor_on_robot_does_nothing() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(400, 250), 0.3)]);
    let before = sim.robot(RobotId(0)).unwrap().clone();
    sim.set_cursor(before.position());
    assert_eq!(sim.step_toward_cursor(), Ok(Some(CursorStep::Arrived)));
    assert_eq!(sim.robot(RobotId(0)).unwrap().position(), before.position());
    assert_eq!(sim.robot(RobotId(0)).unwrap().heading(), before.heading());
}

#[test]
fn cursor_pulls_first_robot_closer() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(200, 250), 0.0)]);
    let cursor = Point::new(600, 300);
    sim.set_cursor(cursor);
    let dist = |p: Point| f64::from(cursor.x - p.x).hypot(f64::from(cursor.y - p.y));
    let start = dist(sim.robot(RobotId(0)).unwrap().position());
    for _ in 0..20 {
        assert_eq!(sim.step_toward_cursor(), Ok(Some(CursorStep::Moved)));
    }
    let end = dist(sim.robot(RobotId(0)).unwrap().position());
    assert!(end < start - 20.0, "start {start}, end {end}");
    // Cursor steps do not extend the trail.
    assert!(sim.trail().visited().is_empty());
}

#[test]
fn cursor_stops_at_obstacles() {
    let mut sim = Simulation::new(SimulationConfig::with_seed(0)).unwrap();
    sim.initialize(
        arena_with([hill(415, 200, 40, 100)]),
        vec![Robot::new(RobotId(0), Point::new(400, 250), 0.0)],
    );
    sim.set_cursor(Point::new(700, 250));
    assert_eq!(sim.step_toward_cursor(), Ok(Some(CursorStep::Blocked)));
    assert_eq!(sim.robot(RobotId(0)).unwrap().position(), Point::new(400, 250));
}

// ── Scene control ───────────────────────────────────────────────

#[test]
fn visibility_does_not_change_collisions() {
    let mut sim = sim_with(vec![Robot::new(RobotId(0), Point::new(767, 250), 0.0)]);
    let probe = |sim: &Simulation| {
        let det = CollisionDetector::new(sim.arena());
        (det.can_occupy(770, 250), det.can_occupy(400, 250))
    };
    let before = probe(&sim);
    sim.toggle_obstacle_visibility();
    assert_eq!(probe(&sim), before);
    assert_eq!(before, (false, true));
}

#[test]
fn regenerate_replaces_scene() {
    let mut sim = Simulation::generate(SimulationConfig::with_seed(8)).unwrap();
    for _ in 0..20 {
        sim.explore_tick();
    }
    sim.regenerate(9).unwrap();
    assert_eq!(sim.config().seed, 9);
    assert_eq!(sim.robots().len(), 2);
    assert!(sim.trail().visited().is_empty());
    assert!(sim.robots().iter().all(Robot::placement_adjusted));
}

// ── Startup correction ──────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn settled_robots_can_rotate(
        seed in any::<u64>(),
        x in 0i32..800,
        y in 0i32..500,
        heading in -6.3f64..6.3,
    ) {
        let generated = ArenaGenerator::new(Default::default())
            .unwrap()
            .generate(&mut seeded_rng(seed))
            .unwrap();
        let det = CollisionDetector::new(&generated.arena);
        let ctl = ExplorationController::new(ControllerConfig::default(), Sensor::default());
        let mut robot = Robot::new(RobotId(0), Point::new(x, y), heading);

        ctl.settle(&mut robot, &det);
        let p = robot.position();
        prop_assert!(robot.placement_adjusted());
        prop_assert!(det.can_rotate(p.x, p.y, heading));
        prop_assert!(p.x >= x && p.y >= y && p.x - x == p.y - y);
    }

    #[test]
    fn generated_scenes_start_clear(seed in any::<u64>()) {
        let sim = Simulation::generate(SimulationConfig::with_seed(seed)).unwrap();
        let det = CollisionDetector::new(sim.arena());
        for robot in sim.robots() {
            let p = robot.position();
            prop_assert!(robot.placement_adjusted());
            prop_assert!(det.can_rotate(p.x, p.y, robot.heading()));
        }
    }
}
