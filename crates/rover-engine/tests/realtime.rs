//! Timer-thread lifecycle tests.

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use rover_core::{Point, RobotId};
use rover_engine::{RealtimeSimulation, Robot, SimError, SimEvent, Simulation, SimulationConfig};
use rover_test_utils::walled_arena;

fn fast_config() -> SimulationConfig {
    let mut cfg = SimulationConfig::with_seed(17);
    cfg.timing.wiggle_period = Duration::from_millis(10);
    cfg.timing.explore_period = Duration::from_millis(2);
    cfg.timing.reverse_period = Duration::from_millis(2);
    cfg
}

/// One robot 80 units from the right wall, facing it.
fn facing_wall() -> Simulation {
    let mut sim = Simulation::new(fast_config()).unwrap();
    sim.initialize(
        walled_arena(),
        vec![Robot::new(RobotId(0), Point::new(700, 250), 0.0)],
    );
    sim
}

fn explore_ticks(rt: &RealtimeSimulation) -> u64 {
    rt.with(|sim| sim.metrics().explore_ticks).unwrap()
}

fn wait_for(rt: &RealtimeSimulation, pred: impl Fn(&Simulation) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !rt.with(|sim| pred(sim)).unwrap() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn threads_tick_and_stop() {
    let sim = Simulation::generate(fast_config()).unwrap();
    let mut rt = RealtimeSimulation::new(sim).unwrap();
    wait_for(&rt, |sim| {
        let m = sim.metrics();
        m.explore_ticks > 0 && m.reverse_ticks > 0 && m.wiggle_ticks > 0
    });

    let report = rt.shutdown();
    assert_eq!(report.threads_joined, 3);
    assert!(report.ticks.wiggle > 0);
    assert!(report.ticks.explore > 0);
    assert!(report.ticks.reverse > 0);

    // State stays readable after the threads are gone.
    let ticks = explore_ticks(&rt);
    thread::sleep(Duration::from_millis(10));
    assert_eq!(explore_ticks(&rt), ticks);
}

#[test]
fn pause_gates_exploration_only() {
    let rt = RealtimeSimulation::new(facing_wall()).unwrap();
    wait_for(&rt, |sim| sim.metrics().explore_ticks > 0);

    rt.pause();
    assert!(rt.is_paused());
    // Let any tick already past the gate finish.
    thread::sleep(Duration::from_millis(20));
    let paused_at = explore_ticks(&rt);
    let reverse_at = rt.with(|sim| sim.metrics().reverse_ticks).unwrap();
    thread::sleep(Duration::from_millis(40));
    assert_eq!(explore_ticks(&rt), paused_at);
    assert!(rt.with(|sim| sim.metrics().reverse_ticks).unwrap() > reverse_at);

    rt.resume();
    assert!(!rt.is_paused());
    wait_for(&rt, |sim| sim.metrics().explore_ticks > paused_at);
}

#[test]
fn detections_reach_observers() {
    let rt = RealtimeSimulation::new(facing_wall()).unwrap();
    let event = rt
        .events()
        .recv_timeout(Duration::from_secs(5))
        .expect("no event within 5s");
    assert!(matches!(
        event,
        SimEvent::ObstacleDetected {
            robot: RobotId(0),
            ..
        }
    ));
}

#[test]
fn slow_observer_loses_events_not_ticks() {
    let mut cfg = fast_config();
    cfg.timing.event_capacity = 1;
    let mut sim = Simulation::new(cfg).unwrap();
    sim.initialize(
        walled_arena(),
        vec![Robot::new(RobotId(0), Point::new(700, 250), 0.0)],
    );
    let mut rt = RealtimeSimulation::new(sim).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while rt.events_dropped() == 0 {
        assert!(Instant::now() < deadline, "no events dropped");
        thread::sleep(Duration::from_millis(5));
    }
    let report = rt.shutdown();
    assert!(report.events_dropped > 0);
    assert!(report.ticks.explore > 1);
}

#[test]
fn panicking_closure_poisons_the_handle() {
    let mut rt = RealtimeSimulation::new(facing_wall()).unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _: Result<(), SimError> = rt.with(|_| panic!("observer bug"));
    }));
    assert!(result.is_err());
    assert_eq!(rt.with(|_| ()), Err(SimError::Poisoned));

    // Timer threads notice the poison and exit; shutdown still joins them.
    let report = rt.shutdown();
    assert_eq!(report.threads_joined, 3);
}

#[test]
fn drop_stops_threads() {
    let rt = RealtimeSimulation::new(facing_wall()).unwrap();
    wait_for(&rt, |sim| sim.metrics().explore_ticks > 2);
    let start = Instant::now();
    drop(rt);
    assert!(start.elapsed() < Duration::from_secs(2));
}
