//! The simulation: arena, robots and the shared trail map.
//!
//! [`Simulation`] is single-threaded. Each tick method runs one complete
//! transition for every robot and returns once the state is consistent,
//! so lockstep callers (tests, benchmarks, headless runs) can drive it
//! directly. [`RealtimeSimulation`](crate::RealtimeSimulation) wraps it in
//! a mutex and calls the same methods from timer threads.
//!
//! # Randomness
//!
//! All draws (arena generation, spawning, sensor and trail jitter, the
//! post-reversal coin flip) come from one `ChaCha8Rng` seeded from
//! [`SimulationConfig::seed`]. Two lockstep simulations built from the
//! same configuration and driven by the same tick sequence are identical.

use std::time::Instant;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rover_arena::{Arena, ArenaGenerator, ArenaSnapshot, GeneratedArena, GenerationReport};
use rover_core::{ObstacleRef, Point, RobotId, ScannedPoint};
use rover_sense::{BeamHit, CollisionDetector, Sensor};
use smallvec::SmallVec;

use crate::config::{ConfigError, SimulationConfig, MAX_ROBOTS};
use crate::controller::{CursorStep, ExplorationController, ReverseOutcome};
use crate::error::SimError;
use crate::event::{EventLog, SimEvent};
use crate::metrics::TickMetrics;
use crate::recorder::{TrailRecorder, TrailSnapshot};
use crate::robot::Robot;

/// Offset between consecutive spawned robots.
const SPAWN_STRIDE: (i32, i32) = (26, 51);

/// Obstacles hit during one tick, revealed once the detector is released.
type Hits = SmallVec<[ObstacleRef; 4]>;

// ── Simulation ──────────────────────────────────────────────────

/// Arena, robots and trail map advanced by three kinds of tick.
///
/// | Tick | Default period | Effect |
/// |------|----------------|--------|
/// | [`wiggle_tick`](Self::wiggle_tick) | 500 ms | flip each active robot's drift |
/// | [`explore_tick`](Self::explore_tick) | 30 ms | scan, steer and step every forward-moving robot |
/// | [`reverse_tick`](Self::reverse_tick) | 30 ms | back every reversing robot up one step |
pub struct Simulation {
    config: SimulationConfig,
    generator: ArenaGenerator,
    controller: ExplorationController,
    arena: Arena,
    robots: Vec<Robot>,
    recorder: TrailRecorder,
    rng: ChaCha8Rng,
    cursor: Option<Point>,
    obstacles_shown: bool,
    metrics: TickMetrics,
    events: EventLog,
    last_report: Option<GenerationReport>,
}

// Compile-time assertion: the realtime wrapper moves a Simulation
// behind a mutex shared with timer threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

impl Simulation {
    /// Create an empty simulation: an obstacle-free arena and no robots.
    ///
    /// Use [`initialize`](Self::initialize) to install a scene, or
    /// [`generate`](Self::generate) to build a random one.
    ///
    /// # Errors
    ///
    /// Returns the first invariant [`SimulationConfig::validate`] rejects.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = ArenaGenerator::new(config.placement.clone())?;
        let sensor = Sensor::new(config.sensor.clone())?;
        let controller = ExplorationController::new(config.controller.clone(), sensor);
        let arena = Arena::new(config.placement.width, config.placement.height);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let events = EventLog::new(config.timing.event_capacity);
        Ok(Self {
            config,
            generator,
            controller,
            arena,
            robots: Vec::new(),
            recorder: TrailRecorder::new(),
            rng,
            cursor: None,
            obstacles_shown: false,
            metrics: TickMetrics::default(),
            events,
            last_report: None,
        })
    }

    /// Create a simulation with a generated arena and
    /// [`robot_count`](SimulationConfig::robot_count) spawned robots.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, or if generation produced an
    /// obstacle the arena rejects.
    pub fn generate(config: SimulationConfig) -> Result<Self, SimError> {
        let seed = config.seed;
        let mut sim = Self::new(config)?;
        sim.regenerate(seed)?;
        Ok(sim)
    }

    /// Install obstacles and robots, replacing the current ones.
    ///
    /// Every robot starts wiggling first, which nudges its heading. Each
    /// robot not yet adjusted is then shifted diagonally until its body is
    /// clear at the heading it will actually move with. The trail map is
    /// kept; call [`reset_all`](Self::reset_all) first for a clean run.
    pub fn initialize(&mut self, arena: Arena, robots: Vec<Robot>) {
        self.arena = arena;
        self.robots = robots;
        self.obstacles_shown = false;

        let detector = CollisionDetector::new(&self.arena);
        for robot in &mut self.robots {
            self.controller.resume_wiggle(robot);
            self.controller.settle(robot, &detector);
        }
        info!(
            "initialized {} robots in a {}x{} arena with {} obstacles",
            self.robots.len(),
            self.arena.width(),
            self.arena.height(),
            self.arena.len()
        );
    }

    /// Reset, reseed and rebuild the whole scene.
    ///
    /// The first robot spawns at a random interior point; each further
    /// robot is offset by a fixed stride from the previous one and faces
    /// the opposite way. With the default stride and a spawn near the far
    /// corner, later robots can start outside the walls.
    ///
    /// # Errors
    ///
    /// Fails if generation produced an obstacle the arena rejects.
    pub fn regenerate(&mut self, seed: u64) -> Result<(), SimError> {
        self.reset_all();
        self.config.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        let GeneratedArena { arena, report } = self.generator.generate(&mut self.rng)?;
        let robots = self.spawn_robots();
        self.last_report = Some(report);
        self.initialize(arena, robots);
        Ok(())
    }

    fn spawn_robots(&mut self) -> Vec<Robot> {
        let placement = &self.config.placement;
        let inset = placement.wall_thickness + 1;
        let x = draw_between(&mut self.rng, inset, placement.width - inset);
        let y = draw_between(&mut self.rng, inset, placement.height - inset);
        let ctl = self.controller.config();

        // `robot_count` is validated to be at most MAX_ROBOTS.
        (0..MAX_ROBOTS)
            .take(self.config.robot_count)
            .map(|i| {
                let n = i32::from(i);
                let position = Point::new(x + n * SPAWN_STRIDE.0, y + n * SPAWN_STRIDE.1);
                let heading = f64::from(n) * std::f64::consts::PI;
                Robot::new(RobotId(u32::from(i)), position, heading)
                    .with_factors(ctl.rotation_factor, ctl.turn_factor)
            })
            .collect()
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Active configuration. `seed` reflects the last regeneration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// All robots, in id order for spawned scenes.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Look up a robot by id.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownRobot`] if no robot has that id.
    pub fn robot(&self, id: RobotId) -> Result<&Robot, SimError> {
        self.robots
            .iter()
            .find(|r| r.id() == id)
            .ok_or(SimError::UnknownRobot(id))
    }

    fn robot_index(&self, id: RobotId) -> Result<usize, SimError> {
        self.robots
            .iter()
            .position(|r| r.id() == id)
            .ok_or(SimError::UnknownRobot(id))
    }

    /// The arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Owned copy of the obstacle lists for renderers.
    pub fn arena_snapshot(&self) -> ArenaSnapshot {
        self.arena.snapshot()
    }

    /// The shared trail map.
    pub fn trail(&self) -> &TrailRecorder {
        &self.recorder
    }

    /// Owned copy of the trail map for renderers.
    pub fn trail_snapshot(&self) -> TrailSnapshot {
        self.recorder.snapshot()
    }

    /// Cumulative tick counters.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Report from the most recent arena generation, if any.
    pub fn generation_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// The current cursor target.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Whether obstacles are currently all shown.
    pub fn obstacles_shown(&self) -> bool {
        self.obstacles_shown
    }

    /// Take all undelivered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Events discarded because the buffer was full.
    pub fn events_dropped(&self) -> u64 {
        self.events.dropped()
    }

    // ── Manual control ──────────────────────────────────────────

    /// Set the heading used by [`steer_tick`](Self::steer_tick).
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownRobot`] if no robot has that id.
    pub fn set_target_heading(&mut self, id: RobotId, angle: f64) -> Result<(), SimError> {
        let i = self.robot_index(id)?;
        self.robots[i].set_target_heading(angle);
        Ok(())
    }

    /// Turn the robot to its target heading and take one step if clear.
    ///
    /// Returns whether the robot moved.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownRobot`] if no robot has that id.
    pub fn steer_tick(&mut self, id: RobotId) -> Result<bool, SimError> {
        let i = self.robot_index(id)?;
        let detector = CollisionDetector::new(&self.arena);
        Ok(self.controller.steer(&mut self.robots[i], &detector))
    }

    /// Set the point the first robot follows in
    /// [`step_toward_cursor`](Self::step_toward_cursor).
    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = Some(cursor);
    }

    /// Forget the cursor.
    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Move the first robot one step toward the cursor.
    ///
    /// Returns `Ok(None)` when no cursor is set.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownRobot`] if there are no robots.
    pub fn step_toward_cursor(&mut self) -> Result<Option<CursorStep>, SimError> {
        let Some(cursor) = self.cursor else {
            return Ok(None);
        };
        let robot = self
            .robots
            .first_mut()
            .ok_or(SimError::UnknownRobot(RobotId(0)))?;
        let id = robot.id();

        let detector = CollisionDetector::new(&self.arena);
        let (step, detection) = self.controller.step_toward(
            robot,
            cursor,
            &detector,
            &mut self.recorder,
            &mut self.rng,
        );

        let mut hits = Hits::new();
        if let Some(detection) = detection {
            record_detection(&mut self.metrics, &mut self.events, &mut hits, id, detection);
        }
        self.reveal(hits);
        Ok(Some(step))
    }

    // ── Scene control ───────────────────────────────────────────

    /// Clear robots, obstacles, the trail map and the cursor.
    ///
    /// The arena keeps its size; metrics are cumulative and survive.
    pub fn reset_all(&mut self) {
        self.robots.clear();
        self.arena.clear();
        self.recorder.clear();
        self.cursor = None;
        self.obstacles_shown = false;
        self.last_report = None;
        self.events.push(SimEvent::Reset);
        info!("simulation reset");
    }

    /// Show or hide every obstacle. Returns the new state.
    ///
    /// Only display flags change; collision tests ignore visibility.
    pub fn toggle_obstacle_visibility(&mut self) -> bool {
        self.obstacles_shown = !self.obstacles_shown;
        self.arena.set_all_visible(self.obstacles_shown);
        self.obstacles_shown
    }

    // ── Ticks ───────────────────────────────────────────────────

    /// Flip the drift direction of every robot whose wiggle is active.
    ///
    /// Returns the number of robots flipped.
    pub fn wiggle_tick(&mut self) -> usize {
        self.metrics.wiggle_ticks += 1;
        let mut flipped = 0;
        for robot in &mut self.robots {
            if self.controller.wiggle(robot) {
                flipped += 1;
            }
        }
        flipped
    }

    /// Run one forward tick for every robot that is not reversing.
    ///
    /// Obstacles hit by a sensor beam become visible once every robot
    /// has moved.
    pub fn explore_tick(&mut self) {
        let start = Instant::now();
        self.metrics.explore_ticks += 1;

        let detector = CollisionDetector::new(&self.arena);
        let mut hits = Hits::new();
        for robot in &mut self.robots {
            if robot.is_moving_backwards() {
                continue;
            }
            let outcome =
                self.controller
                    .forward_tick(robot, &detector, &mut self.recorder, &mut self.rng);

            if let Some(detection) = outcome.detection {
                record_detection(
                    &mut self.metrics,
                    &mut self.events,
                    &mut hits,
                    robot.id(),
                    detection,
                );
            }
            if outcome.new_trail_point {
                self.metrics.trail_points += 1;
            }
            if outcome.blocked {
                self.metrics.blocked_steps += 1;
                self.events.push(SimEvent::ReversalStarted {
                    robot: robot.id(),
                    at: robot.position(),
                });
            }
        }
        self.reveal(hits);

        self.metrics.last_explore_us =
            u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    /// Run one reverse tick for every reversing robot.
    ///
    /// If any episode ended, every robot's wiggle is resumed. Returns
    /// whether that happened.
    pub fn reverse_tick(&mut self) -> bool {
        self.metrics.reverse_ticks += 1;

        let detector = CollisionDetector::new(&self.arena);
        let mut finished = false;
        for robot in &mut self.robots {
            match self
                .controller
                .reverse_tick(robot, &detector, &mut self.recorder, &mut self.rng)
            {
                ReverseOutcome::Idle => {}
                ReverseOutcome::Stepped { new_trail_point } => {
                    self.metrics.back_steps += 1;
                    if new_trail_point {
                        self.metrics.trail_points += 1;
                    }
                }
                ReverseOutcome::Finished { steps } => {
                    self.metrics.reversal_episodes += 1;
                    self.events.push(SimEvent::ReversalFinished {
                        robot: robot.id(),
                        steps,
                    });
                    finished = true;
                }
            }
        }

        if finished {
            for robot in &mut self.robots {
                self.controller.resume_wiggle(robot);
            }
            debug!("resumed wiggle for {} robots", self.robots.len());
        }
        finished
    }

    fn reveal(&mut self, hits: Hits) {
        for obstacle in hits {
            if self.arena.reveal(obstacle) {
                self.metrics.obstacles_revealed += 1;
                self.events.push(SimEvent::ObstacleRevealed { obstacle });
            }
        }
    }
}

fn record_detection(
    metrics: &mut TickMetrics,
    events: &mut EventLog,
    hits: &mut Hits,
    robot: RobotId,
    (hit, detection): (BeamHit, ScannedPoint),
) {
    metrics.detections += 1;
    events.push(SimEvent::ObstacleDetected { robot, detection });
    if !hits.contains(&hit.obstacle) {
        hits.push(hit.obstacle);
    }
}

/// Uniform draw in `lo..hi`, or `lo` when the range is empty.
fn draw_between<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::{Obstacle, ObstacleKind};

    fn walled_sim() -> Simulation {
        let mut sim = Simulation::new(SimulationConfig::with_seed(3)).unwrap();
        let arena = Arena::walled(800, 500, 20).unwrap();
        let robot = Robot::new(RobotId(0), Point::new(400, 250), 0.0);
        sim.initialize(arena, vec![robot]);
        sim
    }

    #[test]
    fn new_simulation_is_empty() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert!(sim.robots().is_empty());
        assert!(sim.arena().is_empty());
        assert!(sim.generation_report().is_none());
        assert_eq!(sim.metrics(), &TickMetrics::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = SimulationConfig {
            robot_count: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(Simulation::new(cfg), Err(ConfigError::NoRobots)));
    }

    #[test]
    fn initialize_starts_wiggle() {
        let sim = walled_sim();
        let robot = &sim.robots()[0];
        assert!(robot.is_wiggling());
        assert!(robot.placement_adjusted());
    }

    #[test]
    fn settling_sees_the_nudged_heading() {
        let mut sim = Simulation::new(SimulationConfig::with_seed(3)).unwrap();
        let mut arena = Arena::walled(800, 500, 20).unwrap();
        arena.push(Obstacle::rectangle(ObstacleKind::Hill, 340, 220, 60, 60).unwrap());
        let robots = (0..16u32)
            .map(|k| {
                let heading = f64::from(k) * std::f64::consts::FRAC_PI_8 + 0.005;
                Robot::new(RobotId(k), Point::new(318, 230), heading)
            })
            .collect();
        sim.initialize(arena, robots);

        let det = CollisionDetector::new(sim.arena());
        for robot in sim.robots() {
            let p = robot.position();
            assert!(det.can_rotate(p.x, p.y, robot.heading()), "{:?}", robot.id());
        }
    }

    #[test]
    fn generate_spawns_configured_robots() {
        let sim = Simulation::generate(SimulationConfig::with_seed(11)).unwrap();
        assert_eq!(sim.robots().len(), 2);
        assert!(sim.generation_report().is_some());
        assert_eq!(sim.arena().obstacles(ObstacleKind::Wall).len(), 4);
        let a = sim.robots()[0].heading();
        let b = sim.robots()[1].heading();
        // Both started with the same wiggle nudge, half a turn apart.
        assert!((b - a - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = Simulation::generate(SimulationConfig::with_seed(5)).unwrap();
        let mut b = Simulation::generate(SimulationConfig::with_seed(5)).unwrap();
        for _ in 0..50 {
            a.explore_tick();
            a.reverse_tick();
            b.explore_tick();
            b.reverse_tick();
        }
        assert_eq!(a.robots(), b.robots());
        assert_eq!(a.trail_snapshot(), b.trail_snapshot());
    }

    #[test]
    fn unknown_robot_is_an_error() {
        let mut sim = walled_sim();
        assert_eq!(
            sim.set_target_heading(RobotId(9), 1.0),
            Err(SimError::UnknownRobot(RobotId(9)))
        );
        assert!(sim.robot(RobotId(0)).is_ok());
    }

    #[test]
    fn steer_tick_uses_target_heading() {
        let mut sim = walled_sim();
        sim.set_target_heading(RobotId(0), std::f64::consts::PI).unwrap();
        assert_eq!(sim.steer_tick(RobotId(0)), Ok(true));
        let robot = sim.robot(RobotId(0)).unwrap();
        assert_eq!(robot.position(), Point::new(397, 250));
        assert_eq!(robot.heading(), std::f64::consts::PI);
    }

    #[test]
    fn explore_tick_records_trail() {
        let mut sim = walled_sim();
        sim.explore_tick();
        assert_eq!(sim.metrics().explore_ticks, 1);
        assert_eq!(sim.metrics().trail_points, 1);
        assert_eq!(sim.trail().visited().len(), 1);
    }

    #[test]
    fn detection_reveals_obstacle_once() {
        let mut sim = Simulation::new(SimulationConfig::with_seed(3)).unwrap();
        let mut arena = Arena::walled(800, 500, 20).unwrap();
        arena.push(Obstacle::rectangle(ObstacleKind::Rock, 470, 240, 20, 20).unwrap());
        sim.initialize(arena, vec![Robot::new(RobotId(0), Point::new(400, 250), 0.0)]);

        sim.explore_tick();
        assert_eq!(sim.metrics().detections, 1);
        assert_eq!(sim.metrics().obstacles_revealed, 1);
        assert!(sim.arena().obstacles(ObstacleKind::Rock)[0].is_visible());
        let events = sim.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::ObstacleRevealed { .. })));
    }

    #[test]
    fn no_cursor_is_a_no_op() {
        let mut sim = walled_sim();
        assert_eq!(sim.step_toward_cursor(), Ok(None));
        sim.set_cursor(Point::new(400, 250));
        assert_eq!(sim.step_toward_cursor(), Ok(Some(CursorStep::Arrived)));
    }

    #[test]
    fn cursor_without_robots_is_an_error() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.set_cursor(Point::new(10, 10));
        assert_eq!(
            sim.step_toward_cursor(),
            Err(SimError::UnknownRobot(RobotId(0)))
        );
    }

    #[test]
    fn toggle_flips_every_obstacle() {
        let mut sim = walled_sim();
        assert!(sim.toggle_obstacle_visibility());
        assert_eq!(sim.arena_snapshot().visible().count(), 4);
        assert!(!sim.toggle_obstacle_visibility());
        assert_eq!(sim.arena_snapshot().visible().count(), 0);
    }

    #[test]
    fn reset_clears_scene_keeps_metrics() {
        let mut sim = walled_sim();
        sim.explore_tick();
        sim.set_cursor(Point::new(1, 1));
        sim.reset_all();
        assert!(sim.robots().is_empty());
        assert!(sim.arena().is_empty());
        assert!(sim.trail().visited().is_empty());
        assert_eq!(sim.cursor(), None);
        assert_eq!(sim.metrics().explore_ticks, 1);
        assert_eq!(sim.drain_events().last(), Some(&SimEvent::Reset));
    }

    #[test]
    fn draw_between_handles_empty_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(draw_between(&mut rng, 5, 5), 5);
        let v = draw_between(&mut rng, 5, 9);
        assert!((5..9).contains(&v));
    }
}
