//! Exploration controller state machine.
//!
//! Drives one robot at a time through wiggle, avoidance and reversal.
//! The controller itself is stateless: every per-robot quantity lives on
//! [`Robot`], and the shared map lives in the [`TrailRecorder`]. Ticks
//! that span several robots (resuming every robot's wiggle after a
//! reversal, revealing hit obstacles) are coordinated by
//! [`Simulation`](crate::Simulation).
//!
//! ```text
//!            detection                 blocked step
//! Wiggling <-----------> Avoiding ------------------+
//!     ^     no detection     |                      v
//!     |                      +-------------->  Reversing
//!     |                         blocked step        |
//!     +------ next forward tick ---- Resuming <-----+
//!                                  cap reached or back step blocked
//! ```

use std::f64::consts::TAU;

use log::{debug, trace};
use rand::Rng;
use rover_core::{Point, ScannedPoint};
use rover_sense::{jitter_point, BeamHit, CollisionDetector, Sensor};

use crate::config::ControllerConfig;
use crate::recorder::TrailRecorder;
use crate::robot::{MotionState, Robot};

/// Result of one forward tick for one robot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForwardOutcome {
    /// The exact beam hit and the jittered detection recorded for it.
    pub detection: Option<(BeamHit, ScannedPoint)>,
    /// Whether the forward step was committed.
    pub moved: bool,
    /// Whether this tick started a reversal episode.
    pub blocked: bool,
    /// Whether the committed step added a new visited point.
    pub new_trail_point: bool,
}

/// Result of one reverse tick for one robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReverseOutcome {
    /// The robot is not reversing.
    Idle,
    /// One back step was committed.
    Stepped {
        /// Whether the step added a new visited point.
        new_trail_point: bool,
    },
    /// The episode ended. Every robot's wiggle must now be resumed.
    Finished {
        /// Back steps committed during the episode.
        steps: u32,
    },
}

/// Result of one cursor-following step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStep {
    /// The robot moved toward the cursor.
    Moved,
    /// The robot already stands on the cursor.
    Arrived,
    /// The step would collide.
    Blocked,
}

/// Stateless exploration logic shared by all robots.
#[derive(Clone, Debug)]
pub struct ExplorationController {
    config: ControllerConfig,
    sensor: Sensor,
}

impl ExplorationController {
    /// Create a controller from validated configuration.
    pub fn new(config: ControllerConfig, sensor: Sensor) -> Self {
        Self { config, sensor }
    }

    /// Controller parameters.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The sensor every robot carries.
    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Advance a non-reversing robot by one forward tick.
    ///
    /// 1. Scan ahead; record any detection in the obstacle map.
    /// 2. On a detection, turn one step toward the clearest probe
    ///    direction (state `Avoiding`); otherwise drift by a fifth of the
    ///    wiggle factor (state `Wiggling`).
    /// 3. Step `speed` units along the new heading if the body fits there;
    ///    otherwise begin a reversal episode along the negated step.
    pub fn forward_tick<R: Rng + ?Sized>(
        &self,
        robot: &mut Robot,
        detector: &CollisionDetector<'_>,
        recorder: &mut TrailRecorder,
        rng: &mut R,
    ) -> ForwardOutcome {
        let detection = self.scan_and_record(robot, detector, recorder, rng);

        if detection.is_some() {
            if let Some(best) = self.clearest_heading(robot, detector) {
                robot.heading += if best > robot.heading {
                    robot.turn_factor
                } else {
                    -robot.turn_factor
                };
            }
            robot.state = MotionState::Avoiding;
        } else {
            robot.heading += robot.rotation_factor / 5.0;
            robot.state = MotionState::Wiggling;
        }

        let (dx, dy) = self.displacement(robot.heading);
        let candidate = robot.position.displaced(dx, dy);

        if detector.can_occupy(candidate.x, candidate.y) {
            robot.position = candidate;
            let new_trail_point = recorder.record_visited(jitter_point(
                candidate,
                self.config.trail_jitter,
                rng,
            ));
            trace!("{} -> {} ({})", robot.id(), candidate, robot.state);
            ForwardOutcome {
                detection,
                moved: true,
                blocked: false,
                new_trail_point,
            }
        } else {
            robot.back_vector = (-dx, -dy);
            robot.back_steps = 0;
            robot.state = MotionState::Reversing;
            robot.wiggle_active = false;
            debug!(
                "{} blocked at {} heading {:.3}; reversing",
                robot.id(),
                robot.position,
                robot.heading
            );
            ForwardOutcome {
                detection,
                moved: false,
                blocked: true,
                new_trail_point: false,
            }
        }
    }

    /// Advance a reversing robot by one back step, or end its episode.
    ///
    /// Each committed step also turns the robot by its full wiggle factor.
    /// The episode ends once `max_back_steps` steps were taken or the next
    /// step is blocked; the wiggle factor is then re-signed at random.
    pub fn reverse_tick<R: Rng + ?Sized>(
        &self,
        robot: &mut Robot,
        detector: &CollisionDetector<'_>,
        recorder: &mut TrailRecorder,
        rng: &mut R,
    ) -> ReverseOutcome {
        if robot.state != MotionState::Reversing {
            return ReverseOutcome::Idle;
        }

        let (bx, by) = robot.back_vector;
        let candidate = robot.position.displaced(bx, by);

        if robot.back_steps < self.config.max_back_steps
            && detector.can_occupy(candidate.x, candidate.y)
        {
            robot.position = candidate;
            robot.heading += robot.rotation_factor;
            robot.back_steps += 1;
            let new_trail_point = recorder.record_visited(jitter_point(
                candidate,
                self.config.trail_jitter,
                rng,
            ));
            return ReverseOutcome::Stepped { new_trail_point };
        }

        let steps = robot.back_steps;
        robot.back_steps = 0;
        robot.state = MotionState::Resuming;
        if rng.random_bool(0.5) {
            robot.rotation_factor = -robot.rotation_factor;
        }
        debug!("{} finished reversing after {steps} steps", robot.id());
        ReverseOutcome::Finished { steps }
    }

    /// Flip the robot's drift direction if its wiggle is active.
    ///
    /// Returns whether the drift was flipped.
    pub fn wiggle(&self, robot: &mut Robot) -> bool {
        if robot.wiggle_active {
            robot.rotation_factor = -robot.rotation_factor;
        }
        robot.wiggle_active
    }

    /// (Re)start the robot's wiggle.
    ///
    /// Nudges the heading back by half a drift step so the oscillation is
    /// centred on the current heading.
    pub fn resume_wiggle(&self, robot: &mut Robot) {
        robot.heading -= robot.rotation_factor / 10.0;
        robot.wiggle_active = true;
    }

    /// Shift the robot diagonally until its rotated body is clear.
    ///
    /// Runs at most once per robot. Returns the number of unit shifts.
    /// Terminates because obstacles are finite: past the last obstacle
    /// every pose is clear.
    pub fn settle(&self, robot: &mut Robot, detector: &CollisionDetector<'_>) -> u32 {
        if robot.placement_adjusted {
            return 0;
        }
        let mut shifts = 0;
        while !detector.can_rotate(robot.position.x, robot.position.y, robot.heading) {
            robot.position = robot.position.offset(1, 1);
            shifts += 1;
        }
        robot.placement_adjusted = true;
        if shifts > 0 {
            debug!("{} moved {shifts} units to {} to clear obstacles", robot.id(), robot.position);
        }
        shifts
    }

    /// Face the target heading and take one step if the body fits.
    ///
    /// Returns whether the robot moved.
    pub fn steer(&self, robot: &mut Robot, detector: &CollisionDetector<'_>) -> bool {
        robot.heading = robot.target_heading;
        let (dx, dy) = self.displacement(robot.heading);
        let candidate = robot.position.displaced(dx, dy);
        if detector.can_occupy(candidate.x, candidate.y) {
            robot.position = candidate;
            true
        } else {
            false
        }
    }

    /// Aim at `cursor`, scan, then step `speed` units straight toward it.
    ///
    /// A robot already on the cursor keeps its heading and does not move.
    /// Detections are recorded like those of a forward tick; no visited
    /// point is recorded.
    pub fn step_toward<R: Rng + ?Sized>(
        &self,
        robot: &mut Robot,
        cursor: Point,
        detector: &CollisionDetector<'_>,
        recorder: &mut TrailRecorder,
        rng: &mut R,
    ) -> (CursorStep, Option<(BeamHit, ScannedPoint)>) {
        let dx = f64::from(cursor.x - robot.position.x);
        let dy = f64::from(cursor.y - robot.position.y);
        if dx != 0.0 || dy != 0.0 {
            robot.target_heading = dy.atan2(dx);
            robot.heading = robot.target_heading;
        }

        let detection = self.scan_and_record(robot, detector, recorder, rng);

        if robot.position == cursor {
            return (CursorStep::Arrived, detection);
        }
        let distance = dx.hypot(dy);
        let scale = self.config.speed / distance;
        let candidate = robot.position.displaced(scale * dx, scale * dy);
        if detector.can_occupy(candidate.x, candidate.y) {
            robot.position = candidate;
            (CursorStep::Moved, detection)
        } else {
            (CursorStep::Blocked, detection)
        }
    }

    /// Probe evenly spaced directions and return the first with strictly
    /// the most clearance, or `None` if every direction is blocked at
    /// the centre.
    fn clearest_heading(&self, robot: &Robot, detector: &CollisionDetector<'_>) -> Option<f64> {
        let probes = self.config.probe_directions;
        let beam = self.sensor.config();
        let mut best = None;
        let mut max_clearance = 0;
        for k in 0..probes {
            let angle = f64::from(k) * TAU / f64::from(probes);
            let clearance = detector.clearance(robot.position.x, robot.position.y, angle, beam);
            if clearance > max_clearance {
                max_clearance = clearance;
                best = Some(angle);
            }
        }
        best
    }

    fn scan_and_record<R: Rng + ?Sized>(
        &self,
        robot: &Robot,
        detector: &CollisionDetector<'_>,
        recorder: &mut TrailRecorder,
        rng: &mut R,
    ) -> Option<(BeamHit, ScannedPoint)> {
        let hit = self.sensor.cast(detector, robot.position, robot.heading)?;
        let detection = self.sensor.detect(&hit, rng);
        recorder.record_detection(detection);
        Some((hit, detection))
    }

    fn displacement(&self, heading: f64) -> (f64, f64) {
        let (sin, cos) = heading.sin_cos();
        (self.config.speed * cos, self.config.speed * sin)
    }
}
