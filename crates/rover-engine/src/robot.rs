//! Robot pose and motion state.

use std::fmt;

use rover_core::{Point, RobotId};

/// Where a robot is in its exploration cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// Moving forward with the heading drifting back and forth.
    Wiggling,
    /// Moving forward while turning toward the clearest direction.
    Avoiding,
    /// Retracing the blocked step, one back step per reverse tick.
    Reversing,
    /// Reversal just ended; the next forward tick picks a new state.
    Resuming,
}

impl MotionState {
    /// Short state name.
    pub fn name(&self) -> &'static str {
        match self {
            MotionState::Wiggling => "Wiggling",
            MotionState::Avoiding => "Avoiding",
            MotionState::Reversing => "Reversing",
            MotionState::Resuming => "Resuming",
        }
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mobile robot.
///
/// The position is the integer centre of the robot body. The heading is
/// in radians and is never normalised; it grows without bound as the
/// robot turns.
#[derive(Clone, Debug, PartialEq)]
pub struct Robot {
    id: RobotId,
    pub(crate) position: Point,
    pub(crate) heading: f64,
    pub(crate) target_heading: f64,
    pub(crate) rotation_factor: f64,
    pub(crate) turn_factor: f64,
    pub(crate) state: MotionState,
    pub(crate) back_steps: u32,
    pub(crate) back_vector: (f64, f64),
    pub(crate) wiggle_active: bool,
    pub(crate) placement_adjusted: bool,
}

impl Robot {
    /// Default wiggle drift per tick.
    pub const DEFAULT_ROTATION_FACTOR: f64 = 0.1;
    /// Default avoidance turn per tick.
    pub const DEFAULT_TURN_FACTOR: f64 = 0.2;

    /// A robot at `position` facing `heading`, with default factors.
    pub fn new(id: RobotId, position: Point, heading: f64) -> Self {
        Self {
            id,
            position,
            heading,
            target_heading: heading,
            rotation_factor: Self::DEFAULT_ROTATION_FACTOR,
            turn_factor: Self::DEFAULT_TURN_FACTOR,
            state: MotionState::Wiggling,
            back_steps: 0,
            back_vector: (0.0, 0.0),
            wiggle_active: false,
            placement_adjusted: false,
        }
    }

    /// Override the wiggle and turn factors.
    pub fn with_factors(mut self, rotation_factor: f64, turn_factor: f64) -> Self {
        self.rotation_factor = rotation_factor;
        self.turn_factor = turn_factor;
        self
    }

    /// The robot's identifier.
    pub fn id(&self) -> RobotId {
        self.id
    }

    /// Centre of the robot body.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Heading requested by manual steering.
    pub fn target_heading(&self) -> f64 {
        self.target_heading
    }

    /// Signed wiggle drift; its sign flips every wiggle tick.
    pub fn rotation_factor(&self) -> f64 {
        self.rotation_factor
    }

    /// Magnitude of one avoidance turn.
    pub fn turn_factor(&self) -> f64 {
        self.turn_factor
    }

    /// Current motion state.
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Whether a reversal episode is in progress.
    pub fn is_moving_backwards(&self) -> bool {
        self.state == MotionState::Reversing
    }

    /// Back steps taken in the current reversal episode.
    pub fn back_steps(&self) -> u32 {
        self.back_steps
    }

    /// Displacement applied per back step in the current episode.
    pub fn back_vector(&self) -> (f64, f64) {
        self.back_vector
    }

    /// Whether wiggle ticks flip this robot's drift.
    pub fn is_wiggling(&self) -> bool {
        self.wiggle_active
    }

    /// Whether the startup correction has run.
    pub fn placement_adjusted(&self) -> bool {
        self.placement_adjusted
    }

    /// Teleport the robot. Intended for setting up scenarios.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Overwrite the heading.
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = heading;
    }

    /// Set the heading manual steering turns to.
    pub fn set_target_heading(&mut self, heading: f64) {
        self.target_heading = heading;
    }
}
