//! Simulation configuration and validation.
//!
//! [`SimulationConfig`] aggregates arena placement, sensing, controller
//! and timing parameters. [`SimulationConfig::validate()`] checks every
//! structural invariant before a [`Simulation`](crate::Simulation) is
//! built.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use rover_arena::{PlacementConfig, PlacementConfigError};
use rover_sense::{SensorConfig, SensorConfigError};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during simulation configuration validation.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Arena placement parameters are invalid.
    Placement(PlacementConfigError),
    /// Sensor beam parameters are invalid.
    InvalidSensor(SensorConfigError),
    /// Controller parameters are invalid.
    InvalidController {
        /// Description of the violated constraint.
        reason: String,
    },
    /// A tick period is zero.
    InvalidPeriod {
        /// Which timer.
        name: &'static str,
        /// The rejected period.
        period: Duration,
    },
    /// The event channel capacity is zero.
    ZeroEventCapacity,
    /// `robot_count` is zero.
    NoRobots,
    /// `robot_count` exceeds [`MAX_ROBOTS`].
    TooManyRobots {
        /// The rejected count.
        count: usize,
    },
    /// A tick thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the OS error.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement(e) => write!(f, "placement: {e}"),
            Self::InvalidSensor(e) => write!(f, "sensor: {e}"),
            Self::InvalidController { reason } => write!(f, "invalid controller config: {reason}"),
            Self::InvalidPeriod { name, period } => {
                write!(f, "{name} period must be positive, got {period:?}")
            }
            Self::ZeroEventCapacity => write!(f, "event channel capacity must be at least 1"),
            Self::NoRobots => write!(f, "robot_count must be at least 1"),
            Self::TooManyRobots { count } => {
                write!(f, "robot_count must be at most {MAX_ROBOTS}, got {count}")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "failed to spawn tick thread: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Placement(e) => Some(e),
            Self::InvalidSensor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlacementConfigError> for ConfigError {
    fn from(e: PlacementConfigError) -> Self {
        Self::Placement(e)
    }
}

impl From<SensorConfigError> for ConfigError {
    fn from(e: SensorConfigError) -> Self {
        Self::InvalidSensor(e)
    }
}

// ── ControllerConfig ───────────────────────────────────────────────

/// Exploration controller parameters.
///
/// The rotation and turn factors are the defaults for robots spawned by
/// [`Simulation::regenerate`](crate::Simulation::regenerate); robots
/// passed to [`Simulation::initialize`](crate::Simulation::initialize)
/// keep their own.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Forward displacement per explore tick. Default: 3.0.
    pub speed: f64,
    /// Initial wiggle drift. Default: 0.1.
    pub rotation_factor: f64,
    /// Avoidance turn per tick. Default: 0.2.
    pub turn_factor: f64,
    /// Directions probed when an obstacle is detected, evenly spaced over
    /// a full turn. Default: 16.
    pub probe_directions: u32,
    /// Back steps per reversal episode, at most. Default: 17.
    pub max_back_steps: u32,
    /// Visited points are recorded with a uniform offset in
    /// `-trail_jitter..trail_jitter` per axis. Default: 10.
    pub trail_jitter: i32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            rotation_factor: 0.1,
            turn_factor: 0.2,
            probe_directions: 16,
            max_back_steps: 17,
            trail_jitter: 10,
        }
    }
}

impl ControllerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidController { reason });
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return invalid(format!("speed must be finite and > 0, got {}", self.speed));
        }
        if !self.rotation_factor.is_finite() || !self.turn_factor.is_finite() {
            return invalid(format!(
                "rotation_factor ({}) and turn_factor ({}) must be finite",
                self.rotation_factor, self.turn_factor,
            ));
        }
        if self.probe_directions == 0 {
            return invalid("probe_directions must be at least 1".to_string());
        }
        if self.trail_jitter < 0 {
            return invalid(format!(
                "trail_jitter must be non-negative, got {}",
                self.trail_jitter
            ));
        }
        Ok(())
    }
}

// ── TimingConfig ───────────────────────────────────────────────────

/// Tick periods for [`RealtimeSimulation`](crate::RealtimeSimulation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Wiggle flip period. Default: 500 ms.
    pub wiggle_period: Duration,
    /// Forward exploration period. Default: 30 ms.
    pub explore_period: Duration,
    /// Reverse step period. Default: 30 ms.
    pub reverse_period: Duration,
    /// Bound on undelivered events. Default: 256.
    pub event_capacity: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wiggle_period: Duration::from_millis(500),
            explore_period: Duration::from_millis(30),
            reverse_period: Duration::from_millis(30),
            event_capacity: 256,
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Upper bound on [`SimulationConfig::robot_count`].
pub const MAX_ROBOTS: u16 = 1024;

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Seed for arena generation, spawning, and all noise. Default: 0.
    pub seed: u64,
    /// Robots spawned by [`Simulation::regenerate`](crate::Simulation::regenerate).
    /// Between 1 and [`MAX_ROBOTS`]. Default: 2.
    pub robot_count: usize,
    /// Arena size and obstacle placement.
    pub placement: PlacementConfig,
    /// Sensor beam.
    pub sensor: SensorConfig,
    /// Exploration controller.
    pub controller: ControllerConfig,
    /// Realtime tick periods.
    pub timing: TimingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            robot_count: 2,
            placement: PlacementConfig::default(),
            sensor: SensorConfig::default(),
            controller: ControllerConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check all structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. At least one robot, at most MAX_ROBOTS.
        if self.robot_count == 0 {
            return Err(ConfigError::NoRobots);
        }
        if self.robot_count > usize::from(MAX_ROBOTS) {
            return Err(ConfigError::TooManyRobots {
                count: self.robot_count,
            });
        }
        // 2. Placement.
        self.placement.validate()?;
        // 3. Sensor.
        self.sensor.validate()?;
        // 4. Controller.
        self.controller.validate()?;
        // 5. Timers must have positive periods.
        let t = &self.timing;
        for (name, period) in [
            ("wiggle", t.wiggle_period),
            ("explore", t.explore_period),
            ("reverse", t.reverse_period),
        ] {
            if period.is_zero() {
                return Err(ConfigError::InvalidPeriod { name, period });
            }
        }
        // 6. Events need somewhere to go.
        if t.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}
