//! Runtime error type for the simulation API.

use std::error::Error;
use std::fmt;

use rover_arena::ArenaError;
use rover_core::RobotId;

use crate::config::ConfigError;

/// Errors returned by [`Simulation`](crate::Simulation) and
/// [`RealtimeSimulation`](crate::RealtimeSimulation) operations.
#[derive(Debug, PartialEq)]
pub enum SimError {
    /// No robot with this id exists.
    UnknownRobot(RobotId),
    /// Arena assembly or generation failed.
    Arena(ArenaError),
    /// The configuration was rejected.
    Config(ConfigError),
    /// A tick thread panicked while holding the simulation lock.
    Poisoned,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRobot(id) => write!(f, "unknown robot {id}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Poisoned => write!(f, "simulation lock poisoned by a panicked tick"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::UnknownRobot(_) | Self::Poisoned => None,
        }
    }
}

impl From<ArenaError> for SimError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
