//! Arena and placement error types.

use std::error::Error;
use std::fmt;

use rover_core::{ObstacleError, ObstacleKind};

/// Errors from assembling an [`Arena`](crate::Arena).
///
/// Every variant is a configuration error raised before the simulation
/// starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An obstacle could not be constructed.
    Obstacle(ObstacleError),
    /// An obstacle was filed under the list of a different kind.
    MisfiledObstacle {
        /// The kind the list holds.
        expected: ObstacleKind,
        /// The kind of the offending obstacle.
        found: ObstacleKind,
        /// Position within the list.
        index: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Obstacle(e) => write!(f, "invalid obstacle: {e}"),
            Self::MisfiledObstacle {
                expected,
                found,
                index,
            } => write!(
                f,
                "{found} obstacle at index {index} filed under the {expected} list"
            ),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Obstacle(e) => Some(e),
            Self::MisfiledObstacle { .. } => None,
        }
    }
}

impl From<ObstacleError> for ArenaError {
    fn from(e: ObstacleError) -> Self {
        Self::Obstacle(e)
    }
}

/// Errors detected by [`PlacementConfig::validate()`](crate::PlacementConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementConfigError {
    /// Arena width or height is not positive.
    InvalidDimensions {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },
    /// Walls would cover the whole arena.
    WallsTooThick {
        /// Configured wall thickness.
        thickness: i32,
    },
    /// The placement insets leave no interior to draw origins from.
    NoInterior {
        /// Horizontal inset.
        inset_x: i32,
        /// Vertical inset.
        inset_y: i32,
    },
    /// A sampling range is empty.
    EmptyRange {
        /// Name of the range.
        name: &'static str,
    },
    /// A size range admits non-positive extents.
    NonPositiveSize {
        /// Name of the range.
        name: &'static str,
        /// The smallest extent the range can produce.
        min: i32,
    },
    /// The retry cap is zero.
    ZeroFailureCap,
    /// The satellite divisor is zero.
    ZeroSatelliteChance,
}

impl fmt::Display for PlacementConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "arena dimensions must be positive, got {width}x{height}")
            }
            Self::WallsTooThick { thickness } => {
                write!(f, "wall thickness {thickness} leaves no free space")
            }
            Self::NoInterior { inset_x, inset_y } => {
                write!(
                    f,
                    "placement insets ({inset_x}, {inset_y}) leave no interior"
                )
            }
            Self::EmptyRange { name } => write!(f, "{name} range is empty"),
            Self::NonPositiveSize { name, min } => {
                write!(f, "{name} can produce non-positive extent {min}")
            }
            Self::ZeroFailureCap => write!(f, "failure_cap must be at least 1"),
            Self::ZeroSatelliteChance => write!(f, "satellite_chance must be at least 1"),
        }
    }
}

impl Error for PlacementConfigError {}
