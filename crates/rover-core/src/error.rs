//! Error types for obstacle construction.
//!
//! Obstacle errors are configuration errors: they are raised while an
//! arena is being assembled and never during a running simulation.

use std::error::Error;
use std::fmt;

use crate::obstacle::{ObstacleKind, Shape};

/// Errors from building or classifying an [`Obstacle`](crate::Obstacle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObstacleError {
    /// An obstacle type name did not match any known kind.
    UnknownKind {
        /// The unrecognised name.
        name: String,
    },
    /// Width, height, or diameter was zero or negative.
    NonPositiveExtent {
        /// The rejected width.
        width: i32,
        /// The rejected height.
        height: i32,
    },
    /// The shape is not allowed for the kind (cliffs are circles, every
    /// other kind is a rectangle).
    KindShapeMismatch {
        /// The requested kind.
        kind: ObstacleKind,
        /// The requested shape.
        shape: Shape,
    },
}

impl fmt::Display for ObstacleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind { name } => write!(f, "unknown obstacle kind '{name}'"),
            Self::NonPositiveExtent { width, height } => {
                write!(f, "obstacle extent must be positive, got {width}x{height}")
            }
            Self::KindShapeMismatch { kind, shape } => {
                write!(f, "{kind} obstacles cannot be {shape}")
            }
        }
    }
}

impl Error for ObstacleError {}
