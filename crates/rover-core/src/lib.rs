//! Core types and traits for the rover arena simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: integer
//! geometry, obstacle descriptions, sensor detections, identifiers,
//! error types, and the [`Occupancy`] trait that sensing is written
//! against.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod obstacle;
pub mod scan;
pub mod traits;

pub use error::ObstacleError;
pub use geometry::{Point, Rect};
pub use id::RobotId;
pub use obstacle::{Obstacle, ObstacleKind, ObstacleRef, Shape, DEFAULT_NEAR_MARGIN};
pub use scan::{Classification, ScannedPoint};
pub use traits::Occupancy;
