//! Sensor detections.

use std::fmt;

use crate::geometry::Point;

/// The tag a detection carries into the exploration map.
///
/// Rocks are tagged separately from everything else the beam can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The beam ended inside a rock.
    Rock,
    /// Any other obstacle: hill, wall, or cliff.
    Barrier,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Rock => f.write_str("rock"),
            Classification::Barrier => f.write_str("barrier"),
        }
    }
}

/// A single detection reported by the proximity sensor.
///
/// `point` already includes the sensor's positional jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScannedPoint {
    /// Reported (noisy) position of the hit.
    pub point: Point,
    /// What was hit.
    pub classification: Classification,
}

impl ScannedPoint {
    /// Create a detection.
    pub fn new(point: Point, classification: Classification) -> Self {
        Self {
            point,
            classification,
        }
    }
}
