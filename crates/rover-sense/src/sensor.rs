//! Single-beam forward proximity sensor.
//!
//! The beam is sampled from the robot's centre outward in fixed steps:
//! sample `k` sits at distance `k * step`, for every distance below the
//! configured range. Sample coordinates are truncated toward zero. The
//! first blocked sample ends the beam.

use std::error::Error;
use std::fmt;

use rand::Rng;
use rover_core::{Classification, ObstacleKind, ObstacleRef, Occupancy, Point, ScannedPoint};
use smallvec::SmallVec;

/// Detections from one scan. Never holds more than one point.
pub type Detections = SmallVec<[ScannedPoint; 1]>;

// ── SensorConfig ──────────────────────────────────────────────────

/// Beam geometry and noise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorConfig {
    /// Distance between consecutive samples. Default: 5.
    pub step: u32,
    /// Samples are taken at distances strictly below this. Default: 160.
    pub range: u32,
    /// Reported detections are offset by a uniform draw in
    /// `-jitter..jitter` per axis. Default: 10.
    pub jitter: i32,
}

impl SensorConfig {
    /// Number of samples per beam: `ceil(range / step)`.
    pub fn max_steps(&self) -> u32 {
        if self.step == 0 {
            return 0;
        }
        self.range.div_ceil(self.step)
    }

    /// Check beam geometry.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), SensorConfigError> {
        if self.step == 0 {
            return Err(SensorConfigError::ZeroStep);
        }
        if self.range == 0 {
            return Err(SensorConfigError::ZeroRange);
        }
        if self.jitter < 0 {
            return Err(SensorConfigError::NegativeJitter {
                jitter: self.jitter,
            });
        }
        Ok(())
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            step: 5,
            range: 160,
            jitter: 10,
        }
    }
}

/// Invalid [`SensorConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SensorConfigError {
    /// `step` is zero.
    ZeroStep,
    /// `range` is zero.
    ZeroRange,
    /// `jitter` is negative.
    NegativeJitter {
        /// The rejected amplitude.
        jitter: i32,
    },
}

impl fmt::Display for SensorConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroStep => write!(f, "sensor step must be positive"),
            Self::ZeroRange => write!(f, "sensor range must be positive"),
            Self::NegativeJitter { jitter } => {
                write!(f, "sensor jitter must be non-negative, got {jitter}")
            }
        }
    }
}

impl Error for SensorConfigError {}

// ── Beam ──────────────────────────────────────────────────────────

/// Sample points along a beam from `origin` at `angle`, with their index.
pub fn march(
    origin: Point,
    angle: f64,
    beam: &SensorConfig,
) -> impl Iterator<Item = (u32, Point)> {
    let (sin, cos) = angle.sin_cos();
    let step = beam.step;
    (0..beam.max_steps()).map(move |k| {
        let r = f64::from(k * step);
        (k, origin.displaced(r * cos, r * sin))
    })
}

/// Offset `p` by a uniform draw in `-amplitude..amplitude` per axis.
pub fn jitter_point<R: Rng + ?Sized>(p: Point, amplitude: i32, rng: &mut R) -> Point {
    if amplitude <= 0 {
        return p;
    }
    p.offset(
        rng.random_range(-amplitude..amplitude),
        rng.random_range(-amplitude..amplitude),
    )
}

/// The exact, noise-free end of a beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamHit {
    /// First blocked sample.
    pub point: Point,
    /// Index of that sample; the hit is `step * self.step` from the origin.
    pub step: u32,
    /// The obstacle reported by the occupancy query.
    pub obstacle: ObstacleRef,
    /// `Rock` if any rock covers the point, otherwise `Barrier`.
    pub classification: Classification,
}

// ── Sensor ────────────────────────────────────────────────────────

/// A forward-looking proximity sensor.
#[derive(Clone, Debug, Default)]
pub struct Sensor {
    config: SensorConfig,
}

impl Sensor {
    /// Create a sensor after validating `config`.
    ///
    /// # Errors
    ///
    /// See [`SensorConfig::validate`].
    pub fn new(config: SensorConfig) -> Result<Self, SensorConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The beam configuration.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// March one beam and return the first blocked sample.
    pub fn cast<O: Occupancy + ?Sized>(
        &self,
        occupancy: &O,
        origin: Point,
        angle: f64,
    ) -> Option<BeamHit> {
        march(origin, angle, &self.config).find_map(|(step, point)| {
            occupancy.blocked_at(point).map(|obstacle| {
                let classification = if occupancy.blocked_by(ObstacleKind::Rock, point) {
                    Classification::Rock
                } else {
                    Classification::Barrier
                };
                BeamHit {
                    point,
                    step,
                    obstacle,
                    classification,
                }
            })
        })
    }

    /// Turn an exact hit into a reported detection.
    pub fn detect<R: Rng + ?Sized>(&self, hit: &BeamHit, rng: &mut R) -> ScannedPoint {
        ScannedPoint::new(
            jitter_point(hit.point, self.config.jitter, rng),
            hit.classification,
        )
    }

    /// Scan along `heading`: zero or one jittered detection.
    pub fn scan<O: Occupancy + ?Sized, R: Rng + ?Sized>(
        &self,
        occupancy: &O,
        origin: Point,
        heading: f64,
        rng: &mut R,
    ) -> Detections {
        self.cast(occupancy, origin, heading)
            .map(|hit| self.detect(&hit, rng))
            .into_iter()
            .collect()
    }
}
