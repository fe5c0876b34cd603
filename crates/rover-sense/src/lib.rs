//! Collision detection and proximity sensing.
//!
//! [`CollisionDetector`] answers point and footprint queries against a
//! borrowed [`Arena`](rover_arena::Arena). [`Sensor`] marches a single
//! forward beam through any [`Occupancy`](rover_core::Occupancy) and
//! reports at most one noisy detection per scan.
//!
//! Both are pure queries: nothing here mutates the arena.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collision;
pub mod footprint;
pub mod sensor;

pub use collision::CollisionDetector;
pub use footprint::Footprint;
pub use sensor::{
    jitter_point, march, BeamHit, Detections, Sensor, SensorConfig, SensorConfigError,
};
