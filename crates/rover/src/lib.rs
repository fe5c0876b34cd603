//! Rover: a robot arena exploration simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all rover sub-crates. For most users, adding `rover` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rover::prelude::*;
//!
//! // A walled 800x500 arena with one rock, and a single robot.
//! let mut arena = Arena::walled(800, 500, 20).unwrap();
//! arena.push(Obstacle::rectangle(ObstacleKind::Rock, 470, 240, 20, 20).unwrap());
//! let robot = Robot::new(RobotId(0), Point::new(400, 250), 0.0);
//!
//! let mut sim = Simulation::new(SimulationConfig::with_seed(42)).unwrap();
//! sim.initialize(arena, vec![robot]);
//! for _ in 0..10 {
//!     sim.explore_tick();
//!     sim.reverse_tick();
//! }
//! assert!(sim.metrics().detections > 0);
//! assert!(!sim.trail().visited().is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rover-core` | Geometry, obstacles, ids, scan results, the occupancy trait |
//! | [`arena`] | `rover-arena` | Obstacle storage and the random placement generator |
//! | [`sense`] | `rover-sense` | Robot footprint, collision detector, sensor beam |
//! | [`engine`] | `rover-engine` | Exploration controller, lockstep and realtime simulation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`rover-core`).
///
/// Contains [`types::Point`], [`types::Rect`], [`types::Obstacle`] and the
/// [`types::Occupancy`] trait collision queries are written against.
pub use rover_core as types;

/// Obstacle storage and generation (`rover-arena`).
pub use rover_arena as arena;

/// Collision and sensing (`rover-sense`).
///
/// Most users only need [`sense::CollisionDetector`] for ad-hoc queries;
/// the simulation builds its own.
pub use rover_sense as sense;

/// Exploration control and the simulation loop (`rover-engine`).
pub use rover_engine as engine;

/// Common imports for typical rover usage.
///
/// ```rust
/// use rover::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rover_core::{
        Classification, Obstacle, ObstacleKind, Occupancy, Point, Rect, RobotId, ScannedPoint,
    };

    // Arena
    pub use rover_arena::{Arena, ArenaGenerator, ArenaSnapshot, PlacementConfig};

    // Sensing
    pub use rover_sense::{CollisionDetector, Sensor, SensorConfig};

    // Errors
    pub use rover_arena::ArenaError;
    pub use rover_core::ObstacleError;
    pub use rover_engine::{ConfigError, SimError};

    // Engine
    pub use rover_engine::{
        MotionState, RealtimeSimulation, Robot, SimEvent, Simulation, SimulationConfig,
        TickMetrics, TrailSnapshot,
    };
}
