//! Obstacle storage and placement for the rover arena simulator.
//!
//! An [`Arena`] owns the four obstacle lists (hills, rocks, walls,
//! cliffs). Arenas are either assembled by hand through
//! [`Arena::walled`] and [`Arena::from_layout`], or produced by the
//! seeded [`ArenaGenerator`], which places obstacles with a bounded
//! retry budget and grows satellite hills.
//!
//! Geometry is immutable once an obstacle is stored. The only mutation a
//! running simulation performs is flipping visibility flags.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod generator;

pub use arena::{Arena, ArenaSnapshot, ObstacleLayout};
pub use config::PlacementConfig;
pub use error::{ArenaError, PlacementConfigError};
pub use generator::{ArenaGenerator, GeneratedArena, GenerationReport, Placement, PlacementSummary};
