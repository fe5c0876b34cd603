//! Exploration control and the simulation loop.
//!
//! Provides [`Simulation`], which owns the arena, the robots, and the
//! shared trail map, and advances them with three independent tick
//! kinds (wiggle, explore, reverse). [`RealtimeSimulation`] drives those
//! ticks from dedicated threads at fixed periods; lockstep callers invoke
//! them directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod metrics;
pub mod realtime;
pub mod recorder;
pub mod robot;
pub mod simulation;

pub use config::{ConfigError, ControllerConfig, SimulationConfig, TimingConfig, MAX_ROBOTS};
pub use controller::{CursorStep, ExplorationController, ForwardOutcome, ReverseOutcome};
pub use error::SimError;
pub use event::SimEvent;
pub use metrics::TickMetrics;
pub use realtime::{RealtimeSimulation, ShutdownReport, TickCounts};
pub use recorder::{TrailRecorder, TrailSnapshot};
pub use robot::{MotionState, Robot};
pub use simulation::Simulation;
