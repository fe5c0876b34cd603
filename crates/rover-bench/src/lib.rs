//! Benchmark profiles and utilities for the rover arena simulator.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarks and
//! examples:
//!
//! - [`reference_profile`]: the standard 800x500 arena with two robots
//! - [`crowded_profile`]: a 1600x1000 arena with more obstacles and eight robots
//! - [`run_rounds`]: drive a lockstep simulation at the realtime tick ratio

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rover_arena::PlacementConfig;
use rover_engine::{Simulation, SimulationConfig};

/// The default scene: 800x500, 3-5 obstacles per kind, two robots.
pub fn reference_profile(seed: u64) -> SimulationConfig {
    SimulationConfig::with_seed(seed)
}

/// A larger, busier scene for stress testing.
///
/// Four times the area of [`reference_profile`], 8-12 obstacles per kind
/// and eight robots.
pub fn crowded_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        robot_count: 8,
        placement: PlacementConfig {
            count_range: 8..=12,
            ..PlacementConfig::with_size(1600, 1000)
        },
        ..SimulationConfig::with_seed(seed)
    }
}

/// Explore ticks per wiggle tick under the configured periods.
pub fn wiggle_stride(config: &SimulationConfig) -> u64 {
    let t = &config.timing;
    let ratio = t.wiggle_period.as_nanos() / t.explore_period.as_nanos().max(1);
    u64::try_from(ratio).unwrap_or(u64::MAX).max(1)
}

/// Run `rounds` explore+reverse rounds, inserting a wiggle tick every
/// [`wiggle_stride`] rounds, as the realtime threads would.
pub fn run_rounds(sim: &mut Simulation, rounds: u64) {
    let stride = wiggle_stride(sim.config());
    for round in 1..=rounds {
        sim.explore_tick();
        sim.reverse_tick();
        if round % stride == 0 {
            sim.wiggle_tick();
        }
    }
}
