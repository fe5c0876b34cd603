//! Cumulative tick counters.
//!
//! [`TickMetrics`] is updated by every tick of a
//! [`Simulation`](crate::Simulation) and survives resets, so it reflects
//! the whole lifetime of the simulation object.

/// Counters collected across all ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Explore ticks executed.
    pub explore_ticks: u64,
    /// Reverse ticks executed.
    pub reverse_ticks: u64,
    /// Wiggle ticks executed.
    pub wiggle_ticks: u64,
    /// Sensor detections recorded.
    pub detections: u64,
    /// Forward steps refused by the collision detector.
    pub blocked_steps: u64,
    /// Reversal episodes completed.
    pub reversal_episodes: u64,
    /// Back steps committed.
    pub back_steps: u64,
    /// New points added to the visited set.
    pub trail_points: u64,
    /// Obstacles revealed by sensor hits.
    pub obstacles_revealed: u64,
    /// Wall-clock time of the most recent explore tick, in microseconds.
    pub last_explore_us: u64,
}
