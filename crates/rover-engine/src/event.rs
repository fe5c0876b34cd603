//! Notifications emitted by simulation ticks.

use rover_core::{ObstacleRef, Point, RobotId, ScannedPoint};

/// Something observers may want to redraw or log.
///
/// Events are best-effort: the buffer is bounded and overflow is dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// A robot's sensor reported an obstacle.
    ObstacleDetected {
        /// Which robot.
        robot: RobotId,
        /// The noisy detection.
        detection: ScannedPoint,
    },
    /// An obstacle became visible after a sensor hit.
    ObstacleRevealed {
        /// The revealed obstacle.
        obstacle: ObstacleRef,
    },
    /// A forward step was blocked and a reversal episode began.
    ReversalStarted {
        /// Which robot.
        robot: RobotId,
        /// Where it was blocked.
        at: Point,
    },
    /// A reversal episode ended.
    ReversalFinished {
        /// Which robot.
        robot: RobotId,
        /// Back steps committed during the episode.
        steps: u32,
    },
    /// Robots, obstacles and the trail map were cleared.
    Reset,
}

/// Bounded buffer of undelivered events.
#[derive(Debug)]
pub(crate) struct EventLog {
    pending: Vec<SimEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Queue an event, or count it as dropped when full.
    pub fn push(&mut self, event: SimEvent) {
        if self.pending.len() < self.capacity {
            self.pending.push(event);
        } else {
            self.dropped += 1;
        }
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
