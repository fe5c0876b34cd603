//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a robot within a simulation.
///
/// Robots are numbered in spawn order starting at zero. IDs are stable for
/// the lifetime of a simulation and reused after a full reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot-{}", self.0)
    }
}

impl From<u32> for RobotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_index() {
        assert_eq!(RobotId(3).to_string(), "robot-3");
    }

    #[test]
    fn ids_order_by_spawn_index() {
        let mut ids = vec![RobotId(2), RobotId(0), RobotId::from(1)];
        ids.sort();
        assert_eq!(ids, vec![RobotId(0), RobotId(1), RobotId(2)]);
    }
}
