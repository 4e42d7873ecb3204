use crate::graph::JumpPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Travel time per unit of jump length.
pub const JUMP_TIME_FACTOR: f64 = 4.0;

/// A named weighting of jump points. Every metric yields non-negative
/// weights, which the shortest-path search relies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Time,
    Distance,
    Fuel,
}

impl Metric {
    pub fn weight(&self, jump: &JumpPoint) -> f64 {
        match self {
            Metric::Distance => jump.length,
            Metric::Time => jump_time(jump),
            Metric::Fuel => fuel_consumption(jump),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Time => "time",
            Metric::Distance => "distance",
            Metric::Fuel => "fuel",
        };
        f.write_str(name)
    }
}

fn jump_time(jump: &JumpPoint) -> f64 {
    jump.length * JUMP_TIME_FACTOR
}

// Jumps are free to traverse today.
fn fuel_consumption(_jump: &JumpPoint) -> f64 {
    0.0
}

/// Which jump points a search may use.
///
/// The default allows every jump point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Restrictions {
    /// Skip unconfirmed and undiscovered jump points.
    pub avoid_unconfirmed: bool,
    /// Skip jumps into hostile systems.
    pub avoid_hostile: bool,
    /// Skip jumps into off-limits systems.
    pub avoid_off_limits: bool,
}

impl Restrictions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            avoid_unconfirmed: true,
            avoid_hostile: true,
            avoid_off_limits: true,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{JumpKind, SystemId};

    fn jump(length: f64) -> JumpPoint {
        JumpPoint {
            source: SystemId(1),
            destination: SystemId(2),
            kind: JumpKind::Normal,
            name: "[A to B]".to_string(),
            length,
        }
    }

    #[test]
    fn weights_per_metric() {
        let j = jump(2.5);
        assert_eq!(Metric::Distance.weight(&j), 2.5);
        assert_eq!(Metric::Time.weight(&j), 10.0);
        assert_eq!(Metric::Fuel.weight(&j), 0.0);
    }

    #[test]
    fn default_restrictions_allow_everything() {
        assert!(Restrictions::default().is_none());
        assert!(!Restrictions::all().is_none());
    }
}
