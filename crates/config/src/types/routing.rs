//! Route planning configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weighting used to rank candidate routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMetric {
    /// Estimated travel time (default)
    #[default]
    Time,
    /// Geometric length of the jumps
    Distance,
    /// Fuel consumed by the jumps
    Fuel,
}

impl RouteMetric {
    pub const OPTIONS: [&'static str; 3] = ["time", "distance", "fuel"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMetric::Time => "time",
            RouteMetric::Distance => "distance",
            RouteMetric::Fuel => "fuel",
        }
    }
}

impl fmt::Display for RouteMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMetric {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(RouteMetric::Time),
            "distance" => Ok(RouteMetric::Distance),
            "fuel" => Ok(RouteMetric::Fuel),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "routing.metric",
                s,
                &RouteMetric::OPTIONS,
            )),
        }
    }
}

/// Route planning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Metric used to rank routes
    #[serde(default)]
    pub metric: RouteMetric,

    /// Skip jump points that are unconfirmed or undiscovered
    #[serde(default)]
    pub avoid_unconfirmed: bool,

    /// Skip jump points leading into hostile systems
    #[serde(default)]
    pub avoid_hostile: bool,

    /// Skip jump points leading into off-limits systems
    #[serde(default)]
    pub avoid_off_limits: bool,
}

impl crate::validation::Validate for RoutingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        // Every field is constrained by its type.
        Ok(())
    }
}
