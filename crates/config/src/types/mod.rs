//! Configuration type definitions
//!
//! Each section is self-contained with validation and sensible defaults.

pub mod logging;
pub mod map;
pub mod routing;
pub mod session;

pub use logging::LoggingConfig;
pub use map::MapConfig;
pub use routing::{RouteMetric, RoutingConfig};
pub use session::SessionConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Route planning behaviour (metric, restrictions)
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Where the current route is persisted between invocations
    #[serde(default)]
    pub session: SessionConfig,

    /// Map data location
    #[serde(default)]
    pub map: MapConfig,

    /// Log filtering
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.routing.validate()?;
        self.session.validate()?;
        self.map.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
