//! Log filtering configuration

use serde::{Deserialize, Serialize};

/// Log level used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl LoggingConfig {
    pub const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl crate::validation::Validate for LoggingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_one_of("logging.level", &self.level, &Self::LEVELS)
    }
}

fn default_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_invalid_level() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
