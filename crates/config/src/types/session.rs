//! Session persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and under which key the current route is kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file backing the session store
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Key of the route record inside the store
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            key: default_key(),
        }
    }
}

impl crate::validation::Validate for SessionConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::validate_non_empty;

        validate_non_empty("session.key", &self.key)?;
        validate_non_empty("session.path", &self.path.to_string_lossy())?;
        Ok(())
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(".starroute/session.json")
}

fn default_key() -> String {
    "currentRoute".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_blank_key_is_invalid() {
        let config = SessionConfig {
            key: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
