//! Map data location

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Default map data file used when `--map` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl crate::validation::Validate for MapConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if let Some(path) = &self.path {
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                return Err(ConfigError::ValidationError {
                    field: "map.path".to_string(),
                    message: format!("expected a .json map file, got {}", path.display()),
                });
            }
        }
        Ok(())
    }
}
