//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Load from a file
    File(PathBuf),
    /// Load from environment variables
    Environment,
    /// `STARROUTE_*` variables given explicitly, applied like the environment
    Variables(Vec<(String, String)>),
    /// Explicit config object (for programmatic use)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Supports layered configuration with precedence:
/// defaults < file < environment < explicit overrides
///
/// # Example
///
/// ```no_run
/// use starroute_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".starroute.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), starroute_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// Apply `STARROUTE_*` pairs as if they came from the environment.
    pub fn with_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.sources
            .push(ConfigSource::Variables(vars.into_iter().collect()));
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Build and validate the final configuration
    ///
    /// Merges all sources in order, with later sources taking precedence.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    config = merge::merge(config, file_config);
                }
                // Variables set fields directly so they can restore a default
                // value that a file changed.
                ConfigSource::Environment => env::apply_vars(&mut config, std::env::vars()),
                ConfigSource::Variables(vars) => env::apply_vars(&mut config, vars),
                ConfigSource::Explicit(explicit_config) => {
                    config = merge::merge(config, explicit_config);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Searches for the first existing file among:
    /// 1. `.starroute.toml`
    /// 2. `.starroute.yml` or `.starroute.yaml`
    /// 3. `.starroute.json`
    ///
    /// Environment overlays are applied on top. If no file is found the
    /// defaults are used.
    pub fn load() -> Result<Self> {
        let default_paths = [
            ".starroute.toml",
            ".starroute.yml",
            ".starroute.yaml",
            ".starroute.json",
        ];

        let mut builder = ConfigBuilder::new();
        if let Some(path) = default_paths.iter().find(|p| Path::new(p).exists()) {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file, plus environment overlays
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}
