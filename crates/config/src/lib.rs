//! Configuration management for starroute
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//!
//! # Example
//!
//! ```no_run
//! use starroute_config::Config;
//!
//! // Load from default location (.starroute.{toml,yml,json})
//! let config = Config::load()?;
//!
//! let metric = config.routing.metric;
//! let session_key = config.session.key;
//! # Ok::<(), starroute_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, Result};
pub use loader::ConfigBuilder;
pub use types::*;

/// Trait for config validation
pub use validation::Validate;
