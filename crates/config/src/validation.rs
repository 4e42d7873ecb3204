//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this trait for any config type that needs validation beyond
/// type-level checks.
pub trait Validate {
    /// Returns `Ok(())` if validation passes, or a `ConfigError` describing
    /// what failed.
    fn validate(&self) -> Result<()>;
}

/// Helper function to validate a string is one of a fixed set of options
pub fn validate_one_of(field: impl Into<String>, value: &str, options: &[&str]) -> Result<()> {
    if options.iter().any(|opt| opt.eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    Err(ConfigError::invalid_enum(field, value, options))
}

/// Helper function to validate a string is not blank
pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_valid() {
        assert!(validate_one_of("test", "INFO", &["info", "warn"]).is_ok());
    }

    #[test]
    fn test_one_of_invalid() {
        assert!(validate_one_of("test", "loud", &["info", "warn"]).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(validate_non_empty("test", "key").is_ok());
        assert!(validate_non_empty("test", "   ").is_err());
    }
}
