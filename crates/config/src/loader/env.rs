//! Environment variable configuration overlay
//!
//! Supports environment variables in the format:
//! `STARROUTE_<section>_<field>=value`
//!
//! Examples:
//! - `STARROUTE_ROUTING_METRIC=distance`
//! - `STARROUTE_ROUTING_AVOID_HOSTILE=true`
//! - `STARROUTE_SESSION_PATH=/tmp/route.json`

use crate::{error::ConfigError, types::*, Config, Result};
use std::path::PathBuf;

const PREFIX: &str = "STARROUTE_";

/// Set every `STARROUTE_*` variable directly on `config`.
///
/// Unlike merging an overlay, this can set a field back to its default.
/// Variables that fail to parse are reported and skipped.
pub fn apply_vars<I>(config: &mut Config, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars.into_iter().filter(|(k, _)| k.starts_with(PREFIX)) {
        if let Err(e) = apply_env_var(config, &key, &value) {
            eprintln!("Warning: failed to parse {}: {}", key, e);
        }
    }
}

/// Apply a single environment variable to config
fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let parts: Vec<&str> = key.split('_').collect();
    if parts.len() < 2 {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: STARROUTE_<section>_<field>".to_string(),
        });
    }

    let section = parts[0].to_lowercase();
    let field = parts[1..].join("_").to_lowercase();

    match section.as_str() {
        "routing" => apply_routing_var(&mut config.routing, &field, value),
        "session" => apply_session_var(&mut config.session, &field, value),
        "map" => apply_map_var(&mut config.map, &field, value),
        "logging" => apply_logging_var(&mut config.logging, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn apply_routing_var(config: &mut RoutingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "metric" => config.metric = value.parse()?,
        "avoid_unconfirmed" => config.avoid_unconfirmed = parse_bool(field, value)?,
        "avoid_hostile" => config.avoid_hostile = parse_bool(field, value)?,
        "avoid_off_limits" => config.avoid_off_limits = parse_bool(field, value)?,
        _ => return Err(unknown_field("ROUTING", field)),
    }
    Ok(())
}

fn apply_session_var(config: &mut SessionConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "path" => config.path = PathBuf::from(value),
        "key" => config.key = value.to_string(),
        _ => return Err(unknown_field("SESSION", field)),
    }
    Ok(())
}

fn apply_map_var(config: &mut MapConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "path" => config.path = Some(PathBuf::from(value)),
        _ => return Err(unknown_field("MAP", field)),
    }
    Ok(())
}

fn apply_logging_var(config: &mut LoggingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "level" => config.level = value.to_lowercase(),
        _ => return Err(unknown_field("LOGGING", field)),
    }
    Ok(())
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarError {
            var: field.to_uppercase(),
            message: format!("Invalid boolean: {}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unrelated_vars_change_nothing() {
        let mut config = Config::default();
        apply_vars(&mut config, vars(&[("PATH", "/usr/bin")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_routing_vars() {
        let mut config = Config::default();
        apply_vars(
            &mut config,
            vars(&[
                ("STARROUTE_ROUTING_METRIC", "distance"),
                ("STARROUTE_ROUTING_AVOID_OFF_LIMITS", "yes"),
            ]),
        );
        assert_eq!(config.routing.metric, RouteMetric::Distance);
        assert!(config.routing.avoid_off_limits);
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let mut config = Config::default();
        apply_vars(
            &mut config,
            vars(&[
                ("STARROUTE_ROUTING_AVOID_HOSTILE", "perhaps"),
                ("STARROUTE_SESSION_KEY", "route"),
                ("STARROUTE_NOPE", "x"),
            ]),
        );
        assert!(!config.routing.avoid_hostile);
        assert_eq!(config.session.key, "route");
    }

    #[test]
    fn test_vars_can_restore_defaults() {
        let mut config = Config::default();
        config.routing.metric = RouteMetric::Distance;
        config.routing.avoid_hostile = true;
        apply_vars(
            &mut config,
            vars(&[
                ("STARROUTE_ROUTING_METRIC", "time"),
                ("STARROUTE_ROUTING_AVOID_HOSTILE", "off"),
            ]),
        );
        assert_eq!(config.routing, RoutingConfig::default());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "STARROUTE_MAP_COLOUR", "red").is_err());
    }
}
