//! Configuration merging logic
//!
//! Merges configurations from multiple sources with proper precedence.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
///
/// Values in `overlay` that differ from the defaults replace the values in
/// `base`; default-valued fields keep what `base` had.
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.routing = merge_routing(base.routing, overlay.routing);
    base.session = merge_session(base.session, overlay.session);
    base.map = merge_map(base.map, overlay.map);
    base.logging = merge_logging(base.logging, overlay.logging);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_routing(base: RoutingConfig, overlay: RoutingConfig) -> RoutingConfig {
    let default = RoutingConfig::default();
    RoutingConfig {
        metric: pick(base.metric, overlay.metric, default.metric),
        avoid_unconfirmed: pick(
            base.avoid_unconfirmed,
            overlay.avoid_unconfirmed,
            default.avoid_unconfirmed,
        ),
        avoid_hostile: pick(base.avoid_hostile, overlay.avoid_hostile, default.avoid_hostile),
        avoid_off_limits: pick(
            base.avoid_off_limits,
            overlay.avoid_off_limits,
            default.avoid_off_limits,
        ),
    }
}

fn merge_session(base: SessionConfig, overlay: SessionConfig) -> SessionConfig {
    let default = SessionConfig::default();
    SessionConfig {
        path: pick(base.path, overlay.path, default.path),
        key: pick(base.key, overlay.key, default.key),
    }
}

fn merge_map(base: MapConfig, overlay: MapConfig) -> MapConfig {
    MapConfig {
        path: overlay.path.or(base.path),
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    let default = LoggingConfig::default();
    LoggingConfig {
        level: pick(base.level, overlay.level, default.level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_overlay_wins_for_non_defaults() {
        let mut base = Config::default();
        base.routing.metric = RouteMetric::Distance;
        base.session.key = "base".to_string();

        let mut overlay = Config::default();
        overlay.session.key = "overlay".to_string();
        overlay.map.path = Some(PathBuf::from("systems.json"));

        let merged = merge(base, overlay);
        assert_eq!(merged.routing.metric, RouteMetric::Distance);
        assert_eq!(merged.session.key, "overlay");
        assert_eq!(merged.map.path, Some(PathBuf::from("systems.json")));
    }

    #[test]
    fn test_default_overlay_is_identity() {
        let mut base = Config::default();
        base.routing.avoid_hostile = true;
        base.logging.level = "debug".to_string();
        let merged = merge(base.clone(), Config::default());
        assert_eq!(merged, base);
    }
}
