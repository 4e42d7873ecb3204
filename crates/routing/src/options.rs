use starroute_config::{RouteMetric, RoutingConfig};
use starroute_graph::{Metric, Restrictions};

/// Metric and restriction set a segment is solved with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    pub metric: Metric,
    pub restrictions: Restrictions,
}

impl SearchOptions {
    pub fn new(metric: Metric, restrictions: Restrictions) -> Self {
        Self {
            metric,
            restrictions,
        }
    }

    pub fn unrestricted(metric: Metric) -> Self {
        Self::new(metric, Restrictions::none())
    }
}

impl From<&RoutingConfig> for SearchOptions {
    fn from(config: &RoutingConfig) -> Self {
        let metric = match config.metric {
            RouteMetric::Time => Metric::Time,
            RouteMetric::Distance => Metric::Distance,
            RouteMetric::Fuel => Metric::Fuel,
        };
        Self::new(
            metric,
            Restrictions {
                avoid_unconfirmed: config.avoid_unconfirmed,
                avoid_hostile: config.avoid_hostile,
                avoid_off_limits: config.avoid_off_limits,
            },
        )
    }
}
