use super::Cli;
use anyhow::{anyhow, bail, Context as _, Result};
use starroute_config::Config;
use starroute_graph::{load_map, StarGraph, SystemId};
use starroute_routing::{FileSessionStore, Route, SearchOptions};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Everything a command needs: merged settings, the loaded map and the
/// output mode.
pub struct Context {
    pub config: Config,
    pub graph: Arc<StarGraph>,
    pub options: SearchOptions,
    pub json: bool,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::load().context("failed to load configuration")?,
        };
        apply_flags(&mut config, cli);
        init_logging(&config.logging.level);

        let map_path = match cli.map.clone().or_else(|| config.map.path.clone()) {
            Some(path) => path,
            None => bail!("no map data given; pass --map or set map.path in the config"),
        };
        let graph = load_map(&map_path)?;
        let options = SearchOptions::from(&config.routing);
        debug!(metric = %options.metric, restrictions = ?options.restrictions, "search options");

        Ok(Self {
            config,
            graph: Arc::new(graph),
            options,
            json: cli.json,
        })
    }

    /// Resolve an id or (partial) name to a system on the map.
    pub fn resolve(&self, query: &str) -> Result<SystemId> {
        self.graph
            .resolve_system(query)
            .map(|system| system.id)
            .map_err(|e| anyhow!(e))
    }

    /// A route bound to the configured session file, restored from it.
    pub fn session_route(&self) -> Result<Route> {
        let mut route = Route::new(Arc::clone(&self.graph), self.options);
        let store = FileSessionStore::new(&self.config.session.path);
        route.attach_session(Box::new(store), self.config.session.key.clone());
        route
            .restore_from_session()
            .with_context(|| format!("failed to read session {}", self.config.session.path.display()))?;
        Ok(route)
    }
}

fn apply_flags(config: &mut Config, cli: &Cli) {
    if let Some(metric) = cli.metric {
        config.routing.metric = metric.into();
    }
    config.routing.avoid_unconfirmed |= cli.avoid_unconfirmed;
    config.routing.avoid_hostile |= cli.avoid_hostile;
    config.routing.avoid_off_limits |= cli.avoid_off_limits;
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
