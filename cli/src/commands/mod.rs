pub mod context;
pub mod edit;
pub mod path;
pub mod plan;
pub mod ui;

pub use context::Context;
pub use edit::{handle_move, handle_remove, handle_split};
pub use path::handle_path;
pub use plan::{handle_clear, handle_plan, handle_show};

use clap::{Parser, Subcommand, ValueEnum};
use starroute_config::RouteMetric;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "starroute")]
#[command(about = "plan multi-waypoint routes across a star map")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Map data (JSON); overrides map.path from the config
    #[arg(short, long, value_name = "FILE", global = true)]
    pub map: Option<PathBuf>,

    /// Metric to minimise
    #[arg(long, value_enum, global = true)]
    pub metric: Option<CliMetric>,

    /// Skip unconfirmed and undiscovered jump points
    #[arg(long, global = true)]
    pub avoid_unconfirmed: bool,

    /// Never enter hostile systems
    #[arg(long, global = true)]
    pub avoid_hostile: bool,

    /// Never enter off-limits systems
    #[arg(long, global = true)]
    pub avoid_off_limits: bool,

    /// Output in JSON format
    #[arg(long, default_value_t = false, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shortest path between two systems
    Path {
        /// Origin (id or name)
        from: String,
        /// Destination (id or name)
        to: String,
    },
    /// Plan a route and store it as the current route
    Plan {
        /// Start system
        start: String,
        /// Waypoints in visiting order; the last one is the destination
        #[arg(required = true)]
        waypoints: Vec<String>,
    },
    /// Show the current route
    Show,
    /// Turn a system the route passes through into a waypoint
    Split { system: String },
    /// Remove an intermediate waypoint
    Remove { system: String },
    /// Move the start, a waypoint or a pass-through system elsewhere
    Move { old: String, new: String },
    /// Forget the current route
    Clear,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliMetric {
    Time,
    Distance,
    Fuel,
}

impl From<CliMetric> for RouteMetric {
    fn from(m: CliMetric) -> Self {
        match m {
            CliMetric::Time => RouteMetric::Time,
            CliMetric::Distance => RouteMetric::Distance,
            CliMetric::Fuel => RouteMetric::Fuel,
        }
    }
}
