//! Star map graph model.
//!
//! Systems are stored in an arena addressed by stable indices; jump points
//! are directed edges between them. The graph is built once (usually by the
//! [`loader`]) and then shared read-only by every route computation.

pub mod graph;
pub mod loader;
pub mod metric;

pub use graph::{
    GraphBuilder, GraphError, JumpKind, JumpPoint, ResolutionError, StarGraph, System, SystemId,
    SystemLookup,
};
pub use loader::{load_map, parse_map};
pub use metric::{Metric, Restrictions, JUMP_TIME_FACTOR};
