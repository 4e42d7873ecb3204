//! Multi-waypoint route planning over a [`StarGraph`](starroute_graph::StarGraph).
//!
//! A [`Segment`] solves one start→end shortest path. A [`Route`] chains
//! segments through an ordered list of waypoints and keeps the two lists
//! consistent while waypoints are split off, removed or moved. The
//! [`session`] module persists the route identity between runs.

pub mod error;
pub mod options;
pub mod route;
pub mod segment;
pub mod session;

pub use error::RouteError;
pub use options::SearchOptions;
pub use route::{Route, RouteObserver};
pub use segment::{RouteStep, Segment};
pub use session::{
    restore_from_session, store_to_session, FileSessionStore, MemorySessionStore, SessionError,
    SessionRecord, SessionStore,
};
