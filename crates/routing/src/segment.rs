use crate::error::RouteError;
use crate::options::SearchOptions;
use serde::Serialize;
use starroute_graph::{StarGraph, SystemId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// One system on a solved path, with the weight accumulated from the
/// segment start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteStep {
    pub system: SystemId,
    pub cumulative: f64,
}

/// Shortest path between two systems for one metric/restriction setting.
///
/// Construction only binds the endpoints; nothing is computed until
/// [`Segment::build`] or [`Segment::rebuild`] runs. Each segment owns its
/// distance and predecessor tables, the graph is shared.
#[derive(Debug, Clone)]
pub struct Segment {
    graph: Arc<StarGraph>,
    start: SystemId,
    end: SystemId,
    options: SearchOptions,
    search: Option<SearchState>,
}

#[derive(Debug, Clone, PartialEq)]
struct SearchState {
    distances: HashMap<SystemId, f64>,
    predecessors: HashMap<SystemId, SystemId>,
}

impl Segment {
    pub fn new(graph: Arc<StarGraph>, start: SystemId, end: SystemId) -> Result<Self, RouteError> {
        Self::with_options(graph, start, end, SearchOptions::default())
    }

    pub fn with_options(
        graph: Arc<StarGraph>,
        start: SystemId,
        end: SystemId,
        options: SearchOptions,
    ) -> Result<Self, RouteError> {
        validate_endpoints(&graph, start, end)?;
        Ok(Self {
            graph,
            start,
            end,
            options,
            search: None,
        })
    }

    pub fn start(&self) -> SystemId {
        self.start
    }

    /// The configured end, which stays put when global settings change.
    pub fn destination(&self) -> SystemId {
        self.end
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn is_built(&self) -> bool {
        self.search.is_some()
    }

    /// Re-bind the endpoints. A change discards the computed tables.
    pub fn set_endpoints(&mut self, start: SystemId, end: SystemId) -> Result<(), RouteError> {
        validate_endpoints(&self.graph, start, end)?;
        if (start, end) != (self.start, self.end) {
            self.start = start;
            self.end = end;
            self.search = None;
        }
        Ok(())
    }

    /// Store new options without recomputing; the next rebuild uses them.
    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    /// Solve from the start under `options`, remembering them for rebuilds.
    pub fn build(&mut self, options: SearchOptions) {
        self.options = options;
        self.search = Some(shortest_paths(&self.graph, self.start, &options));
        trace!(segment = %self, metric = %options.metric, "segment built");
    }

    /// Re-run [`Segment::build`] with the stored options.
    ///
    /// Returns true when the path to the destination differs from the one
    /// computed before, including when nothing had been computed yet.
    pub fn rebuild(&mut self) -> bool {
        let before = self.route().ok();
        self.build(self.options);
        before != self.route().ok()
    }

    /// Path from the start to the configured end.
    pub fn route(&self) -> Result<Vec<RouteStep>, RouteError> {
        self.route_to(self.end)
    }

    /// Path from the start to `target`. An unreachable target yields at
    /// most one step; that is the only "no path" signal.
    pub fn route_to(&self, target: SystemId) -> Result<Vec<RouteStep>, RouteError> {
        let search = self.search.as_ref().ok_or(RouteError::SegmentNotBuilt {
            from: self.start,
            to: self.end,
        })?;
        Ok(search.path(self.start, target))
    }

    /// Final step of the path to the configured end.
    pub fn last_node(&self) -> Option<RouteStep> {
        self.route().ok().and_then(|steps| steps.last().copied())
    }

    /// Weight of the path to the configured end, if there is one.
    pub fn total_weight(&self) -> Option<f64> {
        self.last_node()
            .filter(|step| step.system == self.end)
            .map(|step| step.cumulative)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id: SystemId| {
            self.graph
                .system(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        write!(f, "{} -> {}", name(self.start), name(self.end))
    }
}

fn validate_endpoints(graph: &StarGraph, start: SystemId, end: SystemId) -> Result<(), RouteError> {
    if start == end {
        return Err(RouteError::DegenerateSegment(start));
    }
    for id in [start, end] {
        if !graph.contains(id) {
            return Err(RouteError::UnknownSystem(id));
        }
    }
    Ok(())
}

impl SearchState {
    fn path(&self, start: SystemId, target: SystemId) -> Vec<RouteStep> {
        if !self.distances.contains_key(&target) {
            return Vec::new();
        }

        let mut steps = Vec::new();
        let mut current = target;
        loop {
            steps.push(RouteStep {
                system: current,
                cumulative: self.distances[&current],
            });
            if current == start {
                break;
            }
            match self.predecessors.get(&current) {
                Some(prev) => current = *prev,
                None => break,
            }
        }
        steps.reverse();
        steps
    }
}

/// Frontier entry. Ordered so the max-heap pops the lowest weight first,
/// and among equal weights the one discovered first.
#[derive(Debug)]
struct Candidate {
    weight: f64,
    seq: u64,
    system: SystemId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Dijkstra over the allowed jump points, run to completion so every
/// reachable system has a final distance.
fn shortest_paths(graph: &StarGraph, start: SystemId, options: &SearchOptions) -> SearchState {
    let mut distances = HashMap::new();
    let mut predecessors = HashMap::new();
    let mut settled = HashSet::new();
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;

    distances.insert(start, 0.0);
    frontier.push(Candidate {
        weight: 0.0,
        seq,
        system: start,
    });

    while let Some(Candidate { weight, system, .. }) = frontier.pop() {
        if !settled.insert(system) {
            continue;
        }

        for jump in graph.jump_points_from(system) {
            if settled.contains(&jump.destination)
                || !graph.allowed(jump, &options.restrictions)
            {
                continue;
            }

            let tentative = weight + graph.weight(jump, options.metric);
            let improves = distances
                .get(&jump.destination)
                .map_or(true, |known: &f64| tentative < *known);
            if improves {
                distances.insert(jump.destination, tentative);
                predecessors.insert(jump.destination, system);
                seq += 1;
                frontier.push(Candidate {
                    weight: tentative,
                    seq,
                    system: jump.destination,
                });
            }
        }
    }

    SearchState {
        distances,
        predecessors,
    }
}
