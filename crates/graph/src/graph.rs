use crate::metric::{Metric, Restrictions};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Stable external identifier of a system, as found in the map data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SystemId(pub u32);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct System {
    pub id: SystemId,
    pub name: String,
    /// Map position. Used to derive jump lengths, never as a search heuristic.
    pub position: [f64; 3],
    pub faction: String,
    pub hostile: bool,
    pub off_limits: bool,
}

impl System {
    pub fn new(id: u32, name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            id: SystemId(id),
            name: name.into(),
            position,
            faction: String::new(),
            hostile: false,
            off_limits: false,
        }
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = faction.into();
        self
    }

    pub fn hostile(mut self) -> Self {
        self.hostile = true;
        self
    }

    pub fn off_limits(mut self) -> Self {
        self.off_limits = true;
        self
    }

    pub fn distance_to(&self, other: &System) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    Normal,
    Unconfirmed,
    Undiscovered,
}

impl JumpKind {
    /// Parse the short codes used in map data (`NORMAL`, `UNCONF`, `UNDISC`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "NORMAL" => Some(JumpKind::Normal),
            "UNCONF" => Some(JumpKind::Unconfirmed),
            "UNDISC" => Some(JumpKind::Undiscovered),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            JumpKind::Normal => "NORMAL",
            JumpKind::Unconfirmed => "UNCONF",
            JumpKind::Undiscovered => "UNDISC",
        }
    }

    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, JumpKind::Unconfirmed | JumpKind::Undiscovered)
    }
}

/// A directed connection between two distinct systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpPoint {
    pub source: SystemId,
    pub destination: SystemId,
    pub kind: JumpKind,
    pub name: String,
    pub length: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("system {0} is defined more than once")]
    DuplicateSystem(SystemId),
    #[error("unknown system {0}")]
    UnknownSystem(SystemId),
    #[error("jump point from system {0} leads back to itself")]
    SelfLoop(SystemId),
    #[error("jump point {source_id} -> {destination} has invalid length {length}")]
    InvalidLength {
        source_id: SystemId,
        destination: SystemId,
        length: f64,
    },
}

/// Resolves ids coming from outside the graph (session records, user input).
pub trait SystemLookup {
    fn resolve(&self, id: SystemId) -> Option<&System>;
}

/// Read-only star map.
#[derive(Debug, Clone)]
pub struct StarGraph {
    graph: StableGraph<System, JumpPoint>,
    node_indices: HashMap<SystemId, NodeIndex>,
}

impl StarGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn system(&self, id: SystemId) -> Option<&System> {
        self.node_indices
            .get(&id)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn contains(&self, id: SystemId) -> bool {
        self.node_indices.contains_key(&id)
    }

    /// Case-insensitive exact name match.
    pub fn system_by_name(&self, name: &str) -> Option<&System> {
        self.graph
            .node_weights()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.graph.node_weights()
    }

    pub fn system_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn jump_point_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing jump points of `id`, in the order they were added.
    pub fn jump_points_from(&self, id: SystemId) -> Vec<&JumpPoint> {
        let Some(idx) = self.node_indices.get(&id) else {
            return Vec::new();
        };
        // petgraph yields the most recently added edge first.
        let mut jumps: Vec<&JumpPoint> = self
            .graph
            .edges_directed(*idx, Direction::Outgoing)
            .map(|e| e.weight())
            .collect();
        jumps.reverse();
        jumps
    }

    pub fn jump_point(&self, source: SystemId, destination: SystemId) -> Option<&JumpPoint> {
        self.jump_points_from(source)
            .into_iter()
            .find(|j| j.destination == destination)
    }

    /// The jump point going the other way, found by scanning the
    /// destination's outgoing jumps.
    pub fn opposite(&self, jump: &JumpPoint) -> Option<&JumpPoint> {
        self.jump_point(jump.destination, jump.source)
    }

    pub fn weight(&self, jump: &JumpPoint, metric: Metric) -> f64 {
        metric.weight(jump)
    }

    pub fn allowed(&self, jump: &JumpPoint, restrictions: &Restrictions) -> bool {
        if restrictions.avoid_unconfirmed && jump.kind.is_unconfirmed() {
            return false;
        }
        if !restrictions.avoid_hostile && !restrictions.avoid_off_limits {
            return true;
        }
        match self.system(jump.destination) {
            Some(dest) => {
                !(restrictions.avoid_hostile && dest.hostile
                    || restrictions.avoid_off_limits && dest.off_limits)
            }
            None => false,
        }
    }

    /// Resolve a user supplied reference: numeric id first, then exact
    /// name, then a unique partial name match.
    pub fn resolve_system(&self, query: &str) -> Result<&System, ResolutionError> {
        if let Ok(raw) = query.trim().parse::<u32>() {
            if let Some(system) = self.system(SystemId(raw)) {
                return Ok(system);
            }
        }

        if let Some(system) = self.system_by_name(query.trim()) {
            return Ok(system);
        }

        let needle = query.trim().to_lowercase();
        let matches: Vec<&System> = self
            .graph
            .node_weights()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect();

        match matches.as_slice() {
            [] => Err(ResolutionError::NotFound(query.to_string())),
            [only] => Ok(only),
            many => {
                let mut candidates: Vec<String> = many.iter().map(|s| s.name.clone()).collect();
                candidates.sort();
                Err(ResolutionError::Ambiguous(query.to_string(), candidates))
            }
        }
    }
}

impl SystemLookup for StarGraph {
    fn resolve(&self, id: SystemId) -> Option<&System> {
        self.system(id)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ResolutionError {
    #[error("System not found: {0}")]
    NotFound(String),
    #[error("Ambiguous system reference '{0}'. Candidates: {1:?}")]
    Ambiguous(String, Vec<String>),
}

/// Assembles a [`StarGraph`], enforcing its structural invariants.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: StableGraph<System, JumpPoint>,
    node_indices: HashMap<SystemId, NodeIndex>,
}

impl GraphBuilder {
    pub fn add_system(&mut self, system: System) -> Result<&mut Self, GraphError> {
        if self.node_indices.contains_key(&system.id) {
            return Err(GraphError::DuplicateSystem(system.id));
        }
        let id = system.id;
        let idx = self.graph.add_node(system);
        self.node_indices.insert(id, idx);
        Ok(self)
    }

    /// Connect two systems; the length is the distance between them.
    pub fn connect(
        &mut self,
        source: SystemId,
        destination: SystemId,
        kind: JumpKind,
    ) -> Result<&mut Self, GraphError> {
        let (src_idx, dst_idx) = self.endpoints(source, destination)?;
        let length = self.graph[src_idx].distance_to(&self.graph[dst_idx]);
        self.insert_jump(src_idx, dst_idx, kind, length, None)
    }

    /// Connect two systems with an explicit length.
    pub fn connect_with_length(
        &mut self,
        source: SystemId,
        destination: SystemId,
        kind: JumpKind,
        length: f64,
    ) -> Result<&mut Self, GraphError> {
        let (src_idx, dst_idx) = self.endpoints(source, destination)?;
        self.insert_jump(src_idx, dst_idx, kind, length, None)
    }

    /// Connect with optional name and length overrides, as found in map data.
    pub fn connect_named(
        &mut self,
        source: SystemId,
        destination: SystemId,
        kind: JumpKind,
        name: Option<String>,
        length: Option<f64>,
    ) -> Result<&mut Self, GraphError> {
        let (src_idx, dst_idx) = self.endpoints(source, destination)?;
        let length =
            length.unwrap_or_else(|| self.graph[src_idx].distance_to(&self.graph[dst_idx]));
        self.insert_jump(src_idx, dst_idx, kind, length, name)
    }

    /// Connect both directions with the same kind.
    pub fn connect_both(
        &mut self,
        a: SystemId,
        b: SystemId,
        kind: JumpKind,
    ) -> Result<&mut Self, GraphError> {
        self.connect(a, b, kind)?;
        self.connect(b, a, kind)
    }

    pub fn build(self) -> StarGraph {
        debug!(
            systems = self.graph.node_count(),
            jump_points = self.graph.edge_count(),
            "star graph built"
        );
        StarGraph {
            graph: self.graph,
            node_indices: self.node_indices,
        }
    }

    fn endpoints(
        &self,
        source: SystemId,
        destination: SystemId,
    ) -> Result<(NodeIndex, NodeIndex), GraphError> {
        if source == destination {
            return Err(GraphError::SelfLoop(source));
        }
        let src = *self
            .node_indices
            .get(&source)
            .ok_or(GraphError::UnknownSystem(source))?;
        let dst = *self
            .node_indices
            .get(&destination)
            .ok_or(GraphError::UnknownSystem(destination))?;
        Ok((src, dst))
    }

    fn insert_jump(
        &mut self,
        src_idx: NodeIndex,
        dst_idx: NodeIndex,
        kind: JumpKind,
        length: f64,
        name: Option<String>,
    ) -> Result<&mut Self, GraphError> {
        let source = self.graph[src_idx].id;
        let destination = self.graph[dst_idx].id;

        if !length.is_finite() || length < 0.0 {
            return Err(GraphError::InvalidLength {
                source_id: source,
                destination,
                length,
            });
        }

        if self.graph.find_edge(src_idx, dst_idx).is_some() {
            debug!(%source, %destination, "duplicate jump point ignored");
            return Ok(self);
        }

        let name = name.filter(|n| n.len() > 1).unwrap_or_else(|| {
            format!(
                "[{} to {}]",
                self.graph[src_idx].name, self.graph[dst_idx].name
            )
        });

        self.graph.add_edge(
            src_idx,
            dst_idx,
            JumpPoint {
                source,
                destination,
                kind,
                name,
                length,
            },
        );
        Ok(self)
    }
}
