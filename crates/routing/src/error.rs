use starroute_graph::SystemId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RouteError {
    #[error("No route from {from_name} to {to_name} available")]
    SegmentUnreachable {
        from: SystemId,
        to: SystemId,
        from_name: String,
        to_name: String,
    },

    #[error("a segment cannot start and end at system {0}")]
    DegenerateSegment(SystemId),

    #[error("unknown system {0}")]
    UnknownSystem(SystemId),

    #[error("segment {from} -> {to} has not been built")]
    SegmentNotBuilt { from: SystemId, to: SystemId },

    #[error("cannot {operation} at system {system}: {reason}")]
    EditRejected {
        operation: &'static str,
        system: SystemId,
        reason: String,
    },
}

impl RouteError {
    /// True for failures that mean "no route with the current settings",
    /// as opposed to a rejected or malformed request.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RouteError::SegmentUnreachable { .. })
    }
}
