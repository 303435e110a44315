//! Error types for the geometry engine
//!
//! Movement operations never raise these - an unresolvable anchor makes a
//! sync a silent no-op, which is how a connector "orphans". The errors exist
//! for the operations that are explicitly asked to account for themselves:
//! registry lookups, endpoint binding, and anchor validation queries.

use thiserror::Error;

use crate::connector::anchor::{EdgeRef, ElementId};
use crate::diagram::{ConnectorId, ShapeId};

/// Errors surfaced by the diagram registry and connector binding
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The anchor's target no longer exposes the recorded edge; the
    /// connector has stopped tracking it
    #[error("anchor edge {edge:?} no longer resolves on {target:?}: connector orphaned")]
    UnresolvedAnchor { target: ElementId, edge: EdgeRef },

    /// Lookup of a shape id that is not (or no longer) in the registry
    #[error("unknown shape {0:?}")]
    UnknownShape(ShapeId),

    /// Lookup of a connector id that is not (or no longer) in the registry
    #[error("unknown connector {0:?}")]
    UnknownConnector(ConnectorId),

    /// An anchor rests on a zero-length boundary edge; offsets along it are
    /// meaningless (resolution clamps instead of faulting)
    #[error("zero-length anchor edge {edge:?} on {target:?}")]
    DegenerateEdge { target: ElementId, edge: EdgeRef },
}

impl DiagramError {
    /// Create an unresolved-anchor error
    pub fn unresolved_anchor(target: ElementId, edge: EdgeRef) -> Self {
        Self::UnresolvedAnchor { target, edge }
    }

    /// Create a degenerate-edge error
    pub fn degenerate_edge(target: ElementId, edge: EdgeRef) -> Self {
        Self::DegenerateEdge { target, edge }
    }

    /// Whether this error means the connector lost its target
    pub fn is_orphaned(&self) -> bool {
        matches!(self, Self::UnresolvedAnchor { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::KeyAllocator;

    #[test]
    fn test_unresolved_anchor_display() {
        let keys = KeyAllocator::new();
        let edge = EdgeRef::new(keys.next_key(), keys.next_key());
        let err = DiagramError::unresolved_anchor(ElementId::Shape(ShapeId(3)), edge);
        assert!(err.to_string().contains("orphaned"));
        assert!(err.is_orphaned());
    }

    #[test]
    fn test_unknown_shape_display() {
        let err = DiagramError::UnknownShape(ShapeId(9));
        assert!(err.to_string().contains("unknown shape"));
        assert!(!err.is_orphaned());
    }
}
