//! Anchors: how a connector endpoint is pinned to a boundary edge
//!
//! An anchor is a plain value: which element, which directed edge of its
//! boundary (by vertex key pair), and a relative offset along that edge. It
//! never holds the element itself - resolution goes through the owning
//! registry every time, so a shape can regenerate or disappear without
//! leaving a dangling pointer anywhere.

use crate::diagram::{ConnectorId, ShapeId};
use crate::geometry::{Point, Vec2, VertexKey};
use crate::style::Color;

/// A directed boundary edge identified by the keys of its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub p1: VertexKey,
    pub p2: VertexKey,
}

impl EdgeRef {
    pub fn new(p1: VertexKey, p2: VertexKey) -> Self {
        Self { p1, p2 }
    }
}

/// Anything a connector endpoint can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Shape(ShapeId),
    Connector(ConnectorId),
}

/// One endpoint binding: target element, boundary edge, and position along
/// the edge.
///
/// `offset` is measured from the edge's second vertex: the bound position is
/// `p2 - (p2 - p1) * offset`, so 0.0 sits on `p2` and 1.0 on `p1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub target: ElementId,
    pub edge: EdgeRef,
    pub offset: f64,
}

impl Anchor {
    pub fn new(target: ElementId, edge: EdgeRef, offset: f64) -> Self {
        Self {
            target,
            edge,
            offset,
        }
    }

    /// Current world positions of the anchor edge's endpoints, or None if the
    /// target no longer exposes either vertex
    pub fn edge_points(&self, host: &impl AnchorHost) -> Option<(Point, Point)> {
        let p1 = host.vertex_by_key(self.target, self.edge.p1)?;
        let p2 = host.vertex_by_key(self.target, self.edge.p2)?;
        Some((p1, p2))
    }

    /// Current world position the anchor binds to, or None when the anchor
    /// has been invalidated (the connector is orphaned)
    pub fn resolve(&self, host: &impl AnchorHost) -> Option<Vec2> {
        let (p1, p2) = self.edge_points(host)?;
        let (p1, p2) = (p1.pos(), p2.pos());
        Some(p2.sub(p2.sub(p1).scale(self.offset)))
    }
}

/// Resolution seam between connectors and the registry that owns every
/// element. The diagram implements this; tests can substitute a stub.
pub trait AnchorHost {
    /// Look up a boundary vertex of the target by identity key
    fn vertex_by_key(&self, target: ElementId, key: VertexKey) -> Option<Point>;

    /// Point-in-polygon test against the target's boundary. Connector
    /// targets are open polylines and never contain anything.
    fn contains_point(&self, target: ElementId, x: f64, y: f64) -> bool;

    /// Whether the target is itself a connector
    fn is_connector(&self, target: ElementId) -> bool;

    /// The target's border color, used by the color cascade
    fn border_color(&self, target: ElementId) -> Option<Color>;

    /// Whether the directed edge is currently part of the target's boundary
    fn has_border_edge(&self, target: ElementId, edge: EdgeRef) -> bool;
}
