//! The owning registry of shapes and connectors
//!
//! Anchors refer to elements by id, never by pointer, so the diagram is the
//! single place where ids resolve to live geometry. It implements
//! [`AnchorHost`] for the connectors it owns and drives the movement and
//! color cascades: translate the shapes, then let every connector re-sync
//! against the already-updated boundaries.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::connector::anchor::{Anchor, AnchorHost, EdgeRef, ElementId};
use crate::connector::Connector;
use crate::error::DiagramError;
use crate::geometry::{midpoint, BoundingBox, KeyAllocator, Point, RoutingConfig, Vec2, VertexKey};
use crate::palette::Palette;
use crate::shape::{Shape, ShapeKind};
use crate::style::Color;

/// Registry id of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u64);

/// Registry id of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub(crate) u64);

/// A diagram: every shape and connector, the key allocator they share, and
/// the routing configuration connectors are created with
#[derive(Debug, Default)]
pub struct Diagram {
    shapes: BTreeMap<ShapeId, Shape>,
    connectors: BTreeMap<ConnectorId, Connector>,
    keys: KeyAllocator,
    next_shape: u64,
    next_connector: u64,
    config: RoutingConfig,
    palette: Palette,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom routing configuration for connectors created from now on
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom palette for shapes created from now on
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// The shared key allocator; useful when building shapes by hand before
    /// inserting them
    pub fn keys(&self) -> &KeyAllocator {
        &self.keys
    }

    pub fn config(&self) -> RoutingConfig {
        self.config
    }

    /// Create and register a shape of the given kind, styled from the
    /// diagram's palette
    pub fn add_shape(&mut self, kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> ShapeId {
        let mut shape = Shape::new(kind, x, y, width, height, &self.keys);
        shape.set_fill_color(self.palette.color_or_default("shape-fill-1"));
        shape.set_border_color(self.palette.color_or_default("shape-border-1"));
        shape.style.text_color = self.palette.color_or_default("text-1");
        self.insert_shape(shape)
    }

    /// Register a shape built elsewhere (with this diagram's allocator)
    pub fn insert_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.shapes.insert(id, shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Remove a shape. Connectors anchored to it are left in place; their
    /// anchors stop resolving and the connectors quietly stop tracking.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(&id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, s)| (*id, s))
    }

    /// Create and register an empty connector using the diagram's routing
    /// configuration
    pub fn add_connector(&mut self) -> ConnectorId {
        let id = ConnectorId(self.next_connector);
        self.next_connector += 1;
        self.connectors.insert(id, Connector::new(self.config));
        id
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.get_mut(&id)
    }

    pub fn remove_connector(&mut self, id: ConnectorId) -> Option<Connector> {
        self.connectors.remove(&id)
    }

    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> {
        self.connectors.iter().map(|(id, c)| (*id, c))
    }

    /// Bind a connector's first endpoint to an anchor
    pub fn start_connector(&mut self, id: ConnectorId, anchor: Anchor) -> Result<(), DiagramError> {
        let mut conn = self
            .connectors
            .remove(&id)
            .ok_or(DiagramError::UnknownConnector(id))?;
        let result = conn.start(anchor, &*self, &self.keys);
        self.connectors.insert(id, conn);
        result
    }

    /// Append an interactive waypoint to a connector being drawn
    pub fn extend_connector(&mut self, id: ConnectorId, x: f64, y: f64) -> Result<(), DiagramError> {
        let keys = &self.keys;
        self.connectors
            .get_mut(&id)
            .ok_or(DiagramError::UnknownConnector(id))?
            .extend(Vec2::new(x, y), keys);
        Ok(())
    }

    /// Bind a connector's final endpoint to an anchor and settle its path
    pub fn finish_connector(&mut self, id: ConnectorId, anchor: Anchor) -> Result<(), DiagramError> {
        let mut conn = self
            .connectors
            .remove(&id)
            .ok_or(DiagramError::UnknownConnector(id))?;
        let result = conn.finish(anchor, &*self, &self.keys);
        self.connectors.insert(id, conn);
        result
    }

    /// Re-anchor both ends of one connector against current geometry
    pub fn sync_connector(&mut self, id: ConnectorId) -> Result<(), DiagramError> {
        let mut conn = self
            .connectors
            .remove(&id)
            .ok_or(DiagramError::UnknownConnector(id))?;
        conn.sync_start(&*self, &self.keys);
        conn.sync_end(&*self, &self.keys);
        self.connectors.insert(id, conn);
        Ok(())
    }

    /// Convenience: connect two shapes edge-midpoint to edge-midpoint,
    /// picking for each shape the boundary edge that faces the other
    pub fn connect(&mut self, from: ShapeId, to: ShapeId) -> Result<ConnectorId, DiagramError> {
        let from_shape = self.shapes.get(&from).ok_or(DiagramError::UnknownShape(from))?;
        let to_shape = self.shapes.get(&to).ok_or(DiagramError::UnknownShape(to))?;
        let (start_edge, _) =
            facing_edge(from_shape, to_shape.center()).ok_or(DiagramError::UnknownShape(from))?;
        let (end_edge, end_mid) =
            facing_edge(to_shape, from_shape.center()).ok_or(DiagramError::UnknownShape(to))?;

        let id = self.add_connector();
        self.start_connector(id, Anchor::new(ElementId::Shape(from), start_edge, 0.5))?;
        self.extend_connector(id, end_mid.x, end_mid.y)?;
        self.finish_connector(id, Anchor::new(ElementId::Shape(to), end_edge, 0.5))?;
        Ok(id)
    }

    /// Translate one shape and cascade to every connector
    pub fn move_shape(&mut self, id: ShapeId, dx: f64, dy: f64) -> Result<(), DiagramError> {
        if !self.shapes.contains_key(&id) {
            return Err(DiagramError::UnknownShape(id));
        }
        self.move_shapes(&[id], dx, dy);
        Ok(())
    }

    /// Translate a set of shapes by (dx, dy) and re-route every connector.
    ///
    /// The shapes move first; anchors hold keys rather than positions, so
    /// every subsequent sync already resolves against the updated
    /// boundaries. A connector linked to the set at both ends is bulk
    /// translated before its syncs.
    pub fn move_shapes(&mut self, ids: &[ShapeId], dx: f64, dy: f64) {
        for id in ids {
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.translate(dx, dy);
            }
        }
        let connector_ids: Vec<ConnectorId> = self.connectors.keys().copied().collect();
        for cid in connector_ids {
            if let Some(mut conn) = self.connectors.remove(&cid) {
                conn.shapes_moved(dx, dy, ids, &*self, &self.keys);
                self.connectors.insert(cid, conn);
            }
        }
    }

    /// Change a shape's border color and cascade it onto every connector
    /// anchored to the shape, chaining through connectors anchored to those
    /// connectors in turn
    pub fn set_shape_border_color(&mut self, id: ShapeId, color: Color) -> Result<(), DiagramError> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::UnknownShape(id))?;
        shape.set_border_color(color);
        self.cascade_border_color(ElementId::Shape(id));
        Ok(())
    }

    fn cascade_border_color(&mut self, root: ElementId) {
        debug!("cascading border color from {:?}", root);
        // anchors can form cycles between connectors; each connector is
        // recolored at most once
        let mut visited: HashSet<ConnectorId> = HashSet::new();
        let mut pending = vec![root];
        while let Some(source) = pending.pop() {
            let Some(color) = self.border_color(source) else {
                continue;
            };
            let linked: Vec<ConnectorId> = self
                .connectors
                .iter()
                .filter(|(cid, conn)| {
                    !visited.contains(cid)
                        && conn
                            .start_anchor()
                            .is_some_and(|a| self.has_border_edge(source, a.edge))
                })
                .map(|(cid, _)| *cid)
                .collect();
            for cid in linked {
                visited.insert(cid);
                if let Some(conn) = self.connectors.get_mut(&cid) {
                    conn.set_color(color);
                }
                pending.push(ElementId::Connector(cid));
            }
        }
    }

    /// Smallest box containing every shape outline and connector path
    pub fn bounds(&self) -> BoundingBox {
        let shape_points = self
            .shapes
            .values()
            .flat_map(|s| s.vertices().iter().map(Point::pos));
        let connector_points = self
            .connectors
            .values()
            .flat_map(|c| c.waypoints().iter().map(Point::pos));
        BoundingBox::around(shape_points.chain(connector_points))
    }
}

impl AnchorHost for Diagram {
    fn vertex_by_key(&self, target: ElementId, key: VertexKey) -> Option<Point> {
        match target {
            ElementId::Shape(id) => self.shapes.get(&id)?.vertex_by_key(key),
            ElementId::Connector(id) => self.connectors.get(&id)?.vertex_by_key(key),
        }
    }

    fn contains_point(&self, target: ElementId, x: f64, y: f64) -> bool {
        match target {
            ElementId::Shape(id) => self.shapes.get(&id).is_some_and(|s| s.contains(x, y)),
            // connectors are open polylines: nothing is ever inside them
            ElementId::Connector(_) => false,
        }
    }

    fn is_connector(&self, target: ElementId) -> bool {
        matches!(target, ElementId::Connector(_))
    }

    fn border_color(&self, target: ElementId) -> Option<Color> {
        match target {
            ElementId::Shape(id) => self.shapes.get(&id).map(|s| s.style.border),
            ElementId::Connector(id) => self.connectors.get(&id).map(|c| c.color()),
        }
    }

    fn has_border_edge(&self, target: ElementId, edge: EdgeRef) -> bool {
        match target {
            ElementId::Shape(id) => self.shapes.get(&id).is_some_and(|s| s.has_border_edge(edge)),
            ElementId::Connector(id) => self
                .connectors
                .get(&id)
                .is_some_and(|c| c.has_border_edge(edge)),
        }
    }
}

/// The boundary edge of `shape` whose midpoint lies closest to `toward`,
/// with that midpoint
fn facing_edge(shape: &Shape, toward: Vec2) -> Option<(EdgeRef, Vec2)> {
    let vertices = shape.vertices();
    let n = vertices.len();
    let mut best: Option<(f64, EdgeRef, Vec2)> = None;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let mid = midpoint(a.pos(), b.pos());
        let distance = mid.sub(toward).norm();
        if best.map_or(true, |(d, _, _)| distance < d) {
            best = Some((distance, EdgeRef::new(a.key(), b.key()), mid));
        }
    }
    best.map(|(_, edge, mid)| (edge, mid))
}
