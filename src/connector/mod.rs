//! Orthogonal connectors and their attachment to shapes
//!
//! A connector owns an orthogonal waypoint path plus up to two anchors that
//! pin its endpoints to boundary edges of other elements. Once both ends are
//! bound the connector is driven entirely by `sync_start`/`sync_end`: resolve
//! the anchor against the live registry, hand the delta to the path engine,
//! and let the break state machine do the rest.

pub mod anchor;
pub mod path;

use tracing::debug;

use crate::diagram::ShapeId;
use crate::error::DiagramError;
use crate::geometry::{
    direction_between, point_near_segment, position_on_segment, Direction, KeyAllocator, Point,
    RoutingConfig, Vec2,
};
use crate::style::{Color, ConnectorStyle};

use anchor::{Anchor, AnchorHost, EdgeRef, ElementId};
use path::{BreakState, OrthoPath};

/// A multi-segment orthogonal connector line
#[derive(Debug, Clone)]
pub struct Connector {
    path: OrthoPath,
    link_start: Option<Anchor>,
    link_end: Option<Anchor>,
    start_dir: Option<Direction>,
    end_dir: Option<Direction>,
    pub style: ConnectorStyle,
    config: RoutingConfig,
}

impl Connector {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            path: OrthoPath::new(),
            link_start: None,
            link_end: None,
            start_dir: None,
            end_dir: None,
            style: ConnectorStyle::with_defaults(),
            config,
        }
    }

    pub fn with_style(mut self, style: ConnectorStyle) -> Self {
        self.style = style;
        self
    }

    /// Ordered waypoints, ready for a renderer
    pub fn waypoints(&self) -> &[Point] {
        self.path.points()
    }

    pub fn start_anchor(&self) -> Option<&Anchor> {
        self.link_start.as_ref()
    }

    pub fn end_anchor(&self) -> Option<&Anchor> {
        self.link_end.as_ref()
    }

    pub fn start_break(&self) -> BreakState {
        self.path.start_break()
    }

    pub fn end_break(&self) -> BreakState {
        self.path.end_break()
    }

    pub fn start_dir(&self) -> Option<Direction> {
        self.start_dir
    }

    pub fn end_dir(&self) -> Option<Direction> {
        self.end_dir
    }

    pub fn color(&self) -> Color {
        self.style.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    /// Bind the first endpoint: seed the path at the anchor's resolved
    /// position, adopt the target's border color, and classify the initial
    /// direction from the anchor edge.
    pub fn start(
        &mut self,
        anchor: Anchor,
        host: &impl AnchorHost,
        keys: &KeyAllocator,
    ) -> Result<(), DiagramError> {
        let (p1, p2) = anchor
            .edge_points(host)
            .ok_or_else(|| DiagramError::unresolved_anchor(anchor.target, anchor.edge))?;
        let (a, b) = (p1.pos(), p2.pos());
        let target = b.sub(b.sub(a).scale(anchor.offset));
        self.path.seed(target, keys);
        if let Some(color) = host.border_color(anchor.target) {
            self.style.color = color;
        }
        self.start_dir = Some(direction_between(
            p1.pos(),
            p2.pos(),
            self.config.axis_tolerance,
        ));
        self.link_start = Some(anchor);
        self.sync_start(host, keys);
        Ok(())
    }

    /// Append an interactive waypoint toward `candidate`
    pub fn extend(&mut self, candidate: Vec2, keys: &KeyAllocator) {
        self.path.extend(candidate, self.start_dir, keys);
    }

    /// Bind the final endpoint and settle the path.
    ///
    /// A target beyond `finish_tolerance` of the last waypoint gets one
    /// bridging orthogonal segment; within tolerance, a dangling stub is
    /// dropped (3+ points) or the anchor's offset is rebound to the existing
    /// endpoint (exactly 2 points).
    pub fn finish(
        &mut self,
        anchor: Anchor,
        host: &impl AnchorHost,
        keys: &KeyAllocator,
    ) -> Result<(), DiagramError> {
        let mut anchor = anchor;
        let (p1, p2) = anchor
            .edge_points(host)
            .ok_or_else(|| DiagramError::unresolved_anchor(anchor.target, anchor.edge))?;
        let (a, b) = (p1.pos(), p2.pos());
        let target = b.sub(b.sub(a).scale(anchor.offset));
        debug_assert!(!self.path.is_empty(), "finish on an unstarted connector");
        let Some(last) = self.path.last().copied() else {
            return Ok(());
        };

        let tol = self.config.finish_tolerance;
        if (last.y - target.y).abs() > tol || (last.x - target.x).abs() > tol {
            self.path.extend(target, self.start_dir, keys);
        } else if self.path.len() > 2 {
            self.path.pop_last();
        } else {
            anchor.offset = position_on_segment(p1.pos(), p2.pos(), last.pos());
        }

        let points = self.path.points();
        if points.len() >= 2 {
            let a = points[points.len() - 1];
            let b = points[points.len() - 2];
            self.end_dir = Some(direction_between(
                a.pos(),
                b.pos(),
                self.config.axis_tolerance,
            ));
        }
        self.link_end = Some(anchor);
        self.sync_end(host, keys);
        Ok(())
    }

    /// Re-anchor the start onto its resolved position. A no-op while the
    /// anchor is unbound or unresolvable.
    pub fn sync_start(&mut self, host: &impl AnchorHost, keys: &KeyAllocator) {
        let Some(anchor) = self.link_start else {
            return;
        };
        let Some(target) = anchor.resolve(host) else {
            return;
        };
        let Some(first) = self.path.first().copied() else {
            return;
        };
        self.move_start(target.x - first.x, target.y - first.y, host, keys);
    }

    /// Re-anchor the end onto its resolved position. A no-op while the
    /// anchor is unbound or unresolvable.
    pub fn sync_end(&mut self, host: &impl AnchorHost, keys: &KeyAllocator) {
        let Some(anchor) = self.link_end else {
            return;
        };
        let Some(target) = anchor.resolve(host) else {
            return;
        };
        let Some(last) = self.path.last().copied() else {
            return;
        };
        self.move_end(target.x - last.x, target.y - last.y, host, keys);
    }

    /// Move the start endpoint by a delta, running the break state machine
    /// against the anchored shape
    pub fn move_start(&mut self, dx: f64, dy: f64, host: &impl AnchorHost, keys: &KeyAllocator) {
        let Some(anchor) = self.link_start else {
            return;
        };
        let Some(target) = anchor.resolve(host) else {
            return;
        };
        let inside = |x: f64, y: f64| host.contains_point(anchor.target, x, y);
        let obstacle: Option<&dyn Fn(f64, f64) -> bool> = if host.is_connector(anchor.target) {
            None
        } else {
            Some(&inside)
        };
        self.path.move_start(
            dx,
            dy,
            target,
            self.end_dir,
            obstacle,
            self.config.break_clearance,
            keys,
        );
    }

    /// Move the end endpoint by a delta, running the break state machine
    /// against the anchored shape
    pub fn move_end(&mut self, dx: f64, dy: f64, host: &impl AnchorHost, keys: &KeyAllocator) {
        let Some(anchor) = self.link_end else {
            return;
        };
        let Some(target) = anchor.resolve(host) else {
            return;
        };
        let inside = |x: f64, y: f64| host.contains_point(anchor.target, x, y);
        let obstacle: Option<&dyn Fn(f64, f64) -> bool> = if host.is_connector(anchor.target) {
            None
        } else {
            Some(&inside)
        };
        self.path.move_end(
            dx,
            dy,
            target,
            self.end_dir,
            obstacle,
            self.config.break_clearance,
            keys,
        );
    }

    /// Shift the whole connector
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.path.translate(dx, dy);
    }

    /// For each endpoint, the candidate shape whose boundary currently
    /// carries that endpoint's anchor edge, if any
    pub fn linked_shapes(
        &self,
        candidates: &[ShapeId],
        host: &impl AnchorHost,
    ) -> (Option<ShapeId>, Option<ShapeId>) {
        let mut start = None;
        let mut end = None;
        for &id in candidates {
            let element = ElementId::Shape(id);
            if let Some(a) = &self.link_start {
                if host.has_border_edge(element, a.edge) {
                    start = Some(id);
                }
            }
            if let Some(a) = &self.link_end {
                if host.has_border_edge(element, a.edge) {
                    end = Some(id);
                }
            }
        }
        (start, end)
    }

    /// React to a set of shapes having been translated by (dx, dy).
    ///
    /// When both ends ride along, the whole path is translated first so the
    /// interior keeps its shape. Both ends are then re-synced unconditionally
    /// - syncing is idempotent, and this guarantees convergence even when
    /// only one end actually moved.
    pub fn shapes_moved(
        &mut self,
        dx: f64,
        dy: f64,
        moved: &[ShapeId],
        host: &impl AnchorHost,
        keys: &KeyAllocator,
    ) {
        let (start_moved, end_moved) = self.linked_shapes(moved, host);
        if start_moved.is_some() && end_moved.is_some() {
            self.translate(dx, dy);
        }
        if start_moved.is_some() {
            self.sync_start(host, keys);
        }
        if end_moved.is_some() {
            self.sync_end(host, keys);
        }
        self.sync_start(host, keys);
        self.sync_end(host, keys);
    }

    /// Explicitly query whether both bound anchors still resolve; movement
    /// operations never raise this, they just stop tracking
    pub fn anchor_status(&self, host: &impl AnchorHost) -> Result<(), DiagramError> {
        for anchor in [&self.link_start, &self.link_end].into_iter().flatten() {
            let (p1, p2) = anchor
                .edge_points(host)
                .ok_or_else(|| DiagramError::unresolved_anchor(anchor.target, anchor.edge))?;
            if p1.pos() == p2.pos() {
                debug!("zero-length anchor edge on {:?}", anchor.target);
                return Err(DiagramError::degenerate_edge(anchor.target, anchor.edge));
            }
        }
        Ok(())
    }

    fn segment_under(&self, x: f64, y: f64) -> Option<(Point, Point)> {
        let cursor = Vec2::new(x, y);
        self.path
            .points()
            .windows(2)
            .map(|w| (w[0], w[1]))
            .find(|(a, b)| point_near_segment(cursor, a.pos(), b.pos(), self.style.stroke_width))
    }

    /// If the cursor lies on the connector, classify the segment under it
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Direction> {
        self.segment_under(x, y)
            .map(|(a, b)| direction_between(a.pos(), b.pos(), self.style.stroke_width))
    }

    /// If the cursor lies on the connector, identify the segment under it as
    /// an anchorable edge plus relative offset - connectors can chain off
    /// other connectors through this
    pub fn hit_edge(&self, x: f64, y: f64) -> Option<(EdgeRef, f64)> {
        self.segment_under(x, y).map(|(a, b)| {
            let offset = position_on_segment(a.pos(), b.pos(), Vec2::new(x, y));
            (EdgeRef::new(a.key(), b.key()), offset)
        })
    }

    /// Whether the cursor is within the endpoint grab radius of the last
    /// waypoint
    pub fn near_end(&self, x: f64, y: f64) -> bool {
        match self.path.last() {
            Some(p) => p.pos().sub(Vec2::new(x, y)).norm() < self.config.endpoint_radius,
            None => false,
        }
    }

    /// Look up a waypoint by identity key (the boundary contract connectors
    /// expose when they are anchor targets themselves)
    pub fn vertex_by_key(&self, key: crate::geometry::VertexKey) -> Option<Point> {
        self.path.points().iter().find(|p| p.key() == key).copied()
    }

    /// Whether the directed pair of waypoint keys is one of this connector's
    /// segments. Unlike shapes, a connector is an open polyline: there is no
    /// closing edge from the last waypoint back to the first.
    pub fn has_border_edge(&self, edge: EdgeRef) -> bool {
        self.path
            .points()
            .windows(2)
            .any(|w| w[0].key() == edge.p1 && w[1].key() == edge.p2)
    }
}
