//! Polygonal shapes and their boundary contract
//!
//! Every shape is one of a closed set of kinds sharing a single
//! representation: a logical center and size from which an ordered closed
//! polygon of keyed vertices is generated. Connectors only ever consume the
//! boundary contract - the vertex list, key lookup, and containment - so new
//! kinds only need an outline layout.

pub mod outline;

use crate::connector::anchor::EdgeRef;
use crate::geometry::{
    direction_between, point_near_segment, position_on_segment, BoundingBox, Direction,
    KeyAllocator, Point, Vec2,
};
use crate::style::ShapeStyle;

/// The closed set of shape kinds the editor knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Trapezoid,
    Triangle,
    Diamond,
    Hexagon,
    Step,
    Ellipse,
    HalfCircle,
}

impl ShapeKind {
    /// Default slant/inset parameter for kinds that have one
    fn default_offset(self) -> f64 {
        match self {
            ShapeKind::Rectangle | ShapeKind::Trapezoid | ShapeKind::Step => 10.0,
            _ => 0.0,
        }
    }
}

/// A polygonal diagram shape.
///
/// The vertex list is regenerated whenever position-independent geometry
/// changes (size, slant, text), preserving each vertex's identity key at its
/// polygon index so anchors bound to the old outline keep resolving.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    x: f64,
    y: f64,
    base_width: f64,
    width: f64,
    height: f64,
    offset: f64,
    corner_anchor: bool,
    text: String,
    selectable: bool,
    pub style: ShapeStyle,
    vertices: Vec<Point>,
}

/// Width reserved per character of shape text
const TEXT_CHAR_WIDTH: f64 = 7.0;

impl Shape {
    /// Build a shape of the given kind. This is the only constructor; the
    /// kind tag picks the outline layout and its defaults.
    pub fn new(
        kind: ShapeKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        keys: &KeyAllocator,
    ) -> Self {
        let offset = kind.default_offset();
        let coords = outline::layout(kind, x, y, width, height, offset, false);
        let vertices = coords
            .into_iter()
            .map(|c| Point::new(c.x, c.y, keys.next_key()))
            .collect();
        Self {
            kind,
            x,
            y,
            base_width: width,
            width,
            height,
            offset,
            corner_anchor: false,
            text: String::new(),
            selectable: true,
            style: ShapeStyle::with_defaults(),
            vertices,
        }
    }

    /// Set the slant/inset parameter
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self.regenerate();
        self
    }

    /// Anchor a rectangle at its top-left corner instead of its center
    pub fn with_corner_anchor(mut self, corner_anchor: bool) -> Self {
        self.corner_anchor = corner_anchor;
        self.regenerate();
        self
    }

    /// Replace the style
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Non-selectable shapes are invisible to containment and border picking
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Recompute vertex coordinates from the current parameters, keeping the
    /// identity key at each polygon index.
    fn regenerate(&mut self) {
        let coords = outline::layout(
            self.kind,
            self.x,
            self.y,
            self.width,
            self.height,
            self.offset,
            self.corner_anchor,
        );
        debug_assert_eq!(coords.len(), self.vertices.len());
        for (vertex, coord) in self.vertices.iter_mut().zip(coords) {
            vertex.x = coord.x;
            vertex.y = coord.y;
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Ordered closed boundary polygon
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Look up a boundary vertex by its identity key
    pub fn vertex_by_key(&self, key: crate::geometry::VertexKey) -> Option<Point> {
        self.vertices.iter().find(|v| v.key() == key).copied()
    }

    /// Whether the directed edge (by key pair) is currently one of this
    /// shape's boundary edges
    pub fn has_border_edge(&self, edge: EdgeRef) -> bool {
        let n = self.vertices.len();
        (0..n).any(|i| {
            self.vertices[i].key() == edge.p1 && self.vertices[(i + 1) % n].key() == edge.p2
        })
    }

    /// Odd-even containment test. Always false for non-selectable shapes.
    pub fn contains(&self, xm: f64, ym: f64) -> bool {
        if !self.selectable || self.vertices.is_empty() {
            return false;
        }
        let n = self.vertices.len();
        let mut j = n - 1;
        let mut odd = false;
        for i in 0..n {
            let vi = &self.vertices[i];
            let vj = &self.vertices[j];
            if ((vi.y < ym && vj.y >= ym) || (vj.y < ym && vi.y >= ym))
                && (vi.x <= xm || vj.x <= xm)
                && vi.x + (ym - vi.y) / (vj.y - vi.y) * (vj.x - vi.x) < xm
            {
                odd = !odd;
            }
            j = i;
        }
        odd
    }

    /// If the cursor lies on the border, classify the edge under it
    pub fn border_hit(&self, xm: f64, ym: f64) -> Option<Direction> {
        self.border_edge_under(xm, ym)
            .map(|(a, b)| direction_between(a.pos(), b.pos(), self.style.stroke_width))
    }

    /// If the cursor lies on the border, identify the edge under it and the
    /// relative offset along it - the ingredients of an anchor binding
    pub fn border_hit_edge(&self, xm: f64, ym: f64) -> Option<(EdgeRef, f64)> {
        self.border_edge_under(xm, ym).map(|(a, b)| {
            let offset = position_on_segment(a.pos(), b.pos(), Vec2::new(xm, ym));
            (EdgeRef::new(a.key(), b.key()), offset)
        })
    }

    fn border_edge_under(&self, xm: f64, ym: f64) -> Option<(Point, Point)> {
        if !self.selectable {
            return None;
        }
        let cursor = Vec2::new(xm, ym);
        let n = self.vertices.len();
        (0..n)
            .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .find(|(a, b)| point_near_segment(cursor, a.pos(), b.pos(), self.style.stroke_width))
    }

    /// Logical center
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Axis-aligned bounds of the current outline
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.vertices.iter().map(Point::pos))
    }

    /// Shift the shape; vertices move in place, keys untouched
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            v.translate(dx, dy);
        }
        self.x += dx;
        self.y += dy;
    }

    /// Move the shape's logical position to (x, y)
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.translate(x - self.x, y - self.y);
    }

    /// Resize, regenerating the outline. Text may keep the width larger than
    /// requested, as with `set_text`.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.base_width = width;
        self.width = self.fitted_width();
        self.height = height;
        self.regenerate();
    }

    /// Update the label text. Long labels widen the shape; the width never
    /// drops below the base width the shape was created with.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.width = self.fitted_width();
        self.regenerate();
    }

    fn fitted_width(&self) -> f64 {
        let text_width = self.text.chars().count() as f64 * TEXT_CHAR_WIDTH;
        text_width.max(self.base_width)
    }

    pub fn set_border_color(&mut self, color: crate::style::Color) {
        self.style.border = color;
    }

    pub fn set_fill_color(&mut self, color: crate::style::Color) {
        self.style.fill = color;
    }

    /// A copy of this shape with fresh identity: new vertex keys, same
    /// geometry and style
    pub fn duplicate(&self, keys: &KeyAllocator) -> Shape {
        let mut copy = self.clone();
        copy.vertices = self
            .vertices
            .iter()
            .map(|v| Point::new(v.x, v.y, keys.next_key()))
            .collect();
        copy
    }
}
