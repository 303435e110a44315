//! Core geometric types shared by shapes and connectors

use std::cell::Cell;

/// Stable identity of a vertex.
///
/// Keys survive coordinate changes: when a shape regenerates its boundary the
/// vertex at a given polygon index keeps the key it had before, so anchors
/// that recorded keys keep resolving. Keys are compared for topological
/// identity; coordinates are compared for geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(pub(crate) u64);

/// Monotonic issuer of vertex keys.
///
/// One allocator per diagram keeps keys unique across every shape and
/// connector it owns. The counter lives in a `Cell` so allocation works
/// through shared references; the engine is single-threaded by design.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    next: Cell<u64>,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next key. Never returns the same key twice.
    pub fn next_key(&self) -> VertexKey {
        let key = self.next.get();
        self.next.set(key + 1);
        VertexKey(key)
    }
}

/// A coordinate pair without identity, used for arithmetic and derived
/// positions (midpoints, deltas, resolved anchor targets).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; the zero vector stays zero rather than dividing by it
    pub fn normalized(self) -> Vec2 {
        let n = self.norm();
        if n == 0.0 {
            Vec2::default()
        } else {
            self.scale(1.0 / n)
        }
    }
}

/// A 2-D point with a stable identity key.
///
/// Points serve both as free-standing connector waypoints and as shape
/// boundary vertices. Copies preserve the key; there is no way to change a
/// key after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    key: VertexKey,
}

impl Point {
    pub fn new(x: f64, y: f64, key: VertexKey) -> Self {
        Self { x, y, key }
    }

    pub fn key(&self) -> VertexKey {
        self.key
    }

    /// Identity comparison: same vertex regardless of where it has moved to
    pub fn same_vertex(&self, other: &Point) -> bool {
        self.key == other.key
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.pos().sub(other.pos()).norm()
    }
}

/// Classification of the segment between two points.
///
/// `Diagonal` only ever describes a freshly bound anchor edge; a settled
/// connector path alternates strictly between the two axis variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
}

/// Classify the segment between two positions under a coordinate tolerance.
///
/// Equal x (within tolerance) reads as vertical, equal y as horizontal,
/// anything else as diagonal.
pub fn direction_between(a: Vec2, b: Vec2, tolerance: f64) -> Direction {
    if (a.x - b.x).abs() <= tolerance {
        Direction::Vertical
    } else if (a.y - b.y).abs() <= tolerance {
        Direction::Horizontal
    } else {
        Direction::Diagonal
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Expand this bounding box to include a position
    pub fn expand_to_include(&self, p: Vec2) -> BoundingBox {
        let x = self.x.min(p.x);
        let y = self.y.min(p.y);
        let right = self.right().max(p.x);
        let bottom = self.bottom().max(p.y);
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Smallest box containing every position in the iterator, or a zero box
    /// for an empty iterator
    pub fn around(points: impl IntoIterator<Item = Vec2>) -> BoundingBox {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return BoundingBox::zero();
        };
        let mut bounds = BoundingBox::new(first.x, first.y, 0.0, 0.0);
        for p in iter {
            bounds = bounds.expand_to_include(p);
        }
        bounds
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_allocator_is_monotonic() {
        let keys = KeyAllocator::new();
        let a = keys.next_key();
        let b = keys.next_key();
        let c = keys.next_key();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_point_copy_preserves_key() {
        let keys = KeyAllocator::new();
        let p = Point::new(1.0, 2.0, keys.next_key());
        let mut q = p;
        q.translate(10.0, 0.0);
        assert!(p.same_vertex(&q));
        assert_eq!(q.x, 11.0);
    }

    #[test]
    fn test_direction_between_axis_aligned() {
        let a = Vec2::new(0.0, 0.0);
        assert_eq!(
            direction_between(a, Vec2::new(0.0, 50.0), 0.0),
            Direction::Vertical
        );
        assert_eq!(
            direction_between(a, Vec2::new(50.0, 0.0), 0.0),
            Direction::Horizontal
        );
        assert_eq!(
            direction_between(a, Vec2::new(30.0, 50.0), 0.0),
            Direction::Diagonal
        );
    }

    #[test]
    fn test_direction_between_tolerance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.5, 80.0);
        assert_eq!(direction_between(a, b, 2.0), Direction::Vertical);
        assert_eq!(direction_between(a, b, 0.0), Direction::Diagonal);
    }

    #[test]
    fn test_vec2_norm_and_normalized() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.norm(), 5.0);
        let u = v.normalized();
        assert!((u.norm() - 1.0).abs() < 1e-12);
        assert_eq!(Vec2::default().normalized(), Vec2::default());
    }

    #[test]
    fn test_bounding_box_edges_and_center() {
        let bb = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bb.right(), 110.0);
        assert_eq!(bb.bottom(), 70.0);
        assert_eq!(bb.center(), Vec2::new(60.0, 45.0));
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let b = BoundingBox::new(100.0, 100.0, 50.0, 50.0);
        let union = a.union(&b);
        assert_eq!(union.width, 150.0);
        assert_eq!(union.height, 150.0);
    }

    #[test]
    fn test_bounding_box_around_points() {
        let bb = BoundingBox::around([
            Vec2::new(10.0, 5.0),
            Vec2::new(-5.0, 20.0),
            Vec2::new(30.0, 0.0),
        ]);
        assert_eq!(bb.x, -5.0);
        assert_eq!(bb.y, 0.0);
        assert_eq!(bb.right(), 30.0);
        assert_eq!(bb.bottom(), 20.0);
    }
}
