//! Geometric primitives and segment helpers
//!
//! Everything here is identity-free math: points with stable keys, direction
//! classification, and the small segment queries the anchor and picking code
//! are built from.

pub mod config;
pub mod types;

pub use config::RoutingConfig;
pub use types::{direction_between, BoundingBox, Direction, KeyAllocator, Point, Vec2, VertexKey};

/// Relative position of `pt` on the segment from `p1` to `p2`, measured from
/// `p2`: an offset `t` such that `pt ≈ p2 - (p2 - p1) * t`, clamped to [0, 1].
///
/// This is the offset stored on an anchor. A zero-length segment yields 0.0
/// instead of dividing by zero; the caller decides whether that edge is worth
/// reporting as degenerate.
pub fn position_on_segment(p1: Vec2, p2: Vec2, pt: Vec2) -> f64 {
    let edge = p2.sub(p1);
    let len2 = edge.dot(edge);
    if len2 == 0.0 {
        return 0.0;
    }
    (p2.sub(pt).dot(edge) / len2).clamp(0.0, 1.0)
}

/// Whether `pt` lies within `tolerance` of the segment from `a` to `b`
pub fn point_near_segment(pt: Vec2, a: Vec2, b: Vec2, tolerance: f64) -> bool {
    distance_to_segment(pt, a, b) <= tolerance
}

/// Distance from `pt` to the closest position on the segment from `a` to `b`
pub fn distance_to_segment(pt: Vec2, a: Vec2, b: Vec2) -> f64 {
    let edge = b.sub(a);
    let len2 = edge.dot(edge);
    if len2 == 0.0 {
        return pt.sub(a).norm();
    }
    let t = (pt.sub(a).dot(edge) / len2).clamp(0.0, 1.0);
    pt.sub(a.add(edge.scale(t))).norm()
}

/// Unit vector pointing from `from` toward `to`
pub fn unit_vector(from: Vec2, to: Vec2) -> Vec2 {
    to.sub(from).normalized()
}

/// Midpoint of two positions
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    a.add(b).scale(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_segment_endpoints() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(100.0, 0.0);
        assert_eq!(position_on_segment(p1, p2, p2), 0.0);
        assert_eq!(position_on_segment(p1, p2, p1), 1.0);
        assert_eq!(position_on_segment(p1, p2, Vec2::new(25.0, 0.0)), 0.75);
    }

    #[test]
    fn test_position_on_segment_clamps() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(100.0, 0.0);
        assert_eq!(position_on_segment(p1, p2, Vec2::new(250.0, 0.0)), 0.0);
        assert_eq!(position_on_segment(p1, p2, Vec2::new(-250.0, 0.0)), 1.0);
    }

    #[test]
    fn test_position_on_zero_length_segment() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(position_on_segment(p, p, Vec2::new(50.0, 50.0)), 0.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(50.0, 8.0), a, b), 8.0);
        // beyond the ends the distance is to the nearest endpoint
        assert_eq!(distance_to_segment(Vec2::new(103.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn test_point_near_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, 60.0);
        assert!(point_near_segment(Vec2::new(1.0, 30.0), a, b, 2.0));
        assert!(!point_near_segment(Vec2::new(5.0, 30.0), a, b, 2.0));
    }

    #[test]
    fn test_unit_vector() {
        let u = unit_vector(Vec2::new(0.0, 0.0), Vec2::new(0.0, 42.0));
        assert_eq!(u, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(Vec2::new(0.0, 10.0), Vec2::new(20.0, 30.0));
        assert_eq!(m, Vec2::new(10.0, 20.0));
    }
}
