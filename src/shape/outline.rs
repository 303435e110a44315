//! Boundary vertex layouts for each shape kind
//!
//! Each function produces the ordered closed polygon for one kind, centered
//! on (x, y) unless noted. Curved kinds are sampled into polygons so that
//! every shape answers the same boundary queries.

use std::f64::consts::PI;

use crate::geometry::Vec2;
use crate::shape::ShapeKind;

/// Number of samples used to approximate an ellipse outline
pub const ELLIPSE_SAMPLES: usize = 36;

/// Number of samples used to approximate a half-circle outline
pub const HALF_CIRCLE_SAMPLES: usize = 10;

/// Compute the outline for a shape kind.
///
/// `offset` is the slant/inset parameter of the kinds that have one
/// (rectangle, trapezoid, step); the other kinds ignore it. `corner_anchor`
/// switches the rectangle from centered to top-left-anchored layout.
pub fn layout(
    kind: ShapeKind,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    offset: f64,
    corner_anchor: bool,
) -> Vec<Vec2> {
    let (w2, h2) = (width / 2.0, height / 2.0);
    match kind {
        ShapeKind::Rectangle => {
            if corner_anchor {
                vec![
                    Vec2::new(x, y),
                    Vec2::new(x + width, y),
                    Vec2::new(x + width - offset, y + height),
                    Vec2::new(x - offset, y + height),
                ]
            } else {
                vec![
                    Vec2::new(x - w2 + offset / 2.0, y - h2),
                    Vec2::new(x + w2 + offset / 2.0, y - h2),
                    Vec2::new(x + w2 - offset / 2.0, y + h2),
                    Vec2::new(x - w2 - offset / 2.0, y + h2),
                ]
            }
        }
        ShapeKind::Trapezoid => vec![
            Vec2::new(x - w2 + offset / 2.0, y - h2),
            Vec2::new(x + w2 - offset / 2.0, y - h2),
            Vec2::new(x + w2, y + h2),
            Vec2::new(x - w2, y + h2),
        ],
        ShapeKind::Triangle => vec![
            Vec2::new(x - w2, y - h2),
            Vec2::new(x + w2, y),
            Vec2::new(x - w2, y + h2),
        ],
        ShapeKind::Diamond => vec![
            Vec2::new(x, y - h2),
            Vec2::new(x + w2, y),
            Vec2::new(x, y + h2),
            Vec2::new(x - w2, y),
        ],
        ShapeKind::Hexagon => {
            let side = w2 / 2.0;
            vec![
                Vec2::new(x - side, y - h2),
                Vec2::new(x + side, y - h2),
                Vec2::new(x + w2, y),
                Vec2::new(x + side, y + h2),
                Vec2::new(x - side, y + h2),
                Vec2::new(x - w2, y),
            ]
        }
        ShapeKind::Step => vec![
            Vec2::new(x - w2, y - h2),
            Vec2::new(x + w2 - offset, y - h2),
            Vec2::new(x + w2, y),
            Vec2::new(x + w2 - offset, y + h2),
            Vec2::new(x - w2, y + h2),
            Vec2::new(x - w2 + offset, y),
        ],
        ShapeKind::Ellipse => (0..ELLIPSE_SAMPLES)
            .map(|i| {
                let angle = i as f64 * 2.0 * PI / ELLIPSE_SAMPLES as f64;
                Vec2::new(x + w2 * angle.cos(), y + h2 * angle.sin())
            })
            .collect(),
        ShapeKind::HalfCircle => (0..HALF_CIRCLE_SAMPLES)
            .map(|i| {
                // right half of an ellipse, swept bottom to top
                let angle = (i as f64 - 4.5) * 2.0 * PI / 18.0;
                Vec2::new(x + w2 * angle.cos(), y + h2 * angle.sin())
            })
            .collect(),
    }
}
