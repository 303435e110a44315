//! Orthowire - the geometry engine of a diagram editor
//!
//! Orthowire models polygonal shapes and the orthogonal connector lines that
//! link them, and keeps every connector correctly routed as shapes move,
//! resize, or regenerate. Connector endpoints bind to shape boundary edges
//! through key-based anchors; paths re-derive themselves incrementally and
//! detour around a shape when the straight approach would cross it.
//!
//! Rendering, persistence, and input handling are left to the host
//! application: it draws `waypoints()`, and it calls the movement entry
//! points when the user drags things.
//!
//! # Example
//!
//! ```rust
//! use orthowire::{Diagram, ShapeKind};
//!
//! let mut diagram = Diagram::new();
//! let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
//! let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
//! let wire = diagram.connect(a, b).unwrap();
//!
//! diagram.move_shape(b, 0.0, 200.0).unwrap();
//!
//! // the connector stayed attached and fully orthogonal
//! let path = diagram.connector(wire).unwrap().waypoints();
//! assert!(path.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y));
//! ```

pub mod connector;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod shape;
pub mod style;

pub use connector::anchor::{Anchor, AnchorHost, EdgeRef, ElementId};
pub use connector::path::BreakState;
pub use connector::Connector;
pub use diagram::{ConnectorId, Diagram, ShapeId};
pub use error::DiagramError;
pub use geometry::{BoundingBox, Direction, KeyAllocator, Point, RoutingConfig, Vec2, VertexKey};
pub use palette::{Palette, PaletteError};
pub use shape::{Shape, ShapeKind};
pub use style::{Color, ConnectorStyle, ShapeStyle};
