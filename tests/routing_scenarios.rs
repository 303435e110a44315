//! End-to-end routing scenarios: connectors staying attached, breaking
//! around shapes, and settling back as the linked shapes move.

use orthowire::geometry::distance_to_segment;
use orthowire::{Anchor, Diagram, ElementId, Point, Shape, ShapeKind};

fn coords(points: &[Point]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

fn assert_orthogonal(points: &[Point]) {
    for w in points.windows(2) {
        assert!(
            w[0].x == w[1].x || w[0].y == w[1].y,
            "diagonal segment {:?} -> {:?}",
            (w[0].x, w[0].y),
            (w[1].x, w[1].y)
        );
    }
}

fn assert_no_collinear_triples(points: &[Point]) {
    for w in points.windows(3) {
        let collinear_x = w[0].x == w[1].x && w[1].x == w[2].x;
        let collinear_y = w[0].y == w[1].y && w[1].y == w[2].y;
        assert!(
            !(collinear_x || collinear_y),
            "collinear run at {:?}",
            coords(w)
        );
    }
}

/// Anchor a connector from `a`'s bottom edge down and across to `s`'s top
/// edge, producing a settled 4-point path whose last segment drops
/// vertically onto the anchor - the layout the break scenarios drive.
fn draw_top_anchored(diagram: &mut Diagram) -> (orthowire::ShapeId, orthowire::ConnectorId) {
    let a = diagram.insert_shape(
        Shape::new(ShapeKind::Rectangle, 100.0, 20.0, 80.0, 40.0, diagram.keys()).with_offset(0.0),
    );
    let s = diagram.insert_shape(
        Shape::new(ShapeKind::Rectangle, 300.0, 120.0, 80.0, 40.0, diagram.keys()).with_offset(0.0),
    );

    let c = diagram.add_connector();
    let (start_edge, start_offset) = diagram
        .shape(a)
        .unwrap()
        .border_hit_edge(100.0, 40.0)
        .unwrap();
    diagram
        .start_connector(c, Anchor::new(ElementId::Shape(a), start_edge, start_offset))
        .unwrap();
    diagram.extend_connector(c, 300.0, 75.0).unwrap();
    diagram.extend_connector(c, 300.0, 60.0).unwrap();
    let (end_edge, end_offset) = diagram
        .shape(s)
        .unwrap()
        .border_hit_edge(300.0, 100.0)
        .unwrap();
    diagram
        .finish_connector(c, Anchor::new(ElementId::Shape(s), end_edge, end_offset))
        .unwrap();

    let conn = diagram.connector(c).unwrap();
    assert_eq!(
        coords(conn.waypoints()),
        vec![(100.0, 40.0), (100.0, 75.0), (300.0, 75.0), (300.0, 100.0)]
    );
    (s, c)
}

#[test]
fn scenario_a_moving_a_shape_keeps_the_connector_on_both_edges() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();

    diagram.move_shapes(&[b], 0.0, 200.0);

    let conn = diagram.connector(c).unwrap();
    assert_orthogonal(conn.waypoints());

    // endpoints converge exactly onto the resolved anchors...
    let start_target = conn.start_anchor().unwrap().resolve(&diagram).unwrap();
    let end_target = conn.end_anchor().unwrap().resolve(&diagram).unwrap();
    let first = conn.waypoints()[0];
    let last = *conn.waypoints().last().unwrap();
    assert!((first.x - start_target.x).abs() < 1e-6);
    assert!((first.y - start_target.y).abs() < 1e-6);
    assert!((last.x - end_target.x).abs() < 1e-6);
    assert!((last.y - end_target.y).abs() < 1e-6);

    // ...and those anchors still lie on the shapes' current boundary edges
    for (shape_id, anchor, endpoint) in [(a, conn.start_anchor(), first), (b, conn.end_anchor(), last)] {
        let anchor = anchor.unwrap();
        let shape = diagram.shape(shape_id).unwrap();
        let p1 = shape.vertex_by_key(anchor.edge.p1).unwrap();
        let p2 = shape.vertex_by_key(anchor.edge.p2).unwrap();
        assert!(distance_to_segment(endpoint.pos(), p1.pos(), p2.pos()) < 1e-6);
    }
}

#[test]
fn scenario_b_dragging_a_shape_over_the_path_breaks_and_unbreaks() {
    let mut diagram = Diagram::new();
    let (s, c) = draw_top_anchored(&mut diagram);
    let settled = coords(diagram.connector(c).unwrap().waypoints());

    // drag the anchored shape up across the path: the 20px probe lands
    // inside it and the end splices in a detour
    diagram.move_shapes(&[s], 0.0, -70.0);
    {
        let conn = diagram.connector(c).unwrap();
        assert!(conn.end_break().is_broken());
        assert_eq!(conn.waypoints().len(), settled.len() + 2);
        assert_orthogonal(conn.waypoints());
        assert_eq!(
            coords(conn.waypoints()),
            vec![
                (100.0, 40.0),
                (100.0, 75.0),
                (200.0, 75.0),
                (200.0, 10.0),
                (300.0, 10.0),
                (300.0, 30.0)
            ]
        );
        // the detour clears the shape's top edge by the break clearance
        let top = diagram.shape(s).unwrap().bounds().y;
        assert_eq!(top - 10.0, 20.0);
    }

    // drag it back out: the detour retracts and the count is restored
    diagram.move_shapes(&[s], 0.0, 80.0);
    let conn = diagram.connector(c).unwrap();
    assert!(!conn.end_break().is_broken());
    assert_eq!(conn.waypoints().len(), settled.len());
    assert_orthogonal(conn.waypoints());
    let end_target = conn.end_anchor().unwrap().resolve(&diagram).unwrap();
    let last = *conn.waypoints().last().unwrap();
    assert!((last.x - end_target.x).abs() < 1e-6);
    assert!((last.y - end_target.y).abs() < 1e-6);
}

#[test]
fn scenario_c_two_point_connector_splits_into_a_zigzag() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();
    assert_eq!(diagram.connector(c).unwrap().waypoints().len(), 2);

    // perpendicular to the horizontal 2-point path
    diagram.move_shapes(&[b], 0.0, 120.0);

    let conn = diagram.connector(c).unwrap();
    let pts = conn.waypoints();
    assert_eq!(pts.len(), 4);
    assert_orthogonal(pts);
    // the interior pair rides the vertical through the old midpoint
    assert_eq!(pts[1].x, pts[2].x);
    assert_eq!(pts[1].x, 200.0);
    let end_target = conn.end_anchor().unwrap().resolve(&diagram).unwrap();
    let last = pts[3];
    assert!((last.x - end_target.x).abs() < 1e-6);
    assert!((last.y - end_target.y).abs() < 1e-6);
}

#[test]
fn scenario_d_finishing_near_the_last_waypoint_drops_the_stub() {
    let mut diagram = Diagram::new();
    let a = diagram.insert_shape(
        Shape::new(ShapeKind::Rectangle, 300.0, 20.0, 80.0, 40.0, diagram.keys()).with_offset(0.0),
    );
    let s = diagram.insert_shape(
        Shape::new(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0, diagram.keys()).with_offset(0.0),
    );

    let c = diagram.add_connector();
    let (start_edge, start_offset) = diagram
        .shape(a)
        .unwrap()
        .border_hit_edge(300.0, 40.0)
        .unwrap();
    diagram
        .start_connector(c, Anchor::new(ElementId::Shape(a), start_edge, start_offset))
        .unwrap();
    diagram.extend_connector(c, 295.0, 75.0).unwrap();
    diagram.extend_connector(c, 310.0, 100.0).unwrap();
    assert_eq!(
        coords(diagram.connector(c).unwrap().waypoints()),
        vec![(300.0, 40.0), (300.0, 75.0), (310.0, 75.0)]
    );

    // the anchor target (300, 80) is within 10px of the dangling stub on
    // both axes, so finishing removes the stub instead of bridging
    let (end_edge, end_offset) = diagram
        .shape(s)
        .unwrap()
        .border_hit_edge(300.0, 80.0)
        .unwrap();
    diagram
        .finish_connector(c, Anchor::new(ElementId::Shape(s), end_edge, end_offset))
        .unwrap();

    let conn = diagram.connector(c).unwrap();
    assert_eq!(
        coords(conn.waypoints()),
        vec![(300.0, 40.0), (300.0, 80.0)]
    );
}

#[test]
fn resizing_a_shape_preserves_anchor_keys() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();

    let keys_before: Vec<_> = diagram
        .shape(b)
        .unwrap()
        .vertices()
        .iter()
        .map(|v| v.key())
        .collect();
    diagram.shape_mut(b).unwrap().resize(120.0, 60.0);
    let keys_after: Vec<_> = diagram
        .shape(b)
        .unwrap()
        .vertices()
        .iter()
        .map(|v| v.key())
        .collect();
    assert_eq!(keys_before, keys_after);

    // the anchor bound before the resize still resolves, and one sync puts
    // the endpoint back on the (now wider) shape
    diagram.sync_connector(c).unwrap();
    let conn = diagram.connector(c).unwrap();
    assert!(conn.anchor_status(&diagram).is_ok());
    let end_target = conn.end_anchor().unwrap().resolve(&diagram).unwrap();
    let last = *conn.waypoints().last().unwrap();
    assert!((last.x - end_target.x).abs() < 1e-6);
    assert!((last.y - end_target.y).abs() < 1e-6);
}

#[test]
fn repeated_moves_keep_the_path_minimal() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();

    for (dx, dy) in [(0.0, 200.0), (50.0, -100.0), (-30.0, 40.0)] {
        diagram.move_shapes(&[b], dx, dy);
        let conn = diagram.connector(c).unwrap();
        assert_orthogonal(conn.waypoints());
        if !conn.start_break().is_broken() && !conn.end_break().is_broken() {
            assert_no_collinear_triples(conn.waypoints());
        }
    }

    let conn = diagram.connector(c).unwrap();
    assert_eq!(
        coords(conn.waypoints()),
        vec![
            (140.0, 100.0),
            (200.0, 100.0),
            (200.0, 240.0),
            (280.0, 240.0)
        ]
    );
}

#[test]
fn connector_picking() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();
    let conn = diagram.connector(c).unwrap();

    assert_eq!(
        conn.hit_test(200.0, 100.0),
        Some(orthowire::Direction::Horizontal)
    );
    assert_eq!(conn.hit_test(200.0, 150.0), None);

    let (edge, offset) = conn.hit_edge(200.0, 100.0).unwrap();
    assert_eq!(edge.p1, conn.waypoints()[0].key());
    assert_eq!(edge.p2, conn.waypoints()[1].key());
    assert!((offset - 0.5).abs() < 1e-9);

    assert!(conn.near_end(258.0, 102.0));
    assert!(!conn.near_end(250.0, 100.0));
}

#[test]
fn orphaned_connector_stops_tracking_quietly() {
    let mut diagram = Diagram::new();
    let a = diagram.add_shape(ShapeKind::Rectangle, 100.0, 100.0, 80.0, 40.0);
    let b = diagram.add_shape(ShapeKind::Rectangle, 300.0, 100.0, 80.0, 40.0);
    let c = diagram.connect(a, b).unwrap();
    diagram.remove_shape(b);

    let frozen = coords(diagram.connector(c).unwrap().waypoints());
    diagram.move_shapes(&[a], -40.0, 25.0);

    let conn = diagram.connector(c).unwrap();
    // the start still tracks its shape; the orphaned end froze in place
    let start_target = conn.start_anchor().unwrap().resolve(&diagram).unwrap();
    let first = conn.waypoints()[0];
    assert!((first.x - start_target.x).abs() < 1e-6);
    assert!((first.y - start_target.y).abs() < 1e-6);
    assert_eq!(
        conn.waypoints().last().map(|p| (p.x, p.y)),
        frozen.last().copied()
    );
    assert!(conn.anchor_status(&diagram).unwrap_err().is_orphaned());
}
