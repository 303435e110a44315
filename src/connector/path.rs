//! The orthogonal path engine
//!
//! Owns a connector's waypoint sequence and everything that keeps it
//! orthogonal: axis alternation, collinear pruning, the two-point degenerate
//! split, and the rectangular detour ("break") spliced in next to an endpoint
//! when the straight approach would cut through the anchored shape.
//!
//! Both endpoints run the same little state machine independently:
//!
//! ```text
//!          probe hits obstacle              sign test clears
//! Intact ------------------------> Broken ------------------> Intact
//!   |  insert 2-point detour         |  retract detour, drop 2 points
//!   |  renormalize                   |  renormalize
//! ```
//!
//! While a break is active the detour waypoints sit at fixed indices next to
//! their endpoint (2 and 3 from the start, len-4 and len-3 from the end), and
//! the pruning pass leaves that window alone until the detour is retracted.

use tracing::debug;

use crate::geometry::{midpoint, Direction, KeyAllocator, Point, Vec2};

/// Routing state of one connector endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakState {
    /// Direct orthogonal approach to the anchor
    #[default]
    Intact,
    /// A two-point rectangular detour routes around the anchored shape
    Broken,
}

impl BreakState {
    pub fn is_broken(self) -> bool {
        matches!(self, BreakState::Broken)
    }
}

/// An orthogonal polyline with per-endpoint break state
#[derive(Debug, Clone, Default)]
pub struct OrthoPath {
    points: Vec<Point>,
    start_break: BreakState,
    end_break: BreakState,
}

impl OrthoPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn start_break(&self) -> BreakState {
        self.start_break
    }

    pub fn end_break(&self) -> BreakState {
        self.end_break
    }

    /// Reset the path to a single waypoint at `at`
    pub fn seed(&mut self, at: Vec2, keys: &KeyAllocator) {
        self.points = vec![Point::new(at.x, at.y, keys.next_key())];
        self.start_break = BreakState::Intact;
        self.end_break = BreakState::Intact;
    }

    /// Shift every waypoint
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.translate(dx, dy);
        }
    }

    /// Remove and return the last waypoint
    pub fn pop_last(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Alternation direction of the first segment, inferred by walking
    /// backward from the last segment's direction and the point-count parity
    pub fn start_axis(&self, end_dir: Option<Direction>) -> Option<Direction> {
        let even = self.points.len() % 2 == 0;
        match end_dir {
            Some(Direction::Vertical) => Some(if even {
                Direction::Vertical
            } else {
                Direction::Horizontal
            }),
            Some(Direction::Horizontal) => Some(if even {
                Direction::Horizontal
            } else {
                Direction::Vertical
            }),
            _ => None,
        }
    }

    /// Append a waypoint derived from `candidate`, frozen on one axis.
    ///
    /// The second waypoint follows the anchor edge's classification (a
    /// diagonal edge ties toward the axis with the larger candidate delta);
    /// every later waypoint freezes whichever axis the previous segment ran
    /// along, which forces alternation.
    pub fn extend(&mut self, candidate: Vec2, start_dir: Option<Direction>, keys: &KeyAllocator) {
        let n = self.points.len();
        debug_assert!(n >= 1, "extend on an unseeded path");
        if n == 0 {
            return;
        }
        let last = self.points[n - 1];
        let vertical_first = match start_dir {
            Some(Direction::Horizontal) => true,
            Some(Direction::Diagonal) => {
                (candidate.x - last.x).abs() < (candidate.y - last.y).abs()
            }
            _ => false,
        };
        let derived = if n == 1 {
            if vertical_first {
                Vec2::new(last.x, candidate.y)
            } else {
                Vec2::new(candidate.x, last.y)
            }
        } else {
            let prev = self.points[n - 2];
            if last.y == prev.y {
                Vec2::new(last.x, candidate.y)
            } else {
                Vec2::new(candidate.x, last.y)
            }
        };
        self.points.push(Point::new(derived.x, derived.y, keys.next_key()));
    }

    /// Re-propagate the non-frozen axis of every waypoint from its neighbor
    /// (forward by default, from the far end when `reverse` is set), then
    /// rebuild the sequence with every 3-in-a-row collinear run merged away.
    ///
    /// Runs of waypoints protected by an active break are exempt from
    /// pruning so the pass cannot eat an in-progress detour.
    pub fn normalize(&mut self, end_dir: Option<Direction>, reverse: bool) {
        let Some(start_axis) = self.start_axis(end_dir) else {
            return;
        };
        let mut pts = std::mem::take(&mut self.points);

        for v in 1..pts.len() {
            let pull_x = match start_axis {
                Direction::Horizontal => v % 2 == 0,
                _ => v % 2 == 1,
            };
            match (reverse, pull_x) {
                (false, true) => pts[v].x = pts[v - 1].x,
                (false, false) => pts[v].y = pts[v - 1].y,
                (true, true) => pts[v - 1].x = pts[v].x,
                (true, false) => pts[v - 1].y = pts[v].y,
            }
        }

        let mut v = pts.len().saturating_sub(1);
        while v >= 2 {
            if self.start_break.is_broken() && v <= 4 {
                break;
            }
            let len = pts.len();
            let in_end_window = self.end_break.is_broken() && v + 5 >= len;
            if v < len && !in_end_window && len > 3 {
                let (a, b, c) = (pts[v - 2], pts[v - 1], pts[v]);
                if (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y) {
                    pts.drain(v - 2..v);
                }
            }
            v -= 1;
        }

        self.points = pts;
    }

    /// Move the start endpoint by (dx, dy) toward the resolved anchor
    /// position `target`, running the break state machine.
    ///
    /// `obstacle` is the containment test of the anchored shape, or None when
    /// the anchor target cannot obstruct (it is a connector, or unresolved).
    pub fn move_start(
        &mut self,
        dx: f64,
        dy: f64,
        target: Vec2,
        end_dir: Option<Direction>,
        obstacle: Option<&dyn Fn(f64, f64) -> bool>,
        clearance: f64,
        keys: &KeyAllocator,
    ) {
        let start_axis = self.start_axis(end_dir);
        if self.points.len() > 2 {
            match start_axis {
                Some(Direction::Vertical) => {
                    let sign_y = if self.points[1].y + dy - target.y > 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    match self.start_break {
                        BreakState::Intact => {
                            if let Some(inside) = obstacle {
                                if inside(target.x, clearance * sign_y + target.y) {
                                    self.points[0].y = target.y;
                                    self.points[1].y = target.y - sign_y * clearance;
                                    let mid =
                                        midpoint(self.points[2].pos(), self.points[1].pos());
                                    let a = Point::new(mid.x, self.points[1].y, keys.next_key());
                                    self.points.insert(2, a);
                                    let b = Point::new(mid.x, self.points[3].y, keys.next_key());
                                    self.points.insert(3, b);
                                    self.start_break = BreakState::Broken;
                                    debug!("start detour inserted, {} waypoints", self.points.len());
                                    self.normalize(end_dir, false);
                                    return;
                                }
                            }
                        }
                        BreakState::Broken => {
                            debug_assert!(
                                self.points.len() >= 5,
                                "broken start with too few waypoints"
                            );
                            self.points[2].translate(0.0, dy);
                            self.points[1].translate(dx, dy);
                            self.points[0].translate(dx, dy);
                            if (self.points[2].y - self.points[3].y) * sign_y <= 0.0 {
                                self.start_break = BreakState::Intact;
                                self.points.drain(2..4);
                                debug!("start detour retracted, {} waypoints", self.points.len());
                                self.normalize(end_dir, true);
                            }
                            return;
                        }
                    }
                }
                Some(Direction::Horizontal) => {
                    let sign_x = if self.points[1].x + dx - target.x > 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    match self.start_break {
                        BreakState::Intact => {
                            if let Some(inside) = obstacle {
                                if inside(clearance * sign_x + target.x, target.y) {
                                    self.points[0].x = target.x;
                                    self.points[1].x = target.x - sign_x * clearance;
                                    let mid =
                                        midpoint(self.points[2].pos(), self.points[1].pos());
                                    let a = Point::new(self.points[1].x, mid.y, keys.next_key());
                                    self.points.insert(2, a);
                                    let b = Point::new(self.points[3].x, mid.y, keys.next_key());
                                    self.points.insert(3, b);
                                    self.start_break = BreakState::Broken;
                                    debug!("start detour inserted, {} waypoints", self.points.len());
                                    self.normalize(end_dir, false);
                                    return;
                                }
                            }
                        }
                        BreakState::Broken => {
                            debug_assert!(
                                self.points.len() >= 5,
                                "broken start with too few waypoints"
                            );
                            self.points[2].translate(dx, 0.0);
                            self.points[1].translate(dx, dy);
                            self.points[0].translate(dx, dy);
                            if (self.points[2].x - self.points[3].x) * sign_x <= 0.0 {
                                self.start_break = BreakState::Intact;
                                self.points.drain(2..4);
                                debug!("start detour retracted, {} waypoints", self.points.len());
                                self.normalize(end_dir, true);
                            }
                            return;
                        }
                    }
                }
                _ => {}
            }
        }

        let n = self.points.len();
        if n > 2 {
            match start_axis {
                Some(Direction::Vertical) => self.points[1].translate(dx, 0.0),
                Some(Direction::Horizontal) => self.points[1].translate(0.0, dy),
                _ => {}
            }
            self.points[0].translate(dx, dy);
            self.normalize(end_dir, false);
        } else if n == 2 {
            self.split_two_point(dx, dy, end_dir, 0, keys);
        }
    }

    /// Mirror of [`move_start`] for the end endpoint
    pub fn move_end(
        &mut self,
        dx: f64,
        dy: f64,
        target: Vec2,
        end_dir: Option<Direction>,
        obstacle: Option<&dyn Fn(f64, f64) -> bool>,
        clearance: f64,
        keys: &KeyAllocator,
    ) {
        if self.points.len() > 2 {
            let last = self.points.len() - 1;
            match end_dir {
                Some(Direction::Vertical) => {
                    let sign_y = if self.points[last - 1].y + dy - target.y > 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    match self.end_break {
                        BreakState::Intact => {
                            if let Some(inside) = obstacle {
                                if inside(target.x, clearance * sign_y + target.y) {
                                    self.points[last].y = target.y;
                                    self.points[last - 1].y = target.y - sign_y * clearance;
                                    let mid = midpoint(
                                        self.points[last - 2].pos(),
                                        self.points[last - 1].pos(),
                                    );
                                    let a =
                                        Point::new(mid.x, self.points[last - 2].y, keys.next_key());
                                    self.points.insert(last - 1, a);
                                    let b =
                                        Point::new(mid.x, self.points[last - 1].y, keys.next_key());
                                    self.points.insert(last - 1, b);
                                    self.end_break = BreakState::Broken;
                                    debug!("end detour inserted, {} waypoints", self.points.len());
                                    self.normalize(end_dir, true);
                                    return;
                                }
                            }
                        }
                        BreakState::Broken => {
                            debug_assert!(
                                self.points.len() >= 5,
                                "broken end with too few waypoints"
                            );
                            self.points[last - 2].translate(0.0, dy);
                            self.points[last - 1].translate(dx, dy);
                            self.points[last].translate(dx, dy);
                            if (self.points[last - 2].y - self.points[last - 3].y) * sign_y <= 0.0 {
                                self.end_break = BreakState::Intact;
                                self.points.drain(last - 3..last - 1);
                                debug!("end detour retracted, {} waypoints", self.points.len());
                                self.normalize(end_dir, false);
                            }
                            return;
                        }
                    }
                }
                Some(Direction::Horizontal) => {
                    let sign_x = if self.points[last - 1].x + dx - target.x > 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    match self.end_break {
                        BreakState::Intact => {
                            if let Some(inside) = obstacle {
                                if inside(target.x + sign_x * clearance, target.y) {
                                    self.points[last].x = target.x;
                                    self.points[last - 1].x = target.x - sign_x * clearance;
                                    let mid = midpoint(
                                        self.points[last - 2].pos(),
                                        self.points[last - 1].pos(),
                                    );
                                    let a =
                                        Point::new(self.points[last - 2].x, mid.y, keys.next_key());
                                    self.points.insert(last - 1, a);
                                    let b =
                                        Point::new(self.points[last - 1].x, mid.y, keys.next_key());
                                    self.points.insert(last - 1, b);
                                    self.end_break = BreakState::Broken;
                                    debug!("end detour inserted, {} waypoints", self.points.len());
                                    self.normalize(end_dir, true);
                                    return;
                                }
                            }
                        }
                        BreakState::Broken => {
                            debug_assert!(
                                self.points.len() >= 5,
                                "broken end with too few waypoints"
                            );
                            self.points[last - 2].translate(dx, 0.0);
                            self.points[last - 1].translate(dx, dy);
                            self.points[last].translate(dx, dy);
                            if (self.points[last - 2].x - self.points[last - 3].x) * sign_x <= 0.0 {
                                self.end_break = BreakState::Intact;
                                self.points.drain(last - 3..last - 1);
                                debug!("end detour retracted, {} waypoints", self.points.len());
                                self.normalize(end_dir, false);
                            }
                            return;
                        }
                    }
                }
                _ => {}
            }
        }

        let n = self.points.len();
        if n == 0 {
            return;
        }
        let parallel = matches!(end_dir, Some(Direction::Horizontal)) && dy == 0.0
            || matches!(end_dir, Some(Direction::Vertical)) && dx == 0.0;
        if n > 2 || (n == 2 && parallel) {
            if n >= 2 {
                match end_dir {
                    Some(Direction::Vertical) => self.points[n - 2].translate(dx, 0.0),
                    Some(Direction::Horizontal) => self.points[n - 2].translate(0.0, dy),
                    _ => {}
                }
            }
            self.points[n - 1].translate(dx, dy);
            self.normalize(end_dir, false);
        } else if n == 2 {
            self.split_two_point(dx, dy, end_dir, 1, keys);
        }
    }

    /// Degenerate two-waypoint case: movement perpendicular to the path's
    /// direction splits it into a four-point zig-zag around the midpoint and
    /// carries the moved endpoint to its destination; parallel or
    /// unclassified movement just translates the moved endpoint (`moved`: 0
    /// for the start, 1 for the end).
    fn split_two_point(
        &mut self,
        dx: f64,
        dy: f64,
        end_dir: Option<Direction>,
        moved: usize,
        keys: &KeyAllocator,
    ) {
        debug_assert_eq!(self.points.len(), 2);
        let split = match end_dir {
            Some(Direction::Horizontal) if dy != 0.0 => {
                let mid_x = (self.points[0].x + self.points[1].x) / 2.0;
                let a = Point::new(mid_x, self.points[0].y, keys.next_key());
                let b = Point::new(mid_x, self.points[1].y, keys.next_key());
                self.points.insert(1, a);
                self.points.insert(2, b);
                true
            }
            Some(Direction::Vertical) if dx != 0.0 => {
                let mid_y = (self.points[0].y + self.points[1].y) / 2.0;
                let a = Point::new(self.points[0].x, mid_y, keys.next_key());
                let b = Point::new(self.points[1].x, mid_y, keys.next_key());
                self.points.insert(1, a);
                self.points.insert(2, b);
                true
            }
            _ => false,
        };
        let idx = if moved == 0 { 0 } else { self.points.len() - 1 };
        self.points[idx].translate(dx, dy);
        if split {
            // re-propagate away from the endpoint that just moved so the
            // zig-zag settles with both ends where they belong
            self.normalize(end_dir, moved != 0);
        }
    }
}
