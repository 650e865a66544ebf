//! Segment clipping against an axis-aligned window.
//!
//! Both algorithms return the visible part in the input direction and agree on
//! classification and endpoints up to floating-point tolerance.

use crate::draw::model::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Slack allowed when classifying a point against a window edge.
pub const EDGE_EPSILON: f64 = 1e-9;

/// Upper bound on Cohen–Sutherland boundary clips (four per endpoint).
const MAX_CLIP_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipAlgorithm {
    CohenSutherland,
    LiangBarsky,
}

impl ClipAlgorithm {
    pub fn label(self) -> &'static str {
        match self {
            ClipAlgorithm::CohenSutherland => "Cohen-Sutherland",
            ClipAlgorithm::LiangBarsky => "Liang-Barsky",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn approx_eq(&self, other: &Segment, tolerance: f64) -> bool {
        self.p1.approx_eq(other.p1, tolerance) && self.p2.approx_eq(other.p2, tolerance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipOutcome {
    Accepted(Segment),
    Rejected,
}

impl ClipOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClipOutcome::Accepted(_))
    }

    pub fn segment(&self) -> Option<Segment> {
        match self {
            ClipOutcome::Accepted(segment) => Some(*segment),
            ClipOutcome::Rejected => None,
        }
    }
}

pub fn clip_segment(segment: Segment, window: &Rect, algorithm: ClipAlgorithm) -> ClipOutcome {
    match algorithm {
        ClipAlgorithm::CohenSutherland => cohen_sutherland(segment, window),
        ClipAlgorithm::LiangBarsky => liang_barsky(segment, window),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcode(u8);

impl Outcode {
    const INSIDE: Outcode = Outcode(0);
    const LEFT: u8 = 0b0001;
    const RIGHT: u8 = 0b0010;
    const BOTTOM: u8 = 0b0100;
    const TOP: u8 = 0b1000;

    fn of(point: Point, (min, max): (Point, Point)) -> Outcode {
        let mut code = 0;
        if point.x < min.x {
            code |= Self::LEFT;
        } else if point.x > max.x {
            code |= Self::RIGHT;
        }
        // Canvas y grows downward: "top" is the smaller y.
        if point.y < min.y {
            code |= Self::TOP;
        } else if point.y > max.y {
            code |= Self::BOTTOM;
        }
        Outcode(code)
    }

    fn is_inside(self) -> bool {
        self == Self::INSIDE
    }

    fn has(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    fn shares_side_with(self, other: Outcode) -> bool {
        self.0 & other.0 != 0
    }
}

/// Window corners widened by [`EDGE_EPSILON`]. Both algorithms classify and
/// clip against these, so a point within the tolerance of an edge is inside
/// for either of them.
fn tolerant_corners(window: &Rect) -> (Point, Point) {
    let min = window.min();
    let max = window.max();
    (
        Point::new(min.x - EDGE_EPSILON, min.y - EDGE_EPSILON),
        Point::new(max.x + EDGE_EPSILON, max.y + EDGE_EPSILON),
    )
}

pub fn cohen_sutherland(segment: Segment, window: &Rect) -> ClipOutcome {
    let bounds = tolerant_corners(window);
    let mut p1 = segment.p1;
    let mut p2 = segment.p2;
    let mut code1 = Outcode::of(p1, bounds);
    let mut code2 = Outcode::of(p2, bounds);

    for _ in 0..MAX_CLIP_PASSES {
        if code1.is_inside() && code2.is_inside() {
            return accept(segment, p1, p2, window);
        }
        if code1.shares_side_with(code2) {
            return ClipOutcome::Rejected;
        }

        let clip_first = !code1.is_inside();
        let code = if clip_first { code1 } else { code2 };
        let clipped = intersect_boundary(p1, p2, code, bounds);
        if clip_first {
            p1 = clipped;
            code1 = Outcode::of(p1, bounds);
        } else {
            p2 = clipped;
            code2 = Outcode::of(p2, bounds);
        }
    }

    if code1.is_inside() && code2.is_inside() {
        accept(segment, p1, p2, window)
    } else {
        ClipOutcome::Rejected
    }
}

/// Intersection of the line through `p1`/`p2` with the first boundary `code`
/// violates, in top, bottom, right, left priority. The crossed coordinate is
/// pinned to the boundary value.
fn intersect_boundary(p1: Point, p2: Point, code: Outcode, (min, max): (Point, Point)) -> Point {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    // A set bit on one endpoint with a clear bit on the other guarantees the
    // segment crosses that boundary, so the divisor is non-zero.
    if code.has(Outcode::TOP) {
        Point::new(p1.x + dx * (min.y - p1.y) / dy, min.y)
    } else if code.has(Outcode::BOTTOM) {
        Point::new(p1.x + dx * (max.y - p1.y) / dy, max.y)
    } else if code.has(Outcode::RIGHT) {
        Point::new(max.x, p1.y + dy * (max.x - p1.x) / dx)
    } else {
        Point::new(min.x, p1.y + dy * (min.x - p1.x) / dx)
    }
}

pub fn liang_barsky(segment: Segment, window: &Rect) -> ClipOutcome {
    let Segment { p1, p2 } = segment;
    let (min, max) = tolerant_corners(window);
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    // p * t <= q for the left, right, top and bottom boundaries.
    let p = [-dx, dx, -dy, dy];
    let q = [p1.x - min.x, max.x - p1.x, p1.y - min.y, max.y - p1.y];

    let mut t_enter = 0.0_f64;
    let mut t_leave = 1.0_f64;
    for (pi, qi) in p.into_iter().zip(q) {
        if pi == 0.0 {
            // Parallel to this boundary: inside/outside test only.
            if qi < 0.0 {
                return ClipOutcome::Rejected;
            }
            continue;
        }

        let t = qi / pi;
        if pi < 0.0 {
            if t > t_leave {
                return ClipOutcome::Rejected;
            }
            t_enter = t_enter.max(t);
        } else {
            if t < t_enter {
                return ClipOutcome::Rejected;
            }
            t_leave = t_leave.min(t);
        }
    }

    if t_enter > t_leave {
        return ClipOutcome::Rejected;
    }

    let start = if t_enter <= 0.0 {
        p1
    } else {
        Point::new(p1.x + t_enter * dx, p1.y + t_enter * dy)
    };
    let end = if t_leave >= 1.0 {
        p2
    } else {
        Point::new(p1.x + t_leave * dx, p1.y + t_leave * dy)
    };
    accept(segment, start, end, window)
}

/// Builds the accepted result. Untouched endpoints inside the window are
/// returned bit-identical; everything else is pulled into the window.
fn accept(original: Segment, p1: Point, p2: Point, window: &Rect) -> ClipOutcome {
    let settle = |clipped: Point, source: Point| {
        if clipped == source && window.contains(source) {
            source
        } else {
            window.clamp_point(clipped)
        }
    };
    ClipOutcome::Accepted(Segment::new(
        settle(p1, original.p1),
        settle(p2, original.p2),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_corners(Point::new(10.0, 10.0), Point::new(50.0, 50.0))
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn diagonal_through_window_is_clipped_to_corners() {
        let expected = seg(10.0, 10.0, 50.0, 50.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let outcome = clip_segment(seg(0.0, 0.0, 60.0, 60.0), &window(), algorithm);
            let clipped = outcome.segment().expect("diagonal is visible");
            assert!(
                clipped.approx_eq(&expected, 1e-9),
                "{algorithm:?} produced {clipped:?}"
            );
        }
    }

    #[test]
    fn inside_segment_is_returned_unchanged() {
        let inside = seg(12.5, 11.1, 48.3, 33.3);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            assert_eq!(
                clip_segment(inside, &window(), algorithm),
                ClipOutcome::Accepted(inside)
            );
        }
    }

    #[test]
    fn shared_outside_side_is_rejected() {
        let left = seg(0.0, 0.0, 5.0, 80.0);
        let below = seg(-20.0, 70.0, 90.0, 55.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            assert_eq!(clip_segment(left, &window(), algorithm), ClipOutcome::Rejected);
            assert_eq!(clip_segment(below, &window(), algorithm), ClipOutcome::Rejected);
        }
    }

    #[test]
    fn liang_barsky_handles_boundary_parallel_segments() {
        let vertical_inside = seg(20.0, 0.0, 20.0, 100.0);
        let vertical_outside = seg(5.0, 0.0, 5.0, 100.0);
        let clipped = liang_barsky(vertical_inside, &window())
            .segment()
            .expect("vertical crosses window");
        assert!(clipped.approx_eq(&seg(20.0, 10.0, 20.0, 50.0), 1e-9));
        assert_eq!(
            liang_barsky(vertical_outside, &window()),
            ClipOutcome::Rejected
        );
    }

    #[test]
    fn segment_missing_the_corner_is_rejected_by_both() {
        // Crosses the extension of the top and left edges but not the window.
        let miss = seg(0.0, 15.0, 15.0, 0.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            assert_eq!(clip_segment(miss, &window(), algorithm), ClipOutcome::Rejected);
        }
    }

    #[test]
    fn clipped_direction_follows_input_direction() {
        let reversed = seg(60.0, 30.0, 0.0, 30.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let clipped = clip_segment(reversed, &window(), algorithm)
                .segment()
                .expect("horizontal crosses window");
            assert!(clipped.approx_eq(&seg(50.0, 30.0, 10.0, 30.0), 1e-9));
        }
    }

    #[test]
    fn degenerate_point_segment_follows_containment() {
        let inside = seg(20.0, 20.0, 20.0, 20.0);
        let outside = seg(5.0, 20.0, 5.0, 20.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            assert!(clip_segment(inside, &window(), algorithm).is_accepted());
            assert_eq!(clip_segment(outside, &window(), algorithm), ClipOutcome::Rejected);
        }
    }

    #[test]
    fn slanted_segment_just_outside_an_edge_is_classified_alike() {
        let grazing = seg(9.999_999_999_5, 20.0, 9.999_999_999_6, 40.0);
        let cs = cohen_sutherland(grazing, &window());
        let lb = liang_barsky(grazing, &window());
        assert!(cs.is_accepted() && lb.is_accepted(), "{cs:?} vs {lb:?}");
        for clipped in [cs, lb].iter().filter_map(ClipOutcome::segment) {
            assert!(clipped.approx_eq(&seg(10.0, 20.0, 10.0, 40.0), 1e-9));
            assert!(window().contains(clipped.p1) && window().contains(clipped.p2));
        }

        let beyond = seg(9.999_999_997, 20.0, 9.999_999_996, 40.0);
        assert_eq!(cohen_sutherland(beyond, &window()), ClipOutcome::Rejected);
        assert_eq!(liang_barsky(beyond, &window()), ClipOutcome::Rejected);
    }
}
