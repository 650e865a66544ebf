use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer pixel coordinate produced by the rasterizer.
pub type Pixel = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let (dx, dy) = self.delta_to(other);
        dx.hypot(dy)
    }

    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle in canvas space (y grows downward).
///
/// The corners are private so a `Rect` is always normalized: `min.x <= max.x`
/// and `min.y <= max.y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectWire", into = "RectWire")]
pub struct Rect {
    min: Point,
    max: Point,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RectWire {
    min: Point,
    max: Point,
}

impl From<RectWire> for Rect {
    fn from(wire: RectWire) -> Self {
        Rect::from_corners(wire.min, wire.max)
    }
}

impl From<Rect> for RectWire {
    fn from(rect: Rect) -> Self {
        RectWire {
            min: rect.min,
            max: rect.max,
        }
    }
}

impl Rect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest rectangle covering every point, `None` for an empty iterator.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Rect::from_corners(first, first), |rect, point| {
            rect.union(Rect::from_corners(point, point))
        }))
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Inclusive containment (edges count as inside).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Rect {
        Rect {
            min: self.min.translated(dx, dy),
            max: self.max.translated(dx, dy),
        }
    }

    /// Grows the max corner until both sides are at least `min_size`.
    pub fn with_min_size(self, min_size: f64) -> Rect {
        Rect {
            min: self.min,
            max: Point::new(
                self.max.x.max(self.min.x + min_size),
                self.max.y.max(self.min.y + min_size),
            ),
        }
    }

    /// Nearest point of the rectangle to `point`.
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Corners in NW, NE, SE, SW order.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAlgorithm {
    Dda,
    Bresenham,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Line {
        p1: Point,
        p2: Point,
        algorithm: LineAlgorithm,
    },
    Circle {
        center: Point,
        radius: f64,
    },
}

impl Shape {
    pub fn line(p1: Point, p2: Point, algorithm: LineAlgorithm) -> Self {
        Shape::Line { p1, p2, algorithm }
    }

    /// Negative or NaN radii clamp to zero.
    pub fn circle(center: Point, radius: f64) -> Self {
        Shape::Circle {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Line { p1, p2, .. } => Rect::from_corners(p1, p2),
            Shape::Circle { center, radius } => Rect::from_corners(
                center.translated(-radius, -radius),
                center.translated(radius, radius),
            ),
        }
    }

    /// Applies `f` to every control point (line endpoints, circle center).
    pub fn map_points<F>(&self, mut f: F) -> Shape
    where
        F: FnMut(Point) -> Point,
    {
        match *self {
            Shape::Line { p1, p2, algorithm } => Shape::Line {
                p1: f(p1),
                p2: f(p2),
                algorithm,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: f(center),
                radius,
            },
        }
    }

    pub fn approx_eq(&self, other: &Shape, tolerance: f64) -> bool {
        match (self, other) {
            (
                Shape::Line { p1, p2, algorithm },
                Shape::Line {
                    p1: q1,
                    p2: q2,
                    algorithm: other_algorithm,
                },
            ) => {
                algorithm == other_algorithm
                    && p1.approx_eq(*q1, tolerance)
                    && p2.approx_eq(*q2, tolerance)
            }
            (
                Shape::Circle { center, radius },
                Shape::Circle {
                    center: other_center,
                    radius: other_radius,
                },
            ) => {
                center.approx_eq(*other_center, tolerance)
                    && (radius - other_radius).abs() <= tolerance
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub shape: Shape,
}
