//! Integer rasterization of scene primitives.
//!
//! Every real coordinate goes through [`snap`] (round half up) before the
//! integer algorithms run, so re-rasterizing an unchanged primitive always
//! yields the same pixels and integer translations shift the output exactly.

use crate::draw::model::{LineAlgorithm, Pixel, Point, Shape};
use std::collections::BTreeSet;

/// Round half up: `floor(v + 0.5)`.
pub fn snap(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

pub fn snap_point(point: Point) -> Pixel {
    (snap(point.x), snap(point.y))
}

pub fn rasterize_line(p1: Point, p2: Point, algorithm: LineAlgorithm) -> Vec<Pixel> {
    match algorithm {
        LineAlgorithm::Dda => rasterize_line_dda(p1, p2),
        LineAlgorithm::Bresenham => rasterize_line_bresenham(p1, p2),
    }
}

/// Digital differential analyzer. Step `i` is interpolated directly from the
/// start point instead of accumulated, so the last step lands on `p2` exactly.
pub fn rasterize_line_dda(p1: Point, p2: Point) -> Vec<Pixel> {
    dda_walk(p1, p2).collect()
}

fn dda_walk(p1: Point, p2: Point) -> impl DoubleEndedIterator<Item = Pixel> {
    let (x0, y0) = snap_point(p1);
    let (x1, y1) = snap_point(p2);
    let dx = x1 as i64 - x0 as i64;
    let dy = y1 as i64 - y0 as i64;
    let steps = dx.unsigned_abs().max(dy.unsigned_abs());

    let steps_f = steps.max(1) as f64;
    let (dx, dy) = (dx as f64, dy as f64);
    (0..=steps).map(move |i| {
        let t = i as f64;
        (
            snap(x0 as f64 + dx * t / steps_f),
            snap(y0 as f64 + dy * t / steps_f),
        )
    })
}

pub fn rasterize_line_bresenham(p1: Point, p2: Point) -> Vec<Pixel> {
    let (x0, y0) = snap_point(p1);
    let (x1, y1) = snap_point(p2);
    let dx = (x1 as i64 - x0 as i64).abs();
    let dy = (y1 as i64 - y0 as i64).abs();
    let sx: i32 = if x1 >= x0 { 1 } else { -1 };
    let sy: i32 = if y1 >= y0 { 1 } else { -1 };

    // The driving axis takes one step per pixel; the other axis follows the
    // decision variable.
    let steep = dy > dx;
    let (major, minor) = if steep { (dy, dx) } else { (dx, dy) };
    let mut decision = 2 * minor - major;
    let (mut x, mut y) = (x0, y0);
    let mut pixels = Vec::with_capacity(major as usize + 1);

    for _ in 0..=major {
        pixels.push((x, y));
        if decision > 0 {
            if steep {
                x += sx;
            } else {
                y += sy;
            }
            decision -= 2 * major;
        }
        decision += 2 * minor;
        if steep {
            y += sy;
        } else {
            x += sx;
        }
    }

    pixels
}

/// Midpoint circle starting at `(r, 0)` with decision `1 - r`. One octant is
/// walked and mirrored into the other seven; the set removes the pixels shared
/// on octant boundaries.
pub fn rasterize_circle(center: Point, radius: f64) -> BTreeSet<Pixel> {
    let (cx, cy) = snap_point(center);
    let r = snap(radius.max(0.0)) as i64;
    let mut pixels = BTreeSet::new();
    if r <= 0 {
        pixels.insert((cx, cy));
        return pixels;
    }

    let (mut x, mut y) = (r, 0_i64);
    let mut decision = 1 - r;
    while y <= x {
        for (ox, oy) in octant_reflections(x as i32, y as i32) {
            pixels.insert((cx + ox, cy + oy));
        }
        y += 1;
        if decision < 0 {
            decision += 2 * y + 1;
        } else {
            x -= 1;
            decision += 2 * (y - x) + 1;
        }
    }

    pixels
}

fn octant_reflections(x: i32, y: i32) -> [Pixel; 8] {
    [
        (x, y),
        (y, x),
        (-x, y),
        (-y, x),
        (x, -y),
        (y, -x),
        (-x, -y),
        (-y, -x),
    ]
}

pub fn rasterize_shape(shape: &Shape) -> Vec<Pixel> {
    match *shape {
        Shape::Line { p1, p2, algorithm } => rasterize_line(p1, p2, algorithm),
        Shape::Circle { center, radius } => rasterize_circle(center, radius).into_iter().collect(),
    }
}
