//! Handles around a box: eight resize handles plus the rotation knob that
//! selection boxes carry above their top edge.

use crate::draw::model::{Point, Rect};
use crate::draw::settings::CanvasSettings;
use serde::{Deserialize, Serialize};

const MIN_ROTATE_KNOB_HIT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    Rotate,
}

/// Which handles a box exposes. The clip window is never rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSet {
    Selection,
    ClipWindow,
}

impl Handle {
    pub const RESIZE: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    pub fn opposite(self) -> Handle {
        match self {
            Handle::NorthWest => Handle::SouthEast,
            Handle::North => Handle::South,
            Handle::NorthEast => Handle::SouthWest,
            Handle::East => Handle::West,
            Handle::SouthEast => Handle::NorthWest,
            Handle::South => Handle::North,
            Handle::SouthWest => Handle::NorthEast,
            Handle::West => Handle::East,
            Handle::Rotate => Handle::Rotate,
        }
    }

    /// `(x, y)`: whether dragging this handle changes width and height.
    pub fn affects_axes(self) -> (bool, bool) {
        match self {
            Handle::NorthWest | Handle::NorthEast | Handle::SouthEast | Handle::SouthWest => {
                (true, true)
            }
            Handle::North | Handle::South => (false, true),
            Handle::East | Handle::West => (true, false),
            Handle::Rotate => (false, false),
        }
    }

    pub fn is_corner(self) -> bool {
        self.affects_axes() == (true, true)
    }

    pub fn position(self, rect: &Rect, rotate_offset: f64) -> Point {
        let min = rect.min();
        let max = rect.max();
        let center = rect.center();
        match self {
            Handle::NorthWest => min,
            Handle::North => Point::new(center.x, min.y),
            Handle::NorthEast => Point::new(max.x, min.y),
            Handle::East => Point::new(max.x, center.y),
            Handle::SouthEast => max,
            Handle::South => Point::new(center.x, max.y),
            Handle::SouthWest => Point::new(min.x, max.y),
            Handle::West => Point::new(min.x, center.y),
            Handle::Rotate => Point::new(center.x, min.y - rotate_offset),
        }
    }
}

/// Finds the handle under `point`: resize squares first, then the rotation
/// knob, then its stem.
pub fn hit_test(
    rect: &Rect,
    point: Point,
    set: HandleSet,
    settings: &CanvasSettings,
) -> Option<Handle> {
    let half = (settings.handle_size + 2.0 * settings.handle_hit_pad) * 0.5;
    let square_hit = Handle::RESIZE.into_iter().find(|handle| {
        let (dx, dy) = handle
            .position(rect, settings.rotate_handle_offset)
            .delta_to(point);
        dx.abs() <= half && dy.abs() <= half
    });
    if square_hit.is_some() || set == HandleSet::ClipWindow {
        return square_hit;
    }

    let knob = Handle::Rotate.position(rect, settings.rotate_handle_offset);
    let knob_radius = (settings.handle_size * 0.5 + settings.handle_hit_pad + 3.0)
        .max(MIN_ROTATE_KNOB_HIT_RADIUS);
    if knob.distance_to(point) <= knob_radius {
        return Some(Handle::Rotate);
    }

    let stem_base = Handle::North.position(rect, settings.rotate_handle_offset);
    if distance_to_segment(point, stem_base, knob) <= settings.rotate_stem_hit_radius {
        return Some(Handle::Rotate);
    }

    None
}

fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = a.delta_to(b);
    let length_sq = abx * abx + aby * aby;
    if length_sq == 0.0 {
        return point.distance_to(a);
    }
    let (apx, apy) = a.delta_to(point);
    let t = ((apx * abx + apy * aby) / length_sq).clamp(0.0, 1.0);
    point.distance_to(Point::new(a.x + t * abx, a.y + t * aby))
}
