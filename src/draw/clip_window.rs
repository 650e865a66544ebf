//! The clip window: geometry edits, the non-destructive preview and the
//! destructive apply.

use crate::draw::clip::{clip_segment, ClipAlgorithm, ClipOutcome, Segment};
use crate::draw::error::EditError;
use crate::draw::handles::{self, Handle, HandleSet};
use crate::draw::input::Modifiers;
use crate::draw::model::{LineAlgorithm, Point, PrimitiveId, Rect, Shape};
use crate::draw::scene::Scene;
use crate::draw::settings::CanvasSettings;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const MIN_CIRCLE_EDGES: usize = 8;
const MAX_CIRCLE_EDGES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub rect: Rect,
    pub preview_algorithm: Option<ClipAlgorithm>,
    /// Drawn with a dashed border while set.
    pub is_editing: bool,
}

impl ClipWindow {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            preview_algorithm: None,
            is_editing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "algorithm", rename_all = "snake_case")]
pub enum ClipPhase {
    NoWindow,
    Editing,
    Previewing(ClipAlgorithm),
}

pub fn phase(scene: &Scene) -> ClipPhase {
    match scene.clip_window() {
        None => ClipPhase::NoWindow,
        Some(ClipWindow {
            preview_algorithm: Some(algorithm),
            ..
        }) => ClipPhase::Previewing(*algorithm),
        Some(_) => ClipPhase::Editing,
    }
}

/// Pointer drag in clip mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipDrag {
    Creating { anchor: Point, current: Point },
    Moving { anchor: Point, original: Rect },
    Resizing {
        handle: Handle,
        anchor: Point,
        original: Rect,
    },
}

impl ClipDrag {
    /// Handles win over the body; anywhere else starts a new window.
    pub fn begin(scene: &Scene, pointer: Point, settings: &CanvasSettings) -> ClipDrag {
        let Some(window) = scene.clip_window() else {
            return ClipDrag::Creating {
                anchor: pointer,
                current: pointer,
            };
        };
        let rect = window.rect;
        if let Some(handle) = handles::hit_test(&rect, pointer, HandleSet::ClipWindow, settings) {
            return ClipDrag::Resizing {
                handle,
                anchor: pointer,
                original: rect,
            };
        }
        if rect.contains(pointer) {
            return ClipDrag::Moving {
                anchor: pointer,
                original: rect,
            };
        }
        ClipDrag::Creating {
            anchor: pointer,
            current: pointer,
        }
    }

    pub fn update(
        &mut self,
        scene: &mut Scene,
        pointer: Point,
        modifiers: Modifiers,
        settings: &CanvasSettings,
    ) {
        match self {
            ClipDrag::Creating { current, .. } => *current = pointer,
            ClipDrag::Moving { anchor, original } => {
                let (dx, dy) = anchor.delta_to(pointer);
                set_window_rect(scene, original.translated(dx, dy));
            }
            ClipDrag::Resizing {
                handle,
                anchor,
                original,
            } => {
                let rect = resize_rect(
                    original,
                    *handle,
                    *anchor,
                    pointer,
                    modifiers,
                    settings.clip_min_size,
                );
                set_window_rect(scene, rect);
            }
        }
    }

    /// Rectangle outlined while a new window is being dragged out.
    pub fn pending_rect(&self) -> Option<Rect> {
        match *self {
            ClipDrag::Creating { anchor, current } => Some(Rect::from_corners(anchor, current)),
            _ => None,
        }
    }

    pub fn finish(
        mut self,
        scene: &mut Scene,
        pointer: Point,
        modifiers: Modifiers,
        settings: &CanvasSettings,
    ) {
        self.update(scene, pointer, modifiers, settings);
        if let ClipDrag::Creating { anchor, current } = self {
            let rect = Rect::from_corners(anchor, current).with_min_size(settings.clip_min_size);
            let mut window = ClipWindow::new(rect);
            if let Some(previous) = scene.clip_window() {
                window.preview_algorithm = previous.preview_algorithm;
            }
            scene.set_clip_window(Some(window));
            tracing::debug!(?rect, "clip window created");
        }
    }

    pub fn cancel(self, scene: &mut Scene) {
        match self {
            ClipDrag::Creating { .. } => {}
            ClipDrag::Moving { original, .. } | ClipDrag::Resizing { original, .. } => {
                set_window_rect(scene, original);
            }
        }
    }
}

fn set_window_rect(scene: &mut Scene, rect: Rect) {
    if let Some(window) = scene.clip_window_mut() {
        window.rect = rect;
    }
}

/// Scales the window about the opposite handle, or the center with `alt`, by
/// `(pointer - pivot) / (anchor - pivot)` per axis. `shift` on a corner keeps
/// the aspect ratio. An axis whose anchor sits on the pivot keeps its extent.
pub fn resize_rect(
    original: &Rect,
    handle: Handle,
    anchor: Point,
    pointer: Point,
    modifiers: Modifiers,
    min_size: f64,
) -> Rect {
    let pivot = if modifiers.alt {
        original.center()
    } else {
        handle.opposite().position(original, 0.0)
    };
    let grabbed = handle.position(original, 0.0);

    let ratio = |to: f64, from: f64| {
        let factor = to / from;
        if factor.is_finite() {
            factor
        } else {
            1.0
        }
    };
    let (ax, ay) = pivot.delta_to(anchor);
    let (px, py) = pivot.delta_to(pointer);
    let (mut sx, mut sy) = (ratio(px, ax), ratio(py, ay));
    if modifiers.shift && handle.is_corner() {
        let magnitude = sx.abs().max(sy.abs());
        sx = magnitude.copysign(sx);
        sy = magnitude.copysign(sy);
    }

    let (resize_x, resize_y) = handle.affects_axes();
    let (gx, gy) = pivot.delta_to(grabbed);
    let (ex, ey) = (gx * sx, gy * sy);

    let span = |affected: bool, pivot: f64, extent: f64, lo: f64, hi: f64| {
        if !affected {
            (lo, hi)
        } else if modifiers.alt {
            (pivot - extent.abs(), pivot + extent.abs())
        } else {
            (pivot, pivot + extent)
        }
    };
    let min = original.min();
    let max = original.max();
    let (x0, x1) = span(resize_x, pivot.x, ex, min.x, max.x);
    let (y0, y1) = span(resize_y, pivot.y, ey, min.y, max.y);
    Rect::from_corners(Point::new(x0, y0), Point::new(x1, y1)).with_min_size(min_size)
}

pub fn set_preview(scene: &mut Scene, algorithm: Option<ClipAlgorithm>) -> Result<(), EditError> {
    let window = scene
        .clip_window_mut()
        .ok_or_else(|| EditError::out_of_scope("preview needs a clip window"))?;
    window.preview_algorithm = algorithm;
    tracing::debug!(?algorithm, "clip preview changed");
    Ok(())
}

pub fn nudge(scene: &mut Scene, dx: f64, dy: f64) -> Result<(), EditError> {
    let window = scene
        .clip_window_mut()
        .ok_or_else(|| EditError::out_of_scope("no clip window to nudge"))?;
    window.rect = window.rect.translated(dx, dy);
    Ok(())
}

pub fn delete_window(scene: &mut Scene) -> Result<(), EditError> {
    scene
        .set_clip_window(None)
        .map(|_| tracing::debug!("clip window deleted"))
        .ok_or_else(|| EditError::out_of_scope("no clip window to delete"))
}

/// What clipping does to one primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeClip {
    /// Entirely inside the window.
    Unchanged,
    /// A line cut down to its visible part; keeps its id.
    Trimmed(Shape),
    /// A circle broken into its visible polygon edges; gets new ids.
    Split(Vec<Shape>),
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipPreview {
    pub algorithm: ClipAlgorithm,
    pub window: Rect,
    /// Results for every affected primitive, in paint order.
    pub results: Vec<(PrimitiveId, ShapeClip)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub kept: usize,
    pub clipped: usize,
    pub removed: usize,
}

/// Apply and preview both target the selection when there is one, else
/// every primitive.
fn targets_selection_only(scene: &Scene) -> bool {
    !scene.selection().is_empty()
}

/// Clips the affected primitives without touching the scene. `None` unless a
/// preview algorithm is active.
pub fn preview(scene: &Scene, settings: &CanvasSettings) -> Option<ClipPreview> {
    let window = scene.clip_window()?;
    let algorithm = window.preview_algorithm?;
    let selection_only = targets_selection_only(scene);
    let results = scene
        .primitives()
        .iter()
        .filter(|primitive| !selection_only || scene.is_selected(primitive.id))
        .map(|primitive| {
            (
                primitive.id,
                clip_shape(&primitive.shape, &window.rect, algorithm, settings),
            )
        })
        .collect();
    Some(ClipPreview {
        algorithm,
        window: window.rect,
        results,
    })
}

pub fn clip_shape(
    shape: &Shape,
    window: &Rect,
    algorithm: ClipAlgorithm,
    settings: &CanvasSettings,
) -> ShapeClip {
    match *shape {
        Shape::Line {
            p1,
            p2,
            algorithm: line_algorithm,
        } => {
            let original = Segment::new(p1, p2);
            match clip_segment(original, window, algorithm) {
                ClipOutcome::Rejected => ShapeClip::Removed,
                ClipOutcome::Accepted(segment) if segment == original => ShapeClip::Unchanged,
                ClipOutcome::Accepted(segment) => {
                    ShapeClip::Trimmed(Shape::line(segment.p1, segment.p2, line_algorithm))
                }
            }
        }
        Shape::Circle { center, radius } => {
            let outline = circle_polygon(center, radius, settings.circle_clip_segment_length);
            let edges = outline
                .iter()
                .zip(outline.iter().cycle().skip(1))
                .map(|(a, b)| Segment::new(*a, *b));

            let mut visible = Vec::new();
            let mut all_untouched = true;
            for edge in edges {
                match clip_segment(edge, window, algorithm) {
                    ClipOutcome::Accepted(segment) => {
                        all_untouched &= segment == edge;
                        visible.push(Shape::line(segment.p1, segment.p2, LineAlgorithm::Bresenham));
                    }
                    ClipOutcome::Rejected => all_untouched = false,
                }
            }

            if all_untouched {
                ShapeClip::Unchanged
            } else if visible.is_empty() {
                ShapeClip::Removed
            } else {
                ShapeClip::Split(visible)
            }
        }
    }
}

/// Vertices of a closed polygon approximating the circle, with edges no
/// longer than `max_edge_length`.
pub fn circle_polygon(center: Point, radius: f64, max_edge_length: f64) -> Vec<Point> {
    let circumference = TAU * radius.max(0.0);
    let wanted = if max_edge_length > 0.0 {
        (circumference / max_edge_length).ceil()
    } else {
        MAX_CIRCLE_EDGES as f64
    };
    let edges = if wanted.is_finite() {
        (wanted as usize).clamp(MIN_CIRCLE_EDGES, MAX_CIRCLE_EDGES)
    } else {
        MAX_CIRCLE_EDGES
    };
    (0..edges)
        .map(|i| {
            let (sin, cos) = (TAU * i as f64 / edges as f64).sin_cos();
            Point::new(center.x + radius * cos, center.y + radius * sin)
        })
        .collect()
}

/// Fails exactly when [`apply`] would, without touching the scene.
pub fn check_apply(scene: &Scene) -> Result<(), EditError> {
    let window = scene
        .clip_window()
        .ok_or_else(|| EditError::out_of_scope("apply needs a clip window"))?;
    if window.preview_algorithm.is_none() {
        return Err(EditError::out_of_scope("apply needs an active preview"));
    }
    if !window.rect.has_area() {
        return Err(EditError::invalid_geometry("clip window has zero area"));
    }
    Ok(())
}

/// Destructively clips the affected primitives to the window and leaves the
/// window in the editing phase.
pub fn apply(scene: &mut Scene, settings: &CanvasSettings) -> Result<ApplyReport, EditError> {
    check_apply(scene)?;
    let Some(preview) = preview(scene, settings) else {
        return Err(EditError::out_of_scope("apply needs an active preview"));
    };

    let mut report = ApplyReport::default();
    for (id, result) in preview.results {
        match result {
            ShapeClip::Unchanged => report.kept += 1,
            ShapeClip::Trimmed(shape) => {
                scene.replace(id, shape)?;
                report.clipped += 1;
            }
            ShapeClip::Split(shapes) => {
                scene.splice(id, shapes)?;
                report.clipped += 1;
            }
            ShapeClip::Removed => {
                scene.remove(id);
                report.removed += 1;
            }
        }
    }
    set_preview(scene, None)?;

    tracing::info!(
        algorithm = preview.algorithm.label(),
        kept = report.kept,
        clipped = report.clipped,
        removed = report.removed,
        "clip applied"
    );
    Ok(report)
}
