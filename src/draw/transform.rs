//! Move, scale and rotate drags over the current selection.
//!
//! A drag keeps an immutable snapshot of the selected primitives and of their
//! bounding box. Every pointer update rebuilds the geometry from that snapshot
//! plus the total pointer delta, so nothing accumulates between frames and a
//! cancel writes the snapshot back bit-for-bit.

use crate::draw::error::EditError;
use crate::draw::handles::Handle;
use crate::draw::input::Modifiers;
use crate::draw::model::{Point, Primitive, Rect, Shape};
use crate::draw::scene::Scene;
use crate::draw::settings::CanvasSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Move,
    Scale(Handle),
    Rotate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformDrag {
    kind: TransformKind,
    anchor: Point,
    original: Vec<Primitive>,
    bounds: Rect,
    modifiers: Modifiers,
    /// Last rotation applied, held while the pointer sits on the pivot.
    angle: f64,
}

impl TransformDrag {
    pub fn begin_move(scene: &Scene, anchor: Point) -> Result<Self, EditError> {
        Self::begin(scene, TransformKind::Move, anchor)
    }

    pub fn begin_scale(scene: &Scene, handle: Handle, anchor: Point) -> Result<Self, EditError> {
        if handle == Handle::Rotate {
            return Err(EditError::invalid_geometry(
                "rotation handle cannot drive a scale",
            ));
        }
        let drag = Self::begin(scene, TransformKind::Scale(handle), anchor)?;
        let (scales_x, scales_y) = handle.affects_axes();
        if (scales_x && drag.bounds.width() == 0.0) || (scales_y && drag.bounds.height() == 0.0) {
            return Err(EditError::invalid_geometry(
                "selection has zero extent on the scaled axis",
            ));
        }
        Ok(drag)
    }

    pub fn begin_rotate(scene: &Scene, anchor: Point) -> Result<Self, EditError> {
        Self::begin(scene, TransformKind::Rotate, anchor)
    }

    fn begin(scene: &Scene, kind: TransformKind, anchor: Point) -> Result<Self, EditError> {
        let bounds = scene
            .selection_bounds()
            .ok_or_else(|| EditError::out_of_scope("nothing selected"))?;
        let original: Vec<Primitive> = scene.selected().copied().collect();
        tracing::debug!(?kind, count = original.len(), "transform drag started");
        Ok(Self {
            kind,
            anchor,
            original,
            bounds,
            modifiers: Modifiers::default(),
            angle: 0.0,
        })
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    /// Selection box as it was when the drag started.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Recomputes the selected geometry for `pointer`. On error the scene
    /// keeps the last valid frame.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        pointer: Point,
        modifiers: Modifiers,
        settings: &CanvasSettings,
    ) -> Result<(), EditError> {
        self.modifiers = modifiers;
        let frame = match self.kind {
            TransformKind::Move => {
                let (dx, dy) = self.anchor.delta_to(pointer);
                self.map_original(|shape| translate_shape(shape, dx, dy))
            }
            TransformKind::Scale(handle) => {
                let (pivot, sx, sy) = self.scale_factors(handle, pointer, settings)?;
                self.map_original(|shape| scale_shape(shape, pivot, sx, sy))
            }
            TransformKind::Rotate => {
                let angle = self.rotation_angle(pointer, settings);
                self.angle = angle;
                let pivot = self.bounds.center();
                self.map_original(|shape| rotate_shape(shape, pivot, angle))
            }
        };
        scene.restore(&frame);
        Ok(())
    }

    /// Writes the snapshot back.
    pub fn cancel(self, scene: &mut Scene) {
        tracing::debug!(kind = ?self.kind, "transform drag cancelled");
        scene.restore(&self.original);
    }

    pub fn commit(self) {
        tracing::debug!(kind = ?self.kind, count = self.original.len(), "transform committed");
    }

    fn map_original(&self, f: impl Fn(&Shape) -> Shape) -> Vec<Primitive> {
        self.original
            .iter()
            .map(|primitive| Primitive {
                id: primitive.id,
                shape: f(&primitive.shape),
            })
            .collect()
    }

    /// Factor per affected axis is `(pointer - pivot) / (anchor - pivot)`.
    fn scale_factors(
        &self,
        handle: Handle,
        pointer: Point,
        settings: &CanvasSettings,
    ) -> Result<(Point, f64, f64), EditError> {
        let pivot = if self.modifiers.alt {
            self.bounds.center()
        } else {
            handle
                .opposite()
                .position(&self.bounds, settings.rotate_handle_offset)
        };

        let (scales_x, scales_y) = handle.affects_axes();
        let factor = |affected: bool, pointer: f64, anchor: f64, pivot: f64| {
            if affected {
                (pointer - pivot) / (anchor - pivot)
            } else {
                1.0
            }
        };
        let mut sx = factor(scales_x, pointer.x, self.anchor.x, pivot.x);
        let mut sy = factor(scales_y, pointer.y, self.anchor.y, pivot.y);

        if self.modifiers.shift && handle.is_corner() {
            let magnitude = sx.abs().max(sy.abs());
            sx = magnitude.copysign(sx);
            sy = magnitude.copysign(sy);
        }

        if !sx.is_finite() || !sy.is_finite() || sx == 0.0 || sy == 0.0 {
            return Err(EditError::invalid_geometry("scale factor collapses an axis"));
        }
        Ok((pivot, sx, sy))
    }

    fn rotation_angle(&self, pointer: Point, settings: &CanvasSettings) -> f64 {
        let pivot = self.bounds.center();
        let knob = Handle::Rotate.position(&self.bounds, settings.rotate_handle_offset);
        let (kx, ky) = pivot.delta_to(knob);
        let (px, py) = pivot.delta_to(pointer);
        if px == 0.0 && py == 0.0 {
            return self.angle;
        }
        let angle = py.atan2(px) - ky.atan2(kx);
        if self.modifiers.shift && settings.snap_angle_degrees > 0.0 {
            snap_angle(angle, settings.snap_angle_degrees.to_radians())
        } else {
            angle
        }
    }
}

fn snap_angle(angle: f64, step: f64) -> f64 {
    (angle / step).round() * step
}

pub fn translate_shape(shape: &Shape, dx: f64, dy: f64) -> Shape {
    shape.map_points(|point| point.translated(dx, dy))
}

/// Scales control points about `pivot`. A circle's radius grows by the larger
/// factor magnitude so it stays a circle.
pub fn scale_shape(shape: &Shape, pivot: Point, sx: f64, sy: f64) -> Shape {
    let scaled = shape.map_points(|point| {
        Point::new(
            pivot.x + (point.x - pivot.x) * sx,
            pivot.y + (point.y - pivot.y) * sy,
        )
    });
    match scaled {
        Shape::Circle { center, radius } => Shape::circle(center, radius * sx.abs().max(sy.abs())),
        line => line,
    }
}

/// Rotates control points about `pivot` by `radians` (positive turns from +x
/// towards +y, clockwise on screen). Radii are unchanged.
pub fn rotate_shape(shape: &Shape, pivot: Point, radians: f64) -> Shape {
    let (sin, cos) = radians.sin_cos();
    shape.map_points(|point| {
        let (dx, dy) = pivot.delta_to(point);
        Point::new(
            pivot.x + dx * cos - dy * sin,
            pivot.y + dx * sin + dy * cos,
        )
    })
}
