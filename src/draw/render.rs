use crate::draw::clip_window::{self, ShapeClip};
use crate::draw::handles::Handle;
use crate::draw::model::{Point, PrimitiveId, Rect, Shape};
use crate::draw::raster::rasterize_shape;
use crate::draw::scene::Scene;
use crate::draw::settings::CanvasSettings;
use crate::draw::state::{Gesture, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ink {
    Stroke,
    Selected,
    /// Original geometry hidden behind an active clip preview.
    Ghost,
    Preview,
    /// Primitive still waiting for its second click.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectRole {
    ClipWindow,
    SelectionBox,
    RubberBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleShape {
    Square,
    Circle,
}

/// One drawing instruction for the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    SetPixel {
        x: i32,
        y: i32,
        ink: Ink,
    },
    DrawSegment {
        from: Point,
        to: Point,
        ink: Ink,
    },
    DrawRectangle {
        min: Point,
        max: Point,
        style: RectStyle,
        role: RectRole,
    },
    DrawHandle {
        position: Point,
        shape: HandleShape,
    },
}

/// Builds the full frame in paint order: primitives, clip preview, pending
/// primitive, clip window, selection box, rubber band.
pub fn build_frame(
    scene: &Scene,
    mode: Mode,
    gesture: &Gesture,
    settings: &CanvasSettings,
) -> Vec<DrawCommand> {
    let mut commands = Vec::new();

    let preview = clip_window::preview(scene, settings);
    let ghosted: BTreeSet<PrimitiveId> = preview
        .iter()
        .flat_map(|preview| preview.results.iter().map(|(id, _)| *id))
        .collect();

    for primitive in scene.primitives() {
        let ink = if ghosted.contains(&primitive.id) {
            Ink::Ghost
        } else if scene.is_selected(primitive.id) {
            Ink::Selected
        } else {
            Ink::Stroke
        };
        push_pixels(&mut commands, &primitive.shape, ink);
    }

    if let Some(preview) = &preview {
        for (id, result) in &preview.results {
            match result {
                ShapeClip::Unchanged => {
                    if let Some(primitive) = scene.get(*id) {
                        push_pixels(&mut commands, &primitive.shape, Ink::Preview);
                    }
                }
                ShapeClip::Trimmed(shape) => push_pixels(&mut commands, shape, Ink::Preview),
                ShapeClip::Split(shapes) => {
                    for shape in shapes {
                        push_pixels(&mut commands, shape, Ink::Preview);
                    }
                }
                ShapeClip::Removed => {}
            }
        }
    }

    if let Gesture::AwaitingSecondPoint { first, current } = *gesture {
        let pending = match mode.line_algorithm() {
            Some(algorithm) => Shape::line(first, current, algorithm),
            None => Shape::circle(first, first.distance_to(current)),
        };
        push_pixels(&mut commands, &pending, Ink::Pending);
    }

    if let Some(window) = scene.clip_window() {
        let style = if window.is_editing {
            RectStyle::Dashed
        } else {
            RectStyle::Solid
        };
        push_rect(&mut commands, &window.rect, style, RectRole::ClipWindow);
        if mode == Mode::ClipWindow {
            push_resize_handles(&mut commands, &window.rect);
        }
    }
    if let Gesture::ClipEditing(drag) = gesture {
        if let Some(rect) = drag.pending_rect() {
            push_rect(&mut commands, &rect, RectStyle::Dashed, RectRole::ClipWindow);
        }
    }

    if mode == Mode::Select {
        if let Some(bounds) = scene.selection_bounds() {
            push_rect(&mut commands, &bounds, RectStyle::Dashed, RectRole::SelectionBox);
            push_resize_handles(&mut commands, &bounds);
            let offset = settings.rotate_handle_offset;
            let knob = Handle::Rotate.position(&bounds, offset);
            commands.push(DrawCommand::DrawSegment {
                from: Handle::North.position(&bounds, offset),
                to: knob,
                ink: Ink::Selected,
            });
            commands.push(DrawCommand::DrawHandle {
                position: knob,
                shape: HandleShape::Circle,
            });
        }
    }

    if let Gesture::Selecting { anchor, current } = *gesture {
        push_rect(
            &mut commands,
            &Rect::from_corners(anchor, current),
            RectStyle::Dashed,
            RectRole::RubberBand,
        );
    }

    commands
}

fn push_pixels(commands: &mut Vec<DrawCommand>, shape: &Shape, ink: Ink) {
    commands.extend(
        rasterize_shape(shape)
            .into_iter()
            .map(|(x, y)| DrawCommand::SetPixel { x, y, ink }),
    );
}

fn push_rect(commands: &mut Vec<DrawCommand>, rect: &Rect, style: RectStyle, role: RectRole) {
    commands.push(DrawCommand::DrawRectangle {
        min: rect.min(),
        max: rect.max(),
        style,
        role,
    });
}

fn push_resize_handles(commands: &mut Vec<DrawCommand>, rect: &Rect) {
    commands.extend(Handle::RESIZE.into_iter().map(|handle| DrawCommand::DrawHandle {
        position: handle.position(rect, 0.0),
        shape: HandleShape::Square,
    }));
}
