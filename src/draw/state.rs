use crate::draw::clip_window::ClipDrag;
use crate::draw::model::{LineAlgorithm, Point};
use crate::draw::transform::TransformDrag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    DrawLineDda,
    DrawLineBresenham,
    DrawCircle,
    Select,
    ClipWindow,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::DrawLineDda => "Line (DDA)",
            Mode::DrawLineBresenham => "Line (Bresenham)",
            Mode::DrawCircle => "Circle",
            Mode::Select => "Select",
            Mode::ClipWindow => "Clip window",
        }
    }

    pub fn line_algorithm(self) -> Option<LineAlgorithm> {
        match self {
            Mode::DrawLineDda => Some(LineAlgorithm::Dda),
            Mode::DrawLineBresenham => Some(LineAlgorithm::Bresenham),
            _ => None,
        }
    }

    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            Mode::DrawLineDda | Mode::DrawLineBresenham | Mode::DrawCircle
        )
    }
}

/// The single in-progress interaction. Holding it in one enum keeps drawing,
/// transforming, clip editing and rubber-band selection mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    AwaitingSecondPoint {
        first: Point,
        current: Point,
    },
    Selecting {
        anchor: Point,
        current: Point,
    },
    Transforming(TransformDrag),
    ClipEditing(ClipDrag),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::AwaitingSecondPoint { .. } => "awaiting second point",
            Gesture::Selecting { .. } => "selecting",
            Gesture::Transforming(_) => "transforming",
            Gesture::ClipEditing(_) => "clip editing",
        }
    }
}

/// Whether a gesture of this shape may run in `mode`.
pub fn gesture_allowed(mode: Mode, gesture: &Gesture) -> bool {
    match gesture {
        Gesture::Idle => true,
        Gesture::AwaitingSecondPoint { .. } => mode.is_drawing(),
        Gesture::Selecting { .. } | Gesture::Transforming(_) => mode == Mode::Select,
        Gesture::ClipEditing(_) => mode == Mode::ClipWindow,
    }
}
