use crate::draw::clip::ClipAlgorithm;
use crate::draw::model::Point;
use crate::draw::settings::CanvasSettings;
use crate::draw::state::Mode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    V,
    Digit0,
    Digit1,
    Digit2,
    Enter,
    Escape,
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyCode,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Normalized input delivered by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        position: Point,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMoved {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        position: Point,
    },
    KeyDown(KeyEvent),
    PointerCaptureLost,
}

/// Explicit requests from toolbars, menus or the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SelectMode(Mode),
    SetPreviewAlgorithm(Option<ClipAlgorithm>),
    ApplyClip,
    ClearScene,
    NudgeClip { dx: f64, dy: f64 },
    DeleteClipWindow,
    CancelGesture,
}

pub fn map_key_event_to_command(
    mode: Mode,
    event: KeyEvent,
    settings: &CanvasSettings,
) -> Option<Command> {
    let clip_mode = mode == Mode::ClipWindow;
    let step = settings.nudge_step_for(event.modifiers.shift);
    match event.key {
        KeyCode::V => Some(Command::SelectMode(Mode::Select)),
        KeyCode::Digit1 => Some(Command::SetPreviewAlgorithm(Some(
            ClipAlgorithm::CohenSutherland,
        ))),
        KeyCode::Digit2 => Some(Command::SetPreviewAlgorithm(Some(ClipAlgorithm::LiangBarsky))),
        KeyCode::Digit0 => Some(Command::SetPreviewAlgorithm(None)),
        KeyCode::Enter => Some(Command::ApplyClip),
        KeyCode::Escape => Some(Command::CancelGesture),
        KeyCode::Delete | KeyCode::Backspace if clip_mode => Some(Command::DeleteClipWindow),
        KeyCode::ArrowLeft if clip_mode => Some(Command::NudgeClip { dx: -step, dy: 0.0 }),
        KeyCode::ArrowRight if clip_mode => Some(Command::NudgeClip { dx: step, dy: 0.0 }),
        KeyCode::ArrowUp if clip_mode => Some(Command::NudgeClip { dx: 0.0, dy: -step }),
        KeyCode::ArrowDown if clip_mode => Some(Command::NudgeClip { dx: 0.0, dy: step }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: KeyCode) -> KeyEvent {
        KeyEvent {
            key,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn preview_shortcuts_work_in_every_mode() {
        let settings = CanvasSettings::default();
        for mode in [Mode::DrawCircle, Mode::Select, Mode::ClipWindow] {
            assert_eq!(
                map_key_event_to_command(mode, key(KeyCode::Digit2), &settings),
                Some(Command::SetPreviewAlgorithm(Some(ClipAlgorithm::LiangBarsky)))
            );
            assert_eq!(
                map_key_event_to_command(mode, key(KeyCode::Digit0), &settings),
                Some(Command::SetPreviewAlgorithm(None))
            );
        }
    }

    #[test]
    fn arrows_nudge_only_in_clip_mode_and_shift_is_fast() {
        let settings = CanvasSettings::default();
        assert_eq!(
            map_key_event_to_command(Mode::Select, key(KeyCode::ArrowLeft), &settings),
            None
        );
        assert_eq!(
            map_key_event_to_command(Mode::ClipWindow, key(KeyCode::ArrowLeft), &settings),
            Some(Command::NudgeClip { dx: -1.0, dy: 0.0 })
        );
        let fast_down = KeyEvent {
            key: KeyCode::ArrowDown,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        };
        assert_eq!(
            map_key_event_to_command(Mode::ClipWindow, fast_down, &settings),
            Some(Command::NudgeClip { dx: 0.0, dy: 10.0 })
        );
    }

    #[test]
    fn delete_keys_remove_window_in_clip_mode() {
        let settings = CanvasSettings::default();
        for code in [KeyCode::Delete, KeyCode::Backspace] {
            assert_eq!(
                map_key_event_to_command(Mode::ClipWindow, key(code), &settings),
                Some(Command::DeleteClipWindow)
            );
            assert_eq!(map_key_event_to_command(Mode::DrawLineDda, key(code), &settings), None);
        }
    }

    #[test]
    fn events_deserialize_with_default_modifiers() {
        let event: InputEvent = serde_json::from_value(serde_json::json!({
            "type": "pointer_down",
            "position": { "x": 3.0, "y": 4.0 }
        }))
        .expect("deserialize pointer down");
        assert_eq!(
            event,
            InputEvent::PointerDown {
                position: Point::new(3.0, 4.0),
                button: PointerButton::Primary,
                modifiers: Modifiers::default(),
            }
        );

        let key_down: InputEvent = serde_json::from_value(serde_json::json!({
            "type": "key_down",
            "key": "enter",
            "modifiers": { "shift": true }
        }))
        .expect("deserialize key down");
        assert!(matches!(
            key_down,
            InputEvent::KeyDown(KeyEvent {
                key: KeyCode::Enter,
                modifiers: Modifiers { shift: true, .. }
            })
        ));
    }

    #[test]
    fn commands_use_external_tags() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "set_preview_algorithm": "cohen_sutherland"
        }))
        .expect("deserialize command");
        assert_eq!(
            command,
            Command::SetPreviewAlgorithm(Some(ClipAlgorithm::CohenSutherland))
        );
        let apply: Command =
            serde_json::from_value(serde_json::json!("apply_clip")).expect("unit command");
        assert_eq!(apply, Command::ApplyClip);
    }
}
