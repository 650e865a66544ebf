//! One interactive canvas: scene, mode, the active gesture and settings.
//!
//! Events are handled one at a time. Edits the current state does not allow
//! are logged and dropped on the event path, and returned as errors on the
//! command path; either way the session is left as it was.

use crate::draw::clip_window::{self, ClipDrag};
use crate::draw::error::EditError;
use crate::draw::handles::{self, Handle, HandleSet};
use crate::draw::input::{map_key_event_to_command, Command, InputEvent, Modifiers, PointerButton};
use crate::draw::model::{Point, Rect, Shape};
use crate::draw::render::{build_frame, DrawCommand};
use crate::draw::scene::Scene;
use crate::draw::settings::CanvasSettings;
use crate::draw::state::{gesture_allowed, Gesture, Mode};
use crate::draw::transform::TransformDrag;

#[derive(Debug, Clone, Default)]
pub struct CanvasSession {
    scene: Scene,
    mode: Mode,
    gesture: Gesture,
    settings: CanvasSettings,
    pointer: Option<Point>,
    modifiers: Modifiers,
}

impl CanvasSession {
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access for hosts that seed or inspect primitives.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn frame(&self) -> Vec<DrawCommand> {
        build_frame(&self.scene, self.mode, &self.gesture, &self.settings)
    }

    /// Feeds one input event. Returns whether the scene or gesture changed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let result = match event {
            InputEvent::PointerDown {
                position,
                button,
                modifiers,
            } => {
                self.pointer = Some(position);
                self.modifiers = modifiers;
                if button != PointerButton::Primary {
                    return false;
                }
                self.pointer_down(position)
            }
            InputEvent::PointerMoved {
                position,
                modifiers,
            } => {
                self.pointer = Some(position);
                self.modifiers = modifiers;
                self.pointer_moved(position)
            }
            InputEvent::PointerUp { position } => {
                self.pointer = Some(position);
                self.pointer_up(position)
            }
            InputEvent::KeyDown(key) => {
                match map_key_event_to_command(self.mode, key, &self.settings) {
                    Some(command) => self.execute(command).map(|()| true),
                    None => Ok(false),
                }
            }
            InputEvent::PointerCaptureLost => Ok(self.abandon_drag()),
        };

        match result {
            Ok(changed) => changed,
            Err(err) => {
                tracing::debug!(%err, mode = ?self.mode, "input rejected");
                false
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<(), EditError> {
        tracing::debug!(?command, "executing command");
        match command {
            Command::SelectMode(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            Command::SetPreviewAlgorithm(algorithm) => {
                clip_window::set_preview(&mut self.scene, algorithm)?;
                if algorithm.is_some() && self.mode != Mode::ClipWindow {
                    self.set_mode(Mode::ClipWindow);
                }
                Ok(())
            }
            Command::ApplyClip => {
                clip_window::check_apply(&self.scene)?;
                self.cancel_gesture();
                clip_window::apply(&mut self.scene, &self.settings).map(|_| ())
            }
            Command::ClearScene => {
                self.cancel_gesture();
                self.scene.clear();
                tracing::info!("scene cleared");
                Ok(())
            }
            Command::NudgeClip { dx, dy } => {
                if matches!(self.gesture, Gesture::ClipEditing(_)) {
                    return Err(EditError::out_of_scope(
                        "clip window is being dragged",
                    ));
                }
                clip_window::nudge(&mut self.scene, dx, dy)
            }
            Command::DeleteClipWindow => {
                if self.scene.clip_window().is_none() {
                    return Err(EditError::out_of_scope("no clip window to delete"));
                }
                if matches!(self.gesture, Gesture::ClipEditing(_)) {
                    self.cancel_gesture();
                }
                clip_window::delete_window(&mut self.scene)
            }
            Command::CancelGesture => {
                self.cancel_gesture();
                Ok(())
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.cancel_gesture();
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "mode changed");
        }
        self.mode = mode;
        if let Some(window) = self.scene.clip_window_mut() {
            window.is_editing = mode == Mode::ClipWindow;
        }
    }

    /// Aborts the active gesture, reverting any drag. Returns whether there
    /// was one.
    fn cancel_gesture(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let was_active = !gesture.is_idle();
        if was_active {
            tracing::debug!(gesture = gesture.label(), "gesture cancelled");
        }
        match gesture {
            Gesture::Transforming(drag) => drag.cancel(&mut self.scene),
            Gesture::ClipEditing(drag) => drag.cancel(&mut self.scene),
            Gesture::Idle | Gesture::AwaitingSecondPoint { .. } | Gesture::Selecting { .. } => {}
        }
        was_active
    }

    /// Capture loss only ends drags; a pending two-click primitive survives.
    fn abandon_drag(&mut self) -> bool {
        match self.gesture {
            Gesture::Idle | Gesture::AwaitingSecondPoint { .. } => false,
            _ => self.cancel_gesture(),
        }
    }

    fn start_gesture(&mut self, gesture: Gesture) -> Result<bool, EditError> {
        if !gesture_allowed(self.mode, &gesture) {
            return Err(EditError::out_of_scope(format!(
                "{} is not available in {} mode",
                gesture.label(),
                self.mode.label()
            )));
        }
        tracing::debug!(gesture = gesture.label(), "gesture started");
        self.gesture = gesture;
        Ok(true)
    }

    fn pointer_down(&mut self, position: Point) -> Result<bool, EditError> {
        if let Gesture::AwaitingSecondPoint { first, .. } = self.gesture {
            self.gesture = Gesture::Idle;
            self.commit_primitive(first, position);
            return Ok(true);
        }
        if !self.gesture.is_idle() {
            return Err(EditError::out_of_scope(format!(
                "{} already in progress",
                self.gesture.label()
            )));
        }

        let gesture = match self.mode {
            Mode::DrawLineDda | Mode::DrawLineBresenham | Mode::DrawCircle => {
                Gesture::AwaitingSecondPoint {
                    first: position,
                    current: position,
                }
            }
            Mode::Select => self.begin_select_gesture(position)?,
            Mode::ClipWindow => {
                Gesture::ClipEditing(ClipDrag::begin(&self.scene, position, &self.settings))
            }
        };
        self.start_gesture(gesture)
    }

    /// Handles first, then the selection body, then a rubber band.
    fn begin_select_gesture(&self, position: Point) -> Result<Gesture, EditError> {
        let Some(bounds) = self.scene.selection_bounds() else {
            return Ok(Gesture::Selecting {
                anchor: position,
                current: position,
            });
        };
        let drag = match handles::hit_test(&bounds, position, HandleSet::Selection, &self.settings)
        {
            Some(Handle::Rotate) => TransformDrag::begin_rotate(&self.scene, position)?,
            Some(handle) => TransformDrag::begin_scale(&self.scene, handle, position)?,
            None if bounds.contains(position) => {
                TransformDrag::begin_move(&self.scene, position)?
            }
            None => {
                return Ok(Gesture::Selecting {
                    anchor: position,
                    current: position,
                })
            }
        };
        Ok(Gesture::Transforming(drag))
    }

    fn commit_primitive(&mut self, first: Point, second: Point) {
        let shape = match self.mode.line_algorithm() {
            Some(algorithm) => Shape::line(first, second, algorithm),
            None => Shape::circle(first, first.distance_to(second)),
        };
        let id = self.scene.add(shape);
        tracing::debug!(%id, ?shape, "primitive created");
    }

    fn pointer_moved(&mut self, position: Point) -> Result<bool, EditError> {
        match &mut self.gesture {
            Gesture::Idle => Ok(false),
            Gesture::AwaitingSecondPoint { current, .. } | Gesture::Selecting { current, .. } => {
                *current = position;
                Ok(true)
            }
            Gesture::Transforming(drag) => drag
                .update(&mut self.scene, position, self.modifiers, &self.settings)
                .map(|()| true),
            Gesture::ClipEditing(drag) => {
                drag.update(&mut self.scene, position, self.modifiers, &self.settings);
                Ok(true)
            }
        }
    }

    fn pointer_up(&mut self, position: Point) -> Result<bool, EditError> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(false),
            pending @ Gesture::AwaitingSecondPoint { .. } => {
                // A two-click gesture survives the release of the first click.
                self.gesture = pending;
                Ok(false)
            }
            Gesture::Selecting { anchor, .. } => {
                let band = Rect::from_corners(anchor, position);
                let hits = self.scene.ids_intersecting(&band);
                tracing::debug!(count = hits.len(), "rubber-band selection");
                self.scene.set_selection(hits);
                Ok(true)
            }
            Gesture::Transforming(mut drag) => {
                if let Err(err) =
                    drag.update(&mut self.scene, position, self.modifiers, &self.settings)
                {
                    tracing::debug!(%err, "final transform frame rejected");
                }
                drag.commit();
                Ok(true)
            }
            Gesture::ClipEditing(drag) => {
                drag.finish(&mut self.scene, position, self.modifiers, &self.settings);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::clip::ClipAlgorithm;
    use crate::draw::clip_window::ClipPhase;
    use crate::draw::input::{KeyCode, KeyEvent};
    use crate::draw::model::LineAlgorithm;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn down(session: &mut CanvasSession, x: f64, y: f64) -> bool {
        session.handle_event(InputEvent::PointerDown {
            position: p(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(session: &mut CanvasSession, x: f64, y: f64) -> bool {
        session.handle_event(InputEvent::PointerMoved {
            position: p(x, y),
            modifiers: Modifiers::default(),
        })
    }

    fn up(session: &mut CanvasSession, x: f64, y: f64) -> bool {
        session.handle_event(InputEvent::PointerUp { position: p(x, y) })
    }

    fn drag(session: &mut CanvasSession, from: (f64, f64), to: (f64, f64)) {
        down(session, from.0, from.1);
        moved(session, to.0, to.1);
        up(session, to.0, to.1);
    }

    fn key(session: &mut CanvasSession, key: KeyCode) -> bool {
        session.handle_event(InputEvent::KeyDown(KeyEvent {
            key,
            modifiers: Modifiers::default(),
        }))
    }

    #[test]
    fn two_clicks_draw_a_line_in_the_mode_algorithm() {
        let mut session = CanvasSession::default();
        session
            .execute(Command::SelectMode(Mode::DrawLineBresenham))
            .expect("mode");
        down(&mut session, 1.0, 1.0);
        up(&mut session, 1.0, 1.0);
        assert!(matches!(
            session.gesture(),
            Gesture::AwaitingSecondPoint { .. }
        ));
        down(&mut session, 9.0, 4.0);
        assert!(session.gesture().is_idle());
        assert_eq!(
            session.scene().primitives()[0].shape,
            Shape::line(p(1.0, 1.0), p(9.0, 4.0), LineAlgorithm::Bresenham)
        );
    }

    #[test]
    fn circle_radius_is_distance_between_clicks() {
        let mut session = CanvasSession::default();
        session
            .execute(Command::SelectMode(Mode::DrawCircle))
            .expect("mode");
        down(&mut session, 10.0, 10.0);
        down(&mut session, 13.0, 14.0);
        assert_eq!(
            session.scene().primitives()[0].shape,
            Shape::circle(p(10.0, 10.0), 5.0)
        );
    }

    #[test]
    fn mode_switch_discards_half_finished_primitive() {
        let mut session = CanvasSession::default();
        down(&mut session, 0.0, 0.0);
        session
            .execute(Command::SelectMode(Mode::DrawCircle))
            .expect("mode");
        assert!(session.gesture().is_idle());
        down(&mut session, 5.0, 5.0);
        assert!(session.scene().is_empty());
    }

    #[test]
    fn rubber_band_then_move_selection() {
        let mut session = CanvasSession::default();
        let id = session
            .scene_mut()
            .add_line(p(20.0, 20.0), p(60.0, 40.0), LineAlgorithm::Dda);
        session.execute(Command::SelectMode(Mode::Select)).expect("mode");

        drag(&mut session, (0.0, 0.0), (100.0, 100.0));
        assert!(session.scene().is_selected(id));

        drag(&mut session, (40.0, 30.0), (45.0, 20.0));
        assert_eq!(
            session.scene().get(id).map(|prim| prim.shape),
            Some(Shape::line(p(25.0, 10.0), p(65.0, 30.0), LineAlgorithm::Dda))
        );
    }

    #[test]
    fn capture_loss_reverts_transform() {
        let mut session = CanvasSession::default();
        let id = session
            .scene_mut()
            .add_line(p(20.0, 20.0), p(60.0, 40.0), LineAlgorithm::Dda);
        session.scene_mut().set_selection([id]);
        session.execute(Command::SelectMode(Mode::Select)).expect("mode");
        let before = session.scene().clone();

        down(&mut session, 60.0, 40.0);
        assert!(matches!(session.gesture(), Gesture::Transforming(_)));
        moved(&mut session, 90.0, 70.0);
        assert_ne!(session.scene(), &before);
        session.handle_event(InputEvent::PointerCaptureLost);
        assert_eq!(session.scene(), &before);
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn capture_loss_keeps_pending_two_click_primitive() {
        let mut session = CanvasSession::default();
        down(&mut session, 2.0, 3.0);
        up(&mut session, 2.0, 3.0);
        assert!(!session.handle_event(InputEvent::PointerCaptureLost));
        assert!(matches!(
            session.gesture(),
            Gesture::AwaitingSecondPoint { .. }
        ));
        down(&mut session, 12.0, 3.0);
        assert_eq!(
            session.scene().primitives()[0].shape,
            Shape::line(p(2.0, 3.0), p(12.0, 3.0), LineAlgorithm::Dda)
        );
    }

    #[test]
    fn preview_shortcut_needs_a_window_and_switches_mode() {
        let mut session = CanvasSession::default();
        assert!(!key(&mut session, KeyCode::Digit1));
        assert_eq!(session.mode(), Mode::DrawLineDda);
        assert!(matches!(
            session.execute(Command::SetPreviewAlgorithm(Some(
                ClipAlgorithm::CohenSutherland
            ))),
            Err(EditError::OutOfScope(_))
        ));

        session
            .execute(Command::SelectMode(Mode::ClipWindow))
            .expect("mode");
        drag(&mut session, (10.0, 10.0), (50.0, 50.0));
        session
            .execute(Command::SelectMode(Mode::Select))
            .expect("mode");
        assert_eq!(session.scene().clip_window().map(|w| w.is_editing), Some(false));

        assert!(key(&mut session, KeyCode::Digit1));
        assert_eq!(session.mode(), Mode::ClipWindow);
        assert_eq!(
            clip_window::phase(session.scene()),
            ClipPhase::Previewing(ClipAlgorithm::CohenSutherland)
        );
        assert_eq!(session.scene().clip_window().map(|w| w.is_editing), Some(true));
    }

    #[test]
    fn nudge_is_rejected_during_clip_drag() {
        let mut session = CanvasSession::default();
        session
            .execute(Command::SelectMode(Mode::ClipWindow))
            .expect("mode");
        drag(&mut session, (10.0, 10.0), (50.0, 50.0));
        down(&mut session, 30.0, 30.0);
        assert!(matches!(
            session.execute(Command::NudgeClip { dx: 1.0, dy: 0.0 }),
            Err(EditError::OutOfScope(_))
        ));
        up(&mut session, 30.0, 30.0);
        session
            .execute(Command::NudgeClip { dx: 1.0, dy: 0.0 })
            .expect("nudge");
        assert_eq!(
            session.scene().clip_window().map(|w| w.rect.min()),
            Some(p(11.0, 10.0))
        );
    }

    #[test]
    fn failed_apply_leaves_gesture_untouched() {
        let mut session = CanvasSession::default();
        session
            .execute(Command::SelectMode(Mode::DrawCircle))
            .expect("mode");
        down(&mut session, 0.0, 0.0);
        assert!(session.execute(Command::ApplyClip).is_err());
        assert!(matches!(
            session.gesture(),
            Gesture::AwaitingSecondPoint { .. }
        ));
    }

    #[test]
    fn clear_scene_drops_everything() {
        let mut session = CanvasSession::default();
        let id = session.scene_mut().add_circle(p(0.0, 0.0), 3.0);
        session.scene_mut().set_selection([id]);
        session
            .execute(Command::SelectMode(Mode::ClipWindow))
            .expect("mode");
        drag(&mut session, (10.0, 10.0), (50.0, 50.0));
        session.execute(Command::ClearScene).expect("clear");
        assert!(session.scene().is_empty());
        assert!(session.scene().selection().is_empty());
        assert_eq!(clip_window::phase(session.scene()), ClipPhase::NoWindow);
    }
}
