//! Drag-to-rotate.
//!
//! Two states: idle (no anchor in [`SceneState`]) and dragging (anchor
//! present). While dragging, the rotation is an absolute function of the
//! pointer position relative to the anchor: one pixel is one degree, vertical
//! movement turns about X, horizontal movement turns about Y.

use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::data_structures::scene_state::{DragAnchor, SceneState};

/// Whether the scene has to be drawn again after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Redraw,
    Ignored,
}

/// Translates pointer input into [`SceneState`] rotation.
///
/// winit reports button presses without a position, so the last cursor
/// position is remembered here.
#[derive(Debug, Default)]
pub struct InteractionController {
    cursor: Option<(f32, f32)>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Dragging.
    pub fn pointer_down(&mut self, state: &mut SceneState, x: f32, y: f32) {
        self.cursor = Some((x, y));
        if state.drag_anchor.is_some() {
            log::debug!("pointer down while already dragging, keeping the first anchor");
            return;
        }
        state.drag_anchor = Some(DragAnchor {
            pointer_x: x,
            pointer_y: y,
            base_rotation_x: state.rotation_around_x,
            base_rotation_y: state.rotation_around_y,
        });
        log::debug!("drag started at ({x}, {y})");
    }

    /// Moves only rotate while a drag is active.
    pub fn pointer_move(&mut self, state: &mut SceneState, x: f32, y: f32) -> Response {
        self.cursor = Some((x, y));
        let Some(anchor) = state.drag_anchor else {
            return Response::Ignored;
        };
        state.rotation_around_x = anchor.base_rotation_x - anchor.pointer_y + y;
        state.rotation_around_y = anchor.base_rotation_y - anchor.pointer_x + x;
        Response::Redraw
    }

    /// Dragging -> Idle. The anchor is dropped.
    pub fn pointer_up(&mut self, state: &mut SceneState) {
        if state.drag_anchor.take().is_some() {
            log::debug!(
                "drag ended at rotation ({}, {})",
                state.rotation_around_x,
                state.rotation_around_y
            );
        }
    }

    /// Routes a winit event. Cursor positions arrive in physical pixels and
    /// are converted with `scale_factor`, so one logical pixel is one degree.
    pub fn on_window_event(
        &mut self,
        state: &mut SceneState,
        event: &WindowEvent,
        scale_factor: f64,
    ) -> Response {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale_factor);
                self.pointer_move(state, logical.x, logical.y)
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                match button_state {
                    ElementState::Pressed => match self.cursor {
                        Some((x, y)) => self.pointer_down(state, x, y),
                        None => log::warn!("pointer down before any cursor position was known"),
                    },
                    ElementState::Released => self.pointer_up(state),
                }
                Response::Ignored
            }
            // A release after losing focus never reaches us.
            WindowEvent::Focused(false) => {
                self.pointer_up(state);
                Response::Ignored
            }
            _ => Response::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_drag_turns_about_x_only() {
        let mut state = SceneState::new(10.0, 0.0);
        let mut controller = InteractionController::new();

        controller.pointer_down(&mut state, 100.0, 100.0);
        assert!(state.is_dragging());
        assert_eq!(
            controller.pointer_move(&mut state, 100.0, 130.0),
            Response::Redraw
        );

        assert_eq!(state.rotation_around_x(), 40.0);
        assert_eq!(state.rotation_around_y(), 0.0);
    }

    #[test]
    fn rotation_is_absolute_relative_to_the_anchor() {
        let mut state = SceneState::new(5.0, -20.0);
        let mut controller = InteractionController::new();

        controller.pointer_down(&mut state, 50.0, 60.0);
        controller.pointer_move(&mut state, 70.0, 10.0);
        controller.pointer_move(&mut state, 55.0, 65.0);

        assert_eq!(state.rotation_around_x(), 10.0);
        assert_eq!(state.rotation_around_y(), -15.0);
    }

    #[test]
    fn moves_without_a_drag_are_ignored() {
        let mut state = SceneState::new(1.0, 2.0);
        let mut controller = InteractionController::new();

        assert_eq!(
            controller.pointer_move(&mut state, 300.0, 300.0),
            Response::Ignored
        );
        assert_eq!(state, SceneState::new(1.0, 2.0));
    }

    #[test]
    fn pointer_up_ends_the_drag_and_keeps_the_rotation() {
        let mut state = SceneState::default();
        let mut controller = InteractionController::new();

        controller.pointer_down(&mut state, 0.0, 0.0);
        controller.pointer_move(&mut state, 25.0, -15.0);
        controller.pointer_up(&mut state);

        assert!(!state.is_dragging());
        assert_eq!(
            controller.pointer_move(&mut state, 500.0, 500.0),
            Response::Ignored
        );
        assert_eq!(state.rotation_around_x(), -15.0);
        assert_eq!(state.rotation_around_y(), 25.0);
    }

    fn cursor_at(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            // SAFETY: the id is only compared, never handed to the platform.
            device_id: unsafe { winit::event::DeviceId::dummy() },
            position: winit::dpi::PhysicalPosition::new(x, y),
        }
    }

    fn left_button(pressed: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            // SAFETY: the id is only compared, never handed to the platform.
            device_id: unsafe { winit::event::DeviceId::dummy() },
            state: pressed,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn cursor_positions_are_measured_in_logical_pixels() {
        let mut state = SceneState::default();
        let mut controller = InteractionController::new();

        controller.on_window_event(&mut state, &cursor_at(100.0, 200.0), 2.0);
        controller.on_window_event(&mut state, &left_button(ElementState::Pressed), 2.0);
        assert_eq!(state.drag_anchor().map(|a| a.pointer_y), Some(100.0));

        // 60 physical pixels at 2x are 30 logical pixels.
        let response = controller.on_window_event(&mut state, &cursor_at(100.0, 260.0), 2.0);
        assert_eq!(response, Response::Redraw);
        assert_eq!(state.rotation_around_x(), 30.0);
        assert_eq!(state.rotation_around_y(), 0.0);

        controller.on_window_event(&mut state, &left_button(ElementState::Released), 2.0);
        assert!(!state.is_dragging());
    }

    #[test]
    fn unit_scale_keeps_pixels_as_degrees() {
        let mut state = SceneState::default();
        let mut controller = InteractionController::new();

        controller.on_window_event(&mut state, &cursor_at(10.0, 10.0), 1.0);
        controller.on_window_event(&mut state, &left_button(ElementState::Pressed), 1.0);
        controller.on_window_event(&mut state, &cursor_at(10.0, 40.0), 1.0);
        assert_eq!(state.rotation_around_x(), 30.0);
    }

    #[test]
    fn second_drag_starts_from_the_current_rotation() {
        let mut state = SceneState::default();
        let mut controller = InteractionController::new();

        controller.pointer_down(&mut state, 0.0, 0.0);
        controller.pointer_move(&mut state, 10.0, 20.0);
        controller.pointer_up(&mut state);

        controller.pointer_down(&mut state, 200.0, 200.0);
        let anchor = *state.drag_anchor().unwrap();
        assert_eq!(anchor.base_rotation_x, 20.0);
        assert_eq!(anchor.base_rotation_y, 10.0);

        controller.pointer_move(&mut state, 205.0, 190.0);
        assert_eq!(state.rotation_around_x(), 10.0);
        assert_eq!(state.rotation_around_y(), 15.0);
    }
}
