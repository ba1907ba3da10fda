/// Rotation of the whole scene, in degrees, plus the active drag gesture.
///
/// Only [`crate::interaction::InteractionController`] writes to it, the frame
/// renderer only reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneState {
    pub(crate) rotation_around_x: f32,
    pub(crate) rotation_around_y: f32,
    pub(crate) drag_anchor: Option<DragAnchor>,
}

/// Pointer position and rotation captured on pointer-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragAnchor {
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub base_rotation_x: f32,
    pub base_rotation_y: f32,
}

impl SceneState {
    pub fn new(rotation_around_x: f32, rotation_around_y: f32) -> Self {
        Self {
            rotation_around_x,
            rotation_around_y,
            drag_anchor: None,
        }
    }

    pub fn rotation_around_x(&self) -> f32 {
        self.rotation_around_x
    }

    pub fn rotation_around_y(&self) -> f32 {
        self.rotation_around_y
    }

    pub fn drag_anchor(&self) -> Option<&DragAnchor> {
        self.drag_anchor.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}
