//! Player and held-key state.

use glam::Vec3;

use crate::basis::ViewFrame;

/// Physical state of the walker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Position in the spin frame's local coordinates.
    pub position: Vec3,
    /// World-space velocity.
    pub velocity: Vec3,
    /// Heading about the local up, in radians.
    pub yaw: f32,
    /// Elevation above the tangent plane, in radians. Positive looks up.
    pub pitch: f32,
    pub grounded: bool,
    pub jump_queued: bool,
    pub active: bool,
}

impl PlayerState {
    /// Zeroes motion and flags, keeping position and view angles.
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.jump_queued = false;
    }
}

/// Movement keys currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Unit direction in the tangent plane for the held keys, or zero when
    /// nothing is held or opposite keys cancel out.
    #[must_use]
    pub fn movement_direction(&self, frame: &ViewFrame) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if self.forward {
            direction += frame.move_forward;
        }
        if self.backward {
            direction -= frame.move_forward;
        }
        if self.right {
            direction += frame.move_right;
        }
        if self.left {
            direction -= frame.move_right;
        }
        direction.normalize_or_zero()
    }
}
