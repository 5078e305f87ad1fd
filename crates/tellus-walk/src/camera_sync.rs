//! Pushing the walker's view onto the external camera.

use glam::Vec3;
use tellus_scene::Camera;
use tracing::trace;

use crate::basis::ViewFrame;

/// Points `camera` from the walker's eye along its look direction, with the
/// body's local up as the camera's up.
pub fn drive_camera(camera: &mut Camera, eye: Vec3, frame: &ViewFrame) {
    if !camera.look_at(eye, frame.up, eye + frame.look) {
        trace!("look direction parallel to up; camera rotation kept");
    }
}
