//! Perspective camera driven by position/up/target.

use glam::{Mat3, Mat4, Quat, Vec3};

/// A perspective camera in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion. Camera looks along local -Z with +Y up.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 60.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Camera {
    /// The forward direction vector (-Z in camera space).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Places the camera at `position`, looking at `target` with `up` as the
    /// preferred up direction.
    ///
    /// If `target` coincides with `position` or the view direction is parallel
    /// to `up`, the position is applied and the rotation is left unchanged;
    /// returns `false` in that case.
    pub fn look_at(&mut self, position: Vec3, up: Vec3, target: Vec3) -> bool {
        self.position = position;

        let forward = (target - position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return false;
        }
        let corrected_up = right.cross(forward);
        let basis = Mat3::from_cols(right, corrected_up, -forward);
        self.rotation = Quat::from_mat3(&basis).normalize();
        true
    }

    /// Sets the near clip plane, keeping it below the far plane.
    pub fn set_near(&mut self, near: f32) {
        self.near = near.clamp(f32::EPSILON, self.far * 0.5);
    }

    /// View matrix (inverse of the camera transform).
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Right-handed perspective projection.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// Update the aspect ratio.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_aligns_forward_and_up() {
        let mut camera = Camera::default();
        let up = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(camera.look_at(Vec3::new(0.0, 0.0, 5.0), up, Vec3::ZERO));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((camera.up() - up).length() < 1e-5);
        assert!(camera.right().dot(camera.forward()).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_look_at_keeps_rotation() {
        let mut camera = Camera::default();
        let before = camera.rotation;
        assert!(!camera.look_at(Vec3::ONE, Vec3::Y, Vec3::ONE));
        assert!(!camera.look_at(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(camera.rotation, before);
        assert_eq!(camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_view_matrix_maps_position_to_origin() {
        let mut camera = Camera::default();
        camera.look_at(Vec3::new(3.0, 4.0, 5.0), Vec3::Y, Vec3::ZERO);
        let p = camera.view_matrix().transform_point3(camera.position);
        assert!(p.length() < 1e-4);
    }

    #[test]
    fn test_set_near_clamps() {
        let mut camera = Camera::default();
        camera.set_near(0.005);
        assert_eq!(camera.near, 0.005);
        camera.set_near(-1.0);
        assert!(camera.near > 0.0);
    }
}
