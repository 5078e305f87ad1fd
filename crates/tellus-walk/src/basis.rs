//! Tangent-plane orientation for a walker whose "up" changes every frame.

use glam::{Quat, Vec3};
use tracing::trace;

/// Up used when the walker sits exactly on the body center.
pub const DEFAULT_UP: Vec3 = Vec3::Y;

/// Below this squared length `up × Y` is treated as degenerate and X is
/// used as the fallback axis instead.
const FALLBACK_EPSILON: f32 = 1e-6;

/// Below this distance from the center there is no meaningful up.
const MIN_UP_LENGTH: f32 = 1e-5;

/// Direction from `center` to `position`, or `fallback` when the two coincide.
#[must_use]
pub fn up_at(position: Vec3, center: Vec3, fallback: Vec3) -> Vec3 {
    let offset = position - center;
    let length = offset.length();
    if length < MIN_UP_LENGTH || !length.is_finite() {
        trace!("degenerate up at {position}; using fallback");
        return fallback;
    }
    offset / length
}

/// An orthonormal (forward, right, up) frame spanning the tangent plane.
///
/// `right` is `up × Y` (or `up × X` near the poles), so the frame is
/// continuous everywhere except across the fallback switch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentBasis {
    pub up: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
}

impl TangentBasis {
    /// Builds the basis for a unit `up`. Callers never pass zero.
    #[must_use]
    pub fn from_up(up: Vec3) -> Self {
        let mut right = up.cross(Vec3::Y);
        if right.length_squared() < FALLBACK_EPSILON {
            right = up.cross(Vec3::X);
        }
        let right = right.normalize();
        let forward = right.cross(up).normalize();
        Self { up, forward, right }
    }

    /// `direction` with its up component removed, normalized. `None` when
    /// `direction` is (nearly) parallel to up.
    #[must_use]
    pub fn flatten(&self, direction: Vec3) -> Option<Vec3> {
        let flat = direction - self.up * direction.dot(self.up);
        if flat.length_squared() < FALLBACK_EPSILON || !flat.is_finite() {
            return None;
        }
        Some(flat.normalize())
    }

    /// Heading angle of a direction, measured from `forward` toward `right`
    /// in the tangent plane. Zero when `direction` is vertical.
    #[must_use]
    pub fn yaw_of(&self, direction: Vec3) -> f32 {
        match self.flatten(direction) {
            Some(flat) => flat.dot(self.right).atan2(flat.dot(self.forward)),
            None => 0.0,
        }
    }

    /// Elevation angle of a unit direction above the tangent plane.
    #[must_use]
    pub fn pitch_of(&self, direction: Vec3) -> f32 {
        direction.dot(self.up).clamp(-1.0, 1.0).asin()
    }
}

/// Where the walker looks and moves for a given yaw and pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFrame {
    pub up: Vec3,
    /// Look direction including pitch.
    pub look: Vec3,
    /// Look direction flattened onto the tangent plane.
    pub move_forward: Vec3,
    /// Viewer's right in the tangent plane.
    pub move_right: Vec3,
}

impl ViewFrame {
    #[must_use]
    pub fn new(basis: &TangentBasis, yaw: f32, pitch: f32) -> Self {
        let up = basis.up;
        let heading = Quat::from_axis_angle(up, yaw) * basis.forward;
        let view_right = heading.cross(up).normalize();
        let look = (Quat::from_axis_angle(view_right, pitch) * heading).normalize();

        let flat = look - up * look.dot(up);
        let move_forward = if flat.length_squared() > FALLBACK_EPSILON {
            flat.normalize()
        } else {
            basis.forward
        };
        let move_right = move_forward.cross(up).normalize();

        Self {
            up,
            look,
            move_forward,
            move_right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    fn assert_orthonormal(basis: &TangentBasis) {
        let TangentBasis { up, forward, right } = *basis;
        for (name, v) in [("up", up), ("forward", forward), ("right", right)] {
            assert!((v.length() - 1.0).abs() < 1e-5, "{name} = {v} for up {up}");
        }
        assert!(forward.dot(right).abs() < 1e-5, "f·r for up {up}");
        assert!(forward.dot(up).abs() < 1e-5, "f·u for up {up}");
        assert!(right.dot(up).abs() < 1e-5, "r·u for up {up}");
    }

    #[test]
    fn test_basis_orthonormal_for_random_ups() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0xB0D1);
        let mut ups = Vec::with_capacity(1000);

        // Near both fallback axes, at shrinking offsets.
        for axis in [Vec3::Y, Vec3::NEG_Y, Vec3::X, Vec3::NEG_X] {
            for exp in 1..=50 {
                let scale = 10f32.powf(-(exp as f32) / 7.0);
                let jitter = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ) * scale;
                ups.push((axis + jitter).normalize());
            }
        }
        while ups.len() < 1000 {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if v.length_squared() > 1e-4 {
                ups.push(v.normalize());
            }
        }

        for up in ups {
            assert_orthonormal(&TangentBasis::from_up(up));
        }
    }

    #[test]
    fn test_exact_poles_use_second_fallback() {
        for up in [Vec3::Y, Vec3::NEG_Y] {
            let basis = TangentBasis::from_up(up);
            assert_orthonormal(&basis);
            assert!(basis.right.dot(Vec3::X).abs() < 1e-6);
        }
    }

    #[test]
    fn test_up_at_degenerate_uses_fallback() {
        assert_eq!(up_at(Vec3::ONE, Vec3::ONE, Vec3::Z), Vec3::Z);
        assert_eq!(up_at(Vec3::new(0.0, 3.0, 0.0), Vec3::ZERO, Vec3::Z), Vec3::Y);
    }

    #[test]
    fn test_yaw_and_pitch_reconstruct_direction() {
        let basis = TangentBasis::from_up(Vec3::new(0.3, 0.8, -0.2).normalize());
        let direction = (basis.forward * 0.4 - basis.right * 0.7 + basis.up * 0.3).normalize();
        let frame = ViewFrame::new(&basis, basis.yaw_of(direction), basis.pitch_of(direction));
        assert!((frame.look - direction).length() < 1e-5, "{} vs {direction}", frame.look);
    }

    #[test]
    fn test_flatten_drops_vertical_component() {
        let basis = TangentBasis::from_up(Vec3::Z);
        let flat = basis.flatten(Vec3::new(0.0, 3.0, -4.0)).unwrap();
        assert!((flat - Vec3::Y).length() < 1e-6, "{flat}");
        assert!(basis.flatten(Vec3::NEG_Z * 2.0).is_none());
        assert_eq!(basis.yaw_of(Vec3::Z), 0.0);
    }

    #[test]
    fn test_positive_pitch_looks_up() {
        let basis = TangentBasis::from_up(Vec3::Z);
        let frame = ViewFrame::new(&basis, 0.3, 0.5);
        assert!(frame.look.dot(Vec3::Z) > 0.4);
        assert!(frame.move_forward.dot(Vec3::Z).abs() < 1e-6);
    }

    #[test]
    fn test_move_right_is_viewer_right() {
        let basis = TangentBasis::from_up(Vec3::Y);
        let frame = ViewFrame::new(&basis, 1.1, -0.4);
        // Right-handed: forward × up points to the viewer's right.
        assert!((frame.move_right - frame.move_forward.cross(Vec3::Y)).length() < 1e-6);
        assert!(frame.move_right.dot(frame.move_forward).abs() < 1e-6);
    }

    #[test]
    fn test_turning_left_is_positive_yaw() {
        let basis = TangentBasis::from_up(Vec3::Y);
        let ahead = ViewFrame::new(&basis, 0.0, 0.0);
        let turned = ViewFrame::new(&basis, 0.2, 0.0);
        // Positive yaw rotates counter-clockwise about up, away from the right.
        assert!(turned.move_forward.dot(ahead.move_right) < 0.0);
    }
}
