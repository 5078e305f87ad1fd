//! Constant-rate rotation of a body's spin frame.

use glam::{Quat, Vec3};

use crate::graph::{NodeId, SceneGraph};

/// Rotates a node about a fixed local axis at a constant angular rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Rotation axis in the node's parent frame (normalized on use).
    pub axis: Vec3,
    /// Angular rate in radians per second. Negative spins the other way.
    pub rate: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            axis: Vec3::Y,
            rate: 0.0,
        }
    }
}

impl Spin {
    /// Advances the node's rotation by `rate * dt`. Returns `false` if the
    /// node is gone or the axis is degenerate.
    pub fn advance(&self, scene: &mut SceneGraph, node: NodeId, dt: f32) -> bool {
        let axis = self.axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return false;
        }
        let Some(current) = scene.transform(node).map(|t| t.rotation) else {
            return false;
        };
        let step = Quat::from_axis_angle(axis, self.rate * dt);
        scene.set_rotation(node, (step * current).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Transform;
    use std::f32::consts::PI;

    #[test]
    fn test_child_is_carried_around_by_spin() {
        let mut scene = SceneGraph::new();
        let frame = scene.spawn("spin", Transform::default());
        let rider = scene
            .spawn_child(frame, "rider", Transform::from_translation(Vec3::X))
            .unwrap();
        let spin = Spin {
            axis: Vec3::Y,
            rate: PI,
        };
        // Half a turn in 100 steps.
        for _ in 0..100 {
            assert!(spin.advance(&mut scene, frame, 0.01));
        }
        let p = scene.world_position(rider).unwrap();
        assert!((p - Vec3::NEG_X).length() < 1e-3, "{p}");
    }

    #[test]
    fn test_degenerate_axis_is_rejected() {
        let mut scene = SceneGraph::new();
        let frame = scene.spawn("spin", Transform::default());
        let spin = Spin {
            axis: Vec3::ZERO,
            rate: 1.0,
        };
        assert!(!spin.advance(&mut scene, frame, 0.1));
    }
}
