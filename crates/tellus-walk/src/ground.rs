//! Surface queries against the body's collision mesh.

use glam::Vec3;
use tellus_collide::Ray;
use tellus_config::WalkConfig;
use tellus_scene::{NodeId, SceneGraph};
use tracing::trace;

use crate::basis::DEFAULT_UP;
use crate::body::BodyInfo;

/// Casts rays at the mesh carried by the surface node.
///
/// The mesh may be missing (body still generating) or swapped between
/// frames; every query degrades to a sphere of the body's current radius.
pub struct GroundQuery<'a> {
    scene: &'a SceneGraph,
    surface: NodeId,
    body: BodyInfo,
    min_radius: f32,
}

impl<'a> GroundQuery<'a> {
    #[must_use]
    pub fn new(scene: &'a SceneGraph, surface: NodeId, body: BodyInfo, config: &WalkConfig) -> Self {
        Self {
            scene,
            surface,
            body,
            min_radius: config.fallback_min_radius,
        }
    }

    /// Nearest world-space hit of a world-space ray, if the mesh is present
    /// and the ray touches it.
    #[must_use]
    pub fn cast(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        let mesh = self.scene.collider(self.surface)?;
        let to_world = self.scene.world_matrix(self.surface)?;
        let to_local = to_world.inverse();

        let ray = Ray::new(
            to_local.transform_point3(origin),
            to_local.transform_vector3(direction),
        )?;
        let hit = mesh.cast_ray(&ray, f32::INFINITY)?;
        Some(to_world.transform_point3(hit.point))
    }

    /// Surface point seen from `center` looking along `direction`.
    ///
    /// Never fails: without a hit the point lies on a sphere of
    /// [`current_radius`](Self::current_radius).
    #[must_use]
    pub fn surface_point(&self, center: Vec3, direction: Vec3) -> Vec3 {
        let direction = direction.normalize_or_zero();
        let direction = if direction == Vec3::ZERO {
            trace!("degenerate surface query direction; using default up");
            DEFAULT_UP
        } else {
            direction
        };

        if let Some(point) = self.cast(center, direction) {
            return point;
        }
        trace!("no surface hit along {direction}; using radius fallback");
        center + direction * self.current_radius().max(self.min_radius)
    }

    /// World-space radius of the body: the mesh's bounding radius when a mesh
    /// is loaded, otherwise the reported body radius.
    #[must_use]
    pub fn current_radius(&self) -> f32 {
        let mesh_radius = self.scene.collider(self.surface).and_then(|mesh| {
            let scale = self.scene.world_scale(self.surface)?;
            Some(mesh.bounding_radius() * scale)
        });
        match mesh_radius {
            Some(radius) if radius.is_finite() && radius > 0.0 => radius,
            _ if self.body.radius.is_finite() => self.body.radius,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tellus_collide::BodyMeshBuilder;
    use tellus_scene::Transform;

    fn body(radius: f32) -> BodyInfo {
        BodyInfo {
            radius,
            gravity: 9.81,
        }
    }

    #[test]
    fn test_missing_mesh_falls_back_to_body_radius() {
        let mut scene = SceneGraph::new();
        let surface = scene.spawn("surface", Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        let query = GroundQuery::new(&scene, surface, body(3.0), &WalkConfig::default());
        let center = Vec3::new(5.0, 0.0, 0.0);
        let point = query.surface_point(center, Vec3::new(0.0, 0.0, 2.0));
        assert!((point - Vec3::new(5.0, 0.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_fallback_radius_has_floor() {
        let mut scene = SceneGraph::new();
        let surface = scene.spawn("surface", Transform::default());
        let query = GroundQuery::new(&scene, surface, body(0.0), &WalkConfig::default());
        let point = query.surface_point(Vec3::ZERO, Vec3::X);
        assert!((point.length() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_direction_never_panics() {
        let mut scene = SceneGraph::new();
        let surface = scene.spawn("surface", Transform::default());
        let query = GroundQuery::new(&scene, surface, body(2.0), &WalkConfig::default());
        let point = query.surface_point(Vec3::ZERO, Vec3::ZERO);
        assert!((point - DEFAULT_UP * 2.0).length() < 1e-6);
    }

    #[test]
    fn test_hit_through_transformed_node() {
        let mut scene = SceneGraph::new();
        let mut transform = Transform::from_translation(Vec3::new(0.0, 10.0, 0.0));
        transform.scale = 2.0;
        let surface = scene.spawn("surface", transform);
        let mesh = BodyMeshBuilder::new(1.0).subdivisions(3).build().unwrap();
        scene.set_collider(surface, Some(Arc::new(mesh)));

        let query = GroundQuery::new(&scene, surface, body(99.0), &WalkConfig::default());
        assert!((query.current_radius() - 2.0).abs() < 1e-4);

        let center = Vec3::new(0.0, 10.0, 0.0);
        let point = query.surface_point(center, Vec3::X);
        let distance = (point - center).length();
        assert!(distance > 1.9 && distance <= 2.0 + 1e-4, "distance {distance}");

        // Aimed from outside, the ray stops at the near side.
        let hit = query.cast(Vec3::new(0.0, 10.0, 20.0), Vec3::NEG_Z).unwrap();
        assert!(hit.z > 1.9 && hit.z <= 2.0 + 1e-4, "hit {hit}");
        assert!(query.cast(Vec3::new(0.0, 10.0, 20.0), Vec3::Z).is_none());
    }
}
