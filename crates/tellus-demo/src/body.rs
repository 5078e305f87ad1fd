//! Scene setup for the demo body.

use std::sync::Arc;

use glam::Vec3;
use tellus_collide::{BodyMeshBuilder, Relief, TriMeshError};
use tellus_config::BodyConfig;
use tellus_scene::{Camera, NodeId, SceneGraph, Spin, Transform};
use tracing::info;

/// Nodes making up one walkable body.
pub struct BodyScene {
    pub center: NodeId,
    pub spin_frame: NodeId,
    pub surface: NodeId,
    pub spin: Spin,
}

/// Spawns `center → spin frame → surface` with a freshly built collision
/// mesh on the surface node.
pub fn spawn_body(scene: &mut SceneGraph, config: &BodyConfig) -> Result<BodyScene, TriMeshError> {
    let mut builder = BodyMeshBuilder::new(config.radius).subdivisions(config.subdivisions);
    if config.relief > 0.0 {
        builder = builder.relief(Relief {
            amplitude: config.relief,
            craters: config.craters,
            mountains: config.mountains,
            seed: config.seed,
        });
    }
    let mesh = builder.build()?;
    info!(
        radius = config.radius,
        bounding_radius = mesh.bounding_radius(),
        triangles = mesh.triangle_count(),
        "Generated body"
    );

    let center = scene.spawn("body-center", Transform::default());
    let spin_frame = scene.spawn("body-spin", Transform::default());
    let surface = scene.spawn("body-surface", Transform::default());
    scene.attach(spin_frame, center);
    scene.attach(surface, spin_frame);
    scene.set_collider(surface, Some(Arc::new(mesh)));

    Ok(BodyScene {
        center,
        spin_frame,
        surface,
        spin: Spin {
            axis: Vec3::Y,
            rate: config.spin_rate,
        },
    })
}

/// An orbit-style camera `distance` radii out, aimed a little above the
/// body center so it looks at the upper hemisphere.
pub fn orbit_camera(radius: f32, distance: f32) -> Camera {
    let mut camera = Camera::default();
    let eye = Vec3::new(0.0, radius * 0.5, radius * distance);
    camera.look_at(eye, Vec3::Y, Vec3::new(0.0, radius * 0.3, 0.0));
    camera
}
