//! Velocity integration and ground resolution in a radial gravity field.
//!
//! Velocity is split every frame into a vertical part (along the current up)
//! and a tangential part. The split is recomputed from scratch each call and
//! never stored.

use glam::Vec3;
use tellus_config::WalkConfig;

use crate::body::BodyInfo;
use crate::state::PlayerState;

/// Per-frame movement constants, scaled by the body's gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    pub acceleration: f32,
    pub max_tangential_speed: f32,
    pub jump_speed: f32,
    pub gravity_strength: f32,
    /// Multiplier applied to the vertical component this frame.
    pub vertical_damping: f32,
    /// Multiplier applied to the tangential component this frame.
    pub tangential_damping: f32,
}

impl StepParams {
    #[must_use]
    pub fn derive(config: &WalkConfig, body: &BodyInfo, dt: f32) -> Self {
        let scale = body.gravity_scale(config);
        Self {
            acceleration: config.acceleration * scale,
            max_tangential_speed: config.max_tangential_speed * scale,
            jump_speed: config.jump_speed * scale,
            gravity_strength: config.gravity_strength * scale,
            vertical_damping: (-config.vertical_damping_rate * dt).exp(),
            tangential_damping: (-config.tangential_damping_rate * dt).exp(),
        }
    }
}

/// Advances `state.velocity` by one frame.
///
/// Order matters: acceleration, hard speed cap, jump or gravity, then
/// exponential damping on top of the cap.
pub fn integrate_velocity(
    state: &mut PlayerState,
    up: Vec3,
    movement: Vec3,
    params: &StepParams,
    dt: f32,
) {
    let velocity = state.velocity + movement * (params.acceleration * dt);

    let mut vertical = up * velocity.dot(up);
    let mut tangential = velocity - vertical;

    let speed = tangential.length();
    if speed > params.max_tangential_speed {
        tangential *= params.max_tangential_speed / speed;
    }

    if state.jump_queued && state.grounded {
        vertical = up * params.jump_speed;
        state.grounded = false;
        state.jump_queued = false;
    } else {
        vertical += up * (-params.gravity_strength * dt);
    }

    tangential *= params.tangential_damping;
    vertical *= params.vertical_damping;
    state.velocity = tangential + vertical;
}

/// Outcome of resolving a tentative position against the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grounding {
    pub position: Vec3,
    pub grounded: bool,
    /// Distance above the minimum standing distance. Zero when grounded.
    pub clearance: f32,
}

/// Keeps `tentative` at least `head_height` above the surface.
///
/// `surface_point` maps a unit direction from `center` to the ground point
/// in that direction. A position pushed out of the ground loses any velocity
/// still heading inward.
pub fn resolve_grounding(
    tentative: Vec3,
    velocity: &mut Vec3,
    center: Vec3,
    fallback_up: Vec3,
    head_height: f32,
    surface_point: impl Fn(Vec3) -> Vec3,
) -> Grounding {
    let direction = crate::basis::up_at(tentative, center, fallback_up);
    let min_distance = (surface_point(direction) - center).length() + head_height;
    let distance = (tentative - center).length();

    if distance < min_distance {
        let inward = velocity.dot(direction);
        if inward < 0.0 {
            *velocity -= direction * inward;
        }
        Grounding {
            position: center + direction * min_distance,
            grounded: true,
            clearance: 0.0,
        }
    } else {
        Grounding {
            position: tentative,
            grounded: false,
            clearance: distance - min_distance,
        }
    }
}
