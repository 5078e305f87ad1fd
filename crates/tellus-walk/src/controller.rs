//! The walk session: entry, per-frame integration, input and exit.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use tellus_config::WalkConfig;
use tellus_input::{CaptureSignal, KeyInput, MouseButton, WalkAction, WalkBindings};
use tellus_scene::{NodeId, SceneGraph, Transform};
use tracing::{debug, info, trace, warn};

use crate::basis::{up_at, TangentBasis, ViewFrame, DEFAULT_UP};
use crate::camera_sync::drive_camera;
use crate::ground::GroundQuery;
use crate::physics::{integrate_velocity, resolve_grounding, StepParams};
use crate::session::{EnterOptions, EnterRefusal, SessionContext, WalkWorld};
use crate::state::{InputState, PlayerState};

/// Name given to the scene node that stands in for the walker.
const PLAYER_NODE_NAME: &str = "surface-walker";

/// Read-only snapshot for HUDs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkTelemetry {
    pub active: bool,
    pub grounded: bool,
    /// Height above standing height. Zero while grounded.
    pub altitude: f32,
    pub tangential_speed: f32,
    /// Signed speed along the local up. Positive is rising.
    pub vertical_speed: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// First-person walker for the surface of a (possibly spinning) body.
///
/// Inactive until [`enter`](Self::enter) succeeds. While active it owns a
/// child node of the session's spin frame, drives the camera every
/// [`update`](Self::update), and interprets the walk keys. [`exit`](Self::exit)
/// restores the camera's near plane and hands the cursor back.
pub struct SurfaceWalker {
    context: SessionContext,
    config: WalkConfig,
    bindings: WalkBindings,
    state: PlayerState,
    input: InputState,
    /// Exclusive capture has been granted and not revoked since.
    pointer_locked: bool,
    /// The primary button is held for mouse-look.
    look_active: bool,
    player: Option<NodeId>,
    saved_near: Option<f32>,
    on_exit: Option<Box<dyn FnOnce()>>,
    up: Vec3,
    clearance: f32,
}

impl SurfaceWalker {
    #[must_use]
    pub fn new(context: SessionContext, config: WalkConfig, bindings: WalkBindings) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{e}; using default walk tuning");
                WalkConfig::default()
            }
        };
        Self {
            context,
            config,
            bindings,
            state: PlayerState::default(),
            input: InputState::default(),
            pointer_locked: false,
            look_active: false,
            player: None,
            saved_near: None,
            on_exit: None,
            up: DEFAULT_UP,
            clearance: 0.0,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    #[must_use]
    pub fn player_state(&self) -> &PlayerState {
        &self.state
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// The walker's scene node, once the first session has spawned it.
    #[must_use]
    pub fn player_node(&self) -> Option<NodeId> {
        self.player
    }

    /// Whether pointer motion currently turns the view.
    #[must_use]
    pub fn is_looking(&self) -> bool {
        self.state.active && self.look_active && self.pointer_locked
    }

    #[must_use]
    pub fn telemetry(&self) -> WalkTelemetry {
        let vertical_speed = self.state.velocity.dot(self.up);
        let tangential_speed = (self.state.velocity - self.up * vertical_speed).length();
        WalkTelemetry {
            active: self.state.active,
            grounded: self.state.grounded,
            altitude: self.clearance,
            tangential_speed,
            vertical_speed,
            yaw: self.state.yaw,
            pitch: self.state.pitch,
        }
    }

    /// Starts walking where the camera is looking. Returns `false`, with
    /// nothing changed, if the session cannot start.
    pub fn enter(&mut self, world: &mut WalkWorld<'_>, options: EnterOptions) -> bool {
        match self.try_enter(world, options) {
            Ok(()) => true,
            Err(EnterRefusal::AlreadyActive) => {
                debug!("already walking; enter ignored");
                false
            }
            Err(refusal) => {
                info!(%refusal, "walk mode refused");
                false
            }
        }
    }

    /// [`enter`](Self::enter), reporting why a refusal happened.
    pub fn try_enter(
        &mut self,
        world: &mut WalkWorld<'_>,
        options: EnterOptions,
    ) -> Result<(), EnterRefusal> {
        if self.state.active {
            return Err(EnterRefusal::AlreadyActive);
        }
        if self.context.platform.is_touch() {
            return Err(EnterRefusal::TouchPlatform);
        }
        let session = self.context.resolve(world.scene)?;

        let camera_position = world.camera.position;
        let look = world.camera.forward();
        let contact = {
            let ground = GroundQuery::new(world.scene, session.surface, session.body, &self.config);
            ground.cast(camera_position, look).unwrap_or_else(|| {
                debug!("camera is not looking at the body; landing below it");
                ground.surface_point(session.center, camera_position - session.center)
            })
        };
        let up = up_at(contact, session.center, DEFAULT_UP);
        let head_height = session.body.head_height(&self.config);
        let eye = contact + up * head_height;
        let local = world
            .scene
            .world_to_local(session.spin_frame, eye)
            .ok_or(EnterRefusal::MissingCollaborator("spin_frame"))?;
        self.attach_player(world.scene, session.spin_frame, local)?;

        // Level view along the camera's heading. A camera aimed straight down
        // at the contact has no heading, so its screen-up takes over.
        let basis = TangentBasis::from_up(up);
        let heading = basis
            .flatten(look)
            .or_else(|| basis.flatten(world.camera.up()))
            .unwrap_or(basis.forward);
        self.state = PlayerState {
            position: local,
            velocity: Vec3::ZERO,
            yaw: basis.yaw_of(heading),
            pitch: 0.0,
            grounded: false,
            jump_queued: false,
            active: true,
        };
        self.input.clear();
        self.pointer_locked = false;
        self.look_active = false;
        self.up = up;
        self.clearance = 0.0;

        let original_near = world.camera.near;
        let walking_near = (head_height * self.config.near_plane_fraction)
            .max(self.config.min_near_plane)
            .min(original_near);
        self.saved_near = Some(original_near);
        world.camera.set_near(walking_near);
        self.on_exit = options.on_exit;

        info!(
            radius = session.body.radius,
            gravity = session.body.gravity,
            head_height,
            "entered walk mode"
        );
        self.sync_camera(world);
        Ok(())
    }

    /// Ends the session. Does nothing while inactive.
    pub fn exit(&mut self, world: &mut WalkWorld<'_>) {
        if !self.state.active {
            return;
        }
        if self.pointer_locked || self.look_active {
            world.cursor.release_capture();
        }
        self.pointer_locked = false;
        self.look_active = false;
        self.input.clear();
        self.state.halt();
        self.state.active = false;
        self.clearance = 0.0;

        if let Some(near) = self.saved_near.take() {
            world.camera.near = near;
        }
        if let Some(player) = self.player {
            world.scene.detach(player);
        }
        info!("left walk mode");
        if let Some(on_exit) = self.on_exit.take() {
            on_exit();
        }
    }

    /// Advances the walker by `dt` seconds and drives the camera.
    pub fn update(&mut self, world: &mut WalkWorld<'_>, dt: f32) {
        if !self.state.active {
            return;
        }
        let session = match self.context.resolve(world.scene) {
            Ok(session) => session,
            Err(refusal) => {
                warn!(%refusal, "walk collaborators vanished; leaving walk mode");
                self.exit(world);
                return;
            }
        };
        let attached = self
            .player
            .filter(|&id| world.scene.parent(id) == Some(session.spin_frame));
        let (Some(player), Some(world_position)) = (
            attached,
            world
                .scene
                .local_to_world(session.spin_frame, self.state.position),
        ) else {
            warn!("walker was detached from the spin frame; leaving walk mode");
            self.exit(world);
            return;
        };
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "skipping frame with unusable dt");
            self.sync_camera(world);
            return;
        }

        let up = up_at(world_position, session.center, self.up);
        let frame = ViewFrame::new(&TangentBasis::from_up(up), self.state.yaw, self.state.pitch);
        let movement = self.input.movement_direction(&frame);
        let params = StepParams::derive(&self.config, &session.body, dt);
        integrate_velocity(&mut self.state, up, movement, &params, dt);

        let tentative = world_position + self.state.velocity * dt;
        let head_height = session.body.head_height(&self.config);
        let grounding = {
            let ground = GroundQuery::new(world.scene, session.surface, session.body, &self.config);
            resolve_grounding(
                tentative,
                &mut self.state.velocity,
                session.center,
                up,
                head_height,
                |direction| ground.surface_point(session.center, direction),
            )
        };
        self.state.grounded = grounding.grounded;
        self.clearance = grounding.clearance;
        self.up = up_at(grounding.position, session.center, up);

        if let Some(local) = world
            .scene
            .world_to_local(session.spin_frame, grounding.position)
        {
            self.state.position = local;
            world.scene.set_translation(player, local);
        }
        self.sync_camera(world);
    }

    /// Re-applies the walker's view to the camera. Does nothing while
    /// inactive.
    pub fn sync_camera(&self, world: &mut WalkWorld<'_>) {
        if !self.state.active {
            return;
        }
        let Some((eye, frame)) = self.view(world.scene) else {
            return;
        };
        drive_camera(world.camera, eye, &frame);
    }

    /// Key press. Returns whether the key was consumed.
    pub fn handle_key_down(&mut self, world: &mut WalkWorld<'_>, key: &KeyInput) -> bool {
        let Some(action) = self.bound_action(key) else {
            return false;
        };
        match action {
            WalkAction::MoveForward => self.input.forward = true,
            WalkAction::MoveBack => self.input.backward = true,
            WalkAction::MoveLeft => self.input.left = true,
            WalkAction::MoveRight => self.input.right = true,
            WalkAction::Jump => {
                if !key.repeat {
                    self.state.jump_queued = true;
                }
            }
            WalkAction::Exit => self.exit(world),
        }
        true
    }

    /// Key release. Returns whether the key was consumed.
    pub fn handle_key_up(&mut self, key: &KeyInput) -> bool {
        let Some(action) = self.bound_action(key) else {
            return false;
        };
        match action {
            WalkAction::MoveForward => self.input.forward = false,
            WalkAction::MoveBack => self.input.backward = false,
            WalkAction::MoveLeft => self.input.left = false,
            WalkAction::MoveRight => self.input.right = false,
            WalkAction::Jump | WalkAction::Exit => {}
        }
        true
    }

    /// Primary button down starts mouse-look and asks for cursor capture.
    pub fn handle_pointer_down(&mut self, world: &mut WalkWorld<'_>, button: MouseButton) -> bool {
        if !self.state.active || button != MouseButton::Left {
            return false;
        }
        self.look_active = true;
        world.cursor.request_capture();
        true
    }

    /// Primary button up ends mouse-look and gives capture back.
    pub fn handle_pointer_up(&mut self, world: &mut WalkWorld<'_>, button: MouseButton) -> bool {
        if !self.state.active || button != MouseButton::Left {
            return false;
        }
        self.look_active = false;
        world.cursor.release_capture();
        true
    }

    /// Relative pointer motion. Turns the view only while looking.
    pub fn handle_pointer_motion(&mut self, dx: f32, dy: f32) -> bool {
        if !self.is_looking() || !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let sensitivity = self.config.mouse_sensitivity;
        let dy = if self.config.invert_y { -dy } else { dy };
        let limit = self.config.pitch_limit();

        self.state.yaw = wrap_angle(self.state.yaw - dx * sensitivity);
        self.state.pitch = (self.state.pitch - dy * sensitivity).clamp(-limit, limit);
        true
    }

    /// Platform answer to a capture request, or an unsolicited revocation.
    pub fn handle_capture_change(&mut self, signal: CaptureSignal) {
        match signal {
            CaptureSignal::Granted if self.state.active && self.look_active => {
                debug!("cursor capture granted");
                self.pointer_locked = true;
            }
            CaptureSignal::Granted => {
                trace!("stale capture grant ignored");
            }
            CaptureSignal::Revoked => {
                if self.pointer_locked || self.look_active {
                    debug!("cursor capture revoked");
                }
                self.pointer_locked = false;
                self.look_active = false;
            }
        }
    }

    fn bound_action(&self, key: &KeyInput) -> Option<WalkAction> {
        if !self.state.active {
            return None;
        }
        key.key_code()
            .and_then(|code| self.bindings.action_for(code))
    }

    /// Reuses the walker node from an earlier session when it still exists.
    fn attach_player(
        &mut self,
        scene: &mut SceneGraph,
        spin_frame: NodeId,
        local: Vec3,
    ) -> Result<NodeId, EnterRefusal> {
        let player = match self.player.filter(|&id| scene.contains(id)) {
            Some(id) => id,
            None => scene.spawn(PLAYER_NODE_NAME, Transform::default()),
        };
        self.player = Some(player);
        if !scene.attach(player, spin_frame) {
            return Err(EnterRefusal::MissingCollaborator("spin_frame"));
        }
        scene.set_transform(player, Transform::from_translation(local));
        Ok(player)
    }

    /// Eye position and view frame for the current state.
    fn view(&self, scene: &SceneGraph) -> Option<(Vec3, ViewFrame)> {
        let spin_frame = self.context.spin_frame?;
        let center = scene.world_position(self.context.body_center?)?;
        let eye = scene.local_to_world(spin_frame, self.state.position)?;
        let up = up_at(eye, center, self.up);
        let frame = ViewFrame::new(&TangentBasis::from_up(up), self.state.yaw, self.state.pitch);
        Some((eye, frame))
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
