//! Collaborators and options for a walk session.

use tellus_input::{CursorCapture, Platform};
use tellus_scene::{Camera, NodeId, SceneGraph};
use thiserror::Error;

use crate::body::BodyInfo;

/// Polled for the body's current radius and gravity.
pub type BodyInfoProvider = Box<dyn Fn() -> BodyInfo>;

/// The collaborators a walk session works against.
///
/// Node handles are non-owning: the scene graph owns the nodes, and a
/// despawned node counts as missing.
#[derive(Default)]
pub struct SessionContext {
    /// Node whose origin is the body's center of gravity.
    pub body_center: Option<NodeId>,
    /// Rotating node the walker is attached to while walking.
    pub spin_frame: Option<NodeId>,
    /// Node carrying the collision mesh. The mesh itself may be absent.
    pub surface: Option<NodeId>,
    pub body_info: Option<BodyInfoProvider>,
    pub platform: Platform,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("body_center", &self.body_center)
            .field("spin_frame", &self.spin_frame)
            .field("surface", &self.surface)
            .field("body_info", &self.body_info.is_some())
            .field("platform", &self.platform)
            .finish()
    }
}

/// Everything the walker borrows for the duration of one call.
pub struct WalkWorld<'w> {
    pub scene: &'w mut SceneGraph,
    pub camera: &'w mut Camera,
    pub cursor: &'w mut dyn CursorCapture,
}

/// Per-entry options.
#[derive(Default)]
pub struct EnterOptions {
    /// Called once when the session ends, whatever ended it.
    pub on_exit: Option<Box<dyn FnOnce()>>,
}

impl EnterOptions {
    #[must_use]
    pub fn on_exit(callback: impl FnOnce() + 'static) -> Self {
        Self {
            on_exit: Some(Box::new(callback)),
        }
    }
}

/// Why a walk session could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnterRefusal {
    #[error("required collaborator `{0}` is missing")]
    MissingCollaborator(&'static str),

    #[error("surface walking needs a pointer; touch platforms are unsupported")]
    TouchPlatform,

    #[error("a walk session is already active")]
    AlreadyActive,
}

/// Collaborators checked live against the scene.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Resolved {
    pub spin_frame: NodeId,
    pub surface: NodeId,
    pub center: glam::Vec3,
    pub body: BodyInfo,
}

impl SessionContext {
    pub(crate) fn resolve(&self, scene: &SceneGraph) -> Result<Resolved, EnterRefusal> {
        let live = |node: Option<NodeId>, name: &'static str| {
            node.filter(|&id| scene.contains(id))
                .ok_or(EnterRefusal::MissingCollaborator(name))
        };
        let center_node = live(self.body_center, "body_center")?;
        let spin_frame = live(self.spin_frame, "spin_frame")?;
        let surface = live(self.surface, "surface")?;
        let provider = self
            .body_info
            .as_ref()
            .ok_or(EnterRefusal::MissingCollaborator("body_info"))?;
        let center = scene
            .world_position(center_node)
            .ok_or(EnterRefusal::MissingCollaborator("body_center"))?;

        Ok(Resolved {
            spin_frame,
            surface,
            center,
            body: provider(),
        })
    }
}
