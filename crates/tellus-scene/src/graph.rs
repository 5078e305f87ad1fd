//! Arena scene graph with parent/child transform composition.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use tellus_collide::TriMesh;
use tracing::{debug, warn};

/// Handle to a node in a [`SceneGraph`].
///
/// Handles are generational: once a node is despawned, its old handle stops
/// resolving even if the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Local transform of a node relative to its parent.
///
/// Scale is uniform, so directions survive the round trip through
/// [`SceneGraph::world_to_local`] up to length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation in the parent frame.
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// A pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    collider: Option<Arc<TriMesh>>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of transform nodes.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SceneGraph {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root node.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        let node = Node {
            name: name.into(),
            transform,
            parent: None,
            children: Vec::new(),
            collider: None,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Adds a node under `parent`. Returns `None` if `parent` is gone.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.spawn(name, transform);
        self.attach(id, parent);
        Some(id)
    }

    /// Removes a node. Its children are detached and become roots.
    pub fn despawn(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        true
    }

    /// Whether `id` still refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Debug name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Parent of a node, if it has one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a node (empty for stale ids).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Makes `child` a child of `parent`, keeping its local transform.
    ///
    /// Fails if either node is gone or the link would create a cycle.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> bool {
        if !self.contains(child) || !self.contains(parent) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            warn!(
                child = self.name(child),
                parent = self.name(parent),
                "Refusing attach that would create a cycle"
            );
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        debug!(
            child = self.name(child),
            parent = self.name(parent),
            "Attached node"
        );
        true
    }

    /// Unlinks `child` from its parent, keeping its local transform.
    /// Returns `false` if it had no parent.
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Local transform of a node.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).map(|n| &n.transform)
    }

    /// Replaces a node's local transform.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        self.node_mut(id)
            .map(|n| n.transform = transform)
            .is_some()
    }

    /// Sets a node's local translation.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> bool {
        self.node_mut(id)
            .map(|n| n.transform.translation = translation)
            .is_some()
    }

    /// Sets a node's local rotation.
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        self.node_mut(id)
            .map(|n| n.transform.rotation = rotation)
            .is_some()
    }

    /// Sets a node's uniform scale.
    pub fn set_scale(&mut self, id: NodeId, scale: f32) -> bool {
        self.node_mut(id)
            .map(|n| n.transform.scale = scale)
            .is_some()
    }

    /// Attaches, replaces or clears the collision mesh of a node.
    pub fn set_collider(&mut self, id: NodeId, collider: Option<Arc<TriMesh>>) -> bool {
        self.node_mut(id).map(|n| n.collider = collider).is_some()
    }

    /// Collision mesh of a node, expressed in the node's local frame.
    #[must_use]
    pub fn collider(&self, id: NodeId) -> Option<&Arc<TriMesh>> {
        self.node(id).and_then(|n| n.collider.as_ref())
    }

    /// Node-local to world matrix, composing every ancestor.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// World-space origin of a node.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Product of the uniform scales from the root down to `id`.
    #[must_use]
    pub fn world_scale(&self, id: NodeId) -> Option<f32> {
        let mut node = self.node(id)?;
        let mut scale = node.transform.scale;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            scale *= node.transform.scale;
        }
        Some(scale)
    }

    /// Converts a point in `frame`'s local space to world space.
    #[must_use]
    pub fn local_to_world(&self, frame: NodeId, point: Vec3) -> Option<Vec3> {
        self.world_matrix(frame).map(|m| m.transform_point3(point))
    }

    /// Converts a world-space point into `frame`'s local space.
    #[must_use]
    pub fn world_to_local(&self, frame: NodeId, point: Vec3) -> Option<Vec3> {
        self.world_matrix(frame)
            .map(|m| m.inverse().transform_point3(point))
    }

    /// Converts a world-space direction into `frame`'s local space.
    /// The result is scaled by the inverse world scale.
    #[must_use]
    pub fn world_direction_to_local(&self, frame: NodeId, direction: Vec3) -> Option<Vec3> {
        self.world_matrix(frame)
            .map(|m| m.inverse().transform_vector3(direction))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
