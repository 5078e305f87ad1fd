//! Scene graph, camera and body spin for Tellus.
//!
//! Nodes live in a generational arena; parents compose their transforms onto
//! their children. Holders of a [`NodeId`] never own the node, and a stale id
//! (despawned node) is detectable through [`SceneGraph::contains`].

pub mod camera;
pub mod graph;
pub mod spin;

pub use camera::Camera;
pub use graph::{NodeId, SceneGraph, Transform};
pub use spin::Spin;
