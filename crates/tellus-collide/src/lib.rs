//! Collision queries against triangulated body surfaces.
//!
//! [`TriMesh`] answers "cast a ray, get the nearest hit" in its own local
//! frame. [`BodyMeshBuilder`] produces the icosphere-based meshes bodies are
//! made of, optionally roughened with craters and mountains.

pub mod body_mesh;
pub mod ray;
pub mod trimesh;

pub use body_mesh::{BodyMeshBuilder, Relief};
pub use ray::{Ray, RayHit};
pub use trimesh::{TriMesh, TriMeshError};
