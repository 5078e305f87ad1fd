//! Indexed triangle mesh with nearest-hit ray casting.
//!
//! Casting is brute force over all triangles behind a bounding-sphere
//! rejection test. Body meshes are a few thousand triangles and are queried
//! a handful of times per frame, so no acceleration structure is kept.

use glam::Vec3;

use crate::ray::{Ray, RayHit};

/// Triangles whose determinant falls below this are treated as parallel to the ray.
const PARALLEL_EPSILON: f32 = 1e-9;
/// Slack on barycentric bounds so rays through shared edges and vertices
/// still hit one of the adjacent triangles.
const BARYCENTRIC_SLACK: f32 = 1e-6;
/// Hits closer than this to the origin are ignored.
const MIN_HIT_DISTANCE: f32 = 1e-6;

/// Errors raised when building a [`TriMesh`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriMeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    Empty,
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        /// Offending triangle.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

/// An indexed triangle mesh in its own local frame.
#[derive(Clone, Debug)]
pub struct TriMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounding_radius: f32,
}

impl TriMesh {
    /// Builds a mesh, validating every index.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, TriMeshError> {
        if triangles.is_empty() {
            return Err(TriMeshError::Empty);
        }
        let vertex_count = vertices.len();
        for (triangle, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(TriMeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        let bounding_radius = vertices.iter().map(|v| v.length()).fold(0.0_f32, f32::max);
        Ok(Self {
            vertices,
            triangles,
            bounding_radius,
        })
    }

    /// Largest vertex distance from the local origin.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Casts `ray` against every triangle and returns the nearest hit within
    /// `max_distance`. Triangles are two-sided, so rays leaving the body from
    /// its center hit the surface from the inside.
    #[must_use]
    pub fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        if !self.ray_touches_bounds(ray) {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for (index, tri) in self.triangles.iter().enumerate() {
            let a = self.vertices[tri[0] as usize];
            let b = self.vertices[tri[1] as usize];
            let c = self.vertices[tri[2] as usize];
            let Some(t) = intersect_triangle(ray, a, b, c) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|hit| hit.distance <= t) {
                continue;
            }
            best = Some(RayHit {
                point: ray.at(t),
                distance: t,
                triangle: index,
            });
        }
        best
    }

    /// Rejects rays that cannot reach the bounding sphere.
    fn ray_touches_bounds(&self, ray: &Ray) -> bool {
        let r = self.bounding_radius + BARYCENTRIC_SLACK;
        let to_center = -ray.origin;
        let along = to_center.dot(ray.direction);
        let closest_sq = to_center.length_squared() - along * along;
        if closest_sq > r * r {
            return false;
        }
        // Origin outside the sphere and pointing away from it.
        !(ray.origin.length_squared() > r * r && along < 0.0)
    }
}

/// Möller–Trumbore intersection. Returns the ray parameter of the hit.
fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(-BARYCENTRIC_SLACK..=1.0 + BARYCENTRIC_SLACK).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < -BARYCENTRIC_SLACK || u + v > 1.0 + BARYCENTRIC_SLACK {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > MIN_HIT_DISTANCE).then_some(t)
}
