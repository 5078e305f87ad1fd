//! Icosphere body meshes with optional crater/mountain relief.

use std::collections::HashMap;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use crate::trimesh::{TriMesh, TriMeshError};

/// Deepest a crater may cut, as a fraction of radius.
const MAX_DEPRESSION: f32 = 0.5;

/// Surface relief stamped onto the sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct Relief {
    /// Feature height/depth as a fraction of the body radius.
    pub amplitude: f32,
    /// Number of bowl-shaped craters.
    pub craters: u32,
    /// Number of gaussian mountains.
    pub mountains: u32,
    /// Seed for feature placement. The same seed always yields the same body.
    pub seed: u64,
}

#[derive(Clone, Copy, Debug)]
enum Feature {
    Crater { center: Vec3, angular_radius: f32 },
    Mountain { center: Vec3, angular_width: f32 },
}

/// Builds body collision meshes.
///
/// ```
/// use tellus_collide::{BodyMeshBuilder, Relief};
///
/// let mesh = BodyMeshBuilder::new(10.0)
///     .subdivisions(3)
///     .relief(Relief { amplitude: 0.05, craters: 4, mountains: 2, seed: 7 })
///     .build()
///     .unwrap();
/// assert!(mesh.bounding_radius() > 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct BodyMeshBuilder {
    radius: f32,
    subdivisions: u32,
    relief: Option<Relief>,
}

impl BodyMeshBuilder {
    /// A smooth sphere of `radius` at subdivision level 3.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            subdivisions: 3,
            relief: None,
        }
    }

    /// Sets the icosphere subdivision level. Each level quadruples the triangle count.
    #[must_use]
    pub fn subdivisions(mut self, subdivisions: u32) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Adds crater/mountain relief.
    #[must_use]
    pub fn relief(mut self, relief: Relief) -> Self {
        self.relief = Some(relief);
        self
    }

    /// Generates the mesh.
    pub fn build(&self) -> Result<TriMesh, TriMeshError> {
        let (mut positions, triangles) = icosphere(self.subdivisions);

        let features = self
            .relief
            .as_ref()
            .map(place_features)
            .unwrap_or_default();
        let amplitude = self.relief.as_ref().map_or(0.0, |r| r.amplitude);

        for p in &mut positions {
            let height = relief_height(*p, &features, amplitude).max(-MAX_DEPRESSION);
            *p *= self.radius * (1.0 + height);
        }

        debug!(
            radius = self.radius,
            triangles = triangles.len(),
            features = features.len(),
            "Built body mesh"
        );
        TriMesh::new(positions, triangles)
    }
}

/// Unit icosphere: vertices on the unit sphere and triangle indices.
fn icosphere(subdivisions: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|p| p.normalize())
    .collect();

    let mut triangles: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        triangles = subdivide(&mut positions, &triangles);
    }

    (positions, triangles)
}

/// Splits each triangle into four, pushing edge midpoints onto the unit sphere.
fn subdivide(positions: &mut Vec<Vec3>, triangles: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut out = Vec::with_capacity(triangles.len() * 4);
    for &[a, b, c] in triangles {
        let ab = midpoint(&mut cache, positions, a, b);
        let bc = midpoint(&mut cache, positions, b, c);
        let ca = midpoint(&mut cache, positions, c, a);
        out.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
    }
    out
}

/// Index of the (shared) midpoint vertex of edge `a`-`b`.
fn midpoint(
    cache: &mut HashMap<(u32, u32), u32>,
    positions: &mut Vec<Vec3>,
    a: u32,
    b: u32,
) -> u32 {
    let key = (a.min(b), a.max(b));
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = (positions[a as usize] + positions[b as usize]).normalize();
    positions.push(mid);
    let index = (positions.len() - 1) as u32;
    cache.insert(key, index);
    index
}

fn place_features(relief: &Relief) -> Vec<Feature> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(relief.seed);
    let mut features = Vec::with_capacity((relief.craters + relief.mountains) as usize);
    for _ in 0..relief.craters {
        features.push(Feature::Crater {
            center: random_unit(&mut rng),
            angular_radius: rng.gen_range(0.08_f32..0.3),
        });
    }
    for _ in 0..relief.mountains {
        features.push(Feature::Mountain {
            center: random_unit(&mut rng),
            angular_width: rng.gen_range(0.1_f32..0.35),
        });
    }
    features
}

/// Uniform direction by rejection sampling the unit ball.
fn random_unit(rng: &mut Xoshiro256StarStar) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0_f32..1.0),
            rng.gen_range(-1.0_f32..1.0),
            rng.gen_range(-1.0_f32..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Relative height offset at unit direction `dir`.
fn relief_height(dir: Vec3, features: &[Feature], amplitude: f32) -> f32 {
    features
        .iter()
        .map(|feature| match *feature {
            Feature::Crater {
                center,
                angular_radius,
            } => {
                let d = dir.angle_between(center) / angular_radius;
                if d < 1.0 {
                    // Bowl
                    -amplitude * (1.0 - d * d)
                } else if d < 1.3 {
                    // Raised rim
                    0.3 * amplitude * (1.0 - (d - 1.0) / 0.3)
                } else {
                    0.0
                }
            }
            Feature::Mountain {
                center,
                angular_width,
            } => {
                let d = dir.angle_between(center) / angular_width;
                amplitude * (-d * d).exp()
            }
        })
        .sum()
}
