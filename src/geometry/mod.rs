//! Input geometry and the sphere primitive used for listeners.

mod adapters;
mod sphere;

pub use adapters::{SphereArray, SphereBoundsAdapter, SphereIntersectAdapter};
pub use sphere::{Sphere, sphere_bounds, sphere_intersection};

use crate::math::Vec3;

/// Vertex of the room mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vertex> for Vec3 {
    fn from(v: Vertex) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Triangle of the room mesh, as indices into the vertex buffer.
///
/// Vertices are counter-clockwise when seen from the front face
/// (right-handed convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl Triangle {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self { v0, v1, v2 }
    }
}
