//! Ray and hit records passed through scene queries and geometry callbacks.

use crate::math::Vec3;

use super::GeometryId;

/// Geometry id stored in a [`Hit`] that has not hit anything.
pub const INVALID_GEOMETRY_ID: GeometryId = GeometryId::MAX;

/// Primitive id stored in a [`Hit`] that has not hit anything.
pub const INVALID_PRIMITIVE_ID: u32 = u32::MAX;

/// A single ray, valid over the open interval `(t_near, t_far)`.
///
/// `t_far` shrinks as closer hits are found; callers read it back as the hit
/// distance. Directions don't have to be normalized, distances are measured
/// in multiples of the direction's length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub t_near: f32,
    pub direction: Vec3,
    pub t_far: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            t_near: 0.0,
            direction,
            t_far: f32::INFINITY,
        }
    }

    pub fn with_range(origin: Vec3, direction: Vec3, t_near: f32, t_far: f32) -> Self {
        Self {
            origin,
            t_near,
            direction,
            t_far,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Hit information written by the closest intersection found so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Unnormalized geometric normal
    pub ng: Vec3,
    pub u: f32,
    pub v: f32,
    pub prim_id: u32,
    pub geom_id: GeometryId,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            ng: Vec3::ZERO,
            u: 0.0,
            v: 0.0,
            prim_id: INVALID_PRIMITIVE_ID,
            geom_id: INVALID_GEOMETRY_ID,
        }
    }
}

/// Combined ray/hit record, mutated in place by `Scene::intersect()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub ray: Ray,
    pub hit: Hit,
}

impl RayHit {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            hit: Hit::default(),
        }
    }

    /// Whether any geometry has been hit.
    pub fn is_hit(&self) -> bool {
        self.hit.geom_id != INVALID_GEOMETRY_ID
    }
}
