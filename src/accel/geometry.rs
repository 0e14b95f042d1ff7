//! Geometry kinds understood by the acceleration structure.
//!
//! Two kinds exist: built-in triangle meshes, whose vertex and index buffers
//! are filled by the caller, and user geometries, whose primitives are only
//! known through a [`BoundsFunction`] and an [`IntersectFunction`] installed
//! on the geometry together with the per-geometry user data they operate on.

use std::any::Any;

use crate::error::{AcousticSceneError, Result};
use crate::math::{Bounds, Vec3};

use super::GeometryId;
use super::ray::RayHit;

/// Opaque per-geometry data handed to user geometry callbacks.
pub type UserData = dyn Any + Send + Sync;

/// Lane value marking an active ray in [`IntersectFunctionNArguments::valid`].
pub const VALID_RAY: i32 = -1;

/// Lane value marking an inactive ray in [`IntersectFunctionNArguments::valid`].
pub const INVALID_RAY: i32 = 0;

/// Arguments of a bounds callback.
pub struct BoundsFunctionArguments<'a> {
    /// The user data attached to the geometry
    pub user_data: &'a UserData,
    /// Index of the primitive inside the geometry
    pub prim_id: u32,
    /// Time step to compute bounds for
    pub time_step: u32,
    /// Output bounds
    pub bounds_o: &'a mut Bounds,
}

/// Arguments of an intersection callback.
///
/// `valid`, and the ray lanes behind `ray_hit`, hold `n` entries. Scenes in
/// this crate always trace single rays, so `n` is 1.
pub struct IntersectFunctionNArguments<'a> {
    /// Per-lane mask, [`VALID_RAY`] for active lanes
    pub valid: &'a [i32],
    /// The user data attached to the geometry
    pub user_data: &'a UserData,
    /// Ray and hit record to update on a closer hit
    pub ray_hit: &'a mut RayHit,
    /// Number of lanes
    pub n: u32,
    /// Index of the primitive inside the geometry
    pub prim_id: u32,
    /// Id of the geometry inside the scene
    pub geom_id: GeometryId,
}

/// Computes the bounds of one user primitive.
pub trait BoundsFunction: Send + Sync {
    fn bounds(&self, args: BoundsFunctionArguments<'_>);
}

/// Intersects a ray with one user primitive.
///
/// Implementations shrink `ray_hit.ray.t_far` and fill `ray_hit.hit` when
/// they find a hit inside `(t_near, t_far)`, and leave the record untouched
/// otherwise.
pub trait IntersectFunction: Send + Sync {
    fn intersect(&self, args: IntersectFunctionNArguments<'_>);
}

impl<F> BoundsFunction for F
where
    F: Fn(BoundsFunctionArguments<'_>) + Send + Sync,
{
    fn bounds(&self, args: BoundsFunctionArguments<'_>) {
        self(args)
    }
}

impl<F> IntersectFunction for F
where
    F: Fn(IntersectFunctionNArguments<'_>) + Send + Sync,
{
    fn intersect(&self, args: IntersectFunctionNArguments<'_>) {
        self(args)
    }
}

/// Vertex record of a triangle mesh's vertex buffer.
///
/// The fourth float pads each vertex to 16 bytes and is never read.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BufferVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub pad: f32,
}

impl BufferVertex {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Built-in triangle mesh.
///
/// Triangles are front-facing when their vertices appear clockwise, i.e. the
/// geometric normal of `[v0, v1, v2]` is `(v2 - v0) × (v1 - v0)`.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    vertices: Vec<BufferVertex>,
    indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a zeroed vertex buffer of `count` vertices and returns it
    /// for the caller to fill.
    pub fn set_new_vertex_buffer(&mut self, count: usize) -> &mut [BufferVertex] {
        self.vertices = vec![BufferVertex::default(); count];
        &mut self.vertices
    }

    /// Allocates a zeroed index buffer of `count` triangles and returns it
    /// for the caller to fill.
    pub fn set_new_index_buffer(&mut self, count: usize) -> &mut [[u32; 3]] {
        self.indices = vec![[0; 3]; count];
        &mut self.indices
    }

    pub fn vertex_buffer(&self) -> &[BufferVertex] {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    fn corners(&self, prim_id: u32) -> [Vec3; 3] {
        let [a, b, c] = self.indices[prim_id as usize];

        [
            self.vertices[a as usize].position(),
            self.vertices[b as usize].position(),
            self.vertices[c as usize].position(),
        ]
    }

    fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();

        match self
            .indices
            .iter()
            .flatten()
            .find(|&&index| index as usize >= vertex_count)
        {
            Some(&index) => Err(AcousticSceneError::InvalidVertexIndex {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    fn primitive_bounds(&self, prim_id: u32) -> Bounds {
        Bounds::from_points(self.corners(prim_id))
    }

    /// Möller–Trumbore, no culling.
    fn intersect(&self, geom_id: GeometryId, prim_id: u32, ray_hit: &mut RayHit) -> bool {
        let [v0, v1, v2] = self.corners(prim_id);
        let ray = &ray_hit.ray;

        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let p = ray.direction.cross(e2);
        let det = e1.dot(p);

        if det.abs() < f32::EPSILON * e1.length_squared().max(e2.length_squared()) {
            return false;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - v0;
        let u = s.dot(p) * inv_det;

        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(e1);
        let v = ray.direction.dot(q) * inv_det;

        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = e2.dot(q) * inv_det;

        if t <= ray.t_near || t >= ray.t_far {
            return false;
        }

        ray_hit.ray.t_far = t;
        ray_hit.hit.ng = e2.cross(e1);
        ray_hit.hit.u = u;
        ray_hit.hit.v = v;
        ray_hit.hit.prim_id = prim_id;
        ray_hit.hit.geom_id = geom_id;

        true
    }
}

/// Geometry made of caller-defined primitives.
///
/// The geometry exclusively owns its user data; it is dropped together with
/// the geometry (and so with the scene the geometry is attached to).
pub struct UserGeometry {
    primitive_count: u32,
    time_step_count: u32,
    user_data: Option<Box<UserData>>,
    bounds_function: Option<Box<dyn BoundsFunction>>,
    intersect_function: Option<Box<dyn IntersectFunction>>,
}

impl UserGeometry {
    pub fn new(primitive_count: u32) -> Self {
        Self {
            primitive_count,
            time_step_count: 1,
            user_data: None,
            bounds_function: None,
            intersect_function: None,
        }
    }

    pub fn set_time_step_count(&mut self, count: u32) {
        self.time_step_count = count;
    }

    /// Attaches user data, taking ownership of it.
    pub fn set_user_data<T>(&mut self, user_data: T)
    where
        T: Any + Send + Sync,
    {
        self.user_data = Some(Box::new(user_data));
    }

    pub fn set_bounds_function(&mut self, function: impl BoundsFunction + 'static) {
        self.bounds_function = Some(Box::new(function));
    }

    pub fn set_intersect_function(&mut self, function: impl IntersectFunction + 'static) {
        self.intersect_function = Some(Box::new(function));
    }

    pub fn primitive_count(&self) -> u32 {
        self.primitive_count
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_deref()
    }

    fn user_data_or_unit(&self) -> &UserData {
        self.user_data.as_deref().unwrap_or(&())
    }

    fn validate(&self, geometry_id: GeometryId) -> Result<()> {
        if self.time_step_count != 1 {
            return Err(AcousticSceneError::UnsupportedTimeStepCount {
                geometry_id,
                count: self.time_step_count,
            });
        }

        if self.bounds_function.is_none() {
            return Err(AcousticSceneError::MissingCallback {
                geometry_id,
                callback: "bounds",
            });
        }

        if self.intersect_function.is_none() {
            return Err(AcousticSceneError::MissingCallback {
                geometry_id,
                callback: "intersect",
            });
        }

        Ok(())
    }

    fn primitive_bounds(&self, prim_id: u32) -> Bounds {
        let mut bounds = Bounds::default();

        if let Some(function) = &self.bounds_function {
            function.bounds(BoundsFunctionArguments {
                user_data: self.user_data_or_unit(),
                prim_id,
                time_step: 0,
                bounds_o: &mut bounds,
            });
        }

        bounds
    }

    fn intersect(&self, geom_id: GeometryId, prim_id: u32, ray_hit: &mut RayHit) -> bool {
        let Some(function) = &self.intersect_function else {
            return false;
        };

        let t_far = ray_hit.ray.t_far;

        function.intersect(IntersectFunctionNArguments {
            valid: &[VALID_RAY],
            user_data: self.user_data_or_unit(),
            ray_hit: &mut *ray_hit,
            n: 1,
            prim_id,
            geom_id,
        });

        ray_hit.ray.t_far < t_far
    }
}

impl std::fmt::Debug for UserGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserGeometry")
            .field("primitive_count", &self.primitive_count)
            .field("time_step_count", &self.time_step_count)
            .field("has_user_data", &self.user_data.is_some())
            .field("has_bounds_function", &self.bounds_function.is_some())
            .field("has_intersect_function", &self.intersect_function.is_some())
            .finish()
    }
}

/// A geometry attached to a [`Scene`](super::Scene).
#[derive(Debug)]
pub enum Geometry {
    TriangleMesh(TriangleMesh),
    User(UserGeometry),
}

impl Geometry {
    pub fn primitive_count(&self) -> usize {
        match self {
            Geometry::TriangleMesh(mesh) => mesh.triangle_count(),
            Geometry::User(user) => user.primitive_count() as usize,
        }
    }

    pub fn as_triangle_mesh(&self) -> Option<&TriangleMesh> {
        match self {
            Geometry::TriangleMesh(mesh) => Some(mesh),
            Geometry::User(_) => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserGeometry> {
        match self {
            Geometry::TriangleMesh(_) => None,
            Geometry::User(user) => Some(user),
        }
    }

    pub(crate) fn validate(&self, geometry_id: GeometryId) -> Result<()> {
        match self {
            Geometry::TriangleMesh(mesh) => mesh.validate(),
            Geometry::User(user) => user.validate(geometry_id),
        }
    }

    pub(crate) fn primitive_bounds(&self, prim_id: u32) -> Bounds {
        match self {
            Geometry::TriangleMesh(mesh) => mesh.primitive_bounds(prim_id),
            Geometry::User(user) => user.primitive_bounds(prim_id),
        }
    }

    /// Returns whether a closer hit was recorded.
    pub(crate) fn intersect(&self, geom_id: GeometryId, prim_id: u32, ray_hit: &mut RayHit) -> bool {
        match self {
            Geometry::TriangleMesh(mesh) => mesh.intersect(geom_id, prim_id, ray_hit),
            Geometry::User(user) => user.intersect(geom_id, prim_id, ray_hit),
        }
    }
}

impl From<TriangleMesh> for Geometry {
    fn from(mesh: TriangleMesh) -> Self {
        Geometry::TriangleMesh(mesh)
    }
}

impl From<UserGeometry> for Geometry {
    fn from(user: UserGeometry) -> Self {
        Geometry::User(user)
    }
}
