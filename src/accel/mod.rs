//! CPU acceleration structure used to trace rays against acoustic scenes.
//!
//! A [`Device`] is the shared context; [`Scene`]s built from it hold
//! [`Geometry`] objects (built-in triangle meshes or user geometries driven by
//! caller-supplied callbacks) and are made query-ready by [`Scene::commit`].

mod bvh;
mod device;
mod geometry;
mod ray;
mod scene;

pub use device::Device;
pub use geometry::{
    BoundsFunction, BoundsFunctionArguments, BufferVertex, Geometry, INVALID_RAY,
    IntersectFunction, IntersectFunctionNArguments, TriangleMesh, UserData, UserGeometry,
    VALID_RAY,
};
pub use ray::{Hit, INVALID_GEOMETRY_ID, INVALID_PRIMITIVE_ID, Ray, RayHit};
pub use scene::{Scene, SceneState};

/// Id of a geometry.
///
/// Ids are handed out by the [`Device`] and never reused, so an id from a
/// released scene can't be confused with one from its replacement.
pub type GeometryId = u64;
