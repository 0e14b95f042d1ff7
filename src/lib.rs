//! # PetalSonic Acoustic Scene
//!
//! Ray-traceable scene representation for geometrical-acoustics simulation.
//!
//! The crate turns a generic acoustic scene description (a triangle mesh of the
//! room, reflection kernels attached to its triangles, and a list of listener
//! positions) into two query-ready acceleration structures:
//!
//! - the **world scene**, a BVH over the room triangles, and
//! - the **listener scene**, a BVH over one detection sphere per listener,
//!   rebuilt from scratch whenever listeners move.
//!
//! ## Quick Start
//!
//! ```
//! use petalsonic_acoustic_scene::*;
//!
//! let mut manager = SceneManager::new(SceneManagerConfig::default())?;
//!
//! // A single wall triangle in the z = 0 plane
//! let vertices = [
//!     Vertex::new(0.0, 0.0, 0.0),
//!     Vertex::new(4.0, 0.0, 0.0),
//!     Vertex::new(0.0, 4.0, 0.0),
//! ];
//! manager.build_scene(&vertices, &[Triangle::new(0, 1, 2)])?;
//! manager.associate_reflection_kernel_to_triangles(&ReflectionKernel::BRICK, [0])?;
//!
//! // One listener with a 0.5 m detection sphere
//! manager.build_listener_scene(&[AcousticListener::new(Vec3::new(5.0, 0.0, 0.0))], 0.5)?;
//!
//! // Trace against the wall...
//! let hit = manager.cast_ray(Vec3::new(1.0, 1.0, 2.0), -Vec3::Z, 100.0);
//! assert!(hit.hit);
//! assert_eq!(manager.reflection_kernel_for_triangle(hit.triangle_index), Some(&ReflectionKernel::BRICK));
//!
//! // ...and against the listeners
//! let listener = manager.cast_listener_ray(Vec3::ZERO, Vec3::X, 100.0).unwrap();
//! assert_eq!(listener.listener_index, 0);
//! # Ok::<(), AcousticSceneError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`SceneManager`]**: Builds and owns the world and listener scenes
//! - **[`ReflectionKernel`]**: Acoustic reflection properties of a surface
//! - **[`RayTracer`]**: Ray queries used by propagation code
//! - **[`accel`]**: The acceleration structure itself (device, scenes, geometries, callbacks)
//! - **[`geometry`]**: Input mesh types and the sphere primitive used for listeners
//!
//! ## Threading
//!
//! Building scenes requires `&mut SceneManager` and must not overlap with ray
//! queries. Committed scenes are read-only and can be traced from many threads
//! at once, one ray per call.

pub mod accel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod scene;

pub use config::{DeviceConfig, SceneManagerConfig};
pub use error::AcousticSceneError;
pub use geometry::{Triangle, Vertex};
pub use math::Vec3;
pub use scene::{
    AcousticListener, AcousticRayHit, ListenerHit, RayTracer, ReflectionKernel, SceneManager,
};
