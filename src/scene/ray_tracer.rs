//! Ray queries used by acoustic propagation code.
//!
//! Propagation algorithms trace rays against the room (to find the next
//! reflection) and against the listener spheres (to find which listener a
//! ray path reaches). This module exposes both queries behind one trait so
//! propagation code can run against any tracer, the [`SceneManager`] being
//! the default one.

use crate::accel::{Ray, RayHit};
use crate::math::Vec3;

use super::manager::SceneManager;

/// Result of a ray traced against the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticRayHit {
    /// Whether the ray hit any geometry
    pub hit: bool,

    /// Distance from ray origin to hit point (in meters)
    ///
    /// Only meaningful if `hit` is true
    pub distance: f32,

    /// Index of the hit triangle in the mesh passed to `build_scene()`
    ///
    /// Only meaningful if `hit` is true
    pub triangle_index: u32,

    /// Index of the reflection kernel associated with the hit triangle
    ///
    /// `None` on a miss, or if the triangle has no kernel
    pub reflection_kernel_index: Option<usize>,

    /// Surface normal at the hit point (normalized)
    ///
    /// Follows the right-handed winding of the input triangles.
    /// Only meaningful if `hit` is true
    pub normal: Vec3,
}

impl AcousticRayHit {
    /// Creates a miss result (no hit)
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: 0.0,
            triangle_index: 0,
            reflection_kernel_index: None,
            normal: Vec3::ZERO,
        }
    }

    /// Creates a hit result
    pub fn new(
        distance: f32,
        triangle_index: u32,
        reflection_kernel_index: Option<usize>,
        normal: Vec3,
    ) -> Self {
        Self {
            hit: true,
            distance,
            triangle_index,
            reflection_kernel_index,
            normal,
        }
    }
}

impl Default for AcousticRayHit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Result of a ray traced against the listener spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerHit {
    /// Index of the listener in the list passed to `build_listener_scene()`
    pub listener_index: usize,

    /// Distance from ray origin to the sphere surface (in meters)
    pub distance: f32,
}

/// Ray queries against the acoustic scene.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: propagation code usually traces
/// from several worker threads, each one ray at a time.
pub trait RayTracer: Send + Sync {
    /// Traces a ray against the room geometry.
    ///
    /// # Parameters
    ///
    /// * `origin` - Ray starting position in world space (meters)
    /// * `direction` - Ray direction, normalized by the tracer
    /// * `max_distance` - Maximum ray distance to test (meters)
    ///
    /// # Returns
    ///
    /// The closest hit, or a miss if nothing was hit
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> AcousticRayHit;

    /// Traces a ray against the listener spheres.
    ///
    /// Default implementation finds nothing.
    fn cast_listener_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<ListenerHit> {
        None
    }
}

impl RayTracer for SceneManager {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> AcousticRayHit {
        let Some(scene) = self.world_scene() else {
            return AcousticRayHit::miss();
        };

        let direction = direction.normalize_or_zero();

        if direction == Vec3::ZERO {
            return AcousticRayHit::miss();
        }

        let mut ray_hit = RayHit::new(Ray::with_range(origin, direction, 0.0, max_distance));
        scene.intersect(&mut ray_hit);

        if !ray_hit.is_hit() {
            return AcousticRayHit::miss();
        }

        let triangle_index = ray_hit.hit.prim_id;

        AcousticRayHit::new(
            ray_hit.ray.t_far,
            triangle_index,
            self.reflection_kernel_index_for_triangle(triangle_index),
            ray_hit.hit.ng.normalize_or_zero(),
        )
    }

    fn cast_listener_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<ListenerHit> {
        let scene = self.listener_scene()?;
        let direction = direction.normalize_or_zero();

        if direction == Vec3::ZERO {
            return None;
        }

        let mut ray_hit = RayHit::new(Ray::with_range(origin, direction, 0.0, max_distance));
        scene.intersect(&mut ray_hit);

        if !ray_hit.is_hit() {
            return None;
        }

        Some(ListenerHit {
            listener_index: self.listener_index_for_geometry(ray_hit.hit.geom_id)?,
            distance: ray_hit.ray.t_far,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneManagerConfig;
    use crate::geometry::{Triangle, Vertex};
    use crate::scene::{AcousticListener, ReflectionKernel};

    #[test]
    fn test_ray_hit_miss() {
        let miss = AcousticRayHit::miss();
        assert!(!miss.hit);
        assert_eq!(miss.distance, 0.0);
        assert_eq!(miss.reflection_kernel_index, None);
    }

    #[test]
    fn test_ray_hit_new() {
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let hit = AcousticRayHit::new(5.0, 2, Some(1), normal);
        assert!(hit.hit);
        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.triangle_index, 2);
        assert_eq!(hit.reflection_kernel_index, Some(1));
        assert_eq!(hit.normal, normal);
    }

    // Simple test ray tracer that always returns a miss
    struct NoopTracer;

    impl RayTracer for NoopTracer {
        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> AcousticRayHit {
            AcousticRayHit::miss()
        }
    }

    #[test]
    fn test_noop_tracer() {
        let tracer = NoopTracer;
        let origin = Vec3::new(0.0, 0.0, 0.0);
        let direction = Vec3::new(0.0, 0.0, 1.0);
        assert!(!tracer.cast_ray(origin, direction, 100.0).hit);
        assert_eq!(tracer.cast_listener_ray(origin, direction, 100.0), None);
    }

    #[test]
    fn test_scene_manager_tracer() {
        let mut manager = SceneManager::new(SceneManagerConfig::default()).unwrap();

        // Floor at y = 0, facing up
        let vertices = [
            Vertex::new(-10.0, 0.0, -10.0),
            Vertex::new(10.0, 0.0, -10.0),
            Vertex::new(10.0, 0.0, 10.0),
            Vertex::new(-10.0, 0.0, 10.0),
        ];
        let triangles = [Triangle::new(0, 2, 1), Triangle::new(0, 3, 2)];

        manager.build_scene(&vertices, &triangles).unwrap();
        manager
            .associate_reflection_kernel_to_triangles(&ReflectionKernel::CARPET, [0, 1])
            .unwrap();
        manager
            .build_listener_scene(&[AcousticListener::new(Vec3::new(0.0, 1.0, 3.0))], 0.5)
            .unwrap();

        let hit = manager.cast_ray(Vec3::new(1.0, 2.0, -1.0), Vec3::new(0.0, -4.0, 0.0), 100.0);
        assert!(hit.hit);
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.reflection_kernel_index, Some(0));
        assert!((hit.normal - Vec3::Y).length() < 1e-5);

        assert!(!manager.cast_ray(Vec3::new(1.0, 2.0, -1.0), Vec3::Y, 100.0).hit);
        assert!(!manager.cast_ray(Vec3::new(1.0, 2.0, -1.0), -Vec3::Y, 1.0).hit);

        let listener = manager
            .cast_listener_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 100.0)
            .unwrap();
        assert_eq!(listener.listener_index, 0);
        assert!((listener.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_uncommitted_scenes_miss() {
        let manager = SceneManager::new(SceneManagerConfig::default()).unwrap();
        assert!(!manager.cast_ray(Vec3::ZERO, Vec3::X, 10.0).hit);
        assert_eq!(manager.cast_listener_ray(Vec3::ZERO, Vec3::X, 10.0), None);
    }
}
