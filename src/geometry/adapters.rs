//! Callbacks that let the acceleration structure trace listener spheres.
//!
//! A user geometry carrying spheres stores them as `Box<[Sphere]>` user data,
//! indexed by primitive id. These adapters are the only place that knows
//! about that layout.

use crate::accel::{
    BoundsFunction, BoundsFunctionArguments, IntersectFunction, IntersectFunctionNArguments,
    UserData, VALID_RAY,
};

use super::sphere::{Sphere, sphere_bounds, sphere_intersection};

/// User data layout expected by the sphere adapters.
pub type SphereArray = Box<[Sphere]>;

fn resolve_sphere(user_data: &UserData, prim_id: u32) -> &Sphere {
    let spheres = user_data
        .downcast_ref::<SphereArray>()
        .expect("sphere geometry without sphere user data");

    &spheres[prim_id as usize]
}

/// Bounds callback for sphere geometries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereBoundsAdapter;

impl BoundsFunction for SphereBoundsAdapter {
    fn bounds(&self, args: BoundsFunctionArguments<'_>) {
        // Spheres are static, there is a single time step.
        assert_eq!(args.time_step, 0, "sphere geometry has a single time step");

        let sphere = resolve_sphere(args.user_data, args.prim_id);
        *args.bounds_o = sphere_bounds(sphere);
    }
}

/// Intersection callback for sphere geometries.
///
/// Only single rays are supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereIntersectAdapter;

impl IntersectFunction for SphereIntersectAdapter {
    fn intersect(&self, args: IntersectFunctionNArguments<'_>) {
        assert_eq!(args.n, 1, "sphere intersection expects single rays");

        if args.valid[0] != VALID_RAY {
            return;
        }

        let sphere = resolve_sphere(args.user_data, args.prim_id);
        sphere_intersection(sphere, args.prim_id, args.ray_hit);
    }
}
