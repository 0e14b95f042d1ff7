//! Sphere primitive math: bounds and analytic ray intersection.

use crate::accel::{GeometryId, INVALID_GEOMETRY_ID, RayHit};
use crate::math::{Bounds, Vec3};

/// Detection sphere used as a custom primitive.
///
/// Aligned to 64 bytes, as required for records attached to user geometries.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: [f32; 3],
    pub radius: f32,
    /// Id of the geometry the sphere is attached to
    pub geometry_id: GeometryId,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center: center.to_array(),
            radius,
            geometry_id: INVALID_GEOMETRY_ID,
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }
}

/// Axis-aligned box tightly containing the sphere.
pub fn sphere_bounds(sphere: &Sphere) -> Bounds {
    let center = sphere.center();
    let radius = Vec3::splat(sphere.radius);

    Bounds::new(center - radius, center + radius)
}

/// Intersects the ray with the sphere, which is primitive `prim_id` of its
/// geometry.
///
/// Accepts the nearest root strictly inside `(t_near, t_far)`. On a hit,
/// writes the distance into `t_far` and fills the hit record with the
/// sphere's geometry id, `prim_id` and the outward (unnormalized) normal. On
/// a miss the record is left untouched.
///
/// A ray starting on the surface never hits the sphere at its own origin:
/// pointing outward it misses, pointing inward it hits the far side.
pub fn sphere_intersection(sphere: &Sphere, prim_id: u32, ray_hit: &mut RayHit) -> bool {
    let ray = &ray_hit.ray;
    let center_to_origin = ray.origin - sphere.center();

    let a = ray.direction.length_squared();
    let half_b = center_to_origin.dot(ray.direction);
    let c = center_to_origin.length_squared() - sphere.radius * sphere.radius;

    if a == 0.0 {
        return false;
    }

    let (t0, t1) = if starts_on_surface(sphere, ray.origin, c) {
        // One root is the origin itself, only the other one can be hit.
        if half_b >= 0.0 {
            return false;
        }

        let t = -2.0 * half_b / a;
        (t, t)
    } else {
        match solve_quadratic(a, half_b, c) {
            Some(roots) => roots,
            None => return false,
        }
    };

    let t = if t0 > ray.t_near && t0 < ray.t_far {
        t0
    } else if t1 > ray.t_near && t1 < ray.t_far {
        t1
    } else {
        return false;
    };

    let normal = ray.at(t) - sphere.center();

    ray_hit.ray.t_far = t;
    ray_hit.hit.ng = normal;
    ray_hit.hit.u = 0.0;
    ray_hit.hit.v = 0.0;
    ray_hit.hit.prim_id = prim_id;
    ray_hit.hit.geom_id = sphere.geometry_id;

    true
}

/// Whether `|origin - center|² - radius²` (passed in as `c`) is zero up to
/// the rounding of the inputs.
///
/// A point computed as `center + radius * n` carries an error relative to
/// the magnitude of its coordinates, which `c` amplifies by about `2·radius`.
fn starts_on_surface(sphere: &Sphere, origin: Vec3, c: f32) -> bool {
    let magnitude = origin.abs().max_element().max(sphere.center().abs().max_element());
    let tolerance = 64.0 * f32::EPSILON * sphere.radius * (sphere.radius + magnitude);

    c.abs() <= tolerance
}

/// Real roots of `a·t² + 2·half_b·t + c`, in ascending order.
///
/// Uses the cancellation-free form, so a root close to zero keeps its
/// precision.
fn solve_quadratic(a: f32, half_b: f32, c: f32) -> Option<(f32, f32)> {
    let discriminant = half_b * half_b - a * c;

    if discriminant < 0.0 {
        return None;
    }

    let q = -(half_b + half_b.signum() * discriminant.sqrt());
    let (r0, r1) = if q == 0.0 { (0.0, 0.0) } else { (q / a, c / q) };

    Some((r0.min(r1), r0.max(r1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::Ray;

    fn unit_sphere(geometry_id: GeometryId) -> Sphere {
        Sphere {
            geometry_id,
            ..Sphere::new(Vec3::ZERO, 1.0)
        }
    }

    #[test]
    fn test_sphere_layout() {
        assert_eq!(std::mem::align_of::<Sphere>(), 64);
        assert_eq!(std::mem::size_of::<Sphere>(), 64);
    }

    #[test]
    fn test_sphere_bounds() {
        let sphere = Sphere::new(Vec3::new(1.0, -2.0, 3.0), 0.5);
        let bounds = sphere_bounds(&sphere);

        assert_eq!(bounds.min, Vec3::new(0.5, -2.5, 2.5));
        assert_eq!(bounds.max, Vec3::new(1.5, -1.5, 3.5));
    }

    #[test]
    fn test_hit_from_outside() {
        let sphere = Sphere {
            geometry_id: 3,
            ..Sphere::new(Vec3::new(5.0, 0.0, 0.0), 0.5)
        };
        let mut ray_hit = RayHit::new(Ray::new(Vec3::ZERO, Vec3::X));

        assert!(sphere_intersection(&sphere, 4, &mut ray_hit));
        assert!((ray_hit.ray.t_far - 4.5).abs() < 1e-5);
        assert_eq!(ray_hit.hit.geom_id, 3);
        assert_eq!(ray_hit.hit.prim_id, 4);
        assert!(ray_hit.hit.ng.x < 0.0);
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let sphere = unit_sphere(0);
        let mut ray_hit = RayHit::new(Ray::new(Vec3::ZERO, Vec3::Y));

        assert!(sphere_intersection(&sphere, 0, &mut ray_hit));
        assert!((ray_hit.ray.t_far - 1.0).abs() < 1e-6);
        assert!(ray_hit.hit.ng.y > 0.0);
    }

    #[test]
    fn test_origin_on_surface_outward_misses() {
        let sphere = unit_sphere(0);
        let original = RayHit::new(Ray::new(Vec3::X, Vec3::X));
        let mut ray_hit = original;

        assert!(!sphere_intersection(&sphere, 0, &mut ray_hit));
        assert_eq!(ray_hit, original);
    }

    #[test]
    fn test_origin_on_surface_inward_hits_far_side() {
        let sphere = unit_sphere(0);
        let mut ray_hit = RayHit::new(Ray::new(Vec3::X, -Vec3::X));

        assert!(sphere_intersection(&sphere, 0, &mut ray_hit));
        assert!((ray_hit.ray.t_far - 2.0).abs() < 1e-6);
    }

    /// Unit vectors spread evenly over the sphere (golden-angle spiral).
    fn surface_directions(count: usize) -> impl Iterator<Item = Vec3> {
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());

        (0..count).map(move |i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let ring = (1.0 - y * y).sqrt();
            let phi = i as f32 * golden_angle;

            Vec3::new(phi.cos() * ring, y, phi.sin() * ring).normalize()
        })
    }

    #[test]
    fn test_rays_from_arbitrary_surface_points() {
        let spheres = [
            Sphere::new(Vec3::ZERO, 1.0),
            Sphere::new(Vec3::new(3.5, -2.0, 10.0), 0.1),
            Sphere::new(Vec3::new(0.25, 0.5, -0.75), 0.3),
            Sphere::new(Vec3::new(-100.0, 50.0, 20.0), 2.5),
            Sphere::new(Vec3::new(7.0, 7.0, 7.0), 40.0),
        ];

        for sphere in &spheres {
            let scale = sphere.radius + sphere.center().abs().max_element();

            for normal in surface_directions(2500) {
                let point = sphere.center() + sphere.radius * normal;

                let mut outward = RayHit::new(Ray::new(point, normal));
                assert!(
                    !sphere_intersection(sphere, 0, &mut outward),
                    "outward ray from {point} hit {sphere:?} at t = {}",
                    outward.ray.t_far
                );
                assert!(!outward.is_hit());

                let mut inward = RayHit::new(Ray::new(point, -normal));
                assert!(sphere_intersection(sphere, 0, &mut inward));
                assert!(
                    (inward.ray.t_far - 2.0 * sphere.radius).abs() < 1e-4 * scale,
                    "inward ray from {point} hit {sphere:?} at t = {}",
                    inward.ray.t_far
                );
            }
        }
    }

    #[test]
    fn test_tangent_outward_rays_from_surface_miss() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.75);

        for normal in surface_directions(500) {
            let point = sphere.center() + sphere.radius * normal;
            // Leans slightly away from the sphere.
            let direction = normal.any_orthonormal_vector() + 0.01 * normal;

            let mut ray_hit = RayHit::new(Ray::new(point, direction));
            assert!(!sphere_intersection(&sphere, 0, &mut ray_hit));
        }
    }

    #[test]
    fn test_origin_just_outside_hits_near_side() {
        let sphere = unit_sphere(0);
        let mut ray_hit = RayHit::new(Ray::new(Vec3::new(1.01, 0.0, 0.0), -Vec3::X));

        assert!(sphere_intersection(&sphere, 0, &mut ray_hit));
        assert!((ray_hit.ray.t_far - 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_miss_leaves_record_untouched() {
        let sphere = unit_sphere(0);
        let original = RayHit::new(Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z));
        let mut ray_hit = original;

        assert!(!sphere_intersection(&sphere, 0, &mut ray_hit));
        assert_eq!(ray_hit, original);
    }

    #[test]
    fn test_closer_hit_is_kept() {
        let sphere = unit_sphere(0);
        let mut ray_hit = RayHit::new(Ray::with_range(
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::X,
            0.0,
            3.0,
        ));
        let original = ray_hit;

        assert!(!sphere_intersection(&sphere, 0, &mut ray_hit));
        assert_eq!(ray_hit, original);
    }

    #[test]
    fn test_unnormalized_direction() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0);
        let mut ray_hit = RayHit::new(Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)));

        assert!(sphere_intersection(&sphere, 0, &mut ray_hit));
        assert!((ray_hit.ray.t_far - 4.5).abs() < 1e-5);
    }
}
