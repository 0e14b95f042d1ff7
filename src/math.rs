//! Math types for the acoustic scene

pub use glam::Vec3;

/// Axis-aligned bounding box.
///
/// The default value is the empty box (`min = +MAX`, `max = -MAX`), so growing
/// it with any point or box yields exactly that point or box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::default(), |mut bounds, p| {
            bounds.grow(p);
            bounds
        })
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test. Returns the entry distance if the ray overlaps the box
    /// anywhere within `[t_near, t_far]`.
    pub fn intersect(&self, origin: Vec3, inv_direction: Vec3, t_near: f32, t_far: f32) -> Option<f32> {
        let t0 = (self.min - origin) * inv_direction;
        let t1 = (self.max - origin) * inv_direction;

        let t_min = t0.min(t1).max_element().max(t_near);
        let t_max = t0.max(t1).min_element().min(t_far);

        (t_min <= t_max).then_some(t_min)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(-f32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::default();
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)]);
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.5, 0.25));
    }

    #[test]
    fn test_union_with_empty() {
        let bounds = Bounds::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Bounds::default().union(bounds), bounds);
    }

    #[test]
    fn test_slab_intersection() {
        let bounds = Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let origin = Vec3::new(-5.0, 0.0, 0.0);
        let inv_direction = Vec3::new(1.0, 0.0, 0.0).recip();

        assert_eq!(bounds.intersect(origin, inv_direction, 0.0, f32::INFINITY), Some(4.0));
        assert_eq!(bounds.intersect(origin, inv_direction, 0.0, 3.0), None);

        let away = Vec3::new(-1.0, 0.0, 0.0).recip();
        assert_eq!(bounds.intersect(origin, away, 0.0, f32::INFINITY), None);
    }
}
