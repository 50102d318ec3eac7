use glam::Vec3;

use crate::EntityId;

/// A half-line used for hit testing. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the first intersection with a sphere, if any lies ahead.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        let far = -b + sqrt_d;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin is inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }

    /// Slab test against an axis-aligned box. Returns the entry distance, or 0
    /// when the origin is already inside.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inv = self.direction.recip();
        let t1 = (min - self.origin) * inv;
        let t2 = (max - self.origin) * inv;
        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();
        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// Result of a scene ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityId,
    pub distance: f32,
    pub point: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn sphere_hit_distance() {
        let d = forward_ray().intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((d - 4.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_behind_is_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).unwrap();
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn sphere_offset_is_missed() {
        assert!(
            forward_ray()
                .intersect_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0)
                .is_none()
        );
    }

    #[test]
    fn aabb_hit_distance() {
        let d = forward_ray()
            .intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
            .unwrap();
        assert!((d - 4.5).abs() < 1e-5);
        let p = forward_ray().at(d);
        assert!((p.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn aabb_inside_returns_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X).unwrap();
        let d = ray.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(d, Some(0.0));
    }

    #[test]
    fn aabb_miss() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert!(
            ray.intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
                .is_none()
        );
    }
}
