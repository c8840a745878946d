//! Ray type and operations

use crate::{Aabb, Vec3};

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalized();
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    ///
    /// Returns the distance to the nearest intersection in front of the
    /// origin (0.0 when the origin is inside the box), or `None` on a miss.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let t1 = (aabb.min - self.origin).component_mul(self.inv_direction);
        let t2 = (aabb.max - self.origin).component_mul(self.inv_direction);

        let t_min = t1.min_components(t2);
        let t_max = t1.max_components(t2);

        let t_near = t_min.x.max(t_min.y).max(t_min.z);
        let t_far = t_max.x.min(t_max.y).min(t_max.z);

        if t_near <= t_far && t_far >= 0.0 {
            Some(t_near.max(0.0))
        } else {
            None
        }
    }
}
