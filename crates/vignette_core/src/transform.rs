//! 3D Transform (position, rotation, scale)
//!
//! A Transform3D places a scene node relative to its parent.

use serde::{Deserialize, Serialize};
use vignette_math::{mat4, Mat4, Vec3};

/// A 3D transform with position, Euler rotation (radians, XYZ order) and
/// per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position relative to the parent node
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Local-to-parent matrix (scale, then rotate, then translate)
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        mat4::compose(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space to parent space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        mat4::transform_point(self.to_matrix(), p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_identity() {
        let t = Transform3D::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!((t.transform_point(p) - p).length() < EPSILON);
    }

    #[test]
    fn test_translation() {
        let t = Transform3D::from_position(Vec3::new(10.0, 0.0, -2.0));
        let result = t.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert!((result - Vec3::new(11.0, 1.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_rotation_then_translation() {
        // Z rotation by 90 degrees maps X to Y, then we offset along X
        let t = Transform3D::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
        );
        let result = t.transform_point(Vec3::X);
        assert!((result - Vec3::new(1.0, 1.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_scale_is_per_axis() {
        let t = Transform3D {
            scale: Vec3::new(2.0, 1.0, 0.5),
            ..Transform3D::identity()
        };
        let result = t.transform_point(Vec3::ONE);
        assert!((result - Vec3::new(2.0, 1.0, 0.5)).length() < EPSILON);
    }
}
