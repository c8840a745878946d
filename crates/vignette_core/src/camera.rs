//! Perspective look-at camera
//!
//! Each vignette owns one camera. The lens (field of view, clip planes and
//! aspect ratio) is shared across scenes and handed in at construction.

use vignette_math::{mat4, Mat4, Ray, Vec3};

/// Projection parameters shared by every scene camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width / height
    pub aspect: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// Perspective camera looking from `position` at `target`
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub lens: Lens,
}

impl Camera {
    pub fn new(lens: Lens) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            lens,
        }
    }

    /// Builder-style placement
    pub fn looking_at(mut self, position: Vec3, target: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.lens.aspect = aspect;
        }
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalized()
    }

    /// Camera-space up, orthogonal to forward and right
    pub fn up_axis(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(
            self.lens.fov_degrees.to_radians(),
            self.lens.aspect,
            self.lens.near,
            self.lens.far,
        )
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (x right, y up, both in [-1, 1])
    pub fn ray_through(&self, ndc: [f32; 2]) -> Ray {
        let tan_half = (self.lens.fov_degrees.to_radians() * 0.5).tan();
        let direction = self.forward()
            + self.right() * (ndc[0] * tan_half * self.lens.aspect)
            + self.up_axis() * (ndc[1] * tan_half);
        Ray::new(self.position, direction)
    }
}
