//! GPU-compatible data types for the scene pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use vignette_math::mat4;

/// A triangle vertex, already in world space
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex3D {
    /// Position in world space (x, y, z)
    pub position: [f32; 3],
    /// Face normal for flat lighting
    pub normal: [f32; 3],
    /// RGBA color, alpha is the node's opacity
    pub color: [f32; 4],
    /// Self-illumination added on top of lighting
    pub emissive: f32,
    /// Padding to align to 16 bytes
    pub _padding: f32,
}

impl Default for Vertex3D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            color: [1.0; 4],
            emissive: 0.0,
            _padding: 0.0,
        }
    }
}

/// Render uniforms for the scene pass
/// Layout: 160 bytes total (must match scene.wgsl RenderUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RenderUniforms {
    /// View matrix (64 bytes)
    pub view_matrix: [[f32; 4]; 4],
    /// Projection matrix (64 bytes)
    pub projection_matrix: [[f32; 4]; 4],
    /// Direction towards the light + padding (16 bytes)
    pub light_dir: [f32; 3],
    pub _padding: f32,
    /// Lighting parameters (16 bytes)
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
    /// Scene brightness, dropped towards 0.0 while fading out
    pub fade: f32,
    pub _padding2: f32,
}

impl Default for RenderUniforms {
    fn default() -> Self {
        Self {
            view_matrix: mat4::IDENTITY,
            projection_matrix: mat4::IDENTITY,
            light_dir: [0.5, 1.0, 0.3],
            _padding: 0.0,
            ambient_strength: 0.45,
            diffuse_strength: 0.6,
            fade: 1.0,
            _padding2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_vertex3d_size() {
        // 3 floats position + 3 floats normal + 4 floats color + emissive + padding
        // = 12 floats = 48 bytes
        assert_eq!(size_of::<Vertex3D>(), 48);
    }

    #[test]
    fn test_render_uniforms_size() {
        // 32 floats of matrices + 4 floats light + 4 floats lighting/fade = 160 bytes
        assert_eq!(size_of::<RenderUniforms>(), 160);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<Vertex3D>(), 4);
        assert_eq!(std::mem::align_of::<RenderUniforms>(), 4);
    }
}
