//! Scene rendering library
//!
//! This crate provides the wgpu-based pipeline for drawing a vignette's
//! scene graph as flat-shaded, low-poly triangles.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`pipeline::RenderPipeline`] - Triangle rendering with directional lighting
//! - [`renderable::SceneGeometry`] - Converts a [`SceneGraph`] to GPU vertices
//! - [`renderer::SceneRenderer`] - Uploads geometry and draws one frame

pub mod context;
pub mod pipeline;
pub mod renderable;
pub mod renderer;

// Re-export core types for convenience
pub use vignette_core::{Camera, Material, Node, NodeKey, Primitive, SceneGraph};

pub use renderable::SceneGeometry;
pub use renderer::{Lighting, SceneRenderer};
