//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The scene renderer
//! - Frame rendering for whichever step is current

use std::sync::Arc;
use winit::window::Window;
use vignette_core::{Camera, Sequencer};
use vignette_render::{
    context::{ContextError, RenderContext},
    SceneRenderer,
};
use crate::config::{CameraConfig, RenderingConfig};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Context(ContextError),
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "GPU setup failed: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    renderer: SceneRenderer,
    render_config: RenderingConfig,
    /// Used for steps without a scene, only the clear colour matters
    idle_camera: Camera,
    /// Whether the last frame drew a scene
    drew_scene: bool,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        camera_config: &CameraConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let renderer = SceneRenderer::new(
            &context.device,
            context.config.format,
            context.size.width,
            context.size.height,
            render_config.lighting(),
        );
        let idle_camera = Camera::new(
            camera_config.to_lens(context.size.width, context.size.height),
        );

        Ok(Self {
            context,
            renderer,
            render_config,
            idle_camera,
            drew_scene: false,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.renderer.resize(&self.context.device, width, height);
    }

    /// Width over height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }

    /// Render a single frame of the current step
    pub fn render_frame(&mut self, sequencer: &mut Sequencer) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let fade = sequencer.transition_alpha();
        let ctx = &self.context;
        match sequencer.active_scene_mut() {
            Some(scene) => {
                let camera = scene.camera().clone();
                self.renderer.render_frame(
                    &ctx.device,
                    &ctx.queue,
                    &view,
                    scene.graph_mut(),
                    &camera,
                    fade,
                );
                self.drew_scene = true;
            }
            None => {
                if self.drew_scene {
                    self.renderer.clear();
                    self.drew_scene = false;
                }
                self.renderer.draw(
                    &ctx.device,
                    &ctx.queue,
                    &view,
                    &self.idle_camera,
                    self.render_config.background_color,
                    1.0,
                );
            }
        }

        output.present();
        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert_eq!(
            format!("{}", RenderError::from(ContextError::NoAdapter)),
            "GPU setup failed: No suitable GPU adapter found"
        );
    }
}
