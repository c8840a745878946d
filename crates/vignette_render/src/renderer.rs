//! Frame rendering for one scene graph
//!
//! The renderer keeps a single growable vertex buffer. Geometry is only
//! re-tessellated when the graph reports dirty nodes, which during idle
//! animation is most frames, and never while a scene sits still.

use vignette_core::{Camera, SceneGraph};

use crate::pipeline::{RenderPipeline, RenderUniforms, Vertex3D};
use crate::renderable::SceneGeometry;

/// Vertices the buffer starts out with room for
const INITIAL_CAPACITY: usize = 16 * 1024;

/// Directional light and ambient term
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    /// Direction towards the light
    pub light_dir: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_dir: [0.5, 1.0, 0.3],
            ambient_strength: 0.45,
            diffuse_strength: 0.6,
        }
    }
}

/// Draws scene graphs through a [`RenderPipeline`]
pub struct SceneRenderer {
    pipeline: RenderPipeline,
    geometry: SceneGeometry,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    vertex_count: u32,
    pub lighting: Lighting,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        lighting: Lighting,
    ) -> Self {
        let mut pipeline = RenderPipeline::new(device, surface_format);
        pipeline.ensure_depth_texture(device, width, height);

        Self {
            pipeline,
            geometry: SceneGeometry::new(),
            vertex_buffer: Self::create_vertex_buffer(device, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            vertex_count: 0,
            lighting,
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vertex3D>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.pipeline.ensure_depth_texture(device, width, height);
    }

    /// Re-tessellate and upload `graph` if anything in it changed
    ///
    /// Returns whether an upload happened.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, graph: &mut SceneGraph) -> bool {
        if !graph.has_dirty() {
            return false;
        }
        self.geometry.rebuild(graph);
        graph.clear_dirty();

        let needed = self.geometry.vertex_count();
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(device, self.capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.capacity);
        }
        if needed > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.geometry.vertices));
        }
        self.vertex_count = needed as u32;
        true
    }

    /// Forget the uploaded geometry, e.g. when no scene is on screen
    pub fn clear(&mut self) {
        self.geometry.clear();
        self.vertex_count = 0;
    }

    /// Render one frame of `graph` seen through `camera` into `view`
    ///
    /// `fade` scales the scene's brightness, 1.0 being fully visible.
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        graph: &mut SceneGraph,
        camera: &Camera,
        fade: f32,
    ) {
        self.upload(device, queue, graph);
        self.draw(device, queue, view, camera, graph.background, fade);
    }

    /// Render the last uploaded geometry, or just the background when cleared
    pub fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &Camera,
        background: [f32; 4],
        fade: f32,
    ) {
        let uniforms = RenderUniforms {
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
            light_dir: self.lighting.light_dir,
            _padding: 0.0,
            ambient_strength: self.lighting.ambient_strength,
            diffuse_strength: self.lighting.diffuse_strength,
            fade: fade.clamp(0.0, 1.0),
            _padding2: 0.0,
        };
        self.pipeline.update_uniforms(queue, &uniforms);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        let fade = fade.clamp(0.0, 1.0) as f64;
        self.pipeline.render(
            &mut encoder,
            view,
            &self.vertex_buffer,
            self.vertex_count,
            wgpu::Color {
                r: background[0] as f64 * fade,
                g: background[1] as f64 * fade,
                b: background[2] as f64 * fade,
                a: background[3] as f64,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));
    }
}
