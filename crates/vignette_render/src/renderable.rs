//! Renderable geometry - bridges the scene graph to GPU buffers
//!
//! Every visible node's primitive is tessellated in local space, moved to
//! world space with the node's world matrix and given a per-face normal, so
//! the shader only has to light and project.

use std::f32::consts::{PI, TAU};

use vignette_core::{Material, NodeKey, Primitive, SceneGraph};
use vignette_math::{mat4, Mat4, Vec3};

use crate::pipeline::Vertex3D;

/// A triangle in local space
type Triangle = [Vec3; 3];

/// Fewest segments any round primitive is tessellated with
const MIN_SEGMENTS: u32 = 3;

/// Segments around the heart outline
const HEART_SEGMENTS: u32 = 32;

/// GPU-ready triangles collected from a scene graph
///
/// Opaque nodes come first so translucent effects blend over them.
pub struct SceneGeometry {
    /// Three vertices per triangle, in world space
    pub vertices: Vec<Vertex3D>,
}

impl SceneGeometry {
    /// Create an empty geometry collection
    pub fn new() -> Self {
        Self { vertices: Vec::new() }
    }

    /// Collect geometry from every visible node of a graph
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let mut result = Self::new();
        result.rebuild(graph);
        result
    }

    /// Replace the contents with the geometry of `graph`
    pub fn rebuild(&mut self, graph: &SceneGraph) {
        self.vertices.clear();

        let mut translucent = Vec::new();
        for (key, node) in graph.iter() {
            if matches!(node.primitive, Primitive::Group) || !graph.is_visible_in_world(key) {
                continue;
            }
            let opacity = node.material.opacity();
            if opacity <= 0.0 {
                continue;
            }
            if opacity < 1.0 {
                translucent.push(key);
            } else {
                self.add_node(graph, key);
            }
        }
        for key in translucent {
            self.add_node(graph, key);
        }
    }

    /// Add one node's primitive, ignoring its visibility
    pub fn add_node(&mut self, graph: &SceneGraph, key: NodeKey) {
        let (Some(node), Some(world)) = (graph.get(key), graph.world_matrix(key)) else {
            return;
        };
        for triangle in tessellate(&node.primitive) {
            self.push_triangle(world, triangle, &node.material);
        }
    }

    fn push_triangle(&mut self, world: Mat4, triangle: Triangle, material: &Material) {
        let [a, b, c] = triangle.map(|p| mat4::transform_point(world, p));
        let normal = (b - a).cross(c - a);
        // degenerate slivers (sphere poles, zero scale) have no normal to light
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            return;
        }
        let normal = normal.normalized().to_array();
        for p in [a, b, c] {
            self.vertices.push(Vertex3D {
                position: p.to_array(),
                normal,
                color: material.base_color,
                emissive: material.emissive,
                _padding: 0.0,
            });
        }
    }

    /// Remove all geometry
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Default for SceneGeometry {
    fn default() -> Self {
        Self::new()
    }
}

/// Local-space triangles of a primitive, counter-clockwise seen from outside
pub fn tessellate(primitive: &Primitive) -> Vec<Triangle> {
    match *primitive {
        Primitive::Box { size } => cuboid(size * 0.5),
        Primitive::Sphere { radius, segments } => sphere(radius, segments.max(MIN_SEGMENTS)),
        Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        } => frustum(radius_bottom, radius_top, height, segments.max(MIN_SEGMENTS)),
        Primitive::Cone {
            radius,
            height,
            segments,
        } => frustum(radius, 0.0, height, segments.max(MIN_SEGMENTS)),
        Primitive::Plane { width, depth } => {
            let (hw, hd) = (width * 0.5, depth * 0.5);
            let a = Vec3::new(-hw, 0.0, hd);
            let b = Vec3::new(hw, 0.0, hd);
            let c = Vec3::new(hw, 0.0, -hd);
            let d = Vec3::new(-hw, 0.0, -hd);
            vec![[a, b, c], [a, c, d]]
        }
        Primitive::Heart { size } => heart(size),
        Primitive::Group => Vec::new(),
    }
}

fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> [Triangle; 2] {
    [[a, b, c], [a, c, d]]
}

fn cuboid(h: Vec3) -> Vec<Triangle> {
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let faces = [
        // +X
        quad(corner(1.0, -1.0, 1.0), corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0)),
        // -X
        quad(corner(-1.0, -1.0, -1.0), corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0)),
        // +Y
        quad(corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0), corner(-1.0, 1.0, -1.0)),
        // -Y
        quad(corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0)),
        // +Z
        quad(corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)),
        // -Z
        quad(corner(1.0, -1.0, -1.0), corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0)),
    ];
    faces.into_iter().flatten().collect()
}

fn sphere(radius: f32, segments: u32) -> Vec<Triangle> {
    let rings = (segments / 2).max(2);
    let point = |ring: u32, seg: u32| {
        let theta = PI * ring as f32 / rings as f32;
        let phi = TAU * seg as f32 / segments as f32;
        Vec3::new(
            radius * theta.sin() * phi.cos(),
            radius * theta.cos(),
            -radius * theta.sin() * phi.sin(),
        )
    };

    let mut out = Vec::with_capacity((rings * segments * 2) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = point(ring, seg);
            let b = point(ring + 1, seg);
            let c = point(ring + 1, seg + 1);
            let d = point(ring, seg + 1);
            out.extend(quad(a, b, c, d));
        }
    }
    out
}

/// Capped frustum along Y; a zero radius collapses that end to a point
fn frustum(radius_bottom: f32, radius_top: f32, height: f32, segments: u32) -> Vec<Triangle> {
    let half = height * 0.5;
    let rim = |radius: f32, y: f32, seg: u32| {
        let phi = TAU * seg as f32 / segments as f32;
        Vec3::new(radius * phi.cos(), y, -radius * phi.sin())
    };
    let top = Vec3::new(0.0, half, 0.0);
    let bottom = Vec3::new(0.0, -half, 0.0);

    let mut out = Vec::with_capacity(segments as usize * 4);
    for seg in 0..segments {
        let b0 = rim(radius_bottom, -half, seg);
        let b1 = rim(radius_bottom, -half, seg + 1);
        let t0 = rim(radius_top, half, seg);
        let t1 = rim(radius_top, half, seg + 1);

        out.extend(quad(b0, b1, t1, t0));
        if radius_top > 0.0 {
            out.push([top, t0, t1]);
        }
        if radius_bottom > 0.0 {
            out.push([bottom, b1, b0]);
        }
    }
    out
}

/// Heart outline in XY, fanned from an interior point
fn heart(size: f32) -> Vec<Triangle> {
    // the classic parametric heart spans x in [-16, 16], y in about [-17, 12]
    let scale = size / 17.0;
    let point = |t: f32| {
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        Vec3::new(x * scale, (y + 2.5) * scale, 0.0)
    };
    let centre = Vec3::new(0.0, 2.5 * scale, 0.0);

    (0..HEART_SEGMENTS)
        .map(|i| {
            let t0 = TAU * i as f32 / HEART_SEGMENTS as f32;
            let t1 = TAU * (i + 1) as f32 / HEART_SEGMENTS as f32;
            [centre, point(t1), point(t0)]
        })
        .collect()
}
