//! Scene graph of primitive nodes
//!
//! A [`SceneGraph`] owns every node of one vignette. Nodes are addressed by
//! generational [`NodeKey`]s, so a key held after its node was removed simply
//! stops resolving instead of aliasing a newer node.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use vignette_math::{mat4, Aabb, Mat4, Vec3};

use crate::Transform3D;

new_key_type! {
    /// Generational key for a node in a [`SceneGraph`]
    pub struct NodeKey;
}

bitflags! {
    /// Flags indicating which parts of a node have changed and need updating
    ///
    /// The renderer only rebuilds its vertex buffer when some node is dirty.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Primitive has changed
        const MESH = 1 << 1;
        /// Material or visibility has changed
        const MATERIAL = 1 << 2;
        /// All flags set - node needs full rebuild
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits() | Self::MATERIAL.bits();
    }
}

/// Geometry of a node, in local space
///
/// Every shape is centred on its local origin. Cylinders and cones stand
/// along +Y, planes lie in XZ facing +Y, hearts lie in XY facing +Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Axis-aligned box
    Box { size: Vec3 },
    /// UV sphere
    Sphere { radius: f32, segments: u32 },
    /// Capped cylinder, possibly tapered
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// Cone with its tip on +Y
    Cone { radius: f32, height: f32, segments: u32 },
    /// Flat rectangle
    Plane { width: f32, depth: f32 },
    /// Flat heart outline, `size` is the half width
    Heart { size: f32 },
    /// No geometry, only a transform for its children
    Group,
}

impl Primitive {
    /// Convenience constructor for a box
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Primitive::Box { size: Vec3::new(x, y, z) }
    }

    pub fn sphere(radius: f32, segments: u32) -> Self {
        Primitive::Sphere { radius, segments }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        }
    }

    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Primitive::Cone {
            radius,
            height,
            segments,
        }
    }

    pub fn plane(width: f32, depth: f32) -> Self {
        Primitive::Plane { width, depth }
    }

    /// Local-space bounds, `None` for groups
    pub fn local_bounds(&self) -> Option<Aabb> {
        let half = match *self {
            Primitive::Box { size } => size * 0.5,
            Primitive::Sphere { radius, .. } => Vec3::splat(radius),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Primitive::Cone { radius, height, .. } => Vec3::new(radius, height * 0.5, radius),
            // planes get a sliver of thickness so edge-on rays still register
            Primitive::Plane { width, depth } => Vec3::new(width * 0.5, 0.01, depth * 0.5),
            Primitive::Heart { size } => Vec3::new(size, size, size * 0.1),
            Primitive::Group => return None,
        };
        Some(Aabb::from_center_half_extent(Vec3::ZERO, half))
    }
}

/// Flat-shaded material: an RGBA colour plus an emissive boost
///
/// The alpha channel is the node's opacity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
    /// How much of the base colour is emitted regardless of lighting
    #[serde(default)]
    pub emissive: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    /// Create a new material with the given RGBA color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            base_color: [r, g, b, a],
            emissive: 0.0,
        }
    }

    /// Create a new opaque material with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque material from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::from_rgb(channel(16), channel(8), channel(0))
    }

    /// Same material with the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self
    }

    /// Same material with the given emissive strength
    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive.max(0.0);
        self
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.base_color[3]
    }

    #[inline]
    pub fn set_opacity(&mut self, opacity: f32) {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
    }

    /// White material
    pub const WHITE: Self = Self {
        base_color: [1.0, 1.0, 1.0, 1.0],
        emissive: 0.0,
    };
}

/// A node in the scene graph
pub struct Node {
    /// Optional name for lookup (the cat's tail, the card)
    pub name: Option<String>,
    pub primitive: Primitive,
    /// Transform relative to the parent
    pub transform: Transform3D,
    pub material: Material,
    /// Hidden nodes hide their whole subtree
    pub visible: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    dirty: DirtyFlags,
}

impl Node {
    /// Create a new node with the given primitive
    pub fn new(primitive: Primitive) -> Self {
        Self {
            name: None,
            primitive,
            transform: Transform3D::identity(),
            material: Material::default(),
            visible: true,
            parent: None,
            children: Vec::new(),
            dirty: DirtyFlags::ALL,
        }
    }

    /// An empty group node
    pub fn group() -> Self {
        Self::new(Primitive::Group)
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set the name of this node (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    // --- Dirty tracking methods ---

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

/// Tree of primitive nodes making up one vignette
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    /// Set when nodes were removed, which no per-node flag can record
    structure_dirty: bool,
    /// Clear colour (linear RGBA)
    pub background: [f32; 4],
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty graph with a black background
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            structure_dirty: true,
            background: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Same graph with the given background colour
    pub fn with_background(mut self, hex: u32) -> Self {
        self.background = Material::from_hex(hex).base_color;
        self
    }

    /// Add a root node, returning its key
    pub fn add(&mut self, mut node: Node) -> NodeKey {
        node.parent = None;
        node.children.clear();
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Add a node under `parent`; `None` when the parent no longer exists
    pub fn add_child(&mut self, parent: NodeKey, mut node: Node) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        let key = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        Some(key)
    }

    /// Remove a node and its whole subtree
    ///
    /// Returns false if the key was already gone.
    pub fn remove(&mut self, key: NodeKey) -> bool {
        let Some(parent) = self.nodes.get(key).map(|n| n.parent) else {
            return false;
        };
        match parent {
            Some(p) => {
                if let Some(p) = self.nodes.get_mut(p) {
                    p.children.retain(|&c| c != key);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }
        for k in self.subtree(key) {
            self.nodes.remove(k);
        }
        self.structure_dirty = true;
        true
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable access to a node; callers are responsible for marking it dirty
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Mutable access to a node's transform, marking it dirty
    pub fn transform_mut(&mut self, key: NodeKey) -> Option<&mut Transform3D> {
        let node = self.nodes.get_mut(key)?;
        node.mark_dirty(DirtyFlags::TRANSFORM);
        Some(&mut node.transform)
    }

    /// Mutable access to a node's material, marking it dirty
    pub fn material_mut(&mut self, key: NodeKey) -> Option<&mut Material> {
        let node = self.nodes.get_mut(key)?;
        node.mark_dirty(DirtyFlags::MATERIAL);
        Some(&mut node.material)
    }

    /// Show or hide a node (and with it, its subtree)
    pub fn set_visible(&mut self, key: NodeKey, visible: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            if node.visible != visible {
                node.visible = visible;
                node.mark_dirty(DirtyFlags::MATERIAL);
            }
        }
    }

    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Iterate over all nodes (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Find the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(k, _)| k)
    }

    /// Find a named node within the subtree rooted at `root`
    pub fn find_in_subtree(&self, root: NodeKey, name: &str) -> Option<NodeKey> {
        self.subtree(root)
            .into_iter()
            .find(|&k| self.nodes.get(k).and_then(|n| n.name.as_deref()) == Some(name))
    }

    /// Keys of `root` and all its descendants, depth first
    ///
    /// Empty if `root` does not exist.
    pub fn subtree(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(key) {
                out.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Local-to-world matrix of a node
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let local = node.transform.to_matrix();
        match node.parent {
            Some(parent) => Some(mat4::mul(self.world_matrix(parent)?, local)),
            None => Some(local),
        }
    }

    /// World-space bounds of a node's own primitive, `None` for groups
    pub fn world_bounds(&self, key: NodeKey) -> Option<Aabb> {
        let local = self.nodes.get(key)?.primitive.local_bounds()?;
        Some(local.transformed(self.world_matrix(key)?))
    }

    /// True when the node and every ancestor is visible
    pub fn is_visible_in_world(&self, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            match self.nodes.get(k) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Whether anything changed since the last [`clear_dirty`](Self::clear_dirty)
    pub fn has_dirty(&self) -> bool {
        self.structure_dirty || self.nodes.values().any(Node::is_dirty)
    }

    /// Clear the dirty flags of all nodes
    pub fn clear_dirty(&mut self) {
        self.structure_dirty = false;
        for node in self.nodes.values_mut() {
            node.clear_dirty();
        }
    }
}
