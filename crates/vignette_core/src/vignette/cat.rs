//! The cat on the living room floor
//!
//! Clicking the cat makes her purr: hearts float up and the tail wags
//! faster.

use vignette_math::Vec3;

use super::{InteractionCopy, SceneFrame, Staging, Vignette};
use crate::{
    Camera, ContinueGate, Lens, Material, Node, NodeKey, Primitive, Rng, SceneGraph, SceneKind,
    TransientEffect,
};

const HEART_COUNT: usize = 8;
const HEART_DECAY: f32 = 0.5;
const HEART_SPIN: f32 = 2.0;

struct Cat {
    copy: InteractionCopy,
    cat: NodeKey,
    tail: Option<NodeKey>,
    toy: NodeKey,
    purring: bool,
}

pub(crate) fn stage(copy: InteractionCopy, lens: Lens, _rng: &mut Rng) -> Staging {
    let mut graph = SceneGraph::new().with_background(0x2a1f1a);

    graph.add(Node::new(Primitive::plane(30.0, 30.0)).with_material(Material::from_hex(0x3d2817)));

    let cat = add_cat(&mut graph);
    let tail = graph.find_in_subtree(cat, "tail");
    add_couch(&mut graph, Vec3::new(0.0, 0.0, -4.0));

    let toy = graph.add(
        Node::new(Primitive::sphere(0.2, 8))
            .with_material(Material::from_hex(0xff6b6b))
            .at(1.5, 0.2, 1.0),
    );

    let camera = Camera::new(lens).looking_at(Vec3::new(0.0, 3.0, 6.0), Vec3::ZERO);

    Staging {
        graph,
        camera,
        interactive: vec![cat],
        behavior: Box::new(Cat {
            copy,
            cat,
            tail,
            toy,
            purring: false,
        }),
    }
}

fn add_cat(graph: &mut SceneGraph) -> NodeKey {
    let cat = graph.add(Node::group().with_name("cat"));
    let white = Material::from_hex(0xfafafa);
    let black = Material::from_hex(0x1a1a1a);

    graph.add_child(
        cat,
        Node::new(Primitive::sphere(0.6, 8))
            .with_material(white)
            .at(0.0, 0.5, 0.0)
            .scaled(Vec3::new(1.0, 0.8, 1.3)),
    );
    graph.add_child(cat, Node::new(Primitive::sphere(0.4, 8)).with_material(white).at(0.0, 0.8, 0.7));
    graph.add_child(cat, Node::new(Primitive::sphere(0.25, 8)).with_material(black).at(0.15, 0.95, 0.75));

    graph.add_child(
        cat,
        Node::new(Primitive::cone(0.12, 0.25, 4))
            .with_material(white)
            .at(-0.2, 1.15, 0.65)
            .rotated(0.0, 0.0, -0.2),
    );
    graph.add_child(
        cat,
        Node::new(Primitive::cone(0.12, 0.25, 4))
            .with_material(black)
            .at(0.2, 1.15, 0.65)
            .rotated(0.0, 0.0, 0.2),
    );

    let eye = Material::from_hex(0x3a5a3a);
    for x in [-0.12, 0.12] {
        graph.add_child(cat, Node::new(Primitive::sphere(0.06, 8)).with_material(eye).at(x, 0.85, 1.05));
    }
    graph.add_child(
        cat,
        Node::new(Primitive::sphere(0.04, 6))
            .with_material(Material::from_hex(0xffaaaa))
            .at(0.0, 0.75, 1.1),
    );

    graph.add_child(
        cat,
        Node::new(Primitive::cylinder(0.08, 0.05, 1.0, 6))
            .with_material(black)
            .with_name("tail")
            .at(0.0, 0.6, -0.8)
            .rotated(-0.5, 0.0, 0.0),
    );

    for (x, z, material) in [(-0.25, 0.3, white), (0.25, 0.3, black), (-0.25, -0.3, white), (0.25, -0.3, black)] {
        graph.add_child(
            cat,
            Node::new(Primitive::cylinder(0.1, 0.1, 0.4, 6)).with_material(material).at(x, 0.2, z),
        );
    }

    cat
}

fn add_couch(graph: &mut SceneGraph, position: Vec3) {
    let couch = graph.add(Node::group().at(position.x, position.y, position.z));
    let fabric = Material::from_hex(0x4a3f35);
    graph.add_child(couch, Node::new(Primitive::cuboid(4.0, 0.8, 1.5)).with_material(fabric).at(0.0, 0.4, 0.0));
    graph.add_child(couch, Node::new(Primitive::cuboid(4.0, 1.2, 0.4)).with_material(fabric).at(0.0, 1.0, -0.55));
    for x in [-2.0, 2.0] {
        graph.add_child(couch, Node::new(Primitive::cuboid(0.4, 0.8, 1.5)).with_material(fabric).at(x, 0.8, 0.0));
    }
}

impl Vignette for Cat {
    fn kind(&self) -> SceneKind {
        SceneKind::Cat
    }

    fn continue_gate(&self) -> ContinueGate {
        ContinueGate::AfterInteraction(1.5)
    }

    fn animate(&mut self, frame: &mut SceneFrame<'_>, _dt: f32) {
        let t = frame.elapsed;

        // breathing
        if let Some(transform) = frame.graph.transform_mut(self.cat) {
            transform.scale.y = 1.0 + (t * 2.0).sin() * 0.02;
        }

        if let Some(tail) = self.tail {
            let wag_speed = if self.purring { 8.0 } else { 3.0 };
            if let Some(transform) = frame.graph.transform_mut(tail) {
                transform.rotation.z = (t * wag_speed).sin() * 0.3;
            }
        }

        if let Some(transform) = frame.graph.transform_mut(self.toy) {
            transform.position.y = 0.2 + (t * 2.0).sin() * 0.05;
        }
    }

    fn on_interact(&mut self, frame: &mut SceneFrame<'_>, _target: NodeKey, rng: &mut Rng) -> Option<String> {
        let origin = frame
            .graph
            .get(self.cat)
            .map(|n| n.transform.position)
            .unwrap_or(Vec3::ZERO);

        for _ in 0..HEART_COUNT {
            let position = Vec3::new(
                origin.x + rng.range(-0.75, 0.75),
                origin.y + 0.5,
                origin.z + rng.range(-0.75, 0.75),
            );
            let velocity = Vec3::new(
                rng.range(-0.01, 0.01),
                rng.range(0.02, 0.04),
                rng.range(-0.01, 0.01),
            );
            let node = frame.graph.add(
                Node::new(Primitive::Heart { size: 0.125 })
                    .with_material(Material::from_hex(0xff6b6b).with_emissive(1.0))
                    .at(position.x, position.y, position.z),
            );
            frame.effects.push(
                TransientEffect::new(node, position, velocity)
                    .with_decay(HEART_DECAY)
                    .with_spin(HEART_SPIN),
            );
        }

        self.purring = true;
        self.copy.feedback.clone()
    }
}
