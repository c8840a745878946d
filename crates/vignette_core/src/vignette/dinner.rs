//! A dish of paneer chilly under a neon sign
//!
//! Clicking the dish makes it glow and pulse.

use vignette_math::Vec3;

use super::{InteractionCopy, SceneFrame, Staging, Vignette};
use crate::{Camera, ContinueGate, Lens, Material, Node, NodeKey, Primitive, Rng, SceneGraph, SceneKind};

const NEON_BASE: f32 = 1.0;

struct Dinner {
    copy: InteractionCopy,
    dish: NodeKey,
    neon: NodeKey,
    glowing: bool,
}

pub(crate) fn stage(copy: InteractionCopy, lens: Lens, rng: &mut Rng) -> Staging {
    let mut graph = SceneGraph::new().with_background(0x1a1410);

    graph.add(Node::new(Primitive::plane(30.0, 30.0)).with_material(Material::from_hex(0x2a2520)));

    graph.add(
        Node::new(Primitive::cuboid(2.5, 0.1, 1.5))
            .with_material(Material::from_hex(0x4a3a2a))
            .at(0.0, 1.0, 0.0),
    );
    let leg = Material::from_hex(0x3a3a3a);
    for (x, z) in [(-1.0, -0.5), (1.0, -0.5), (-1.0, 0.5), (1.0, 0.5)] {
        graph.add(Node::new(Primitive::cylinder(0.08, 0.08, 1.0, 6)).with_material(leg).at(x, 0.5, z));
    }

    let dish = add_dish(&mut graph, Vec3::new(0.0, 1.1, 0.0), rng);

    let plate = Material::from_hex(0xfafafa);
    for x in [-0.7, 0.7] {
        graph.add(Node::new(Primitive::cylinder(0.3, 0.28, 0.03, 12)).with_material(plate).at(x, 1.07, 0.4));
    }

    let sign = graph.add(Node::group().at(0.0, 3.0, -5.0));
    graph.add_child(
        sign,
        Node::new(Primitive::cuboid(3.0, 1.0, 0.1)).with_material(Material::from_hex(0x1a1a1a)),
    );
    let neon = graph
        .add_child(
            sign,
            Node::new(Primitive::cuboid(2.6, 0.12, 0.05))
                .with_material(Material::from_hex(0xff6b6b).with_emissive(NEON_BASE))
                .with_name("neon")
                .at(0.0, 0.0, 0.08),
        )
        .unwrap_or(sign);

    for i in 0..5 {
        add_chili(&mut graph, Vec3::new(-3.0 + i as f32 * 1.5, 3.5, -4.0), rng.range(-0.25, 0.25));
    }

    let camera = Camera::new(lens).looking_at(Vec3::new(0.0, 2.5, 4.0), Vec3::new(0.0, 1.0, 0.0));

    Staging {
        graph,
        camera,
        interactive: vec![dish],
        behavior: Box::new(Dinner {
            copy,
            dish,
            neon,
            glowing: false,
        }),
    }
}

fn add_dish(graph: &mut SceneGraph, position: Vec3, rng: &mut Rng) -> NodeKey {
    let dish = graph.add(Node::group().with_name("dish").at(position.x, position.y, position.z));
    graph.add_child(
        dish,
        Node::new(Primitive::cylinder(0.5, 0.4, 0.15, 12)).with_material(Material::from_hex(0x2a2a2a)),
    );
    graph.add_child(
        dish,
        Node::new(Primitive::cylinder(0.45, 0.45, 0.08, 12))
            .with_material(Material::from_hex(0x8b2500))
            .at(0.0, 0.05, 0.0),
    );

    let paneer = Material::from_hex(0xffeedd);
    for i in 0..6 {
        let angle = i as f32 / 6.0 * std::f32::consts::TAU;
        graph.add_child(
            dish,
            Node::new(Primitive::cuboid(0.12, 0.1, 0.12))
                .with_material(paneer)
                .at(angle.cos() * 0.25, 0.12, angle.sin() * 0.25)
                .rotated(0.0, rng.range(0.0, 0.5), 0.0),
        );
    }

    let garnish = Material::from_hex(0x44aa44);
    for _ in 0..4 {
        graph.add_child(
            dish,
            Node::new(Primitive::sphere(0.03, 6))
                .with_material(garnish)
                .at(rng.range(-0.2, 0.2), 0.12, rng.range(-0.2, 0.2)),
        );
    }

    dish
}

fn add_chili(graph: &mut SceneGraph, position: Vec3, tilt: f32) {
    let chili = graph.add(
        Node::group()
            .at(position.x, position.y, position.z)
            .rotated(0.0, 0.0, tilt),
    );
    // lying on its side
    graph.add_child(
        chili,
        Node::new(Primitive::cylinder(0.08, 0.06, 0.4, 8))
            .with_material(Material::from_hex(0xff3322))
            .rotated(0.0, 0.0, std::f32::consts::FRAC_PI_2),
    );
    graph.add_child(
        chili,
        Node::new(Primitive::cylinder(0.02, 0.03, 0.1, 6))
            .with_material(Material::from_hex(0x44aa44))
            .at(-0.2, 0.02, 0.0),
    );
}

impl Vignette for Dinner {
    fn kind(&self) -> SceneKind {
        SceneKind::Dinner
    }

    fn continue_gate(&self) -> ContinueGate {
        ContinueGate::AfterInteraction(1.5)
    }

    fn animate(&mut self, frame: &mut SceneFrame<'_>, _dt: f32) {
        let t = frame.elapsed;
        if let Some(material) = frame.graph.material_mut(self.neon) {
            material.emissive = NEON_BASE + (t * 10.0).sin() * 0.1;
        }

        if self.glowing {
            let pulse = (t * 4.0).sin() * 0.1 + 1.0;
            if let Some(transform) = frame.graph.transform_mut(self.dish) {
                transform.scale = Vec3::splat(pulse);
            }
        }
    }

    fn on_interact(&mut self, _frame: &mut SceneFrame<'_>, _target: NodeKey, _rng: &mut Rng) -> Option<String> {
        self.glowing = true;
        self.copy.feedback.clone()
    }
}
