//! Coffee outside a cafe
//!
//! Clicking either cup sends up a puff of steam from the first one.

use std::f32::consts::FRAC_PI_2;

use vignette_math::Vec3;

use super::{InteractionCopy, SceneFrame, Staging, Vignette};
use crate::{
    Camera, ContinueGate, Lens, Material, Node, NodeKey, Primitive, Rng, SceneGraph, SceneKind,
    TransientEffect,
};

const STEAM_COUNT: usize = 20;
const STEAM_DECAY: f32 = 0.3;
const STEAM_OPACITY: f32 = 0.4;
const CAMERA_X: f32 = 5.0;

struct Cafe {
    copy: InteractionCopy,
    cups: Vec<NodeKey>,
}

pub(crate) fn stage(copy: InteractionCopy, lens: Lens, _rng: &mut Rng) -> Staging {
    let mut graph = SceneGraph::new().with_background(0x1e1e2a);

    graph.add(Node::new(Primitive::plane(50.0, 50.0)).with_material(Material::from_hex(0x2a2a2a)));
    add_building(&mut graph, Vec3::new(0.0, 0.0, -5.0));
    add_table(&mut graph, Vec3::new(0.0, 0.0, 2.0));

    let cups: Vec<NodeKey> = [-0.4, 0.4]
        .into_iter()
        .map(|x| add_cup(&mut graph, Vec3::new(x, 1.05, 2.0)))
        .collect();

    let bulb = Material::from_hex(0xffee88).with_emissive(1.0);
    for i in 0..8 {
        graph.add(Node::new(Primitive::sphere(0.1, 8)).with_material(bulb).at(-3.0 + i as f32 * 0.9, 3.5, -3.0));
    }

    let camera = Camera::new(lens).looking_at(Vec3::new(CAMERA_X, 3.0, 8.0), Vec3::new(0.0, 1.0, 0.0));

    Staging {
        graph,
        camera,
        interactive: cups.clone(),
        behavior: Box::new(Cafe { copy, cups }),
    }
}

fn add_building(graph: &mut SceneGraph, position: Vec3) {
    let building = graph.add(Node::group().at(position.x, position.y, position.z));
    graph.add_child(
        building,
        Node::new(Primitive::cuboid(8.0, 5.0, 6.0))
            .with_material(Material::from_hex(0x3a3530))
            .at(0.0, 2.5, 0.0),
    );
    graph.add_child(
        building,
        Node::new(Primitive::cuboid(3.0, 2.5, 0.1))
            .with_material(Material::from_hex(0x445566).with_emissive(0.3))
            .at(0.0, 2.0, 3.01),
    );
    graph.add_child(
        building,
        Node::new(Primitive::cuboid(1.2, 2.5, 0.1))
            .with_material(Material::from_hex(0x2a2520))
            .at(-2.5, 1.25, 3.01),
    );
    graph.add_child(
        building,
        Node::new(Primitive::cuboid(8.0, 0.2, 2.0))
            .with_material(Material::from_hex(0x8b4513))
            .at(0.0, 4.2, 4.0)
            .rotated(0.15, 0.0, 0.0),
    );
    graph.add_child(
        building,
        Node::new(Primitive::cuboid(2.0, 0.6, 0.1))
            .with_material(Material::from_hex(0x2a2a2a))
            .at(0.0, 4.8, 3.5),
    );
}

fn add_table(graph: &mut SceneGraph, position: Vec3) {
    let table = graph.add(Node::group().at(position.x, position.y, position.z));
    let wood = Material::from_hex(0x4a3a2a);
    graph.add_child(table, Node::new(Primitive::cylinder(0.8, 0.8, 0.08, 12)).with_material(wood).at(0.0, 1.0, 0.0));
    graph.add_child(table, Node::new(Primitive::cylinder(0.08, 0.1, 1.0, 8)).with_material(wood).at(0.0, 0.5, 0.0));

    for x in [-1.2_f32, 1.2] {
        let yaw = if x > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
        let chair = graph.add_child(table, Node::group().at(x, 0.0, 0.0).rotated(0.0, yaw, 0.0));
        if let Some(chair) = chair {
            add_chair(graph, chair);
        }
    }
}

fn add_chair(graph: &mut SceneGraph, chair: NodeKey) {
    let metal = Material::from_hex(0x3a3a3a);
    graph.add_child(chair, Node::new(Primitive::cuboid(0.5, 0.08, 0.5)).with_material(metal).at(0.0, 0.6, 0.0));
    graph.add_child(chair, Node::new(Primitive::cuboid(0.5, 0.6, 0.08)).with_material(metal).at(0.0, 0.9, -0.21));
    for (x, z) in [(-0.2, -0.2), (0.2, -0.2), (-0.2, 0.2), (0.2, 0.2)] {
        graph.add_child(chair, Node::new(Primitive::cylinder(0.03, 0.03, 0.6, 6)).with_material(metal).at(x, 0.3, z));
    }
}

fn add_cup(graph: &mut SceneGraph, position: Vec3) -> NodeKey {
    let cup = graph.add(Node::group().with_name("cup").at(position.x, position.y, position.z));
    graph.add_child(
        cup,
        Node::new(Primitive::cylinder(0.12, 0.1, 0.2, 12)).with_material(Material::from_hex(0xfafafa)),
    );
    graph.add_child(
        cup,
        Node::new(Primitive::cylinder(0.1, 0.1, 0.02, 12))
            .with_material(Material::from_hex(0x3a2a1a))
            .at(0.0, 0.08, 0.0),
    );
    cup
}

impl Vignette for Cafe {
    fn kind(&self) -> SceneKind {
        SceneKind::Cafe
    }

    fn continue_gate(&self) -> ContinueGate {
        ContinueGate::AfterInteraction(1.5)
    }

    fn animate(&mut self, frame: &mut SceneFrame<'_>, _dt: f32) {
        frame.camera.position.x = CAMERA_X + (frame.elapsed * 0.2).sin() * 0.3;
    }

    fn on_interact(&mut self, frame: &mut SceneFrame<'_>, _target: NodeKey, rng: &mut Rng) -> Option<String> {
        // steam always rises from the first cup, whichever was clicked
        let origin = self
            .cups
            .first()
            .and_then(|&cup| frame.graph.get(cup))
            .map(|n| n.transform.position)?;

        for _ in 0..STEAM_COUNT {
            let position = Vec3::new(
                origin.x + rng.range(-0.05, 0.05),
                origin.y + 0.15,
                origin.z + rng.range(-0.05, 0.05),
            );
            let velocity = Vec3::new(
                rng.range(-0.0025, 0.0025),
                rng.range(0.01, 0.02),
                rng.range(-0.0025, 0.0025),
            );
            let node = frame.graph.add(
                Node::new(Primitive::sphere(rng.range(0.03, 0.05), 6))
                    .with_material(Material::WHITE.with_opacity(STEAM_OPACITY))
                    .at(position.x, position.y, position.z),
            );
            frame.effects.push(
                TransientEffect::new(node, position, velocity)
                    .with_decay(STEAM_DECAY)
                    .with_max_opacity(STEAM_OPACITY),
            );
        }

        self.copy.feedback.clone()
    }
}
