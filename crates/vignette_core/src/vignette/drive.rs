//! Night drive: a car on a tree-lined road
//!
//! Nothing to click. The camera follows the pointer and the continue control
//! appears after a fixed delay.

use std::f32::consts::FRAC_PI_2;

use vignette_math::Vec3;

use super::{SceneFrame, Staging, Vignette};
use crate::{Camera, ContinueGate, Lens, Material, Node, NodeKey, Primitive, Rng, SceneGraph, SceneKind};

const CONTINUE_DELAY: f32 = 3.0;
const BASE_CAMERA: Vec3 = Vec3::new(8.0, 4.0, 12.0);

struct Drive {
    car: NodeKey,
}

pub(crate) fn stage(lens: Lens, rng: &mut Rng) -> Staging {
    let mut graph = SceneGraph::new().with_background(0x1a1a2e);

    graph.add(Node::new(Primitive::plane(200.0, 200.0)).with_material(Material::from_hex(0x1a1a1a)));
    graph.add(
        Node::new(Primitive::plane(8.0, 200.0))
            .with_material(Material::from_hex(0x2a2a2a))
            .at(0.0, 0.01, 0.0),
    );
    let line = Material::from_hex(0x444444);
    for i in 0..25 {
        let z = -100.0 + i as f32 * 8.0;
        graph.add(Node::new(Primitive::plane(0.2, 3.0)).with_material(line).at(0.0, 0.02, z));
    }

    let car = add_car(&mut graph);

    for i in 0..30 {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let x = side * (8.0 + rng.range(0.0, 10.0));
        let z = -50.0 + i as f32 * 6.0 + rng.range(0.0, 2.0);
        let scale = rng.range(0.8, 1.2);
        add_tree(&mut graph, Vec3::new(x, 0.0, z), scale);
    }

    for i in 0..10 {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        add_street_light(&mut graph, Vec3::new(side * 5.0, 0.0, -30.0 + i as f32 * 15.0));
    }

    let camera = Camera::new(lens).looking_at(BASE_CAMERA, Vec3::ZERO);

    Staging {
        graph,
        camera,
        interactive: Vec::new(),
        behavior: Box::new(Drive { car }),
    }
}

fn add_car(graph: &mut SceneGraph) -> NodeKey {
    let car = graph.add(Node::group().with_name("car"));

    graph.add_child(
        car,
        Node::new(Primitive::cuboid(2.0, 0.8, 4.0))
            .with_material(Material::from_hex(0xf5f5f5))
            .at(0.0, 0.6, 0.0),
    );
    graph.add_child(
        car,
        Node::new(Primitive::cuboid(1.8, 0.7, 2.0))
            .with_material(Material::WHITE)
            .at(0.0, 1.15, -0.2),
    );

    let glass = Material::from_hex(0x222233);
    graph.add_child(
        car,
        Node::new(Primitive::cuboid(1.6, 0.5, 0.1))
            .with_material(glass)
            .at(0.0, 1.1, 0.75)
            .rotated(0.2, 0.0, 0.0),
    );
    graph.add_child(
        car,
        Node::new(Primitive::cuboid(1.6, 0.5, 0.1))
            .with_material(glass)
            .at(0.0, 1.1, -1.15)
            .rotated(-0.2, 0.0, 0.0),
    );

    let tyre = Material::from_hex(0x1a1a1a);
    for (x, z) in [(-0.9, 1.2), (0.9, 1.2), (-0.9, -1.2), (0.9, -1.2)] {
        graph.add_child(
            car,
            Node::new(Primitive::cylinder(0.35, 0.35, 0.3, 8))
                .with_material(tyre)
                .at(x, 0.35, z)
                .rotated(0.0, 0.0, FRAC_PI_2),
        );
    }

    let headlight = Material::from_hex(0xffffcc).with_emissive(0.8);
    let taillight = Material::from_hex(0xff3333).with_emissive(0.6);
    for x in [-0.6, 0.6] {
        graph.add_child(
            car,
            Node::new(Primitive::cuboid(0.3, 0.2, 0.1)).with_material(headlight).at(x, 0.6, 2.0),
        );
        graph.add_child(
            car,
            Node::new(Primitive::cuboid(0.3, 0.2, 0.1)).with_material(taillight).at(x, 0.6, -2.0),
        );
    }

    car
}

fn add_tree(graph: &mut SceneGraph, position: Vec3, scale: f32) {
    let tree = graph.add(
        Node::group()
            .at(position.x, position.y, position.z)
            .scaled(Vec3::splat(scale)),
    );
    graph.add_child(
        tree,
        Node::new(Primitive::cylinder(0.2, 0.3, 2.0, 6))
            .with_material(Material::from_hex(0x4a3728))
            .at(0.0, 1.0, 0.0),
    );
    let foliage = Material::from_hex(0x2d5a27);
    for (radius, height, y) in [(1.5, 2.0, 2.5), (1.2, 1.8, 3.8), (0.8, 1.5, 4.8)] {
        graph.add_child(
            tree,
            Node::new(Primitive::cone(radius, height, 6)).with_material(foliage).at(0.0, y, 0.0),
        );
    }
}

fn add_street_light(graph: &mut SceneGraph, position: Vec3) {
    let light = graph.add(Node::group().at(position.x, position.y, position.z));
    let pole = Material::from_hex(0x3a3a3a);
    graph.add_child(
        light,
        Node::new(Primitive::cylinder(0.1, 0.15, 5.0, 6)).with_material(pole).at(0.0, 2.5, 0.0),
    );
    graph.add_child(
        light,
        Node::new(Primitive::cuboid(1.5, 0.1, 0.1)).with_material(pole).at(-0.75, 5.0, 0.0),
    );
    graph.add_child(
        light,
        Node::new(Primitive::cuboid(0.4, 0.2, 0.4))
            .with_material(Material::from_hex(0xffeecc).with_emissive(0.9))
            .at(-1.5, 4.9, 0.0),
    );
}

impl Vignette for Drive {
    fn kind(&self) -> SceneKind {
        SceneKind::Drive
    }

    fn continue_gate(&self) -> ContinueGate {
        ContinueGate::AfterLoad(CONTINUE_DELAY)
    }

    fn animate(&mut self, frame: &mut SceneFrame<'_>, _dt: f32) {
        let t = frame.elapsed;
        let mut car_position = Vec3::ZERO;
        if let Some(transform) = frame.graph.transform_mut(self.car) {
            transform.position.y = (t * 2.0).sin() * 0.02;
            transform.rotation.z = (t * 1.5).sin() * 0.01;
            car_position = transform.position;
        }

        // pointer parallax
        frame.camera.position = Vec3::new(
            BASE_CAMERA.x + frame.pointer[0] * 2.0,
            BASE_CAMERA.y + frame.pointer[1] * 0.5,
            BASE_CAMERA.z,
        );
        frame.camera.target = car_position;
    }

    fn on_interact(&mut self, _frame: &mut SceneFrame<'_>, _target: NodeKey, _rng: &mut Rng) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectPool;

    #[test]
    fn test_camera_follows_pointer() {
        let mut staging = stage(Lens::default(), &mut Rng::new(3));
        let mut effects = EffectPool::new();
        let mut frame = SceneFrame {
            graph: &mut staging.graph,
            camera: &mut staging.camera,
            effects: &mut effects,
            elapsed: 0.5,
            pointer: [1.0, -1.0],
        };
        staging.behavior.animate(&mut frame, 0.016);
        assert!((staging.camera.position.x - 10.0).abs() < 0.0001);
        assert!((staging.camera.position.y - 3.5).abs() < 0.0001);
    }

    #[test]
    fn test_car_bobs() {
        let mut staging = stage(Lens::default(), &mut Rng::new(3));
        let car = staging.graph.find_by_name("car").unwrap();
        let mut effects = EffectPool::new();
        let mut frame = SceneFrame {
            graph: &mut staging.graph,
            camera: &mut staging.camera,
            effects: &mut effects,
            elapsed: std::f32::consts::FRAC_PI_4,
            pointer: [0.0, 0.0],
        };
        staging.behavior.animate(&mut frame, 0.016);
        // sin(pi/2) * 0.02
        let y = staging.graph.get(car).unwrap().transform.position.y;
        assert!((y - 0.02).abs() < 0.0001);
    }
}
