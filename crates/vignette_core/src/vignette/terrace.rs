//! Cards on a rooftop terrace under the stars
//!
//! Clicking the deck draws a card, which rises, slides over and flips face
//! up, then stays where it landed.

use std::f32::consts::PI;

use vignette_math::Vec3;

use super::{InteractionCopy, SceneFrame, Staging, Vignette};
use crate::{Camera, ContinueGate, Lens, Material, Node, NodeKey, OneShot, Primitive, Rng, SceneGraph, SceneKind};

const CARD_COLORS: [u32; 4] = [0xff4444, 0x44ff44, 0x4444ff, 0xffff44];
/// Flip progress per second
const FLIP_RATE: f32 = 2.0;

struct Terrace {
    copy: InteractionCopy,
    stars: NodeKey,
    deck: NodeKey,
    drawn: Option<NodeKey>,
    flip: OneShot,
}

pub(crate) fn stage(copy: InteractionCopy, lens: Lens, rng: &mut Rng) -> Staging {
    let mut graph = SceneGraph::new().with_background(0x0a0a1a);

    graph.add(Node::new(Primitive::plane(12.0, 12.0)).with_material(Material::from_hex(0x3a3a3a)));

    let railing = Material::from_hex(0x2a2a2a);
    for i in 0..12 {
        graph.add(
            Node::new(Primitive::cylinder(0.05, 0.05, 1.0, 6))
                .with_material(railing)
                .at(-6.0 + i as f32, 0.5, -6.0),
        );
    }
    graph.add(Node::new(Primitive::cuboid(12.0, 0.08, 0.08)).with_material(railing).at(0.0, 1.0, -6.0));

    let table = graph.add(Node::group());
    graph.add_child(
        table,
        Node::new(Primitive::cuboid(1.5, 0.08, 1.0))
            .with_material(Material::from_hex(0x4a3a2a))
            .at(0.0, 0.6, 0.0),
    );
    graph.add_child(
        table,
        Node::new(Primitive::cylinder(0.08, 0.08, 0.6, 6))
            .with_material(Material::from_hex(0x3a3a3a))
            .at(0.0, 0.3, 0.0),
    );

    let deck = add_cards(&mut graph, rng);

    let cushion = Material::from_hex(0x4a3a5a);
    for x in [-1.5, 1.5] {
        graph.add(Node::new(Primitive::cuboid(0.8, 0.3, 0.8)).with_material(cushion).at(x, 0.15, 0.0));
    }

    let stars = graph.add(Node::group().with_name("stars"));
    let star = Material::WHITE.with_emissive(1.0);
    for _ in 0..200 {
        graph.add_child(
            stars,
            Node::new(Primitive::cuboid(0.15, 0.15, 0.15)).with_material(star).at(
                rng.range(-50.0, 50.0),
                rng.range(10.0, 40.0),
                rng.range(-80.0, 20.0),
            ),
        );
    }

    add_skyline(&mut graph, rng);

    let camera = Camera::new(lens).looking_at(Vec3::new(4.0, 2.5, 5.0), Vec3::new(0.0, 0.5, 0.0));

    Staging {
        graph,
        camera,
        interactive: vec![deck],
        behavior: Box::new(Terrace {
            copy,
            stars,
            deck,
            drawn: None,
            flip: OneShot::new(FLIP_RATE),
        }),
    }
}

/// Scattered cards plus the deck; returns the deck
fn add_cards(graph: &mut SceneGraph, rng: &mut Rng) -> NodeKey {
    let cards = graph.add(Node::group().at(0.0, 0.65, 0.0));
    for (i, &color) in CARD_COLORS.iter().cycle().take(5).enumerate() {
        graph.add_child(
            cards,
            Node::new(Primitive::cuboid(0.18, 0.01, 0.28))
                .with_material(Material::from_hex(color))
                .at(rng.range(-0.3, 0.3), i as f32 * 0.015, rng.range(-0.2, 0.2))
                .rotated(0.0, rng.range(-0.25, 0.25), 0.0),
        );
    }
    // the deck sits beside the spread, level with the table top
    graph.add(
        Node::new(Primitive::cuboid(0.18, 0.15, 0.28))
            .with_material(Material::from_hex(0x1a1a1a))
            .with_name("deck")
            .at(0.4, 0.725, 0.0),
    )
}

fn add_skyline(graph: &mut SceneGraph, rng: &mut Rng) {
    let wall = Material::from_hex(0x151520);
    let lit = Material::from_hex(0xffeeaa).with_emissive(1.0);
    for i in 0..15 {
        let height = rng.range(3.0, 11.0);
        let x = -20.0 + i as f32 * 3.0 + rng.range(0.0, 2.0);
        graph.add(
            Node::new(Primitive::cuboid(rng.range(2.0, 4.0), height, 2.0))
                .with_material(wall)
                .at(x, height / 2.0, -20.0),
        );
        for _ in 0..3 {
            graph.add(
                Node::new(Primitive::cuboid(0.3, 0.3, 0.1))
                    .with_material(lit)
                    .at(x + rng.range(-0.75, 0.75), rng.range(1.0, height * 0.8 + 1.0), -19.0),
            );
        }
    }
}

impl Terrace {
    fn deck_world_position(&self, graph: &SceneGraph) -> Vec3 {
        graph
            .world_bounds(self.deck)
            .map(|b| b.center())
            .unwrap_or(Vec3::new(0.4, 0.725, 0.0))
    }
}

impl Vignette for Terrace {
    fn kind(&self) -> SceneKind {
        SceneKind::Terrace
    }

    fn continue_gate(&self) -> ContinueGate {
        ContinueGate::AfterInteraction(2.0)
    }

    fn animate(&mut self, frame: &mut SceneFrame<'_>, dt: f32) {
        if let Some(transform) = frame.graph.transform_mut(self.stars) {
            transform.rotation.y = frame.elapsed * 0.01;
        }

        let (Some(card), Some(progress)) = (self.drawn, self.flip.advance(dt)) else {
            return;
        };
        if let Some(transform) = frame.graph.transform_mut(card) {
            transform.position.y = 0.75 + progress * 0.5;
            transform.position.x = 0.4 - progress * 0.6;
            transform.rotation.y = progress * PI;
        }
    }

    fn on_interact(&mut self, frame: &mut SceneFrame<'_>, _target: NodeKey, rng: &mut Rng) -> Option<String> {
        let color = CARD_COLORS[rng.next_int(CARD_COLORS.len() as u32) as usize];
        let start = self.deck_world_position(frame.graph) + Vec3::new(0.0, 0.1, 0.0);
        let card = frame.graph.add(
            Node::new(Primitive::cuboid(0.25, 0.02, 0.38))
                .with_material(Material::from_hex(color))
                .with_name("drawn card")
                .at(start.x, start.y, start.z),
        );
        self.drawn = Some(card);
        self.flip.start();

        rng.choose(&self.copy.card_messages)
            .cloned()
            .or_else(|| self.copy.feedback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectPool;

    fn run(staging: &mut Staging, effects: &mut EffectPool, elapsed: f32, dt: f32) {
        let mut frame = SceneFrame {
            graph: &mut staging.graph,
            camera: &mut staging.camera,
            effects,
            elapsed,
            pointer: [0.0, 0.0],
        };
        staging.behavior.animate(&mut frame, dt);
    }

    #[test]
    fn test_card_flips_then_stays() {
        let copy = InteractionCopy {
            feedback: None,
            card_messages: vec!["only one".to_string()],
        };
        let mut staging = stage(copy, Lens::default(), &mut Rng::new(2));
        let deck = staging.interactive[0];
        let mut effects = EffectPool::new();
        let feedback = {
            let mut frame = SceneFrame {
                graph: &mut staging.graph,
                camera: &mut staging.camera,
                effects: &mut effects,
                elapsed: 0.0,
                pointer: [0.0, 0.0],
            };
            staging.behavior.on_interact(&mut frame, deck, &mut Rng::new(8))
        };
        assert_eq!(feedback.as_deref(), Some("only one"));
        assert!(effects.is_empty());

        let card = staging.graph.find_by_name("drawn card").unwrap();
        run(&mut staging, &mut effects, 0.25, 0.25);
        let half = staging.graph.get(card).unwrap().transform;
        assert!((half.rotation.y - PI * 0.5).abs() < 0.0001);

        for _ in 0..10 {
            run(&mut staging, &mut effects, 1.0, 0.25);
        }
        let done = staging.graph.get(card).unwrap().transform;
        assert!((done.rotation.y - PI).abs() < 0.0001);
        assert!((done.position.y - 1.25).abs() < 0.0001);
        assert!((done.position.x + 0.2).abs() < 0.0001);
    }

    #[test]
    fn test_feedback_falls_back_without_card_messages() {
        let copy = InteractionCopy {
            feedback: Some("fallback".to_string()),
            card_messages: Vec::new(),
        };
        let mut staging = stage(copy, Lens::default(), &mut Rng::new(2));
        let deck = staging.interactive[0];
        let mut effects = EffectPool::new();
        let mut frame = SceneFrame {
            graph: &mut staging.graph,
            camera: &mut staging.camera,
            effects: &mut effects,
            elapsed: 0.0,
            pointer: [0.0, 0.0],
        };
        let feedback = staging.behavior.on_interact(&mut frame, deck, &mut Rng::new(8));
        assert_eq!(feedback.as_deref(), Some("fallback"));
    }
}
