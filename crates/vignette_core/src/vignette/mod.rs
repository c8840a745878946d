//! Per-scene behaviour
//!
//! Each vignette module builds its own geometry and implements [`Vignette`]
//! for the idle animation and the one interaction it supports. Scene-specific
//! flags (purring, glowing, the card draw) live on the implementing struct.

pub mod cafe;
pub mod cat;
pub mod dinner;
pub mod drive;
pub mod terrace;

use crate::{Camera, ContinueGate, EffectPool, NodeKey, Rng, SceneGraph, SceneKind};

/// Mutable view of a scene handed to its behaviour each call
pub struct SceneFrame<'a> {
    pub graph: &'a mut SceneGraph,
    pub camera: &'a mut Camera,
    pub effects: &'a mut EffectPool,
    /// Seconds since the scene was built
    pub elapsed: f32,
    /// Last known pointer position in NDC
    pub pointer: [f32; 2],
}

/// Text a scene may emit when its interaction fires
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionCopy {
    pub feedback: Option<String>,
    /// Alternatives for scenes that pick their feedback at random
    pub card_messages: Vec<String>,
}

/// Scene-specific animation and interaction
pub trait Vignette {
    fn kind(&self) -> SceneKind;

    fn continue_gate(&self) -> ContinueGate;

    /// Idle motion, called every tick before transient effects advance
    fn animate(&mut self, frame: &mut SceneFrame<'_>, dt: f32);

    /// React to a hit on `target`, one of the scene's interactive nodes
    ///
    /// Called at most once per instance. Returns the feedback line to show.
    fn on_interact(
        &mut self,
        frame: &mut SceneFrame<'_>,
        target: NodeKey,
        rng: &mut Rng,
    ) -> Option<String>;
}

/// What a scene builder hands back
pub struct Staging {
    pub graph: SceneGraph,
    pub camera: Camera,
    pub interactive: Vec<NodeKey>,
    pub behavior: Box<dyn Vignette>,
}
