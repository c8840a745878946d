//! Short-lived visual effects
//!
//! [`TransientEffect`]s are nodes spawned by an interaction that drift, fade
//! and are then removed from the graph. [`OneShot`] tracks a single
//! normalised animation that plays once and then holds its end pose.

use vignette_math::Vec3;

use crate::{NodeKey, SceneGraph};

/// A node that drifts and fades until its life runs out
#[derive(Clone, Debug)]
pub struct TransientEffect {
    /// Node in the scene graph this effect drives
    pub node: NodeKey,
    pub position: Vec3,
    /// Displacement applied once per tick
    pub velocity: Vec3,
    /// Starts at 1.0, the effect is removed at or below zero
    pub remaining_life: f32,
    /// Life lost per second
    pub decay_rate: f32,
    /// Opacity at full life
    pub max_opacity: f32,
    /// Yaw in radians per second of scene time, 0 for none
    pub spin_rate: f32,
}

impl TransientEffect {
    pub fn new(node: NodeKey, position: Vec3, velocity: Vec3) -> Self {
        Self {
            node,
            position,
            velocity,
            remaining_life: 1.0,
            decay_rate: 1.0,
            max_opacity: 1.0,
            spin_rate: 0.0,
        }
    }

    pub fn with_decay(mut self, decay_rate: f32) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn with_max_opacity(mut self, max_opacity: f32) -> Self {
        self.max_opacity = max_opacity;
        self
    }

    pub fn with_spin(mut self, spin_rate: f32) -> Self {
        self.spin_rate = spin_rate;
        self
    }

    /// Current opacity, proportional to remaining life
    pub fn opacity(&self) -> f32 {
        (self.remaining_life * self.max_opacity).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining_life <= 0.0
    }
}

/// The live effects of one scene instance
///
/// Dropped together with its scene, so effects never outlive the scene that
/// spawned them.
#[derive(Debug, Default)]
pub struct EffectPool {
    effects: Vec<TransientEffect>,
}

impl EffectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: TransientEffect) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransientEffect> {
        self.effects.iter()
    }

    /// Advance every effect by one tick and drop the expired ones
    ///
    /// Every expired effect has its node removed from `graph` in the same
    /// pass, however many expire at once. Returns the number removed.
    pub fn tick(&mut self, graph: &mut SceneGraph, dt: f32, elapsed: f32) -> usize {
        for effect in &mut self.effects {
            effect.position += effect.velocity;
            effect.remaining_life -= dt * effect.decay_rate;

            if let Some(transform) = graph.transform_mut(effect.node) {
                transform.position = effect.position;
                if effect.spin_rate != 0.0 {
                    transform.rotation.y = elapsed * effect.spin_rate;
                }
            }
            if let Some(material) = graph.material_mut(effect.node) {
                material.set_opacity(effect.opacity());
            }
        }

        let before = self.effects.len();
        self.effects.retain(|effect| {
            if effect.is_expired() {
                graph.remove(effect.node);
                false
            } else {
                true
            }
        });
        before - self.effects.len()
    }
}

/// Progress of a one-time animation, from 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OneShot {
    progress: f32,
    /// Progress per second
    rate: f32,
    active: bool,
}

impl OneShot {
    /// An idle tracker that will take `1 / rate` seconds once started
    pub fn new(rate: f32) -> Self {
        Self {
            progress: 0.0,
            rate,
            active: false,
        }
    }

    /// Start (or restart) from zero
    pub fn start(&mut self) {
        self.progress = 0.0;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Advance while active
    ///
    /// Returns the new progress, including on the tick that reaches 1.0, and
    /// `None` once finished or before it was started.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.progress = (self.progress + dt * self.rate).min(1.0);
        if self.progress >= 1.0 {
            self.active = false;
        }
        Some(self.progress)
    }
}
