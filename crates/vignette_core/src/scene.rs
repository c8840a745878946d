//! Live scene instances
//!
//! A [`SceneInstance`] is everything one vignette needs while it is on
//! screen: its graph, camera, the nodes that can be clicked, the generic
//! animation clock and the scene's own behaviour. The sequencer owns at most
//! one at a time and drops it wholesale when moving on.

use serde::{Deserialize, Serialize};

use crate::vignette::{self, InteractionCopy, SceneFrame, Staging, Vignette};
use crate::{Camera, EffectPool, HitTester, Lens, NodeKey, Rng, SceneGraph};

/// Which vignette a scene descriptor refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    /// Night drive down a tree-lined road
    Drive,
    /// The cat on the living room floor
    Cat,
    /// Coffee outside a cafe
    Cafe,
    /// Cards on a rooftop terrace under the stars
    Terrace,
    /// A dish of paneer chilly under a neon sign
    Dinner,
}

impl SceneKind {
    /// Build a fresh instance of this vignette
    ///
    /// This is the only place the kind is matched on; from here on the
    /// instance dispatches through its boxed [`Vignette`].
    pub fn build(self, copy: InteractionCopy, lens: Lens, rng: &mut Rng) -> SceneInstance {
        let staging = match self {
            SceneKind::Drive => vignette::drive::stage(lens, rng),
            SceneKind::Cat => vignette::cat::stage(copy, lens, rng),
            SceneKind::Cafe => vignette::cafe::stage(copy, lens, rng),
            SceneKind::Terrace => vignette::terrace::stage(copy, lens, rng),
            SceneKind::Dinner => vignette::dinner::stage(copy, lens, rng),
        };
        log::info!(
            "Built {:?} scene: {} nodes, {} interactive",
            self,
            staging.graph.len(),
            staging.interactive.len()
        );
        SceneInstance::new(self, staging)
    }
}

/// When a scene's continue control becomes available
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContinueGate {
    /// Seconds after the scene was built, no interaction needed
    AfterLoad(f32),
    /// Seconds after the interaction fired
    AfterInteraction(f32),
}

impl ContinueGate {
    pub fn is_open(&self, state: &AnimationState) -> bool {
        match *self {
            ContinueGate::AfterLoad(delay) => state.elapsed >= delay,
            ContinueGate::AfterInteraction(delay) => state
                .interacted_at
                .map_or(false, |at| state.elapsed - at >= delay),
        }
    }
}

/// Generic per-instance animation bookkeeping
#[derive(Debug, Default)]
pub struct AnimationState {
    /// Seconds since the scene was built
    pub elapsed: f32,
    /// Set by the first successful interaction, never cleared
    pub has_interacted: bool,
    /// Value of `elapsed` when the interaction fired
    pub interacted_at: Option<f32>,
    pub effects: EffectPool,
}

/// The single active vignette
pub struct SceneInstance {
    kind: SceneKind,
    graph: SceneGraph,
    camera: Camera,
    interactive: Vec<NodeKey>,
    state: AnimationState,
    behavior: Box<dyn Vignette>,
    feedback: Option<String>,
}

impl SceneInstance {
    fn new(kind: SceneKind, staging: Staging) -> Self {
        Self {
            kind,
            graph: staging.graph,
            camera: staging.camera,
            interactive: staging.interactive,
            state: AnimationState::default(),
            behavior: staging.behavior,
            feedback: None,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable graph access for the renderer's dirty-flag bookkeeping
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Nodes the hit tester considers for this scene
    pub fn interactive(&self) -> &[NodeKey] {
        &self.interactive
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn has_interacted(&self) -> bool {
        self.state.has_interacted
    }

    /// Feedback emitted by the interaction, once it has fired
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Whether the continue control should be shown
    pub fn continue_visible(&self) -> bool {
        self.behavior.continue_gate().is_open(&self.state)
    }

    /// Advance idle animation and transient effects by `dt` seconds
    pub fn tick(&mut self, dt: f32, pointer: [f32; 2]) {
        self.state.elapsed += dt;
        let mut frame = SceneFrame {
            graph: &mut self.graph,
            camera: &mut self.camera,
            effects: &mut self.state.effects,
            elapsed: self.state.elapsed,
            pointer,
        };
        self.behavior.animate(&mut frame, dt);
        self.state
            .effects
            .tick(&mut self.graph, dt, self.state.elapsed);
    }

    /// Handle a pointer press at `pointer` (NDC)
    ///
    /// Fires the scene's interaction if the pointer hits an interactive node
    /// and nothing has fired yet. Returns whether it fired.
    pub fn interact(&mut self, pointer: [f32; 2], rng: &mut Rng) -> bool {
        if self.state.has_interacted {
            log::debug!("{:?} already interacted, ignoring press", self.kind);
            return false;
        }
        let Some(target) = HitTester::pick(pointer, &self.camera, &self.graph, &self.interactive)
        else {
            return false;
        };

        self.state.has_interacted = true;
        self.state.interacted_at = Some(self.state.elapsed);

        let mut frame = SceneFrame {
            graph: &mut self.graph,
            camera: &mut self.camera,
            effects: &mut self.state.effects,
            elapsed: self.state.elapsed,
            pointer,
        };
        self.feedback = self.behavior.on_interact(&mut frame, target, rng);
        log::info!(
            "{:?} interaction fired ({} effects live)",
            self.kind,
            self.state.effects.len()
        );
        true
    }

    /// Screen-space position of a node's centre, for tests and tooling that
    /// need to aim the pointer at something
    pub fn project_node(&self, key: NodeKey) -> Option<[f32; 2]> {
        let centre = self.graph.world_bounds(key).map(|b| b.center()).or_else(|| {
            self.graph
                .subtree(key)
                .into_iter()
                .find_map(|k| self.graph.world_bounds(k))
                .map(|b| b.center())
        })?;
        let m = self.camera.view_projection();
        let x = m[0][0] * centre.x + m[1][0] * centre.y + m[2][0] * centre.z + m[3][0];
        let y = m[0][1] * centre.x + m[1][1] * centre.y + m[2][1] * centre.z + m[3][1];
        let w = m[0][3] * centre.x + m[1][3] * centre.y + m[2][3] * centre.z + m[3][3];
        if w <= 0.0 {
            return None;
        }
        Some([x / w, y / w])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(kind: SceneKind) -> SceneInstance {
        let copy = InteractionCopy {
            feedback: Some("feedback".to_string()),
            card_messages: vec!["card".to_string()],
        };
        kind.build(copy, Lens::default(), &mut Rng::new(11))
    }

    fn press_first_target(scene: &mut SceneInstance, rng: &mut Rng) -> bool {
        let target = scene.interactive()[0];
        let ndc = scene.project_node(target).expect("target on screen");
        scene.interact(ndc, rng)
    }

    #[test]
    fn test_gate_after_load() {
        let gate = ContinueGate::AfterLoad(3.0);
        let mut state = AnimationState::default();
        assert!(!gate.is_open(&state));
        state.elapsed = 3.0;
        assert!(gate.is_open(&state));
    }

    #[test]
    fn test_gate_after_interaction() {
        let gate = ContinueGate::AfterInteraction(1.5);
        let mut state = AnimationState {
            elapsed: 100.0,
            ..Default::default()
        };
        assert!(!gate.is_open(&state));
        state.interacted_at = Some(99.0);
        assert!(!gate.is_open(&state));
        state.elapsed = 100.5;
        assert!(gate.is_open(&state));
    }

    #[test]
    fn test_every_kind_builds() {
        for kind in [
            SceneKind::Drive,
            SceneKind::Cat,
            SceneKind::Cafe,
            SceneKind::Terrace,
            SceneKind::Dinner,
        ] {
            let scene = build(kind);
            assert_eq!(scene.kind(), kind);
            assert!(!scene.graph().is_empty());
            assert!(!scene.has_interacted());
            assert!(scene.feedback().is_none());
            if kind == SceneKind::Drive {
                assert!(scene.interactive().is_empty());
            } else {
                assert!(!scene.interactive().is_empty(), "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_drive_continue_without_interaction() {
        let mut scene = build(SceneKind::Drive);
        scene.tick(2.9, [0.0, 0.0]);
        assert!(!scene.continue_visible());
        scene.tick(0.2, [0.0, 0.0]);
        assert!(scene.continue_visible());
    }

    #[test]
    fn test_drive_ignores_presses() {
        let mut scene = build(SceneKind::Drive);
        let mut rng = Rng::new(1);
        assert!(!scene.interact([0.0, 0.0], &mut rng));
        assert!(!scene.has_interacted());
    }

    #[test]
    fn test_interaction_fires_once() {
        let mut rng = Rng::new(5);
        let mut scene = build(SceneKind::Cat);
        scene.tick(0.1, [0.0, 0.0]);

        assert!(press_first_target(&mut scene, &mut rng));
        assert!(scene.has_interacted());
        assert_eq!(scene.feedback(), Some("feedback"));
        let effects = scene.state().effects.len();
        let nodes = scene.graph().len();

        // A second hit changes nothing
        assert!(!press_first_target(&mut scene, &mut rng));
        assert_eq!(scene.state().effects.len(), effects);
        assert_eq!(scene.graph().len(), nodes);
    }

    #[test]
    fn test_miss_does_not_consume_interaction() {
        let mut rng = Rng::new(5);
        let mut scene = build(SceneKind::Dinner);
        // top-left corner is empty wall
        assert!(!scene.interact([-0.99, 0.99], &mut rng));
        assert!(!scene.has_interacted());
        assert!(press_first_target(&mut scene, &mut rng));
    }

    #[test]
    fn test_interactive_scene_gates_continue_on_interaction() {
        let mut rng = Rng::new(5);
        let mut scene = build(SceneKind::Cafe);
        scene.tick(10.0, [0.0, 0.0]);
        assert!(!scene.continue_visible());

        assert!(press_first_target(&mut scene, &mut rng));
        scene.tick(1.0, [0.0, 0.0]);
        assert!(!scene.continue_visible());
        scene.tick(0.6, [0.0, 0.0]);
        assert!(scene.continue_visible());
    }

    #[test]
    fn test_effects_are_cleaned_up() {
        let mut rng = Rng::new(5);
        let mut scene = build(SceneKind::Cat);
        let baseline = scene.graph().len();
        assert!(press_first_target(&mut scene, &mut rng));
        assert!(scene.graph().len() > baseline);

        // hearts decay at 0.5 per second
        for _ in 0..(3 * 60) {
            scene.tick(1.0 / 60.0, [0.0, 0.0]);
        }
        assert!(scene.state().effects.is_empty());
        assert_eq!(scene.graph().len(), baseline);
    }
}
