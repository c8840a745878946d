//! Core types for the vignette sequencer
//!
//! This crate holds everything that decides *what* is on screen, with no
//! window or GPU attached:
//!
//! - [`SceneGraph`] - Tree of primitive [`Node`]s keyed by [`NodeKey`]
//! - [`Camera`] - Perspective camera with a [`Lens`] and picking rays
//! - [`HitTester`] - Pointer-to-node picking against world bounds
//! - [`EffectPool`] / [`OneShot`] - Short-lived animation helpers
//! - [`SceneKind`] / [`SceneInstance`] - The five vignettes and the live one
//! - [`Story`] - Captions, quiz and finale copy, loaded from RON
//! - [`Sequencer`] - The step machine tying it all together

mod transform;
mod graph;
mod camera;
mod effects;
mod rng;
mod transition;
mod quiz;
mod finale;
mod story;
mod story_validator;
mod scene;
mod sequencer;
pub mod vignette;

pub use transform::Transform3D;
pub use graph::{DirtyFlags, Material, Node, NodeKey, Primitive, SceneGraph};
pub use camera::{Camera, Lens};
pub use hit_test::{Hit, HitTester};
pub use effects::{EffectPool, OneShot, TransientEffect};
pub use rng::Rng;
pub use transition::{StepTransition, TransitionEffect};
pub use quiz::{Quiz, QuizOutcome, QuizPhase, QuizQuestion};
pub use finale::{FinaleCopy, FinalePhase, FinaleView};
pub use story::{SceneDescriptor, Story, StoryError};
pub use story_validator::{StoryValidator, ValidationError};
pub use scene::{AnimationState, ContinueGate, SceneInstance, SceneKind};
pub use sequencer::{SceneText, Sequencer, SequencerSettings, Step};

// Re-export commonly used math types for convenience
pub use vignette_math::{Aabb, Mat4, Ray, Vec3};
