//! Step transition effects
//!
//! A [`StepTransition`] is armed by the sequencer when the user continues and
//! completes after its effect has run. Progress is driven by the frame delta,
//! so a paused or slowed clock pauses the transition with it.

use crate::Step;

/// Transition effect between steps
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionEffect {
    /// Cut on the next tick
    Instant,
    /// Fade the outgoing text to transparent, then cut
    FadeOut {
        /// Seconds until the cut
        duration: f32,
    },
}

impl TransitionEffect {
    /// Duration in seconds (Instant is zero)
    pub fn duration(&self) -> f32 {
        match self {
            TransitionEffect::Instant => 0.0,
            TransitionEffect::FadeOut { duration } => duration.max(0.0),
        }
    }
}

/// An in-flight transition between two steps
#[derive(Clone, Debug)]
pub struct StepTransition {
    effect: TransitionEffect,
    from: Step,
    to: Step,
    elapsed: f32,
    /// Current progress from 0.0 (start) to 1.0 (complete)
    progress: f32,
}

impl StepTransition {
    pub fn new(from: Step, to: Step, effect: TransitionEffect) -> Self {
        Self {
            effect,
            from,
            to,
            elapsed: 0.0,
            progress: 0.0,
        }
    }

    /// Advance by `dt` seconds
    ///
    /// Returns true when the transition is complete.
    pub fn update(&mut self, dt: f32) -> bool {
        let duration = self.effect.duration();
        if duration <= 0.0 {
            self.progress = 1.0;
            return true;
        }

        self.elapsed += dt.max(0.0);
        self.progress = (self.elapsed / duration).min(1.0);
        self.progress >= 1.0
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn from(&self) -> Step {
        self.from
    }

    /// The step that becomes current on completion
    pub fn to(&self) -> Step {
        self.to
    }

    pub fn effect(&self) -> &TransitionEffect {
        &self.effect
    }

    /// Opacity of the outgoing content
    ///
    /// FadeOut goes 1.0 -> 0.0; Instant stays at 1.0 until the cut.
    pub fn alpha(&self) -> f32 {
        match self.effect {
            TransitionEffect::Instant => 1.0,
            TransitionEffect::FadeOut { .. } => 1.0 - self.progress,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(duration: f32) -> StepTransition {
        StepTransition::new(
            Step::Scene(0),
            Step::Scene(1),
            TransitionEffect::FadeOut { duration },
        )
    }

    #[test]
    fn test_instant_transition_completes_on_first_update() {
        let mut transition = StepTransition::new(Step::Intro, Step::Scene(0), TransitionEffect::Instant);
        assert!(!transition.is_complete());
        assert!(transition.update(0.0));
        assert!(transition.is_complete());
        assert_eq!(transition.alpha(), 1.0);
    }

    #[test]
    fn test_fade_progress_follows_dt() {
        let mut transition = fade(0.6);
        assert!(!transition.update(0.3));
        assert!((transition.progress() - 0.5).abs() < 0.0001);
        assert!((transition.alpha() - 0.5).abs() < 0.0001);
        assert!(transition.update(0.3));
        assert_eq!(transition.alpha(), 0.0);
    }

    #[test]
    fn test_fade_progress_clamps() {
        let mut transition = fade(0.6);
        assert!(transition.update(10.0));
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut transition = fade(1.0);
        transition.update(0.5);
        transition.update(-1.0);
        assert!((transition.progress() - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_endpoints() {
        let transition = fade(0.6);
        assert_eq!(transition.from(), Step::Scene(0));
        assert_eq!(transition.to(), Step::Scene(1));
        assert_eq!(transition.effect().duration(), 0.6);
    }
}
