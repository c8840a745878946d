//! Experience system
//!
//! Runs the per-frame loop around the sequencer:
//! - Delta time calculation
//! - Loading bar, handing over to the quiz when full
//! - Pointer hover and taps into the active scene
//! - Keyboard actions into sequencer inputs

use std::time::Instant;
use vignette_core::{Rng, Sequencer, Step, Story};
use vignette_input::PointerTracker;

use crate::config::AppConfig;
use crate::input::InputAction;
use crate::shell::{LoadingBar, StatusText};

/// Owns the sequencer and everything that feeds it
pub struct ExperienceSystem {
    sequencer: Sequencer,
    loading: LoadingBar,
    pointer: PointerTracker,
    /// Drives the loading bar only, so scene randomness stays reproducible
    loading_rng: Rng,
    last_frame: Instant,
    max_frame_dt: f32,
}

impl ExperienceSystem {
    pub fn new(story: Story, config: &AppConfig) -> Self {
        let loading_rng = config
            .debug
            .seed
            .map(|seed| Rng::new(seed ^ 0x9e37_79b9_7f4a_7c15))
            .unwrap_or_else(Rng::from_time);

        Self {
            sequencer: Sequencer::new(story, config.sequencer_settings()),
            loading: LoadingBar::new(config.loading.clone()),
            pointer: PointerTracker::new(config.window.width, config.window.height),
            loading_rng,
            last_frame: Instant::now(),
            max_frame_dt: config.timing.max_frame_dt,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Pointer state, for feeding window events
    pub fn pointer_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointer
    }

    /// Viewport changed size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pointer.resize(width, height);
        if width > 0 && height > 0 {
            self.sequencer.set_aspect(self.pointer.aspect());
        }
    }

    /// Apply a keyboard action to the sequencer
    ///
    /// Returns whether the action changed anything. Window actions are
    /// not handled here and always return false.
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Continue => {
                self.sequencer.continue_visible() && self.sequencer.advance()
            }
            InputAction::Answer(option) => {
                !matches!(
                    self.sequencer.answer_quiz(option),
                    vignette_core::QuizOutcome::Ignored
                )
            }
            InputAction::RestartQuiz => self.sequencer.restart(),
            InputAction::Accept => self.sequencer.accept(),
            InputAction::Decline => self.sequencer.decline(),
            InputAction::ToggleFullscreen | InputAction::Exit => false,
        }
    }

    /// Run one frame using wall-clock time
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.step(dt);
    }

    /// Run one frame of `dt` seconds
    ///
    /// Large gaps (first frame, a dragged window) are capped so a fade
    /// never completes in a single invisible frame.
    pub fn step(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.max_frame_dt);

        if self.sequencer.step() == Step::Loading
            && self.loading.update(dt, &mut self.loading_rng)
        {
            self.sequencer.finish_loading();
        }

        self.sequencer.pointer_moved(self.pointer.hover_ndc());
        if let Some(tap) = self.pointer.consume_tap() {
            self.sequencer.pointer_down(tap);
        }

        self.sequencer.tick(dt);
    }

    /// Text for the title bar
    pub fn status(&self) -> String {
        StatusText::compose(&self.sequencer, &self.loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_core::QuizPhase;

    fn system() -> ExperienceSystem {
        let mut config = AppConfig::default();
        config.debug.seed = Some(11);
        ExperienceSystem::new(Story::builtin(), &config)
    }

    fn run(system: &mut ExperienceSystem, seconds: f32) {
        let frames = (seconds * 60.0).ceil() as usize;
        for _ in 0..frames {
            system.step(1.0 / 60.0);
        }
    }

    #[test]
    fn test_loading_hands_over_to_quiz() {
        let mut system = system();
        assert_eq!(system.sequencer().step(), Step::Loading);
        // worst case is 200 minimum steps at 0.15s each
        for _ in 0..40 {
            run(&mut system, 1.0);
            if system.sequencer().step() != Step::Loading {
                break;
            }
        }
        assert_eq!(system.sequencer().step(), Step::Quiz(QuizPhase::Asking(0)));
    }

    #[test]
    fn test_continue_respects_gate() {
        let mut system = system();
        system.sequencer_mut().finish_loading();
        assert!(!system.apply(InputAction::Continue));

        let answers: Vec<usize> = system.sequencer().story().quiz.iter().map(|q| q.answer).collect();
        for answer in answers {
            assert!(system.apply(InputAction::Answer(answer)));
        }
        assert!(system.apply(InputAction::Continue));
        run(&mut system, 0.1);
        assert_eq!(system.sequencer().step(), Step::Intro);

        assert!(system.apply(InputAction::Continue));
        run(&mut system, 0.1);
        assert_eq!(system.sequencer().step(), Step::Scene(0));

        // the drive needs a few seconds before continuing is allowed
        assert!(!system.apply(InputAction::Continue));
        run(&mut system, 3.0);
        assert!(system.apply(InputAction::Continue));
    }

    #[test]
    fn test_wrong_answer_then_restart() {
        let mut system = system();
        system.sequencer_mut().finish_loading();
        assert!(system.apply(InputAction::Answer(8)));
        assert_eq!(system.sequencer().step(), Step::Quiz(QuizPhase::Failed));
        assert!(!system.apply(InputAction::Answer(0)));
        assert!(system.apply(InputAction::RestartQuiz));
        assert_eq!(system.sequencer().step(), Step::Quiz(QuizPhase::Asking(0)));
    }

    #[test]
    fn test_quiz_keys_between_continue_and_tick() {
        let mut system = system();
        system.sequencer_mut().finish_loading();
        let answers: Vec<usize> = system.sequencer().story().quiz.iter().map(|q| q.answer).collect();
        for &answer in &answers {
            system.apply(InputAction::Answer(answer));
        }
        assert!(system.apply(InputAction::Continue));
        assert!(!system.apply(InputAction::RestartQuiz));
        assert!(!system.apply(InputAction::Answer(answers[0] + 1)));

        system.step(0.016);
        assert_eq!(system.sequencer().step(), Step::Intro);
    }

    #[test]
    fn test_window_actions_are_not_consumed() {
        let mut system = system();
        assert!(!system.apply(InputAction::Exit));
        assert!(!system.apply(InputAction::ToggleFullscreen));
    }

    #[test]
    fn test_dt_is_capped() {
        let mut system = system();
        system.sequencer_mut().finish_loading();
        let answers: Vec<usize> = system.sequencer().story().quiz.iter().map(|q| q.answer).collect();
        for answer in answers {
            system.apply(InputAction::Answer(answer));
        }
        system.apply(InputAction::Continue);
        system.step(0.0);
        system.apply(InputAction::Continue);
        system.step(0.0);

        system.step(10.0);
        let elapsed = system.sequencer().active_scene().map(|s| s.state().elapsed);
        assert_eq!(elapsed, Some(AppConfig::default().timing.max_frame_dt));
    }

    #[test]
    fn test_status_tracks_loading() {
        let mut system = system();
        assert!(system.status().contains("loading"));
        system.sequencer_mut().finish_loading();
        assert!(system.status().starts_with("1/"));
    }
}
