//! The step machine driving the whole experience
//!
//! ```text
//! Loading -> Quiz -> Intro -> Scene(0) -> ... -> Scene(N-1) -> Finale
//!             ^  |
//!             +--+ restart after a wrong answer
//! ```
//!
//! The [`Sequencer`] owns the current [`Step`], the quiz, at most one
//! in-flight transition and at most one [`SceneInstance`]. All inputs are
//! infallible: anything invalid for the current step is ignored.
//!
//! # Example
//! ```
//! use vignette_core::{Sequencer, SequencerSettings, Step, Story};
//!
//! let mut story = Story::builtin();
//! story.quiz.clear();
//! let mut sequencer = Sequencer::new(story, SequencerSettings::default());
//!
//! sequencer.finish_loading();
//! assert!(sequencer.advance());
//! sequencer.tick(0.016);
//! assert_eq!(sequencer.step(), Step::Intro);
//! ```

use crate::finale::{FinalePhase, FinaleView};
use crate::quiz::{Quiz, QuizOutcome, QuizPhase, QuizQuestion};
use crate::transition::{StepTransition, TransitionEffect};
use crate::vignette::InteractionCopy;
use crate::{Lens, Rng, SceneInstance, Story};

/// The active stage of the experience
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Loading,
    Quiz(QuizPhase),
    Intro,
    /// Index into the story's scene list
    Scene(usize),
    Finale(FinalePhase),
}

/// Tunables for a [`Sequencer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequencerSettings {
    /// Seconds the scene-to-scene fade takes
    pub transition_duration: f32,
    /// Seconds after a scene is built before its caption shows
    pub text_reveal_delay: f32,
    pub lens: Lens,
    /// Fixed seed for reproducible runs, `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            transition_duration: 0.6,
            text_reveal_delay: 0.5,
            lens: Lens::default(),
            seed: None,
        }
    }
}

/// Caption for the active scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneText<'a> {
    pub text: &'a str,
    pub subtext: &'a str,
    /// `None` once the interaction has fired
    pub hint: Option<&'a str>,
    pub feedback: Option<&'a str>,
    /// False until the reveal delay has passed, and during transitions
    pub visible: bool,
}

/// Owns the step, the quiz and the active scene
pub struct Sequencer {
    story: Story,
    settings: SequencerSettings,
    step: Step,
    quiz: Quiz,
    transition: Option<StepTransition>,
    scene: Option<SceneInstance>,
    rng: Rng,
    pointer: [f32; 2],
}

impl Sequencer {
    pub fn new(story: Story, settings: SequencerSettings) -> Self {
        let rng = settings.seed.map(Rng::new).unwrap_or_else(Rng::from_time);
        let quiz = Quiz::new(story.quiz.clone());
        Self {
            story,
            settings,
            step: Step::Loading,
            quiz,
            transition: None,
            scene: None,
            rng,
            pointer: [0.0, 0.0],
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn scene_count(&self) -> usize {
        self.story.scene_count()
    }

    pub fn active_scene(&self) -> Option<&SceneInstance> {
        self.scene.as_ref()
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut SceneInstance> {
        self.scene.as_mut()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Opacity of on-screen text, below 1.0 while a fade is running
    pub fn transition_alpha(&self) -> f32 {
        self.transition.as_ref().map_or(1.0, StepTransition::alpha)
    }

    // --- Inputs ---

    /// Leave the loading screen for the quiz
    pub fn finish_loading(&mut self) -> bool {
        if self.step != Step::Loading {
            log::debug!("finish_loading ignored in {:?}", self.step);
            return false;
        }
        self.quiz.restart();
        self.set_step(Step::Quiz(self.quiz.phase()));
        true
    }

    /// Answer the current quiz question
    ///
    /// Ignored once the passed quiz has armed its transition to the intro.
    pub fn answer_quiz(&mut self, option: usize) -> QuizOutcome {
        if self.transition.is_some() {
            log::debug!("answer_quiz ignored: transition in flight");
            return QuizOutcome::Ignored;
        }
        if !matches!(self.step, Step::Quiz(_)) {
            log::debug!("answer_quiz ignored in {:?}", self.step);
            return QuizOutcome::Ignored;
        }
        let outcome = self.quiz.answer(option);
        if outcome != QuizOutcome::Ignored {
            log::info!("Quiz answer {} -> {:?}", option, outcome);
            self.set_step(Step::Quiz(self.quiz.phase()));
        }
        outcome
    }

    /// Start the quiz over; only meaningful while on the quiz
    pub fn restart(&mut self) -> bool {
        if self.transition.is_some() {
            log::debug!("restart ignored: transition in flight");
            return false;
        }
        if !matches!(self.step, Step::Quiz(_)) {
            log::debug!("restart ignored in {:?}", self.step);
            return false;
        }
        self.quiz.restart();
        self.set_step(Step::Quiz(self.quiz.phase()));
        true
    }

    /// Move on from the passed quiz, the intro or the current scene
    ///
    /// Arms a transition that completes on a later [`tick`](Self::tick).
    /// Returns false, changing nothing, while a transition is already in
    /// flight or when the current step has nowhere to go.
    pub fn advance(&mut self) -> bool {
        if self.transition.is_some() {
            log::debug!("advance ignored: transition in flight");
            return false;
        }

        let (to, effect) = match self.step {
            Step::Quiz(QuizPhase::Passed) => (Step::Intro, TransitionEffect::Instant),
            Step::Intro => (self.scene_or_finale(0), TransitionEffect::Instant),
            Step::Scene(index) => (
                self.scene_or_finale(index + 1),
                TransitionEffect::FadeOut {
                    duration: self.settings.transition_duration,
                },
            ),
            _ => {
                log::debug!("advance ignored in {:?}", self.step);
                return false;
            }
        };

        log::debug!("Transition armed: {:?} -> {:?}", self.step, to);
        self.transition = Some(StepTransition::new(self.step, to, effect));
        true
    }

    /// Say yes at the finale
    ///
    /// Returns false when there is no open question to answer.
    pub fn accept(&mut self) -> bool {
        match self.step {
            Step::Finale(phase) if !phase.is_accepted() => {
                self.set_step(Step::Finale(phase.accept()));
                true
            }
            _ => false,
        }
    }

    /// Use the finale's decline control
    ///
    /// The first use relabels it; using it again accepts.
    pub fn decline(&mut self) -> bool {
        match self.step {
            Step::Finale(phase) if !phase.is_accepted() => {
                self.set_step(Step::Finale(phase.decline()));
                true
            }
            _ => false,
        }
    }

    /// Track the pointer (NDC) for hover effects
    pub fn pointer_moved(&mut self, ndc: [f32; 2]) {
        self.pointer = ndc;
    }

    /// A press at `ndc`; returns whether it fired the scene's interaction
    pub fn pointer_down(&mut self, ndc: [f32; 2]) -> bool {
        self.pointer = ndc;
        if self.transition.is_some() {
            return false;
        }
        match self.scene.as_mut() {
            Some(scene) => scene.interact(ndc, &mut self.rng),
            None => false,
        }
    }

    /// Viewport aspect ratio changed
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.settings.lens.aspect = aspect;
            if let Some(scene) = self.scene.as_mut() {
                scene.set_aspect(aspect);
            }
        }
    }

    /// Advance time by `dt` seconds
    ///
    /// Runs the in-flight transition first. A transition that completes
    /// swaps the scene, and the new scene starts animating on the next tick.
    pub fn tick(&mut self, dt: f32) {
        if let Some(transition) = self.transition.as_mut() {
            if transition.update(dt) {
                let (from, to) = (transition.from(), transition.to());
                self.transition = None;
                // the step moved under the transition, so its target is stale
                if from != self.step {
                    log::warn!("Dropped transition {:?} -> {:?} from {:?}", from, to, self.step);
                } else {
                    self.enter(to);
                }
                return;
            }
        }

        if let Some(scene) = self.scene.as_mut() {
            scene.tick(dt, self.pointer);
        }
    }

    // --- Outputs ---

    /// Caption of the active scene
    pub fn scene_text(&self) -> Option<SceneText<'_>> {
        let Step::Scene(index) = self.step else {
            return None;
        };
        let descriptor = self.story.scene(index)?;
        let scene = self.scene.as_ref()?;
        let interacted = scene.has_interacted();

        Some(SceneText {
            text: &descriptor.text,
            subtext: &descriptor.subtext,
            hint: if interacted { None } else { descriptor.hint.as_deref() },
            feedback: scene.feedback(),
            visible: self.transition.is_none()
                && scene.state().elapsed >= self.settings.text_reveal_delay,
        })
    }

    /// Whether the shell should offer a continue control right now
    pub fn continue_visible(&self) -> bool {
        if self.transition.is_some() {
            return false;
        }
        match self.step {
            Step::Quiz(QuizPhase::Passed) | Step::Intro => true,
            Step::Scene(_) => self.scene.as_ref().map_or(false, SceneInstance::continue_visible),
            _ => false,
        }
    }

    /// Feedback emitted by the active scene's interaction
    pub fn feedback(&self) -> Option<&str> {
        self.scene.as_ref().and_then(SceneInstance::feedback)
    }

    pub fn finale_view(&self) -> Option<FinaleView<'_>> {
        match self.step {
            Step::Finale(phase) => Some(phase.view(&self.story.finale)),
            _ => None,
        }
    }

    /// The question being asked, with its index
    pub fn quiz_question(&self) -> Option<(usize, &QuizQuestion)> {
        match self.step {
            Step::Quiz(QuizPhase::Asking(index)) => {
                self.quiz.current_question().map(|q| (index, q))
            }
            _ => None,
        }
    }

    pub fn quiz_len(&self) -> usize {
        self.quiz.questions().len()
    }

    // --- Internals ---

    fn scene_or_finale(&self, index: usize) -> Step {
        if index < self.story.scene_count() {
            Step::Scene(index)
        } else {
            Step::Finale(FinalePhase::Asking)
        }
    }

    /// Make `step` current, replacing the scene instance
    fn enter(&mut self, step: Step) {
        // the previous instance and its effects go first
        self.scene = None;

        if let Step::Scene(index) = step {
            match self.story.scene(index) {
                Some(descriptor) => {
                    let copy = InteractionCopy {
                        feedback: descriptor.feedback.clone(),
                        card_messages: self.story.card_messages.clone(),
                    };
                    self.scene = Some(descriptor.id.build(copy, self.settings.lens, &mut self.rng));
                }
                None => {
                    // out of range means the sequence is exhausted
                    self.set_step(Step::Finale(FinalePhase::Asking));
                    return;
                }
            }
        }

        self.set_step(step);
    }

    fn set_step(&mut self, step: Step) {
        if step != self.step {
            log::info!("Step: {:?} -> {:?}", self.step, step);
            self.step = step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneKind;

    fn settings() -> SequencerSettings {
        SequencerSettings {
            seed: Some(42),
            ..Default::default()
        }
    }

    fn sequencer() -> Sequencer {
        Sequencer::new(Story::builtin(), settings())
    }

    /// Pass the builtin quiz and land on the intro
    fn to_intro(seq: &mut Sequencer) {
        seq.finish_loading();
        let answers: Vec<usize> = seq.story().quiz.iter().map(|q| q.answer).collect();
        for answer in answers {
            seq.answer_quiz(answer);
        }
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Passed));
        assert!(seq.advance());
        seq.tick(0.0);
        assert_eq!(seq.step(), Step::Intro);
    }

    /// Walk every scene through `advance` until the finale is up
    fn to_finale(seq: &mut Sequencer) {
        to_intro(seq);
        while !matches!(seq.step(), Step::Finale(_)) {
            assert!(seq.advance());
            settle(seq);
        }
        assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
    }

    /// Run ticks until the in-flight transition has completed
    fn settle(seq: &mut Sequencer) {
        for _ in 0..120 {
            if !seq.is_transitioning() {
                return;
            }
            seq.tick(1.0 / 60.0);
        }
        panic!("transition never completed");
    }

    #[test]
    fn test_starts_loading() {
        let seq = sequencer();
        assert_eq!(seq.step(), Step::Loading);
        assert!(seq.active_scene().is_none());
        assert!(!seq.continue_visible());
    }

    #[test]
    fn test_finish_loading_only_once() {
        let mut seq = sequencer();
        assert!(seq.finish_loading());
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Asking(0)));
        assert!(!seq.finish_loading());
    }

    #[test]
    fn test_no_intro_without_passing_quiz() {
        let mut seq = sequencer();
        assert!(!seq.advance());
        seq.finish_loading();
        assert!(!seq.advance());
        seq.answer_quiz(99);
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Failed));
        assert!(!seq.advance());
        seq.tick(1.0);
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Failed));
    }

    #[test]
    fn test_quiz_fail_at_any_index_then_restart() {
        let total = Story::builtin().quiz.len();
        for k in 0..total {
            let mut seq = sequencer();
            seq.finish_loading();
            let answers: Vec<usize> = seq.story().quiz.iter().map(|q| q.answer).collect();
            for &answer in &answers[..k] {
                assert!(matches!(seq.answer_quiz(answer), QuizOutcome::Correct { .. }));
            }
            let wrong = answers[k] + 1;
            assert_eq!(seq.answer_quiz(wrong), QuizOutcome::Failed, "k = {}", k);
            assert_eq!(seq.step(), Step::Quiz(QuizPhase::Failed));

            assert!(seq.restart());
            assert_eq!(seq.step(), Step::Quiz(QuizPhase::Asking(0)));
        }
    }

    #[test]
    fn test_quiz_question_output() {
        let mut seq = sequencer();
        assert!(seq.quiz_question().is_none());
        seq.finish_loading();
        let (index, question) = seq.quiz_question().unwrap();
        assert_eq!(index, 0);
        assert_eq!(question.prompt, Story::builtin().quiz[0].prompt);
    }

    #[test]
    fn test_restart_ignored_outside_quiz() {
        let mut seq = sequencer();
        assert!(!seq.restart());
        to_intro(&mut seq);
        assert!(!seq.restart());
        assert_eq!(seq.step(), Step::Intro);
    }

    #[test]
    fn test_intro_to_first_scene() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        assert!(seq.continue_visible());
        assert!(seq.advance());
        seq.tick(0.016);
        assert_eq!(seq.step(), Step::Scene(0));
        let scene = seq.active_scene().unwrap();
        assert_eq!(scene.kind(), SceneKind::Drive);
        assert!(!scene.has_interacted());
    }

    #[test]
    fn test_advance_is_idempotent_while_transitioning() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);

        assert!(seq.advance());
        for _ in 0..5 {
            assert!(!seq.advance());
        }
        settle(&mut seq);
        // one transition, one step
        assert_eq!(seq.step(), Step::Scene(1));
    }

    #[test]
    fn test_scene_fade_takes_its_duration() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);

        seq.advance();
        seq.tick(0.3);
        assert_eq!(seq.step(), Step::Scene(0));
        assert!((seq.transition_alpha() - 0.5).abs() < 0.001);
        assert!(!seq.continue_visible());
        seq.tick(0.3);
        assert_eq!(seq.step(), Step::Scene(1));
        assert_eq!(seq.transition_alpha(), 1.0);
    }

    #[test]
    fn test_every_scene_advances_to_next() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);

        let n = seq.scene_count();
        for i in 0..n {
            assert_eq!(seq.step(), Step::Scene(i));
            assert_eq!(seq.active_scene().unwrap().kind(), seq.story().scenes[i].id);
            assert!(seq.advance());
            settle(&mut seq);
        }
        assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
        assert!(seq.active_scene().is_none());
    }

    #[test]
    fn test_last_scene_goes_to_finale() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);
        while seq.step() != Step::Scene(4) {
            seq.advance();
            settle(&mut seq);
        }
        assert!(seq.advance());
        settle(&mut seq);
        assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
        assert!(!seq.advance());
    }

    #[test]
    fn test_empty_scene_list_goes_straight_to_finale() {
        let mut story = Story::builtin();
        story.scenes.clear();
        let mut seq = Sequencer::new(story, settings());
        to_intro(&mut seq);
        assert!(seq.advance());
        seq.tick(0.016);
        assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
    }

    #[test]
    fn test_empty_quiz_passes_on_load() {
        let mut story = Story::builtin();
        story.quiz.clear();
        let mut seq = Sequencer::new(story, settings());
        seq.finish_loading();
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Passed));
        assert!(seq.continue_visible());
    }

    #[test]
    fn test_finale_decline_then_decline_again_accepts() {
        // Declining never ends the experience: the decline control turns
        // into a yes. Both paths end in the same state.
        let mut declined = sequencer();
        to_finale(&mut declined);
        assert!(declined.decline());
        assert_eq!(declined.step(), Step::Finale(FinalePhase::Declined));
        let view = declined.finale_view().unwrap();
        assert_eq!(view.decline_label, Some("okay fine, yes"));
        assert!(declined.decline());

        let mut accepted = sequencer();
        accepted.step = Step::Finale(FinalePhase::Asking);
        assert!(accepted.accept());

        assert_eq!(declined.step(), Step::Finale(FinalePhase::Accepted));
        assert_eq!(declined.step(), accepted.step());
        assert_eq!(declined.finale_view(), accepted.finale_view());
    }

    #[test]
    fn test_finale_inputs_ignored_once_accepted() {
        let mut seq = sequencer();
        to_finale(&mut seq);
        assert!(seq.accept());
        assert!(!seq.accept());
        assert!(!seq.decline());
        assert_eq!(seq.step(), Step::Finale(FinalePhase::Accepted));
    }

    #[test]
    fn test_quiz_inputs_ignored_while_intro_pending() {
        let mut seq = sequencer();
        seq.finish_loading();
        let answers: Vec<usize> = seq.story().quiz.iter().map(|q| q.answer).collect();
        for &answer in &answers {
            seq.answer_quiz(answer);
        }
        assert!(seq.advance());

        assert!(!seq.restart());
        assert_eq!(seq.answer_quiz(answers[0] + 1), QuizOutcome::Ignored);
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Passed));

        seq.tick(0.016);
        assert_eq!(seq.step(), Step::Intro);
    }

    #[test]
    fn test_stale_transition_is_dropped() {
        let mut seq = sequencer();
        seq.finish_loading();
        let answers: Vec<usize> = seq.story().quiz.iter().map(|q| q.answer).collect();
        for &answer in &answers {
            seq.answer_quiz(answer);
        }
        assert!(seq.advance());
        // force the step away from the transition's origin
        seq.quiz.restart();
        let phase = seq.quiz.phase();
        seq.set_step(Step::Quiz(phase));

        seq.tick(0.016);
        assert_eq!(seq.step(), Step::Quiz(QuizPhase::Asking(0)));
        assert!(!seq.is_transitioning());
        assert!(seq.active_scene().is_none());
    }

    #[test]
    fn test_finale_inputs_ignored_elsewhere() {
        let mut seq = sequencer();
        assert!(!seq.accept());
        assert!(!seq.decline());
        assert!(seq.finale_view().is_none());
    }

    #[test]
    fn test_scene_text_reveal() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);

        let text = seq.scene_text().unwrap();
        assert!(!text.visible);
        assert_eq!(text.text, seq.story().scenes[0].text);
        assert!(text.hint.is_some());

        seq.tick(0.5);
        assert!(seq.scene_text().unwrap().visible);

        seq.advance();
        assert!(!seq.scene_text().unwrap().visible);
    }

    #[test]
    fn test_new_scene_not_animated_on_swap_tick() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.25);
        assert_eq!(seq.active_scene().unwrap().state().elapsed, 0.0);
        seq.tick(0.25);
        assert_eq!(seq.active_scene().unwrap().state().elapsed, 0.25);
    }

    #[test]
    fn test_pointer_down_ignored_outside_scenes() {
        let mut seq = sequencer();
        assert!(!seq.pointer_down([0.0, 0.0]));
        to_intro(&mut seq);
        assert!(!seq.pointer_down([0.0, 0.0]));
    }

    #[test]
    fn test_interaction_through_sequencer() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);
        seq.advance();
        settle(&mut seq);
        assert_eq!(seq.step(), Step::Scene(1));

        let scene = seq.active_scene().unwrap();
        let target = scene.project_node(scene.interactive()[0]).unwrap();
        assert!(!seq.continue_visible());

        assert!(seq.pointer_down(target));
        assert!(!seq.pointer_down(target));
        assert_eq!(seq.feedback(), Some("*purrrrrr*"));
        let text = seq.scene_text().unwrap();
        assert!(text.hint.is_none());
        assert_eq!(text.feedback, Some("*purrrrrr*"));

        seq.tick(1.6);
        assert!(seq.continue_visible());
    }

    #[test]
    fn test_set_aspect_reaches_scene_camera() {
        let mut seq = sequencer();
        to_intro(&mut seq);
        seq.advance();
        seq.tick(0.0);
        seq.set_aspect(2.5);
        assert_eq!(seq.active_scene().unwrap().camera().lens.aspect, 2.5);
        seq.set_aspect(-1.0);
        assert_eq!(seq.active_scene().unwrap().camera().lens.aspect, 2.5);
    }
}
