//! Integration tests for the full experience
//!
//! These tests drive a [`Sequencer`] the way the shell does:
//! 1. Loading hands over to the quiz
//! 2. The quiz gates the intro
//! 3. Each scene is built, interacted with and left behind
//! 4. The finale always ends accepted

use vignette_core::{
    FinalePhase, QuizOutcome, QuizPhase, SceneKind, Sequencer, SequencerSettings, Step, Story,
};

const FRAME: f32 = 1.0 / 60.0;

fn new_sequencer(story: Story) -> Sequencer {
    Sequencer::new(
        story,
        SequencerSettings {
            seed: Some(7),
            ..Default::default()
        },
    )
}

fn run_frames(seq: &mut Sequencer, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        seq.tick(FRAME);
    }
}

fn pass_quiz(seq: &mut Sequencer) {
    let answers: Vec<usize> = seq.story().quiz.iter().map(|q| q.answer).collect();
    for answer in answers {
        assert_ne!(seq.answer_quiz(answer), QuizOutcome::Failed);
    }
}

/// Click the first interactive node of the active scene, if it has one
fn click_target(seq: &mut Sequencer) -> bool {
    let target = {
        let scene = seq.active_scene().expect("a scene should be active");
        match scene.interactive().first() {
            Some(&key) => scene.project_node(key),
            None => None,
        }
    };
    match target {
        Some(ndc) => seq.pointer_down(ndc),
        None => false,
    }
}

// ==================== Full Walkthrough ====================

#[test]
fn test_walkthrough_reaches_accepted_finale() {
    let mut seq = new_sequencer(Story::builtin());

    seq.finish_loading();
    pass_quiz(&mut seq);
    assert_eq!(seq.step(), Step::Quiz(QuizPhase::Passed));

    assert!(seq.advance());
    run_frames(&mut seq, FRAME);
    assert_eq!(seq.step(), Step::Intro);

    assert!(seq.advance());
    run_frames(&mut seq, FRAME);

    let expected = [
        SceneKind::Drive,
        SceneKind::Cat,
        SceneKind::Cafe,
        SceneKind::Terrace,
        SceneKind::Dinner,
    ];
    for (index, kind) in expected.iter().enumerate() {
        assert_eq!(seq.step(), Step::Scene(index));
        assert_eq!(seq.active_scene().map(|s| s.kind()), Some(*kind));

        if *kind == SceneKind::Drive {
            assert!(!click_target(&mut seq), "Drive has nothing to click");
        } else {
            assert!(!seq.continue_visible(), "{:?} gated on interaction", kind);
            assert!(click_target(&mut seq), "{:?} target should be clickable", kind);
            assert!(seq.feedback().is_some(), "{:?} should give feedback", kind);
        }

        run_frames(&mut seq, 3.5);
        assert!(seq.continue_visible(), "{:?} continue should be open", kind);

        assert!(seq.advance());
        run_frames(&mut seq, 0.7);
    }

    assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
    assert!(seq.active_scene().is_none());

    seq.decline();
    seq.decline();
    assert_eq!(seq.step(), Step::Finale(FinalePhase::Accepted));
    let view = seq.finale_view().expect("finale view");
    assert_eq!(view.text, seq.story().finale.accepted);
    assert!(view.accept_label.is_none());
}

// ==================== Quiz Gate Tests ====================

#[test]
fn test_failed_quiz_blocks_until_restart() {
    let mut seq = new_sequencer(Story::builtin());
    seq.finish_loading();

    let wrong = seq.story().quiz[0].answer + 1;
    assert_eq!(seq.answer_quiz(wrong), QuizOutcome::Failed);
    assert!(!seq.advance());
    assert!(!seq.continue_visible());

    // Answers are ignored until the quiz is restarted
    assert_eq!(seq.answer_quiz(0), QuizOutcome::Ignored);

    seq.restart();
    pass_quiz(&mut seq);
    assert!(seq.advance());
    run_frames(&mut seq, FRAME);
    assert_eq!(seq.step(), Step::Intro);
}

// ==================== Scene Lifetime Tests ====================

#[test]
fn test_effects_do_not_outlive_scene() {
    let mut seq = new_sequencer(Story::builtin());
    seq.finish_loading();
    pass_quiz(&mut seq);
    seq.advance();
    run_frames(&mut seq, FRAME);
    seq.advance();
    run_frames(&mut seq, FRAME);

    // Move on to the cat and trigger hearts
    seq.advance();
    run_frames(&mut seq, 0.7);
    assert_eq!(seq.step(), Step::Scene(1));
    assert!(click_target(&mut seq));
    let live = seq.active_scene().map_or(0, |s| s.state().effects.len());
    assert!(live > 0);

    // Leaving drops the whole instance along with its effects
    seq.advance();
    run_frames(&mut seq, 0.7);
    let scene = seq.active_scene().expect("cafe should be active");
    assert_eq!(scene.kind(), SceneKind::Cafe);
    assert!(scene.state().effects.is_empty());
    assert!(!scene.has_interacted());
}

#[test]
fn test_presses_during_fade_are_ignored() {
    let mut seq = new_sequencer(Story::builtin());
    seq.finish_loading();
    pass_quiz(&mut seq);
    seq.advance();
    run_frames(&mut seq, FRAME);
    seq.advance();
    run_frames(&mut seq, FRAME);
    seq.advance();
    run_frames(&mut seq, 0.7);

    let target = {
        let scene = seq.active_scene().expect("cat scene");
        scene.project_node(scene.interactive()[0]).expect("cat on screen")
    };

    seq.advance();
    assert!(seq.is_transitioning());
    assert!(!seq.pointer_down(target));
    assert!(!seq.active_scene().map_or(true, |s| s.has_interacted()));
}

// ==================== Story Tests ====================

#[test]
fn test_story_survives_ron_round_trip_through_sequencer() {
    let text = Story::builtin().to_ron_string().expect("serialize story");
    let story = Story::from_ron_str(&text).expect("parse story");
    let seq = new_sequencer(story);
    assert_eq!(seq.scene_count(), 5);
    assert_eq!(seq.story(), &Story::builtin());
}

#[test]
fn test_custom_story_with_two_scenes() {
    let mut story = Story::builtin();
    story.scenes.truncate(2);
    story.quiz.clear();

    let mut seq = new_sequencer(story);
    seq.finish_loading();
    seq.advance();
    run_frames(&mut seq, FRAME);
    seq.advance();
    run_frames(&mut seq, FRAME);

    seq.advance();
    run_frames(&mut seq, 0.7);
    assert_eq!(seq.step(), Step::Scene(1));
    seq.advance();
    run_frames(&mut seq, 0.7);
    assert_eq!(seq.step(), Step::Finale(FinalePhase::Asking));
}
