//! One-line text describing the current step
//!
//! The shell has no text rendering of its own, so everything the user reads
//! goes into the window title.

use vignette_core::{QuizPhase, Sequencer, Step};

use super::LoadingBar;

/// Builds the status line for the current state
pub struct StatusText;

impl StatusText {
    pub fn compose(sequencer: &Sequencer, loading: &LoadingBar) -> String {
        let title = &sequencer.story().title;
        match sequencer.step() {
            Step::Loading => format!("{} | loading... {:.0}%", title, loading.progress()),
            Step::Quiz(QuizPhase::Asking(_)) => Self::quiz(sequencer),
            Step::Quiz(QuizPhase::Failed) => "wrong answer! press R to try again".to_string(),
            Step::Quiz(QuizPhase::Passed) => "you passed. press Enter".to_string(),
            Step::Intro => format!("{} | press Enter to begin", title),
            Step::Scene(_) => Self::scene(sequencer),
            Step::Finale(_) => Self::finale(sequencer),
        }
    }

    fn quiz(sequencer: &Sequencer) -> String {
        let Some((index, question)) = sequencer.quiz_question() else {
            return String::new();
        };
        let options: Vec<String> = question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("[{}] {}", i + 1, option))
            .collect();
        format!(
            "{}/{}: {}  {}",
            index + 1,
            sequencer.quiz_len(),
            question.prompt,
            options.join("  ")
        )
    }

    fn scene(sequencer: &Sequencer) -> String {
        let Some(text) = sequencer.scene_text() else {
            return String::new();
        };
        if !text.visible {
            return String::new();
        }

        let mut parts = vec![text.text.to_string(), text.subtext.to_string()];
        if let Some(feedback) = text.feedback {
            parts.push(feedback.to_string());
        } else if let Some(hint) = text.hint {
            parts.push(format!("({})", hint));
        }
        if sequencer.continue_visible() {
            parts.push("[Enter] continue".to_string());
        }
        parts.join(" | ")
    }

    fn finale(sequencer: &Sequencer) -> String {
        let Some(view) = sequencer.finale_view() else {
            return String::new();
        };
        let text = view.text.replace('\n', " ");
        match (view.accept_label, view.decline_label) {
            (Some(accept), Some(decline)) => {
                format!("{}  [Y] {}  [N] {}", text, accept, decline)
            }
            _ => text,
        }
    }
}
