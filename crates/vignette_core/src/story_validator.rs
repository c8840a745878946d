//! Story validation
//!
//! Checks a [`Story`] for content that would leave the experience stuck or
//! blank: empty captions, unanswerable quiz questions and repeated scenes.

use std::collections::HashSet;

use crate::story::Story;
use crate::SceneKind;

/// Validation error found in a story
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Scene at this index has an empty caption
    EmptyText(usize),
    /// The same scene kind appears twice
    DuplicateScene(SceneKind),
    /// Quiz question at this index has no options
    NoOptions(usize),
    /// Quiz question's answer index is outside its options
    AnswerOutOfRange {
        question: usize,
        answer: usize,
        options: usize,
    },
    /// Finale question or accepted text is empty
    EmptyFinale,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyText(index) => write!(f, "Scene {} has no text", index),
            ValidationError::DuplicateScene(kind) => {
                write!(f, "Scene {:?} appears more than once", kind)
            }
            ValidationError::NoOptions(index) => {
                write!(f, "Quiz question {} has no options", index)
            }
            ValidationError::AnswerOutOfRange {
                question,
                answer,
                options,
            } => write!(
                f,
                "Quiz question {} answer {} is out of range ({} options)",
                question, answer, options
            ),
            ValidationError::EmptyFinale => write!(f, "Finale text is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Static checks run on every loaded story
pub struct StoryValidator;

impl StoryValidator {
    /// Validate a story, returning all errors found
    ///
    /// An empty scene list is allowed; the sequence then goes straight to
    /// the finale.
    pub fn validate(story: &Story) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for (index, scene) in story.scenes.iter().enumerate() {
            if scene.text.trim().is_empty() {
                errors.push(ValidationError::EmptyText(index));
            }
            if !seen.insert(scene.id) {
                errors.push(ValidationError::DuplicateScene(scene.id));
            }
        }

        for (index, question) in story.quiz.iter().enumerate() {
            if question.options.is_empty() {
                errors.push(ValidationError::NoOptions(index));
            } else if question.answer >= question.options.len() {
                errors.push(ValidationError::AnswerOutOfRange {
                    question: index,
                    answer: question.answer,
                    options: question.options.len(),
                });
            }
        }

        if story.finale.question.trim().is_empty() || story.finale.accepted.trim().is_empty() {
            errors.push(ValidationError::EmptyFinale);
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(story: &Story) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(story);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
