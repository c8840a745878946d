//! Story content
//!
//! Everything the user reads (scene captions, quiz questions, interaction
//! feedback, the finale) lives in a [`Story`], loaded from a RON file and
//! validated before use.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::finale::FinaleCopy;
use crate::quiz::QuizQuestion;
use crate::story_validator::{StoryValidator, ValidationError};
use crate::SceneKind;

/// Caption and copy for one scene, in play order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Which vignette to build
    pub id: SceneKind,
    pub text: String,
    pub subtext: String,
    /// Shown until the scene's interaction fires
    #[serde(default)]
    pub hint: Option<String>,
    /// Shown after the interaction fires
    #[serde(default)]
    pub feedback: Option<String>,
}

/// The full script of the experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub scenes: Vec<SceneDescriptor>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    /// Feedback lines for the card draw, one picked at random
    #[serde(default)]
    pub card_messages: Vec<String>,
    pub finale: FinaleCopy,
}

impl Story {
    /// Load and validate a story from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoryError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate a story from RON text
    pub fn from_ron_str(contents: &str) -> Result<Self, StoryError> {
        let story: Story = ron::from_str(contents)?;
        StoryValidator::validate_or_error(&story).map_err(StoryError::Invalid)?;
        Ok(story)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty)
    }

    /// Descriptor for the scene at `index`, `None` past the end
    pub fn scene(&self, index: usize) -> Option<&SceneDescriptor> {
        self.scenes.get(index)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The story compiled into the binary, used when no file is configured
    pub fn builtin() -> Self {
        let scene = |id, text: &str, subtext: &str, hint: &str, feedback: Option<&str>| {
            SceneDescriptor {
                id,
                text: text.to_string(),
                subtext: subtext.to_string(),
                hint: Some(hint.to_string()),
                feedback: feedback.map(str::to_string),
            }
        };
        let question = |prompt: &str, options: &[&str], answer| QuizQuestion {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
        };

        Story {
            title: "for you".to_string(),
            scenes: vec![
                scene(
                    SceneKind::Drive,
                    "every time i come back, my favorite thing is driving you around.",
                    "my little passenger princess.",
                    "move your mouse to look around",
                    None,
                ),
                scene(
                    SceneKind::Cat,
                    "and somehow, i always end up playing with your cat.",
                    "she tolerates me now. i think.",
                    "click on her to give pets",
                    Some("*purrrrrr*"),
                ),
                scene(
                    SceneKind::Cafe,
                    "we hop from cafe to cafe, pretending we need more coffee.",
                    "we just need more time.",
                    "click the coffee",
                    Some("another cup? always."),
                ),
                scene(
                    SceneKind::Terrace,
                    "those uno nights on the terrace...",
                    "you cheat. i let you win anyway.",
                    "draw a card",
                    Some("wild card: i choose you"),
                ),
                scene(
                    SceneKind::Dinner,
                    "and our never-ending quest for the best paneer chilly.",
                    "still searching. still eating.",
                    "click the dish",
                    Some("this one's pretty good. but we should keep looking. for science."),
                ),
            ],
            quiz: vec![
                question(
                    "who always picks the music in the car?",
                    &["me", "you", "the radio"],
                    1,
                ),
                question(
                    "who wins at uno?",
                    &["me, fair and square", "you, somehow", "the cat"],
                    1,
                ),
                question(
                    "what are we still looking for?",
                    &["the best paneer chilly", "a quiet cafe", "my keys"],
                    0,
                ),
            ],
            card_messages: vec![
                "+4... for my love for you".to_string(),
                "reverse! back to the start of us".to_string(),
                "skip... your turn to do dishes".to_string(),
                "wild card: i choose you".to_string(),
            ],
            finale: FinaleCopy {
                question: "will you be my valentine?".to_string(),
                accepted: "i knew you'd say yes.\n\ni love you.".to_string(),
                accept_label: "yes".to_string(),
                decline_label: "no".to_string(),
                relabelled_decline: "okay fine, yes".to_string(),
            },
        }
    }
}

/// Error loading a story
#[derive(Debug)]
pub enum StoryError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax or shape)
    Parse(ron::error::SpannedError),
    /// Parsed, but the content is unusable
    Invalid(Vec<ValidationError>),
}

impl From<io::Error> for StoryError {
    fn from(e: io::Error) -> Self {
        StoryError::Io(e)
    }
}

impl From<ron::error::SpannedError> for StoryError {
    fn from(e: ron::error::SpannedError) -> Self {
        StoryError::Parse(e)
    }
}

impl std::fmt::Display for StoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryError::Io(e) => write!(f, "IO error: {}", e),
            StoryError::Parse(e) => write!(f, "Parse error: {}", e),
            StoryError::Invalid(errors) => {
                write!(f, "Invalid story ({} problem(s))", errors.len())?;
                for error in errors {
                    write!(f, "; {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for StoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoryError::Io(e) => Some(e),
            StoryError::Parse(e) => Some(e),
            StoryError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let story = Story::builtin();
        assert!(StoryValidator::validate(&story).is_empty());
        assert_eq!(story.scene_count(), 5);
        assert_eq!(story.scene(0).unwrap().id, SceneKind::Drive);
        assert_eq!(story.scene(4).unwrap().id, SceneKind::Dinner);
        assert!(story.scene(5).is_none());
    }

    #[test]
    fn test_ron_roundtrip() {
        let story = Story::builtin();
        let text = story.to_ron_string().unwrap();
        let parsed = Story::from_ron_str(&text).unwrap();
        assert_eq!(parsed, story);
    }

    #[test]
    fn test_minimal_story_uses_defaults() {
        let text = r#"(
            title: "t",
            scenes: [
                (id: Cat, text: "a cat", subtext: "sub"),
            ],
            finale: (
                question: "q",
                accepted: "a",
                accept_label: "y",
                decline_label: "n",
                relabelled_decline: "y2",
            ),
        )"#;
        let story = Story::from_ron_str(text).unwrap();
        assert!(story.quiz.is_empty());
        assert!(story.card_messages.is_empty());
        assert!(story.scenes[0].hint.is_none());
    }

    #[test]
    fn test_parse_error() {
        match Story::from_ron_str("(title: ") {
            Err(StoryError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_story_is_rejected() {
        let mut story = Story::builtin();
        story.scenes[1].text.clear();
        let text = story.to_ron_string().unwrap();
        match Story::from_ron_str(&text) {
            Err(StoryError::Invalid(errors)) => {
                assert_eq!(errors, vec![ValidationError::EmptyText(1)]);
            }
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        match Story::load("definitely/not/here.ron") {
            Err(StoryError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
