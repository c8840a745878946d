//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to the sequencer's inputs (continue, quiz answers,
//! finale choices) plus a couple of window actions. Pointer input does not
//! go through here; it goes to the `PointerTracker`.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Continue to the next step (Enter, Space)
    Continue,
    /// Pick the quiz option at this zero-based index (1-9)
    Answer(usize),
    /// Start the quiz over (R key)
    RestartQuiz,
    /// Say yes at the finale (Y key)
    Accept,
    /// Use the finale's decline control (N key)
    Decline,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Exit application (Escape)
    Exit,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases and unmapped keys
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => Some(InputAction::Continue),
            KeyCode::KeyR => Some(InputAction::RestartQuiz),
            KeyCode::KeyY => Some(InputAction::Accept),
            KeyCode::KeyN => Some(InputAction::Decline),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => Self::answer_index(key).map(InputAction::Answer),
        }
    }

    /// Zero-based option index for the number keys 1-9
    fn answer_index(key: KeyCode) -> Option<usize> {
        let index = match key {
            KeyCode::Digit1 | KeyCode::Numpad1 => 0,
            KeyCode::Digit2 | KeyCode::Numpad2 => 1,
            KeyCode::Digit3 | KeyCode::Numpad3 => 2,
            KeyCode::Digit4 | KeyCode::Numpad4 => 3,
            KeyCode::Digit5 | KeyCode::Numpad5 => 4,
            KeyCode::Digit6 | KeyCode::Numpad6 => 5,
            KeyCode::Digit7 | KeyCode::Numpad7 => 6,
            KeyCode::Digit8 | KeyCode::Numpad8 => 7,
            KeyCode::Digit9 | KeyCode::Numpad9 => 8,
            _ => return None,
        };
        Some(index)
    }
}
