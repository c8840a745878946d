//! Pointer tracker for mouse and touch input
//!
//! Coordinates:
//! - Window pixels: origin top-left, y down
//! - NDC: origin at the centre, x right, y up, both in [-1, 1]
//!
//! A left click or a touch start counts as a tap. Taps are latched until
//! consumed, so a tap between two frames is never lost.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, TouchPhase};

/// Tracks the pointer position and pending taps
#[derive(Debug, Clone)]
pub struct PointerTracker {
    // Viewport size in physical pixels
    width: f32,
    height: f32,

    // Last known cursor position in physical pixels
    cursor: Option<(f32, f32)>,

    // Tap latched since the last consume, in NDC
    pending_tap: Option<[f32; 2]>,
    button_held: bool,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            cursor: None,
            pending_tap: None,
            button_held: false,
        }
    }

    /// Update the viewport size; zero sizes (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Convert a pixel position to NDC (y up)
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [
            (x / self.width) * 2.0 - 1.0,
            1.0 - (y / self.height) * 2.0,
        ]
    }

    /// Process cursor movement
    pub fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Some((position.x as f32, position.y as f32));
    }

    /// The cursor left the window
    pub fn process_cursor_left(&mut self) {
        self.cursor = None;
        self.button_held = false;
    }

    /// Process mouse button input
    ///
    /// Returns true if the event produced a tap.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        let pressed = state == ElementState::Pressed;
        let was_held = self.button_held;
        self.button_held = pressed;

        if !pressed || was_held {
            return false;
        }
        match self.position_ndc() {
            Some(ndc) => {
                self.pending_tap = Some(ndc);
                true
            }
            None => {
                log::debug!("Press with no known cursor position");
                false
            }
        }
    }

    /// Process a touch event; a touch start is a tap
    pub fn process_touch(&mut self, phase: TouchPhase, location: PhysicalPosition<f64>) -> bool {
        self.process_cursor_moved(location);
        if phase == TouchPhase::Started {
            self.pending_tap = self.position_ndc();
            return self.pending_tap.is_some();
        }
        false
    }

    /// Current pointer position in NDC, if the cursor is over the window
    pub fn position_ndc(&self) -> Option<[f32; 2]> {
        self.cursor.map(|(x, y)| self.to_ndc(x, y))
    }

    /// Pointer position for hover effects, centred when unknown
    pub fn hover_ndc(&self) -> [f32; 2] {
        self.position_ndc().unwrap_or([0.0, 0.0])
    }

    /// Consume the latched tap
    ///
    /// Returns the tap position if one happened since the last consume,
    /// then clears it.
    pub fn consume_tap(&mut self) -> Option<[f32; 2]> {
        self.pending_tap.take()
    }

    /// Viewport aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}
