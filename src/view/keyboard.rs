//! Terminal stand-in for a virtual keyboard.
//!
//! A terminal always has a keyboard; "showing" it means showing the text
//! cursor in the input field.

use crate::state::KeyboardController;
use tracing::trace;

/// Tracks whether the text cursor should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorKeyboard {
    shown: bool,
}

impl CursorKeyboard {
    /// Hidden keyboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cursor is shown.
    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

impl KeyboardController for CursorKeyboard {
    fn show(&mut self) {
        trace!("Keyboard shown");
        self.shown = true;
    }

    fn hide(&mut self) {
        trace!("Keyboard hidden");
        self.shown = false;
    }
}
