//! Single-line text field backing the expanded input container.
//!
//! The cursor is a char index, so multi-byte input edits cleanly.

use crate::state::{InputSurface, TextChangeListener};
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Editable text with a cursor, hint and focus flag.
///
/// Text change listeners run after every edit that changes the text.
#[derive(Default)]
pub struct TextField {
    text: String,
    cursor: usize,
    hint: Option<String>,
    focused: bool,
    listeners: Vec<TextChangeListener>,
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("hint", &self.hint)
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TextField {
    /// Empty, unfocused field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hint shown while empty.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Display width of the text before the cursor.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.byte_offset(self.cursor)].width()
    }

    /// Insert `ch` at the cursor and advance it.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        self.text_changed();
    }

    /// Delete the char before the cursor. No-op at the start.
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        self.text_changed();
    }

    /// Move the cursor left, saturating at 0.
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor right, saturating at the end.
    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    fn text_changed(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.text);
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl InputSurface for TextField {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        let changed = self.text != text;
        self.text = text.to_string();
        self.cursor = self.char_len();
        if changed {
            self.text_changed();
        }
    }

    fn set_hint(&mut self, hint: Option<&str>) {
        self.hint = hint.map(str::to_string);
    }

    fn request_focus(&mut self) -> bool {
        let gained = !self.focused;
        self.focused = true;
        gained
    }

    fn clear_focus(&mut self) -> bool {
        let had = self.focused;
        self.focused = false;
        had
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn add_text_change_listener(&mut self, listener: TextChangeListener) {
        self.listeners.push(listener);
    }
}
