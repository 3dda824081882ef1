//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Which set of bindings applies.
///
/// While the bar is expanded, plain characters belong to the text field, so
/// most actions are bound to Ctrl chords that work in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// Bar collapsed; plain keys may be bound.
    Collapsed,
    /// Bar expanded; unbound printable keys are typed into the field.
    Expanded,
}

/// Maps keyboard events to domain actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    shared: HashMap<KeyEvent, KeyAction>,
    collapsed: HashMap<KeyEvent, KeyAction>,
    expanded: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event in `mode`.
    ///
    /// Mode-specific bindings win over shared ones.
    pub fn get(&self, key: KeyEvent, mode: BindingMode) -> Option<KeyAction> {
        let specific = match mode {
            BindingMode::Collapsed => &self.collapsed,
            BindingMode::Expanded => &self.expanded,
        };
        let key = normalize(key);
        specific
            .get(&key)
            .or_else(|| self.shared.get(&key))
            .copied()
    }
}

/// Drop event kind/state so lookups match regardless of how the terminal
/// reported the press.
fn normalize(key: KeyEvent) -> KeyEvent {
    KeyEvent::new(key.code, key.modifiers)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut shared = HashMap::new();

        // Taps
        shared.insert(ctrl('b'), KeyAction::TapCollapseArrow);
        shared.insert(ctrl('v'), KeyAction::TapLeadingIcon);
        shared.insert(ctrl('n'), KeyAction::TapNavIcon);
        shared.insert(ctrl('l'), KeyAction::TapClear);
        shared.insert(ctrl('o'), KeyAction::TapMenu);

        // Lifecycle
        shared.insert(ctrl('s'), KeyAction::SaveState);
        shared.insert(ctrl('r'), KeyAction::RestoreState);
        shared.insert(ctrl('t'), KeyAction::ToggleSpeechMode);

        // Back and quit
        shared.insert(plain(KeyCode::Esc), KeyAction::Back);
        shared.insert(ctrl('c'), KeyAction::Quit);

        let mut collapsed = HashMap::new();
        collapsed.insert(plain(KeyCode::Enter), KeyAction::TapBar);
        collapsed.insert(plain(KeyCode::Char('/')), KeyAction::TapBar);
        collapsed.insert(plain(KeyCode::Char('q')), KeyAction::Quit);

        let mut expanded = HashMap::new();
        expanded.insert(plain(KeyCode::Enter), KeyAction::Confirm);
        expanded.insert(plain(KeyCode::Backspace), KeyAction::DeleteBackward);
        expanded.insert(plain(KeyCode::Left), KeyAction::CursorLeft);
        expanded.insert(plain(KeyCode::Right), KeyAction::CursorRight);

        Self {
            shared,
            collapsed,
            expanded,
        }
    }
}
