//! Domain-level keyboard actions independent of key bindings.

/// Actions the terminal host maps keys onto.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Taps
    /// Tap the bar body (expands while collapsed). Default: Enter or / while collapsed
    TapBar,
    /// Tap the back arrow inside the input container. Default: Ctrl+b
    TapCollapseArrow,
    /// Tap the leading search/microphone icon. Default: Ctrl+v
    TapLeadingIcon,
    /// Tap the navigation icon. Default: Ctrl+n
    TapNavIcon,
    /// Tap the clear-text button. Default: Ctrl+l
    TapClear,
    /// Tap the overflow menu icon. Default: Ctrl+o
    TapMenu,

    // Input surface
    /// Submit the current text. Default: Enter while expanded
    Confirm,
    /// Back navigation signal. Default: Esc
    Back,
    /// Delete the character before the cursor. Default: Backspace
    DeleteBackward,
    /// Move the text cursor left. Default: ←
    CursorLeft,
    /// Move the text cursor right. Default: →
    CursorRight,

    // Lifecycle
    /// Save instance state to the state file. Default: Ctrl+s
    SaveState,
    /// Restore instance state from the state file. Default: Ctrl+r
    RestoreState,
    /// Toggle speech mode. Default: Ctrl+t
    ToggleSpeechMode,

    /// Quit the host application. Default: Ctrl+c, or q while collapsed
    Quit,
}
