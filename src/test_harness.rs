//! Test doubles and harnesses.
//!
//! - [`Journal`] records every call made on the recording collaborators in
//!   one ordered list, so tests can assert cross-collaborator ordering
//!   (listener notification before visibility changes, and so on).
//! - [`AcceptanceTestHarness`] wraps `TuiApp<TestBackend>` for driving the
//!   terminal host with key presses.

#![allow(dead_code)]

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{ButtonCode, IconId, IconSlot};
use crate::state::listener::SearchActionListener;
use crate::state::search_bar::{SearchBar, SearchBarOptions};
use crate::state::surface::{
    Effect, InputSurface, KeyboardController, Region, RenderSurface, TextChangeListener,
    TransitionError, TransitionToken,
};
use crate::view::{TuiApp, TuiError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One observed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StateChanged(bool),
    Confirmed(String),
    ButtonClicked(ButtonCode),
    SetVisible(Region, bool),
    RunTransition(TransitionToken, Vec<Effect>),
    CancelTransition(TransitionToken),
    SetInset(u16),
    SetIcon(IconSlot, IconId),
    SetPlaceholder(Option<String>),
    ShowMenu(Vec<String>),
    RestoreBase(Vec<u8>),
    SetText(String),
    SetHint(Option<String>),
    RequestFocus,
    ClearFocus,
    KeyboardShow,
    KeyboardHide,
}

/// Shared ordered call log.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }
}

/// Rendering surface double.
#[derive(Debug)]
pub struct RecordingSurface {
    journal: Journal,
    visible: Rc<RefCell<HashMap<Region, bool>>>,
    /// When true, `run_transition` reports the animation as unavailable.
    pub fail_animations: bool,
    /// Bytes returned from `save_base_state`.
    pub base_state: Vec<u8>,
}

impl RecordingSurface {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            visible: Rc::default(),
            fail_animations: false,
            base_state: Vec::new(),
        }
    }
}

impl RenderSurface for RecordingSurface {
    fn set_visible(&mut self, region: Region, visible: bool) {
        self.journal.push(Call::SetVisible(region, visible));
        self.visible.borrow_mut().insert(region, visible);
    }

    fn is_visible(&self, region: Region) -> bool {
        self.visible.borrow().get(&region).copied().unwrap_or(false)
    }

    fn run_transition(
        &mut self,
        token: TransitionToken,
        effects: &[Effect],
    ) -> Result<(), TransitionError> {
        if self.fail_animations {
            return Err(TransitionError::ResourceUnavailable(effects[0].animation));
        }
        self.journal
            .push(Call::RunTransition(token, effects.to_vec()));
        Ok(())
    }

    fn cancel_transition(&mut self, token: TransitionToken) {
        self.journal.push(Call::CancelTransition(token));
    }

    fn set_leading_inset(&mut self, cells: u16) {
        self.journal.push(Call::SetInset(cells));
    }

    fn set_icon(&mut self, slot: IconSlot, icon: IconId) {
        self.journal.push(Call::SetIcon(slot, icon));
    }

    fn set_placeholder(&mut self, text: Option<&str>) {
        self.journal
            .push(Call::SetPlaceholder(text.map(str::to_string)));
    }

    fn show_menu(&mut self, items: &[String]) {
        self.journal.push(Call::ShowMenu(items.to_vec()));
    }

    fn save_base_state(&self) -> Vec<u8> {
        self.base_state.clone()
    }

    fn restore_base_state(&mut self, state: &[u8]) {
        self.journal.push(Call::RestoreBase(state.to_vec()));
        self.base_state = state.to_vec();
    }
}

/// Input surface double.
pub struct RecordingInput {
    journal: Journal,
    text: String,
    focused: bool,
    listeners: Vec<TextChangeListener>,
}

impl std::fmt::Debug for RecordingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingInput")
            .field("text", &self.text)
            .field("focused", &self.focused)
            .finish()
    }
}

impl RecordingInput {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            text: String::new(),
            focused: false,
            listeners: Vec::new(),
        }
    }
}

impl InputSurface for RecordingInput {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.journal.push(Call::SetText(text.to_string()));
        if self.text != text {
            self.text = text.to_string();
            for listener in &mut self.listeners {
                listener(&self.text);
            }
        }
    }

    fn set_hint(&mut self, hint: Option<&str>) {
        self.journal.push(Call::SetHint(hint.map(str::to_string)));
    }

    fn request_focus(&mut self) -> bool {
        self.journal.push(Call::RequestFocus);
        let gained = !self.focused;
        self.focused = true;
        gained
    }

    fn clear_focus(&mut self) -> bool {
        self.journal.push(Call::ClearFocus);
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

/// Keyboard double.
#[derive(Debug)]
pub struct RecordingKeyboard {
    journal: Journal,
}

impl KeyboardController for RecordingKeyboard {
    fn show(&mut self) {
        self.journal.push(Call::KeyboardShow);
    }

    fn hide(&mut self) {
        self.journal.push(Call::KeyboardHide);
    }
}

/// Listener double writing into the same journal.
#[derive(Debug)]
pub struct RecordingListener {
    journal: Journal,
}

impl SearchActionListener for RecordingListener {
    fn on_search_state_changed(&mut self, enabled: bool) {
        self.journal.push(Call::StateChanged(enabled));
    }

    fn on_search_confirmed(&mut self, text: &str) {
        self.journal.push(Call::Confirmed(text.to_string()));
    }

    fn on_button_clicked(&mut self, button: ButtonCode) {
        self.journal.push(Call::ButtonClicked(button));
    }
}

pub type RecordingBar = SearchBar<RecordingSurface, RecordingInput, RecordingKeyboard>;

/// Build a bar wired to one journal, with a listener registered.
pub fn recording_bar(options: SearchBarOptions) -> (RecordingBar, Journal) {
    let journal = Journal::default();
    let mut bar = unlistened_bar(options, &journal);
    bar.set_listener(RecordingListener {
        journal: journal.clone(),
    });
    journal.clear();
    (bar, journal)
}

/// Build a bar wired to `journal` without a listener.
pub fn unlistened_bar(options: SearchBarOptions, journal: &Journal) -> RecordingBar {
    SearchBar::new(
        RecordingSurface::new(journal.clone()),
        RecordingInput::new(journal.clone()),
        RecordingKeyboard {
            journal: journal.clone(),
        },
        options,
    )
}

/// Token of the most recent scheduled transition in the journal.
pub fn last_token(journal: &Journal) -> Option<TransitionToken> {
    journal.calls().iter().rev().find_map(|c| match c {
        Call::RunTransition(token, _) => Some(*token),
        _ => None,
    })
}

/// Exactly one of the two containers is visible.
pub fn exactly_one_container_visible<R: RenderSurface>(surface: &R) -> bool {
    surface.is_visible(Region::PlaceholderContainer) != surface.is_visible(Region::InputContainer)
}

/// Convert a ratatui buffer to a string, dropping empty trailing lines.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Test harness for the terminal host.
///
/// Wraps `TuiApp<TestBackend>` to simulate key presses and inspect the
/// rendered screen.
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
}

impl AcceptanceTestHarness {
    /// Harness with a 60x12 terminal and `config`.
    pub fn new(config: ResolvedConfig) -> Result<Self, TuiError> {
        let terminal = Terminal::new(TestBackend::new(60, 12))?;
        let app = TuiApp::new_for_test(terminal, &config, KeyBindings::default());
        Ok(Self { app })
    }

    /// Press a plain key. Returns true if the app asked to quit.
    pub fn press(&mut self, code: KeyCode) -> bool {
        self.app
            .handle_key_test(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Press a Ctrl chord. Returns true if the app asked to quit.
    pub fn press_ctrl(&mut self, ch: char) -> bool {
        self.app
            .handle_key_test(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    /// Type each character of `text`.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    /// Left-click at a screen cell.
    pub fn click(&mut self, column: u16, row: u16) {
        self.app.handle_mouse_test(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    /// Advance animations until idle.
    pub fn settle(&mut self) {
        self.app.settle_test();
    }

    /// Render and return the screen contents.
    pub fn screen(&mut self) -> String {
        self.app.render_test().expect("render should succeed");
        buffer_to_string(self.app.terminal().backend().buffer())
    }

    /// The app under test.
    pub fn app(&self) -> &TuiApp<TestBackend> {
        &self.app
    }

    /// The app under test, mutably.
    pub fn app_mut(&mut self) -> &mut TuiApp<TestBackend> {
        &mut self.app
    }
}
