//! Terminal host for the search bar (impure shell).
//!
//! Implements the collaborator traits on terminal-backed types, draws the
//! bar with ratatui and runs the crossterm event loop that turns key presses
//! and mouse clicks into controller calls.

mod keyboard;
mod search_bar_view;
mod surface;
mod text_field;

#[cfg(test)]
mod key_wiring_tests;

pub use keyboard::CursorKeyboard;
pub use search_bar_view::{MenuView, SearchBarView};
pub use surface::{MenuPopup, TerminalSurface};
pub use text_field::TextField;

use crate::config::{BindingMode, KeyBindings, ResolvedConfig};
use crate::model::{KeyAction, SnapshotError, TapTarget};
use crate::state::{InputSurface, SearchBar, SearchEvent};
use crossterm::{
    ExecutableCommand,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Search bar wired to the terminal collaborators.
pub type TerminalSearchBar = SearchBar<TerminalSurface, TextField, CursorKeyboard>;

/// Poll interval while a transition is animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Poll interval while idle.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Listener events kept on screen.
const EVENT_LOG_CAPACITY: usize = 64;

const HELP_TEXT: &str =
    "Enter/: expand  Esc: back  ^B arrow  ^V speech  ^N nav  ^L clear  ^O menu  ^S save  ^R restore  ^T speech mode  q: quit";

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Saved widget state could not be decoded
    #[error("Saved state is invalid: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    bar: TerminalSearchBar,
    events: Receiver<SearchEvent>,
    event_log: VecDeque<String>,
    status: Option<String>,
    key_bindings: KeyBindings,
    state_file: PathBuf,
    /// Last rendered bar area (for mouse hit testing)
    last_bar_area: Option<Rect>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, config, KeyBindings::default()))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Polls quickly while a transition is
    /// animating and slowly otherwise.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let mut last_tick = Instant::now();
        self.draw()?;

        loop {
            let timeout = if self.bar.render().is_animating() {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            let now = Instant::now();
            self.advance(now.duration_since(last_tick));
            last_tick = now;
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    fn with_terminal(terminal: Terminal<B>, config: &ResolvedConfig, key_bindings: KeyBindings) -> Self {
        let (sender, events) = mpsc::channel();
        let mut bar = SearchBar::new(
            TerminalSurface::new(config.animation_catalog()),
            TextField::new(),
            CursorKeyboard::new(),
            config.search_bar_options(),
        );
        bar.set_listener(sender);

        Self {
            terminal,
            bar,
            events,
            event_log: VecDeque::new(),
            status: None,
            key_bindings,
            state_file: config.state_file_path.clone(),
            last_bar_area: None,
        }
    }

    /// The search bar being hosted.
    pub fn bar(&self) -> &TerminalSearchBar {
        &self.bar
    }

    /// Listener events received so far, oldest first.
    pub fn event_log(&self) -> impl Iterator<Item = &str> {
        self.event_log.iter().map(String::as_str)
    }

    /// Last status message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Write the widget state to the state file.
    pub fn save_state(&self) -> Result<(), TuiError> {
        write_state(&self.state_file, &self.bar.save_bytes()?)?;
        info!(path = %self.state_file.display(), "Saved search bar state");
        Ok(())
    }

    /// Restore the widget state from the state file.
    ///
    /// Returns `Ok(false)` when there is no state file. A corrupt file resets
    /// the bar to its collapsed default and reports the decode error.
    pub fn restore_state(&mut self) -> Result<bool, TuiError> {
        let bytes = match std::fs::read(&self.state_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.bar.restore_bytes(&bytes)?;
        info!(path = %self.state_file.display(), "Restored search bar state");
        Ok(true)
    }

    /// Advance animations by `elapsed` and deliver a finished transition.
    fn advance(&mut self, elapsed: Duration) {
        if let Some(token) = self.bar.render_mut().tick(elapsed) {
            if !self.bar.on_transition_finished(token) {
                debug!(token = token.get(), "Ignored stale transition");
            }
        }
        self.drain_events();
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.bar.render().menu().is_some() {
            self.handle_menu_key(key);
            return false;
        }

        let mode = if self.bar.is_search_enabled() {
            BindingMode::Expanded
        } else {
            BindingMode::Collapsed
        };

        let quit = match self.key_bindings.get(key, mode) {
            Some(action) => self.apply_action(action),
            None => {
                self.type_char(key, mode);
                false
            }
        };
        self.drain_events();
        quit
    }

    /// Returns true if app should quit
    fn apply_action(&mut self, action: KeyAction) -> bool {
        debug!(?action, "Key action");
        match action {
            KeyAction::TapBar => self.bar.on_tap(TapTarget::Bar),
            KeyAction::TapCollapseArrow => self.bar.on_tap(TapTarget::CollapseArrow),
            KeyAction::TapLeadingIcon => self.bar.on_tap(TapTarget::LeadingIcon),
            KeyAction::TapNavIcon => self.bar.on_tap(TapTarget::NavIcon),
            KeyAction::TapClear => self.bar.on_tap(TapTarget::Clear),
            KeyAction::TapMenu => self.bar.on_tap(TapTarget::Menu),
            KeyAction::Confirm => {
                self.bar.confirm();
            }
            KeyAction::Back => {
                // Unconsumed back leaves the app.
                if !self.bar.on_back_signal() {
                    return true;
                }
            }
            KeyAction::DeleteBackward => self.bar.input_mut().delete_backward(),
            KeyAction::CursorLeft => self.bar.input_mut().cursor_left(),
            KeyAction::CursorRight => self.bar.input_mut().cursor_right(),
            KeyAction::SaveState => {
                self.status = Some(match self.save_state() {
                    Ok(()) => format!("Saved to {}", self.state_file.display()),
                    Err(e) => {
                        warn!(error = %e, "Save failed");
                        format!("Save failed: {e}")
                    }
                });
            }
            KeyAction::RestoreState => {
                self.status = Some(match self.restore_state() {
                    Ok(true) => "Restored".to_string(),
                    Ok(false) => "Nothing saved yet".to_string(),
                    Err(e) => {
                        warn!(error = %e, "Restore failed");
                        format!("Restore failed: {e}")
                    }
                });
            }
            KeyAction::ToggleSpeechMode => {
                let speech = !self.bar.is_speech_mode_enabled();
                self.bar.set_speech_mode(speech);
            }
            KeyAction::Quit => return true,
        }
        false
    }

    /// Type an unbound printable key into the focused field.
    fn type_char(&mut self, key: KeyEvent, mode: BindingMode) {
        if mode != BindingMode::Expanded || !self.bar.input().has_focus() {
            return;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }
        if let KeyCode::Char(ch) = key.code {
            self.bar.input_mut().insert_char(ch);
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let surface = self.bar.render_mut();
        match key.code {
            KeyCode::Up => {
                if let Some(menu) = surface.menu_mut() {
                    menu.select_prev();
                }
            }
            KeyCode::Down => {
                if let Some(menu) = surface.menu_mut() {
                    menu.select_next();
                }
            }
            KeyCode::Enter => {
                if let Some(item) = surface.menu().and_then(MenuPopup::selected_item) {
                    info!(item, "Menu item selected");
                    self.status = Some(format!("Menu: {item}"));
                }
                surface.dismiss_menu();
            }
            _ => surface.dismiss_menu(),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.bar.render().menu().is_some() {
            self.bar.render_mut().dismiss_menu();
            return;
        }
        let Some(area) = self.last_bar_area else {
            return;
        };
        let position = Position::new(mouse.column, mouse.row);
        if let Some(target) = SearchBarView::new(&self.bar).hit_test(area, position) {
            debug!(?target, "Mouse tap");
            self.bar.on_tap(target);
            self.drain_events();
        }
    }

    /// Move listener events from the channel into the on-screen log.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let line = describe(&event);
            debug!(%line, "Listener event");
            if self.event_log.len() == EVENT_LOG_CAPACITY {
                self.event_log.pop_front();
            }
            self.event_log.push_back(line);
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let bar = &self.bar;
        let event_log = &self.event_log;
        let footer = self.status.as_deref().unwrap_or(HELP_TEXT);
        let mut bar_area = Rect::default();

        self.terminal.draw(|frame| {
            let [top, log_area, help_area] = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(frame.area());
            bar_area = top;

            let view = SearchBarView::new(bar);
            let cursor = view.cursor_position(top);
            frame.render_widget(view, top);

            let lines: Vec<Line> = event_log
                .iter()
                .rev()
                .take(usize::from(log_area.height.saturating_sub(2)))
                .rev()
                .map(|line| Line::from(line.as_str()))
                .collect();
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Events")),
                log_area,
            );
            frame.render_widget(
                Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
                help_area,
            );

            if let Some(menu) = bar.render().menu() {
                let popup = MenuView::new(menu);
                let area = popup.area(top, frame.area());
                frame.render_widget(popup, area);
            }
            if let Some(position) = cursor {
                frame.set_cursor_position(position);
            }
        })?;

        self.last_bar_area = Some(bar_area);
        Ok(())
    }
}

fn describe(event: &SearchEvent) -> String {
    match event {
        SearchEvent::StateChanged(true) => "search expanded".to_string(),
        SearchEvent::StateChanged(false) => "search collapsed".to_string(),
        SearchEvent::Confirmed(text) => format!("confirmed \"{text}\""),
        SearchEvent::ButtonClicked(button) => format!("{button} button clicked"),
    }
}

fn write_state(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)
}

// ===== Test Helpers =====

#[cfg(test)]
#[allow(dead_code)]
impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Create TuiApp for testing without touching the real terminal.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        config: &ResolvedConfig,
        key_bindings: KeyBindings,
    ) -> Self {
        Self::with_terminal(terminal, config, key_bindings)
    }

    /// Handle a single keyboard event. Returns true if app should quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    /// Handle a single mouse event.
    pub(crate) fn handle_mouse_test(&mut self, mouse: MouseEvent) {
        self.handle_mouse(mouse)
    }

    /// Run animations to completion.
    pub(crate) fn settle_test(&mut self) {
        for _ in 0..8 {
            if !self.bar.render().is_animating() {
                break;
            }
            self.advance(Duration::from_secs(60));
        }
    }

    /// Advance animations by `elapsed`.
    pub(crate) fn advance_test(&mut self, elapsed: Duration) {
        self.advance(elapsed);
    }

    /// Render a single frame.
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    /// Get reference to terminal for buffer inspection.
    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI application
///
/// Restores saved state first unless `fresh` is set, and saves state on
/// exit. Logging must be initialized by the caller.
pub fn run(config: &ResolvedConfig, fresh: bool) -> Result<(), TuiError> {
    let mut app = TuiApp::new(config)?;

    if !fresh {
        if let Err(e) = app.restore_state() {
            warn!(error = %e, "Could not restore saved state");
        }
    }

    // Run the app and ensure cleanup happens even on error
    let result = app.run();
    let saved = app.save_state();

    // Always restore terminal state
    restore_terminal()?;

    result?;
    saved
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
