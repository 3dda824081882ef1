//! Search bar state controller.
//!
//! Owns the single source of truth for the bar (`enabled`, `speech_mode`,
//! icons, hint) and drives the host collaborators from it:
//!
//! - listener notifications are sent synchronously when a transition is
//!   requested, before anything is scheduled;
//! - final visibility and focus are applied only when the transition
//!   completes (or immediately, if it could not be animated);
//! - instance state is saved to and restored from a [`PersistedSnapshot`].

use crate::model::{ButtonCode, IconId, IconSlot, PersistedSnapshot, SnapshotError, TapTarget};
use crate::state::listener::{ListenerSlot, SearchActionListener, SearchEvent};
use crate::state::surface::{InputSurface, KeyboardController, Region, RenderSurface, TransitionToken};
use crate::state::transition::{Direction, PlayOutcome, TransitionPlayer};
use tracing::{debug, warn};

/// Inset applied to the input container when the navigation icon is shown.
pub const NAV_ICON_INSET: u16 = 3;

/// Initial configuration of a search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarOptions {
    /// Hint shown in the empty input field.
    pub hint: Option<String>,
    /// Prompt shown while collapsed.
    pub placeholder: Option<String>,
    /// Start in speech mode.
    pub speech_mode: bool,
    /// Show the navigation icon.
    pub nav_button_enabled: bool,
    /// Search icon; [`IconId::UNSET`] selects the default.
    pub search_icon: IconId,
    /// Navigation icon; [`IconId::UNSET`] selects the default.
    pub nav_icon: IconId,
    /// Overflow menu items. Empty means no menu.
    pub menu: Vec<String>,
    /// Animate transitions.
    pub animations_enabled: bool,
}

impl Default for SearchBarOptions {
    fn default() -> Self {
        Self {
            hint: None,
            placeholder: None,
            speech_mode: false,
            nav_button_enabled: false,
            search_icon: IconId::UNSET,
            nav_icon: IconId::UNSET,
            menu: Vec::new(),
            animations_enabled: true,
        }
    }
}

/// In-memory widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarState {
    /// Input container expanded and interactive.
    pub enabled: bool,
    /// Leading icon acts as a speech trigger.
    pub speech_mode: bool,
    /// Assigned navigation icon.
    pub nav_icon: IconId,
    /// Assigned search icon.
    pub search_icon: IconId,
    /// Hint shown in the empty input field.
    pub hint: Option<String>,
    /// Prompt shown while collapsed.
    pub placeholder: Option<String>,
    /// Navigation icon shown.
    pub nav_button_enabled: bool,
    /// Inflated overflow menu items.
    pub menu: Vec<String>,
}

/// Collapsible search bar.
///
/// Generic over its host collaborators; all methods run on the caller's
/// thread and take `&mut self`, so completion handling and visibility
/// changes can never race.
pub struct SearchBar<R, I, K> {
    state: SearchBarState,
    render: R,
    input: I,
    keyboard: K,
    player: TransitionPlayer,
    listener: ListenerSlot,
}

impl<R, I, K> SearchBar<R, I, K>
where
    R: RenderSurface,
    I: InputSurface,
    K: KeyboardController,
{
    /// Build a collapsed search bar and apply `options` to the surfaces.
    pub fn new(render: R, input: I, keyboard: K, options: SearchBarOptions) -> Self {
        let mut bar = Self {
            state: SearchBarState {
                enabled: false,
                speech_mode: options.speech_mode,
                nav_icon: options.nav_icon,
                search_icon: options.search_icon,
                hint: options.hint,
                placeholder: options.placeholder,
                nav_button_enabled: options.nav_button_enabled,
                menu: options.menu,
            },
            render,
            input,
            keyboard,
            player: TransitionPlayer::new(options.animations_enabled),
            listener: ListenerSlot::default(),
        };
        bar.show_collapsed_end_state();
        bar.post_setup();
        bar
    }

    // ===== Transitions =====

    /// Expand the bar.
    ///
    /// Sets `enabled`, notifies the listener, then schedules the expand
    /// transition. Focus is requested only once the transition completes.
    /// Calling this while already expanded restarts the transition.
    pub fn expand(&mut self) {
        debug!(was_enabled = self.state.enabled, "Expanding search bar");
        self.state.enabled = true;
        self.notify(SearchEvent::StateChanged(true));
        self.play(Direction::Expand);
    }

    /// Collapse the bar.
    ///
    /// Clears `enabled`, notifies the listener, then schedules the collapse
    /// transition. Text is cleared once the transition completes.
    pub fn collapse(&mut self) {
        debug!(was_enabled = self.state.enabled, "Collapsing search bar");
        self.state.enabled = false;
        self.notify(SearchEvent::StateChanged(false));
        self.play(Direction::Collapse);
    }

    /// Completion signal from the host's animation mechanism.
    ///
    /// Returns true if the token matched the in-flight transition and the
    /// end state was applied. Stale or repeated tokens are ignored.
    pub fn on_transition_finished(&mut self, token: TransitionToken) -> bool {
        match self.player.finish(token) {
            Some(direction) => {
                self.on_transition_complete(direction);
                true
            }
            None => false,
        }
    }

    /// Direction of the transition currently animating, if any.
    pub fn transition_in_flight(&self) -> Option<Direction> {
        self.player.in_flight()
    }

    /// Animate future transitions or apply them instantly.
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.player.set_animations_enabled(enabled);
    }

    fn play(&mut self, direction: Direction) {
        match self.player.play(&mut self.render, direction) {
            PlayOutcome::Scheduled(_) => {}
            PlayOutcome::Instant(direction) => self.on_transition_complete(direction),
        }
    }

    fn on_transition_complete(&mut self, direction: Direction) {
        debug!(?direction, enabled = self.state.enabled, "Transition complete");
        match direction {
            Direction::Collapse => {
                self.show_collapsed_end_state();
                self.input.set_text("");
                if self.input.clear_focus() {
                    self.on_focus_changed(false);
                }
            }
            Direction::Expand => {
                self.show_expanded_end_state();
                if self.input.request_focus() {
                    self.on_focus_changed(true);
                }
            }
        }
    }

    fn show_expanded_end_state(&mut self) {
        self.render.set_visible(Region::PlaceholderContainer, false);
        self.render.set_visible(Region::InputContainer, true);
        self.render.set_visible(Region::LeadingIcon, false);
    }

    fn show_collapsed_end_state(&mut self) {
        self.render.set_visible(Region::InputContainer, false);
        self.render.set_visible(Region::PlaceholderContainer, true);
        self.render.set_visible(Region::LeadingIcon, true);
    }

    // ===== Input signals =====

    /// Back navigation. Collapses and returns true only while expanded;
    /// otherwise returns false and the host should handle the signal.
    pub fn on_back_signal(&mut self) -> bool {
        if self.state.enabled {
            self.collapse();
            true
        } else {
            false
        }
    }

    /// Submit from the input surface. Always consumed.
    pub fn on_confirm(&mut self, text: &str) -> bool {
        self.notify(SearchEvent::Confirmed(text.to_string()));
        true
    }

    /// Submit the input surface's current text. Always consumed.
    pub fn confirm(&mut self) -> bool {
        let text = self.input.text();
        self.on_confirm(&text)
    }

    /// Speech or navigation button tapped. No-op without a listener.
    pub fn on_auxiliary_tap(&mut self, button: ButtonCode) {
        self.notify(SearchEvent::ButtonClicked(button));
    }

    /// Route a tap on part of the bar.
    ///
    /// A bar tap only expands a collapsed bar, so when the bar and the
    /// collapse arrow are both hit in one frame the arrow wins.
    pub fn on_tap(&mut self, target: TapTarget) {
        match target {
            TapTarget::Bar => {
                if !self.state.enabled {
                    self.expand();
                }
            }
            TapTarget::CollapseArrow => {
                if self.state.enabled {
                    self.collapse();
                }
            }
            TapTarget::LeadingIcon => {
                if self.state.speech_mode {
                    self.on_auxiliary_tap(ButtonCode::Speech);
                }
            }
            TapTarget::NavIcon => {
                if self.state.nav_button_enabled {
                    self.on_auxiliary_tap(ButtonCode::Navigation);
                }
            }
            TapTarget::Clear => self.input.set_text(""),
            TapTarget::Menu => {
                if !self.state.menu.is_empty() {
                    self.render.show_menu(&self.state.menu);
                }
            }
        }
    }

    /// Focus change reported by the input surface.
    pub fn on_focus_changed(&mut self, has_focus: bool) {
        if has_focus {
            self.keyboard.show();
        } else {
            self.keyboard.hide();
        }
    }

    // ===== Listener =====

    /// Register the listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl SearchActionListener + 'static) {
        self.listener.set(Box::new(listener));
    }

    /// Remove the listener.
    pub fn clear_listener(&mut self) {
        self.listener.clear();
    }

    fn notify(&mut self, event: SearchEvent) {
        if !self.listener.notify(event.clone()) {
            debug!(?event, "No listener registered");
        }
    }

    // ===== Persistence =====

    /// Capture the current state, including the surface's base state.
    pub fn save(&self) -> PersistedSnapshot {
        PersistedSnapshot::new(
            self.render.save_base_state(),
            self.state.enabled,
            self.state.speech_mode,
            self.state.search_icon,
            self.state.nav_icon,
            self.state.hint.clone(),
        )
    }

    /// Capture and encode the current state.
    ///
    /// # Errors
    ///
    /// Fails only if the surface's base state or the hint is too long to
    /// encode.
    pub fn save_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        self.save().encode()
    }

    /// Apply a snapshot without animating or notifying.
    ///
    /// The surface's base state is restored first; container visibility is
    /// decided afterwards so the base state cannot overwrite it. Focus and
    /// text then follow the restored state: an expanded bar takes focus, a
    /// collapsed one is emptied and unfocused.
    pub fn restore(&mut self, snapshot: &PersistedSnapshot) {
        self.player.cancel(&mut self.render);
        self.render.restore_base_state(snapshot.parent_state());

        self.state.enabled = snapshot.search_bar_visible();
        self.state.speech_mode = snapshot.speech_mode();
        self.state.search_icon = snapshot.search_icon();
        self.state.nav_icon = snapshot.nav_icon();
        self.state.hint = snapshot.hint().map(str::to_string);

        if self.state.enabled {
            self.show_expanded_end_state();
            if self.input.request_focus() {
                self.on_focus_changed(true);
            }
        } else {
            self.show_collapsed_end_state();
            self.input.set_text("");
            if self.input.clear_focus() {
                self.on_focus_changed(false);
            }
        }
        self.post_setup();
        debug!(enabled = self.state.enabled, "Restored search bar state");
    }

    /// Decode and apply a snapshot.
    ///
    /// # Errors
    ///
    /// On malformed input the bar is reset to its default collapsed state
    /// and the decode error is returned.
    pub fn restore_bytes(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        match PersistedSnapshot::decode(bytes) {
            Ok(snapshot) => {
                self.restore(&snapshot);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Discarding malformed search bar state");
                self.reset();
                Err(err)
            }
        }
    }

    fn reset(&mut self) {
        self.player.cancel(&mut self.render);
        self.state.enabled = false;
        self.show_collapsed_end_state();
        self.input.set_text("");
        if self.input.clear_focus() {
            self.on_focus_changed(false);
        }
    }

    // ===== Properties =====

    /// Re-apply icons, hint, placeholder and button configuration.
    fn post_setup(&mut self) {
        let speech_mode = self.state.speech_mode;
        self.set_speech_mode(speech_mode);
        let nav_icon = self.state.nav_icon;
        self.set_navigation_icon(nav_icon);
        self.input.set_hint(self.state.hint.as_deref());
        self.render.set_placeholder(self.state.placeholder.as_deref());
        let nav_button_enabled = self.state.nav_button_enabled;
        self.set_nav_button_enabled(nav_button_enabled);
        self.render
            .set_visible(Region::MenuIcon, !self.state.menu.is_empty());
    }

    /// Whether the bar is expanded (or expanding).
    pub fn is_search_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Whether the leading icon is a speech trigger.
    pub fn is_speech_mode_enabled(&self) -> bool {
        self.state.speech_mode
    }

    /// Switch the leading icon between search and microphone.
    pub fn set_speech_mode(&mut self, speech_mode: bool) {
        self.state.speech_mode = speech_mode;
        let icon = if speech_mode {
            IconId::MICROPHONE
        } else {
            self.state.search_icon.or(IconId::MAGNIFY)
        };
        self.render.set_icon(IconSlot::Leading, icon);
    }

    /// Assign the search icon. Shown immediately unless in speech mode.
    pub fn set_search_icon(&mut self, icon: IconId) {
        self.state.search_icon = icon;
        if !self.state.speech_mode {
            self.render.set_icon(IconSlot::Leading, icon.or(IconId::MAGNIFY));
        }
    }

    /// Assign the navigation icon.
    pub fn set_navigation_icon(&mut self, icon: IconId) {
        self.state.nav_icon = icon;
        self.render
            .set_icon(IconSlot::Navigation, icon.or(IconId::MENU));
    }

    /// Set or clear the input hint.
    pub fn set_hint(&mut self, hint: Option<String>) {
        self.input.set_hint(hint.as_deref());
        self.state.hint = hint;
    }

    /// Set or clear the collapsed prompt.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.render.set_placeholder(placeholder.as_deref());
        self.state.placeholder = placeholder;
    }

    /// Show or hide the navigation icon.
    ///
    /// While shown, the input container is inset to make room for it and
    /// the collapse arrow is hidden.
    pub fn set_nav_button_enabled(&mut self, enabled: bool) {
        self.state.nav_button_enabled = enabled;
        self.render.set_visible(Region::NavIcon, enabled);
        self.render.set_visible(Region::CollapseArrow, !enabled);
        self.render
            .set_leading_inset(if enabled { NAV_ICON_INSET } else { 0 });
    }

    /// Install overflow menu items. An empty list removes the menu.
    pub fn inflate_menu(&mut self, items: Vec<String>) {
        self.render.set_visible(Region::MenuIcon, !items.is_empty());
        self.state.menu = items;
    }

    /// Overflow menu items.
    pub fn menu(&self) -> &[String] {
        &self.state.menu
    }

    /// Current input text.
    pub fn text(&self) -> String {
        self.input.text()
    }

    /// Replace the input text.
    pub fn set_text(&mut self, text: &str) {
        self.input.set_text(text);
    }

    /// Observe every change to the input text.
    pub fn add_text_change_listener(&mut self, listener: impl FnMut(&str) + 'static) {
        self.input.add_text_change_listener(Box::new(listener));
    }

    /// Full widget state.
    pub fn state(&self) -> &SearchBarState {
        &self.state
    }

    // ===== Collaborators =====

    /// Rendering surface.
    pub fn render(&self) -> &R {
        &self.render
    }

    /// Rendering surface, mutably (for host-driven animation ticks).
    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    /// Input surface.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Input surface, mutably (for host-driven text editing).
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Keyboard controller.
    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }
}

impl<R, I, K> std::fmt::Debug for SearchBar<R, I, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBar")
            .field("state", &self.state)
            .field("player", &self.player)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "search_bar_tests.rs"]
mod tests;
