//! Host-registered observer for search bar events.

use crate::model::ButtonCode;
use std::sync::mpsc::Sender;

/// Callbacks a host application receives from the search bar.
pub trait SearchActionListener {
    /// The bar started expanding (`true`) or collapsing (`false`).
    fn on_search_state_changed(&mut self, enabled: bool);

    /// The user submitted `text` from the input surface.
    fn on_search_confirmed(&mut self, text: &str);

    /// The speech or navigation button was tapped.
    fn on_button_clicked(&mut self, button: ButtonCode);
}

/// A listener notification as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// See [`SearchActionListener::on_search_state_changed`].
    StateChanged(bool),
    /// See [`SearchActionListener::on_search_confirmed`].
    Confirmed(String),
    /// See [`SearchActionListener::on_button_clicked`].
    ButtonClicked(ButtonCode),
}

/// Forwards every notification into a channel. Send errors (receiver gone)
/// are ignored.
impl SearchActionListener for Sender<SearchEvent> {
    fn on_search_state_changed(&mut self, enabled: bool) {
        let _ = self.send(SearchEvent::StateChanged(enabled));
    }

    fn on_search_confirmed(&mut self, text: &str) {
        let _ = self.send(SearchEvent::Confirmed(text.to_string()));
    }

    fn on_button_clicked(&mut self, button: ButtonCode) {
        let _ = self.send(SearchEvent::ButtonClicked(button));
    }
}

/// Optional single listener slot.
///
/// All dispatch goes through [`ListenerSlot::notify`], which is the only
/// place that checks whether a listener is registered.
#[derive(Default)]
pub struct ListenerSlot {
    listener: Option<Box<dyn SearchActionListener>>,
}

impl ListenerSlot {
    /// Register `listener`, replacing any previous one.
    pub fn set(&mut self, listener: Box<dyn SearchActionListener>) {
        self.listener = Some(listener);
    }

    /// Remove the listener.
    pub fn clear(&mut self) {
        self.listener = None;
    }

    /// Whether a listener is registered.
    pub fn is_set(&self) -> bool {
        self.listener.is_some()
    }

    /// Deliver `event`. Returns false when no listener is registered.
    pub fn notify(&mut self, event: SearchEvent) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        match event {
            SearchEvent::StateChanged(enabled) => listener.on_search_state_changed(enabled),
            SearchEvent::Confirmed(text) => listener.on_search_confirmed(&text),
            SearchEvent::ButtonClicked(button) => listener.on_button_clicked(button),
        }
        true
    }
}

impl std::fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("registered", &self.is_set())
            .finish()
    }
}
