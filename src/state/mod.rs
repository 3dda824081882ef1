//! Search bar interaction state (pure core).
//!
//! The controller and transition player only talk to the outside world
//! through the collaborator traits in [`surface`] and the listener in
//! [`listener`], so everything here is testable without a terminal.

pub mod listener;
pub mod search_bar;
pub mod surface;
pub mod transition;

pub use listener::{ListenerSlot, SearchActionListener, SearchEvent};
pub use search_bar::{SearchBar, SearchBarOptions, SearchBarState, NAV_ICON_INSET};
pub use surface::{
    Animation, Effect, InputSurface, KeyboardController, Motion, Region, RenderSurface,
    TextChangeListener, TransitionError, TransitionToken,
};
pub use transition::{Direction, PlayOutcome, TransitionPlayer};
