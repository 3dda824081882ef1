//! Host collaborator contracts.
//!
//! The controller never draws, edits text or talks to a keyboard directly.
//! It drives these traits, and the host (the terminal surfaces in
//! [`crate::view`], or a test double) implements them.

use crate::model::{IconId, IconSlot};
use std::fmt;
use thiserror::Error;

/// Independently visible regions of the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Region {
    /// Collapsed placeholder/prompt container.
    PlaceholderContainer,
    /// Expanded input container (text field, back arrow, clear button).
    InputContainer,
    /// Search or microphone icon.
    LeadingIcon,
    /// Back arrow that collapses the bar.
    CollapseArrow,
    /// Navigation icon.
    NavIcon,
    /// Overflow menu icon.
    MenuIcon,
}

/// Named animation resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Slide in from the left while fading in.
    FadeInLeft,
    /// Slide out to the left while fading out.
    FadeOutLeft,
    /// Slide in from the right while fading in.
    FadeInRight,
    /// Fade out in place.
    FadeOut,
}

impl Animation {
    /// Resource name as it appears in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::FadeInLeft => "fade_in_left",
            Self::FadeOutLeft => "fade_out_left",
            Self::FadeInRight => "fade_in_right",
            Self::FadeOut => "fade_out",
        }
    }

    /// All animation resources the widget uses.
    pub const ALL: [Animation; 4] = [
        Self::FadeInLeft,
        Self::FadeOutLeft,
        Self::FadeInRight,
        Self::FadeOut,
    ];
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an effect brings a region into view or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Region becomes visible.
    Reveal,
    /// Region is leaving.
    Conceal,
}

/// One animated effect applied to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    /// Region being animated.
    pub region: Region,
    /// Animation resource to play.
    pub animation: Animation,
    /// Direction of the effect.
    pub motion: Motion,
}

/// Identifies one scheduled transition.
///
/// Tokens are issued by the transition player in increasing order. The host
/// hands the token back when the animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionToken(pub(crate) u64);

impl TransitionToken {
    /// Raw sequence number, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Reasons a rendering surface cannot run a transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The named animation resource could not be loaded.
    #[error("Animation resource unavailable: {0}")]
    ResourceUnavailable(Animation),
}

/// Surface that shows and hides regions and plays transitions.
pub trait RenderSurface {
    /// Show or hide a region.
    fn set_visible(&mut self, region: Region, visible: bool);

    /// Current visibility of a region.
    fn is_visible(&self, region: Region) -> bool;

    /// Schedule `effects` as one transition and return immediately.
    ///
    /// When the transition ends the host must call
    /// `SearchBar::on_transition_finished(token)` on the same thread.
    fn run_transition(
        &mut self,
        token: TransitionToken,
        effects: &[Effect],
    ) -> Result<(), TransitionError>;

    /// Stop a scheduled transition. Unknown tokens are ignored.
    fn cancel_transition(&mut self, token: TransitionToken);

    /// Offset the input container from the leading edge, in cells.
    fn set_leading_inset(&mut self, cells: u16);

    /// Assign an icon to a slot.
    fn set_icon(&mut self, slot: IconSlot, icon: IconId);

    /// Set the placeholder text shown while collapsed.
    fn set_placeholder(&mut self, text: Option<&str>);

    /// Pop up the overflow menu.
    fn show_menu(&mut self, items: &[String]);

    /// Opaque state of the surface itself, saved alongside the widget.
    fn save_base_state(&self) -> Vec<u8>;

    /// Restore opaque surface state. Malformed input is ignored.
    fn restore_base_state(&mut self, state: &[u8]);
}

/// Editable text field.
pub trait InputSurface {
    /// Current text.
    fn text(&self) -> String;

    /// Replace the text.
    fn set_text(&mut self, text: &str);

    /// Hint shown while the text is empty.
    fn set_hint(&mut self, hint: Option<&str>);

    /// Ask for focus. Returns true if focus was gained by this call.
    fn request_focus(&mut self) -> bool;

    /// Drop focus. Returns true if focus was held before this call.
    fn clear_focus(&mut self) -> bool;

    /// Whether the field has focus.
    fn has_focus(&self) -> bool;

    /// Register an observer called with the new text after each change.
    fn add_text_change_listener(&mut self, listener: TextChangeListener);
}

/// Observer of input text changes.
pub type TextChangeListener = Box<dyn FnMut(&str)>;

/// Virtual keyboard.
pub trait KeyboardController {
    /// Show the keyboard for the text field.
    fn show(&mut self);

    /// Hide the keyboard.
    fn hide(&mut self);
}
