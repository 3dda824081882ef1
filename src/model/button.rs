//! Auxiliary button codes and tap targets.

use std::fmt;

/// Button identifiers reported to `SearchActionListener::on_button_clicked`.
///
/// The numeric values are part of the listener contract and stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonCode {
    /// Leading icon tapped while the bar is in speech mode.
    Speech = 1,
    /// Navigation icon tapped.
    Navigation = 2,
}

impl ButtonCode {
    /// Wire value of this button code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Resolve a wire value back into a button code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Speech),
            2 => Some(Self::Navigation),
            _ => None,
        }
    }
}

impl fmt::Display for ButtonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speech => write!(f, "speech"),
            Self::Navigation => write!(f, "navigation"),
        }
    }
}

/// Everything on the search bar a user can tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapTarget {
    /// The bar body. Only acts while collapsed.
    Bar,
    /// The back arrow inside the expanded input container.
    CollapseArrow,
    /// The leading search/microphone icon.
    LeadingIcon,
    /// The navigation icon.
    NavIcon,
    /// The clear-text button inside the input container.
    Clear,
    /// The overflow menu icon.
    Menu,
}
