//! Opaque icon identifiers.
//!
//! The widget never interprets an icon id; it only remembers which one was
//! assigned so a restored widget shows the same icons. Resolution of
//! [`IconId::UNSET`] to a default happens in post-setup icon resolution.

use serde::Deserialize;
use std::fmt;

/// Opaque icon identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct IconId(i32);

impl IconId {
    /// No icon assigned; replaced by the slot default during setup.
    pub const UNSET: IconId = IconId(-1);
    /// Default search (magnifier) icon.
    pub const MAGNIFY: IconId = IconId(0x0100);
    /// Default navigation (hamburger) icon.
    pub const MENU: IconId = IconId(0x0101);
    /// Icon shown in the leading slot while speech mode is on.
    pub const MICROPHONE: IconId = IconId(0x0102);

    /// Wrap a raw icon id.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw id as persisted.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True when no icon has been assigned.
    pub fn is_unset(self) -> bool {
        self.0 < 0
    }

    /// Replace an unset id with `default`.
    pub fn or(self, default: IconId) -> IconId {
        if self.is_unset() {
            default
        } else {
            self
        }
    }

    /// Glyph used by the terminal host to draw this icon.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::MAGNIFY => "⌕",
            Self::MENU => "≡",
            Self::MICROPHONE => "◉",
            _ => "◆",
        }
    }
}

impl Default for IconId {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// Icon slots on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconSlot {
    /// Search icon; shows the microphone in speech mode.
    Leading,
    /// Navigation icon at the start of the bar.
    Navigation,
}
