//! Domain model types (pure).
//!
//! All types in this module are plain data: no rendering, no I/O beyond the
//! in-memory snapshot codec.

pub mod button;
pub mod error;
pub mod icon;
pub mod key_action;
pub mod snapshot;

// Re-export for convenience
pub use button::{ButtonCode, TapTarget};
pub use error::{AppError, SnapshotError};
pub use icon::{IconId, IconSlot};
pub use key_action::KeyAction;
pub use snapshot::PersistedSnapshot;
