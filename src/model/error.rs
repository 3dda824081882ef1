//! Error types for the search bar.
//!
//! Errors are defined with `thiserror` and compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the terminal host binary
//!   - [`SnapshotError`] - Persisted snapshot could not be encoded or decoded
//!   - [`ConfigError`](crate::config::ConfigError) - Config file unreadable or invalid
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failed
//!   - [`TuiError`](crate::view::TuiError) - Terminal host failed
//!   - `std::io::Error` - Terminal or state-file I/O failures
//!
//! # Recovery Strategy
//!
//! Nothing inside the widget core is fatal. A [`SnapshotError`] is reported
//! to the caller of `restore_bytes` after the widget has already fallen back
//! to its default collapsed state. Missing listeners and superseded
//! transitions are not errors at all.

use thiserror::Error;

/// Top-level error for the terminal host.
///
/// Domain errors convert into `AppError` via `From`, so `main` can use `?`
/// across configuration, logging, persistence and terminal setup.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Saved widget state could not be decoded.
    ///
    /// **Recovery**: the widget has already been reset to its default
    /// collapsed state; the host may continue.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Terminal host failed.
    #[error("Terminal error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// Terminal or file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures encoding or decoding a
/// [`PersistedSnapshot`](crate::model::PersistedSnapshot).
///
/// Decoding fails on malformed input: truncated bytes, a field that is out
/// of range, or bytes left over once all fields were read. Encoding fails
/// when a field is too long for its length prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Input ended before `field` could be read.
    #[error("Snapshot truncated while reading {field}")]
    Truncated {
        /// Name of the field being read.
        field: &'static str,
    },

    /// A boolean field held something other than 0 or 1.
    #[error("Invalid value {value} for flag {field} (expected 0 or 1)")]
    InvalidFlag {
        /// Name of the flag field.
        field: &'static str,
        /// The raw value found.
        value: i32,
    },

    /// A length prefix was negative (other than the null-string marker), or
    /// a field is too long for its prefix.
    #[error("Invalid length {length} for {field}")]
    InvalidLength {
        /// Name of the length-prefixed field.
        field: &'static str,
        /// The raw length found.
        length: i64,
    },

    /// The hint bytes were not valid UTF-8.
    #[error("Hint is not valid UTF-8")]
    InvalidUtf8,

    /// Bytes remained after the last field.
    #[error("{count} unexpected trailing bytes after snapshot")]
    TrailingBytes {
        /// Number of leftover bytes.
        count: usize,
    },

    /// The encoder's writer failed.
    #[error("Failed to write snapshot: {0}")]
    Write(std::io::ErrorKind),
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Write(err.kind())
    }
}
