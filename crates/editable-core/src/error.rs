//! Error types reported by [`crate::TextBuffer`].
//!
//! Every error is recovered where it happens: the buffer logs it and stays unchanged. The
//! error is still returned so callers can tell a rejected edit from one with nothing to do.

use thiserror::Error;

/// Errors produced by buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("offset {offset} is out of range for length {len}")]
    /// An offset lies outside `[0, len]`.
    OutOfRangeOffset {
        /// The rejected offset.
        offset: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },

    #[error("invalid range {start}..{end} for length {len}")]
    /// A range is reversed or extends past the end of the buffer.
    InvalidRange {
        /// Inclusive start offset.
        start: usize,
        /// Exclusive end offset.
        end: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },

    #[error("invalid selection range {start}..{end} for length {len}")]
    /// A selection is reversed or extends past the end of the buffer.
    InvalidSelectionRange {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },

    #[error("listener can not be empty")]
    /// An empty listener was registered.
    NullListener,
}

/// Result alias used throughout the crate.
pub type Result<T, E = BufferError> = std::result::Result<T, E>;
