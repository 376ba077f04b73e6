//! Buffer configuration.

use crate::cache::DEFAULT_CACHE_SIZE;
use crate::undo::{MAX_LOG_SIZE, MERGE_TIME};
use std::time::Duration;

/// Gap size of a freshly created buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Smallest accepted tab width.
pub const MIN_TAB_SIZE: usize = 2;
/// Default tab width.
pub const DEFAULT_TAB_SIZE: usize = 4;
/// Largest accepted tab width.
pub const MAX_TAB_SIZE: usize = 8;

/// Tunables for a [`crate::TextBuffer`].
///
/// # Example
///
/// ```rust
/// use editable_core::{BufferConfig, TextBuffer};
/// use std::time::Duration;
///
/// let config = BufferConfig::default()
///     .with_max_log_size(200)
///     .with_merge_window(Duration::from_millis(500));
/// let buffer = TextBuffer::with_config("fn main() {}", config);
/// assert_eq!(buffer.config().max_log_size, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Gap size allocated up front, in characters.
    pub initial_capacity: usize,
    /// Line/offset cache slots, anchor included.
    pub cache_size: usize,
    /// Maximum number of undo actions kept.
    pub max_log_size: usize,
    /// Contiguous edits closer together than this merge into one undo action.
    pub merge_window: Duration,
    /// Number of spaces inserted by [`crate::TextBuffer::enter_tab`].
    pub tab_size: usize,
}

impl BufferConfig {
    /// Set the initial gap size.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the number of cache slots (at least 2).
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size.max(2);
        self
    }

    /// Set the undo log capacity (at least 1).
    pub fn with_max_log_size(mut self, size: usize) -> Self {
        self.max_log_size = size.max(1);
        self
    }

    /// Set the merge window.
    pub fn with_merge_window(mut self, window: Duration) -> Self {
        self.merge_window = window;
        self
    }

    /// Set the tab width, clamped into `[MIN_TAB_SIZE, MAX_TAB_SIZE]`.
    pub fn with_tab_size(mut self, size: usize) -> Self {
        self.tab_size = size.clamp(MIN_TAB_SIZE, MAX_TAB_SIZE);
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            cache_size: DEFAULT_CACHE_SIZE,
            max_log_size: MAX_LOG_SIZE,
            merge_window: MERGE_TIME,
            tab_size: DEFAULT_TAB_SIZE,
        }
    }
}
