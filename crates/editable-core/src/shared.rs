//! Thread-shareable handle to a [`TextBuffer`].
//!
//! A buffer is single-threaded; callers that need to reach it from several threads share it
//! through this handle. Every operation runs under one lock, so an edit and its listener
//! notification are never observed half-done.

use crate::buffer::TextBuffer;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-protected handle to one [`TextBuffer`].
#[derive(Debug, Clone, Default)]
pub struct SharedTextBuffer {
    inner: Arc<Mutex<TextBuffer>>,
}

impl SharedTextBuffer {
    /// Wrap `buffer` for sharing.
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Lock the buffer for a sequence of operations.
    ///
    /// A panic in another holder does not make the buffer unusable. Public mutations reject
    /// bad arguments before touching storage and undo/redo clamp replayed offsets, so no
    /// buffer operation panics halfway through an edit; the poisoned guard is recovered.
    pub fn lock(&self) -> MutexGuard<'_, TextBuffer> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("text buffer mutex was poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Run `f` with exclusive access to the buffer.
    pub fn with<R>(&self, f: impl FnOnce(&mut TextBuffer) -> R) -> R {
        f(&mut self.lock())
    }

    /// Number of handles sharing this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl From<TextBuffer> for SharedTextBuffer {
    fn from(buffer: TextBuffer) -> Self {
        Self::new(buffer)
    }
}
