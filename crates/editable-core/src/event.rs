//! Change notifications.
//!
//! The buffer holds no rendering state. After every successful mutation it reports what
//! changed to a single registered [`EditListener`], synchronously, and the collaborator
//! (renderer, caret placement, input method) re-derives whatever it shows.
//!
//! Offsets are logical character offsets in the document *before* the change for
//! [`EditKind::Delete`] and [`EditKind::Replace`], and *after* it for [`EditKind::Insert`]
//! and [`EditKind::Append`].

/// Kind of change being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Text was inserted at `start`.
    Insert,
    /// Text in `[start, end)` was removed.
    Delete,
    /// Text in `[start, end)` was replaced by `text`.
    Replace,
    /// Text was added at the end of the document.
    Append,
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    /// Change kind.
    pub kind: EditKind,
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Inserted text, removed text for deletes, or the replacement text.
    pub text: String,
}

impl EditEvent {
    /// Notification for `text` inserted at `offset`.
    pub fn inserted(offset: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: EditKind::Insert,
            start: offset,
            end: offset + text.chars().count(),
            text,
        }
    }

    /// Notification for `text` removed from `start`.
    pub fn deleted(start: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: EditKind::Delete,
            start,
            end: start + text.chars().count(),
            text,
        }
    }

    /// Length of the affected range in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the affected range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Receiver of change notifications.
///
/// Implemented for every `FnMut(&EditEvent) + Send` closure.
pub trait EditListener: Send {
    /// Called after each successful mutation.
    fn on_edit(&mut self, event: &EditEvent);
}

impl<F> EditListener for F
where
    F: FnMut(&EditEvent) + Send,
{
    fn on_edit(&mut self, event: &EditEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors_count_chars() {
        let event = EditEvent::inserted(3, "你好");
        assert_eq!(event.kind, EditKind::Insert);
        assert_eq!((event.start, event.end), (3, 5));
        assert_eq!(event.len(), 2);

        let event = EditEvent::deleted(0, "");
        assert!(event.is_empty());
    }

    #[test]
    fn test_closure_is_a_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &EditEvent| seen.push(event.kind);
            listener.on_edit(&EditEvent::inserted(0, "a"));
            listener.on_edit(&EditEvent::deleted(0, "a"));
        }
        assert_eq!(seen, vec![EditKind::Insert, EditKind::Delete]);
    }
}
