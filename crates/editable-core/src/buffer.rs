//! Text Buffer
//!
//! The editor-facing facade over the gap storage. A [`TextBuffer`] owns one [`GapBuffer`],
//! one [`LineCache`] and one [`UndoLog`], and reports every change to an optional
//! [`EditListener`].
//!
//! Line numbers in this API are 1-based; character offsets are 0-based logical offsets.

use crate::cache::{Checkpoint, LineCache};
use crate::config::BufferConfig;
use crate::error::{BufferError, Result};
use crate::event::{EditEvent, EditKind, EditListener};
use crate::storage::{BACKSPACE, GapBuffer, NEWLINE};
use crate::undo::{EditTarget, Timestamp, UndoLog};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

/// Everything the undo log replays edits on: storage, cache and listener.
struct Document {
    storage: GapBuffer,
    cache: LineCache,
    listener: Option<Box<dyn EditListener>>,
    /// Set while a compound edit is reported as a single event
    muted: bool,
}

impl Document {
    fn notify_with(&mut self, event: impl FnOnce() -> EditEvent) {
        if self.muted {
            return;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.on_edit(&event());
        }
    }

    fn insert_as(&mut self, kind: EditKind, offset: usize, text: &str) {
        self.storage.insert(offset, text);
        self.cache.invalidate_from(offset);
        self.notify_with(|| EditEvent {
            kind,
            ..EditEvent::inserted(offset, text)
        });
    }

    fn remove(&mut self, start: usize, end: usize) {
        let removed = self.storage.remove(start, end);
        self.cache.invalidate_from(start);
        self.notify_with(|| EditEvent::deleted(start, removed));
    }
}

impl EditTarget for Document {
    /// Replayed offsets can drift past the end after uncaptured edits; they are clamped.
    fn insert_text(&mut self, offset: usize, text: &str) {
        let len = self.storage.len();
        if offset > len {
            tracing::warn!(offset, len, "replayed insert out of range; clamped to end");
        }
        self.insert_as(EditKind::Insert, offset.min(len), text);
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.storage.len();
        let end = end.min(len);
        let start = start.min(end);
        if start == end {
            tracing::warn!(start, end, len, "replayed delete out of range; skipped");
            return;
        }
        self.remove(start, end);
    }

    fn shift_gap_start(&mut self, displacement: isize) {
        let before = self.storage.gap_start();
        let crossed = self.storage.shift_gap_start(displacement);
        let after = self.storage.gap_start();
        self.cache.invalidate_from(before.min(after));
        self.notify_with(|| {
            if after >= before {
                EditEvent::inserted(before, crossed)
            } else {
                EditEvent::deleted(after, crossed)
            }
        });
    }

    fn gap_start(&self) -> usize {
        self.storage.gap_start()
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        self.storage.slice(start, end)
    }

    fn gap_residue(&self, len: usize) -> String {
        self.storage.gap_residue(len)
    }
}

/// Mutable character sequence with line addressing and grouped undo/redo.
///
/// Mutations take an explicit `capture` flag (record the edit for undo) and a caller-supplied
/// [`Timestamp`] used by the undo log to merge continuous typing. Rejected calls are logged,
/// leave the buffer unchanged and return a [`BufferError`].
///
/// Line queries take `&mut self` because they refresh the line/offset cache.
///
/// # Example
///
/// ```rust
/// use editable_core::TextBuffer;
/// use std::time::Duration;
///
/// let mut buffer = TextBuffer::from_text("hello");
/// buffer.insert(5, " world", true, Duration::ZERO).unwrap();
/// assert_eq!(buffer.to_string(), "hello world");
///
/// assert_eq!(buffer.undo(), Some(5));
/// assert_eq!(buffer.to_string(), "hello");
/// assert_eq!(buffer.redo(), Some(11));
/// assert_eq!(buffer.to_string(), "hello world");
/// ```
pub struct TextBuffer {
    doc: Document,
    log: UndoLog,
    /// Current selection; a caret when empty
    selection: Range<usize>,
    config: BufferConfig,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_config("", BufferConfig::default())
    }

    /// Create a buffer holding `text`, with the caret at its end.
    pub fn from_text(text: &str) -> Self {
        Self::with_config(text, BufferConfig::default())
    }

    /// Create a buffer holding `text` using `config`.
    pub fn with_config(text: &str, config: BufferConfig) -> Self {
        let storage = GapBuffer::new(text, config.initial_capacity);
        let caret = storage.gap_start();
        Self {
            doc: Document {
                storage,
                cache: LineCache::new(config.cache_size),
                listener: None,
                muted: false,
            },
            log: UndoLog::new(config.max_log_size, config.merge_window),
            selection: caret..caret,
            config,
        }
    }

    /// Configuration this buffer was created with.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Register the change listener, replacing any previous one.
    ///
    /// `None` is rejected with [`BufferError::NullListener`] and the current listener is kept.
    pub fn set_listener(&mut self, listener: Option<Box<dyn EditListener>>) -> Result<()> {
        match listener {
            Some(listener) => {
                self.doc.listener = Some(listener);
                Ok(())
            }
            None => {
                let err = BufferError::NullListener;
                tracing::warn!(%err, "listener rejected");
                Err(err)
            }
        }
    }

    /// Register a closure or other [`EditListener`] as the change listener.
    pub fn subscribe(&mut self, listener: impl EditListener + 'static) {
        self.doc.listener = Some(Box::new(listener));
    }

    /// Remove and return the change listener.
    pub fn take_listener(&mut self) -> Option<Box<dyn EditListener>> {
        self.doc.listener.take()
    }

    // ----- mutation -----

    /// Insert `text` at `offset`.
    ///
    /// Requires `offset <= len()`. With `capture` set, the edit is recorded for undo before the
    /// buffer changes. Backspace characters (`'\u{8}'`) in `text` erase the preceding character
    /// instead of being stored.
    pub fn insert(
        &mut self,
        offset: usize,
        text: &str,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.insert_as(EditKind::Insert, offset, text, capture, timestamp)
            .inspect_err(|err| tracing::warn!(%err, "insert rejected"))
    }

    /// Insert `text` at the end of the buffer.
    pub fn append(&mut self, text: &str, capture: bool, timestamp: Timestamp) -> Result<()> {
        let offset = self.len();
        self.insert_as(EditKind::Append, offset, text, capture, timestamp)
            .inspect_err(|err| tracing::warn!(%err, "append rejected"))
    }

    /// Delete the range `[start, end)`.
    pub fn delete(
        &mut self,
        start: usize,
        end: usize,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.delete_range(start, end, capture, timestamp)
            .inspect_err(|err| tracing::warn!(%err, "delete rejected"))
    }

    /// Replace the range `[start, end)` with `text`.
    ///
    /// Performed as a delete followed by an insert. When captured, both land in one undo
    /// group (unless a batch edit is already open, which then owns the grouping), so a single
    /// [`undo`](Self::undo) restores the replaced text. Listeners see one
    /// [`EditKind::Replace`] event; an empty range is reported as a plain insert.
    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.replace_range(start, end, text, capture, timestamp)
            .inspect_err(|err| tracing::warn!(%err, "replace rejected"))
    }

    /// Replace the whole content without recording undo history.
    ///
    /// Clears the undo log and the line cache and places the caret at the end.
    pub fn set_text(&mut self, text: &str) {
        let old_len = self.len();
        self.doc.storage = GapBuffer::new(text, self.config.initial_capacity);
        self.doc.cache.clear();
        self.log.clear();
        self.collapse_selection();
        tracing::debug!(old_len, new_len = self.len(), "buffer re-seeded");

        self.doc.notify_with(|| EditEvent {
            kind: EditKind::Replace,
            start: 0,
            end: old_len,
            text: text.to_string(),
        });
    }

    fn insert_as(
        &mut self,
        kind: EditKind,
        offset: usize,
        text: &str,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        let len = self.len();
        if offset > len {
            return Err(BufferError::OutOfRangeOffset { offset, len });
        }
        if text.is_empty() {
            return Ok(());
        }
        if text.contains(BACKSPACE) {
            return self.insert_with_backspaces(kind, offset, text, capture, timestamp);
        }

        if capture {
            let end = offset + text.chars().count();
            self.log.capture_insert(&self.doc, offset, end, timestamp);
        } else {
            self.log.freeze_pending(&self.doc);
        }
        self.doc.insert_as(kind, offset, text);
        self.collapse_selection();
        Ok(())
    }

    /// Inserts the runs between backspaces; each backspace erases the character before the
    /// insertion point. Captured as one undo step.
    fn insert_with_backspaces(
        &mut self,
        kind: EditKind,
        offset: usize,
        text: &str,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        let own_batch = capture && !self.log.is_batch();
        if own_batch {
            self.log.begin_batch();
        }

        let mut caret = offset;
        let mut result = Ok(());
        for (index, run) in text.split(BACKSPACE).enumerate() {
            if index > 0 && caret > 0 {
                result = self.delete_range(caret - 1, caret, capture, timestamp);
                caret -= 1;
            }
            if result.is_ok() {
                result = self.insert_as(kind, caret, run, capture, timestamp);
                caret += run.chars().count();
            }
            if result.is_err() {
                break;
            }
        }

        if own_batch {
            self.log.end_batch();
        }
        result
    }

    fn delete_range(
        &mut self,
        start: usize,
        end: usize,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }

        if capture {
            self.log.capture_delete(&self.doc, start, end, timestamp);
        } else {
            self.log.freeze_pending(&self.doc);
        }
        self.doc.remove(start, end);
        self.collapse_selection();
        Ok(())
    }

    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        capture: bool,
        timestamp: Timestamp,
    ) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return self.insert_as(EditKind::Insert, start, text, capture, timestamp);
        }

        let own_batch = capture && !self.log.is_batch();
        if own_batch {
            self.log.begin_batch();
        }
        self.doc.muted = true;
        let result = self
            .delete_range(start, end, capture, timestamp)
            .and_then(|()| self.insert_as(EditKind::Insert, start, text, capture, timestamp));
        self.doc.muted = false;
        if own_batch {
            self.log.end_batch();
        }
        result?;

        self.doc.notify_with(|| EditEvent {
            kind: EditKind::Replace,
            start,
            end,
            text: text.to_string(),
        });
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        if start > end || end > len {
            return Err(BufferError::InvalidRange { start, end, len });
        }
        Ok(())
    }

    /// After an edit the caret sits where the edit left the gap.
    fn collapse_selection(&mut self) {
        let caret = self.doc.storage.gap_start();
        self.selection = caret..caret;
    }

    // ----- undo / redo -----

    /// Undo the most recent group of captured edits.
    ///
    /// Returns the suggested caret position (where the caret is also placed), or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<usize> {
        let position = self.log.undo(&mut self.doc)?;
        self.place_caret(position);
        Some(position)
    }

    /// Redo the most recently undone group.
    pub fn redo(&mut self) -> Option<usize> {
        let position = self.log.redo(&mut self.doc)?;
        self.place_caret(position);
        Some(position)
    }

    fn place_caret(&mut self, position: usize) {
        let caret = position.min(self.len());
        self.selection = caret..caret;
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Number of undoable actions (a grouped undo may consume several).
    pub fn undo_depth(&self) -> usize {
        self.log.undo_depth()
    }

    /// Number of redoable actions.
    pub fn redo_depth(&self) -> usize {
        self.log.redo_depth()
    }

    /// Undo group the next captured edit will join or open.
    pub fn current_group(&self) -> usize {
        self.log.current_group()
    }

    /// Group every captured edit until [`end_batch_edit`](Self::end_batch_edit) into one undo
    /// step.
    pub fn begin_batch_edit(&mut self) {
        self.log.begin_batch();
    }

    /// Seal the current batch group.
    pub fn end_batch_edit(&mut self) {
        self.log.end_batch();
    }

    /// Whether a batch edit is open.
    pub fn is_batch_edit(&self) -> bool {
        self.log.is_batch()
    }

    /// Drop all undo/redo history.
    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    // ----- content queries -----

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.doc.storage.len()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.doc.storage.is_empty()
    }

    /// Character at `offset`.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.doc.storage.char_at(offset)
    }

    /// Text in `[start, end)`, or `None` if the range is invalid.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Option<String> {
        match self.check_range(start, end) {
            Ok(()) => Some(self.doc.storage.slice(start, end)),
            Err(err) => {
                tracing::debug!(%err, "sub_sequence out of range");
                None
            }
        }
    }

    /// Text in `[start, end)` with `end` clamped to the buffer length.
    ///
    /// Returns an empty string when `start` lies past `end` or the buffer end.
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        self.sub_sequence(start, end).unwrap_or_default()
    }

    /// Iterate over all characters.
    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.doc.storage.iter_range(0, self.len())
    }

    /// Logical offset of the gap (where the next local edit is cheapest).
    pub fn gap_position(&self) -> usize {
        self.doc.storage.gap_start()
    }

    /// Size of the backing array.
    pub fn capacity(&self) -> usize {
        self.doc.storage.capacity()
    }

    // ----- line addressing -----

    /// Number of lines (`1 + number of '\n'`).
    pub fn line_count(&self) -> usize {
        self.doc.storage.line_count()
    }

    fn is_valid_line(&self, line: usize) -> bool {
        let valid = (1..=self.line_count()).contains(&line);
        if !valid {
            tracing::debug!(line, line_count = self.line_count(), "line out of range");
        }
        valid
    }

    /// Offset of the first character of 1-based `line`.
    pub fn line_start(&mut self, line: usize) -> Option<usize> {
        if !self.is_valid_line(line) {
            return None;
        }
        self.line_start_index(line - 1)
    }

    /// Offset one past the end of 1-based `line`, including its newline.
    ///
    /// This is the start of the following line, or the buffer length for the last line.
    pub fn line_end(&mut self, line: usize) -> Option<usize> {
        if !self.is_valid_line(line) {
            return None;
        }
        if line == self.line_count() {
            Some(self.len())
        } else {
            self.line_start_index(line)
        }
    }

    /// Number of characters on 1-based `line`, excluding the newline.
    pub fn line_length(&mut self, line: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let len = self.len();
        Some(
            self.doc
                .storage
                .iter_range(start, len)
                .take_while(|&c| c != NEWLINE)
                .count(),
        )
    }

    /// Text of 1-based `line`, without the newline.
    pub fn line_string(&mut self, line: usize) -> Option<String> {
        let start = self.line_start(line)?;
        let length = self.line_length(line)?;
        Some(self.doc.storage.slice(start, start + length))
    }

    /// 1-based line containing `offset` (`offset == len()` is on the last line).
    pub fn line_of_offset(&mut self, offset: usize) -> Option<usize> {
        let len = self.len();
        if offset > len {
            let err = BufferError::OutOfRangeOffset { offset, len };
            tracing::debug!(%err, "line_of_offset out of range");
            return None;
        }

        let nearest = self.doc.cache.nearest_offset(offset);
        let checkpoint = self.usable(nearest);
        let storage = &self.doc.storage;
        let mut line = checkpoint.line;
        let mut crossed = None;

        match offset.cmp(&checkpoint.offset) {
            Ordering::Greater => {
                let chars = storage.iter_range(checkpoint.offset, offset);
                for (at, ch) in (checkpoint.offset..).zip(chars) {
                    if ch == NEWLINE {
                        line += 1;
                        crossed = Some(Checkpoint::new(line, at + 1));
                    }
                }
            }
            Ordering::Less => {
                let chars = storage.iter_range(offset, checkpoint.offset).rev();
                for (at, ch) in (offset..checkpoint.offset).rev().zip(chars) {
                    if ch == NEWLINE {
                        crossed = Some(Checkpoint::new(line, at + 1));
                        line -= 1;
                    }
                }
            }
            Ordering::Equal => {}
        }

        if let Some(known) = crossed {
            self.doc.cache.update_entry(known.line, known.offset);
        }
        Some(line + 1)
    }

    /// Start offset of 0-based line `target`, starting from the nearest checkpoint.
    fn line_start_index(&mut self, target: usize) -> Option<usize> {
        let nearest = self.doc.cache.nearest_line(target);
        let checkpoint = self.usable(nearest);
        let storage = &self.doc.storage;
        let offset = match target.cmp(&checkpoint.line) {
            Ordering::Equal => Some(checkpoint.offset),
            Ordering::Greater => scan_forward_to_line(storage, checkpoint, target),
            Ordering::Less => scan_backward_to_line(storage, checkpoint, target),
        }?;

        self.doc.cache.update_entry(target, offset);
        Some(offset)
    }

    /// Falls back to the anchor if a checkpoint points past the end of the buffer.
    fn usable(&self, checkpoint: Checkpoint) -> Checkpoint {
        if checkpoint.offset <= self.len() {
            checkpoint
        } else {
            Checkpoint::ANCHOR
        }
    }

    // ----- selection -----

    /// Select `[start, end)`.
    ///
    /// The gap is moved to `end`, so deleting or replacing exactly this range afterwards needs
    /// no further gap movement. Selecting also ends undo coalescing: the next edit starts a new
    /// undo step.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        if start > end || end > len {
            let err = BufferError::InvalidSelectionRange { start, end, len };
            tracing::warn!(%err, "selection rejected");
            return Err(err);
        }

        self.log.freeze_pending(&self.doc);
        self.doc.storage.move_gap(end);
        self.selection = start..end;
        Ok(())
    }

    /// Current selection range.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Selection start (the caret when nothing is selected).
    pub fn selection_start(&self) -> usize {
        self.selection.start
    }

    /// Selection end.
    pub fn selection_end(&self) -> usize {
        self.selection.end
    }

    /// Number of selected characters.
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Returns `true` if a non-empty range is selected.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected text.
    pub fn selected_text(&self) -> String {
        self.doc.storage.slice(self.selection.start, self.selection.end)
    }

    /// Delete the selected text (captured).
    pub fn delete_selection(&mut self, timestamp: Timestamp) -> Result<()> {
        let Range { start, end } = self.selection();
        self.delete(start, end, true, timestamp)
    }

    /// Replace the selection, or insert at the caret, with `text` (captured).
    pub fn replace_selection(&mut self, text: &str, timestamp: Timestamp) -> Result<()> {
        let Range { start, end } = self.selection();
        self.replace(start, end, text, true, timestamp)
    }

    /// Delete the selection, or the character before the caret.
    ///
    /// Repeated backspaces within the merge window undo as one step.
    pub fn backspace(&mut self, timestamp: Timestamp) -> Result<()> {
        if self.has_selection() {
            return self.delete_selection(timestamp);
        }
        let caret = self.selection.start;
        if caret == 0 {
            return Ok(());
        }
        self.delete(caret - 1, caret, true, timestamp)
    }

    /// Replace the selection, or insert at the caret, with a newline.
    pub fn enter_newline(&mut self, timestamp: Timestamp) -> Result<()> {
        self.replace_selection("\n", timestamp)
    }

    /// Replace the selection, or insert at the caret, with `tab_size` spaces.
    pub fn enter_tab(&mut self, timestamp: Timestamp) -> Result<()> {
        let spaces = " ".repeat(self.config.tab_size);
        self.replace_selection(&spaces, timestamp)
    }
}

fn scan_forward_to_line(storage: &GapBuffer, from: Checkpoint, target: usize) -> Option<usize> {
    let mut line = from.line;
    let chars = storage.iter_range(from.offset, storage.len());
    for (offset, ch) in (from.offset..).zip(chars) {
        if ch == NEWLINE {
            line += 1;
            if line == target {
                return Some(offset + 1);
            }
        }
    }
    None
}

fn scan_backward_to_line(storage: &GapBuffer, from: Checkpoint, target: usize) -> Option<usize> {
    if target == 0 {
        return Some(0);
    }

    // Newlines to cross: the ones ending lines `target..from.line`, plus the one before `target`.
    let mut remaining = from.line - target + 1;
    let chars = storage.iter_range(0, from.offset).rev();
    for (offset, ch) in (0..from.offset).rev().zip(chars) {
        if ch == NEWLINE {
            remaining -= 1;
            if remaining == 0 {
                return Some(offset + 1);
            }
        }
    }
    None
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("len", &self.len())
            .field("line_count", &self.line_count())
            .field("gap_position", &self.gap_position())
            .field("selection", &self.selection)
            .field("undo_depth", &self.undo_depth())
            .field("redo_depth", &self.redo_depth())
            .finish()
    }
}
