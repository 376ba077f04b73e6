//! Undo/Redo Log
//!
//! A bounded list of grouped, mergeable edit actions with a `top` cursor: actions in
//! `[0, top)` can be undone, actions in `[top, len)` can be redone.
//!
//! # Capture protocol
//!
//! The buffer calls [`UndoLog::capture_insert`] / [`UndoLog::capture_delete`] *before* it
//! mutates, so recorded coordinates describe the document the edit was applied to.
//!
//! - Consecutive edits of the same kind that are contiguous and arrive within the merge
//!   window are folded into one action (continuous typing, repeated backspace).
//! - The text an action affected is captured lazily: while an action is the most recent one
//!   it only stores its span, because the text can still be re-derived from the buffer. It is
//!   frozen into a string as soon as a later edit could make the span stale.
//! - Replay goes back through the buffer via the [`EditTarget`] capability trait with capture
//!   disabled, so undo and redo never record new actions.

use std::collections::VecDeque;
use std::time::Duration;

/// Caller-supplied edit time, measured from any fixed origin.
pub type Timestamp = Duration;

/// Default maximum number of actions kept in the log.
pub const MAX_LOG_SIZE: usize = 1000;

/// Default window within which contiguous edits are merged.
pub const MERGE_TIME: Duration = Duration::from_millis(750);

/// What the undo log needs from the document it replays edits on.
pub trait EditTarget {
    /// Insert `text` at `offset`.
    fn insert_text(&mut self, offset: usize, text: &str);

    /// Delete the range `[start, end)`.
    fn delete_range(&mut self, start: usize, end: usize);

    /// Move the gap start by `displacement` without copying (see
    /// [`GapBuffer::shift_gap_start`](crate::storage::GapBuffer::shift_gap_start)).
    fn shift_gap_start(&mut self, displacement: isize);

    /// Logical offset of the gap.
    fn gap_start(&self) -> usize;

    /// Text in `[start, end)`.
    fn text_range(&self, start: usize, end: usize) -> String;

    /// `len` characters stored at the beginning of the gap.
    fn gap_residue(&self, len: usize) -> String;
}

/// Direction of a recorded edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Text was inserted into `[start, end)`.
    Insert,
    /// Text in `[start, end)` was deleted.
    Delete,
}

/// A recorded edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Edit direction.
    pub kind: ActionKind,
    /// Start of the affected span.
    pub start: usize,
    /// End of the affected span.
    pub end: usize,
    /// Actions sharing a group are undone and redone together.
    pub group: usize,
    /// Affected text, once frozen.
    pub data: Option<String>,
}

impl Action {
    fn new(kind: ActionKind, start: usize, end: usize, group: usize) -> Self {
        Self {
            kind,
            start,
            end,
            group,
            data: None,
        }
    }

    fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the affected text has been captured.
    pub fn is_frozen(&self) -> bool {
        self.data.is_some()
    }

    /// Fold a contiguous edit into this action.
    ///
    /// Inserts extend forward from `end`; deletes extend backward from `start`.
    fn try_merge(&mut self, start: usize, end: usize) -> bool {
        match self.kind {
            ActionKind::Insert if start == self.end => {
                self.end += end - start;
                true
            }
            ActionKind::Delete if end == self.start => {
                self.start = start;
                true
            }
            _ => false,
        }
    }

    /// Capture the affected text if it has not been captured yet.
    fn record_data(&mut self, target: &dyn EditTarget) {
        if self.data.is_some() {
            return;
        }
        self.data = Some(match self.kind {
            ActionKind::Insert => target.text_range(self.start, self.end),
            ActionKind::Delete => {
                debug_assert_eq!(target.gap_start(), self.start);
                target.gap_residue(self.len())
            }
        });
    }

    fn undo(&mut self, target: &mut dyn EditTarget) {
        let lazy = self.data.is_none();
        self.record_data(target);
        let len = self.len() as isize;

        match self.kind {
            ActionKind::Insert => {
                if lazy && target.gap_start() == self.end {
                    target.shift_gap_start(-len);
                } else {
                    target.delete_range(self.start, self.end);
                }
            }
            ActionKind::Delete => {
                if lazy {
                    target.shift_gap_start(len);
                } else if let Some(text) = &self.data {
                    target.insert_text(self.start, text);
                }
            }
        }
    }

    fn redo(&mut self, target: &mut dyn EditTarget) {
        match self.kind {
            ActionKind::Insert => match &self.data {
                Some(text) => target.insert_text(self.start, text),
                None => tracing::warn!(
                    start = self.start,
                    end = self.end,
                    "redo of an insert without captured text"
                ),
            },
            ActionKind::Delete => target.delete_range(self.start, self.end),
        }
    }

    /// Suggested caret position after undoing this action.
    pub fn undo_position(&self) -> usize {
        match self.kind {
            ActionKind::Insert => self.start,
            ActionKind::Delete => self.end,
        }
    }

    /// Suggested caret position after redoing this action.
    pub fn redo_position(&self) -> usize {
        match self.kind {
            ActionKind::Insert => self.end,
            ActionKind::Delete => self.start,
        }
    }
}

/// Bounded, grouped undo/redo history.
#[derive(Debug, Clone)]
pub struct UndoLog {
    actions: VecDeque<Action>,
    /// Number of undoable actions
    top: usize,
    /// Group assigned to the next pushed action
    group_id: usize,
    batch: bool,
    last_edit_time: Option<Timestamp>,
    max_size: usize,
    merge_window: Duration,
}

impl UndoLog {
    /// Create a log holding at most `max_size` actions.
    pub fn new(max_size: usize, merge_window: Duration) -> Self {
        Self {
            actions: VecDeque::new(),
            top: 0,
            group_id: 0,
            batch: false,
            last_edit_time: None,
            max_size: max_size.max(1),
            merge_window,
        }
    }

    /// Record an insertion of `[start, end)` that is about to happen.
    pub fn capture_insert(
        &mut self,
        target: &dyn EditTarget,
        start: usize,
        end: usize,
        time: Timestamp,
    ) {
        self.capture(ActionKind::Insert, target, start, end, time);
    }

    /// Record a deletion of `[start, end)` that is about to happen.
    pub fn capture_delete(
        &mut self,
        target: &dyn EditTarget,
        start: usize,
        end: usize,
        time: Timestamp,
    ) {
        self.capture(ActionKind::Delete, target, start, end, time);
    }

    fn capture(
        &mut self,
        kind: ActionKind,
        target: &dyn EditTarget,
        start: usize,
        end: usize,
        time: Timestamp,
    ) {
        let within_window = self
            .last_edit_time
            .is_some_and(|last| time.saturating_sub(last) < self.merge_window);
        let batch = self.batch;
        let group_id = self.group_id;

        let merged = match self.top.checked_sub(1).and_then(|i| self.actions.get_mut(i)) {
            Some(action) => {
                // A frozen action's text would go stale if its span grew.
                let mergeable = action.kind == kind
                    && within_window
                    && !action.is_frozen()
                    && (!batch || action.group == group_id);
                if mergeable && action.try_merge(start, end) {
                    true
                } else {
                    action.record_data(target);
                    false
                }
            }
            None => false,
        };

        if merged {
            self.trim_redo();
        } else {
            self.push(Action::new(kind, start, end, group_id));
            if !self.batch {
                self.group_id += 1;
            }
        }
        self.last_edit_time = Some(time);
    }

    fn push(&mut self, action: Action) {
        self.trim_redo();
        if self.actions.len() >= self.max_size {
            self.actions.pop_front();
            self.top = self.top.saturating_sub(1);
            tracing::debug!(max_size = self.max_size, "undo log full, evicted oldest action");
        }
        self.actions.push_back(action);
        self.top += 1;
    }

    /// Drop every redoable action.
    fn trim_redo(&mut self) {
        self.actions.truncate(self.top);
    }

    /// Capture the text of the most recent action now.
    ///
    /// Must be called before the document changes in a way the log does not see (uncaptured
    /// edits, gap movement), since lazy capture relies on the gap staying where the last
    /// captured edit left it.
    pub fn freeze_pending(&mut self, target: &dyn EditTarget) {
        if let Some(action) = self.top.checked_sub(1).and_then(|i| self.actions.get_mut(i)) {
            action.record_data(target);
        }
    }

    /// Undo the most recent group.
    ///
    /// Returns the suggested caret position, or `None` if there is nothing to undo.
    pub fn undo(&mut self, target: &mut dyn EditTarget) -> Option<usize> {
        let group = self.actions.get(self.top.checked_sub(1)?)?.group;
        let mut position = None;
        let mut replayed = 0;

        while let Some(action) = self.top.checked_sub(1).and_then(|i| self.actions.get_mut(i)) {
            if action.group != group {
                break;
            }
            action.undo(target);
            position = Some(action.undo_position());
            self.top -= 1;
            replayed += 1;
        }

        tracing::debug!(group, replayed, "undo");
        position
    }

    /// Redo the next undone group.
    ///
    /// Returns the suggested caret position, or `None` if there is nothing to redo.
    pub fn redo(&mut self, target: &mut dyn EditTarget) -> Option<usize> {
        let group = self.actions.get(self.top)?.group;
        let mut position = None;
        let mut replayed = 0;

        while let Some(action) = self.actions.get_mut(self.top) {
            if action.group != group {
                break;
            }
            action.redo(target);
            position = Some(action.redo_position());
            self.top += 1;
            replayed += 1;
        }

        tracing::debug!(group, replayed, "redo");
        position
    }

    /// Start grouping every captured action into one undo step.
    pub fn begin_batch(&mut self) {
        self.batch = true;
    }

    /// Seal the current batch group. The next edit never merges into it.
    pub fn end_batch(&mut self) {
        self.batch = false;
        self.group_id += 1;
        self.last_edit_time = None;
    }

    /// Whether a batch edit is open.
    pub fn is_batch(&self) -> bool {
        self.batch
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.top > 0
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.top < self.actions.len()
    }

    /// Number of undoable actions (a grouped undo may consume several).
    pub fn undo_depth(&self) -> usize {
        self.top
    }

    /// Number of redoable actions.
    pub fn redo_depth(&self) -> usize {
        self.actions.len() - self.top
    }

    /// Group the next pushed action will belong to.
    pub fn current_group(&self) -> usize {
        self.group_id
    }

    /// All recorded actions, oldest first.
    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.actions.iter()
    }

    /// Forget all history. An open batch stays open.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.top = 0;
        self.last_edit_time = None;
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(MAX_LOG_SIZE, MERGE_TIME)
    }
}
