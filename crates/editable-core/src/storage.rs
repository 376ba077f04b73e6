//! Gap Buffer Storage Layer
//!
//! Stores the document as one contiguous `char` array with a movable unused region (the gap).
//! Edits happen at the gap boundary, so edits clustered around one location are O(1) amortized
//! and moving the edit point costs O(distance).
//!
//! ```text
//! contents: [---text before gap---][=====GAP=====][---text after gap---]
//!            ^                      ^              ^                    ^
//!            0                  gap_start       gap_end             capacity
//! ```
//!
//! Positions passed to this module are *logical* offsets (as if the gap did not exist) unless
//! the name says otherwise. Range checking is the caller's job; see [`crate::TextBuffer`].

use std::ops::Range;

/// Line separator counted by the storage layer.
pub const NEWLINE: char = '\n';

/// Control character that retracts the gap start by one position when inserted.
pub const BACKSPACE: char = '\u{8}';

/// Smallest amount the backing array grows by.
const MIN_GROWTH: usize = 16;

const FILL: char = '\0';

/// Gap buffer - main storage structure
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Backing array, including the gap
    contents: Vec<char>,
    /// Real index of the first gap slot (equal to its logical offset)
    gap_start: usize,
    /// Real index one past the last gap slot
    gap_end: usize,
    /// `1 + number of '\n'` in the logical content, maintained incrementally
    line_count: usize,
}

impl GapBuffer {
    /// Create an empty buffer whose gap holds `capacity` characters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contents: vec![FILL; capacity],
            gap_start: 0,
            gap_end: capacity,
            line_count: 1,
        }
    }

    /// Create a buffer holding `text`, followed by a gap of `gap` characters.
    pub fn new(text: &str, gap: usize) -> Self {
        let mut buffer = Self::with_capacity(text.chars().count() + gap.max(1));
        buffer.insert(0, text);
        buffer
    }

    /// Logical length (capacity minus gap size).
    pub fn len(&self) -> usize {
        self.contents.len() - self.gap_len()
    }

    /// Whether the logical content is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the backing array.
    pub fn capacity(&self) -> usize {
        self.contents.len()
    }

    /// Number of unused slots.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Logical offset of the gap.
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    /// Number of lines (`1 + newline count`).
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Map a logical offset to a real index.
    pub fn real_index(&self, offset: usize) -> usize {
        if offset < self.gap_start {
            offset
        } else {
            offset + self.gap_len()
        }
    }

    /// Map a real index outside the gap back to a logical offset.
    pub fn logical_index(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index - self.gap_len()
        }
    }

    /// Character at a logical offset.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.len()).then(|| self.contents[self.real_index(offset)])
    }

    /// Iterate the logical range `[start, end)`, skipping over the gap.
    ///
    /// Requires `start <= end <= len()`.
    pub fn iter_range(
        &self,
        start: usize,
        end: usize,
    ) -> impl DoubleEndedIterator<Item = char> + '_ {
        let gap = self.gap_len();
        let front = &self.contents[start.min(self.gap_start)..end.min(self.gap_start)];
        let back = &self.contents[start.max(self.gap_start) + gap..end.max(self.gap_start) + gap];
        front.iter().chain(back.iter()).copied()
    }

    /// Collect the logical range `[start, end)` into a string.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let mut out = String::with_capacity(end - start);
        out.extend(self.iter_range(start, end));
        out
    }

    /// Collect the whole logical content.
    pub fn text(&self) -> String {
        self.slice(0, self.len())
    }

    /// Count newlines in the logical range `[start, end)`.
    pub fn newlines_in(&self, start: usize, end: usize) -> usize {
        self.iter_range(start, end).filter(|&c| c == NEWLINE).count()
    }

    /// Move the gap so that it starts at logical `offset`.
    ///
    /// Characters between the old and the new position are copied across the gap; the cost is
    /// proportional to the distance moved.
    pub fn move_gap(&mut self, offset: usize) {
        if offset < self.gap_start {
            let count = self.gap_start - offset;
            self.contents
                .copy_within(offset..self.gap_start, self.gap_end - count);
            self.gap_start = offset;
            self.gap_end -= count;
        } else if offset > self.gap_start {
            let count = offset - self.gap_start;
            self.contents
                .copy_within(self.gap_end..self.gap_end + count, self.gap_start);
            self.gap_start += count;
            self.gap_end += count;
        }
    }

    /// Grow the gap by at least `min_extra` slots.
    ///
    /// The array at least doubles. The old gap contents are kept in place so that text
    /// retracted into the gap stays readable through [`GapBuffer::gap_residue`].
    fn grow(&mut self, min_extra: usize) {
        let extra = min_extra.max(self.contents.len().max(MIN_GROWTH));
        let mut contents = Vec::with_capacity(self.contents.len() + extra);
        contents.extend_from_slice(&self.contents[..self.gap_end]);
        contents.resize(self.gap_end + extra, FILL);
        contents.extend_from_slice(&self.contents[self.gap_end..]);

        tracing::debug!(
            old_capacity = self.contents.len(),
            new_capacity = contents.len(),
            "grew gap buffer"
        );

        self.contents = contents;
        self.gap_end += extra;
    }

    /// Insert `text` at logical `offset`.
    ///
    /// Each [`BACKSPACE`] in `text` retracts the gap start by one instead of being stored.
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.move_gap(offset);

        let needed = text.chars().count();
        if needed >= self.gap_len() {
            self.grow(needed - self.gap_len() + 1);
        }

        for ch in text.chars() {
            if ch == BACKSPACE {
                if self.gap_start > 0 {
                    self.gap_start -= 1;
                    if self.contents[self.gap_start] == NEWLINE {
                        self.line_count -= 1;
                    }
                }
                continue;
            }
            if ch == NEWLINE {
                self.line_count += 1;
            }
            self.contents[self.gap_start] = ch;
            self.gap_start += 1;
        }
    }

    /// Remove the logical range `[start, end)` and return the removed text.
    ///
    /// The gap start is moved to `end` and then retracted to `start`, so the removed
    /// characters remain in the gap until it moves again.
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        self.move_gap(end);
        self.gap_start = start;

        let removed: String = self.contents[start..end].iter().collect();
        self.line_count -= removed.chars().filter(|&c| c == NEWLINE).count();
        removed
    }

    /// Read `len` characters stored at the beginning of the gap.
    ///
    /// Right after [`GapBuffer::remove`] this is exactly the removed text.
    pub fn gap_residue(&self, len: usize) -> String {
        let end = (self.gap_start + len).min(self.gap_end);
        self.contents[self.gap_start..end].iter().collect()
    }

    /// Move the gap start by `displacement` without copying anything.
    ///
    /// A positive displacement re-exposes characters lying at the beginning of the gap, a
    /// negative one hides the characters just before it. Returns the characters that changed
    /// sides, in document order. The displacement is clamped to what the array allows.
    pub fn shift_gap_start(&mut self, displacement: isize) -> String {
        let range: Range<usize> = if displacement >= 0 {
            let count = displacement.unsigned_abs().min(self.gap_len());
            self.gap_start..self.gap_start + count
        } else {
            let count = displacement.unsigned_abs().min(self.gap_start);
            self.gap_start - count..self.gap_start
        };

        let crossed: String = self.contents[range.clone()].iter().collect();
        let newlines = crossed.chars().filter(|&c| c == NEWLINE).count();
        if displacement >= 0 {
            self.line_count += newlines;
            self.gap_start = range.end;
        } else {
            self.line_count -= newlines;
            self.gap_start = range.start;
        }
        crossed
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::with_capacity(MIN_GROWTH)
    }
}
