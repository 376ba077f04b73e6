//! Line/Offset Cache
//!
//! A small most-recently-used table of `(line, offset)` checkpoints used to bound the cost of
//! line-start and line-number lookups in [`crate::TextBuffer`].
//!
//! Slot 0 is a permanent anchor at `(0, 0)`; slots `1..N` are ordered from most to least
//! recently used. Empty slots hold no checkpoint. Lines are 0-based here.

/// Default number of slots, anchor included.
pub const DEFAULT_CACHE_SIZE: usize = 10;

/// A known line start: `offset` is the first character of 0-based `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// 0-based line number.
    pub line: usize,
    /// Logical character offset of the line start.
    pub offset: usize,
}

impl Checkpoint {
    /// The immutable `(0, 0)` anchor.
    pub const ANCHOR: Checkpoint = Checkpoint { line: 0, offset: 0 };

    /// Create a new checkpoint.
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Fixed-capacity MRU table of line checkpoints.
#[derive(Debug, Clone)]
pub struct LineCache {
    slots: Vec<Option<Checkpoint>>,
}

impl LineCache {
    /// Create a cache with `capacity` slots (at least two: the anchor and one MRU slot).
    pub fn new(capacity: usize) -> Self {
        let mut slots = vec![None; capacity.max(2)];
        slots[0] = Some(Checkpoint::ANCHOR);
        Self { slots }
    }

    /// Number of slots, anchor included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Known checkpoints in slot order (anchor first).
    pub fn checkpoints(&self) -> impl Iterator<Item = Checkpoint> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Checkpoint whose line is closest to `line`; the winner becomes most recently used.
    ///
    /// Ties go to the lowest slot, so the anchor wins any tie it is part of.
    pub fn nearest_line(&mut self, line: usize) -> Checkpoint {
        self.nearest_by(|checkpoint| checkpoint.line.abs_diff(line))
    }

    /// Checkpoint whose offset is closest to `offset`; the winner becomes most recently used.
    pub fn nearest_offset(&mut self, offset: usize) -> Checkpoint {
        self.nearest_by(|checkpoint| checkpoint.offset.abs_diff(offset))
    }

    fn nearest_by(&mut self, distance: impl Fn(&Checkpoint) -> usize) -> Checkpoint {
        let mut nearest = 0;
        let mut nearest_distance = usize::MAX;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(checkpoint) = slot {
                let d = distance(checkpoint);
                if d < nearest_distance {
                    nearest = index;
                    nearest_distance = d;
                }
            }
        }

        let checkpoint = self.slots[nearest].unwrap_or(Checkpoint::ANCHOR);
        self.make_head(nearest);
        checkpoint
    }

    /// Move slot `index` to MRU position 1, shifting the slots in between down by one.
    fn make_head(&mut self, index: usize) {
        if index > 1 {
            self.slots[1..=index].rotate_right(1);
        }
    }

    /// Record that 0-based `line` starts at `offset`.
    ///
    /// Line 0 is the anchor and is never overwritten. An existing slot for `line` is updated in
    /// place; otherwise the least recently used slot is evicted.
    pub fn update_entry(&mut self, line: usize, offset: usize) {
        if line == 0 {
            return;
        }

        let checkpoint = Checkpoint::new(line, offset);
        if let Some(slot) = self.slots[1..]
            .iter_mut()
            .find(|slot| slot.is_some_and(|known| known.line == line))
        {
            *slot = Some(checkpoint);
            return;
        }

        let last = self.slots.len() - 1;
        if let Some(evicted) = self.slots[last] {
            tracing::trace!(line = evicted.line, offset = evicted.offset, "evicted line checkpoint");
        }
        self.make_head(last);
        self.slots[1] = Some(checkpoint);
    }

    /// Forget every checkpoint at or after `offset` (the anchor is kept).
    pub fn invalidate_from(&mut self, offset: usize) {
        for slot in &mut self.slots[1..] {
            if slot.is_some_and(|known| known.offset >= offset) {
                *slot = None;
            }
        }
    }

    /// Forget every checkpoint except the anchor.
    pub fn clear(&mut self) {
        self.invalidate_from(0);
    }
}

impl Default for LineCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
