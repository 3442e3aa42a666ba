//! Line-start index with lazy offset maintenance.
//!
//! Entry `n` holds the logical offset of the first unit of line `n`; entry 0
//! is always 0. The entries live in a `GapBuffer<usize>` whose gap sits right
//! after the cursor line, so splitting or joining the cursor line is a single
//! insert or remove at the gap.
//!
//! Edits do not touch the entries after the cursor line. They accumulate in
//! `delta` instead and every reader adds it on the fly; `commit` folds the
//! pending delta into those entries. The cursor line only moves through
//! `step_up`, `step_down` and `seek_line`, all of which commit first, so the
//! stale region is always exactly "entries after the cursor line".

use crate::{GapBuffer, Growth, TextError};

/// Initial number of line slots.
pub const LINE_CAPACITY: usize = 64;
/// Line slots are added in fixed steps.
pub const LINE_GROWTH: Growth = Growth::Step(LINE_CAPACITY);

#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: GapBuffer<usize>,
    delta: isize,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndex {
    pub fn new() -> Self {
        Self {
            starts: GapBuffer::from_slice(&[0], LINE_CAPACITY, LINE_GROWTH),
            delta: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Line that currently holds the text cursor.
    pub fn cursor_line(&self) -> usize {
        self.starts.position() - 1
    }

    /// Pending offset shift for the entries after the cursor line.
    pub fn pending_delta(&self) -> isize {
        self.delta
    }

    fn shifted(&self, raw: usize) -> usize {
        raw.checked_add_signed(self.delta).unwrap_or(0)
    }

    /// Logical offset of the first unit of line `n`.
    pub fn line_start(&self, n: usize) -> Option<usize> {
        if n >= self.line_count() {
            return None;
        }
        let raw = self.starts.get(n);
        Some(if n > self.cursor_line() {
            self.shifted(raw)
        } else {
            raw
        })
    }

    /// Offset one past the last non-newline unit of line `n`.
    pub fn line_end(&self, n: usize, text_len: usize) -> Option<usize> {
        if n + 1 < self.line_count() {
            self.line_start(n + 1).map(|next| next - 1)
        } else if n < self.line_count() {
            Some(text_len)
        } else {
            None
        }
    }

    /// Line containing `offset`: the largest `n` with `line_start(n) <= offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        let (mut lo, mut hi) = (0usize, self.line_count());
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            match self.line_start(mid) {
                Some(start) if start <= offset => lo = mid,
                _ => hi = mid,
            }
        }
        lo
    }

    /// Make room for one more line so a following `note_insert('\n', ..)`
    /// cannot fail.
    pub fn reserve(&mut self) -> Result<(), TextError> {
        self.starts.reserve()
    }

    /// Record that `unit` was inserted before the cursor, which now sits at
    /// `cursor_after`.
    pub fn note_insert(&mut self, unit: char, cursor_after: usize) -> Result<(), TextError> {
        self.delta += 1;
        if unit == '\n' {
            self.insert_line(cursor_after)?;
        }
        Ok(())
    }

    /// Record that `unit` was removed left of the cursor.
    pub fn note_remove_left(&mut self, unit: char) {
        self.delta -= 1;
        if unit == '\n' {
            self.remove_line(true);
        }
    }

    /// Record that `unit` was removed right of the cursor.
    pub fn note_remove_right(&mut self, unit: char) {
        self.delta -= 1;
        if unit == '\n' {
            self.remove_line(false);
        }
    }

    /// Open a line starting at `start` after the cursor line and make it the
    /// cursor line.
    pub fn insert_line(&mut self, start: usize) -> Result<(), TextError> {
        self.starts.insert(start)?;
        tracing::trace!(target: "text.lines", line = self.cursor_line(), start, "split");
        Ok(())
    }

    /// Drop a line boundary. `backward` removes the cursor line's own entry
    /// (the previous line becomes the cursor line); otherwise the next
    /// line's entry goes and its text joins the cursor line.
    pub fn remove_line(&mut self, backward: bool) {
        if backward {
            self.starts.remove_left();
        } else {
            self.starts.remove_right();
        }
        tracing::trace!(target: "text.lines", line = self.cursor_line(), backward, "join");
    }

    /// Fold the pending delta into every entry after the cursor line.
    pub fn commit(&mut self) {
        if self.delta == 0 {
            return;
        }
        let first = self.cursor_line() + 1;
        for n in first..self.line_count() {
            let updated = self.shifted(self.starts.get(n));
            self.starts.set(n, updated);
        }
        tracing::trace!(target: "text.lines", delta = self.delta, lines = self.line_count() - first, "commit");
        self.delta = 0;
    }

    /// Cursor moved back across a newline.
    pub fn step_up(&mut self) {
        self.commit();
        if self.cursor_line() > 0 {
            self.starts.move_left(1);
        }
    }

    /// Cursor moved forward across a newline.
    pub fn step_down(&mut self) {
        self.commit();
        if self.cursor_line() + 1 < self.line_count() {
            self.starts.move_right(1);
        }
    }

    /// Make `n` (clamped) the cursor line.
    pub fn seek_line(&mut self, n: usize) {
        self.commit();
        let n = n.min(self.line_count() - 1);
        self.starts.move_to(n + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_index_has_one_line() {
        let idx = LineIndex::new();
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.cursor_line(), 0);
        assert_eq!(idx.line_start(0), Some(0));
        assert_eq!(idx.line_start(1), None);
        assert_eq!(idx.line_end(0, 0), Some(0));
    }

    #[test]
    fn newline_splits_cursor_line() {
        let mut idx = LineIndex::new();
        // "ab\n"
        idx.note_insert('a', 1).unwrap();
        idx.note_insert('b', 2).unwrap();
        idx.note_insert('\n', 3).unwrap();
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.cursor_line(), 1);
        assert_eq!(idx.line_start(1), Some(3));
        assert_eq!(idx.line_end(0, 3), Some(2));
    }

    #[test]
    fn pending_delta_applies_to_later_lines() {
        let mut idx = LineIndex::new();
        for (i, ch) in "a\nb\nc".chars().enumerate() {
            idx.note_insert(ch, i + 1).unwrap();
        }
        idx.seek_line(0);
        assert_eq!(idx.cursor_line(), 0);
        // Insert two units on line 0 without committing.
        idx.note_insert('x', 1).unwrap();
        idx.note_insert('y', 2).unwrap();
        assert_eq!(idx.pending_delta(), 2);
        assert_eq!(idx.line_start(1), Some(4));
        assert_eq!(idx.line_start(2), Some(6));
        idx.commit();
        assert_eq!(idx.pending_delta(), 0);
        assert_eq!(idx.line_start(2), Some(6));
    }

    #[test]
    fn line_of_finds_containing_line() {
        let mut idx = LineIndex::new();
        for (i, ch) in "ab\n\ncd".chars().enumerate() {
            idx.note_insert(ch, i + 1).unwrap();
        }
        // starts: 0, 3, 4
        assert_eq!(idx.line_of(0), 0);
        assert_eq!(idx.line_of(2), 0);
        assert_eq!(idx.line_of(3), 1);
        assert_eq!(idx.line_of(4), 2);
        assert_eq!(idx.line_of(99), 2);
    }

    #[test]
    fn step_up_at_first_line_is_noop() {
        let mut idx = LineIndex::new();
        idx.step_up();
        assert_eq!(idx.cursor_line(), 0);
        idx.step_down();
        assert_eq!(idx.cursor_line(), 0);
    }

    #[test]
    fn removing_newline_joins_lines() {
        let mut idx = LineIndex::new();
        for (i, ch) in "a\nb".chars().enumerate() {
            idx.note_insert(ch, i + 1).unwrap();
        }
        // Cursor after 'b' on line 1; backspace 'b' then the newline.
        idx.note_remove_left('b');
        idx.note_remove_left('\n');
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.cursor_line(), 0);
    }
}
