//! Gap-buffer text storage with a lazily maintained line index.
//!
//! A `TextBuffer` is a sequence of `char` units addressed by logical offset
//! `0..=len`. It owns two structures kept in lockstep:
//! * `GapBuffer<char>` holding the text, its gap at the cursor;
//! * `LineIndex` holding line starts, its gap after the cursor line.
//!
//! Every edit and cursor movement goes through `TextBuffer` so the two can
//! never disagree about where the cursor is. Line counting is over `'\n'`
//! units only; a trailing newline yields a final empty line.

pub mod gap;
pub mod lines;
pub mod motion;
pub mod seq;
pub mod width;

pub use gap::GapBuffer;
pub use lines::LineIndex;
pub use seq::{GrowVec, Growth};
pub use width::DEFAULT_TAB_STOP;

use std::str::FromStr;

/// Initial text capacity in units.
pub const TEXT_CAPACITY: usize = 1024;
/// Text storage grows by a factor of 1.6.
pub const TEXT_GROWTH: Growth = Growth::Factor { num: 8, den: 5 };

/// Storage errors. Only growth can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("out of memory growing storage to {requested} slots")]
    Alloc { requested: usize },
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    units: GapBuffer<char>,
    lines: LineIndex,
}

/// Build a buffer holding the text with the cursor at offset 0.
impl FromStr for TextBuffer {
    type Err = TextError;

    fn from_str(text: &str) -> Result<Self, TextError> {
        let mut buf = Self::new();
        for ch in text.chars() {
            buf.insert(ch)?;
        }
        buf.move_to(0);
        Ok(buf)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::with_capacity(TEXT_CAPACITY, TEXT_GROWTH)
    }

    pub fn with_capacity(capacity: usize, growth: Growth) -> Self {
        Self {
            units: GapBuffer::with_capacity(capacity, growth),
            lines: LineIndex::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.units.position()
    }

    pub fn cursor_line(&self) -> usize {
        self.lines.cursor_line()
    }

    /// Cursor offset from the start of its line, in units.
    pub fn cursor_column(&self) -> usize {
        self.cursor() - self.line_start(self.cursor_line()).unwrap_or(0)
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Unit at `offset`, or `'\0'` past the end.
    pub fn char_at(&self, offset: usize) -> char {
        self.units.get(offset)
    }

    pub fn line_start(&self, n: usize) -> Option<usize> {
        self.lines.line_start(n)
    }

    /// Offset one past the last non-newline unit of line `n`.
    pub fn line_end(&self, n: usize) -> Option<usize> {
        self.lines.line_end(n, self.len())
    }

    /// Units on line `n` excluding its newline; 0 for a missing line.
    pub fn line_len(&self, n: usize) -> usize {
        match (self.line_start(n), self.line_end(n)) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset.min(self.len()))
    }

    /// Insert `ch` before the cursor; the cursor ends up after it.
    pub fn insert(&mut self, ch: char) -> Result<(), TextError> {
        if ch == '\n' {
            self.lines.reserve()?;
        }
        self.units.insert(ch)?;
        self.lines.note_insert(ch, self.units.position())
    }

    /// Insert `ch` at the cursor; the cursor stays before it.
    pub fn insert_after(&mut self, ch: char) -> Result<(), TextError> {
        self.insert(ch)?;
        self.move_left(1);
        Ok(())
    }

    /// Backspace. `None` at offset 0.
    pub fn remove_left(&mut self) -> Option<char> {
        let ch = self.units.remove_left()?;
        self.lines.note_remove_left(ch);
        Some(ch)
    }

    /// Forward delete. `None` at the end of the text.
    pub fn remove_right(&mut self) -> Option<char> {
        let ch = self.units.remove_right()?;
        self.lines.note_remove_right(ch);
        Some(ch)
    }

    /// Move the cursor up to `n` units left. Returns the distance moved.
    pub fn move_left(&mut self, n: usize) -> usize {
        let mut moved = 0;
        while moved < n && self.cursor() > 0 {
            if self.units.get(self.cursor() - 1) == '\n' {
                self.lines.step_up();
            }
            self.units.move_left(1);
            moved += 1;
        }
        moved
    }

    /// Move the cursor up to `n` units right. Returns the distance moved.
    pub fn move_right(&mut self, n: usize) -> usize {
        let mut moved = 0;
        while moved < n && self.cursor() < self.len() {
            if self.units.get(self.cursor()) == '\n' {
                self.lines.step_down();
            }
            self.units.move_right(1);
            moved += 1;
        }
        moved
    }

    /// Jump the cursor to `pos` (clamped to the length).
    pub fn move_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos == self.cursor() {
            return;
        }
        let line = self.lines.line_of(pos);
        self.lines.seek_line(line);
        self.units.move_to(pos);
    }

    /// Fold pending line offsets. Readers never need this; callers use it
    /// before a jump so the index starts the next edit clean.
    pub fn commit(&mut self) {
        self.lines.commit();
    }

    pub fn chars(&self, start: usize, end: usize) -> impl Iterator<Item = char> + '_ {
        self.units.iter_range(start, end)
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars(start, end).collect()
    }

    /// Text of line `n` without its newline.
    pub fn line_text(&self, n: usize) -> String {
        match (self.line_start(n), self.line_end(n)) {
            (Some(start), Some(end)) => self.slice(start, end),
            _ => String::new(),
        }
    }

    pub fn contents(&self) -> String {
        self.units.to_vec().into_iter().collect()
    }

    /// UTF-8 byte length of `[start, end)`.
    pub fn byte_len(&self, start: usize, end: usize) -> usize {
        self.chars(start, end).map(char::len_utf8).sum()
    }

    /// Columns spanned by `[start, end)` drawn from column 0.
    pub fn visual_width(&self, start: usize, end: usize, tab_stop: usize) -> usize {
        width::visual_width(self.chars(start, end), tab_stop)
    }

    /// Visual column of the cursor within its line.
    pub fn visual_column(&self, tab_stop: usize) -> usize {
        let start = self.line_start(self.cursor_line()).unwrap_or(0);
        self.visual_width(start, self.cursor(), tab_stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn typed(text: &str) -> TextBuffer {
        let mut buf = TextBuffer::new();
        for ch in text.chars() {
            buf.insert(ch).unwrap();
        }
        buf
    }

    #[test]
    fn typing_tracks_cursor_and_lines() {
        let buf = typed("ab\ncd");
        assert_eq!(buf.contents(), "ab\ncd");
        assert_eq!(buf.cursor(), 5);
        assert_eq!(buf.cursor_line(), 1);
        assert_eq!(buf.cursor_column(), 2);
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_text(0), "ab");
        assert_eq!(buf.line_text(1), "cd");
    }

    #[test]
    fn from_str_puts_cursor_at_origin() {
        let buf = TextBuffer::from_str("x\ny\n").unwrap();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.cursor_line(), 0);
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_text(2), "");

        let parsed: TextBuffer = "x\ny\n".parse().unwrap();
        assert_eq!(parsed.contents(), buf.contents());
    }

    #[test]
    fn insert_after_keeps_cursor_before_unit() {
        let mut buf = typed("(");
        buf.insert_after(')').unwrap();
        assert_eq!(buf.contents(), "()");
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.char_at(1), ')');
    }

    #[test]
    fn backspace_across_newline_joins_lines() {
        let mut buf = typed("ab\ncd");
        buf.move_to(3);
        assert_eq!(buf.remove_left(), Some('\n'));
        assert_eq!(buf.contents(), "abcd");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.cursor_line(), 0);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn forward_delete_of_newline_joins_lines() {
        let mut buf = typed("ab\ncd\nef");
        buf.move_to(2);
        assert_eq!(buf.remove_right(), Some('\n'));
        assert_eq!(buf.contents(), "abcd\nef");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_start(1), Some(5));
    }

    #[test]
    fn removals_at_edges_are_noops() {
        let mut buf = typed("a");
        assert_eq!(buf.remove_right(), None);
        buf.move_to(0);
        assert_eq!(buf.remove_left(), None);
        assert_eq!(buf.contents(), "a");
    }

    #[test]
    fn horizontal_moves_cross_lines() {
        let mut buf = TextBuffer::from_str("ab\ncd").unwrap();
        assert_eq!(buf.move_right(3), 3);
        assert_eq!(buf.cursor_line(), 1);
        assert_eq!(buf.move_left(1), 1);
        assert_eq!(buf.cursor_line(), 0);
        assert_eq!(buf.cursor_column(), 2);
        assert_eq!(buf.move_right(100), 3);
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn edits_mid_text_shift_later_lines() {
        let mut buf = TextBuffer::from_str("a\nb\nc").unwrap();
        buf.insert('x').unwrap();
        buf.insert('y').unwrap();
        assert_eq!(buf.line_start(1), Some(4));
        assert_eq!(buf.line_start(2), Some(6));
        assert_eq!(buf.line_text(2), "c");
        buf.move_to(6);
        assert_eq!(buf.cursor_line(), 2);
        assert_eq!(buf.line_start(1), Some(4));
    }

    #[test]
    fn move_to_clamps_and_updates_line() {
        let mut buf = TextBuffer::from_str("one\ntwo\nthree").unwrap();
        buf.move_to(1000);
        assert_eq!(buf.cursor(), 13);
        assert_eq!(buf.cursor_line(), 2);
        buf.move_to(4);
        assert_eq!(buf.cursor_line(), 1);
        assert_eq!(buf.cursor_column(), 0);
    }

    #[test]
    fn char_at_past_end_is_nul() {
        let buf = TextBuffer::from_str("ab").unwrap();
        assert_eq!(buf.char_at(1), 'b');
        assert_eq!(buf.char_at(2), '\0');
    }

    #[test]
    fn visual_column_expands_tabs() {
        let mut buf = TextBuffer::from_str("\tab").unwrap();
        buf.move_to(2);
        assert_eq!(buf.visual_column(4), 5);
        assert_eq!(buf.visual_column(8), 9);
    }

    #[test]
    fn byte_len_counts_utf8() {
        let buf = TextBuffer::from_str("aé\n€").unwrap();
        assert_eq!(buf.byte_len(0, 2), 3);
        assert_eq!(buf.byte_len(0, buf.len()), 7);
    }

    #[test]
    fn empty_buffer_has_one_empty_line() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_len(0), 0);
        assert_eq!(buf.line_end(0), Some(0));
    }
}
