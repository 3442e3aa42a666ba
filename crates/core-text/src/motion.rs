//! Pure motion targets over a `TextBuffer`.
//!
//! These functions only compute offsets; the caller decides how to move the
//! cursor there (and what bookkeeping to do around the jump).

use crate::TextBuffer;

/// Offset a vertical move to `line` lands on, keeping `sticky_col` when the
/// line is long enough and clamping to its end otherwise.
pub fn vertical_target(buf: &TextBuffer, line: usize, sticky_col: usize) -> usize {
    let line = line.min(buf.line_count() - 1);
    let start = buf.line_start(line).unwrap_or(0);
    start + sticky_col.min(buf.line_len(line))
}

/// Line reached by moving `steps` lines up from the cursor line.
pub fn up(buf: &TextBuffer, steps: usize) -> usize {
    buf.cursor_line().saturating_sub(steps)
}

/// Line reached by moving `steps` lines down from the cursor line.
pub fn down(buf: &TextBuffer, steps: usize) -> usize {
    let last = buf.line_count() - 1;
    buf.cursor_line().saturating_add(steps).min(last)
}

pub fn line_start(buf: &TextBuffer) -> usize {
    buf.line_start(buf.cursor_line()).unwrap_or(0)
}

pub fn line_end(buf: &TextBuffer) -> usize {
    buf.line_end(buf.cursor_line()).unwrap_or(buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn vertical_target_clamps_to_short_line() {
        let buf = TextBuffer::from_str("hello\nhi\nworld").unwrap();
        assert_eq!(vertical_target(&buf, 1, 4), 8);
        assert_eq!(vertical_target(&buf, 2, 4), 13);
        assert_eq!(vertical_target(&buf, 9, 0), 9);
    }

    #[test]
    fn up_and_down_clamp_at_edges() {
        let mut buf = TextBuffer::from_str("a\nb\nc").unwrap();
        assert_eq!(up(&buf, 3), 0);
        assert_eq!(down(&buf, 10), 2);
        buf.move_to(2);
        assert_eq!(up(&buf, 1), 0);
        assert_eq!(down(&buf, 1), 2);
    }

    #[test]
    fn line_edges_of_cursor_line() {
        let mut buf = TextBuffer::from_str("one\ntwo").unwrap();
        buf.move_to(5);
        assert_eq!(line_start(&buf), 4);
        assert_eq!(line_end(&buf), 7);
    }
}
