//! Frame composition and painting.
//!
//! `compose` turns the model into plain rows (gutter, text with tabs
//! expanded and clipped to the horizontal scroll, status line) plus a
//! cursor cell. `paint` queues the frame through crossterm and flushes once.
//! Composition is pure so it can be tested without a terminal.

use anyhow::Result;
use core_model::{EditorModel, Viewport};
use core_text::width;
use crossterm::{
    cursor::{MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text rows, gutter included. Always `viewport.height` entries.
    pub rows: Vec<String>,
    pub status: String,
    /// Cursor cell as (column, row).
    pub cursor: (u16, u16),
}

/// Right-aligned 1-based line number followed by padding, `gutter` cells wide.
pub fn gutter_label(line: usize, gutter: usize) -> String {
    if gutter < 3 {
        return " ".repeat(gutter);
    }
    format!(" {:>w$} ", line + 1, w = gutter - 2)
}

pub fn status_line(model: &EditorModel, cols: usize) -> String {
    let state = model.state();
    let name = state
        .file_name
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[No Name]".to_string());
    let dirty = if state.dirty() { "*" } else { "" };
    let left = match &state.ephemeral_status {
        Some(msg) => format!(" {name}{dirty}  {}", msg.text),
        None => format!(" {name}{dirty}"),
    };
    let right = format!(
        "{}:{} ",
        state.cursor_line() + 1,
        state.cursor_visual_column() + 1
    );
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len >= cols {
        return left.chars().take(cols).collect();
    }
    format!("{left}{}{right}", " ".repeat(cols - left_len - right_len))
}

pub fn compose(model: &EditorModel, cols: u16, rows: u16) -> Frame {
    let viewport = Viewport::from_terminal(cols, rows);
    let gutter = model.gutter().min(viewport.width);
    let text_width = viewport.text_width(gutter);
    let tab_stop = model.state().settings().tab_stop;
    let text = model.state().text();
    let first_col = model.view().first_col;

    let mut out: Vec<String> = model
        .visible_lines(viewport.height)
        .into_iter()
        .map(|vl| {
            let cells = width::expand(text.chars(vl.start, vl.start + vl.len), tab_stop);
            let visible: String = cells.chars().skip(first_col).take(text_width).collect();
            format!("{}{visible}", gutter_label(vl.line, gutter))
        })
        .collect();
    out.resize(viewport.height, String::new());

    let cursor = model.screen_cursor();
    let max_col = viewport.width.saturating_sub(1);
    Frame {
        rows: out,
        status: status_line(model, viewport.width),
        cursor: (
            cursor.col.min(max_col) as u16,
            cursor.row.min(viewport.height.saturating_sub(1)) as u16,
        ),
    }
}

pub fn paint<W: Write>(frame: &Frame, out: &mut W) -> Result<()> {
    for (y, row) in frame.rows.iter().enumerate() {
        queue!(out, MoveTo(0, y as u16), Clear(ClearType::CurrentLine), Print(row))?;
    }
    queue!(
        out,
        MoveTo(0, frame.rows.len() as u16),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Reverse),
        Print(&frame.status),
        SetAttribute(Attribute::Reset),
        MoveTo(frame.cursor.0, frame.cursor.1),
        Show
    )?;
    out.flush()?;
    tracing::trace!(target: "runtime.render", rows = frame.rows.len(), cursor = ?frame.cursor, "paint");
    Ok(())
}
