//! Editor model: the editing state plus its scroll window.
//!
//! A `View` owns presentation state (the scroll origin) that does not belong
//! in `EditorState`. `EditorModel` pairs the two and answers the renderer's
//! questions: which lines are visible, where each starts and how long it is,
//! and where the cursor sits on screen. The model never draws.
//!
//! Scroll policy:
//! * The cursor line is kept in `[first_line + m, first_line + height - 1 - m]`
//!   and the cursor's visual column in `[first_col + m, first_col + text_width - 1 - m]`.
//! * `m` is the configured margin clamped to `(extent - 1) / 2` so the band is
//!   never empty.
//! * Adjustments are minimal: the origin moves just far enough to bring the
//!   cursor back inside the band. A second call with the same cursor is a no-op.

use core_state::EditorState;

mod viewport;
pub use viewport::{STATUS_ROWS, Viewport};

/// Default rows/columns kept between the cursor and the viewport edge.
pub const SCROLL_MARGIN: usize = 3;
/// Default gutter width (line numbers plus padding).
pub const GUTTER_WIDTH: usize = 8;

/// Compute the new origin along one axis so that `cursor` stays inside the
/// margin band of a window `extent` cells long starting at `first`.
///
/// Returns `Some(new_first)` when a scroll is needed, else `None`.
pub fn compute_scroll_intent(
    first: usize,
    cursor: usize,
    extent: usize,
    margin: usize,
) -> Option<usize> {
    if extent == 0 {
        return None;
    }
    let m = margin.min((extent - 1) / 2);
    let new_first = if cursor + m + 1 > first + extent {
        cursor + m + 1 - extent
    } else if cursor < first + m {
        cursor.saturating_sub(m)
    } else {
        return None;
    };
    (new_first != first).then_some(new_first)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct View {
    pub first_line: usize,
    /// First visible visual column (tabs expanded).
    pub first_col: usize,
}

impl View {
    /// Scroll so the cursor at (`cursor_line`, `cursor_vcol`) stays inside the
    /// margin band. Returns true if the origin changed.
    pub fn update(
        &mut self,
        cursor_line: usize,
        cursor_vcol: usize,
        viewport: Viewport,
        margin: usize,
        gutter: usize,
    ) -> bool {
        let mut changed = false;
        if let Some(first) =
            compute_scroll_intent(self.first_line, cursor_line, viewport.height, margin)
        {
            tracing::debug!(target: "model.view", from = self.first_line, to = first, "scroll_vertical");
            self.first_line = first;
            changed = true;
        }
        if let Some(first) = compute_scroll_intent(
            self.first_col,
            cursor_vcol,
            viewport.text_width(gutter),
            margin,
        ) {
            tracing::debug!(target: "model.view", from = self.first_col, to = first, "scroll_horizontal");
            self.first_col = first;
            changed = true;
        }
        changed
    }
}

/// One text row the renderer should paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleLine {
    pub line: usize,
    /// Logical offset of the line's first unit.
    pub start: usize,
    /// Units on the line, newline excluded.
    pub len: usize,
}

/// Cursor position in screen cells, gutter included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCursor {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug)]
pub struct EditorModel {
    state: EditorState,
    view: View,
    scroll_margin: usize,
    gutter: usize,
    last_text_height: usize,
}

impl EditorModel {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            view: View::default(),
            scroll_margin: SCROLL_MARGIN,
            gutter: GUTTER_WIDTH,
            last_text_height: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn scroll_margin(&self) -> usize {
        self.scroll_margin
    }

    pub fn set_scroll_margin(&mut self, margin: usize) {
        self.scroll_margin = margin;
    }

    pub fn gutter(&self) -> usize {
        self.gutter
    }

    pub fn set_gutter(&mut self, gutter: usize) {
        self.gutter = gutter;
    }

    /// Text rows seen by the last `update_view` (page motions use it).
    pub fn last_text_height(&self) -> usize {
        self.last_text_height
    }

    /// Bring the scroll origin in line with the cursor for a window of
    /// `height` text rows by `width` cells. Returns true if it moved.
    pub fn update_view(&mut self, height: usize, width: usize) -> bool {
        self.last_text_height = height;
        let line = self.state.cursor_line();
        let vcol = self.state.cursor_visual_column();
        self.view.update(
            line,
            vcol,
            Viewport::new(height, width),
            self.scroll_margin,
            self.gutter,
        )
    }

    /// Lines inside the window of `height` rows starting at the view origin.
    pub fn visible_lines(&self, height: usize) -> Vec<VisibleLine> {
        let text = self.state.text();
        let last = text.line_count().min(self.view.first_line + height);
        (self.view.first_line..last)
            .map(|line| VisibleLine {
                line,
                start: text.line_start(line).unwrap_or(0),
                len: text.line_len(line),
            })
            .collect()
    }

    pub fn screen_cursor(&self) -> ScreenCursor {
        let vcol = self.state.cursor_visual_column();
        ScreenCursor {
            row: self.state.cursor_line().saturating_sub(self.view.first_line),
            col: self.gutter + vcol.saturating_sub(self.view.first_col),
        }
    }
}
