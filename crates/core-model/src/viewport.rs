//! Screen geometry handed from the terminal to the model.
//!
//! The bottom row of the terminal is reserved for the status line; the
//! remaining rows are text rows. The gutter (line numbers) takes a fixed
//! number of columns on the left of every text row.

/// Rows reserved below the text area.
pub const STATUS_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Text rows (status line excluded).
    pub height: usize,
    /// Full width in cells, gutter included.
    pub width: usize,
}

impl Viewport {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Geometry for a terminal of `cols` x `rows` cells.
    pub fn from_terminal(cols: u16, rows: u16) -> Self {
        Self {
            height: (rows as usize).saturating_sub(STATUS_ROWS),
            width: cols as usize,
        }
    }

    /// Columns left for text once the gutter is drawn.
    pub fn text_width(&self, gutter: usize) -> usize {
        self.width.saturating_sub(gutter)
    }

    pub fn is_degenerate(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}
