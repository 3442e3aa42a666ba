//! Visual column arithmetic.
//!
//! Every unit occupies one column except TAB, which advances to the next
//! multiple of the tab stop. Wide or combining characters are not measured;
//! they count as one column like everything else.

/// Default tab stop in columns.
pub const DEFAULT_TAB_STOP: usize = 4;

/// Column reached after drawing `unit` starting at column `col`.
#[inline]
pub fn advance(col: usize, unit: char, tab_stop: usize) -> usize {
    if unit == '\t' {
        let ts = tab_stop.max(1);
        col + ts - col % ts
    } else {
        col + 1
    }
}

/// Columns spanned by `units` drawn from column 0.
pub fn visual_width<I>(units: I, tab_stop: usize) -> usize
where
    I: IntoIterator<Item = char>,
{
    units
        .into_iter()
        .fold(0, |col, unit| advance(col, unit, tab_stop))
}

/// Placeholder painted for control units other than TAB.
pub const CONTROL_PLACEHOLDER: char = '?';

/// Expand `units` into the cells they paint, tabs becoming spaces. Other
/// control units (CR, ESC, ...) paint as one `CONTROL_PLACEHOLDER` cell so
/// the text can never drive the terminal.
pub fn expand<I>(units: I, tab_stop: usize) -> String
where
    I: IntoIterator<Item = char>,
{
    let mut out = String::new();
    let mut col = 0;
    for unit in units {
        let next = advance(col, unit, tab_stop);
        if unit == '\t' {
            out.extend(std::iter::repeat_n(' ', next - col));
        } else if unit.is_control() {
            out.push(CONTROL_PLACEHOLDER);
        } else {
            out.push(unit);
        }
        col = next;
    }
    out
}
