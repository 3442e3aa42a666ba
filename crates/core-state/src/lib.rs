//! Editor state: text, undo timeline, pair stack and cursor bookkeeping.
//!
//! `EditorState` is the only owner of the `TextBuffer`, the `Timeline` and
//! the `PairMatcher`. Every edit enters through one of two private entry
//! points (`put` for inserts, `take` for removals) which keep the dirty
//! tracking and undo recording in one place. Re-entrant edits (auto-pair
//! closers, undo replay, file load) are told apart by `EditFlags`:
//! * `replaying`: the edit is a replay or a load and must not be recorded;
//! * `pairing`: an auto-pair closer is being inserted, no nested pairing;
//! * `sticky_locked`: a vertical move is in progress, keep the sticky column.
//!
//! Cursor motions commit the open undo action; vertical motions and motions
//! that leave the cursor line also clear the pair stack.

use core_text::{TextBuffer, TextError, motion};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub mod pairs;
pub mod undo;

pub use pairs::PairMatcher;
pub use undo::{Action, EditKind, Side, Timeline, UNDO_CAPACITY, UNDO_EXPIRY};

/// Re-entrancy flags for the internal edit entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditFlags {
    pub replaying: bool,
    pub pairing: bool,
    pub sticky_locked: bool,
}

/// Behavioural knobs handed down from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub tab_stop: usize,
    pub auto_pairs: bool,
    pub undo_capacity: usize,
    pub undo_expiry: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_stop: core_text::DEFAULT_TAB_STOP,
            auto_pairs: true,
            undo_capacity: UNDO_CAPACITY,
            undo_expiry: UNDO_EXPIRY,
        }
    }
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct EditorState {
    text: TextBuffer,
    timeline: Timeline,
    pairs: PairMatcher,
    flags: EditFlags,
    sticky_col: usize,
    dirty: bool,
    min_changed: Option<usize>,
    settings: EditorSettings,
    pub file_name: Option<std::path::PathBuf>,
    pub ephemeral_status: Option<EphemeralMessage>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            text: TextBuffer::new(),
            timeline: Timeline::new(settings.undo_capacity, settings.undo_expiry),
            pairs: PairMatcher::new(),
            flags: EditFlags::default(),
            sticky_col: 0,
            dirty: false,
            min_changed: None,
            settings,
            file_name: None,
            ephemeral_status: None,
        }
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn pairs(&self) -> &PairMatcher {
        &self.pairs
    }

    pub fn flags(&self) -> EditFlags {
        self.flags
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    pub fn cursor(&self) -> usize {
        self.text.cursor()
    }

    pub fn cursor_line(&self) -> usize {
        self.text.cursor_line()
    }

    pub fn cursor_column(&self) -> usize {
        self.text.cursor_column()
    }

    /// Visual column of the cursor with tabs expanded.
    pub fn cursor_visual_column(&self) -> usize {
        self.text.visual_column(self.settings.tab_stop)
    }

    // ---- status ---------------------------------------------------------

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        self.tick_ephemeral_at(Instant::now())
    }

    pub fn tick_ephemeral_at(&mut self, now: Instant) -> bool {
        if let Some(m) = &self.ephemeral_status
            && now >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    // ---- persistence ----------------------------------------------------

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Lowest offset modified since the last save or load.
    pub fn min_changed_offset(&self) -> Option<usize> {
        self.min_changed
    }

    /// Text from the lowest modified offset to the end, with that offset.
    pub fn unsaved_suffix(&self) -> Option<(usize, String)> {
        self.min_changed
            .map(|offset| (offset, self.text.slice(offset, self.text.len())))
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
        self.min_changed = None;
        debug!(target: "state.edit", len = self.text.len(), "mark_saved");
    }

    /// Replace the text with `source`. Nothing is recorded; the cursor ends
    /// at offset 0 and the state is clean.
    pub fn load(&mut self, source: &str) -> Result<(), TextError> {
        self.text = TextBuffer::new();
        self.timeline.clear();
        self.pairs.reset();
        let now = Instant::now();
        self.replaying(|st| {
            for ch in source.chars() {
                st.put(ch, Side::Left, now)?;
            }
            Ok(())
        })?;
        self.text.move_to(0);
        self.sticky_col = 0;
        self.mark_saved();
        debug!(target: "state.edit", units = self.text.len(), lines = self.text.line_count(), "load");
        Ok(())
    }

    fn touch(&mut self, offset: usize) {
        self.dirty = true;
        self.min_changed = Some(self.min_changed.map_or(offset, |m| m.min(offset)));
    }

    fn refresh_sticky(&mut self) {
        if !self.flags.sticky_locked {
            self.sticky_col = self.text.cursor_column();
        }
    }

    fn replaying<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, TextError>,
    ) -> Result<R, TextError> {
        let prev = self.flags.replaying;
        self.flags.replaying = true;
        let out = f(self);
        self.flags.replaying = prev;
        out
    }

    // ---- edit entry points ----------------------------------------------

    fn put(&mut self, unit: char, side: Side, now: Instant) -> Result<(), TextError> {
        let before = self.text.cursor();
        match side {
            Side::Left => self.text.insert(unit)?,
            Side::Right => self.text.insert_after(unit)?,
        }
        self.touch(before);
        if !self.flags.replaying {
            self.timeline
                .record(EditKind::Insert, side, unit, before, now)?;
        }
        trace!(target: "state.edit", unit = ?unit, ?side, at = before, "insert");
        Ok(())
    }

    fn take(&mut self, side: Side, now: Instant) -> Result<Option<char>, TextError> {
        let before = self.text.cursor();
        let removed = match side {
            Side::Left => self.text.remove_left(),
            Side::Right => self.text.remove_right(),
        };
        let Some(unit) = removed else {
            return Ok(None);
        };
        self.touch(self.text.cursor());
        if !self.flags.replaying {
            self.timeline
                .record(EditKind::Delete, side, unit, before, now)?;
        }
        trace!(target: "state.edit", unit = ?unit, ?side, at = before, "remove");
        Ok(Some(unit))
    }

    // ---- edits ----------------------------------------------------------

    pub fn insert_char(&mut self, unit: char) -> Result<(), TextError> {
        self.insert_char_at(unit, Instant::now())
    }

    /// Insert `unit` at the cursor, applying auto-pair rules.
    ///
    /// While `EditFlags::pairing` is set the unit is the closer of a pair
    /// being opened: it goes after the cursor and is never paired itself.
    pub fn insert_char_at(&mut self, unit: char, now: Instant) -> Result<(), TextError> {
        if self.flags.pairing {
            return self.put(unit, Side::Right, now);
        }
        let pairing = self.settings.auto_pairs && !self.flags.replaying;
        if pairing && self.pairs.take_skip(unit, self.text.char_at(self.text.cursor())) {
            self.timeline.commit();
            self.text.move_right(1);
            self.refresh_sticky();
            return Ok(());
        }
        let prev = match self.text.cursor() {
            0 => '\0',
            c => self.text.char_at(c - 1),
        };
        if pairing && let Some(closer) = self.pairs.closer_for(unit, prev) {
            self.put(unit, Side::Left, now)?;
            self.pairs.push(unit)?;
            self.flags.pairing = true;
            let closed = self.insert_char_at(closer, now);
            self.flags.pairing = false;
            closed?;
        } else {
            self.put(unit, Side::Left, now)?;
        }
        self.refresh_sticky();
        Ok(())
    }

    pub fn delete_left(&mut self) -> Result<bool, TextError> {
        self.delete_left_at(Instant::now())
    }

    /// Backspace. Returns false at offset 0.
    pub fn delete_left_at(&mut self, now: Instant) -> Result<bool, TextError> {
        let crossed = self.text.char_at(self.text.cursor().wrapping_sub(1)) == '\n';
        let removed = self.take(Side::Left, now)?.is_some();
        if crossed {
            self.pairs.reset();
        }
        self.refresh_sticky();
        Ok(removed)
    }

    pub fn delete_right(&mut self) -> Result<bool, TextError> {
        self.delete_right_at(Instant::now())
    }

    /// Forward delete. Returns false at the end of the text.
    pub fn delete_right_at(&mut self, now: Instant) -> Result<bool, TextError> {
        let removed = self.take(Side::Right, now)?.is_some();
        self.refresh_sticky();
        Ok(removed)
    }

    /// Close the open undo action.
    pub fn commit(&mut self) {
        self.timeline.commit();
    }

    // ---- motions --------------------------------------------------------

    pub fn move_left(&mut self, n: usize) -> usize {
        self.move_horizontal(|text| text.move_left(n))
    }

    pub fn move_right(&mut self, n: usize) -> usize {
        self.move_horizontal(|text| text.move_right(n))
    }

    fn move_horizontal(&mut self, step: impl FnOnce(&mut TextBuffer) -> usize) -> usize {
        self.timeline.commit();
        let line = self.text.cursor_line();
        let moved = step(&mut self.text);
        if self.text.cursor_line() != line {
            self.pairs.reset();
        }
        self.refresh_sticky();
        moved
    }

    pub fn move_up(&mut self, n: usize) -> usize {
        let target = motion::up(&self.text, n);
        self.move_vertical(target)
    }

    pub fn move_down(&mut self, n: usize) -> usize {
        let target = motion::down(&self.text, n);
        self.move_vertical(target)
    }

    // The sticky column survives the jump and decides the landing column.
    fn move_vertical(&mut self, target_line: usize) -> usize {
        self.timeline.commit();
        self.pairs.reset();
        let from = self.text.cursor_line();
        self.text.commit();
        let pos = motion::vertical_target(&self.text, target_line, self.sticky_col);
        self.flags.sticky_locked = true;
        self.text.move_to(pos);
        self.refresh_sticky();
        self.flags.sticky_locked = false;
        trace!(target: "state.edit", from, to = target_line, sticky = self.sticky_col, "move_vertical");
        from.abs_diff(target_line)
    }

    pub fn move_to(&mut self, pos: usize) {
        self.timeline.commit();
        self.pairs.reset();
        self.text.move_to(pos);
        self.refresh_sticky();
    }

    pub fn move_line_start(&mut self) {
        let pos = motion::line_start(&self.text);
        self.timeline.commit();
        self.text.move_to(pos);
        self.refresh_sticky();
    }

    pub fn move_line_end(&mut self) {
        let pos = motion::line_end(&self.text);
        self.timeline.commit();
        self.text.move_to(pos);
        self.refresh_sticky();
    }

    // ---- undo / redo ----------------------------------------------------

    /// Revert the most recent action. `Ok(false)` when there is none.
    pub fn undo(&mut self) -> Result<bool, TextError> {
        let Some(mut action) = self.timeline.pop_undo() else {
            return Ok(false);
        };
        self.replay(&action)?;
        action.invert();
        debug!(target: "state.undo", kind = ?action.kind, side = ?action.side, units = action.len(), "undo");
        self.timeline.push_redo(action);
        Ok(true)
    }

    /// Re-apply the most recently undone action. `Ok(false)` when there is none.
    pub fn redo(&mut self) -> Result<bool, TextError> {
        let Some(mut action) = self.timeline.pop_redo() else {
            return Ok(false);
        };
        self.replay(&action)?;
        action.invert();
        debug!(target: "state.undo", kind = ?action.kind, side = ?action.side, units = action.len(), "redo");
        self.timeline.push_undo(action);
        Ok(true)
    }

    // Applies the inverse of `action` without recording it.
    fn replay(&mut self, action: &Action) -> Result<(), TextError> {
        self.pairs.reset();
        self.text.move_to(action.trailing_edge());
        let now = Instant::now();
        self.replaying(|st| {
            match action.kind {
                EditKind::Insert => {
                    for _ in 0..action.len() {
                        st.take(action.side, now)?;
                    }
                }
                EditKind::Delete => {
                    for &unit in action.frame().iter().rev() {
                        st.put(unit, action.side, now)?;
                    }
                }
            }
            Ok(())
        })?;
        self.refresh_sticky();
        Ok(())
    }
}
