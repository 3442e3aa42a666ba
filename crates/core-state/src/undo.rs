use core_text::{GrowVec, Growth, TextError};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default number of actions retained on each stack.
pub const UNDO_CAPACITY: usize = 128;
/// An open action stops accepting units this long after it was opened.
pub const UNDO_EXPIRY: Duration = Duration::from_millis(650);

const FRAME_GROWTH: Growth = Growth::Step(32);

/// Whether an action added or removed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// Which side of the cursor an action's text lies on.
///
/// `Left` is ordinary typing and backspace; `Right` is forward delete and
/// text placed after the cursor (auto-pair closers, undone forward deletes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One reversible edit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: EditKind,
    pub side: Side,
    /// Cursor offset when the run was opened.
    pub start: usize,
    frame: GrowVec<char>,
}

impl Action {
    pub fn new(kind: EditKind, side: Side, start: usize) -> Self {
        Self {
            kind,
            side,
            start,
            frame: GrowVec::new(FRAME_GROWTH),
        }
    }

    /// Units in edit order.
    pub fn frame(&self) -> &[char] {
        self.frame.as_slice()
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Cursor offset the replay has to start from.
    pub fn trailing_edge(&self) -> usize {
        match (self.kind, self.side) {
            (EditKind::Insert, Side::Left) => self.start + self.len(),
            (EditKind::Delete, Side::Left) => self.start.saturating_sub(self.len()),
            (_, Side::Right) => self.start,
        }
    }

    /// Turn the action into its own inverse.
    pub fn invert(&mut self) {
        self.start = match self.side {
            Side::Left => self.trailing_edge(),
            Side::Right => self.start,
        };
        self.kind = match self.kind {
            EditKind::Insert => EditKind::Delete,
            EditKind::Delete => EditKind::Insert,
        };
        self.frame.reverse();
    }

    fn accepts(&self, kind: EditKind, side: Side) -> bool {
        self.kind == kind && self.side == side
    }
}

/// Fixed-capacity circular stack. Pushing onto a full stack evicts the
/// oldest entry.
#[derive(Debug)]
struct RingStack {
    slots: Vec<Option<Action>>,
    head: usize,
    len: usize,
}

impl RingStack {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            len: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn prev(&self, i: usize) -> usize {
        (i + self.capacity() - 1) % self.capacity()
    }

    /// Push, returning the evicted oldest action when full.
    fn push(&mut self, action: Action) -> Option<Action> {
        let evicted = if self.len == self.capacity() {
            self.slots[self.head].take()
        } else {
            self.len += 1;
            None
        };
        self.slots[self.head] = Some(action);
        self.head = (self.head + 1) % self.capacity();
        evicted
    }

    fn pop(&mut self) -> Option<Action> {
        if self.len == 0 {
            return None;
        }
        self.head = self.prev(self.head);
        self.len -= 1;
        self.slots[self.head].take()
    }

    fn top(&self) -> Option<&Action> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.prev(self.head)].as_ref()
    }

    fn top_mut(&mut self) -> Option<&mut Action> {
        if self.len == 0 {
            return None;
        }
        let i = self.prev(self.head);
        self.slots[i].as_mut()
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}

/// Undo/redo history of coalesced edit runs.
///
/// An action stays open (appendable) until one of:
/// * an explicit `commit` (every non-character operation issues one);
/// * the expiry window, measured from when the action was opened;
/// * a change of kind or side;
/// * a newline, which always forms an action of its own.
#[derive(Debug)]
pub struct Timeline {
    undo: RingStack,
    redo: RingStack,
    open: bool,
    opened_at: Option<Instant>,
    expiry: Duration,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY, UNDO_EXPIRY)
    }
}

impl Timeline {
    pub fn new(capacity: usize, expiry: Duration) -> Self {
        Self {
            undo: RingStack::new(capacity),
            redo: RingStack::new(capacity),
            open: false,
            opened_at: None,
            expiry,
        }
    }

    pub fn capacity(&self) -> usize {
        self.undo.capacity()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len
    }

    /// True while the top undo action still accepts units.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn peek_undo(&self) -> Option<&Action> {
        self.undo.top()
    }

    fn expired(&self, now: Instant) -> bool {
        self.opened_at
            .is_none_or(|opened| now.saturating_duration_since(opened) > self.expiry)
    }

    /// Record one unit of a fresh edit. `cursor_before` is where the cursor
    /// stood before the unit was applied.
    pub fn record(
        &mut self,
        kind: EditKind,
        side: Side,
        unit: char,
        cursor_before: usize,
        now: Instant,
    ) -> Result<(), TextError> {
        if self.redo.len > 0 {
            self.redo.clear();
            trace!(target: "state.undo", "redo_cleared");
        }
        let boundary = !self.open
            || unit == '\n'
            || self.expired(now)
            || self.undo.top().is_none_or(|top| !top.accepts(kind, side));
        if boundary {
            if let Some(evicted) = self.undo.push(Action::new(kind, side, cursor_before)) {
                trace!(target: "state.undo", units = evicted.len(), "evict_oldest");
            }
            self.open = true;
            self.opened_at = Some(now);
            trace!(target: "state.undo", ?kind, ?side, start = cursor_before, depth = self.undo.len, "open_action");
        }
        if let Some(top) = self.undo.top_mut() {
            top.frame.push(unit)?;
        }
        if unit == '\n' {
            self.commit();
        }
        Ok(())
    }

    /// Close the open action, if any.
    pub fn commit(&mut self) {
        if self.open {
            self.open = false;
            trace!(target: "state.undo", depth = self.undo.len, "commit");
        }
    }

    pub fn pop_undo(&mut self) -> Option<Action> {
        self.commit();
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<Action> {
        self.commit();
        self.redo.pop()
    }

    pub fn push_undo(&mut self, action: Action) {
        self.open = false;
        if self.undo.push(action).is_some() {
            trace!(target: "state.undo", "evict_oldest");
        }
    }

    pub fn push_redo(&mut self, action: Action) {
        if self.redo.push(action).is_some() {
            trace!(target: "state.undo", "redo_evict_oldest");
        }
    }

    /// Forget all history (used after loading a file).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = false;
        self.opened_at = None;
        debug!(target: "state.undo", "timeline_cleared");
    }
}
