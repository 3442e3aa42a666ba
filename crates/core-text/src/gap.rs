//! Gap buffer over fixed-width units.
//!
//! Physical layout (`end = capacity - 1`):
//!
//! ```text
//! [0 ........ c)[c ..... ce](ce ........ end]
//!   left text     gap        right text
//! ```
//!
//! Invariants (after every public call):
//! * `0 <= c <= ce <= end < capacity`; the gap always keeps at least one slot.
//! * Logical length is `c + (end - ce)`.
//! * Logical index `i` lives at physical `i` when `i < c`, otherwise at
//!   `i + (ce - c) + 1`.
//!
//! All edits happen at `c`. Moving the gap costs O(distance); inserting is
//! O(1) amortized with growth governed by a [`Growth`] policy. Physical
//! offsets never leave this module.

use crate::{Growth, TextError};

#[derive(Debug, Clone)]
pub struct GapBuffer<T> {
    data: Vec<T>,
    c: usize,
    ce: usize,
    growth: Growth,
}

impl<T: Copy + Default> GapBuffer<T> {
    /// Empty buffer with the default growth factor.
    pub fn new(capacity: usize) -> Self {
        Self::with_capacity(capacity, Growth::DEFAULT)
    }

    /// Empty buffer with `capacity` physical slots (at least one).
    pub fn with_capacity(capacity: usize, growth: Growth) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![T::default(); capacity],
            c: 0,
            ce: capacity - 1,
            growth,
        }
    }

    /// Buffer holding `units` with the gap at the end.
    pub fn from_slice(units: &[T], spare: usize, growth: Growth) -> Self {
        let capacity = units.len() + spare.max(1);
        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(units);
        data.resize(capacity, T::default());
        Self {
            data,
            c: units.len(),
            ce: capacity - 1,
            growth,
        }
    }

    fn end(&self) -> usize {
        self.data.len() - 1
    }

    fn gap_width(&self) -> usize {
        self.ce - self.c + 1
    }

    fn physical(&self, logical: usize) -> usize {
        if logical < self.c {
            logical
        } else {
            logical + self.gap_width()
        }
    }

    pub fn len(&self) -> usize {
        self.c + (self.end() - self.ce)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical position of the gap (the edit point).
    pub fn position(&self) -> usize {
        self.c
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Unit at logical index `i`, or `T::default()` past the end.
    pub fn get(&self, i: usize) -> T {
        if i < self.len() {
            self.data[self.physical(i)]
        } else {
            T::default()
        }
    }

    /// Overwrite the unit at logical index `i`. Returns false (and changes
    /// nothing) when `i` is out of range.
    pub fn set(&mut self, i: usize, unit: T) -> bool {
        if i < self.len() {
            let p = self.physical(i);
            self.data[p] = unit;
            true
        } else {
            false
        }
    }

    /// Make sure the next `insert` cannot allocate.
    pub fn reserve(&mut self) -> Result<(), TextError> {
        if self.c >= self.ce {
            self.grow()?;
        }
        Ok(())
    }

    pub fn insert(&mut self, unit: T) -> Result<(), TextError> {
        self.reserve()?;
        self.data[self.c] = unit;
        self.c += 1;
        Ok(())
    }

    /// Remove the unit left of the gap (backspace).
    pub fn remove_left(&mut self) -> Option<T> {
        if self.c == 0 {
            return None;
        }
        self.c -= 1;
        Some(self.data[self.c])
    }

    /// Remove the unit right of the gap (forward delete).
    pub fn remove_right(&mut self) -> Option<T> {
        if self.ce == self.end() {
            return None;
        }
        self.ce += 1;
        Some(self.data[self.ce])
    }

    /// Move the gap up to `n` units left. Returns the distance moved.
    pub fn move_left(&mut self, n: usize) -> usize {
        let k = n.min(self.c);
        if k > 0 {
            self.data.copy_within(self.c - k..self.c, self.ce + 1 - k);
            self.c -= k;
            self.ce -= k;
        }
        k
    }

    /// Move the gap up to `n` units right. Returns the distance moved.
    pub fn move_right(&mut self, n: usize) -> usize {
        let k = n.min(self.end() - self.ce);
        if k > 0 {
            self.data.copy_within(self.ce + 1..self.ce + 1 + k, self.c);
            self.c += k;
            self.ce += k;
        }
        k
    }

    /// Move the gap so that `position() == pos` (clamped to the length).
    pub fn move_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos < self.c {
            self.move_left(self.c - pos);
        } else if pos > self.c {
            self.move_right(pos - self.c);
        }
    }

    /// Units in the logical range `[start, end)`, clamped to the length.
    pub fn iter_range(&self, start: usize, end: usize) -> impl Iterator<Item = T> + '_ {
        let end = end.min(self.len());
        (start.min(end)..end).map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.data[..self.c]);
        out.extend_from_slice(&self.data[self.ce + 1..]);
        out
    }

    // The right partition is relocated to the new end before `ce` moves.
    fn grow(&mut self) -> Result<(), TextError> {
        let old_capacity = self.data.len();
        let right_len = self.end() - self.ce;
        let new_capacity = self.growth.next_capacity(old_capacity);
        self.data
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|_| TextError::Alloc {
                requested: new_capacity,
            })?;
        self.data.resize(new_capacity, T::default());
        if right_len > 0 {
            self.data.copy_within(
                old_capacity - right_len..old_capacity,
                new_capacity - right_len,
            );
        }
        self.ce = new_capacity - 1 - right_len;
        tracing::trace!(target: "text.gap", old_capacity, new_capacity, right_len, "grow");
        Ok(())
    }
}
