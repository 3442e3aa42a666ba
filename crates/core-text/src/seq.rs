//! Growable sequence with an explicit capacity policy.
//!
//! `GrowVec<T>` is the one growable container shared by the undo frames and
//! the pair stack. It differs from a bare `Vec<T>` in two ways:
//! * capacity grows by a caller-chosen [`Growth`] policy instead of the
//!   standard library's doubling;
//! * growth is fallible and reported as [`TextError::Alloc`] so an exhausted
//!   allocator surfaces as a value the runtime can act on.

use crate::TextError;

/// Capacity growth policy shared by `GrowVec` and `GapBuffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Add a fixed number of slots on each growth.
    Step(usize),
    /// Multiply the current capacity by `num / den`.
    Factor { num: usize, den: usize },
}

impl Growth {
    /// 1.5x, used when a caller has no better idea.
    pub const DEFAULT: Growth = Growth::Factor { num: 3, den: 2 };

    /// Capacity after one growth step. Always at least `current + 1`.
    pub fn next_capacity(self, current: usize) -> usize {
        let grown = match self {
            Growth::Step(step) => current.saturating_add(step),
            Growth::Factor { num, den } => current.saturating_mul(num) / den.max(1),
        };
        grown.max(current.saturating_add(1))
    }
}

impl Default for Growth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowVec<T> {
    items: Vec<T>,
    growth: Growth,
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new(Growth::DEFAULT)
    }
}

impl<T> GrowVec<T> {
    /// Empty sequence; nothing is allocated until the first push.
    pub fn new(growth: Growth) -> Self {
        Self {
            items: Vec::new(),
            growth,
        }
    }

    pub fn with_capacity(capacity: usize, growth: Growth) -> Result<Self, TextError> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| TextError::Alloc {
                requested: capacity,
            })?;
        Ok(Self { items, growth })
    }

    pub fn push(&mut self, item: T) -> Result<(), TextError> {
        if self.items.len() == self.items.capacity() {
            self.grow()?;
        }
        self.items.push(item);
        Ok(())
    }

    fn grow(&mut self) -> Result<(), TextError> {
        let target = self.growth.next_capacity(self.items.capacity());
        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|_| TextError::Alloc { requested: target })?;
        tracing::trace!(target: "text.seq", capacity = self.items.capacity(), "grow");
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Drop all elements, keeping the storage for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_policy_adds_fixed_slots() {
        assert_eq!(Growth::Step(512).next_capacity(0), 512);
        assert_eq!(Growth::Step(512).next_capacity(512), 1024);
        // A zero step still makes progress.
        assert_eq!(Growth::Step(0).next_capacity(7), 8);
    }

    #[test]
    fn factor_policy_multiplies_with_floor_of_one() {
        let g = Growth::Factor { num: 3, den: 2 };
        assert_eq!(g.next_capacity(10), 15);
        assert_eq!(g.next_capacity(1), 2);
        assert_eq!(g.next_capacity(0), 1);
    }

    #[test]
    fn push_grows_by_policy() {
        let mut v = GrowVec::with_capacity(2, Growth::Step(4)).unwrap();
        for i in 0..3 {
            v.push(i).unwrap();
        }
        assert_eq!(v.as_slice(), &[0, 1, 2]);
        assert!(v.capacity() >= 6);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut v: GrowVec<char> = GrowVec::default();
        assert_eq!(v.pop(), None);
        assert_eq!(v.last(), None);
    }

    #[test]
    fn reverse_in_place() {
        let mut v = GrowVec::default();
        for c in "abc".chars() {
            v.push(c).unwrap();
        }
        v.reverse();
        assert_eq!(v.iter().collect::<String>(), "cba");
    }
}
