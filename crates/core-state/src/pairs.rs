//! Bracket and quote auto-pairing.
//!
//! The matcher only decides; `EditorState` performs the edits so they go
//! through the usual recording path.

use core_text::{GrowVec, Growth, TextError};
use tracing::trace;

const PAIRS: [(char, char); 6] = [
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

/// Closer paired with `opener`, if it is one.
pub fn closer_of(opener: char) -> Option<char> {
    PAIRS
        .iter()
        .find_map(|&(open, close)| (open == opener).then_some(close))
}

pub fn is_quote(unit: char) -> bool {
    matches!(unit, '"' | '\'' | '`')
}

#[derive(Debug, Clone)]
pub struct PairMatcher {
    stack: GrowVec<char>,
}

impl Default for PairMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PairMatcher {
    pub fn new() -> Self {
        Self {
            stack: GrowVec::new(Growth::Step(8)),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Typing `unit` over `under_cursor` should step past the auto-inserted
    /// closer instead of inserting. Pops the stack when it does.
    pub fn take_skip(&mut self, unit: char, under_cursor: char) -> bool {
        let skip = self
            .stack
            .last()
            .and_then(|&open| closer_of(open))
            .is_some_and(|close| close == unit && under_cursor == unit);
        if skip {
            self.stack.pop();
            trace!(target: "state.pairs", closer = ?unit, depth = self.stack.len(), "skip_over");
        }
        skip
    }

    /// Closer to auto-insert after typing `unit` right after `prev`.
    /// Quotes following an alphanumeric unit are left alone.
    pub fn closer_for(&self, unit: char, prev: char) -> Option<char> {
        if is_quote(unit) && prev.is_alphanumeric() {
            return None;
        }
        closer_of(unit)
    }

    pub fn push(&mut self, opener: char) -> Result<(), TextError> {
        self.stack.push(opener)?;
        trace!(target: "state.pairs", opener = ?opener, depth = self.stack.len(), "push");
        Ok(())
    }

    pub fn reset(&mut self) {
        if !self.stack.is_empty() {
            trace!(target: "state.pairs", depth = self.stack.len(), "reset");
            self.stack.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closers_for_all_pairs() {
        assert_eq!(closer_of('('), Some(')'));
        assert_eq!(closer_of('['), Some(']'));
        assert_eq!(closer_of('{'), Some('}'));
        assert_eq!(closer_of('"'), Some('"'));
        assert_eq!(closer_of('`'), Some('`'));
        assert_eq!(closer_of(')'), None);
        assert_eq!(closer_of('a'), None);
    }

    #[test]
    fn quote_after_alphanumeric_is_not_paired() {
        let pm = PairMatcher::new();
        assert_eq!(pm.closer_for('\'', 't'), None);
        assert_eq!(pm.closer_for('\'', ' '), Some('\''));
        assert_eq!(pm.closer_for('(', 'a'), Some(')'));
    }

    #[test]
    fn skip_requires_matching_top_and_unit_under_cursor() {
        let mut pm = PairMatcher::new();
        pm.push('(').unwrap();
        assert!(!pm.take_skip(')', 'x'));
        assert!(!pm.take_skip(']', ']'));
        assert!(pm.take_skip(')', ')'));
        assert_eq!(pm.depth(), 0);
        assert!(!pm.take_skip(')', ')'));
    }

    #[test]
    fn reset_clears_stack() {
        let mut pm = PairMatcher::new();
        pm.push('[').unwrap();
        pm.push('{').unwrap();
        assert_eq!(pm.depth(), 2);
        pm.reset();
        assert_eq!(pm.depth(), 0);
    }
}
