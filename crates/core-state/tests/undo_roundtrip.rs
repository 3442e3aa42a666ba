//! Property tests: any edit script fully undoes back to the loaded text and
//! fully redoes forward to the edited text. Pure edit scripts also restore
//! the cursor and every line start.

use core_state::{EditorSettings, EditorState};
use proptest::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum Op {
    Type(char),
    Backspace,
    Delete,
    Left(usize),
    Right(usize),
    Up(usize),
    Down(usize),
    Jump(usize),
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => prop::sample::select(vec!['a', 'b', ' ', '\n', '\t', '(', ')', '"', '[', ']'])
            .prop_map(Op::Type),
        2 => Just(Op::Backspace),
        2 => Just(Op::Delete),
        1 => (0usize..5).prop_map(Op::Left),
        1 => (0usize..5).prop_map(Op::Right),
        1 => (0usize..3).prop_map(Op::Up),
        1 => (0usize..3).prop_map(Op::Down),
        1 => (0usize..40).prop_map(Op::Jump),
        1 => (0u64..1500).prop_map(Op::Wait),
    ]
}

fn apply(st: &mut EditorState, ops: &[Op]) {
    let mut now = Instant::now();
    for op in ops {
        match op {
            Op::Type(ch) => st.insert_char_at(*ch, now).unwrap(),
            Op::Backspace => {
                st.delete_left_at(now).unwrap();
            }
            Op::Delete => {
                st.delete_right_at(now).unwrap();
            }
            Op::Left(n) => {
                st.move_left(*n);
            }
            Op::Right(n) => {
                st.move_right(*n);
            }
            Op::Up(n) => {
                st.move_up(*n);
            }
            Op::Down(n) => {
                st.move_down(*n);
            }
            Op::Jump(pos) => st.move_to(*pos),
            Op::Wait(ms) => now += Duration::from_millis(*ms),
        }
    }
}

proptest! {
    #[test]
    fn undo_all_then_redo_all(seed in "[ab\n(]{0,20}", ops in prop::collection::vec(op(), 0..120)) {
        let mut st = EditorState::new(EditorSettings {
            undo_capacity: 1024,
            ..EditorSettings::default()
        });
        st.load(&seed).unwrap();
        apply(&mut st, &ops);
        let edited = st.text().contents();

        while st.undo().unwrap() {}
        prop_assert_eq!(st.text().contents(), seed.clone());

        while st.redo().unwrap() {}
        prop_assert_eq!(st.text().contents(), edited);
    }

    #[test]
    fn line_index_survives_undo(ops in prop::collection::vec(op(), 0..80)) {
        let mut st = EditorState::default();
        apply(&mut st, &ops);
        while st.undo().unwrap() {}
        let text = st.text();
        let want_lines = text.contents().matches('\n').count() + 1;
        prop_assert_eq!(text.line_count(), want_lines);
        prop_assert_eq!(text.line_of(text.cursor()), text.cursor_line());
    }

    #[test]
    fn undo_restores_cursor_and_line_table(
        seed in "[ab\n]{0,24}",
        start in 0usize..30,
        edits in prop::collection::vec(edit(), 0..100),
    ) {
        let mut st = EditorState::new(EditorSettings {
            undo_capacity: 1024,
            ..EditorSettings::default()
        });
        st.load(&seed).unwrap();
        st.move_to(start);
        let cursor = st.cursor();
        let starts = line_starts(&st);

        apply(&mut st, &edits);
        while st.undo().unwrap() {}

        prop_assert_eq!(st.text().contents(), seed);
        prop_assert_eq!(st.cursor(), cursor);
        prop_assert_eq!(st.text().line_count(), starts.len());
        prop_assert_eq!(line_starts(&st), starts);
    }
}

fn edit() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => prop::sample::select(vec!['a', 'b', '\n', '\t', '(', ')', '"'])
            .prop_map(Op::Type),
        2 => Just(Op::Backspace),
        2 => Just(Op::Delete),
        1 => (0u64..1500).prop_map(Op::Wait),
    ]
}

fn line_starts(st: &EditorState) -> Vec<usize> {
    let text = st.text();
    (0..text.line_count())
        .map(|n| text.line_start(n).unwrap_or(usize::MAX))
        .collect()
}
