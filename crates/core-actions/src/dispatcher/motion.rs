//! Motion handling.
//!
//! Horizontal motions cross line boundaries; vertical motions keep the
//! sticky column. Page motions are vertical motions of `page` lines.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditorState;

pub(crate) fn handle_motion(kind: MotionKind, page: usize, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor();
    match kind {
        MotionKind::Left => {
            state.move_left(1);
        }
        MotionKind::Right => {
            state.move_right(1);
        }
        MotionKind::Up => {
            state.move_up(1);
        }
        MotionKind::Down => {
            state.move_down(1);
        }
        MotionKind::PageUp => {
            state.move_up(page);
        }
        MotionKind::PageDown => {
            state.move_down(page);
        }
        MotionKind::LineStart => state.move_line_start(),
        MotionKind::LineEnd => state.move_line_end(),
    }
    let after = state.cursor();
    tracing::trace!(target: "actions.dispatch", op = "motion", ?kind, from = before, to = after, "motion");
    DispatchResult::from_changed(before != after)
}
