//! Text edit handling (insert/newline/backspace/delete).

use super::DispatchResult;
use core_state::EditorState;
use core_text::TextError;

pub(crate) fn handle_insert(ch: char, state: &mut EditorState) -> Result<DispatchResult, TextError> {
    let before = state.cursor();
    state.insert_char(ch)?;
    tracing::trace!(target: "actions.dispatch", op = "insert", ch = ?ch, at = before, to = state.cursor(), "edit");
    Ok(DispatchResult::dirty())
}

pub(crate) fn handle_delete_left(state: &mut EditorState) -> Result<DispatchResult, TextError> {
    let removed = state.delete_left()?;
    tracing::trace!(target: "actions.dispatch", op = "delete_left", removed, at = state.cursor(), "edit");
    Ok(DispatchResult::from_changed(removed))
}

pub(crate) fn handle_delete_right(state: &mut EditorState) -> Result<DispatchResult, TextError> {
    let removed = state.delete_right()?;
    tracing::trace!(target: "actions.dispatch", op = "delete_right", removed, at = state.cursor(), "edit");
    Ok(DispatchResult::from_changed(removed))
}
