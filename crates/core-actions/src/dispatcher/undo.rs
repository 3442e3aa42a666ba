//! Undo / Redo dispatch.
//!
//! Replay lives in `EditorState`; this layer only logs and reports.

use super::DispatchResult;
use core_state::EditorState;
use core_text::TextError;

pub(crate) fn handle_undo(state: &mut EditorState) -> Result<DispatchResult, TextError> {
    let applied = state.undo()?;
    tracing::trace!(target: "actions.dispatch", op = "undo", applied, cursor = state.cursor(), "undo");
    Ok(DispatchResult::from_changed(applied))
}

pub(crate) fn handle_redo(state: &mut EditorState) -> Result<DispatchResult, TextError> {
    let applied = state.redo()?;
    tracing::trace!(target: "actions.dispatch", op = "redo", applied, cursor = state.cursor(), "redo");
    Ok(DispatchResult::from_changed(applied))
}
