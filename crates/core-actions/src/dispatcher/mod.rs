//! Dispatcher applying `Action` to an `EditorModel`.
//!
//! Sub-modules keep each concern small:
//! * `motion` - cursor movement, including page motions sized by the view
//! * `edit`   - insert / newline / delete
//! * `undo`   - undo / redo replay
//! * `save`   - writing the text back to disk
//!
//! Every handler reports whether a repaint is needed via `DispatchResult`.
//! Allocation failures while growing the text or history bubble up as
//! `TextError` so the caller can decide to abort.

use crate::Action;
use core_model::EditorModel;
use core_text::TextError;
use std::time::Duration;

mod edit;
mod motion;
mod save;
mod undo;

/// Lifetime of status line messages set by the dispatcher.
pub const EPHEMERAL_TTL: Duration = Duration::from_secs(3);

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }

    fn from_changed(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action to the model. Returns `DispatchResult` describing whether
/// a render is needed (`dirty`) or the editor should exit (`quit`).
pub fn dispatch(action: Action, model: &mut EditorModel) -> Result<DispatchResult, TextError> {
    tracing::trace!(target: "actions.dispatch", ?action, "dispatch");
    let page = model.last_text_height().max(1);
    let state = model.state_mut();
    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, page, state),
        Action::Insert(ch) => edit::handle_insert(ch, state)?,
        Action::Newline => edit::handle_insert('\n', state)?,
        Action::DeleteLeft => edit::handle_delete_left(state)?,
        Action::DeleteRight => edit::handle_delete_right(state)?,
        Action::Undo => undo::handle_undo(state)?,
        Action::Redo => undo::handle_redo(state)?,
        Action::Save => save::handle_save(state),
        Action::Quit => DispatchResult::quit(),
    };
    Ok(result)
}
