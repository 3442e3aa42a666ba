//! Save handling: write through `io_ops` and report on the status line.

use super::{DispatchResult, EPHEMERAL_TTL};
use crate::io_ops::{self, WriteFileResult};
use core_state::EditorState;

pub(crate) fn handle_save(state: &mut EditorState) -> DispatchResult {
    let message = match io_ops::write_file(state, None) {
        WriteFileResult::Success { bytes } => format!("Saved {bytes} bytes"),
        WriteFileResult::NoFilename => "No file name".to_string(),
        WriteFileResult::Error => "Save failed".to_string(),
    };
    state.set_ephemeral(message, EPHEMERAL_TTL);
    DispatchResult::dirty()
}
