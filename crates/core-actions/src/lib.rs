//! Actions: the vocabulary between decoded keys and editor state.
//!
//! `translate_key` maps a `KeyEvent` to an `Action`; `dispatch` applies it to
//! an `EditorModel`. File IO lives in `io_ops` so the dispatcher stays free of
//! filesystem details.

pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchResult, EPHEMERAL_TTL, dispatch};
pub use key_translator::translate_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Newline,
    DeleteLeft,
    DeleteRight,
    Motion(MotionKind),
    Undo,
    Redo,
    Save,
    Quit,
}
