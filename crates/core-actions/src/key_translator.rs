//! Key -> Action translation.
//!
//! Stateless: every key maps to at most one action. Keys with no meaning
//! (Esc, Alt chords, unbound Ctrl chords) translate to `None`.

use crate::{Action, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'z' => Some(Action::Undo),
                'y' | 'r' => Some(Action::Redo),
                's' => Some(Action::Save),
                'q' => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char(_) if key.mods.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) if !c.is_control() => Action::Insert(c),
        KeyCode::Char(_) => return None,
        KeyCode::Tab => Action::Insert('\t'),
        KeyCode::Enter => Action::Newline,
        KeyCode::Backspace => Action::DeleteLeft,
        KeyCode::Delete => Action::DeleteRight,
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        KeyCode::PageUp => Action::Motion(MotionKind::PageUp),
        KeyCode::PageDown => Action::Motion(MotionKind::PageDown),
        KeyCode::Esc => return None,
    };
    Some(action)
}
