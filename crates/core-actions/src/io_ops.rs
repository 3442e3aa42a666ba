//! File IO helpers.
//!
//! Synchronous and minimal. `open_file` reads a whole file for
//! `EditorState::load`; `write_file` persists only what changed since the
//! last save when writing back to the file the text came from.

use core_state::EditorState;
use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Result of attempting to open a file.
#[derive(Debug)]
pub enum OpenFileResult {
    Success(OpenSuccess),
    /// The path does not exist yet.
    NotFound,
    Error, // caller logs / sets ephemeral already
}

#[derive(Debug)]
pub struct OpenSuccess {
    pub content: String,
    pub file_name: PathBuf,
}

/// Read `path` as UTF-8 text.
pub fn open_file(path: &Path) -> OpenFileResult {
    match fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!(target: "io", path = %path.display(), bytes = content.len(), "file_open");
            OpenFileResult::Success(OpenSuccess {
                content,
                file_name: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(target: "io", path = %path.display(), "file_not_found");
            OpenFileResult::NotFound
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_open_error");
            OpenFileResult::Error
        }
    }
}

/// Open `path`, creating it empty when it does not exist.
pub fn open_or_create(path: &Path) -> io::Result<OpenSuccess> {
    match open_file(path) {
        OpenFileResult::Success(s) => Ok(s),
        OpenFileResult::NotFound => {
            fs::File::create(path)?;
            tracing::info!(target: "io", path = %path.display(), "file_created");
            Ok(OpenSuccess {
                content: String::new(),
                file_name: path.to_path_buf(),
            })
        }
        OpenFileResult::Error => Err(io::Error::other(format!(
            "cannot read {}",
            path.display()
        ))),
    }
}

/// Result of a write attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteFileResult {
    /// Bytes written to disk.
    Success { bytes: usize },
    NoFilename,
    Error,
}

/// Persist the text to its file name (or `target`).
///
/// Writing back to the file the text was loaded from only rewrites the
/// suffix starting at the lowest changed offset and truncates whatever the
/// old file had past the new end. Any other target receives the full text.
pub fn write_file(state: &mut EditorState, target: Option<&Path>) -> WriteFileResult {
    let path = if let Some(p) = target {
        p.to_path_buf()
    } else if let Some(existing) = state.file_name.clone() {
        existing
    } else {
        return WriteFileResult::NoFilename;
    };
    let same_file = state.file_name.as_deref() == Some(path.as_path()) && path.exists();
    let result = if same_file {
        write_suffix(state, &path)
    } else {
        let content = state.text().contents();
        fs::write(&path, content.as_bytes()).map(|_| content.len())
    };
    match result {
        Ok(bytes) => {
            tracing::info!(target: "io", path = %path.display(), bytes, suffix = same_file, "file_write");
            state.mark_saved();
            WriteFileResult::Success { bytes }
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_write_error");
            WriteFileResult::Error
        }
    }
}

fn write_suffix(state: &EditorState, path: &Path) -> io::Result<usize> {
    let Some((offset, suffix)) = state.unsaved_suffix() else {
        return Ok(0);
    };
    let byte_offset = state.text().byte_len(0, offset) as u64;
    let mut file = OpenOptions::new().write(true).open(path)?;
    file.seek(SeekFrom::Start(byte_offset))?;
    file.write_all(suffix.as_bytes())?;
    file.set_len(byte_offset + suffix.len() as u64)?;
    file.flush()?;
    Ok(suffix.len())
}
