//! Configuration loading and parsing.
//!
//! Parses `ated.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [scroll]
//! margin = 3
//! [editor]
//! tab_stop = 4
//! gutter = 8
//! auto_pairs = true
//! [undo]
//! capacity = 128
//! expiry_ms = 650
//! ```
//!
//! Every field is optional. Unknown fields are ignored; a file that fails to
//! parse is logged and replaced by defaults. The scroll margin is clamped at
//! `(h - 2) / 2` where `h` is the current text height supplied by the caller
//! through `Config::apply_context`; the raw value is retained so a resize can
//! re-clamp it.

use anyhow::{Context, Result};
use core_state::EditorSettings;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "ated.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            status_rows,
        }
    }

    pub fn text_rows(&self) -> u16 {
        self.viewport_rows.saturating_sub(self.status_rows)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_margin")]
    pub margin: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            margin: Self::default_margin(),
        }
    }
}

impl ScrollConfig {
    const fn default_margin() -> u16 {
        3
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_stop")]
    pub tab_stop: u16,
    #[serde(default = "EditorConfig::default_gutter")]
    pub gutter: u16,
    #[serde(default = "EditorConfig::default_auto_pairs")]
    pub auto_pairs: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
            gutter: Self::default_gutter(),
            auto_pairs: Self::default_auto_pairs(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_stop() -> u16 {
        4
    }
    const fn default_gutter() -> u16 {
        8
    }
    const fn default_auto_pairs() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UndoConfig {
    #[serde(default = "UndoConfig::default_capacity")]
    pub capacity: u32,
    #[serde(default = "UndoConfig::default_expiry_ms")]
    pub expiry_ms: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            expiry_ms: Self::default_expiry_ms(),
        }
    }
}

impl UndoConfig {
    const fn default_capacity() -> u32 {
        128
    }
    const fn default_expiry_ms() -> u64 {
        650
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file text as read
    pub path: Option<PathBuf>,
    pub file: ConfigFile,          // parsed (or default) data
    pub effective_scroll_margin: u16, // clamped to viewport semantics
}

/// Best-effort config path: working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ated").join(CONFIG_FILE_NAME);
    }
    local
}

/// Parse configuration text. Errors carry the TOML diagnostic.
pub fn parse(content: &str) -> Result<ConfigFile> {
    toml::from_str::<ConfigFile>(content).context("invalid configuration")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match parse(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
                effective_scroll_margin: 0, // computed later
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %format!("{e:#}"), "config_parse_error_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Apply viewport context to compute the clamped scroll margin.
    /// Returns the effective (possibly clamped) value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.scroll.margin;
        let text_rows = ctx.text_rows();
        let (clamped, max) = if text_rows <= 3 {
            (0, 0)
        } else {
            let max = (text_rows.saturating_sub(2)) / 2; // (h - 2)/2 using text rows
            (raw.min(max), max)
        };

        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                viewport_rows = ctx.viewport_rows,
                status_rows = ctx.status_rows,
                "scroll_margin_clamped"
            );
        }
        self.effective_scroll_margin = clamped;
        clamped
    }

    /// Recompute the effective margin after a resize. Returns
    /// `Some(new_margin)` when the effective value changed, else `None`.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_scroll_margin;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    /// Settings for `EditorState`. Zero values fall back to the minimum that
    /// keeps the editor usable.
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            tab_stop: usize::from(self.file.editor.tab_stop.max(1)),
            auto_pairs: self.file.editor.auto_pairs,
            undo_capacity: (self.file.undo.capacity as usize).max(1),
            undo_expiry: Duration::from_millis(self.file.undo.expiry_ms),
        }
    }

    pub fn gutter(&self) -> usize {
        usize::from(self.file.editor.gutter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    fn ctx_with_text_rows(rows: u16) -> ConfigContext {
        ConfigContext::new(80, rows, 0)
    }

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.file.scroll.margin, 3);
        assert_eq!(cfg.file.editor.tab_stop, 4);
        assert_eq!(cfg.file.editor.gutter, 8);
        assert!(cfg.file.editor.auto_pairs);
        assert_eq!(cfg.file.undo.capacity, 128);
        assert_eq!(cfg.file.undo.expiry_ms, 650);
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_tmp(
            "[scroll]\nmargin = 5\n[editor]\ntab_stop = 8\ngutter = 6\nauto_pairs = false\n[undo]\ncapacity = 16\nexpiry_ms = 1000\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.scroll.margin, 5);
        assert_eq!(cfg.gutter(), 6);
        let s = cfg.editor_settings();
        assert_eq!(s.tab_stop, 8);
        assert!(!s.auto_pairs);
        assert_eq!(s.undo_capacity, 16);
        assert_eq!(s.undo_expiry, Duration::from_millis(1000));
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn partial_sections_keep_defaults_and_ignore_unknown_fields() {
        let tmp = write_tmp("[editor]\ntab_stop = 2\ncolor = \"red\"\n[theme]\nname = \"x\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_stop, 2);
        assert_eq!(cfg.file.editor.gutter, 8);
        assert_eq!(cfg.file.scroll.margin, 3);
    }

    #[test]
    fn parse_error_falls_back_to_defaults_and_logs() {
        let tmp = write_tmp("[scroll]\nmargin = \"lots\"\n");
        let mut cfg = None;
        let logs = capture_logs(|| {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        assert_eq!(cfg.unwrap().file, ConfigFile::default());
        assert!(logs.contains("WARN config:"));
        assert!(logs.contains("config_parse_error_using_defaults"));
    }

    #[test]
    fn zero_values_are_floored_in_settings() {
        let tmp = write_tmp("[editor]\ntab_stop = 0\n[undo]\ncapacity = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let s = cfg.editor_settings();
        assert_eq!(s.tab_stop, 1);
        assert_eq!(s.undo_capacity, 1);
    }

    #[test]
    fn clamps_when_value_exceeds_half_minus_one() {
        let tmp = write_tmp("[scroll]\nmargin = 50\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        // text height 20 -> max = (20 - 2)/2 = 9
        let eff = cfg.apply_context(ctx_with_text_rows(20));
        assert_eq!(eff, 9);
        assert_eq!(cfg.effective_scroll_margin, 9);
    }

    #[test]
    fn tiny_viewport_disables_margin() {
        let mut cfg = Config::default();
        assert_eq!(cfg.apply_context(ctx_with_text_rows(3)), 0);
    }

    #[test]
    fn recompute_with_context_changes_when_height_shrinks() {
        let tmp = write_tmp("[scroll]\nmargin = 10\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        cfg.apply_context(ctx_with_text_rows(50)); // plenty of room, margin=10
        assert_eq!(cfg.effective_scroll_margin, 10);
        // text rows reduce to 10 -> max=(10-2)/2=4
        let changed = cfg.recompute_with_context(ctx_with_text_rows(10));
        assert_eq!(changed, Some(4));
        assert_eq!(cfg.effective_scroll_margin, 4);
        let changed2 = cfg.recompute_with_context(ctx_with_text_rows(11)); // max=(11-2)/2=4
        assert_eq!(changed2, None);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_tmp("[scroll]\nmargin = 8\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let logs = capture_logs(|| {
            // rows=7, status=1 -> text rows 6 -> max=(6-2)/2 = 2
            cfg.apply_context(ConfigContext::new(80, 7, 1));
        });
        assert!(logs.contains("INFO config:"));
        assert!(logs.contains("scroll_margin_clamped"));
        assert_eq!(cfg.effective_scroll_margin, 2);
    }
}
