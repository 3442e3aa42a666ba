//! ated entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::io_ops::{self, OpenFileResult};
use core_actions::{EPHEMERAL_TTL, dispatch, translate_key};
use core_config::{Config, ConfigContext, load_from};
use core_events::InputEvent;
use core_model::{EditorModel, STATUS_ROWS, Viewport};
use core_state::EditorState;
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod render;

const LOG_FILE: &str = "ated.log";
const DEFAULT_FILE: &str = "untitled.txt";
/// Upper bound on how long an expired status message stays painted.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ated", version, about = "A small terminal text editor")]
struct Args {
    /// File to edit. Defaults to `untitled.txt` in the working directory.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `ated.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Text to start with and the name it saves under.
#[derive(Debug)]
struct Opened {
    content: String,
    file_name: Option<PathBuf>,
    status: Option<String>,
}

/// Resolve the startup file. An explicit path that does not exist yet is
/// created on first save; the default path is created immediately and is
/// the only fatal failure.
fn open_target(path: Option<&Path>, default: &Path) -> Result<Opened> {
    let Some(path) = path else {
        let s = io_ops::open_or_create(default)
            .with_context(|| format!("cannot create {}", default.display()))?;
        return Ok(Opened {
            content: s.content,
            file_name: Some(s.file_name),
            status: None,
        });
    };
    Ok(match io_ops::open_file(path) {
        OpenFileResult::Success(s) => Opened {
            content: s.content,
            file_name: Some(s.file_name),
            status: None,
        },
        OpenFileResult::NotFound => Opened {
            content: String::new(),
            file_name: Some(path.to_path_buf()),
            status: Some(format!("New file {}", path.display())),
        },
        OpenFileResult::Error => Opened {
            content: String::new(),
            file_name: None,
            status: Some(format!("Cannot open {}", path.display())),
        },
    })
}

fn build_model(opened: Opened, config: &Config) -> Result<EditorModel> {
    let mut state = EditorState::new(config.editor_settings());
    state.load(&opened.content).context("loading text")?;
    state.file_name = opened.file_name;
    if let Some(msg) = opened.status {
        state.set_ephemeral(msg, EPHEMERAL_TTL);
    }
    let mut model = EditorModel::new(state);
    model.set_gutter(config.gutter());
    Ok(model)
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue { repaint: bool },
    Quit,
}

struct App {
    model: EditorModel,
    config: Config,
    cols: u16,
    rows: u16,
}

impl App {
    fn new(model: EditorModel, mut config: Config, cols: u16, rows: u16) -> Self {
        config.apply_context(ConfigContext::new(cols, rows, STATUS_ROWS as u16));
        let mut app = Self {
            model,
            config,
            cols,
            rows,
        };
        app.sync_margin();
        app
    }

    fn sync_margin(&mut self) {
        self.model
            .set_scroll_margin(usize::from(self.config.effective_scroll_margin));
    }

    fn viewport(&self) -> Viewport {
        Viewport::from_terminal(self.cols, self.rows)
    }

    fn handle_event(&mut self, event: InputEvent) -> Result<LoopControl> {
        match event {
            InputEvent::Resize(cols, rows) => {
                self.cols = cols;
                self.rows = rows;
                let ctx = ConfigContext::new(cols, rows, STATUS_ROWS as u16);
                if let Some(margin) = self.config.recompute_with_context(ctx) {
                    info!(target: "runtime", margin, "scroll_margin_changed");
                }
                self.sync_margin();
                Ok(LoopControl::Continue { repaint: true })
            }
            InputEvent::Key(key) => {
                let Some(action) = translate_key(&key) else {
                    return Ok(LoopControl::Continue { repaint: false });
                };
                let result = dispatch(action, &mut self.model).context("dispatch")?;
                if result.quit {
                    if self.model.state().dirty() {
                        warn!(target: "runtime", "quit_with_unsaved_changes");
                    }
                    return Ok(LoopControl::Quit);
                }
                Ok(LoopControl::Continue {
                    repaint: result.dirty,
                })
            }
        }
    }

    fn frame(&mut self) -> render::Frame {
        let viewport = self.viewport();
        self.model.update_view(viewport.height, viewport.width);
        render::compose(&self.model, self.cols, self.rows)
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_from(args.config.clone())?;
    let opened = open_target(args.path.as_deref(), Path::new(DEFAULT_FILE))?;
    let model = build_model(opened, &config)?;

    let mut backend = CrosstermBackend::new();
    backend.set_title("ated")?;
    let mut guard = backend.enter_guard()?;
    let (cols, rows) = guard.backend().size()?;
    let mut app = App::new(model, config, cols, rows);
    info!(
        target: "runtime.startup",
        path = ?app.model.state().file_name,
        cols,
        rows,
        margin = app.config.effective_scroll_margin,
        "bootstrap_complete"
    );

    let mut out = stdout();
    let mut repaint = true;
    loop {
        if repaint && !app.viewport().is_degenerate() {
            let frame = app.frame();
            render::paint(&frame, &mut out)?;
        }
        repaint = false;
        if let Some(event) = guard.backend().poll_event(POLL_INTERVAL)? {
            match app.handle_event(event)? {
                LoopControl::Continue { repaint: r } => repaint = r,
                LoopControl::Quit => break,
            }
        }
        if app.model.state_mut().tick_ephemeral() {
            repaint = true;
        }
    }
    info!(target: "runtime", "shutdown");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");
    let result = run(args);
    if let Err(e) = &result {
        error!(target: "runtime", error = %format!("{e:#}"), "fatal");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent};
    use pretty_assertions::assert_eq;

    fn app(text: &str, cols: u16, rows: u16) -> App {
        let config = Config::default();
        let opened = Opened {
            content: text.to_string(),
            file_name: None,
            status: None,
        };
        let model = build_model(opened, &config).unwrap();
        App::new(model, config, cols, rows)
    }

    #[test]
    fn default_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join(DEFAULT_FILE);
        let opened = open_target(None, &default).unwrap();
        assert!(default.exists());
        assert_eq!(opened.content, "");
        assert_eq!(opened.file_name.as_deref(), Some(default.as_path()));
    }

    #[test]
    fn missing_explicit_path_is_not_created_until_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.txt");
        let opened = open_target(Some(&path), Path::new("unused")).unwrap();
        assert!(!path.exists());
        assert!(opened.status.is_some());
        assert_eq!(opened.file_name.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn existing_file_loads_with_cursor_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one\ntwo").unwrap();
        let opened = open_target(Some(&path), Path::new("unused")).unwrap();
        let model = build_model(opened, &Config::default()).unwrap();
        assert_eq!(model.state().text().line_count(), 2);
        assert_eq!(model.state().cursor(), 0);
        assert!(!model.state().dirty());
    }

    #[test]
    fn keys_edit_and_quit() {
        let mut a = app("", 80, 24);
        let r = a
            .handle_event(InputEvent::Key(KeyEvent::plain(KeyCode::Char('x'))))
            .unwrap();
        assert_eq!(r, LoopControl::Continue { repaint: true });
        assert_eq!(a.model.state().text().contents(), "x");
        let r = a
            .handle_event(InputEvent::Key(KeyEvent::plain(KeyCode::Esc)))
            .unwrap();
        assert_eq!(r, LoopControl::Continue { repaint: false });
        let r = a.handle_event(InputEvent::Key(KeyEvent::ctrl('q'))).unwrap();
        assert_eq!(r, LoopControl::Quit);
    }

    #[test]
    fn resize_reclamps_scroll_margin() {
        let mut a = app("", 80, 24);
        assert_eq!(a.model.scroll_margin(), 3);
        a.handle_event(InputEvent::Resize(80, 6)).unwrap();
        // 5 text rows -> (5 - 2) / 2
        assert_eq!(a.model.scroll_margin(), 1);
        a.handle_event(InputEvent::Resize(80, 3)).unwrap();
        assert_eq!(a.model.scroll_margin(), 0);
    }

    #[test]
    fn frame_keeps_cursor_on_screen() {
        let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut a = app(&text, 40, 12);
        for _ in 0..50 {
            a.handle_event(InputEvent::Key(KeyEvent::plain(KeyCode::Down)))
                .unwrap();
        }
        let f = a.frame();
        let (_, row) = f.cursor;
        assert!(usize::from(row) < f.rows.len());
        assert!(f.rows[usize::from(row)].ends_with("50"));
    }
}
