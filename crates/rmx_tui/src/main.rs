//! Stream Remux Organizer - Main entry point
//!
//! This is the terminal application entry point. It handles:
//! - Argument parsing
//! - Configuration loading
//! - Application-level logging initialization
//! - Terminal setup, the event loop and terminal restore

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use rmx_core::browse::{DirectoryLister, FsLister};
use rmx_core::config::{ConfigManager, ConfigSection};
use rmx_core::logging::{init_tracing_with_file, LogLevel, SessionLogger};
use rmx_core::mux::{FfmpegRemuxer, Remuxer};
use rmx_core::probe::{FfprobeProber, Prober};
use rmx_core::runner::CommandRunner;
use rmx_core::session::Session;

mod app;
mod ui;

use app::{App, AppCommand};

type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Browse directories, pick and reorder the streams of a media file, and
/// write a stream-copy remux with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "rmx", version, about)]
struct Args {
    /// Directory to start in (default: last visited, then the working directory)
    path: Option<PathBuf>,

    /// Config file (default: <config dir>/rmx/settings.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level for this run: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

/// Default config path: <config dir>/rmx/settings.toml, or .config/settings.toml
/// relative to the working directory when there is no config dir.
fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("rmx").join("settings.toml"),
        None => PathBuf::from(".config").join("settings.toml"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for logs directory path)
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }
    if let Err(e) = config_manager.ensure_dirs_exist() {
        eprintln!("Warning: Failed to create directories: {}", e);
    }

    let settings = config_manager.settings().clone();
    let level = match args.log_level.as_deref() {
        Some(name) => LogLevel::from_name(name)
            .with_context(|| format!("unknown log level '{}'", name))?,
        None => settings.logging.level,
    };

    // Initialize application-level logging
    let logs_dir = config_manager.logs_folder();
    let _log_guard = match init_tracing_with_file(level, &logs_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to set up log file: {}", e);
            None
        }
    };

    tracing::info!("Stream Remux Organizer starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", rmx_core::version());

    let mut log_config = settings.logging.to_log_config();
    log_config.level = level;
    let logger = Arc::new(
        SessionLogger::new(SessionLogger::timestamped_name(), &logs_dir, log_config, None)
            .context("failed creating session log")?,
    );
    tracing::debug!("Session log: {}", logger.log_path().display());

    let prober = FfprobeProber::new(&settings.tools.ffprobe)
        .with_runner(CommandRunner::with_timeout_secs(settings.remux.timeout_secs));
    let remuxer = FfmpegRemuxer::new(&settings.tools.ffmpeg, settings.remux.clone())
        .with_logger(Arc::clone(&logger))
        .log_options(
            settings.logging.show_options_pretty,
            settings.logging.show_options_json,
        );
    let session = Session::new(FsLister, prober, remuxer, settings.remux.output_suffix.clone());

    let start_dir = start_directory(args.path, &settings.paths.last_directory)?;
    let mut app = App::new(session);
    app.open_dir(start_dir);

    let mut terminal = init_terminal()?;
    let result = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    config_manager.settings_mut().paths.last_directory =
        app.session().current_dir().to_string_lossy().to_string();
    if let Err(e) = config_manager.update_section(ConfigSection::Paths) {
        tracing::warn!("Failed to save last directory: {}", e);
    }

    tracing::info!("Stream Remux Organizer exiting");
    logger.close();
    result
}

/// Resolve the directory shown first.
fn start_directory(arg: Option<PathBuf>, last_directory: &str) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed reading working directory")?;

    let path = match arg {
        Some(path) => cwd.join(path),
        None if !last_directory.is_empty() && Path::new(last_directory).is_dir() => {
            PathBuf::from(last_directory)
        }
        None => cwd,
    };

    // `..` must resolve before Left walks up by path components
    Ok(path.canonicalize().unwrap_or(path))
}

fn init_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed creating terminal")
}

fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("failed disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed leaving alternate screen")?;
    terminal.show_cursor().context("failed showing cursor")?;
    Ok(())
}

fn run<L, P, R>(terminal: &mut AppTerminal, app: &mut App<L, P, R>) -> Result<()>
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    // Keys pressed while a tool was running, handled once it is done
    let pending: RefCell<VecDeque<KeyEvent>> = RefCell::new(VecDeque::new());

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("failed drawing frame")?;

        let queued = pending.borrow_mut().pop_front();
        let key = match queued {
            Some(key) => key,
            None => {
                let Event::Key(key) = event::read().context("failed reading input")? else {
                    continue;
                };
                key
            }
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Probe and remux block; show what is running first
        if let Some(message) = app.busy_message(&key) {
            app.set_busy(message);
            terminal
                .draw(|frame| ui::draw(frame, app))
                .context("failed drawing frame")?;
        }

        let abort = || esc_pressed(&mut pending.borrow_mut());
        match app.handle_key(key, &abort) {
            AppCommand::None => {}
            AppCommand::Quit => return Ok(()),
        }
    }
}

/// Abort check for running tools: reads pending input and reports an Esc.
/// Other key presses are queued in `pending`.
fn esc_pressed(pending: &mut VecDeque<KeyEvent>) -> bool {
    while let Ok(true) = event::poll(Duration::ZERO) {
        match event::read() {
            Ok(Event::Key(key)) => {
                if queue_unless_esc(pending, key) {
                    return true;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    false
}

/// `true` for an Esc press; any other press is kept for later.
fn queue_unless_esc(pending: &mut VecDeque<KeyEvent>, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    if key.code == KeyCode::Esc {
        return true;
    }
    pending.push_back(key);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let args = Args::parse_from([
            "rmx",
            "/media",
            "--config",
            "/tmp/rmx.toml",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("/media")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/rmx.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        let args = Args::parse_from(["rmx"]);
        assert!(args.path.is_none());
    }

    #[test]
    fn start_directory_prefers_argument() {
        let root = std::env::temp_dir();
        let dir = start_directory(Some(root.clone()), "/nonexistent/last").unwrap();
        assert_eq!(dir, root.canonicalize().unwrap());
    }

    #[test]
    fn start_directory_skips_vanished_last_directory() {
        let dir = start_directory(None, "/nonexistent/last").unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(dir, cwd.canonicalize().unwrap_or(cwd));
    }

    #[test]
    fn keys_during_a_running_tool_are_kept() {
        use crossterm::event::KeyModifiers;

        let mut pending = VecDeque::new();
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);

        assert!(!queue_unless_esc(&mut pending, q));
        assert!(queue_unless_esc(&mut pending, esc));
        assert_eq!(pending.pop_front().map(|k| k.code), Some(KeyCode::Char('q')));
        assert!(pending.is_empty());
    }
}
