//! Application state and key handling.
//!
//! Each key press maps to one session operation. Results end up in the
//! status line; nothing here touches the terminal, so the key table can be
//! tested with fake collaborators.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use rmx_core::browse::DirectoryLister;
use rmx_core::mux::Remuxer;
use rmx_core::probe::Prober;
use rmx_core::runner::AbortCheck;
use rmx_core::session::{Mode, Session, SessionError, SessionResult};

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Last action result shown under the panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }
}

pub struct App<L, P, R> {
    session: Session<L, P, R>,
    status: Status,
}

impl<L, P, R> App<L, P, R>
where
    L: DirectoryLister,
    P: Prober,
    R: Remuxer,
{
    pub fn new(session: Session<L, P, R>) -> Self {
        Self {
            session,
            status: Status::info("Ready"),
        }
    }

    pub fn session(&self) -> &Session<L, P, R> {
        &self.session
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Show the starting directory.
    pub fn open_dir(&mut self, path: PathBuf) {
        let result = self.session.change_dir(path);
        self.report(result, |_| None);
    }

    /// Message to show while a key runs an external tool, if it does.
    pub fn busy_message(&self, key: &KeyEvent) -> Option<&'static str> {
        match (self.session.mode(), key.code) {
            (Mode::Browsing, KeyCode::Right | KeyCode::Enter) => self
                .session
                .selected_entry()
                .filter(|e| !e.is_dir)
                .map(|_| "Probing streams... (Esc to cancel)"),
            (Mode::Inspecting, KeyCode::Char('s')) => Some("Remuxing... (Esc to cancel)"),
            (Mode::Inspecting, KeyCode::Char('r')) => Some("Probing streams... (Esc to cancel)"),
            _ => None,
        }
    }

    pub fn set_busy(&mut self, message: &str) {
        self.status = Status::info(message);
    }

    /// Handle one key press.
    ///
    /// `abort` is polled while probe or remux runs.
    pub fn handle_key(&mut self, key: KeyEvent, abort: AbortCheck<'_>) -> AppCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppCommand::Quit;
        }

        match key.code {
            KeyCode::Char('q') => return AppCommand::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.session.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.session.cursor_down(),
            KeyCode::Right | KeyCode::Enter => {
                let result = self.session.enter(abort);
                let opened = self.session.mode() == Mode::Inspecting;
                let count = self.session.arrangement().len();
                self.report(result, |_| {
                    opened.then(|| format!("{} streams", count))
                });
            }
            KeyCode::Left | KeyCode::Backspace | KeyCode::Esc => {
                let result = self.session.back();
                self.report(result, |_| None);
            }
            KeyCode::Char(' ') => {
                let result = self.session.toggle_included_at_cursor();
                self.report(result, |_| None);
            }
            KeyCode::Char('m') => {
                let result = self.session.toggle_drag_at_cursor();
                self.report(result, |_| None);
            }
            KeyCode::Char('s') => {
                let result = self.session.save(abort);
                self.report(result, |output| Some(format!("Saved {}", output.display())));
            }
            KeyCode::Char('r') => match self.session.mode() {
                Mode::Inspecting => {
                    let result = self.session.reload(abort);
                    let count = self.session.arrangement().len();
                    self.report(result, |_| Some(format!("Reloaded, {} streams", count)));
                }
                Mode::Browsing => {
                    let result = self.session.refresh();
                    self.report(result, |_| None);
                }
            },
            _ => {}
        }

        AppCommand::None
    }

    /// Put the outcome of an operation into the status line.
    fn report<T>(&mut self, result: SessionResult<T>, success: impl FnOnce(&T) -> Option<String>) {
        match result {
            Ok(value) => {
                if let Some(text) = success(&value) {
                    self.status = Status {
                        kind: StatusKind::Success,
                        text,
                    };
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                let text = if e.is_cancelled() {
                    "Cancelled".to_string()
                } else {
                    error_text(&e)
                };
                self.status = Status {
                    kind: StatusKind::Error,
                    text,
                };
            }
        }
    }
}

fn error_text(error: &SessionError) -> String {
    match error {
        SessionError::NothingOpened => "Open a file first".to_string(),
        other => other.to_string(),
    }
}
