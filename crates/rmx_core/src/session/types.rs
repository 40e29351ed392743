//! Types for session operations.

use thiserror::Error;

use crate::browse::BrowseError;
use crate::mux::RemuxError;
use crate::probe::ProbeError;

/// Which pane the user is working in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browsing,
    Inspecting,
}

/// Errors surfaced to the user by session operations.
///
/// The session state is consistent after every error.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Browse(#[from] BrowseError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Remux(#[from] RemuxError),

    /// A stream operation was requested with no container open.
    #[error("No file is open")]
    NothingOpened,
}

impl SessionError {
    /// Whether the user aborted a running tool.
    pub fn is_cancelled(&self) -> bool {
        match self {
            SessionError::Probe(e) => e.is_cancelled(),
            SessionError::Remux(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
