//! Types for probe operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::runner::RunError;

/// Errors from probing a file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The probe tool could not run or exited with an error.
    #[error("{tool} failed (exit code {exit_code}): {message}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool's output could not be parsed.
    #[error("Failed to parse {tool} output: {message}")]
    ParseFailed { tool: String, message: String },

    /// Running the tool failed before it produced output.
    #[error(transparent)]
    Run(#[from] RunError),
}

impl ProbeError {
    /// Whether the user aborted the probe.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProbeError::Run(RunError::Cancelled { .. }))
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
