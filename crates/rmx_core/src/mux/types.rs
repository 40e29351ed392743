//! Types for remux operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::runner::RunError;

/// Errors from producing a remuxed file.
#[derive(Error, Debug)]
pub enum RemuxError {
    /// No stream is selected for the output.
    #[error("No streams selected for output")]
    NothingSelected,

    /// The input file vanished.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The output path would overwrite the input.
    #[error("Output path is the input file: {0}")]
    OutputIsInput(PathBuf),

    /// The output exists and overwriting is disabled.
    #[error("Output file already exists: {0}")]
    OutputExists(PathBuf),

    /// The remux tool exited with an error.
    #[error("{tool} failed (exit code {exit_code}): {message}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Running the tool failed before it finished.
    #[error(transparent)]
    Run(#[from] RunError),
}

impl RemuxError {
    /// Whether the user aborted the remux.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RemuxError::Run(RunError::Cancelled { .. }))
    }
}

/// Result type for remux operations.
pub type RemuxResult<T> = Result<T, RemuxError>;
