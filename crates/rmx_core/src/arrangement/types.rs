//! Types for arrangement operations.

use thiserror::Error;

use crate::models::CodecType;

/// Errors from building or mutating an arrangement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrangementError {
    /// A probe record lacks a field needed to address the stream.
    #[error("Malformed stream record #{record}: missing {field}")]
    MalformedInput { record: usize, field: &'static str },

    /// A position-based operation got a position past the end.
    #[error("Stream position {position} out of range (len {len})")]
    IndexOutOfRange { position: usize, len: usize },
}

/// Result type for arrangement operations.
pub type ArrangementResult<T> = Result<T, ArrangementError>;

/// One entry of the remux mapping.
///
/// `slot` is the output position. `codec_type` and `type_relative_index`
/// address the track in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapInstruction {
    pub slot: usize,
    pub codec_type: CodecType,
    pub type_relative_index: usize,
}

impl RemapInstruction {
    /// Source selector token, e.g. `a:1`.
    pub fn selector(&self) -> String {
        format!("{}:{}", self.codec_type.abbrev(), self.type_relative_index)
    }
}

impl std::fmt::Display for RemapInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} <- {}", self.slot, self.selector())
    }
}
