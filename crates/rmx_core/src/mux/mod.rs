//! Muxing module for ffmpeg integration.
//!
//! This module turns an arrangement's remap instructions into an ffmpeg
//! stream-copy command and runs it.
//!
//! # Architecture
//!
//! - **options_builder**: Converts remap instructions into ffmpeg command tokens
//! - **naming**: Derives the proposed output path from the input path
//! - **ffmpeg**: [`Remuxer`] implementation that runs the command

mod ffmpeg;
mod naming;
mod options_builder;
mod types;

use std::path::Path;

use crate::arrangement::RemapInstruction;
use crate::runner::AbortCheck;

pub use ffmpeg::FfmpegRemuxer;
pub use naming::output_path_for;
pub use options_builder::{format_tokens_pretty, FfmpegOptionsBuilder};
pub use types::{RemuxError, RemuxResult};

/// Writes a new container holding the selected streams in order.
pub trait Remuxer {
    /// Copy the streams addressed by `instructions` from `input` into
    /// `output`, in instruction order, without re-encoding.
    fn remux(
        &self,
        input: &Path,
        output: &Path,
        instructions: &[RemapInstruction],
        abort: AbortCheck<'_>,
    ) -> RemuxResult<()>;
}
