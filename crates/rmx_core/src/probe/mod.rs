//! Stream probing.
//!
//! The session asks a [`Prober`] for the raw stream records of a file. The
//! default implementation runs `ffprobe` and parses its JSON output.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use rmx_core::probe::{FfprobeProber, Prober};
//! use rmx_core::runner::never_abort;
//!
//! let prober = FfprobeProber::new("ffprobe");
//! let streams = prober.probe(Path::new("/path/to/movie.mkv"), &never_abort)?;
//! println!("{} streams", streams.len());
//! # Ok::<(), rmx_core::probe::ProbeError>(())
//! ```

mod ffprobe;
mod types;

use std::path::Path;

use crate::models::RawStream;
use crate::runner::AbortCheck;

pub use ffprobe::{parse_ffprobe_json, FfprobeProber};
pub use types::{ProbeError, ProbeResult};

/// Source of raw stream metadata for a container.
pub trait Prober {
    /// Return the streams of `path` in container order.
    fn probe(&self, path: &Path, abort: AbortCheck<'_>) -> ProbeResult<Vec<RawStream>>;
}
