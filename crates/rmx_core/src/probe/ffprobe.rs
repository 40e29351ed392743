//! File probing using ffprobe.
//!
//! Runs `ffprobe -show_entries stream=index,codec_type,codec_name:stream_tags
//! -of json` and turns the `streams` array into [`RawStream`] records.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::{ProbeError, ProbeResult};
use super::Prober;
use crate::models::RawStream;
use crate::runner::{AbortCheck, CommandRunner};

const ENTRIES: &str = "stream=index,codec_type,codec_name:stream_tags";

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<RawStream>,
}

/// Prober backed by the ffprobe executable.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: String,
    runner: CommandRunner,
}

impl FfprobeProber {
    /// Create a prober for the given ffprobe executable name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            runner: CommandRunner::new(),
        }
    }

    /// Use a specific runner (e.g., one with a timeout).
    pub fn with_runner(mut self, runner: CommandRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Build the ffprobe arguments for a file.
    pub fn args_for(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            ENTRIES.to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path, abort: AbortCheck<'_>) -> ProbeResult<Vec<RawStream>> {
        if !path.exists() {
            return Err(ProbeError::FileNotFound(PathBuf::from(path)));
        }

        tracing::debug!("Probing file: {}", path.display());

        let output = self.runner.run(&self.program, &Self::args_for(path), abort)?;

        if !output.success {
            return Err(ProbeError::ToolFailed {
                tool: self.program.clone(),
                exit_code: output.exit_code,
                message: output.stderr.trim().to_string(),
            });
        }

        let streams = parse_ffprobe_json(&output.stdout)?;
        tracing::info!("{}: {} streams", path.display(), streams.len());
        Ok(streams)
    }
}

/// Parse the JSON document ffprobe prints with `-of json`.
///
/// A document without a `streams` key yields no streams.
pub fn parse_ffprobe_json(json: &str) -> ProbeResult<Vec<RawStream>> {
    let parsed: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| ProbeError::ParseFailed {
            tool: "ffprobe".to_string(),
            message: e.to_string(),
        })?;
    Ok(parsed.streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::never_abort;

    const SAMPLE: &str = r#"{
        "programs": [],
        "streams": [
            {
                "index": 0,
                "codec_name": "hevc",
                "codec_type": "video",
                "tags": { "DURATION": "00:23:40.042000000" }
            },
            {
                "index": 1,
                "codec_name": "flac",
                "codec_type": "audio",
                "tags": { "language": "jpn", "title": "Stereo" }
            },
            {
                "index": 2,
                "codec_name": "ass",
                "codec_type": "subtitle",
                "tags": { "language": "eng", "title": "Full" }
            },
            {
                "index": 3,
                "codec_type": "attachment",
                "tags": { "filename": "font.ttf", "mimetype": "font/ttf" }
            }
        ]
    }"#;

    #[test]
    fn parses_streams() {
        let streams = parse_ffprobe_json(SAMPLE).unwrap();
        assert_eq!(streams.len(), 4);

        assert_eq!(streams[0].index, Some(0));
        assert_eq!(streams[0].codec_name.as_deref(), Some("hevc"));
        assert_eq!(streams[1].tags.get("language").map(String::as_str), Some("jpn"));
        assert_eq!(streams[3].codec_name, None);
        assert_eq!(streams[3].tags.get("filename").map(String::as_str), Some("font.ttf"));
    }

    #[test]
    fn no_streams_key_is_empty() {
        assert!(parse_ffprobe_json("{}").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_parse_error() {
        let err = parse_ffprobe_json("Invalid data found when processing input").unwrap_err();
        assert!(matches!(err, ProbeError::ParseFailed { .. }));
    }

    #[test]
    fn args_request_json_stream_entries() {
        let args = FfprobeProber::args_for(Path::new("/media/a.mkv"));
        assert_eq!(args.last().map(String::as_str), Some("/media/a.mkv"));
        assert!(args.windows(2).any(|w| w[0] == "-of" && w[1] == "json"));
        assert!(args.contains(&ENTRIES.to_string()));
    }

    #[test]
    fn probe_nonexistent_file() {
        let prober = FfprobeProber::new("ffprobe");
        let result = prober.probe(Path::new("/nonexistent/file.mkv"), &never_abort);
        assert!(matches!(result, Err(ProbeError::FileNotFound(_))));
    }
}
