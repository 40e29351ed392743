//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Type of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    /// Fonts and other files embedded in the container.
    Attachment,
    /// Anything else ffprobe reports. ffmpeg has no specifier for it.
    Other,
}

impl CodecType {
    /// Parse an ffprobe `codec_type` value.
    ///
    /// Unknown values map to [`CodecType::Other`] rather than failing.
    pub fn from_probe(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "audio" => Self::Audio,
            "subtitle" | "subtitles" => Self::Subtitle,
            "data" => Self::Data,
            "attachment" => Self::Attachment,
            _ => Self::Other,
        }
    }

    /// Stream specifier letter used by ffmpeg (`-map 0:a:1`).
    ///
    /// `None` for types ffmpeg cannot select by type.
    pub fn specifier(&self) -> Option<&'static str> {
        match self {
            Self::Video => Some("v"),
            Self::Audio => Some("a"),
            Self::Subtitle => Some("s"),
            Self::Data => Some("d"),
            Self::Attachment => Some("t"),
            Self::Other => None,
        }
    }

    /// Short label for display: the specifier letter, `?` when there is none.
    pub fn abbrev(&self) -> &'static str {
        self.specifier().unwrap_or("?")
    }

    /// Get all codec types.
    pub fn all() -> &'static [CodecType] {
        &[
            Self::Video,
            Self::Audio,
            Self::Subtitle,
            Self::Data,
            Self::Attachment,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for CodecType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecType::Video => write!(f, "video"),
            CodecType::Audio => write!(f, "audio"),
            CodecType::Subtitle => write!(f, "subtitle"),
            CodecType::Data => write!(f, "data"),
            CodecType::Attachment => write!(f, "attachment"),
            CodecType::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_values() {
        assert_eq!(CodecType::from_probe("video"), CodecType::Video);
        assert_eq!(CodecType::from_probe("audio"), CodecType::Audio);
        assert_eq!(CodecType::from_probe("subtitle"), CodecType::Subtitle);
        assert_eq!(CodecType::from_probe("Subtitle"), CodecType::Subtitle);
        assert_eq!(CodecType::from_probe("attachment"), CodecType::Attachment);
        assert_eq!(CodecType::from_probe("data"), CodecType::Data);
        assert_eq!(CodecType::from_probe("unknown"), CodecType::Other);
    }

    #[test]
    fn abbreviations_match_ffmpeg_specifiers() {
        let abbrevs: Vec<&str> = CodecType::all().iter().map(|t| t.abbrev()).collect();
        assert_eq!(abbrevs, vec!["v", "a", "s", "d", "t", "?"]);
        assert_eq!(CodecType::Other.specifier(), None);
    }
}
