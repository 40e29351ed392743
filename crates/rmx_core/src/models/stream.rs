//! Stream records: raw probe output and ingested streams.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::CodecType;

/// One stream record as reported by the probe tool.
///
/// Every field is optional here; the arrangement decides which records
/// are complete enough to ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStream {
    /// Container-native stream index.
    #[serde(default)]
    pub index: Option<u32>,
    /// Codec type as reported ("video", "audio", "subtitle", ...).
    #[serde(default)]
    pub codec_type: Option<String>,
    /// Short codec name (e.g., "h264", "aac", "ass").
    #[serde(default)]
    pub codec_name: Option<String>,
    /// Free-form stream tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl RawStream {
    /// Create a complete raw record.
    pub fn new(index: u32, codec_type: impl Into<String>, codec_name: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            codec_type: Some(codec_type.into()),
            codec_name: Some(codec_name.into()),
            tags: BTreeMap::new(),
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Typed view of the tags shown in the stream list.
///
/// Known keys are matched case-insensitively (Matroska writes `DURATION`,
/// sometimes with a language suffix). Everything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTags {
    pub title: Option<String>,
    pub language: Option<String>,
    pub filename: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl StreamTags {
    /// Split a raw tag map into the known fields and the remainder.
    pub fn from_map(tags: BTreeMap<String, String>) -> Self {
        let mut out = Self::default();

        for (key, value) in tags {
            let lower = key.to_ascii_lowercase();
            let slot = match lower.as_str() {
                "title" => &mut out.title,
                "language" => &mut out.language,
                "filename" => &mut out.filename,
                k if k == "duration" || k.starts_with("duration-") => &mut out.duration,
                _ => {
                    out.extra.insert(key, value);
                    continue;
                }
            };
            if slot.is_none() {
                *slot = Some(value);
            } else {
                out.extra.insert(key, value);
            }
        }

        out
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn language_or_empty(&self) -> &str {
        self.language.as_deref().unwrap_or("")
    }

    pub fn filename_or_empty(&self) -> &str {
        self.filename.as_deref().unwrap_or("")
    }

    pub fn duration_or_empty(&self) -> &str {
        self.duration.as_deref().unwrap_or("")
    }
}

/// An ingested stream of the opened container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Container-native stream index.
    pub source_index: u32,
    /// Type of stream.
    pub codec_type: CodecType,
    /// Codec label, display only.
    pub codec_name: String,
    /// Stream tags.
    pub tags: StreamTags,
    /// Ordinal among same-type streams in probe order. Fixed at ingestion.
    type_relative_index: usize,
    /// Whether the stream is written to the output.
    pub(crate) included: bool,
}

impl Stream {
    pub(crate) fn new(
        source_index: u32,
        codec_type: CodecType,
        codec_name: impl Into<String>,
        tags: StreamTags,
        type_relative_index: usize,
    ) -> Self {
        Self {
            source_index,
            codec_type,
            codec_name: codec_name.into(),
            tags,
            type_relative_index,
            included: true,
        }
    }

    /// Ordinal of this stream among streams of the same type in the source.
    pub fn type_relative_index(&self) -> usize {
        self.type_relative_index
    }

    /// Whether the stream is selected for the output.
    pub fn is_included(&self) -> bool {
        self.included
    }

    /// Source selector, e.g. `a:1`.
    pub fn selector(&self) -> String {
        format!("{}:{}", self.codec_type.abbrev(), self.type_relative_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_are_case_insensitive() {
        let raw = RawStream::new(0, "audio", "aac")
            .with_tag("TITLE", "Commentary")
            .with_tag("language", "eng")
            .with_tag("DURATION-eng", "00:23:40.123000000")
            .with_tag("handler_name", "SoundHandler");

        let tags = StreamTags::from_map(raw.tags);
        assert_eq!(tags.title.as_deref(), Some("Commentary"));
        assert_eq!(tags.language.as_deref(), Some("eng"));
        assert_eq!(tags.duration.as_deref(), Some("00:23:40.123000000"));
        assert_eq!(tags.filename, None);
        assert_eq!(tags.extra.get("handler_name").map(String::as_str), Some("SoundHandler"));
    }

    #[test]
    fn empty_helpers_default_to_empty_string() {
        let tags = StreamTags::default();
        assert_eq!(tags.title_or_empty(), "");
        assert_eq!(tags.language_or_empty(), "");
        assert_eq!(tags.filename_or_empty(), "");
        assert_eq!(tags.duration_or_empty(), "");
    }

    #[test]
    fn raw_stream_deserializes_with_missing_fields() {
        let raw: RawStream = serde_json::from_str(r#"{"codec_name":"mjpeg"}"#).unwrap();
        assert_eq!(raw.index, None);
        assert_eq!(raw.codec_type, None);
        assert!(raw.tags.is_empty());
    }

    #[test]
    fn selector_uses_type_relative_index() {
        let stream = Stream::new(5, CodecType::Subtitle, "ass", StreamTags::default(), 2);
        assert_eq!(stream.selector(), "s:2");
        assert!(stream.is_included());
    }
}
