//! Display rows for the stream list.

use crate::models::Stream;

const DRAG_MARKER: &str = "> ";
const NO_DRAG_MARKER: &str = "  ";
const CHECKED: &str = "[X] ";
const UNCHECKED: &str = "[ ] ";

/// Format the label part of a stream row.
///
/// `Stream 2 (a:1=aac): Commentary (eng) <filename> <duration>`, with
/// absent tags rendered as empty strings.
pub fn format_label(stream: &Stream) -> String {
    let label = format!(
        "Stream {} ({}={}): {} ({}) {} {}",
        stream.source_index,
        stream.selector(),
        stream.codec_name,
        stream.tags.title_or_empty(),
        stream.tags.language_or_empty(),
        stream.tags.filename_or_empty(),
        stream.tags.duration_or_empty(),
    );
    label.trim_end().to_string()
}

/// Format a full row: drag marker, checkbox, label.
pub fn format_row(stream: &Stream, dragged: bool) -> String {
    let drag = if dragged { DRAG_MARKER } else { NO_DRAG_MARKER };
    let check = if stream.is_included() { CHECKED } else { UNCHECKED };
    format!("{}{}{}", drag, check, format_label(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodecType, StreamTags};

    fn stream_with_tags(tags: StreamTags) -> Stream {
        Stream::new(2, CodecType::Audio, "aac", tags, 1)
    }

    #[test]
    fn label_includes_all_tags() {
        let tags = StreamTags {
            title: Some("Commentary".into()),
            language: Some("eng".into()),
            filename: Some("track.aac".into()),
            duration: Some("00:01:00.000".into()),
            ..Default::default()
        };
        assert_eq!(
            format_label(&stream_with_tags(tags)),
            "Stream 2 (a:1=aac): Commentary (eng) track.aac 00:01:00.000"
        );
    }

    #[test]
    fn label_renders_missing_tags_empty() {
        assert_eq!(
            format_label(&stream_with_tags(StreamTags::default())),
            "Stream 2 (a:1=aac):  ()"
        );
    }

    #[test]
    fn row_markers() {
        let mut stream = stream_with_tags(StreamTags::default());
        assert!(format_row(&stream, false).starts_with("  [X] Stream 2"));
        assert!(format_row(&stream, true).starts_with("> [X] Stream 2"));

        stream.included = false;
        assert!(format_row(&stream, false).starts_with("  [ ] Stream 2"));
    }
}
