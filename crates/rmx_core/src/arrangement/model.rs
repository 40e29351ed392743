//! The ordered stream list and its mutation rules.

use std::collections::HashMap;

use super::rows::format_row;
use super::types::{ArrangementError, ArrangementResult, RemapInstruction};
use crate::models::{CodecType, RawStream, Stream, StreamTags};
use crate::navigation::Direction;

/// Ordered streams of one opened container.
///
/// The dragged stream is tracked as a position into `streams`, so there is
/// never more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrangement {
    streams: Vec<Stream>,
    dragged: Option<usize>,
}

/// Result of ingesting probe output.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub arrangement: Arrangement,
    /// One error per skipped record.
    pub rejected: Vec<ArrangementError>,
}

impl Arrangement {
    /// Create an empty arrangement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arrangement from probe records, in probe order.
    ///
    /// Records without a native index or codec type are skipped and reported
    /// in `rejected`; the remaining records are still ingested. Type-relative
    /// indices count accepted streams only, so they stay contiguous.
    pub fn ingest<I>(raw_streams: I) -> IngestOutcome
    where
        I: IntoIterator<Item = RawStream>,
    {
        let mut streams = Vec::new();
        let mut rejected = Vec::new();
        let mut per_type: HashMap<CodecType, usize> = HashMap::new();

        for (record, raw) in raw_streams.into_iter().enumerate() {
            let Some(source_index) = raw.index else {
                tracing::warn!("Skipping stream record #{}: no index", record);
                rejected.push(ArrangementError::MalformedInput {
                    record,
                    field: "index",
                });
                continue;
            };
            let Some(codec_type) = raw.codec_type.as_deref().map(CodecType::from_probe) else {
                tracing::warn!("Skipping stream record #{}: no codec_type", record);
                rejected.push(ArrangementError::MalformedInput {
                    record,
                    field: "codec_type",
                });
                continue;
            };

            let counter = per_type.entry(codec_type).or_insert(0);
            let type_relative_index = *counter;
            *counter += 1;

            streams.push(Stream::new(
                source_index,
                codec_type,
                raw.codec_name.unwrap_or_default(),
                StreamTags::from_map(raw.tags),
                type_relative_index,
            ));
        }

        tracing::debug!(
            "Ingested {} streams ({} rejected)",
            streams.len(),
            rejected.len()
        );

        IngestOutcome {
            arrangement: Self {
                streams,
                dragged: None,
            },
            rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Stream at a sequence position.
    pub fn get(&self, position: usize) -> Option<&Stream> {
        self.streams.get(position)
    }

    /// Streams in current sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Stream> + '_ {
        self.streams.iter()
    }

    /// Position of the dragged stream, if any.
    pub fn dragged_position(&self) -> Option<usize> {
        self.dragged
    }

    pub fn dragged(&self) -> Option<&Stream> {
        self.dragged.and_then(|pos| self.streams.get(pos))
    }

    pub fn included_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_included()).count()
    }

    /// Display rows in sequence order. Does not mutate.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.streams
            .iter()
            .enumerate()
            .map(move |(pos, stream)| format_row(stream, self.dragged == Some(pos)))
    }

    fn check_position(&self, position: usize) -> ArrangementResult<()> {
        if position < self.streams.len() {
            Ok(())
        } else {
            Err(ArrangementError::IndexOutOfRange {
                position,
                len: self.streams.len(),
            })
        }
    }

    /// Flip the inclusion flag of the stream at `position`.
    ///
    /// Out-of-range positions return `IndexOutOfRange` and change nothing.
    pub fn toggle_included(&mut self, position: usize) -> ArrangementResult<bool> {
        self.check_position(position)?;
        let stream = &mut self.streams[position];
        stream.included = !stream.included;
        Ok(stream.included)
    }

    /// Pick up the stream at `position`, or release it if it is the one
    /// already dragged. Picking up releases any other dragged stream.
    ///
    /// Returns whether a stream is dragged afterwards.
    pub fn toggle_dragged(&mut self, position: usize) -> ArrangementResult<bool> {
        self.check_position(position)?;
        self.dragged = if self.dragged == Some(position) {
            None
        } else {
            Some(position)
        };
        Ok(self.dragged.is_some())
    }

    /// Swap the dragged stream with its neighbour in `direction`.
    ///
    /// The drag stays on the same stream. No-op when nothing is dragged or
    /// the stream is already at that end. Returns the dragged stream's
    /// position afterwards.
    pub fn move_dragged(&mut self, direction: Direction) -> Option<usize> {
        let from = self.dragged?;
        let to = match direction {
            Direction::Up if from > 0 => from - 1,
            Direction::Down if from + 1 < self.streams.len() => from + 1,
            _ => return Some(from),
        };
        self.streams.swap(from, to);
        self.dragged = Some(to);
        Some(to)
    }

    /// Mapping for the remux call: one entry per included stream, in
    /// sequence order.
    ///
    /// Streams whose type has no ffmpeg specifier cannot be addressed and
    /// are left out, even when included.
    pub fn remap_instructions(&self) -> Vec<RemapInstruction> {
        self.streams
            .iter()
            .filter(|s| s.is_included())
            .filter(|s| {
                let mappable = s.codec_type.specifier().is_some();
                if !mappable {
                    tracing::warn!(
                        "Stream {} ({}) has no ffmpeg specifier, not mapped",
                        s.source_index,
                        s.codec_type
                    );
                }
                mappable
            })
            .enumerate()
            .map(|(slot, s)| RemapInstruction {
                slot,
                codec_type: s.codec_type,
                type_relative_index: s.type_relative_index(),
            })
            .collect()
    }
}
