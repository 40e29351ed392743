//! Data models for the remux organizer.
//!
//! - Codec type enum shared by probing, arrangement and muxing
//! - Raw probe records as they come out of ffprobe
//! - Ingested stream records with typed tags

mod enums;
mod stream;

pub use enums::CodecType;
pub use stream::{RawStream, Stream, StreamTags};
