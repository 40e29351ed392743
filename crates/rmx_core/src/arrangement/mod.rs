//! Stream arrangement for one opened container.
//!
//! The arrangement owns the ordered stream list and every mutation rule:
//!
//! - **Ingest**: build streams in probe order, assigning each stream its
//!   ordinal among streams of the same type
//! - **Toggle**: include/exclude a stream, pick up/release the dragged stream
//! - **Reorder**: move the dragged stream one step up or down
//! - **Remap**: derive the ordered selector list for the remux call
//!
//! # Output position vs. source address
//!
//! Sequence order is the output order. The type-relative index is the
//! address of the track in the source file and never changes after ingest:
//!
//! ```text
//! probe order:  v:0  a:0  a:1  s:0
//! after drag:   v:0  a:1  a:0  s:0     -> -map 0:v:0 -map 0:a:1 -map 0:a:0 -map 0:s:0
//! ```

mod model;
mod rows;
mod types;

pub use model::{Arrangement, IngestOutcome};
pub use rows::{format_label, format_row};
pub use types::{ArrangementError, ArrangementResult, RemapInstruction};
