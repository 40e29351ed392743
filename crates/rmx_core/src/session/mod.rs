//! Interactive session state.
//!
//! A [`Session`] ties the file pane, the stream pane and the three external
//! collaborators together. Every key press of the TUI maps to one method
//! here, so the whole interaction can be driven from tests with fake
//! collaborators.
//!
//! # Modes
//!
//! ```text
//!              enter (file)
//!   Browsing ----------------> Inspecting
//!      ^                          |
//!      +--------- back -----------+
//! ```
//!
//! In `Browsing` the file cursor is active and the arrangement is empty. In
//! `Inspecting` the stream cursor is active and the arrangement holds the
//! streams of the opened container. Leaving discards the arrangement.

mod state;
mod types;

pub use state::Session;
pub use types::{Mode, SessionError, SessionResult};
