//! RMX Core - stream organization backend for the remux organizer
//!
//! This crate contains the stream arrangement model, cursor navigation,
//! and the wrappers around the external probe and remux tools. It has no
//! terminal dependencies and can be driven by the TUI or by tests.

pub mod arrangement;
pub mod browse;
pub mod config;
pub mod logging;
pub mod models;
pub mod mux;
pub mod navigation;
pub mod probe;
pub mod runner;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
