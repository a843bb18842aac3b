//! Process-wide logging setup for b16 binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! binary's job and happens once, explicitly, at startup.

pub mod tracing;

pub use crate::tracing::{init, LogFormat, ParseLogFormatError};
