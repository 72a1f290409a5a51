//! Structured logging with run context.
//!
//! Provides the logging context carried through every merge phase so
//! events can be correlated back to a run and a source file.

pub mod structured;

pub use structured::*;
