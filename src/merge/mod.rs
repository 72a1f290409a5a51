//! Run-level merge: configuration, result discovery, and the
//! cross-file accumulator.

pub mod combine;
pub mod context;
pub mod discovery;

pub use combine::*;
pub use context::*;
pub use discovery::*;
