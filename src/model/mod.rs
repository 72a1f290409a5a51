//! Record data model.
//!
//! The typed record shape shared by extraction, merging, and archive
//! output, plus the key allocator that keeps the combined key space
//! collision-free.

pub mod keys;
pub mod record;

pub use keys::*;
pub use record::*;
