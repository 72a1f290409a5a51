//! Result-file extraction.
//!
//! Turns one TestRunner result file into typed records: the block
//! scanner and content normalization in `fields`, the record extractor
//! with re-keying and status tracking in `records`.

pub mod fields;
pub mod records;

pub use fields::*;
pub use records::*;
