//! Crate-level errors.
//!
//! Almost everything the aggregator meets in the wild is tolerated in
//! place and logged; the variants here are the two conditions that
//! genuinely abort a merge step.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced across the merge boundary.
#[derive(Error, Debug)]
pub enum MergeError {
    /// Both operands of a status fold were outside the known vocabulary.
    /// One bad operand is recoverable; two means the caller handed us
    /// garbage on both sides.
    #[error("both are invalid status: '{left}' '{right}'")]
    InvalidStatus { left: String, right: String },

    /// The combined archive could not be written.
    #[error("archive write failed: '{path}': {source}")]
    Archive { path: PathBuf, source: io::Error },
}
