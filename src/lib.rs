//! RegDB Core - Result aggregation for the low-level regression suite
//!
//! This crate provides the merge stage of the suite: it folds the
//! per-OS and hardware result files a run leaves behind into one
//! timestamped database archive, exposed to the Python orchestrator
//! via PyO3 (behind the `python` feature). The implementation
//! prioritizes:
//!
//! 1. **Tolerance** - A damaged result file yields its readable prefix,
//!    never a crashed run
//! 2. **Logging** - Every skip, repair, and merge decision logged with
//!    run context
//! 3. **Determinism** - Stable key layout and record order for a given
//!    set of inputs
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `status` - Ordered test status lattice and token vocabulary
//! - `model` - Archive records and global key allocation
//! - `extract` - Per-file record extraction and re-keying
//! - `merge` - Run configuration, discovery, cross-file accumulation
//! - `archive` - Archive writer, source stamping, non-pass audit
//! - `error` - Run-level error type
//! - `logging` - Structured logging with run context

pub mod archive;
pub mod error;
pub mod extract;
pub mod logging;
pub mod merge;
pub mod model;
pub mod status;

#[cfg(feature = "python")]
pub mod python;
