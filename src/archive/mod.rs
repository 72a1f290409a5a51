//! Archive and audit output.
//!
//! The run's end products: the combined JSON archive the website
//! ingests, the trailer stamp on merged source files, and the flat
//! error-audit CSV.

pub mod audit;
pub mod writer;

pub use audit::*;
pub use writer::*;
