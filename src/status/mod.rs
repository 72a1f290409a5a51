//! Test status lattice.
//!
//! The six-tier status ranking shared by every level of the result
//! hierarchy, plus the token vocabulary that maps raw runner output
//! onto it.

pub mod lattice;
pub mod vocabulary;

pub use lattice::*;
pub use vocabulary::*;
