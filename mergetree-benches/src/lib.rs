//! Benchmark support crate for mergetree.
//!
//! Provides synthetic grid fields and parameter types used by the Criterion
//! benchmarks of the build phases and queries.

pub mod error;
pub mod params;
pub mod source;
