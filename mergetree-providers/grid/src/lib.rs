//! Regular 3D grid provider for merge-tree builds.
//!
//! [`RegularGrid`] stores one `f32` per grid point in x-fastest order and
//! exposes the 6-connected neighbor relation. Values can be loaded from a
//! Parquet `Float32` column.

mod errors;
mod grid;
mod ingest;

pub use errors::GridProviderError;
pub use grid::RegularGrid;

#[cfg(test)]
mod tests;
