//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use mergetree_core::MergeTreeError;
use mergetree_providers_grid::GridProviderError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The synthetic grid could not be constructed.
    #[error("synthetic grid generation failed: {0}")]
    Grid(#[from] GridProviderError),
    /// Building the merge tree or one of its inputs failed.
    #[error("merge tree setup failed: {0}")]
    MergeTree(#[from] MergeTreeError),
}
