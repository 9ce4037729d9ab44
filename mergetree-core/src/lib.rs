//! Merge-tree construction and queries for scalar fields on graph domains.
//!
//! A build orders the selected vertices, sweeps them into a join forest and a
//! split forest with union-find, and splices the two into the merge forest
//! that [`MergeTree`] exposes for maxima and super-level component queries.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod builder;
mod error;
mod field;
mod forest;
mod merge;
mod order;
mod query;
mod sweep;
mod tree;
mod union_find;
mod vertex_set;

#[cfg(test)]
mod test_utils;

pub use crate::{
    adjacency::Adjacency,
    builder::{MergeTreeBuilder, SweepStrategy, build_merge_tree},
    error::{FieldError, FieldErrorCode, MergeTreeError, MergeTreeErrorCode, Result},
    field::{NeighborRelation, ScalarField},
    forest::{Forest, TreeNode},
    merge::{MergeSplice, MergeStats, MergeStep, PruneVia, merge_join_split},
    order::{VertexOrder, ascending_order, compare_vertices},
    query::{Bridge, BridgeSet},
    sweep::{SweepDirection, build_join_tree, build_split_tree, sweep},
    tree::MergeTree,
    vertex_set::VertexSet,
};
