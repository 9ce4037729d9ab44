//! Leaf-pruning splice of a join forest and a split forest into one merge
//! forest.
//!
//! A vertex is a pruning candidate while it has exactly one child across the
//! two forests. Candidates are drained from a FIFO queue; each one is removed
//! from the forest in which it is a leaf (contributing the edge to its parent
//! in that forest to the merge forest) and spliced out of the other. Child
//! counts never grow, so a vertex is queued at most once.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::forest::Forest;

/// The forest in which a pruned vertex was a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PruneVia {
    /// Leaf of the join forest; its join parent becomes its merge parent.
    Join,
    /// Leaf of the split forest; its split parent becomes its merge parent.
    Split,
}

/// One dequeued candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStep {
    /// `vertex` was linked under `parent` in the merge forest.
    Pruned {
        /// Local index of the pruned vertex.
        vertex: usize,
        /// Its new merge parent.
        parent: usize,
        /// Which forest supplied the edge.
        via: PruneVia,
    },
    /// `vertex` had no parent in either forest and stays a merge root.
    SkippedRoot {
        /// Local index of the exhausted component root.
        vertex: usize,
    },
}

/// Counters gathered while splicing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Candidates pruned into the merge forest.
    pub iterations: usize,
    /// Edges added to the merge forest.
    pub edges_added: usize,
    /// Child links the join forest lost.
    pub join_links_removed: usize,
    /// Child links the split forest lost.
    pub split_links_removed: usize,
    /// Dequeued candidates that were already exhausted component roots.
    pub skipped_roots: usize,
}

impl MergeStats {
    /// Links removed from both input forests.
    #[must_use]
    pub fn links_removed(&self) -> usize {
        self.join_links_removed + self.split_links_removed
    }
}

/// Step-wise driver for the splice.
///
/// [`merge_join_split`] runs it to completion; stepping manually exposes the
/// intermediate forests.
#[derive(Clone, Debug)]
pub struct MergeSplice {
    join: Forest,
    split: Forest,
    merge: Forest,
    queue: VecDeque<usize>,
    stats: MergeStats,
}

impl MergeSplice {
    /// Takes ownership of both forests and queues the initial candidates in
    /// ascending local index order.
    ///
    /// # Panics
    /// Debug builds assert that both forests have the same length.
    #[must_use]
    pub fn new(join: Forest, split: Forest) -> Self {
        debug_assert_eq!(join.len(), split.len(), "forests must cover the same vertices");
        let len = join.len();
        let queue = (0..len)
            .filter(|&vertex| is_candidate(&join, &split, vertex))
            .collect();
        Self {
            join,
            split,
            merge: Forest::new(len),
            queue,
            stats: MergeStats::default(),
        }
    }

    /// Remaining join forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn join(&self) -> &Forest { &self.join }

    /// Remaining split forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn split(&self) -> &Forest { &self.split }

    /// Merge forest built so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn merge(&self) -> &Forest { &self.merge }

    /// Counters so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn stats(&self) -> MergeStats { self.stats }

    /// Number of queued candidates.
    #[must_use]
    #[rustfmt::skip]
    pub fn queued(&self) -> usize { self.queue.len() }

    /// Processes the next candidate, or returns `None` once at most one
    /// candidate is left.
    pub fn step(&mut self) -> Option<MergeStep> {
        if self.queue.len() <= 1 {
            return None;
        }
        let vertex = self.queue.pop_front()?;
        debug_assert!(!self.join.node(vertex).is_detached(), "vertex queued twice");

        let pruned = if self.join.child_count(vertex) == 0 {
            self.join.parent(vertex).map(|parent| (parent, PruneVia::Join))
        } else {
            self.split.parent(vertex).map(|parent| (parent, PruneVia::Split))
        };
        let Some((parent, via)) = pruned else {
            self.stats.skipped_roots += 1;
            debug!(vertex, "exhausted component root left in the merge forest");
            return Some(MergeStep::SkippedRoot { vertex });
        };

        let (leaf_forest, spliced_forest) = match via {
            PruneVia::Join => (&mut self.join, &mut self.split),
            PruneVia::Split => (&mut self.split, &mut self.join),
        };
        leaf_forest.detach_leaf(vertex);
        let spliced = spliced_forest.splice_out(vertex);
        self.merge.attach(vertex, parent);

        match via {
            PruneVia::Join => {
                self.stats.join_links_removed += 1;
                self.stats.split_links_removed += spliced;
            }
            PruneVia::Split => {
                self.stats.split_links_removed += 1;
                self.stats.join_links_removed += spliced;
            }
        }
        self.stats.iterations += 1;
        self.stats.edges_added += 1;

        if is_candidate(&self.join, &self.split, parent) {
            self.queue.push_back(parent);
        }
        Some(MergeStep::Pruned {
            vertex,
            parent,
            via,
        })
    }

    /// Runs the remaining steps and returns the merge forest with the final
    /// counters.
    #[must_use]
    pub fn finish(mut self) -> (Forest, MergeStats) {
        while self.step().is_some() {}
        (self.merge, self.stats)
    }
}

fn is_candidate(join: &Forest, split: &Forest, vertex: usize) -> bool {
    join.child_count(vertex) + split.child_count(vertex) == 1
}

/// Splices `join` and `split` into the merge forest.
///
/// Both forests are consumed. The splice stops once at most one candidate is
/// queued, so every component keeps at least one root, and a component whose
/// relation has cycles can keep several.
///
/// # Examples
/// ```
/// use mergetree_core::{Forest, merge_join_split};
///
/// // Two vertices, 0 below 1: join has 0 under 1, split has 1 under 0.
/// let mut join = Forest::new(2);
/// join.attach(0, 1);
/// let mut split = Forest::new(2);
/// split.attach(1, 0);
/// let (merge, stats) = merge_join_split(join, split);
/// assert_eq!(merge.edge_count(), 1);
/// assert_eq!(merge.roots().count(), 1);
/// assert_eq!(stats.links_removed(), 2 * stats.edges_added);
/// ```
#[must_use]
#[instrument(
    name = "merge_tree.merge",
    level = "debug",
    skip(join, split),
    fields(vertices = join.len())
)]
pub fn merge_join_split(join: Forest, split: Forest) -> (Forest, MergeStats) {
    MergeSplice::new(join, split).finish()
}
