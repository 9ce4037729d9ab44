//! Configuration and orchestration of a merge-tree build.
//!
//! [`MergeTreeBuilder`] validates the vertex set and field values, gathers
//! adjacency once, and runs the ordering, sweep and merge phases in turn.

use std::{sync::Arc, time::Instant};

use tracing::{info, instrument, warn};

use crate::{
    Result,
    adjacency::Adjacency,
    error::MergeTreeError,
    field::{NeighborRelation, ScalarField},
    forest::Forest,
    merge::merge_join_split,
    order::VertexOrder,
    sweep::{build_join_tree, build_split_tree},
    tree::MergeTree,
    vertex_set::VertexSet,
};

/// How the join and split sweeps are scheduled.
///
/// The two sweeps share no mutable state. `Concurrent` runs them as a pair of
/// rayon tasks when the `parallel` feature is enabled and falls back to
/// running them one after the other otherwise.
///
/// # Examples
/// ```
/// use mergetree_core::SweepStrategy;
///
/// assert_ne!(SweepStrategy::Sequential, SweepStrategy::Concurrent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStrategy {
    /// Build the join tree, then the split tree.
    Sequential,
    /// Build both trees at the same time.
    Concurrent,
}

impl Default for SweepStrategy {
    fn default() -> Self {
        if cfg!(feature = "parallel") {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

/// Configures and runs merge-tree builds.
///
/// # Examples
/// ```
/// use mergetree_core::{FieldError, MergeTreeBuilder, NeighborRelation, ScalarField, SweepStrategy};
///
/// struct Path(Vec<f32>);
///
/// impl ScalarField for Path {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "path" }
///     fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
///         self.0.get(vertex).copied().ok_or(FieldError::OutOfBounds { vertex, len: self.0.len() })
///     }
/// }
///
/// impl NeighborRelation for Path {
///     fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
///         out.extend(vertex.checked_sub(1));
///         out.extend(Some(vertex + 1).filter(|&next| next < self.0.len()));
///         Ok(())
///     }
/// }
///
/// let field = Path(vec![1.0, 3.0, 0.0, 2.0]);
/// let tree = MergeTreeBuilder::new()
///     .with_sweep_strategy(SweepStrategy::Sequential)
///     .build(&field, &field)?;
/// assert_eq!(tree.len(), 4);
/// assert!(tree.is_tree());
/// # Ok::<(), mergetree_core::MergeTreeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergeTreeBuilder {
    vertex_set: Option<VertexSet>,
    sweep_strategy: SweepStrategy,
}

impl MergeTreeBuilder {
    /// Creates a builder over the whole domain with the default strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the build to `vertex_set`.
    ///
    /// # Examples
    /// ```
    /// use mergetree_core::{MergeTreeBuilder, VertexSet};
    ///
    /// let builder = MergeTreeBuilder::new().with_vertex_set(VertexSet::range(4..8));
    /// assert_eq!(builder.vertex_set().map(VertexSet::len), Some(4));
    /// ```
    #[must_use]
    pub fn with_vertex_set(mut self, vertex_set: VertexSet) -> Self {
        self.vertex_set = Some(vertex_set);
        self
    }

    /// Returns the configured vertex set; `None` means the whole domain.
    #[must_use]
    pub fn vertex_set(&self) -> Option<&VertexSet> {
        self.vertex_set.as_ref()
    }

    /// Sets how the join and split sweeps are scheduled.
    #[must_use]
    pub fn with_sweep_strategy(mut self, strategy: SweepStrategy) -> Self {
        self.sweep_strategy = strategy;
        self
    }

    /// Returns the configured sweep strategy.
    #[must_use]
    pub fn sweep_strategy(&self) -> SweepStrategy {
        self.sweep_strategy
    }

    /// Builds the merge tree of `field` over the configured vertex set.
    ///
    /// # Errors
    /// Returns [`MergeTreeError::EmptyVertexSet`] for an empty selection,
    /// [`MergeTreeError::VertexOutOfRange`] when a selected id is not below
    /// `field.len()`, [`MergeTreeError::NonFiniteScalar`] for NaN or infinite
    /// values, [`MergeTreeError::NeighborOutOfDomain`] for inconsistent
    /// adjacency, and [`MergeTreeError::Field`] when an accessor fails.
    pub fn build<F, R>(&self, field: &F, relation: &R) -> Result<MergeTree>
    where
        F: ScalarField + ?Sized,
        R: NeighborRelation + ?Sized,
    {
        let vertices = self
            .vertex_set
            .clone()
            .unwrap_or_else(|| VertexSet::full(field.len()));
        self.build_over(field, relation, vertices)
    }

    #[instrument(
        name = "merge_tree.build",
        err,
        skip(self, field, relation, vertices),
        fields(
            field = %field.name(),
            vertices = vertices.len(),
            strategy = ?self.sweep_strategy
        ),
    )]
    fn build_over<F, R>(&self, field: &F, relation: &R, vertices: VertexSet) -> Result<MergeTree>
    where
        F: ScalarField + ?Sized,
        R: NeighborRelation + ?Sized,
    {
        let scalars = load_scalars(field, &vertices)?;
        let adjacency = Adjacency::gather(&vertices, field.len(), relation, field.name())?;

        let started = Instant::now();
        let order = VertexOrder::ascending(&scalars);
        info!(phase = "order", elapsed_us = elapsed_us(started), "phase completed");

        let (join, split) = self.sweeps(&order, &adjacency);

        let started = Instant::now();
        let (forest, stats) = merge_join_split(join, split);
        info!(
            phase = "merge",
            elapsed_us = elapsed_us(started),
            iterations = stats.iterations,
            skipped_roots = stats.skipped_roots,
            "phase completed"
        );

        let tree = MergeTree::new(vertices, scalars, forest, stats);
        info!(
            roots = tree.roots().count(),
            edges = tree.edge_count(),
            "merge tree built"
        );
        Ok(tree)
    }

    fn sweeps(&self, order: &VertexOrder, adjacency: &Adjacency) -> (Forest, Forest) {
        match self.sweep_strategy {
            #[cfg(feature = "parallel")]
            SweepStrategy::Concurrent => {
                let started = Instant::now();
                let trees = rayon::join(
                    || build_join_tree(order, adjacency),
                    || build_split_tree(order, adjacency),
                );
                info!(phase = "sweeps", elapsed_us = elapsed_us(started), "phase completed");
                trees
            }
            _ => {
                let started = Instant::now();
                let join = build_join_tree(order, adjacency);
                info!(phase = "join", elapsed_us = elapsed_us(started), "phase completed");
                let started = Instant::now();
                let split = build_split_tree(order, adjacency);
                info!(phase = "split", elapsed_us = elapsed_us(started), "phase completed");
                (join, split)
            }
        }
    }
}

/// Builds the merge tree of `field` over `vertices` with default settings.
///
/// # Errors
/// See [`MergeTreeBuilder::build`].
pub fn build_merge_tree<F, R>(vertices: VertexSet, field: &F, relation: &R) -> Result<MergeTree>
where
    F: ScalarField + ?Sized,
    R: NeighborRelation + ?Sized,
{
    MergeTreeBuilder::new()
        .with_vertex_set(vertices)
        .build(field, relation)
}

fn load_scalars<F>(field: &F, vertices: &VertexSet) -> Result<Vec<f32>>
where
    F: ScalarField + ?Sized,
{
    let name = || Arc::<str>::from(field.name());
    if vertices.is_empty() {
        warn!(field = field.name(), "vertex set is empty, returning error");
        return Err(MergeTreeError::EmptyVertexSet { field: name() });
    }
    if let Some(vertex) = vertices.max_id().filter(|&id| id >= field.len()) {
        return Err(MergeTreeError::VertexOutOfRange {
            field: name(),
            vertex,
            len: field.len(),
        });
    }

    let ids: Vec<usize> = vertices.iter().collect();
    let scalars = field
        .scalars(&ids)
        .map_err(|error| MergeTreeError::Field {
            field: name(),
            error,
        })?;
    if let Some((vertex, value)) = ids
        .iter()
        .zip(&scalars)
        .find(|(_, value)| !value.is_finite())
    {
        return Err(MergeTreeError::NonFiniteScalar {
            field: name(),
            vertex: *vertex,
            value: *value,
        });
    }
    Ok(scalars)
}

fn elapsed_us(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}
