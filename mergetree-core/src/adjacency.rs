//! Neighbor lists gathered once per build in local index space.
//!
//! Both sweeps walk every vertex's neighbors, so the relation is queried once
//! up front and flattened into compressed rows. Neighbors outside the vertex
//! set are dropped here; ids outside the field's domain are fatal.

use std::sync::Arc;

use crate::{
    error::{MergeTreeError, Result},
    field::NeighborRelation,
    vertex_set::VertexSet,
};

/// Compressed neighbor rows keyed by local index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Adjacency {
    /// Queries `relation` for every member of `vertices` and keeps the
    /// neighbors that are members too.
    ///
    /// # Errors
    /// Returns [`MergeTreeError::NeighborOutOfDomain`] when a neighbor id is
    /// not below `domain_len`, and [`MergeTreeError::Field`] when the relation
    /// itself fails.
    pub fn gather<R>(
        vertices: &VertexSet,
        domain_len: usize,
        relation: &R,
        field_name: &str,
    ) -> Result<Self>
    where
        R: NeighborRelation + ?Sized,
    {
        let mut offsets = Vec::with_capacity(vertices.len() + 1);
        let mut targets = Vec::new();
        let mut scratch = Vec::new();
        offsets.push(0);

        for vertex in vertices.iter() {
            scratch.clear();
            relation
                .neighbors(vertex, &mut scratch)
                .map_err(|error| MergeTreeError::Field {
                    field: Arc::from(field_name),
                    error,
                })?;
            for &neighbor in &scratch {
                if neighbor >= domain_len {
                    return Err(MergeTreeError::NeighborOutOfDomain {
                        field: Arc::from(field_name),
                        vertex,
                        neighbor,
                        len: domain_len,
                    });
                }
                targets.extend(vertices.local(neighbor));
            }
            offsets.push(targets.len());
        }

        Ok(Self { offsets, targets })
    }

    /// Number of rows (vertices).
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Returns whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local neighbors of local vertex `vertex`.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.targets[self.offsets[vertex]..self.offsets[vertex + 1]]
    }
}
