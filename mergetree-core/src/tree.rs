//! The finished merge tree.

use crate::{forest::Forest, merge::MergeStats, vertex_set::VertexSet};

/// Merge forest over a vertex set, together with the scalar snapshot it was
/// built from.
///
/// Public accessors take and return global vertex ids. The tree is immutable
/// once built, so queries may run from several threads at once.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeTree {
    vertices: VertexSet,
    scalars: Vec<f32>,
    forest: Forest,
    stats: MergeStats,
}

impl MergeTree {
    pub(crate) fn new(
        vertices: VertexSet,
        scalars: Vec<f32>,
        forest: Forest,
        stats: MergeStats,
    ) -> Self {
        debug_assert_eq!(vertices.len(), scalars.len());
        debug_assert_eq!(vertices.len(), forest.len());
        Self {
            vertices,
            scalars,
            forest,
            stats,
        }
    }

    /// Number of vertices in the tree.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.forest.len() }

    /// Returns whether the tree holds no vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.forest.is_empty() }

    /// The vertex set the tree was built over.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> &VertexSet { &self.vertices }

    /// The underlying forest, indexed by local index.
    #[must_use]
    #[rustfmt::skip]
    pub fn forest(&self) -> &Forest { &self.forest }

    /// Counters from the merge procedure.
    #[must_use]
    #[rustfmt::skip]
    pub fn stats(&self) -> MergeStats { self.stats }

    /// Number of parent-child edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.forest.edge_count() }

    /// Returns whether the forest is a single tree.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        self.forest.roots().take(2).count() == 1
    }

    /// Global id of the vertex at local index `local`.
    #[must_use]
    pub fn vertex_id(&self, local: usize) -> Option<usize> {
        self.vertices.global(local)
    }

    /// Local index of global vertex `vertex`, if it belongs to the tree.
    #[must_use]
    pub fn local_index(&self, vertex: usize) -> Option<usize> {
        self.vertices.local(vertex)
    }

    /// Scalar sampled at `vertex` when the tree was built.
    #[must_use]
    pub fn scalar(&self, vertex: usize) -> Option<f32> {
        self.local_index(vertex).map(|local| self.scalars[local])
    }

    /// Root vertices in ascending id order.
    ///
    /// Each connected component keeps at least one root. The merge splice
    /// stops once at most one candidate is queued, so a component whose
    /// relation has cycles can keep more than one.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.forest.roots().map(move |local| self.global(local))
    }

    /// Merge parent of `vertex`; `None` for roots and unknown vertices.
    #[must_use]
    pub fn parent(&self, vertex: usize) -> Option<usize> {
        let local = self.local_index(vertex)?;
        self.forest.parent(local).map(|parent| self.global(parent))
    }

    /// Merge children of `vertex`; empty for unknown vertices.
    pub fn children(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        let children = self
            .local_index(vertex)
            .map_or(&[][..], |local| self.forest.children(local));
        children.iter().map(move |&child| self.global(child))
    }

    pub(crate) fn local_scalar(&self, local: usize) -> f32 {
        self.scalars[local]
    }

    pub(crate) fn local_scalars(&self) -> &[f32] {
        &self.scalars
    }

    pub(crate) fn global(&self, local: usize) -> usize {
        let global = self.vertices.global(local);
        debug_assert!(global.is_some(), "local index {local} has no global id");
        global.unwrap_or(local)
    }
}
