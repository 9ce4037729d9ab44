//! Read-only queries over a finished [`MergeTree`].

use std::collections::{HashSet, VecDeque};

use tracing::instrument;

use crate::{
    error::{MergeTreeError, Result},
    order::compare_vertices,
    tree::MergeTree,
};

/// A seam edge between two partitions of a larger domain.
///
/// The `low` endpoint is accounted for by the neighboring partition and is
/// never reported as a maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bridge {
    low: usize,
    high: usize,
}

impl Bridge {
    /// Creates a bridge with explicit endpoint roles.
    #[must_use]
    pub const fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    /// Endpoint excluded from maxima.
    #[must_use]
    #[rustfmt::skip]
    pub const fn low(&self) -> usize { self.low }

    /// Endpoint kept eligible.
    #[must_use]
    #[rustfmt::skip]
    pub const fn high(&self) -> usize { self.high }
}

/// Bridges supplied to [`MergeTree::maxima_query`].
///
/// # Examples
/// ```
/// use mergetree_core::{Bridge, BridgeSet};
///
/// let bridges: BridgeSet = [Bridge::new(3, 4), Bridge::new(8, 2)].into_iter().collect();
/// assert!(bridges.excludes(3));
/// assert!(bridges.excludes(8));
/// assert!(!bridges.excludes(4));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeSet {
    bridges: Vec<Bridge>,
    excluded: HashSet<usize>,
}

impl BridgeSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bridge`.
    pub fn insert(&mut self, bridge: Bridge) {
        self.excluded.insert(bridge.low);
        self.bridges.push(bridge);
    }

    /// Number of bridges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    /// Returns whether no bridges were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    /// Bridges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Bridge> {
        self.bridges.iter()
    }

    /// Returns whether `vertex` is the low endpoint of some bridge.
    #[must_use]
    pub fn excludes(&self, vertex: usize) -> bool {
        self.excluded.contains(&vertex)
    }
}

impl Extend<Bridge> for BridgeSet {
    fn extend<T: IntoIterator<Item = Bridge>>(&mut self, iter: T) {
        for bridge in iter {
            self.insert(bridge);
        }
    }
}

impl FromIterator<Bridge> for BridgeSet {
    fn from_iter<T: IntoIterator<Item = Bridge>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl MergeTree {
    /// Orients the edge `(a, b)` into a [`Bridge`] using the vertex order, so
    /// the lower endpoint is the one excluded.
    ///
    /// Returns `None` when either endpoint is not part of the tree.
    #[must_use]
    pub fn orient_bridge(&self, a: usize, b: usize) -> Option<Bridge> {
        let (la, lb) = (self.local_index(a)?, self.local_index(b)?);
        Some(if compare_vertices(self.local_scalars(), la, lb).is_lt() {
            Bridge::new(a, b)
        } else {
            Bridge::new(b, a)
        })
    }

    /// Vertices that end a branch of the merge tree at a local maximum.
    ///
    /// A vertex qualifies when it has no merge children, it is not the low
    /// endpoint of any bridge, and its parent's scalar is below its own. A
    /// childless root qualifies too, which covers single-vertex components.
    /// Because the splice stops once at most one candidate is queued, a
    /// component of a cyclic relation can keep several roots; childless ones
    /// among them are reported whether or not they peak locally, and a root
    /// with merge children is never reported. Ids are returned in ascending
    /// order.
    #[must_use]
    #[instrument(
        name = "merge_tree.maxima",
        level = "debug",
        skip(self, bridges),
        fields(vertices = self.len(), bridges = bridges.len())
    )]
    pub fn maxima_query(&self, bridges: &BridgeSet) -> Vec<usize> {
        let forest = self.forest();
        (0..self.len())
            .filter(|&local| {
                forest.child_count(local) == 0
                    && forest.parent(local).is_none_or(|parent| {
                        self.local_scalar(parent) < self.local_scalar(local)
                    })
            })
            .map(|local| self.global(local))
            .filter(|&vertex| !bridges.excludes(vertex))
            .collect()
    }

    /// Highest vertex of the super-level component at `level` containing
    /// `vertex`.
    ///
    /// When `vertex` itself lies below `level` it is returned unchanged.
    /// Otherwise the merge tree is walked from `vertex` through parent and
    /// child links, admitting only vertices whose scalar exceeds `level`.
    /// Among equal maxima the first one reached wins.
    ///
    /// # Errors
    /// Returns [`MergeTreeError::NonFiniteLevel`] for a NaN or infinite
    /// `level`, and [`MergeTreeError::UnknownVertex`] when `vertex` is not
    /// part of the tree.
    #[instrument(
        name = "merge_tree.component_max",
        level = "debug",
        err,
        skip(self)
    )]
    pub fn component_maximum_query(&self, vertex: usize, level: f32) -> Result<usize> {
        if !level.is_finite() {
            return Err(MergeTreeError::NonFiniteLevel { level });
        }
        let start = self
            .local_index(vertex)
            .ok_or(MergeTreeError::UnknownVertex { vertex })?;
        if self.local_scalar(start) < level {
            return Ok(vertex);
        }

        let forest = self.forest();
        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        let mut best = start;

        while let Some(current) = queue.pop_front() {
            let adjacent = forest
                .parent(current)
                .into_iter()
                .chain(forest.children(current).iter().copied());
            for next in adjacent {
                if visited[next] || self.local_scalar(next) <= level {
                    continue;
                }
                visited[next] = true;
                if self.local_scalar(next) > self.local_scalar(best) {
                    best = next;
                }
                queue.push_back(next);
            }
        }

        Ok(self.global(best))
    }
}
