//! The subset of a domain's vertices analysed by one build.
//!
//! A build works in a dense local index space `0..len()`. Local index `i`
//! maps to the `i`-th smallest global id of the set, so the mapping is
//! monotonic and the id tie-break of the vertex order is the same in both
//! spaces.

use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Repr {
    Range(Range<usize>),
    // Sorted, deduplicated, never contiguous.
    Explicit(Vec<usize>),
}

/// A set of global vertex ids with a dense local numbering.
///
/// Contiguous sets are stored as a range. Neighbor filtering uses true
/// membership for every representation, which coincides with a bounds check
/// when the set is contiguous.
///
/// # Examples
/// ```
/// use mergetree_core::VertexSet;
///
/// let set = VertexSet::from_ids([9, 4, 7, 4]);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.global(1), Some(7));
/// assert_eq!(set.local(9), Some(2));
/// assert_eq!(set.local(5), None);
/// assert!(!set.is_contiguous());
///
/// let range = VertexSet::range(10..14);
/// assert!(range.is_contiguous());
/// assert_eq!(range.local(12), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexSet {
    repr: Repr,
}

impl VertexSet {
    /// Every vertex of a domain with `len` vertices.
    #[must_use]
    pub fn full(len: usize) -> Self {
        Self::range(0..len)
    }

    /// The contiguous ids in `range`.
    #[must_use]
    pub fn range(range: Range<usize>) -> Self {
        let range = if range.end < range.start {
            range.start..range.start
        } else {
            range
        };
        Self {
            repr: Repr::Range(range),
        }
    }

    /// An arbitrary set of ids; duplicates are ignored.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = usize>) -> Self {
        let mut ids: Vec<usize> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        match (ids.first(), ids.last()) {
            (Some(&first), Some(&last)) if last - first + 1 == ids.len() => {
                Self::range(first..last + 1)
            }
            (None, _) | (_, None) => Self::range(0..0),
            _ => Self {
                repr: Repr::Explicit(ids),
            },
        }
    }

    /// Number of vertices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Range(range) => range.len(),
            Repr::Explicit(ids) => ids.len(),
        }
    }

    /// Returns whether the set holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the ids form one unbroken range.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        matches!(self.repr, Repr::Range(_))
    }

    /// Maps a local index to its global id.
    #[must_use]
    pub fn global(&self, local: usize) -> Option<usize> {
        match &self.repr {
            Repr::Range(range) => range.start.checked_add(local).filter(|id| range.contains(id)),
            Repr::Explicit(ids) => ids.get(local).copied(),
        }
    }

    /// Maps a global id to its local index, or `None` when it is not a member.
    #[must_use]
    pub fn local(&self, global: usize) -> Option<usize> {
        match &self.repr {
            Repr::Range(range) => range.contains(&global).then(|| global - range.start),
            Repr::Explicit(ids) => ids.binary_search(&global).ok(),
        }
    }

    /// Returns whether `global` is a member.
    #[must_use]
    pub fn contains(&self, global: usize) -> bool {
        self.local(global).is_some()
    }

    /// Largest member id, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<usize> {
        match &self.repr {
            Repr::Range(range) => range.end.checked_sub(1).filter(|_| !range.is_empty()),
            Repr::Explicit(ids) => ids.last().copied(),
        }
    }

    /// Global ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let (range, ids) = match &self.repr {
            Repr::Range(range) => (range.clone(), &[][..]),
            Repr::Explicit(ids) => (0..0, ids.as_slice()),
        };
        range.chain(ids.iter().copied())
    }
}
