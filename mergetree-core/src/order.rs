//! Total order over the vertices of one build.
//!
//! Vertices compare by scalar value, with ties broken by ascending id. Local
//! indices are assigned in ascending global id order, so comparing local
//! indices gives the same tie-break as comparing global ids.

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

/// Compares two local vertices under the scalar-then-id total order.
///
/// Values compare numerically, so `-0.0` and `0.0` tie and fall back to the
/// id. Incomparable values fall back to `total_cmp`.
#[must_use]
pub fn compare_vertices(scalars: &[f32], left: usize, right: usize) -> Ordering {
    let (a, b) = (scalars[left], scalars[right]);
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.total_cmp(&b))
        .then_with(|| left.cmp(&right))
}

/// The ascending permutation of a build's vertices plus each vertex's rank.
///
/// # Examples
/// ```
/// use mergetree_core::VertexOrder;
///
/// let order = VertexOrder::ascending(&[2.0, 1.0, 2.0, 0.5]);
/// assert_eq!(order.as_slice(), [3, 1, 0, 2]);
/// assert!(order.precedes(0, 2));
/// assert!(!order.precedes(2, 0));
/// assert_eq!(order.descending().collect::<Vec<_>>(), [2, 0, 1, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexOrder {
    ascending: Vec<usize>,
    rank: Vec<usize>,
}

impl VertexOrder {
    /// Sorts local indices `0..scalars.len()` into ascending total order.
    #[must_use]
    pub fn ascending(scalars: &[f32]) -> Self {
        let mut ascending: Vec<usize> = (0..scalars.len()).collect();
        sort_by_total_order(&mut ascending, scalars);

        let mut rank = vec![0; ascending.len()];
        for (position, &vertex) in ascending.iter().enumerate() {
            rank[vertex] = position;
        }
        Self { ascending, rank }
    }

    /// Number of ordered vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ascending.len()
    }

    /// Returns whether the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ascending.is_empty()
    }

    /// Local indices from lowest to highest.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.ascending
    }

    /// Local indices from highest to lowest, walking the ascending order back
    /// to front.
    pub fn descending(&self) -> impl Iterator<Item = usize> + '_ {
        self.ascending.iter().rev().copied()
    }

    /// Position of `vertex` in the ascending order.
    #[must_use]
    pub fn rank(&self, vertex: usize) -> usize {
        self.rank[vertex]
    }

    /// Returns whether `left` comes strictly before `right`.
    #[must_use]
    pub fn precedes(&self, left: usize, right: usize) -> bool {
        self.rank[left] < self.rank[right]
    }
}

/// Returns the ascending permutation of `0..scalars.len()`.
#[must_use]
pub fn ascending_order(scalars: &[f32]) -> Vec<usize> {
    VertexOrder::ascending(scalars).ascending
}

#[cfg(feature = "parallel")]
fn sort_by_total_order(indices: &mut [usize], scalars: &[f32]) {
    indices.par_sort_unstable_by(|&left, &right| compare_vertices(scalars, left, right));
}

#[cfg(not(feature = "parallel"))]
fn sort_by_total_order(indices: &mut [usize], scalars: &[f32]) {
    indices.sort_unstable_by(|&left, &right| compare_vertices(scalars, left, right));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::test_utils::suite_proptest_config;

    #[rstest]
    #[case::distinct(vec![3.0, 1.0, 2.0], vec![1, 2, 0])]
    #[case::all_equal(vec![5.0, 5.0, 5.0], vec![0, 1, 2])]
    #[case::ties_by_id(vec![1.0, 0.0, 1.0, 0.0], vec![1, 3, 0, 2])]
    #[case::signed_zeros_tie(vec![0.0, -0.0], vec![0, 1])]
    #[case::empty(vec![], vec![])]
    fn ascending_order_sorts_by_scalar_then_id(
        #[case] scalars: Vec<f32>,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(ascending_order(&scalars), expected);
    }

    #[test]
    fn rank_inverts_the_permutation() {
        let order = VertexOrder::ascending(&[0.3, -1.0, 7.5, 0.3]);
        for (position, &vertex) in order.as_slice().iter().enumerate() {
            assert_eq!(order.rank(vertex), position);
        }
    }

    proptest! {
        #![proptest_config(suite_proptest_config(128))]

        #[test]
        fn ascending_order_is_a_deterministic_sorted_permutation(
            scalars in prop::collection::vec(-8_i8..8, 0..64)
        ) {
            let scalars: Vec<f32> = scalars.into_iter().map(f32::from).collect();
            let first = ascending_order(&scalars);
            let second = ascending_order(&scalars);
            prop_assert_eq!(&first, &second);

            let mut seen = first.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..scalars.len()).collect::<Vec<_>>());

            for pair in first.windows(2) {
                prop_assert_eq!(
                    compare_vertices(&scalars, pair[0], pair[1]),
                    Ordering::Less
                );
            }
        }
    }
}
