//! Join and split tree construction.
//!
//! Both trees come from the same sweep. The join sweep visits vertices from
//! lowest to highest and links each vertex to the components of its
//! already-visited (lower) neighbors; the split sweep does the same from
//! highest to lowest against higher neighbors. A component's attachment point
//! is the last vertex that merged it, which is still a root of the forest, so
//! linking it under the current vertex never re-parents a node.

use crate::{adjacency::Adjacency, forest::Forest, order::VertexOrder, union_find::DisjointSet};

/// Which sub-/super-level family a sweep tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepDirection {
    /// Ascending sweep over sub-level sets.
    Join,
    /// Descending sweep over super-level sets.
    Split,
}

/// Builds the join tree: leaves are vertices with no lower neighbor.
#[must_use]
pub fn build_join_tree(order: &VertexOrder, adjacency: &Adjacency) -> Forest {
    sweep(order, adjacency, SweepDirection::Join)
}

/// Builds the split tree: leaves are vertices with no higher neighbor.
#[must_use]
pub fn build_split_tree(order: &VertexOrder, adjacency: &Adjacency) -> Forest {
    sweep(order, adjacency, SweepDirection::Split)
}

/// Runs one sweep in `direction`.
///
/// `order` and `adjacency` must cover the same local vertices.
#[must_use]
pub fn sweep(order: &VertexOrder, adjacency: &Adjacency, direction: SweepDirection) -> Forest {
    debug_assert_eq!(order.len(), adjacency.len());
    match direction {
        SweepDirection::Join => link_components(
            order.as_slice().iter().copied(),
            adjacency,
            order.len(),
            |neighbor, vertex| order.precedes(neighbor, vertex),
        ),
        SweepDirection::Split => link_components(
            order.descending(),
            adjacency,
            order.len(),
            |neighbor, vertex| order.precedes(vertex, neighbor),
        ),
    }
}

fn link_components(
    sequence: impl Iterator<Item = usize>,
    adjacency: &Adjacency,
    len: usize,
    visited_before: impl Fn(usize, usize) -> bool,
) -> Forest {
    let mut forest = Forest::new(len);
    let mut dsu = DisjointSet::new(len);

    for vertex in sequence {
        for &neighbor in adjacency.neighbors(vertex) {
            if !visited_before(neighbor, vertex) {
                continue;
            }
            let vertex_set = dsu.find(vertex);
            let neighbor_set = dsu.find(neighbor);
            if vertex_set == neighbor_set {
                continue;
            }
            forest.attach(dsu.component_node[neighbor_set], vertex);
            let merged = dsu.union(vertex_set, neighbor_set);
            dsu.component_node[merged] = vertex;
        }
    }

    forest
}

#[cfg(test)]
mod tests;
