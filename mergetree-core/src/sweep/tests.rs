//! Unit and property tests for the join and split sweeps.

use proptest::prelude::*;
use rstest::rstest;

use crate::{
    adjacency::Adjacency,
    forest::Forest,
    order::VertexOrder,
    test_utils::{GraphField, graph_field_strategy, suite_proptest_config},
    vertex_set::VertexSet,
};

use super::{SweepDirection, build_join_tree, build_split_tree, sweep};

fn trees(field: &GraphField) -> (Forest, Forest) {
    let len = field.values().len();
    let order = VertexOrder::ascending(field.values());
    let adjacency =
        Adjacency::gather(&VertexSet::full(len), len, field, "graph").expect("graph is valid");
    (
        build_join_tree(&order, &adjacency),
        build_split_tree(&order, &adjacency),
    )
}

fn sorted_children(forest: &Forest, vertex: usize) -> Vec<usize> {
    let mut children = forest.children(vertex).to_vec();
    children.sort_unstable();
    children
}

#[test]
fn two_vertices_link_in_opposite_directions() {
    let (join, split) = trees(&GraphField::path(&[1.0, 2.0]));
    assert_eq!(join.children(1), &[0]);
    assert_eq!(join.parent(0), Some(1));
    assert_eq!(split.children(0), &[1]);
    assert_eq!(split.parent(1), Some(0));
}

#[test]
fn valley_path_joins_both_minima_at_the_saddle() {
    // 0 - 1 - 2 - 3 with minima at 0 and 2, maxima at 1 and 3.
    let (join, split) = trees(&GraphField::path(&[0.0, 2.0, 1.0, 3.0]));

    assert_eq!(sorted_children(&join, 1), vec![0, 2]);
    assert_eq!(join.children(3), &[1]);
    assert_eq!(join.roots().collect::<Vec<_>>(), vec![3]);

    assert_eq!(sorted_children(&split, 2), vec![1, 3]);
    assert_eq!(split.children(0), &[2]);
    assert_eq!(split.roots().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn component_attaches_through_its_latest_vertex() {
    // Centre 0 is the highest vertex; 4 is shared by the arms 1 and 2.
    let field = GraphField::from_edges(
        vec![9.0, 1.0, 2.0, 3.0, 0.0],
        &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 4)],
    );
    let (join, _) = trees(&field);
    assert!(join.is_consistent());
    assert_eq!(join.roots().collect::<Vec<_>>(), vec![0]);
    // 4 is the global minimum, swallowed by 1, then 1's component by 2.
    assert_eq!(join.parent(4), Some(1));
    assert_eq!(join.parent(1), Some(2));
    assert_eq!(sorted_children(&join, 0), vec![2, 3]);
}

#[rstest]
#[case::plateau(vec![1.0, 1.0, 1.0])]
#[case::descending(vec![3.0, 2.0, 1.0])]
fn ties_resolve_by_vertex_id(#[case] values: Vec<f32>) {
    let (join, split) = trees(&GraphField::path(&values));
    let order = VertexOrder::ascending(&values);
    for vertex in 0..values.len() {
        if let Some(parent) = join.parent(vertex) {
            assert!(order.precedes(vertex, parent));
        }
        if let Some(parent) = split.parent(vertex) {
            assert!(order.precedes(parent, vertex));
        }
    }
}

#[test]
fn disconnected_domain_yields_one_root_per_component() {
    let field = GraphField::from_edges(vec![0.0, 1.0, 5.0, 4.0, 7.0], &[(0, 1), (2, 3)]);
    let (join, split) = trees(&field);
    assert_eq!(join.roots().collect::<Vec<_>>(), vec![1, 2, 4]);
    assert_eq!(split.roots().collect::<Vec<_>>(), vec![0, 3, 4]);
}

#[test]
fn sweep_direction_matches_named_builders() {
    let field = GraphField::path(&[4.0, 0.0, 3.0, 1.0]);
    let order = VertexOrder::ascending(field.values());
    let adjacency = Adjacency::gather(&VertexSet::full(4), 4, &field, "graph").expect("valid");
    assert_eq!(
        sweep(&order, &adjacency, SweepDirection::Join),
        build_join_tree(&order, &adjacency)
    );
    assert_eq!(
        sweep(&order, &adjacency, SweepDirection::Split),
        build_split_tree(&order, &adjacency)
    );
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn sweeps_build_spanning_forests_in_order(field in graph_field_strategy()) {
        let len = field.values().len();
        let components = field.component_count(None);
        let order = VertexOrder::ascending(field.values());
        let (join, split) = trees(&field);

        prop_assert_eq!(join.len(), len);
        prop_assert_eq!(split.len(), len);
        prop_assert!(join.is_consistent());
        prop_assert!(split.is_consistent());
        prop_assert_eq!(join.edge_count(), len - components);
        prop_assert_eq!(split.edge_count(), len - components);
        prop_assert_eq!(join.roots().count(), components);
        prop_assert_eq!(split.roots().count(), components);

        for vertex in 0..len {
            if let Some(parent) = join.parent(vertex) {
                prop_assert!(order.precedes(vertex, parent));
            }
            if let Some(parent) = split.parent(vertex) {
                prop_assert!(order.precedes(parent, vertex));
            }
        }
    }
}
