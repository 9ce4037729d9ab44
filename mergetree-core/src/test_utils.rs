//! Shared test utilities for `mergetree-core`.

use mergetree_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    error::FieldError,
    field::{NeighborRelation, ScalarField},
};

/// Builds a proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// In-memory field over an explicit adjacency list.
#[derive(Clone, Debug)]
pub(crate) struct GraphField {
    values: Vec<f32>,
    adjacency: Vec<Vec<usize>>,
}

impl GraphField {
    pub(crate) fn new(values: Vec<f32>, adjacency: Vec<Vec<usize>>) -> Self {
        Self { values, adjacency }
    }

    /// Vertices `0..values.len()` connected in a line.
    pub(crate) fn path(values: &[f32]) -> Self {
        let len = values.len();
        let adjacency = (0..len)
            .map(|vertex| {
                let mut row = Vec::new();
                row.extend(vertex.checked_sub(1));
                row.extend(Some(vertex + 1).filter(|&next| next < len));
                row
            })
            .collect();
        Self::new(values.to_vec(), adjacency)
    }

    /// Builds a symmetric field from an undirected edge list.
    pub(crate) fn from_edges(values: Vec<f32>, edges: &[(usize, usize)]) -> Self {
        let mut adjacency = vec![Vec::new(); values.len()];
        for &(left, right) in edges {
            if left == right {
                continue;
            }
            adjacency[left].push(right);
            adjacency[right].push(left);
        }
        Self::new(values, adjacency)
    }

    /// A regular `nx * ny * nz` grid with 6-connectivity, x fastest.
    pub(crate) fn grid(dims: [usize; 3], value: impl Fn([usize; 3]) -> f32) -> Self {
        let [nx, ny, nz] = dims;
        let index = |x: usize, y: usize, z: usize| x + nx * (y + ny * z);
        let mut values = Vec::with_capacity(nx * ny * nz);
        let mut edges = Vec::new();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    values.push(value([x, y, z]));
                    let here = index(x, y, z);
                    if x + 1 < nx {
                        edges.push((here, index(x + 1, y, z)));
                    }
                    if y + 1 < ny {
                        edges.push((here, index(x, y + 1, z)));
                    }
                    if z + 1 < nz {
                        edges.push((here, index(x, y, z + 1)));
                    }
                }
            }
        }
        Self::from_edges(values, &edges)
    }

    pub(crate) fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of connected components among `members` (all vertices when
    /// `None`), following only edges between members.
    pub(crate) fn component_count(&self, members: Option<&[usize]>) -> usize {
        let all: Vec<usize> = (0..self.values.len()).collect();
        let members = members.unwrap_or(&all);
        let mut inside = vec![false; self.values.len()];
        for &member in members {
            inside[member] = true;
        }
        let mut seen = vec![false; self.values.len()];
        let mut components = 0;
        for &start in members {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            let mut stack = vec![start];
            while let Some(vertex) = stack.pop() {
                for &next in &self.adjacency[vertex] {
                    if inside[next] && !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        components
    }
}

impl ScalarField for GraphField {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        "graph"
    }

    fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
        self.values.get(vertex).copied().ok_or(FieldError::OutOfBounds {
            vertex,
            len: self.values.len(),
        })
    }
}

impl NeighborRelation for GraphField {
    fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
        let row = self.adjacency.get(vertex).ok_or(FieldError::OutOfBounds {
            vertex,
            len: self.values.len(),
        })?;
        out.extend_from_slice(row);
        Ok(())
    }
}

/// Generates a random graph field from a seed.
///
/// Values are drawn from a small integer palette so ties are common, and
/// edges are sparse enough that some graphs are disconnected.
pub(crate) fn random_graph_field(seed: u64) -> GraphField {
    let mut rng = SmallRng::seed_from_u64(seed);
    let len = rng.gen_range(1..=40);
    let palette = rng.gen_range(1_u8..=12);
    let values = (0..len)
        .map(|_| f32::from(rng.gen_range(0..palette)))
        .collect();
    let edge_probability = rng.gen_range(0.02..0.35);
    let mut edges = Vec::new();
    for left in 0..len {
        for right in (left + 1)..len {
            if rng.gen_bool(edge_probability) {
                edges.push((left, right));
            }
        }
    }
    GraphField::from_edges(values, &edges)
}

/// Generates a connected random graph field (a random spanning path plus
/// extra edges).
pub(crate) fn random_connected_field(seed: u64) -> GraphField {
    let mut rng = SmallRng::seed_from_u64(seed);
    let len = rng.gen_range(1..=40);
    let values = (0..len).map(|_| rng.gen_range(-50.0_f32..50.0)).collect();
    let mut edges: Vec<(usize, usize)> = (1..len)
        .map(|vertex| (rng.gen_range(0..vertex), vertex))
        .collect();
    for _ in 0..rng.gen_range(0..=len) {
        edges.push((rng.gen_range(0..len), rng.gen_range(0..len)));
    }
    GraphField::from_edges(values, &edges)
}

pub(crate) fn graph_field_strategy() -> impl Strategy<Value = GraphField> {
    any::<u64>().prop_map(random_graph_field)
}

pub(crate) fn connected_field_strategy() -> impl Strategy<Value = GraphField> {
    any::<u64>().prop_map(random_connected_field)
}
