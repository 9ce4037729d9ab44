//! Union-find over local vertex indices, used by the join and split sweeps.
//!
//! Sweeps add vertices in sorted order, so the structure skips union by rank:
//! the representative with the smaller index always points at the larger one.
//! `component_node` records, per representative, the tree node through which
//! the component is currently attached (the most recently swept vertex that
//! merged it), which is always a root of the tree under construction.

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    pub(crate) component_node: Vec<usize>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            component_node: (0..n).collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns the representative of `node`, compressing the visited path.
    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merges the sets of `left` and `right` and returns the surviving
    /// representative.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let left = self.find(left);
        let right = self.find(right);
        if left == right {
            return left;
        }
        let (smaller, larger) = if left < right {
            (left, right)
        } else {
            (right, left)
        };
        self.parent[smaller] = larger;
        larger
    }

    #[cfg(test)]
    pub(crate) fn raw_parent(&self, node: usize) -> usize {
        self.parent[node]
    }
}
