//! Arena-backed forests indexed by local vertex index.
//!
//! Every tree of the pipeline (join, split and merge) is a [`Forest`] with one
//! [`TreeNode`] per vertex. Children are owned as index lists and the parent
//! is a plain back-reference. Removing a node from a tree clears its links and
//! flags it as detached; the slot itself lives as long as the forest.

/// One vertex's node within a forest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    vertex: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    detached: bool,
}

impl TreeNode {
    fn new(vertex: usize) -> Self {
        Self {
            vertex,
            parent: None,
            children: Vec::new(),
            detached: false,
        }
    }

    /// Local index of the vertex this node stands for.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex(&self) -> usize { self.vertex }

    /// Parent node, or `None` for a root.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> Option<usize> { self.parent }

    /// Child nodes in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn children(&self) -> &[usize] { &self.children }

    /// Whether the node has been removed from its tree.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_detached(&self) -> bool { self.detached }
}

/// A forest over `len()` vertices.
///
/// # Examples
/// ```
/// use mergetree_core::Forest;
///
/// let forest = Forest::new(3);
/// assert_eq!(forest.len(), 3);
/// assert_eq!(forest.roots().count(), 3);
/// assert_eq!(forest.edge_count(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<TreeNode>,
}

impl Forest {
    /// Creates `len` parent-less, childless nodes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            nodes: (0..len).map(TreeNode::new).collect(),
        }
    }

    /// Number of node slots, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the forest has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node for `vertex`.
    #[must_use]
    pub fn node(&self, vertex: usize) -> &TreeNode {
        &self.nodes[vertex]
    }

    /// Parent of `vertex`.
    #[must_use]
    pub fn parent(&self, vertex: usize) -> Option<usize> {
        self.nodes[vertex].parent
    }

    /// Children of `vertex`.
    #[must_use]
    pub fn children(&self, vertex: usize) -> &[usize] {
        &self.nodes[vertex].children
    }

    /// Number of children of `vertex`.
    #[must_use]
    pub fn child_count(&self, vertex: usize) -> usize {
        self.nodes[vertex].children.len()
    }

    /// Live nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .filter(|node| !node.detached && node.parent.is_none())
            .map(TreeNode::vertex)
    }

    /// Total number of parent-child links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.children.len()).sum()
    }

    /// Checks that every parent link is mirrored by a child entry and vice
    /// versa, and that detached nodes hold no links.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.nodes.iter().all(|node| {
            let parent_ok = node.parent.is_none_or(|parent| {
                self.nodes
                    .get(parent)
                    .is_some_and(|p| !p.detached && p.children.contains(&node.vertex))
            });
            let children_ok = node.children.iter().all(|&child| {
                self.nodes
                    .get(child)
                    .is_some_and(|c| c.parent == Some(node.vertex))
            });
            let detached_ok =
                !node.detached || (node.parent.is_none() && node.children.is_empty());
            parent_ok && children_ok && detached_ok
        })
    }

    /// Makes `child` a child of `parent`.
    ///
    /// `child` must currently be a root and differ from `parent`; debug builds
    /// assert both.
    pub fn attach(&mut self, child: usize, parent: usize) {
        debug_assert!(self.nodes[child].parent.is_none(), "child must be a root");
        debug_assert_ne!(child, parent, "a node cannot parent itself");
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Removes the childless node `vertex` from its parent's children and
    /// detaches it. Returns the former parent.
    pub(crate) fn detach_leaf(&mut self, vertex: usize) -> Option<usize> {
        debug_assert!(self.nodes[vertex].children.is_empty(), "node must be a leaf");
        let parent = self.nodes[vertex].parent.take();
        if let Some(parent) = parent {
            self.remove_child(parent, vertex);
        }
        self.nodes[vertex].detached = true;
        parent
    }

    /// Removes `vertex` from its tree, handing its children to its parent.
    ///
    /// When `vertex` is a root its children become roots. The children are
    /// appended after the parent's existing children. Returns the net number
    /// of links the forest lost.
    pub(crate) fn splice_out(&mut self, vertex: usize) -> usize {
        let parent = self.nodes[vertex].parent.take();
        let children = std::mem::take(&mut self.nodes[vertex].children);
        for &child in &children {
            self.nodes[child].parent = parent;
        }
        self.nodes[vertex].detached = true;
        match parent {
            Some(parent) => {
                self.remove_child(parent, vertex);
                self.nodes[parent].children.extend(children);
                1
            }
            None => children.len(),
        }
    }

    fn remove_child(&mut self, parent: usize, child: usize) {
        let siblings = &mut self.nodes[parent].children;
        if let Some(position) = siblings.iter().position(|&sibling| sibling == child) {
            siblings.swap_remove(position);
        }
    }
}
