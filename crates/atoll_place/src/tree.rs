//! Arena-backed storage for the ASF-B*-tree.
//!
//! Nodes live in a dense [`Vec`] indexed by opaque [`NodeId`] handles, the
//! owned re-architecture of the original heap-pointer tree. The tree encodes
//! placement relations: a left child sits flush against its parent's right
//! edge; a right child sits directly above its parent at the same x.

use crate::error::PlaceError;
use atoll_model::SymmetryType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque, copyable ID for a node in the B*-tree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of the ASF-B*-tree, naming one representative module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BStarNode {
    /// Name of the representative module this node places.
    pub module: String,
    /// Child placed flush against this node's right edge.
    pub left: Option<NodeId>,
    /// Child placed directly above this node at the same x.
    pub right: Option<NodeId>,
}

/// The B*-tree over representative modules.
///
/// Owns its nodes; cleared and rebuilt whenever the initial builder runs.
#[derive(Clone, Default, Debug)]
pub struct BStarTree {
    nodes: Vec<BStarNode>,
    root: Option<NodeId>,
}

impl BStarTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all nodes and the root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Allocates a detached node for the named module.
    pub(crate) fn alloc(&mut self, module: impl Into<String>) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(BStarNode {
            module: module.into(),
            left: None,
            right: None,
        });
        id
    }

    /// The root node, if the tree has been built.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &BStarNode {
        &self.nodes[id.as_raw() as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BStarNode {
        &mut self.nodes[id.as_raw() as usize]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds the node placing the named module by walking from the root.
    pub fn find(&self, module: &str) -> Option<NodeId> {
        self.preorder()
            .into_iter()
            .find(|&id| self.node(id).module == module)
    }

    /// Pre-order traversal (node, left, right) from the root.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.preorder_walk(root, &mut out);
        }
        out
    }

    fn preorder_walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if let Some(left) = self.node(id).left {
            self.preorder_walk(left, out);
        }
        if let Some(right) = self.node(id).right {
            self.preorder_walk(right, out);
        }
    }

    /// In-order traversal (left, node, right) from the root.
    pub fn inorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.inorder_walk(root, &mut out);
        }
        out
    }

    fn inorder_walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(left) = self.node(id).left {
            self.inorder_walk(left, out);
        }
        out.push(id);
        if let Some(right) = self.node(id).right {
            self.inorder_walk(right, out);
        }
    }

    /// The branch that sits against the symmetry axis, root included.
    ///
    /// For vertical symmetry this is the chain of right children descending
    /// from the root; for horizontal symmetry, the chain of left children.
    pub fn boundary_branch(&self, ty: SymmetryType) -> Vec<NodeId> {
        let mut branch = Vec::new();
        let mut cursor = self.root;
        while let Some(id) = cursor {
            branch.push(id);
            cursor = match ty {
                SymmetryType::Vertical => self.node(id).right,
                SymmetryType::Horizontal => self.node(id).left,
            };
        }
        branch
    }

    /// First node with a free right slot, visiting node, left subtree, then
    /// right subtree.
    pub(crate) fn find_open_right_slot(&self, from: NodeId) -> Option<NodeId> {
        let node = self.node(from);
        if node.right.is_none() {
            return Some(from);
        }
        if let Some(left) = node.left {
            if let Some(hit) = self.find_open_right_slot(left) {
                return Some(hit);
            }
        }
        if let Some(right) = node.right {
            return self.find_open_right_slot(right);
        }
        None
    }

    /// First node with a free left slot, visiting node, right subtree, then
    /// left subtree.
    pub(crate) fn find_open_left_slot(&self, from: NodeId) -> Option<NodeId> {
        let node = self.node(from);
        if node.left.is_none() {
            return Some(from);
        }
        if let Some(right) = node.right {
            if let Some(hit) = self.find_open_left_slot(right) {
                return Some(hit);
            }
        }
        if let Some(left) = node.left {
            return self.find_open_left_slot(left);
        }
        None
    }

    /// The parent of `id` and whether `id` hangs on the parent's left slot.
    pub(crate) fn parent_of(&self, id: NodeId) -> Option<(NodeId, bool)> {
        for candidate in self.preorder() {
            let node = self.node(candidate);
            if node.left == Some(id) {
                return Some((candidate, true));
            }
            if node.right == Some(id) {
                return Some((candidate, false));
            }
        }
        None
    }

    /// Returns `true` if `candidate` lies in the subtree rooted at `sub`.
    pub(crate) fn in_subtree(&self, sub: NodeId, candidate: NodeId) -> bool {
        if sub == candidate {
            return true;
        }
        let node = self.node(sub);
        node.left.map_or(false, |l| self.in_subtree(l, candidate))
            || node.right.map_or(false, |r| self.in_subtree(r, candidate))
    }

    /// Checks the tree against the expected representative set.
    ///
    /// Walks from the root detecting shared nodes (which would make the
    /// structure cyclic or a DAG), duplicate module names, unreachable
    /// nodes, and names missing from or absent in the expected set.
    pub fn validate_structure(&self, expected: &[String]) -> Result<(), PlaceError> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut names: HashSet<&str> = HashSet::new();
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(PlaceError::InvalidTopology {
                    reason: format!("node {id} is reachable along two paths"),
                });
            }
            let node = self.node(id);
            if !names.insert(node.module.as_str()) {
                return Err(PlaceError::InvalidTopology {
                    reason: format!("duplicate module `{}`", node.module),
                });
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
            if let Some(right) = node.right {
                stack.push(right);
            }
        }
        if visited.len() != self.nodes.len() {
            return Err(PlaceError::InvalidTopology {
                reason: format!(
                    "{} of {} nodes unreachable from the root",
                    self.nodes.len() - visited.len(),
                    self.nodes.len()
                ),
            });
        }
        for rep in expected {
            if !names.contains(rep.as_str()) {
                return Err(PlaceError::InvalidTopology {
                    reason: format!("missing representative `{rep}`"),
                });
            }
        }
        if names.len() != expected.len() {
            for name in &names {
                if !expected.iter().any(|e| e == name) {
                    return Err(PlaceError::InvalidTopology {
                        reason: format!("stale module `{name}` is not a representative"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Renders the tree shape for diagnostics, one node per line.
    pub fn format_structure(&self) -> String {
        fn walk(tree: &BStarTree, id: NodeId, depth: usize, tag: &str, out: &mut String) {
            out.push_str(&"  ".repeat(depth));
            out.push_str(tag);
            out.push(' ');
            out.push_str(&tree.node(id).module);
            out.push('\n');
            if let Some(left) = tree.node(id).left {
                walk(tree, left, depth + 1, "L", out);
            }
            if let Some(right) = tree.node(id).right {
                walk(tree, right, depth + 1, "R", out);
            }
        }
        match self.root {
            None => "(empty)".to_string(),
            Some(root) => {
                let mut out = String::new();
                walk(self, root, 0, "*", &mut out);
                out
            }
        }
    }
}
