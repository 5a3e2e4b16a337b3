//! Structural problems reported by [`Tree::validate`][crate::Tree::validate].
//!
//! None of these can be produced through the public mutating API unless there is a bug in the
//! tree itself. They exist so tests (and curious users) can check a tree's shape after the fact.

use thiserror::Error;

/// A broken tree invariant. Depths are counted in edges from the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// An in-order walk produced two keys that were not strictly increasing.
    #[error("keys are out of order at depth {depth}")]
    Unordered {
        /// Depth of the node whose key was not greater than its in-order predecessor.
        depth: usize,
    },
    /// A child's parent link does not point at the node owning it.
    #[error("parent link at depth {depth} does not match its owner")]
    BrokenParentLink {
        /// Depth of the child with the stale parent link.
        depth: usize,
    },
    /// A node is still linked into the tree with no instances left.
    #[error("node at depth {depth} has a count of zero")]
    ZeroCount {
        /// Depth of the empty node.
        depth: usize,
    },
    /// The recorded size disagrees with the sum of all node counts.
    #[error("tree records {recorded} instances but stores {counted}")]
    SizeMismatch {
        /// The tree's bookkeeping.
        recorded: usize,
        /// What the nodes actually hold.
        counted: usize,
    },
    /// An AVL node's cached height or balance factor is out of date.
    #[error("stale AVL height at depth {depth}: cached {cached}, actual {actual}")]
    StaleHeight {
        /// Depth of the node.
        depth: usize,
        /// The height stored in the node.
        cached: i32,
        /// The height of the subtree as measured.
        actual: i32,
    },
    /// An AVL node's subtrees differ in height by more than one.
    #[error("AVL balance factor {factor} at depth {depth}")]
    Unbalanced {
        /// Depth of the node.
        depth: usize,
        /// `height(right) - height(left)`.
        factor: i32,
    },
    /// The root of a Red-Black tree is red.
    #[error("red-black root is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node at depth {depth} has a red child")]
    AdjacentRed {
        /// Depth of the red parent.
        depth: usize,
    },
    /// Two root-to-leaf paths pass through a different number of black nodes.
    #[error("black height {left} on the left differs from {right} on the right at depth {depth}")]
    BlackHeight {
        /// Depth of the node whose subtrees disagree.
        depth: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
}
