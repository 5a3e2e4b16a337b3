//! The seam between the shared BST engine and the different balancing schemes.
//!
//! [`Tree`] does all of the positional work (finding where a key goes, linking and unlinking
//! nodes, swapping payloads with the in-order successor) exactly once. A [`Balance`] policy is
//! then handed the spot that changed and restores its own invariants.

use std::fmt;

use crate::error::Violation;
use crate::tree::{NodeId, Tree};
use crate::util::Excised;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Unbalanced {}
    impl Sealed for crate::avl::Avl {}
    impl Sealed for crate::red_black::RedBlack {}
}

/// A strategy for keeping a [`Tree`] balanced. This trait is sealed. Pick one of
/// [`Unbalanced`], [`Avl`][crate::Avl] or [`RedBlack`][crate::RedBlack].
pub trait Balance: Sized + sealed::Sealed {
    /// The per-node bookkeeping the policy needs (e.g. a height or a color).
    type Meta: Clone + fmt::Debug;

    /// The bookkeeping for a node that was just created.
    fn fresh() -> Self::Meta;

    /// Called after `node` was linked into the tree as a new leaf.
    fn after_insert<K>(tree: &mut Tree<K, Self>, node: NodeId);

    /// Called after a node with at most one child was unlinked and freed.
    fn after_remove<K>(tree: &mut Tree<K, Self>, excised: Excised<Self::Meta>);

    /// Checks the invariants specific to this policy. The BST ordering and parent links have
    /// already been checked by the time this runs.
    fn check<K>(tree: &Tree<K, Self>) -> Result<(), Violation>;

    /// The height of the subtree under `root` if the policy already tracks it. Returning `None`
    /// makes [`Tree::height`] measure the tree instead.
    fn cached_height<K>(_tree: &Tree<K, Self>, _root: NodeId) -> Option<usize> {
        None
    }

    /// Suffix printed after a node's key when a tree is displayed.
    fn label(_meta: &Self::Meta) -> &'static str {
        ""
    }
}

/// A plain binary search tree. Nothing is ever rotated, so inserting sorted keys produces a
/// linked list.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    type Meta = ();

    fn fresh() -> Self::Meta {}

    fn after_insert<K>(_tree: &mut Tree<K, Self>, _node: NodeId) {}

    fn after_remove<K>(_tree: &mut Tree<K, Self>, _excised: Excised<Self::Meta>) {}

    fn check<K>(_tree: &Tree<K, Self>) -> Result<(), Violation> {
        Ok(())
    }
}
