//! AVL balancing. Every node caches its height and balance factor, and after each insert or
//! remove every ancestor of the changed spot is refreshed and, if one side has become two levels
//! taller than the other, rotated back into shape.
//!
//! See [the Wikipedia page][wiki] for the terminology used below.
//!
//! [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Rebalancing
//!
//! # Examples
//!
//! ```
//! use bstrees::AvlTree;
//!
//! // Ascending input would make a plain BST a linked list.
//! let tree: AvlTree<_> = (1..=7).collect();
//!
//! assert_eq!(tree.height(), Some(2));
//! assert_eq!(tree.balance_factor(), 0);
//! assert_eq!(tree.level_order(), vec![&4, &2, &6, &1, &3, &5, &7]);
//! ```

use tracing::trace;

use crate::balance::Balance;
use crate::error::Violation;
use crate::tree::{NodeId, Tree};
use crate::util::{Excised, Side};

/// Height balancing: no node's subtrees differ in height by more than one.
#[derive(Copy, Clone, Debug, Default)]
pub struct Avl;

/// Cached shape of the subtree below an AVL node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AvlMeta {
    /// Edges on the longest path down to a leaf. A lone node has height 0.
    height: i32,
    /// `height(right) - height(left)`, where a missing child has height -1.
    balance_factor: i32,
}

impl Balance for Avl {
    type Meta = AvlMeta;

    fn fresh() -> Self::Meta {
        AvlMeta {
            height: 0,
            balance_factor: 0,
        }
    }

    fn after_insert<K>(tree: &mut Tree<K, Self>, node: NodeId) {
        let parent = tree.parent(node);
        retrace(tree, parent);
    }

    fn after_remove<K>(tree: &mut Tree<K, Self>, excised: Excised<Self::Meta>) {
        retrace(tree, excised.parent);
    }

    fn cached_height<K>(tree: &Tree<K, Self>, root: NodeId) -> Option<usize> {
        usize::try_from(tree.meta(root).height).ok()
    }

    fn check<K>(tree: &Tree<K, Self>) -> Result<(), Violation> {
        let depths = tree.depths();
        let mut heights = vec![-1; tree.slot_count()];
        for id in tree.postorder_ids() {
            let measured = |child: Option<NodeId>| child.map_or(-1, |c| heights[c.index()]);
            let left = measured(tree.left(id));
            let right = measured(tree.right(id));
            let actual = left.max(right) + 1;

            let depth = depths[id.index()];
            let meta = tree.meta(id);
            if meta.height != actual || meta.balance_factor != right - left {
                return Err(Violation::StaleHeight {
                    depth,
                    cached: meta.height,
                    actual,
                });
            }
            if (right - left).abs() > 1 {
                return Err(Violation::Unbalanced {
                    depth,
                    factor: right - left,
                });
            }
            heights[id.index()] = actual;
        }
        Ok(())
    }
}

impl<K> Tree<K, Avl> {
    /// The root's `height(right) - height(left)`. Always within `-1..=1`, and 0 for an empty
    /// tree.
    pub fn balance_factor(&self) -> i32 {
        self.root().map_or(0, |root| self.meta(root).balance_factor)
    }
}

fn height<K>(tree: &Tree<K, Avl>, node: Option<NodeId>) -> i32 {
    node.map_or(-1, |id| tree.meta(id).height)
}

/// Recomputes the height and balance factor of `id` from its children.
fn update<K>(tree: &mut Tree<K, Avl>, id: NodeId) {
    let left = height(tree, tree.left(id));
    let right = height(tree, tree.right(id));

    let meta = tree.meta_mut(id);
    meta.height = left.max(right) + 1;
    meta.balance_factor = right - left;
}

/// Rotates and refreshes the two nodes whose subtrees changed. The lower one goes first.
fn rotate<K>(tree: &mut Tree<K, Avl>, pivot: NodeId, toward: Side) -> NodeId {
    let raised = tree.rotate(pivot, toward);
    update(tree, pivot);
    update(tree, raised);
    raised
}

/// Refreshes `id` and rotates its subtree if it leans by two. Returns the subtree's root
/// afterwards, which may no longer be `id`.
fn rebalance<K>(tree: &mut Tree<K, Avl>, id: NodeId) -> NodeId {
    update(tree, id);

    let factor = tree.meta(id).balance_factor;
    let root = if factor < -1 {
        let left = tree.left(id).expect("Left heavy => left child");
        if tree.meta(left).balance_factor > 0 {
            trace!(?id, "left-right case");
            rotate(tree, left, Side::Left);
        }
        rotate(tree, id, Side::Right)
    } else if factor > 1 {
        let right = tree.right(id).expect("Right heavy => right child");
        if tree.meta(right).balance_factor < 0 {
            trace!(?id, "right-left case");
            rotate(tree, right, Side::Right);
        }
        rotate(tree, id, Side::Left)
    } else {
        id
    };

    if cfg!(debug_assertions) {
        let meta = tree.meta(root);
        assert!(meta.balance_factor.abs() <= 1);
        assert_eq!(
            meta.height,
            height(tree, tree.left(root)).max(height(tree, tree.right(root))) + 1
        );
    }
    root
}

/// Walks from `start` up to the root rebalancing every node on the way.
fn retrace<K>(tree: &mut Tree<K, Avl>, start: Option<NodeId>) {
    let mut cursor = start;
    while let Some(id) = cursor {
        let root = rebalance(tree, id);
        cursor = tree.parent(root);
    }
}
