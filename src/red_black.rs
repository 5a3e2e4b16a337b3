//! Red-Black balancing. Every node is red or black, and after each mutation the tree is
//! recolored and rotated so that:
//!
//! 1. The root is black.
//! 2. No red node has a red child.
//! 3. Every path from a node down to a missing child passes through the same number of black
//!    nodes (missing children count as black).
//!
//! Repairs walk upwards through parent links, so removal doesn't need to remember how it got to
//! the node it unlinked.
//!
//! # Examples
//!
//! ```
//! use bstrees::RedBlackTree;
//!
//! let mut tree: RedBlackTree<_> = (0..10).collect();
//! assert!(tree.height().unwrap() <= 4);
//! assert!(tree.is_valid());
//!
//! tree.remove(&3);
//! assert!(tree.is_valid());
//! assert_eq!(tree.black_height(), 3);
//! ```

use tracing::trace;

use crate::balance::Balance;
use crate::error::Violation;
use crate::tree::{NodeId, Tree};
use crate::util::{Excised, Side};

/// Color balancing: the longest root-to-leaf path is at most twice the shortest.
#[derive(Copy, Clone, Debug, Default)]
pub struct RedBlack;

/// The color of a Red-Black node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    /// Must not have a red child.
    Red,
    /// Counted by the black height.
    Black,
}

impl Balance for RedBlack {
    type Meta = Color;

    fn fresh() -> Self::Meta {
        Color::Red
    }

    fn after_insert<K>(tree: &mut Tree<K, Self>, node: NodeId) {
        fix_adjacent_red(tree, node);
    }

    fn after_remove<K>(tree: &mut Tree<K, Self>, excised: Excised<Self::Meta>) {
        // Taking a red node out changes no black heights.
        if excised.meta == Color::Red {
            return;
        }
        // A red replacement can absorb the missing black.
        if let Some(replacement) = excised.replacement {
            if color(tree, Some(replacement)) == Color::Red {
                set_color(tree, replacement, Color::Black);
                return;
            }
        }
        // Otherwise the vacated slot is short one black. If it is the root slot, every path lost
        // the same black and nothing needs doing.
        if let (Some(parent), Some(side)) = (excised.parent, excised.side) {
            fix_black_path(tree, parent, side);
        }
    }

    fn check<K>(tree: &Tree<K, Self>) -> Result<(), Violation> {
        let Some(root) = tree.root() else {
            return Ok(());
        };
        if *tree.meta(root) == Color::Red {
            return Err(Violation::RedRoot);
        }

        let depths = tree.depths();
        let mut black_heights = vec![0; tree.slot_count()];
        for id in tree.postorder_ids() {
            let depth = depths[id.index()];
            let (left, right) = (tree.left(id), tree.right(id));
            let own = *tree.meta(id);

            if own == Color::Red
                && (color(tree, left) == Color::Red || color(tree, right) == Color::Red)
            {
                return Err(Violation::AdjacentRed { depth });
            }

            let black_height = |child: Option<NodeId>| child.map_or(0, |c| black_heights[c.index()]);
            let (left, right) = (black_height(left), black_height(right));
            if left != right {
                return Err(Violation::BlackHeight { depth, left, right });
            }
            black_heights[id.index()] = left + usize::from(own == Color::Black);
        }
        Ok(())
    }

    fn label(meta: &Self::Meta) -> &'static str {
        match meta {
            Color::Red => "R",
            Color::Black => "B",
        }
    }
}

impl<K> Tree<K, RedBlack> {
    /// The number of black nodes on the path from the root down its left spine. In a valid tree
    /// every root-to-leaf path has this many.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.root();
        while let Some(id) = cursor {
            if *self.meta(id) == Color::Black {
                count += 1;
            }
            cursor = self.left(id);
        }
        count
    }

    /// Whether the tree satisfies every Red-Black and BST invariant. See [`Tree::validate`] for
    /// the reason when it doesn't.
    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        self.validate().is_ok()
    }
}

/// Missing nodes are black.
fn color<K>(tree: &Tree<K, RedBlack>, node: Option<NodeId>) -> Color {
    node.map_or(Color::Black, |id| *tree.meta(id))
}

fn set_color<K>(tree: &mut Tree<K, RedBlack>, node: NodeId, color: Color) {
    *tree.meta_mut(node) = color;
}

fn swap_colors<K>(tree: &mut Tree<K, RedBlack>, a: NodeId, b: NodeId) {
    let (color_a, color_b) = (*tree.meta(a), *tree.meta(b));
    set_color(tree, a, color_b);
    set_color(tree, b, color_a);
}

/// Repairs a red `node` that may have a red parent, moving up the tree as recoloring pushes the
/// problem towards the root.
fn fix_adjacent_red<K>(tree: &mut Tree<K, RedBlack>, mut node: NodeId) {
    loop {
        let Some(parent) = tree.parent(node) else {
            set_color(tree, node, Color::Black);
            return;
        };
        if color(tree, Some(parent)) == Color::Black {
            return;
        }

        let grandparent = tree
            .parent(parent)
            .expect("A red parent is never the root");
        let parent_side = tree.side_of(parent).expect("Parent has a parent");
        let uncle = tree.child(grandparent, parent_side.opposite());

        if color(tree, uncle) == Color::Red {
            trace!(?node, "red uncle, recoloring");
            set_color(tree, parent, Color::Black);
            if let Some(uncle) = uncle {
                set_color(tree, uncle, Color::Black);
            }
            set_color(tree, grandparent, Color::Red);
            node = grandparent;
            continue;
        }

        if tree.side_of(node) != Some(parent_side) {
            trace!(?node, "zig-zag, straightening");
            tree.rotate(parent, parent_side);
        }
        trace!(?node, "black uncle, rotating grandparent");
        let pivot = tree.rotate(grandparent, parent_side.opposite());
        swap_colors(tree, pivot, grandparent);
        return;
    }
}

/// Repairs a "double black" slot: the `side` child of `parent` (possibly empty) is one black short
/// of its sibling subtree.
fn fix_black_path<K>(tree: &mut Tree<K, RedBlack>, mut parent: NodeId, mut side: Side) {
    loop {
        let sibling = tree.child(parent, side.opposite());

        if let Some(red_sibling) = sibling.filter(|&s| color(tree, Some(s)) == Color::Red) {
            // Turn it into one of the black sibling cases below.
            trace!(?parent, "red sibling");
            swap_colors(tree, parent, red_sibling);
            tree.rotate(parent, side);
            continue;
        }

        let near = sibling.and_then(|s| tree.child(s, side));
        let far = sibling.and_then(|s| tree.child(s, side.opposite()));

        if color(tree, near) == Color::Black && color(tree, far) == Color::Black {
            trace!(?parent, "black sibling with black nephews");
            if let Some(sibling) = sibling {
                set_color(tree, sibling, Color::Red);
            }
            if color(tree, Some(parent)) == Color::Red {
                set_color(tree, parent, Color::Black);
                return;
            }
            // The parent's whole subtree is now one black short.
            match (tree.parent(parent), tree.side_of(parent)) {
                (Some(grandparent), Some(parent_side)) => {
                    parent = grandparent;
                    side = parent_side;
                    continue;
                }
                _ => return,
            }
        }

        let sibling = sibling.expect("A red nephew implies a sibling");
        if color(tree, far) == Color::Black {
            // Near nephew is red. Rotate it up so the far one is red instead.
            trace!(?parent, "red near nephew");
            let near = near.expect("Red near nephew => near nephew");
            swap_colors(tree, sibling, near);
            tree.rotate(sibling, side.opposite());
            continue;
        }

        trace!(?parent, "red far nephew");
        let far = far.expect("Red far nephew => far nephew");
        swap_colors(tree, parent, sibling);
        set_color(tree, far, Color::Black);
        tree.rotate(parent, side);
        return;
    }
}
