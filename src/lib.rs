//! This crate exposes a family of Binary Search Trees (BSTs) that share one engine and differ
//! only in how they keep themselves balanced, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The trees here store a multiset: inserting a key that is already present bumps a count on
//! its node instead of adding a second node.
//!
//! ## Balancing
//!
//! Searching takes `O(height)` (where `height` is the longest path from the root `Node` to a
//! leaf `Node`). Inserting keys in sorted order into a plain BST makes that path as long as the
//! tree is big. A [`Tree`] is therefore generic over a [`Balance`] policy:
//!
//! - [`Unbalanced`] ([`BinarySearchTree`]) never restructures anything.
//! - [`Avl`] ([`AvlTree`]) keeps sibling subtree heights within one of each other.
//! - [`RedBlack`] ([`RedBlackTree`]) colors nodes and keeps every root-to-leaf path within a
//!   factor of two of every other.
//!
//! Both balanced variants keep the height `O(lg N)`.
//!
//! ```
//! use bstrees::{AvlTree, BinarySearchTree, RedBlackTree};
//!
//! let plain: BinarySearchTree<_> = (0..100).collect();
//! let avl: AvlTree<_> = (0..100).collect();
//! let red_black: RedBlackTree<_> = (0..100).collect();
//!
//! assert_eq!(plain.height(), Some(99));
//! assert_eq!(avl.height(), Some(6));
//! assert!(red_black.height().unwrap() <= 12);
//!
//! assert_eq!(plain.inorder(), avl.inorder());
//! assert_eq!(avl.inorder(), red_black.inorder());
//! ```

#![deny(missing_docs)]

mod avl;
mod balance;
mod error;
mod red_black;
mod tree;
mod util;

pub use avl::Avl;
pub use balance::{Balance, Unbalanced};
pub use error::Violation;
pub use red_black::RedBlack;
pub use tree::Tree;

/// A plain binary search tree.
pub type BinarySearchTree<K> = Tree<K, Unbalanced>;

/// A height-balanced binary search tree.
pub type AvlTree<K> = Tree<K, Avl>;

/// A color-balanced binary search tree.
pub type RedBlackTree<K> = Tree<K, RedBlack>;
