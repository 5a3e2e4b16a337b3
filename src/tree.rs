//! The shared binary search tree engine.
//!
//! Nodes live in an arena owned by the [`Tree`] and refer to each other by [`NodeId`]. Child links
//! are the ownership relation: a node is reachable from exactly one parent slot (or the root
//! slot). Every node also records its parent so balancing code can walk upwards without keeping
//! the search path around. Vacated slots are recycled through a free list.
//!
//! # Examples
//!
//! ```
//! use bstrees::BinarySearchTree;
//!
//! let mut tree = BinarySearchTree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! tree.insert(1);
//! tree.insert(1);
//! assert_eq!(tree.count(&1), 2);
//! assert_eq!(tree.size(), 2);
//!
//! // Removing takes away one instance at a time.
//! assert!(tree.remove(&1));
//! assert_eq!(tree.count(&1), 1);
//! assert!(tree.remove(&1));
//! assert!(!tree.contains(&1));
//! assert!(!tree.remove(&1));
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;

use tracing::trace;

use crate::balance::{Balance, Unbalanced};
use crate::error::Violation;
use crate::util::{Excised, Side};

/// A handle to a node slot inside a [`Tree`]'s arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, M> {
    key: K,
    /// How many times `key` is stored. Never zero while the node is linked.
    count: usize,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    meta: M,
}

/// A binary search tree storing a multiset of keys. Duplicate keys share a node and bump its
/// count. How (and whether) the tree is kept balanced is decided by the policy `B`.
pub struct Tree<K, B: Balance = Unbalanced> {
    nodes: Vec<Option<Node<K, B::Meta>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    /// Stored instances, duplicates included.
    size: usize,
    policy: PhantomData<B>,
}

impl<K, B: Balance> Default for Tree<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, B> Clone for Tree<K, B>
where
    K: Clone,
    B: Balance,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            free: self.free.clone(),
            root: self.root,
            size: self.size,
            policy: PhantomData,
        }
    }
}

impl<K, B> fmt::Debug for Tree<K, B>
where
    K: fmt::Debug,
    B: Balance,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("size", &self.size)
            .field("keys", &self.inorder())
            .finish()
    }
}

/// Renders the tree sideways, one node per line. Right children come before left children and
/// each level is indented by two spaces. A node with a single child shows `X` for the missing
/// one, while a leaf gets no `X` lines at all. An empty tree renders as a lone `X`. This is a
/// debugging aid and the exact format may change.
impl<K, B> fmt::Display for Tree<K, B>
where
    K: fmt::Display,
    B: Balance,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((slot, depth)) = stack.pop() {
            if depth >= 1 {
                write!(f, "{}|-", "  ".repeat(depth - 1))?;
            }
            let Some(id) = slot else {
                writeln!(f, "X")?;
                continue;
            };
            let node = self.node(id);
            writeln!(f, "{}{}", node.key, B::label(&node.meta))?;
            if node.left.is_some() || node.right.is_some() {
                stack.push((node.left, depth + 1));
                stack.push((node.right, depth + 1));
            }
        }
        Ok(())
    }
}

impl<K: Ord, B: Balance> FromIterator<K> for Tree<K, B> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, B: Balance> Extend<K> for Tree<K, B> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, B: Balance> Tree<K, B> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
            policy: PhantomData,
        }
    }

    /// Inserts one instance of `key`. If the key is already present its count goes up and the
    /// shape of the tree does not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstrees::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(3);
    /// tree.insert(3);
    ///
    /// assert_eq!(tree.count(&3), 2);
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let ordering = key.cmp(&self.node(id).key);
            match ordering {
                Ordering::Less => {
                    side = Side::Left;
                    cursor = self.node(id).left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    cursor = self.node(id).right;
                }
                Ordering::Equal => {
                    let node = self.node_mut(id);
                    node.count += 1;
                    let count = node.count;
                    self.size += 1;
                    trace!(?id, count, "bumped count of existing key");
                    return;
                }
            }
            parent = Some(id);
        }

        let id = self.alloc(Node {
            key,
            count: 1,
            left: None,
            right: None,
            parent: None,
            meta: B::fresh(),
        });
        match parent {
            Some(parent) => self.attach(parent, side, Some(id)),
            None => self.root = Some(id),
        }
        self.size += 1;
        trace!(?id, ?parent, ?side, "linked new node");

        if cfg!(debug_assertions) {
            if let Some(parent) = parent {
                let ordering = self.node(id).key.cmp(&self.node(parent).key);
                match side {
                    Side::Left => assert_eq!(ordering, Ordering::Less),
                    Side::Right => assert_eq!(ordering, Ordering::Greater),
                }
            }
        }

        B::after_insert(self, id);
    }

    /// Removes one instance of `key`. Returns `false` (and leaves the tree alone) if the key isn't
    /// stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstrees::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.inorder(), vec![&1, &3]);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(mut target) = self.find(key) else {
            return false;
        };

        let node = self.node_mut(target);
        if node.count > 1 {
            node.count -= 1;
            self.size -= 1;
            trace!(id = ?target, "dropped one duplicate");
            return true;
        }

        // With two children, the in-order successor's payload moves up and the successor (which
        // has no left child) is unlinked instead.
        if let (Some(_), Some(right)) = (self.left(target), self.right(target)) {
            let successor = self.leftmost(right);
            self.swap_payload(target, successor);
            target = successor;
        }

        let excised = self.excise(target);
        self.size -= 1;
        trace!(id = ?target, parent = ?excised.parent, "unlinked node");
        B::after_remove(self, excised);
        true
    }

    /// Whether at least one instance of `key` is stored.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find(key).is_some()
    }

    /// How many instances of `key` are stored. Zero if it isn't in the tree.
    pub fn count(&self, key: &K) -> usize
    where
        K: Ord,
    {
        self.find(key).map_or(0, |id| self.node(id).count)
    }

    /// The smallest key, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&K> {
        self.root.map(|root| &self.node(self.leftmost(root)).key)
    }

    /// The largest key, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&K> {
        self.root.map(|root| &self.node(self.rightmost(root)).key)
    }

    /// The greatest stored key strictly less than `key`. `key` itself doesn't need to be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstrees::BinarySearchTree;
    ///
    /// let tree: BinarySearchTree<_> = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.predecessor(&20), Some(&10));
    /// assert_eq!(tree.predecessor(&25), Some(&20));
    /// assert_eq!(tree.predecessor(&10), None);
    /// ```
    pub fn predecessor(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            if *key > node.key {
                best = Some(&node.key);
                cursor = node.right;
            } else {
                cursor = node.left;
            }
        }
        best
    }

    /// The smallest stored key strictly greater than `key`. `key` itself doesn't need to be
    /// stored.
    pub fn successor(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            if *key < node.key {
                best = Some(&node.key);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }
        best
    }

    /// The number of stored instances, duplicates included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tree stores nothing.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }

    /// The number of edges on the longest path from the root to a leaf. `None` for an empty
    /// tree, `Some(0)` for a lone root.
    ///
    /// An AVL tree reads this off its root in `O(1)`. The other policies walk every level, which
    /// is `O(N)`.
    pub fn height(&self) -> Option<usize> {
        let root = self.root?;
        if let Some(height) = B::cached_height(self, root) {
            return Some(height);
        }

        let mut level = vec![root];

        let mut height = 0;
        loop {
            let next: Vec<NodeId> = level
                .iter()
                .flat_map(|&id| {
                    let node = self.node(id);
                    node.left.into_iter().chain(node.right)
                })
                .collect();
            if next.is_empty() {
                return Some(height);
            }
            height += 1;
            level = next;
        }
    }

    /// Keys in node, left, right order.
    pub fn preorder(&self) -> Vec<&K> {
        self.keys(self.preorder_ids())
    }

    /// Keys in ascending order. Each key appears once regardless of its count.
    pub fn inorder(&self) -> Vec<&K> {
        self.keys(self.inorder_ids())
    }

    /// Keys in left, right, node order.
    pub fn postorder(&self) -> Vec<&K> {
        self.keys(self.postorder_ids())
    }

    /// Keys one depth at a time, left to right within a depth.
    pub fn level_order(&self) -> Vec<&K> {
        let mut ids = Vec::with_capacity(self.live_nodes());
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            ids.push(id);
            let node = self.node(id);
            queue.extend(node.left);
            queue.extend(node.right);
        }
        self.keys(ids)
    }

    /// Walks the whole tree and reports the first broken invariant: BST ordering, parent links,
    /// counts and size, then whatever the balancing policy promises on top of that.
    ///
    /// Meant for tests and debugging. The mutating methods never leave a tree that fails this.
    pub fn validate(&self) -> Result<(), Violation>
    where
        K: Ord,
    {
        let depths = self.depths();
        if let Some(root) = self.root {
            if self.node(root).parent.is_some() {
                return Err(Violation::BrokenParentLink { depth: 0 });
            }
        }

        let mut counted = 0;
        let mut previous: Option<&K> = None;
        for id in self.inorder_ids() {
            let node = self.node(id);
            let depth = depths[id.index()];
            if node.count == 0 {
                return Err(Violation::ZeroCount { depth });
            }
            counted += node.count;

            if previous.map_or(false, |previous| *previous >= node.key) {
                return Err(Violation::Unordered { depth });
            }
            previous = Some(&node.key);

            for child in node.left.into_iter().chain(node.right) {
                if self.node(child).parent != Some(id) {
                    return Err(Violation::BrokenParentLink { depth: depth + 1 });
                }
            }
        }

        if counted != self.size {
            return Err(Violation::SizeMismatch {
                recorded: self.size,
                counted,
            });
        }

        B::check(self)
    }

    fn keys(&self, ids: Vec<NodeId>) -> Vec<&K> {
        ids.into_iter().map(|id| &self.node(id).key).collect()
    }

    fn find(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, node: Node<K, B::Meta>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn dealloc(&mut self, id: NodeId) -> Node<K, B::Meta> {
        let node = self.nodes[id.index()]
            .take()
            .expect("Freeing a node implies it was live");
        self.free.push(id);
        node
    }

    /// Exchanges the key and count of two nodes, leaving links and balancing data in place.
    fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        let mut other = self.nodes[b.index()]
            .take()
            .expect("Swapping payloads implies both nodes are live");
        let node = self.node_mut(a);
        mem::swap(&mut node.key, &mut other.key);
        mem::swap(&mut node.count, &mut other.count);
        self.nodes[b.index()] = Some(other);
    }

    /// Unlinks a node that has at most one child, splicing that child into its place, and frees
    /// the node.
    fn excise(&mut self, id: NodeId) -> Excised<B::Meta> {
        let node = self.node(id);
        assert!(
            node.left.is_none() || node.right.is_none(),
            "Only nodes with at most one child can be excised"
        );
        let replacement = node.left.or(node.right);
        let parent = node.parent;
        let side = self.side_of(id);

        self.replace_child(parent, id, replacement);
        let node = self.dealloc(id);
        Excised {
            parent,
            side,
            replacement,
            meta: node.meta,
        }
    }

    fn node(&self, id: NodeId) -> &Node<K, B::Meta> {
        self.nodes[id.index()]
            .as_ref()
            .expect("Node ids in the tree always point at live nodes")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, B::Meta> {
        self.nodes[id.index()]
            .as_mut()
            .expect("Node ids in the tree always point at live nodes")
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn meta(&self, id: NodeId) -> &B::Meta {
        &self.node(id).meta
    }

    pub(crate) fn meta_mut(&mut self, id: NodeId) -> &mut B::Meta {
        &mut self.node_mut(id).meta
    }

    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    /// Which slot of its parent `id` sits in. `None` for the root.
    pub(crate) fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Puts `child` in the given slot of `parent` and points `child` back at `parent`.
    fn attach(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.node_mut(parent);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    /// Makes `new` take over the slot `old` occupies under `parent` (or the root slot).
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(parent) => {
                let side = if self.left(parent) == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.attach(parent, side, new);
            }
            None => {
                self.root = new;
                if let Some(new) = new {
                    self.node_mut(new).parent = None;
                }
            }
        }
    }

    /// Rotates the subtree rooted at `pivot` so that `pivot` moves down towards `toward` and its
    /// child on the other side takes its place. Returns the new subtree root.
    ///
    /// # Panics
    ///
    /// When `pivot` has no child opposite `toward`.
    ///
    /// # Diagram
    ///
    /// Rotating towards [`Side::Right`]:
    ///
    /// ```text
    ///      parent                parent
    ///        |                     |
    ///      pivot                 raised
    ///      /    \                /    \
    ///   raised   z    ->        x    pivot
    ///   /    \                       /   \
    ///  x   inner                  inner   z
    /// ```
    pub(crate) fn rotate(&mut self, pivot: NodeId, toward: Side) -> NodeId {
        let raised = self
            .child(pivot, toward.opposite())
            .expect("Rotating a node requires a child to raise");
        let parent = self.parent(pivot);
        let inner = self.child(raised, toward);

        self.attach(pivot, toward.opposite(), inner);
        self.replace_child(parent, pivot, Some(raised));
        self.attach(raised, toward, Some(pivot));

        trace!(?pivot, ?raised, ?toward, "rotated");
        raised
    }

    pub(crate) fn preorder_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.live_nodes());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            ids.push(id);
            let node = self.node(id);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        ids
    }

    pub(crate) fn inorder_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.live_nodes());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.left(id);
            }
            match stack.pop() {
                Some(id) => {
                    ids.push(id);
                    cursor = self.right(id);
                }
                None => return ids,
            }
        }
    }

    /// Children before parents, so per-subtree facts can be computed bottom-up in one pass.
    pub(crate) fn postorder_ids(&self) -> Vec<NodeId> {
        // Node, right, left reversed is left, right, node.
        let mut ids = Vec::with_capacity(self.live_nodes());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            ids.push(id);
            let node = self.node(id);
            stack.extend(node.left);
            stack.extend(node.right);
        }
        ids.reverse();
        ids
    }

    /// Depth of every live node, indexed by [`NodeId::index`].
    pub(crate) fn depths(&self) -> Vec<usize> {
        let mut depths = vec![0; self.nodes.len()];
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            depths[id.index()] = depth;
            let node = self.node(id);
            for child in node.left.into_iter().chain(node.right) {
                stack.push((child, depth + 1));
            }
        }
        depths
    }
}
