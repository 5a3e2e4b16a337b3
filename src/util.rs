/// Which child slot of a parent a node occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The left child.
    Left,
    /// The right child.
    Right,
}

impl Side {
    /// The other child slot.
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// What is left behind when a node with at most one child is unlinked from the tree. The
/// balancing policies use this to decide where (and whether) repairs have to start.
#[derive(Debug)]
pub struct Excised<M> {
    /// The removed node's former parent. `None` if the root was removed.
    pub(crate) parent: Option<crate::tree::NodeId>,
    /// The slot of `parent` the removed node occupied.
    pub(crate) side: Option<Side>,
    /// The child that was spliced into the vacated slot, if any.
    pub(crate) replacement: Option<crate::tree::NodeId>,
    /// The removed node's augmentation.
    pub(crate) meta: M,
}
