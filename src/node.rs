use core::fmt;

/// Color tag of a tree node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Color {
    #[default]
    Red,
    Black,
}

/// Stable handle to a node slot inside the tree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child link of a node we are talking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RedwoodNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) left: Option<NodeIndex>,
    pub(crate) right: Option<NodeIndex>,
}

impl<K, V> RedwoodNode<K, V> {
    /// A fresh red leaf, not linked to anything yet.
    pub(crate) fn new_isolated(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::default(),
            parent: None,
            left: None,
            right: None,
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeIndex> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeIndex>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// One cell of the arena.
///
/// Vacant cells are chained into a free list through `next`, so that a slot
/// released by a removal is handed out again by the next insertion.
#[derive(Debug)]
pub(crate) enum Slot<K, V> {
    Occupied(RedwoodNode<K, V>),
    Vacant { next: Option<NodeIndex> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn isolated_node_is_red_leaf() {
        let node = RedwoodNode::new_isolated(1, "one");

        assert!(node.is_red());
        assert_eq!(node.parent, None);
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), None);
    }

    #[test]
    pub fn set_child_targets_requested_side() {
        let mut node = RedwoodNode::new_isolated(1, ());

        node.set_child(Side::Right, Some(NodeIndex(4)));
        assert_eq!(node.right, Some(NodeIndex(4)));
        assert_eq!(node.left, None);

        node.set_child(Side::Right.opposite(), Some(NodeIndex(2)));
        assert_eq!(node.left, Some(NodeIndex(2)));
    }
}
