use core::cmp::Ordering;
use core::fmt;
use core::mem;

use alloc::vec::Vec;

use crate::compare::{Comparator, Natural};
use crate::error::TreeError;
use crate::node::{Color, NodeIndex, RedwoodNode, Side, Slot};

/// An ordered map backed by a red-black tree.
///
/// Nodes are stored in a vector and link to each other through indices, so
/// parent back-links never own anything. Keys are ordered by `C`, which may
/// fail to compare two keys: every operation that compares keys returns a
/// [`Result`] carrying that failure instead of pretending the key is absent.
pub struct Redwood<K, V, C = Natural> {
    pub(crate) storage: Vec<Slot<K, V>>,
    pub(crate) root: Option<NodeIndex>,
    free: Option<NodeIndex>,
    len: usize,
    comparator: C,
}

/// Where a descent for some key ended.
enum Search {
    Found(NodeIndex),
    /// Key is absent; a new node would hang off `parent` on `side`.
    Vacant {
        parent: Option<NodeIndex>,
        side: Side,
    },
}

impl<K: Ord, V> Redwood<K, V, Natural> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K: Ord, V> Default for Redwood<K, V, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparator<K>> Redwood<K, V, C> {
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            root: None,
            free: None,
            len: 0,
            comparator,
        }
    }

    pub fn get(&self, key: &K) -> Result<Option<&V>, TreeError<C::Error>> {
        Ok(self.find(key)?.map(|idx| &self.node(idx).value))
    }

    pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>, TreeError<C::Error>> {
        Ok(self.find(key)?.map(|idx| {
            let node = self.node(idx);
            (&node.key, &node.value)
        }))
    }

    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>, TreeError<C::Error>> {
        match self.find(key)? {
            Some(idx) => Ok(Some(&mut self.node_mut(idx).value)),
            None => Ok(None),
        }
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, TreeError<C::Error>> {
        Ok(self.find(key)?.is_some())
    }

    /// Inserts `value` under `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// previous value is returned; the tree shape and its length are left as
    /// they were.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TreeError<C::Error>> {
        let (parent, side) = match self.search(&key)? {
            Search::Found(idx) => {
                let old = mem::replace(&mut self.node_mut(idx).value, value);
                return Ok(Some(old));
            }
            Search::Vacant { parent, side } => (parent, side),
        };

        let new_node = self.allocate(RedwoodNode::new_isolated(key, value));
        self.node_mut(new_node).parent = parent;
        match parent {
            Some(parent) => self.node_mut(parent).set_child(side, Some(new_node)),
            None => self.root = Some(new_node),
        }

        self.fix_red_violation(new_node);
        self.len += 1;

        Ok(None)
    }

    pub fn remove(&mut self, key: &K) -> Result<Option<V>, TreeError<C::Error>> {
        Ok(self.remove_entry(key)?.map(|(_, value)| value))
    }

    /// Removes `key` and returns the stored key and value.
    ///
    /// Removing an absent key is not an error and leaves the tree untouched.
    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>, TreeError<C::Error>> {
        let Some(mut target) = self.find(key)? else {
            return Ok(None);
        };

        // A node with two children trades its entry with its in-order
        // successor, which has no left child, and the successor is unlinked
        // instead.
        let node = self.node(target);
        if let (Some(_), Some(right)) = (node.left, node.right) {
            let successor = self.extreme(right, Side::Left);
            self.swap_entries(target, successor);
            target = successor;
        }

        let node = self.node(target);
        let child = node.left.or(node.right);
        let parent = node.parent;
        let removed_black = node.color == Color::Black;

        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, target, child);

        let removed = self.release(target);
        self.len -= 1;
        log::trace!("spliced out node {target:?}");

        if removed_black {
            self.fix_double_black(child, parent);
        }

        Ok(Some((removed.key, removed.value)))
    }

    fn find(&self, key: &K) -> Result<Option<NodeIndex>, TreeError<C::Error>> {
        match self.search(key)? {
            Search::Found(idx) => Ok(Some(idx)),
            Search::Vacant { .. } => Ok(None),
        }
    }

    fn search(&self, key: &K) -> Result<Search, TreeError<C::Error>> {
        let mut current_node = self.root;
        let mut parent_node = None;
        let mut side = Side::Left;

        while let Some(idx) = current_node {
            let curr_node_storage = self.node(idx);

            let ordering = self
                .comparator
                .compare(key, &curr_node_storage.key)
                .map_err(|err| {
                    log::debug!("key comparison failed against node {idx:?}");
                    TreeError::Compare(err)
                })?;

            parent_node = current_node;
            match ordering {
                Ordering::Less => side = Side::Left,
                Ordering::Greater => side = Side::Right,
                Ordering::Equal => return Ok(Search::Found(idx)),
            }
            current_node = curr_node_storage.child(side);
        }

        Ok(Search::Vacant {
            parent: parent_node,
            side,
        })
    }

    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        while let Some(parent_idx) = self.node(curr_node).parent {
            if !self.node(parent_idx).is_red() {
                break;
            }

            let Some(grandparent_idx) = self.node(parent_idx).parent else {
                break;
            };
            let parent_side = self.side_of(grandparent_idx, parent_idx);
            let uncle = self.node(grandparent_idx).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.node(u).is_red()) {
                self.set_color(parent_idx, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent_idx, Color::Red);

                curr_node = grandparent_idx;
                continue;
            }

            let mut parent_idx = parent_idx;
            if self.node(parent_idx).child(parent_side.opposite()) == Some(curr_node) {
                self.rotate(parent_idx, parent_side);
                mem::swap(&mut curr_node, &mut parent_idx);
            }

            self.set_color(parent_idx, Color::Black);
            self.set_color(grandparent_idx, Color::Red);
            self.rotate(grandparent_idx, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Restores black heights after a black node was unlinked below `parent`.
    ///
    /// `node` is whatever took the unlinked node's place, possibly nothing.
    fn fix_double_black(&mut self, mut node: Option<NodeIndex>, mut parent: Option<NodeIndex>) {
        while node != self.root && self.color_of(node) == Color::Black {
            let Some(parent_idx) = parent else {
                break;
            };

            // When `node` is absent its sibling cannot be: the sibling subtree
            // holds at least one black node on every path.
            let side = if self.node(parent_idx).left == node {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();

            let mut sibling = self.sibling(parent_idx, side);
            if self.node(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(parent_idx, Color::Red);
                self.rotate(parent_idx, side);
                sibling = self.sibling(parent_idx, side);
            }

            let near_child = self.node(sibling).child(side);
            let far_child = self.node(sibling).child(far);

            if self.color_of(near_child) == Color::Black && self.color_of(far_child) == Color::Black
            {
                self.set_color(sibling, Color::Red);
                node = Some(parent_idx);
                parent = self.node(parent_idx).parent;
                continue;
            }

            if self.color_of(far_child) == Color::Black {
                if let Some(near_child) = near_child {
                    self.set_color(near_child, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.sibling(parent_idx, side);
            }

            let parent_color = self.node(parent_idx).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent_idx, Color::Black);
            if let Some(far_child) = self.node(sibling).child(far) {
                self.set_color(far_child, Color::Black);
            }
            self.rotate(parent_idx, side);

            node = self.root;
            parent = None;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    /// Rotates so that the child opposite to `side` takes the place of
    /// `center`, and `center` becomes its child on `side`. Does nothing if
    /// that child is absent.
    fn rotate(&mut self, center: NodeIndex, side: Side) {
        let grandparent_idx = self.node(center).parent;
        let Some(pivot_idx) = self.node(center).child(side.opposite()) else {
            return;
        };

        let inner_idx = self.node(pivot_idx).child(side);

        self.node_mut(center).set_child(side.opposite(), inner_idx);
        if let Some(inner_idx) = inner_idx {
            self.node_mut(inner_idx).parent = Some(center);
        }

        self.node_mut(pivot_idx).set_child(side, Some(center));
        self.node_mut(center).parent = Some(pivot_idx);
        self.node_mut(pivot_idx).parent = grandparent_idx;

        self.replace_child(grandparent_idx, center, Some(pivot_idx));
        log::trace!("rotated {side:?} at {center:?}, {pivot_idx:?} moved up");
    }

    /// Points the link of `parent` that referenced `old` at `new` instead, or
    /// the root if `parent` is absent.
    fn replace_child(
        &mut self,
        parent: Option<NodeIndex>,
        old: NodeIndex,
        new: Option<NodeIndex>,
    ) {
        match parent {
            Some(parent_idx) => {
                let side = self.side_of(parent_idx, old);
                self.node_mut(parent_idx).set_child(side, new);
            }
            None => self.root = new,
        }
    }

    fn side_of(&self, parent: NodeIndex, child: NodeIndex) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn sibling(&self, parent: NodeIndex, side: Side) -> NodeIndex {
        self.node(parent)
            .child(side.opposite())
            .expect("double-black node must have a sibling")
    }

    /// Absent links count as black.
    fn color_of(&self, node: Option<NodeIndex>) -> Color {
        node.map_or(Color::Black, |idx| self.node(idx).color)
    }

    fn set_color(&mut self, node: NodeIndex, color: Color) {
        self.node_mut(node).color = color;
    }

    fn swap_entries(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b {
            return;
        }
        let (low, high) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.storage.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Slot::Occupied(x), Slot::Occupied(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => unreachable!("swapping entries of a vacant slot"),
        }
    }

    fn allocate(&mut self, node: RedwoodNode<K, V>) -> NodeIndex {
        match self.free {
            Some(idx) => {
                let slot = mem::replace(&mut self.storage[idx.0], Slot::Occupied(node));
                self.free = match slot {
                    Slot::Vacant { next } => next,
                    Slot::Occupied(_) => unreachable!("free list points at a live node"),
                };
                log::trace!("reused slot {idx:?}");
                idx
            }
            None => {
                let idx = NodeIndex(self.storage.len());
                self.storage.push(Slot::Occupied(node));
                log::trace!("allocated slot {idx:?}");
                idx
            }
        }
    }

    fn release(&mut self, idx: NodeIndex) -> RedwoodNode<K, V> {
        let slot = mem::replace(&mut self.storage[idx.0], Slot::Vacant { next: self.free });
        self.free = Some(idx);
        match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("released a vacant slot {idx:?}"),
        }
    }
}

impl<K, V, C> Redwood<K, V, C> {
    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.root = None;
        self.free = None;
        self.len = 0;
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }

        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(idx);
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }

        height
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.root.map(|root| {
            let node = self.node(self.extreme(root, Side::Left));
            (&node.key, &node.value)
        })
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.root.map(|root| {
            let node = self.node(self.extreme(root, Side::Right));
            (&node.key, &node.value)
        })
    }

    /// Walks from `from` down links on `side` as far as they go.
    fn extreme(&self, from: NodeIndex, side: Side) -> NodeIndex {
        let mut current = from;
        while let Some(next) = self.node(current).child(side) {
            current = next;
        }
        current
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &RedwoodNode<K, V> {
        match &self.storage[idx.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {idx:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut RedwoodNode<K, V> {
        match &mut self.storage[idx.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {idx:?}"),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Redwood<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Redwood<K, V, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for Redwood<K, V, Natural> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            match self.insert(key, value) {
                Ok(_) => {}
                Err(TreeError::Compare(never)) => match never {},
            }
        }
    }
}
