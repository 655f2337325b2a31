use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;

use alloc::vec::Vec;

use crate::Redwood;
use crate::node::{NodeIndex, RedwoodNode, Slot};

impl<K, V, C> Redwood<K, V, C> {
    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: self,
            curr: self.root,
            stack: Vec::new(),
            remaining: self.len(),
        }
    }

    /// Entries in ascending key order, with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.storage.as_mut_ptr(),
            curr: self.root,
            stack: Vec::new(),
            remaining: self.len(),
            phantom: PhantomData,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }
}

pub struct Iter<'a, K, V, C> {
    tree: &'a Redwood<K, V, C>,
    curr: Option<NodeIndex>,
    stack: Vec<NodeIndex>,
    remaining: usize,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(curr) = self.curr {
            self.stack.push(curr);
            self.curr = self.tree.node(curr).left;
        }

        let node = self.tree.node(self.stack.pop()?);
        self.curr = node.right;
        self.remaining -= 1;

        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

pub struct IterMut<'a, K, V> {
    slots: *mut Slot<K, V>,
    curr: Option<NodeIndex>,
    stack: Vec<NodeIndex>,
    remaining: usize,
    phantom: PhantomData<&'a mut Redwood<K, V>>,
}

impl<K, V> IterMut<'_, K, V> {
    /// # Safety
    ///
    /// `idx` must be a live node that has not been yielded yet. In-order
    /// traversal only reads links of nodes it has not handed out, so the
    /// returned reference never aliases a value already given to the caller.
    unsafe fn get_node_mut(&mut self, idx: NodeIndex) -> &mut RedwoodNode<K, V> {
        match unsafe { &mut *self.slots.add(idx.0) } {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {idx:?}"),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(curr) = self.curr {
            self.stack.push(curr);
            self.curr = unsafe { self.get_node_mut(curr) }.left;
        }

        let idx = self.stack.pop()?;
        let node: *mut RedwoodNode<K, V> = unsafe { self.get_node_mut(idx) };
        let node = unsafe { &mut *node };
        self.curr = node.right;
        self.remaining -= 1;

        Some((&node.key, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning in-order iterator. Nodes are moved out of the arena as they are
/// reached.
pub struct IntoIter<K, V> {
    storage: Vec<Slot<K, V>>,
    curr: Option<NodeIndex>,
    stack: Vec<NodeIndex>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    fn take_node(&mut self, idx: NodeIndex) -> RedwoodNode<K, V> {
        match mem::replace(&mut self.storage[idx.0], Slot::Vacant { next: None }) {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {idx:?}"),
        }
    }

    fn left_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        match &self.storage[idx.0] {
            Slot::Occupied(node) => node.left,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {idx:?}"),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(curr) = self.curr {
            self.stack.push(curr);
            self.curr = self.left_of(curr);
        }

        let idx = self.stack.pop()?;
        let node = self.take_node(idx);
        self.curr = node.right;
        self.remaining -= 1;

        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C> IntoIterator for Redwood<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.len();
        IntoIter {
            curr: self.root,
            storage: self.storage,
            stack: Vec::new(),
            remaining,
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a Redwood<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut Redwood<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::{FnComparator, Redwood};
    use alloc::string::String;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    pub fn empty_iteration() {
        let mut tree = Redwood::<u32, u32>::new();

        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter_mut().next(), None);
        assert_eq!(tree.into_iter().next(), None);
    }

    #[test]
    pub fn inorder_iteration() {
        let tree: Redwood<usize, usize> = (0..1000).rev().map(|k| (k, k * 2)).collect();

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 1000);
        for (i, (&key, &value)) in iter.by_ref().enumerate() {
            assert_eq!(key, i);
            assert_eq!(value, i * 2);
        }
        assert_eq!(iter.len(), 0);
    }

    #[test]
    pub fn keys_and_values() {
        let tree: Redwood<&str, u8> = [("b", 2), ("c", 3), ("a", 1)].into_iter().collect();

        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(tree.values().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    pub fn iter_mut_updates_values() {
        let mut tree: Redwood<u32, String> = (0..20).map(|k| (k, String::new())).collect();

        for (key, value) in &mut tree {
            value.push_str(&key.to_string());
        }

        assert_eq!(tree.get(&13), Ok(Some(&String::from("13"))));
        assert_eq!(tree.values().map(String::len).sum::<usize>(), 10 + 2 * 10);
    }

    #[test]
    pub fn iteration_after_removals() {
        let mut tree: Redwood<u32, ()> = (0..100).map(|k| (k, ())).collect();
        for key in (0..100).filter(|k| k % 3 != 0) {
            tree.remove(&key).unwrap();
        }
        tree.insert(1000, ()).unwrap();

        let keys: Vec<u32> = tree.into_iter().map(|(k, ())| k).collect();
        let expected: Vec<u32> = (0..100).filter(|k| k % 3 == 0).chain([1000]).collect();
        assert_eq!(keys, expected);
    }

    fn summarize<K: Copy, V, C>(tree: &Redwood<K, V, C>) -> (usize, usize, Option<K>, Vec<K>) {
        let keys = tree.iter().map(|(&k, _)| k).collect();
        (tree.len(), tree.height(), tree.first().map(|(&k, _)| k), keys)
    }

    #[test]
    pub fn traversal_without_comparator_bound() {
        let reversed = FnComparator(|a: &u8, b: &u8| Ok::<_, ()>(b.cmp(a)));
        let mut tree = Redwood::with_comparator(reversed);
        for key in [4, 9, 1, 7] {
            tree.insert(key, ()).unwrap();
        }

        let (len, height, first, keys) = summarize(&tree);
        assert_eq!(len, 4);
        assert!(height >= 3);
        assert_eq!(first, Some(9));
        assert_eq!(keys, [9, 7, 4, 1]);
        assert_eq!(tree.into_iter().len(), 4);
    }

    #[quickcheck]
    fn traversal_is_sorted_and_deduplicated(xs: Vec<i32>) -> bool {
        let tree: Redwood<i32, ()> = xs.iter().map(|&k| (k, ())).collect();
        let mut expected = xs;
        expected.sort_unstable();
        expected.dedup();

        tree.len() == expected.len() && tree.keys().copied().eq(expected)
    }
}
