use core::convert::Infallible;
use core::fmt;

use crate::error::TreeError;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values};
use crate::{Natural, Redwood};

#[inline]
fn infallible<T>(result: Result<T, TreeError<Infallible>>) -> T {
    match result {
        Ok(value) => value,
        Err(TreeError::Compare(never)) => match never {},
    }
}

/// An associative array, storing key-value pairs.
///
/// Thin wrapper over a [`Redwood`] tree using the natural order of `K`. Since
/// that order cannot fail, lookups return plain `Option`s.
pub struct RedwoodMap<K: Ord, V> {
    tree: Redwood<K, V, Natural>,
}

impl<K: Ord, V> RedwoodMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Redwood::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: Redwood::with_capacity(capacity),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        infallible(self.tree.contains_key(key))
    }

    /// Returns the previous value if `key` was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        infallible(self.tree.insert(key, value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        infallible(self.tree.get(key))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        infallible(self.tree.get_mut(key))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        infallible(self.tree.remove(key))
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        infallible(self.tree.remove_entry(key))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V, Natural> {
        self.tree.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V, Natural> {
        self.tree.keys()
    }

    pub fn values(&self) -> Values<'_, K, V, Natural> {
        self.tree.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// The underlying tree.
    pub fn as_tree(&self) -> &Redwood<K, V, Natural> {
        &self.tree
    }
}

impl<K: Ord, V> Default for RedwoodMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for RedwoodMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K: Ord, V> From<Redwood<K, V, Natural>> for RedwoodMap<K, V> {
    fn from(tree: Redwood<K, V, Natural>) -> Self {
        Self { tree }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedwoodMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: Redwood::from_iter(iter),
        }
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedwoodMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K: Ord, V> IntoIterator for RedwoodMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a RedwoodMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Natural>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::RedwoodMap;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn map_entry_multi_insertion() {
        let mut map = RedwoodMap::<usize, usize>::new();

        map.insert(3, 17);
        map.insert(2, 12);
        map.insert(1, 7);

        assert!(map.contains_key(&2));
        assert!(map.contains_key(&1));
        assert!(map.contains_key(&3));

        assert_eq!(map.insert(3, 19), Some(17));
        assert_eq!(map.get(&3), Some(&19));
        assert_eq!(map.len(), 3);
    }

    #[test]
    pub fn map_update_entry() {
        let mut map = RedwoodMap::<usize, usize>::new();

        map.insert(3, 17);
        *map.get_mut(&3).unwrap() = 5;

        assert_eq!(map.get(&3), Some(&5));
    }

    #[test]
    pub fn map_removal() {
        let mut map: RedwoodMap<u32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();

        assert_eq!(map.remove(&2), Some('b'));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove_entry(&3), Some((3, 'c')));
        assert_eq!(map.len(), 1);
        assert_eq!(map.as_tree().check_consistent(), Ok(()));
    }

    #[test]
    pub fn map_large_sequential() {
        let mut map = RedwoodMap::with_capacity(10_000);
        map.extend((0..10_000u32).map(|k| (k, k)));

        assert_eq!(map.len(), 10_000);
        assert!(map.height() <= 27);
        assert_eq!(map.first(), Some((&0, &0)));
        assert_eq!(map.last(), Some((&9_999, &9_999)));
        assert_eq!(map.iter().count(), 10_000);
    }

    #[test]
    pub fn map_into_iter_sorted() {
        let map: RedwoodMap<i8, ()> = [5, -1, 3].into_iter().map(|k| (k, ())).collect();

        assert_eq!(
            map.into_iter().map(|(k, ())| k).collect::<Vec<_>>(),
            [-1, 3, 5]
        );
    }
}
