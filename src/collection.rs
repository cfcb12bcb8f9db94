//! Keyed set of entities.

use std::borrow::Borrow;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::traits::Keyed;

/// A set of entities deduplicated by their natural key.
///
/// Inserting an entity whose key is already present replaces the old one.
/// Iteration is in key order, so builds and deploys come out oldest first.
pub struct Collection<T: Keyed> {
    items: BTreeMap<T::Key, T>,
}

impl<T: Keyed> Collection<T> {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entity by key.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.get(key)
    }

    /// Look up an entity by key, mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.get_mut(key)
    }

    /// Returns true if an entity with this key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.contains_key(key)
    }

    /// Returns true if an entity with the same key as `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains_key(&item.key())
    }

    /// Insert an entity, returning the one it replaced.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.key(), item)
    }

    /// Remove the entity with this key.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.remove(key)
    }

    /// The entity with the greatest key.
    pub fn last(&self) -> Option<&T> {
        self.items.values().next_back()
    }

    /// The entity with the greatest key, mutably.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.values_mut().next_back()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, T::Key, T> {
        self.items.keys()
    }

    /// Entities in key order.
    pub fn iter(&self) -> btree_map::Values<'_, T::Key, T> {
        self.items.values()
    }

    /// Entities in key order, mutably.
    pub fn iter_mut(&mut self) -> btree_map::ValuesMut<'_, T::Key, T> {
        self.items.values_mut()
    }
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed + Clone> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: Keyed + fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.values()).finish()
    }
}

impl<T: Keyed + PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Keyed> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<T: Keyed> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Keyed> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = btree_map::IntoValues<T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = btree_map::Values<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a mut Collection<T> {
    type Item = &'a mut T;
    type IntoIter = btree_map::ValuesMut<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut items = Collection::new();
        assert!(items.insert(item(1, "old")).is_none());
        let replaced = items.insert(item(1, "new"));

        assert_eq!(replaced.unwrap().label, "old");
        assert_eq!(items.len(), 1);
        assert_eq!(items.get(&1).unwrap().label, "new");
    }

    #[test]
    fn test_contains_uses_key_only() {
        let items: Collection<Item> = vec![item(1, "a"), item(2, "b")].into_iter().collect();
        assert!(items.contains(&item(1, "something else")));
        assert!(!items.contains(&item(3, "a")));
    }

    #[test]
    fn test_collect_deduplicates() {
        let items: Collection<Item> = vec![item(2, "a"), item(1, "b"), item(2, "c")]
            .into_iter()
            .collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_last_is_greatest_key() {
        let mut items: Collection<Item> = vec![item(5, "a"), item(35, "b"), item(12, "c")]
            .into_iter()
            .collect();
        assert_eq!(items.last().unwrap().id, 35);
        items.remove(&35);
        assert_eq!(items.last_mut().unwrap().id, 12);
    }

    #[test]
    fn test_string_keys_lookup_by_str() {
        #[derive(Debug)]
        struct Named(String);
        impl Keyed for Named {
            type Key = String;
            fn key(&self) -> String {
                self.0.clone()
            }
        }

        let items: Collection<Named> = vec![Named("develop".into())].into_iter().collect();
        assert!(items.get("develop").is_some());
        assert!(!items.contains_key("master"));
    }
}
