//! Map state container.

use crate::hooks::signal::Signal;
use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;

/// Reactive map state over an insertion-ordered [`IndexMap`].
///
/// Same snapshot discipline as [`ArrayState`](super::ArrayState): mutating
/// operations swap in a new `Arc`; no-ops (setting an equal value, deleting
/// an absent key) keep the existing snapshot.
pub struct MapState<K, V> {
    snapshot: Signal<Arc<IndexMap<K, V>>>,
}

impl<K, V> Clone for MapState<K, V> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
        }
    }
}

/// Create a [`MapState`] seeded with `initial` entries.
pub fn use_map<K, V>(initial: impl IntoIterator<Item = (K, V)>) -> MapState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    MapState {
        snapshot: Signal::new(Arc::new(initial.into_iter().collect())),
    }
}

impl<K, V> MapState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<IndexMap<K, V>> {
        self.snapshot.get()
    }

    /// The snapshot signal, for reactive access.
    pub fn signal(&self) -> Signal<Arc<IndexMap<K, V>>> {
        self.snapshot.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.snapshot.with(|m| m.len())
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.with(|m| m.is_empty())
    }

    /// Insert or replace `key`. Setting a value equal to the existing entry
    /// is a no-op.
    pub fn set(&self, key: K, value: V) {
        let current = self.snapshot.get();
        if current.get(&key) == Some(&value) {
            return;
        }
        let mut next = (*current).clone();
        next.insert(key, value);
        self.snapshot.set(Arc::new(next));
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.snapshot.with(|m| m.get(key).cloned())
    }

    /// Remove `key`, preserving the order of the remaining entries. An
    /// absent key is a no-op; returns the removed value.
    pub fn delete(&self, key: &K) -> Option<V> {
        let current = self.snapshot.get();
        if !current.contains_key(key) {
            return None;
        }
        let mut next = (*current).clone();
        let value = next.shift_remove(key);
        self.snapshot.set(Arc::new(next));
        value
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &K) -> bool {
        self.snapshot.with(|m| m.contains_key(key))
    }

    /// Remove all entries. An empty map is a no-op.
    pub fn clear(&self) {
        let current = self.snapshot.get();
        if current.is_empty() {
            return;
        }
        self.snapshot.set(Arc::new(IndexMap::new()));
    }

    /// Remove `key` if present, otherwise insert it with `value`.
    pub fn toggle(&self, key: K, value: V) {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        if next.shift_remove(&key).is_none() {
            next.insert(key, value);
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Insert several entries at once. An empty iterator (or one that changes
    /// no entry) is a no-op.
    pub fn set_multiple(&self, entries: impl IntoIterator<Item = (K, V)>) {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        let mut changed = false;
        for (key, value) in entries {
            if next.get(&key) == Some(&value) {
                continue;
            }
            next.insert(key, value);
            changed = true;
        }
        if changed {
            self.snapshot.set(Arc::new(next));
        }
    }

    /// Remove several keys at once. Keys that are absent are skipped; if none
    /// were present the call is a no-op.
    pub fn delete_multiple<'a>(&self, keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        let mut changed = false;
        for key in keys {
            changed |= next.shift_remove(key).is_some();
        }
        if changed {
            self.snapshot.set(Arc::new(next));
        }
    }

    /// Apply `f` to the existing value for `key`. Absent key, or a result
    /// equal to the current value, is a no-op. Returns the new value when an
    /// update happened.
    pub fn update(&self, key: &K, f: impl FnOnce(&V) -> V) -> Option<V> {
        let current = self.snapshot.get();
        let existing = current.get(key)?;
        let updated = f(existing);
        if updated == *existing {
            return None;
        }
        let mut next = (*current).clone();
        next.insert(key.clone(), updated.clone());
        self.snapshot.set(Arc::new(next));
        Some(updated)
    }

    /// Keep only entries matching `predicate`. A filter that removes nothing
    /// is a no-op.
    pub fn filter(&self, predicate: impl Fn(&K, &V) -> bool) {
        let current = self.snapshot.get();
        let next: IndexMap<K, V> = current
            .iter()
            .filter(|(k, v)| predicate(k, v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if next.len() == current.len() {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Replace every value with `f(key, value)`. A result equal to the
    /// current map is a no-op.
    pub fn map_values(&self, f: impl Fn(&K, &V) -> V) {
        let current = self.snapshot.get();
        let next: IndexMap<K, V> = current
            .iter()
            .map(|(k, v)| (k.clone(), f(k, v)))
            .collect();
        if next == *current {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// First entry matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&K, &V) -> bool) -> Option<(K, V)> {
        self.snapshot.with(|m| {
            m.iter()
                .find(|(k, v)| predicate(k, v))
                .map(|(k, v)| (k.clone(), v.clone()))
        })
    }

    /// Key of the first entry matching `predicate`.
    pub fn find_key(&self, predicate: impl Fn(&K, &V) -> bool) -> Option<K> {
        self.find(predicate).map(|(k, _)| k)
    }

    /// Value of the first entry matching `predicate`.
    pub fn find_value(&self, predicate: impl Fn(&K, &V) -> bool) -> Option<V> {
        self.find(predicate).map(|(_, v)| v)
    }

    /// All keys, in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.snapshot.with(|m| m.keys().cloned().collect())
    }

    /// All values, in insertion order.
    pub fn values(&self) -> Vec<V> {
        self.snapshot.with(|m| m.values().cloned().collect())
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.snapshot
            .with(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for MapState<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.snapshot.with(|m| f.debug_map().entries(m.iter()).finish())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fruit() -> MapState<String, i32> {
        use_map([("apple".to_owned(), 1), ("banana".to_owned(), 2)])
    }

    #[test]
    fn test_set_get_delete_has() {
        let map = fruit();
        map.set("cherry".to_owned(), 3);
        assert_eq!(map.get(&"cherry".to_owned()), Some(3));
        assert!(map.has(&"cherry".to_owned()));

        assert_eq!(map.delete(&"apple".to_owned()), Some(1));
        assert!(!map.has(&"apple".to_owned()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_set_equal_value_keeps_snapshot() {
        let map = fruit();
        let before = map.snapshot();
        let version = map.signal().version();

        map.set("apple".to_owned(), 1);

        assert!(Arc::ptr_eq(&before, &map.snapshot()));
        assert_eq!(map.signal().version(), version);

        map.set("apple".to_owned(), 2);
        assert!(!Arc::ptr_eq(&before, &map.snapshot()));
        assert_eq!(map.get(&"apple".to_owned()), Some(2));
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let map = fruit();
        let before = map.snapshot();
        assert_eq!(map.delete(&"kiwi".to_owned()), None);
        assert!(Arc::ptr_eq(&before, &map.snapshot()));
    }

    #[test]
    fn test_toggle() {
        let map = fruit();
        map.toggle("apple".to_owned(), 9);
        assert!(!map.has(&"apple".to_owned()));

        map.toggle("apple".to_owned(), 9);
        assert_eq!(map.get(&"apple".to_owned()), Some(9));
    }

    #[test]
    fn test_set_multiple_and_delete_multiple() {
        let map = fruit();
        map.set_multiple([("cherry".to_owned(), 3), ("date".to_owned(), 4)]);
        assert_eq!(map.len(), 4);

        let before = map.snapshot();
        map.set_multiple([("cherry".to_owned(), 3)]);
        assert!(Arc::ptr_eq(&before, &map.snapshot()), "all-equal batch is a no-op");

        let apple = "apple".to_owned();
        let missing = "kiwi".to_owned();
        map.delete_multiple([&apple, &missing]);
        assert_eq!(map.len(), 3);

        let before = map.snapshot();
        map.delete_multiple([&missing]);
        assert!(Arc::ptr_eq(&before, &map.snapshot()));
    }

    #[test]
    fn test_update() {
        let map = fruit();
        assert_eq!(map.update(&"apple".to_owned(), |v| v + 10), Some(11));

        let before = map.snapshot();
        assert_eq!(map.update(&"apple".to_owned(), |v| *v), None);
        assert_eq!(map.update(&"kiwi".to_owned(), |v| v + 1), None);
        assert!(Arc::ptr_eq(&before, &map.snapshot()));
    }

    #[test]
    fn test_filter_and_map_values() {
        let map = fruit();
        map.map_values(|_, v| v * 10);
        assert_eq!(map.get(&"apple".to_owned()), Some(10));

        map.filter(|_, v| *v > 10);
        assert_eq!(map.keys(), vec!["banana".to_owned()]);

        let before = map.snapshot();
        map.filter(|_, _| true);
        map.map_values(|_, v| *v);
        assert!(Arc::ptr_eq(&before, &map.snapshot()));
    }

    #[test]
    fn test_find_family() {
        let map = fruit();
        assert_eq!(
            map.find(|_, v| *v == 2),
            Some(("banana".to_owned(), 2))
        );
        assert_eq!(map.find_key(|_, v| *v == 1), Some("apple".to_owned()));
        assert_eq!(map.find_value(|k, _| k == "banana"), Some(2));
        assert_eq!(map.find(|_, v| *v == 99), None);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let map = fruit();
        map.set("cherry".to_owned(), 3);
        map.delete(&"apple".to_owned());
        assert_eq!(map.keys(), vec!["banana".to_owned(), "cherry".to_owned()]);
        assert_eq!(map.values(), vec![2, 3]);
    }

    #[test]
    fn test_clear() {
        let map = fruit();
        map.clear();
        assert!(map.is_empty());

        let before = map.snapshot();
        map.clear();
        assert!(Arc::ptr_eq(&before, &map.snapshot()));
    }
}
