//! Set state container.

use crate::hooks::signal::Signal;
use indexmap::IndexSet;
use std::hash::Hash;
use std::sync::Arc;

/// Reactive set state over an insertion-ordered [`IndexSet`].
///
/// Same snapshot discipline as the other containers: mutating operations
/// swap in a new `Arc`; no-ops (adding a present member, deleting an absent
/// one, algebra that changes nothing) keep the existing snapshot.
pub struct SetState<T> {
    snapshot: Signal<Arc<IndexSet<T>>>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
        }
    }
}

/// Create a [`SetState`] seeded with `initial` members.
pub fn use_set<T>(initial: impl IntoIterator<Item = T>) -> SetState<T>
where
    T: Hash + Eq + Clone,
{
    SetState {
        snapshot: Signal::new(Arc::new(initial.into_iter().collect())),
    }
}

impl<T> SetState<T>
where
    T: Hash + Eq + Clone,
{
    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<IndexSet<T>> {
        self.snapshot.get()
    }

    /// The snapshot signal, for reactive access.
    pub fn signal(&self) -> Signal<Arc<IndexSet<T>>> {
        self.snapshot.clone()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.snapshot.with(|s| s.len())
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.with(|s| s.is_empty())
    }

    /// Whether `value` is a member.
    pub fn has(&self, value: &T) -> bool {
        self.snapshot.with(|s| s.contains(value))
    }

    /// Add a member. A present member is a no-op. Returns whether the set
    /// changed.
    pub fn add(&self, value: T) -> bool {
        let current = self.snapshot.get();
        if current.contains(&value) {
            return false;
        }
        let mut next = (*current).clone();
        next.insert(value);
        self.snapshot.set(Arc::new(next));
        true
    }

    /// Remove a member, preserving the order of the rest. An absent member
    /// is a no-op. Returns whether the set changed.
    pub fn delete(&self, value: &T) -> bool {
        let current = self.snapshot.get();
        if !current.contains(value) {
            return false;
        }
        let mut next = (*current).clone();
        next.shift_remove(value);
        self.snapshot.set(Arc::new(next));
        true
    }

    /// Remove all members. An empty set is a no-op.
    pub fn clear(&self) {
        let current = self.snapshot.get();
        if current.is_empty() {
            return;
        }
        self.snapshot.set(Arc::new(IndexSet::new()));
    }

    /// Remove `value` if present, otherwise add it.
    pub fn toggle(&self, value: T) {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        if !next.shift_remove(&value) {
            next.insert(value);
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Add several members at once; a batch adding nothing new is a no-op.
    pub fn add_multiple(&self, values: impl IntoIterator<Item = T>) {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        let mut changed = false;
        for value in values {
            changed |= next.insert(value);
        }
        if changed {
            self.snapshot.set(Arc::new(next));
        }
    }

    /// Remove several members at once; a batch removing nothing is a no-op.
    pub fn delete_multiple<'a>(&self, values: impl IntoIterator<Item = &'a T>)
    where
        T: 'a,
    {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        let mut changed = false;
        for value in values {
            changed |= next.shift_remove(value);
        }
        if changed {
            self.snapshot.set(Arc::new(next));
        }
    }

    /// Replace the set with its union with `other`.
    pub fn union(&self, other: impl IntoIterator<Item = T>) {
        self.add_multiple(other);
    }

    /// Keep only members also present in `other`.
    pub fn intersection(&self, other: &IndexSet<T>) {
        self.retain_where(|v| other.contains(v));
    }

    /// Remove every member present in `other`.
    pub fn difference(&self, other: &IndexSet<T>) {
        self.retain_where(|v| !other.contains(v));
    }

    /// Replace the set with members in exactly one of the two sets. Members
    /// unique to `other` are appended in `other`'s order.
    pub fn symmetric_difference(&self, other: &IndexSet<T>) {
        let current = self.snapshot.get();
        let next: IndexSet<T> = current
            .iter()
            .filter(|v| !other.contains(*v))
            .chain(other.iter().filter(|v| !current.contains(*v)))
            .cloned()
            .collect();
        if next == *current {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Keep only members matching `predicate`. A filter that removes nothing
    /// is a no-op.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) {
        self.retain_where(predicate);
    }

    /// Replace every member with `f(member)` (deduplicated). A result equal
    /// to the current set is a no-op.
    pub fn map_members(&self, f: impl Fn(&T) -> T) {
        let current = self.snapshot.get();
        let next: IndexSet<T> = current.iter().map(|v| f(v)).collect();
        if next == *current {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Members in insertion order.
    pub fn members(&self) -> Vec<T> {
        self.snapshot.with(|s| s.iter().cloned().collect())
    }

    fn retain_where(&self, predicate: impl Fn(&T) -> bool) {
        let current = self.snapshot.get();
        let next: IndexSet<T> = current.iter().filter(|v| predicate(v)).cloned().collect();
        if next.len() == current.len() {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.snapshot.with(|s| f.debug_set().entries(s.iter()).finish())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_delete_has() {
        let set = use_set([1, 2]);
        assert!(set.add(3));
        assert!(set.has(&3));
        assert!(set.delete(&1));
        assert!(!set.has(&1));
        assert_eq!(set.members(), vec![2, 3]);
    }

    #[test]
    fn test_add_present_member_keeps_snapshot() {
        let set = use_set([1, 2]);
        let before = set.snapshot();
        let version = set.signal().version();

        assert!(!set.add(2));

        assert!(Arc::ptr_eq(&before, &set.snapshot()));
        assert_eq!(set.signal().version(), version);
    }

    #[test]
    fn test_delete_absent_member_is_noop() {
        let set = use_set([1]);
        let before = set.snapshot();
        assert!(!set.delete(&9));
        assert!(Arc::ptr_eq(&before, &set.snapshot()));
    }

    #[test]
    fn test_toggle() {
        let set = use_set([1]);
        set.toggle(1);
        assert!(!set.has(&1));
        set.toggle(1);
        assert!(set.has(&1));
    }

    #[test]
    fn test_add_delete_multiple() {
        let set = use_set([1]);
        set.add_multiple([1, 2, 3]);
        assert_eq!(set.members(), vec![1, 2, 3]);

        let before = set.snapshot();
        set.add_multiple([1, 2]);
        assert!(Arc::ptr_eq(&before, &set.snapshot()));

        set.delete_multiple([&1, &9]);
        assert_eq!(set.members(), vec![2, 3]);

        let before = set.snapshot();
        set.delete_multiple([&9]);
        assert!(Arc::ptr_eq(&before, &set.snapshot()));
    }

    #[test]
    fn test_set_algebra() {
        let set = use_set([1, 2, 3]);
        set.union([3, 4]);
        assert_eq!(set.members(), vec![1, 2, 3, 4]);

        let other: IndexSet<i32> = [2, 3, 5].into_iter().collect();
        set.intersection(&other);
        assert_eq!(set.members(), vec![2, 3]);

        let remove: IndexSet<i32> = [3].into_iter().collect();
        set.difference(&remove);
        assert_eq!(set.members(), vec![2]);

        let sym: IndexSet<i32> = [2, 7].into_iter().collect();
        set.symmetric_difference(&sym);
        assert_eq!(set.members(), vec![7]);
    }

    #[test]
    fn test_algebra_noops_keep_snapshot() {
        let set = use_set([1, 2]);
        let before = set.snapshot();

        set.union([1, 2]);
        let empty: IndexSet<i32> = IndexSet::new();
        set.difference(&empty);
        let all: IndexSet<i32> = [1, 2, 3].into_iter().collect();
        set.intersection(&all);

        assert!(Arc::ptr_eq(&before, &set.snapshot()));
    }

    #[test]
    fn test_filter_and_map_members() {
        let set = use_set([1, 2, 3, 4]);
        set.filter(|v| v % 2 == 0);
        assert_eq!(set.members(), vec![2, 4]);

        set.map_members(|v| v * 10);
        assert_eq!(set.members(), vec![20, 40]);

        let before = set.snapshot();
        set.filter(|_| true);
        set.map_members(|v| *v);
        assert!(Arc::ptr_eq(&before, &set.snapshot()));
    }

    #[test]
    fn test_clear() {
        let set = use_set([1]);
        set.clear();
        assert!(set.is_empty());

        let before = set.snapshot();
        set.clear();
        assert!(Arc::ptr_eq(&before, &set.snapshot()));
    }
}
