//! Array state container.

use crate::hooks::signal::Signal;
use std::sync::Arc;

/// Reactive array state.
///
/// The state is an immutable snapshot (`Arc<Vec<T>>`): every mutating
/// operation clones, mutates, and swaps in a new snapshot. Operations that
/// would change nothing (pop of an empty array, out-of-range index, equal
/// value) keep the existing snapshot — observable via [`Arc::ptr_eq`] on
/// [`snapshot`](Self::snapshot) and via the signal's version counter.
pub struct ArrayState<T> {
    snapshot: Signal<Arc<Vec<T>>>,
}

impl<T> Clone for ArrayState<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
        }
    }
}

/// Create an [`ArrayState`] seeded with `initial`.
pub fn use_array<T: Clone + PartialEq>(initial: impl Into<Vec<T>>) -> ArrayState<T> {
    ArrayState {
        snapshot: Signal::new(Arc::new(initial.into())),
    }
}

impl<T: Clone + PartialEq> ArrayState<T> {
    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.snapshot.get()
    }

    /// The snapshot signal, for reactive access.
    pub fn signal(&self) -> Signal<Arc<Vec<T>>> {
        self.snapshot.clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.snapshot.with(|v| v.len())
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.with(|v| v.is_empty())
    }

    /// Append an element.
    pub fn push(&self, value: T) {
        let mut next = (*self.snapshot.get()).clone();
        next.push(value);
        self.snapshot.set(Arc::new(next));
    }

    /// Remove and return the last element. No-op on an empty array.
    pub fn pop(&self) -> Option<T> {
        let current = self.snapshot.get();
        if current.is_empty() {
            return None;
        }
        let mut next = (*current).clone();
        let value = next.pop();
        self.snapshot.set(Arc::new(next));
        value
    }

    /// Remove and return the first element. No-op on an empty array.
    pub fn shift(&self) -> Option<T> {
        let current = self.snapshot.get();
        if current.is_empty() {
            return None;
        }
        let mut next = (*current).clone();
        let value = next.remove(0);
        self.snapshot.set(Arc::new(next));
        Some(value)
    }

    /// Prepend an element.
    pub fn unshift(&self, value: T) {
        let mut next = (*self.snapshot.get()).clone();
        next.insert(0, value);
        self.snapshot.set(Arc::new(next));
    }

    /// Insert at `index`. Out-of-range (beyond `len`) is a no-op.
    pub fn insert_at(&self, index: usize, value: T) {
        let current = self.snapshot.get();
        if index > current.len() {
            return;
        }
        let mut next = (*current).clone();
        next.insert(index, value);
        self.snapshot.set(Arc::new(next));
    }

    /// Remove and return the element at `index`. Out-of-range is a no-op.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let current = self.snapshot.get();
        if index >= current.len() {
            return None;
        }
        let mut next = (*current).clone();
        let value = next.remove(index);
        self.snapshot.set(Arc::new(next));
        Some(value)
    }

    /// Replace the element at `index`. Out-of-range or equal value is a
    /// no-op; returns the previous value when a replacement happened.
    pub fn update_at(&self, index: usize, value: T) -> Option<T> {
        let current = self.snapshot.get();
        match current.get(index) {
            Some(existing) if *existing != value => {
                let mut next = (*current).clone();
                let previous = std::mem::replace(&mut next[index], value);
                self.snapshot.set(Arc::new(next));
                Some(previous)
            }
            _ => None,
        }
    }

    /// Remove the first element equal to `value`. Absent value is a no-op.
    pub fn remove(&self, value: &T) -> bool {
        let current = self.snapshot.get();
        let Some(index) = current.iter().position(|v| v == value) else {
            return false;
        };
        let mut next = (*current).clone();
        next.remove(index);
        self.snapshot.set(Arc::new(next));
        true
    }

    /// Keep only elements matching `predicate`. A filter that removes
    /// nothing is a no-op.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) {
        let current = self.snapshot.get();
        let next: Vec<T> = current.iter().filter(|v| predicate(v)).cloned().collect();
        if next.len() == current.len() {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Sort by `compare`. An already-sorted array is a no-op.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        let current = self.snapshot.get();
        let mut next = (*current).clone();
        next.sort_by(compare);
        if next == **current {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Reverse the array. Length <= 1 (or a palindrome) is a no-op.
    pub fn reverse(&self) {
        let current = self.snapshot.get();
        if current.len() <= 1 {
            return;
        }
        let mut next = (*current).clone();
        next.reverse();
        if next == **current {
            return;
        }
        self.snapshot.set(Arc::new(next));
    }

    /// Replace the whole array. An equal array is a no-op.
    pub fn set(&self, values: impl Into<Vec<T>>) {
        self.snapshot.set_if_changed(Arc::new(values.into()));
    }

    /// Remove all elements. An empty array is a no-op.
    pub fn clear(&self) {
        let current = self.snapshot.get();
        if current.is_empty() {
            return;
        }
        self.snapshot.set(Arc::new(Vec::new()));
    }

    /// First element matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.snapshot.with(|v| v.iter().find(|x| predicate(x)).cloned())
    }

    /// Index of the first element matching `predicate`.
    pub fn find_index(&self, predicate: impl Fn(&T) -> bool) -> Option<usize> {
        self.snapshot.with(|v| v.iter().position(|x| predicate(x)))
    }

    /// Whether `value` is present.
    pub fn includes(&self, value: &T) -> bool {
        self.snapshot.with(|v| v.contains(value))
    }

    /// Element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<T> {
        self.snapshot.with(|v| v.get(index).cloned())
    }

    /// First element, if any.
    pub fn first(&self) -> Option<T> {
        self.snapshot.with(|v| v.first().cloned())
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<T> {
        self.snapshot.with(|v| v.last().cloned())
    }
}

impl<T: Clone + PartialEq + Ord> ArrayState<T> {
    /// Sort ascending. An already-sorted array is a no-op.
    pub fn sort(&self) {
        self.sort_by(T::cmp);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ArrayState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.snapshot.with(|v| f.debug_list().entries(v.iter()).finish())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_shift_unshift() {
        let arr = use_array(vec![2, 3]);
        arr.push(4);
        arr.unshift(1);
        assert_eq!(*arr.snapshot(), vec![1, 2, 3, 4]);

        assert_eq!(arr.pop(), Some(4));
        assert_eq!(arr.shift(), Some(1));
        assert_eq!(*arr.snapshot(), vec![2, 3]);
    }

    #[test]
    fn test_pop_empty_is_noop() {
        let arr = use_array(Vec::<i32>::new());
        let before = arr.snapshot();
        let version = arr.signal().version();

        assert_eq!(arr.pop(), None);
        assert_eq!(arr.shift(), None);

        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
        assert_eq!(arr.signal().version(), version);
    }

    #[test]
    fn test_insert_remove_update_at() {
        let arr = use_array(vec![1, 3]);
        arr.insert_at(1, 2);
        assert_eq!(*arr.snapshot(), vec![1, 2, 3]);

        assert_eq!(arr.update_at(0, 10), Some(1));
        assert_eq!(arr.remove_at(1), Some(2));
        assert_eq!(*arr.snapshot(), vec![10, 3]);
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let arr = use_array(vec![1, 2]);
        let before = arr.snapshot();

        assert_eq!(arr.remove_at(5), None);
        assert_eq!(arr.update_at(5, 9), None);
        arr.insert_at(5, 9);

        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
    }

    #[test]
    fn test_update_at_equal_value_is_noop() {
        let arr = use_array(vec![1, 2]);
        let before = arr.snapshot();
        assert_eq!(arr.update_at(0, 1), None);
        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
    }

    #[test]
    fn test_remove_by_value() {
        let arr = use_array(vec![1, 2, 1]);
        assert!(arr.remove(&1));
        assert_eq!(*arr.snapshot(), vec![2, 1]);

        let before = arr.snapshot();
        assert!(!arr.remove(&7));
        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
    }

    #[test]
    fn test_filter_sort_reverse() {
        let arr = use_array(vec![3, 1, 4, 1, 5]);
        arr.filter(|v| *v != 1);
        assert_eq!(*arr.snapshot(), vec![3, 4, 5]);

        arr.reverse();
        assert_eq!(*arr.snapshot(), vec![5, 4, 3]);

        arr.sort();
        assert_eq!(*arr.snapshot(), vec![3, 4, 5]);
    }

    #[test]
    fn test_noop_filter_sort_reverse_keep_snapshot() {
        let arr = use_array(vec![1, 2, 3]);
        let before = arr.snapshot();

        arr.filter(|_| true);
        arr.sort();
        assert!(Arc::ptr_eq(&before, &arr.snapshot()));

        let single = use_array(vec![1]);
        let before = single.snapshot();
        single.reverse();
        assert!(Arc::ptr_eq(&before, &single.snapshot()));
    }

    #[test]
    fn test_set_and_clear() {
        let arr = use_array(vec![1]);
        arr.set(vec![4, 5]);
        assert_eq!(*arr.snapshot(), vec![4, 5]);

        let before = arr.snapshot();
        let version = arr.signal().version();
        arr.set(vec![4, 5]);
        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
        assert_eq!(arr.signal().version(), version);

        arr.clear();
        assert!(arr.is_empty());

        let before = arr.snapshot();
        arr.clear();
        assert!(Arc::ptr_eq(&before, &arr.snapshot()));
    }

    #[test]
    fn test_readers() {
        let arr = use_array(vec![10, 20, 30]);
        assert_eq!(arr.find(|v| *v > 15), Some(20));
        assert_eq!(arr.find_index(|v| *v > 15), Some(1));
        assert!(arr.includes(&30));
        assert_eq!(arr.get(2), Some(30));
        assert_eq!(arr.first(), Some(10));
        assert_eq!(arr.last(), Some(30));
        assert_eq!(arr.len(), 3);
    }
}
