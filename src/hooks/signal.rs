//! Reactive state cells.
//!
//! [`Signal<T>`] is the foundation of the hook system. Every hook publishes
//! its state through a signal: reads are cheap clones, writes bump a version
//! counter and raise the process-wide render-request flag so a host render
//! loop knows something changed.
//!
//! The version counter is per-signal and is what tests use to observe whether
//! an operation actually updated state (the collection containers' no-op
//! short-circuit leaves the version untouched).

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide flag raised whenever any signal changes.
static RENDER_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Request a re-render. Raised automatically by signal writes.
pub fn request_render() {
    RENDER_REQUESTED.store(true, Ordering::Release);
}

/// Take the render-request flag, clearing it. Returns whether it was set.
pub fn take_render_request() -> bool {
    RENDER_REQUESTED.swap(false, Ordering::AcqRel)
}

struct SignalInner<T> {
    value: RwLock<T>,
    version: AtomicU64,
}

/// A cloneable handle to a piece of reactive state.
///
/// ```
/// use tui_hooks::hooks::Signal;
///
/// let count = Signal::new(0);
/// count.set(1);
/// count.update(|v| *v += 1);
/// assert_eq!(count.get(), 2);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Signal<T> {
    /// Create a signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the value, bumping the version and requesting a render.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.bump();
    }

    /// Mutate the value in place, bumping the version and requesting a render.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.inner.value.write());
        self.bump();
    }

    /// Read the value through a closure without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Number of writes this signal has observed.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Whether two handles refer to the same underlying cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn bump(&self) {
        self.inner.version.fetch_add(1, Ordering::AcqRel);
        request_render();
    }
}

impl<T: Clone> Signal<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T: PartialEq> Signal<T> {
    /// Replace the value only if it differs from the current one.
    ///
    /// Returns `true` if a write happened. A skipped write leaves the version
    /// counter and the render-request flag untouched.
    pub fn set_if_changed(&self, value: T) -> bool {
        {
            let current = self.inner.value.read();
            if *current == value {
                return false;
            }
        }
        *self.inner.value.write() = value;
        self.bump();
        true
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.read())
            .field("version", &self.version())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_get_set() {
        let s = Signal::new(10);
        assert_eq!(s.get(), 10);
        s.set(20);
        assert_eq!(s.get(), 20);
    }

    #[test]
    fn test_signal_update() {
        let s = Signal::new(vec![1, 2]);
        s.update(|v| v.push(3));
        assert_eq!(s.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_signal_with() {
        let s = Signal::new(String::from("hello"));
        let len = s.with(|v| v.len());
        assert_eq!(len, 5);
    }

    #[test]
    fn test_signal_version_bumps_on_write() {
        let s = Signal::new(0);
        let v0 = s.version();
        s.set(1);
        assert_eq!(s.version(), v0 + 1);
        s.update(|v| *v += 1);
        assert_eq!(s.version(), v0 + 2);
    }

    #[test]
    fn test_set_if_changed_skips_equal_value() {
        let s = Signal::new(5);
        let v0 = s.version();
        assert!(!s.set_if_changed(5));
        assert_eq!(s.version(), v0);
        assert!(s.set_if_changed(6));
        assert_eq!(s.version(), v0 + 1);
        assert_eq!(s.get(), 6);
    }

    #[test]
    fn test_signal_clone_shares_state() {
        let a = Signal::new(1);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
        assert!(a.ptr_eq(&b));
    }
}
