//! Event targets and listener subscriptions.
//!
//! An [`EventTarget`] is a dispatch surface: hooks attach handlers for a
//! single [`EventKind`] and receive every matching [`Event`] dispatched into
//! the target, in registration order, until a handler returns
//! [`EventResult::Consumed`].
//!
//! Subscriptions are RAII guards: dropping (or explicitly cancelling) a
//! [`Subscription`] detaches the handler exactly once. A panicking handler is
//! caught and logged; it never takes down the dispatch surface or the other
//! handlers.
//!
//! The process-wide default target ([`EventTarget::default_target`]) plays
//! the role the document plays in a browser: the terminal event pump feeds
//! it, and hooks subscribe to it unless given an explicit target.

use crate::terminal::{Event, EventKind, MouseEvent};
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

/// Outcome of an event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The handler consumed the event; later handlers are skipped.
    Consumed,
    /// The handler did not consume the event.
    Ignored,
}

/// Event handler callback type.
pub type EventHandler = Arc<dyn Fn(&Event) -> EventResult + Send + Sync>;

struct HandlerEntry {
    id: u64,
    kind: EventKind,
    handler: EventHandler,
}

#[derive(Default)]
struct TargetInner {
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
}

/// A dispatch surface hooks attach listeners to.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Arc<TargetInner>,
}

/// Process-wide default target, fed by the terminal event pump.
static DEFAULT_TARGET: OnceLock<EventTarget> = OnceLock::new();

impl EventTarget {
    /// Create a fresh, empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default target (the document-equivalent).
    pub fn default_target() -> &'static Self {
        DEFAULT_TARGET.get_or_init(Self::new)
    }

    /// Attach `handler` for events of `kind`. The handler stays attached
    /// until the returned [`Subscription`] is dropped or cancelled.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&Event) -> EventResult + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers.write().push(HandlerEntry {
            id,
            kind,
            handler: Arc::new(handler),
        });
        Subscription {
            target: Arc::downgrade(&self.inner),
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Dispatch an event to every handler registered for its kind, in
    /// registration order, stopping at the first [`EventResult::Consumed`].
    ///
    /// Handlers are cloned out of the registry before invocation, so a
    /// handler may subscribe or unsubscribe (including itself) without
    /// deadlocking.
    pub fn dispatch(&self, event: &Event) {
        let kind = event.kind();
        let handlers: Vec<EventHandler> = self
            .inner
            .handlers
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Arc::clone(&entry.handler))
            .collect();

        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(EventResult::Consumed) => break,
                Ok(EventResult::Ignored) => {}
                Err(_) => {
                    tracing::warn!(?kind, "event handler panicked; continuing dispatch");
                }
            }
        }
    }

    /// Number of attached handlers (all kinds).
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.read().len()
    }

    /// Whether two handles refer to the same surface.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// RAII guard for an attached handler.
///
/// The handler detaches exactly once: on `drop`, or on the first call to
/// [`cancel`](Self::cancel), whichever comes first.
#[derive(Debug)]
pub struct Subscription {
    target: Weak<TargetInner>,
    id: u64,
    active: AtomicBool,
}

impl Subscription {
    /// Detach the handler now. Subsequent calls (and the eventual drop) are
    /// no-ops.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(target) = self.target.upgrade() {
            target.handlers.write().retain(|entry| entry.id != self.id);
        }
    }

    /// Whether the handler is still attached.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Attach a handler for `kind` on `target`. Thin wrapper around
/// [`EventTarget::subscribe`], mirroring the named helpers below.
pub fn on_event<F>(target: &EventTarget, kind: EventKind, handler: F) -> Subscription
where
    F: Fn(&Event) -> EventResult + Send + Sync + 'static,
{
    target.subscribe(kind, handler)
}

macro_rules! named_listener {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        pub fn $name<F>(target: &EventTarget, handler: F) -> Subscription
        where
            F: Fn(&Event) -> EventResult + Send + Sync + 'static,
        {
            target.subscribe($kind, handler)
        }
    };
}

named_listener!(
    /// Listen for key presses.
    on_key_down,
    EventKind::KeyDown
);
named_listener!(
    /// Listen for key releases.
    on_key_up,
    EventKind::KeyUp
);
named_listener!(
    /// Listen for mouse button presses.
    on_mouse_down,
    EventKind::MouseDown
);
named_listener!(
    /// Listen for mouse button releases.
    on_mouse_up,
    EventKind::MouseUp
);
named_listener!(
    /// Listen for mouse movement (moves and drags).
    on_mouse_move,
    EventKind::MouseMove
);
named_listener!(
    /// Listen for scroll wheel events.
    on_scroll,
    EventKind::Scroll
);
named_listener!(
    /// Listen for terminal resizes.
    on_resize,
    EventKind::Resize
);
named_listener!(
    /// Listen for focus gained/lost.
    on_focus_change,
    EventKind::FocusChange
);
named_listener!(
    /// Listen for bracketed paste.
    on_paste,
    EventKind::Paste
);

/// Listen for clicks (mouse button presses), receiving the [`MouseEvent`].
pub fn on_click<F>(target: &EventTarget, handler: F) -> Subscription
where
    F: Fn(&MouseEvent) -> EventResult + Send + Sync + 'static,
{
    target.subscribe(EventKind::MouseDown, move |event| match event {
        Event::Mouse(mouse) => handler(mouse),
        _ => EventResult::Ignored,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::terminal::{KeyCode, KeyEvent};
    use std::sync::atomic::AtomicUsize;

    fn key_down(code: KeyCode) -> Event {
        Event::KeyDown(KeyEvent::new(code))
    }

    #[test]
    fn test_subscribe_and_dispatch() {
        let target = EventTarget::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let _sub = target.subscribe(EventKind::KeyDown, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            EventResult::Ignored
        });

        target.dispatch(&key_down(KeyCode::Enter));
        target.dispatch(&key_down(KeyCode::Enter));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_kind_filtering() {
        let target = EventTarget::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let _sub = target.subscribe(EventKind::KeyUp, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            EventResult::Ignored
        });

        target.dispatch(&key_down(KeyCode::Enter));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        target.dispatch(&Event::KeyUp(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_detaches() {
        let target = EventTarget::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let sub = target.subscribe(EventKind::KeyDown, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            EventResult::Ignored
        });
        assert_eq!(target.handler_count(), 1);

        drop(sub);
        assert_eq!(target.handler_count(), 0);

        target.dispatch(&key_down(KeyCode::Enter));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let target = EventTarget::new();
        let sub = target.subscribe(EventKind::KeyDown, |_| EventResult::Ignored);
        assert!(sub.is_active());
        sub.cancel();
        assert!(!sub.is_active());
        sub.cancel();
        assert_eq!(target.handler_count(), 0);
    }

    #[test]
    fn test_consumed_stops_propagation() {
        let target = EventTarget::new();
        let reached = Arc::new(AtomicBool::new(false));
        let r = reached.clone();

        let _first = target.subscribe(EventKind::KeyDown, |_| EventResult::Consumed);
        let _second = target.subscribe(EventKind::KeyDown, move |_| {
            r.store(true, Ordering::SeqCst);
            EventResult::Ignored
        });

        target.dispatch(&key_down(KeyCode::Enter));
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panicking_handler_does_not_poison_dispatch() {
        let target = EventTarget::new();
        let reached = Arc::new(AtomicBool::new(false));
        let r = reached.clone();

        let _bad = target.subscribe(EventKind::KeyDown, |_| panic!("handler bug"));
        let _good = target.subscribe(EventKind::KeyDown, move |_| {
            r.store(true, Ordering::SeqCst);
            EventResult::Ignored
        });

        target.dispatch(&key_down(KeyCode::Enter));
        assert!(reached.load(Ordering::SeqCst));

        // The surface still works for later events.
        target.dispatch(&key_down(KeyCode::Enter));
        assert_eq!(target.handler_count(), 2);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_dispatch() {
        let target = EventTarget::new();
        let slot: Arc<parking_lot::Mutex<Option<Subscription>>> =
            Arc::new(parking_lot::Mutex::new(None));

        let slot_clone = slot.clone();
        let sub = target.subscribe(EventKind::KeyDown, move |_| {
            if let Some(sub) = slot_clone.lock().take() {
                sub.cancel();
            }
            EventResult::Ignored
        });
        *slot.lock() = Some(sub);

        // Must not deadlock.
        target.dispatch(&key_down(KeyCode::Enter));
        assert_eq!(target.handler_count(), 0);
    }

    #[test]
    fn test_on_click_receives_mouse_event() {
        use crate::terminal::{MouseButton, MouseEventKind};
        let target = EventTarget::new();
        let hit = Arc::new(AtomicBool::new(false));
        let h = hit.clone();

        let _sub = on_click(&target, move |mouse| {
            assert_eq!(mouse.column, 3);
            h.store(true, Ordering::SeqCst);
            EventResult::Consumed
        });

        target.dispatch(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 1,
            modifiers: crate::terminal::KeyModifiers::empty(),
        }));
        assert!(hit.load(Ordering::SeqCst));
    }
}
