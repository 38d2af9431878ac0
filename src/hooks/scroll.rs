//! Scroll offset tracking from mouse wheel events.

use crate::hooks::interval::Throttler;
use crate::hooks::listener::{EventResult, EventTarget, Subscription};
use crate::hooks::signal::Signal;
use crate::terminal::{Event, EventKind, MouseEventKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Direction of the most recent scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Wheel up.
    Up,
    /// Wheel down.
    Down,
    /// Wheel left.
    Left,
    /// Wheel right.
    Right,
}

/// Published scroll state: accumulated wheel deltas in lines/columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Horizontal offset (right-positive).
    pub x: i64,
    /// Vertical offset (down-positive).
    pub y: i64,
    /// Direction of the last movement, if any.
    pub last_direction: Option<ScrollDirection>,
}

/// Configuration for [`use_scroll`].
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Event source; defaults to the process default target.
    pub target: Option<EventTarget>,
    /// Throttle window for publishing. Zero publishes every event.
    pub throttle: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            target: None,
            throttle: Duration::from_millis(50),
        }
    }
}

impl ScrollOptions {
    /// Defaults: default target, 50 ms throttle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track scrolling on `target` instead of the process default.
    pub fn target(mut self, target: &EventTarget) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Set the throttle window. Zero publishes every event.
    pub fn throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}

/// Handle to a scroll tracker. Dropping it detaches the listener and cancels
/// any pending throttled publish.
pub struct Scroll {
    state: Signal<ScrollState>,
    _sub: Subscription,
}

impl Scroll {
    /// Snapshot of the current scroll state.
    pub fn state(&self) -> ScrollState {
        self.state.get()
    }

    /// The state signal, for reactive access.
    pub fn signal(&self) -> Signal<ScrollState> {
        self.state.clone()
    }

    /// Current (x, y) offset.
    pub fn offset(&self) -> (i64, i64) {
        self.state.with(|s| (s.x, s.y))
    }
}

impl std::fmt::Debug for Scroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scroll").field("state", &self.state()).finish()
    }
}

/// Accumulate scroll wheel events into an offset, publishing through a
/// throttler: the first event in a burst publishes immediately, the rest
/// coalesce into one trailing sample.
pub fn use_scroll(options: ScrollOptions) -> Scroll {
    let target = options
        .target
        .unwrap_or_else(|| EventTarget::default_target().clone());

    let state = Signal::new(ScrollState::default());
    // Accumulator the throttler publishes from.
    let pending: Arc<Mutex<ScrollState>> = Arc::new(Mutex::new(ScrollState::default()));

    let throttler = {
        let state = state.clone();
        let pending = Arc::clone(&pending);
        Arc::new(Throttler::new(options.throttle, move || {
            state.set_if_changed(*pending.lock());
        }))
    };

    let sub = {
        let throttler = Arc::clone(&throttler);
        target.subscribe(EventKind::Scroll, move |event| {
            let Event::Mouse(mouse) = event else {
                return EventResult::Ignored;
            };
            let direction = match mouse.kind {
                MouseEventKind::ScrollUp => ScrollDirection::Up,
                MouseEventKind::ScrollDown => ScrollDirection::Down,
                MouseEventKind::ScrollLeft => ScrollDirection::Left,
                MouseEventKind::ScrollRight => ScrollDirection::Right,
                _ => return EventResult::Ignored,
            };
            {
                let mut pending = pending.lock();
                match direction {
                    ScrollDirection::Up => pending.y -= 1,
                    ScrollDirection::Down => pending.y += 1,
                    ScrollDirection::Left => pending.x -= 1,
                    ScrollDirection::Right => pending.x += 1,
                }
                pending.last_direction = Some(direction);
            }
            throttler.call();
            EventResult::Ignored
        })
    };

    Scroll { state, _sub: sub }
}
