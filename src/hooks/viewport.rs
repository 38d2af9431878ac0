//! Terminal viewport size with breakpoint classification.

use crate::hooks::interval::Debouncer;
use crate::hooks::listener::{EventResult, EventTarget, Subscription};
use crate::hooks::signal::Signal;
use crate::terminal::{Event, EventKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Width class derived from the column count, coarse enough for adaptive
/// layouts (the terminal analogue of CSS breakpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    /// Fewer than 40 columns.
    Xs,
    /// 40..80 columns.
    Sm,
    /// 80..120 columns.
    Md,
    /// 120..160 columns.
    Lg,
    /// 160 columns or more.
    Xl,
}

impl Breakpoint {
    /// Classify a column count.
    pub fn classify(cols: u16) -> Self {
        match cols {
            0..=39 => Self::Xs,
            40..=79 => Self::Sm,
            80..=119 => Self::Md,
            120..=159 => Self::Lg,
            _ => Self::Xl,
        }
    }
}

/// Published viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    /// Columns.
    pub cols: u16,
    /// Rows.
    pub rows: u16,
    /// Width class for `cols`.
    pub breakpoint: Breakpoint,
    /// Whether a terminal size could be determined at all.
    pub supported: bool,
}

/// Configuration for [`use_viewport`].
#[derive(Debug, Clone)]
pub struct ViewportOptions {
    /// Event source; defaults to the process default target.
    pub target: Option<EventTarget>,
    /// Debounce window for resize bursts. Zero publishes immediately.
    pub debounce: Duration,
    /// Override the initial size probe (used by tests and embedders that
    /// already know the surface size).
    pub initial_size: Option<(u16, u16)>,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            target: None,
            debounce: Duration::from_millis(100),
            initial_size: None,
        }
    }
}

impl ViewportOptions {
    /// Defaults: default target, 100 ms debounce, probed initial size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track resizes on `target` instead of the process default.
    pub fn target(mut self, target: &EventTarget) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Set the debounce window. Zero publishes every resize immediately.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Seed the initial size instead of probing the terminal.
    pub fn initial_size(mut self, cols: u16, rows: u16) -> Self {
        self.initial_size = Some((cols, rows));
        self
    }
}

/// Handle to a viewport tracker. Dropping it detaches the resize listener
/// and cancels any pending debounced publish.
pub struct Viewport {
    state: Signal<ViewportState>,
    _sub: Subscription,
}

impl Viewport {
    /// Snapshot of the current viewport state.
    pub fn state(&self) -> ViewportState {
        self.state.get()
    }

    /// The state signal, for reactive access.
    pub fn signal(&self) -> Signal<ViewportState> {
        self.state.clone()
    }

    /// Current (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        self.state.with(|s| (s.cols, s.rows))
    }

    /// Current width class.
    pub fn breakpoint(&self) -> Breakpoint {
        self.state.with(|s| s.breakpoint)
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport").field("state", &self.state()).finish()
    }
}

fn state_for(cols: u16, rows: u16, supported: bool) -> ViewportState {
    ViewportState {
        cols,
        rows,
        breakpoint: Breakpoint::classify(cols),
        supported,
    }
}

/// Track the terminal size, debouncing resize bursts.
pub fn use_viewport(options: ViewportOptions) -> Viewport {
    let target = options
        .target
        .unwrap_or_else(|| EventTarget::default_target().clone());

    let initial = match options.initial_size {
        Some((cols, rows)) => state_for(cols, rows, true),
        None => match crossterm::terminal::size() {
            Ok((cols, rows)) => state_for(cols, rows, true),
            Err(_) => state_for(0, 0, false),
        },
    };
    let state = Signal::new(initial);

    // Latest size seen; the debouncer publishes it at the trailing edge.
    let pending: Arc<Mutex<(u16, u16)>> = Arc::new(Mutex::new((initial.cols, initial.rows)));
    let debouncer = {
        let state = state.clone();
        let pending = Arc::clone(&pending);
        Arc::new(Debouncer::new(options.debounce, move || {
            let (cols, rows) = *pending.lock();
            state.set_if_changed(state_for(cols, rows, true));
        }))
    };

    let sub = {
        let debouncer = Arc::clone(&debouncer);
        target.subscribe(EventKind::Resize, move |event| {
            if let Event::Resize(cols, rows) = event {
                *pending.lock() = (*cols, *rows);
                debouncer.call();
            }
            EventResult::Ignored
        })
    };

    Viewport { state, _sub: sub }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_breakpoint_classification() {
        assert_eq!(Breakpoint::classify(0), Breakpoint::Xs);
        assert_eq!(Breakpoint::classify(39), Breakpoint::Xs);
        assert_eq!(Breakpoint::classify(40), Breakpoint::Sm);
        assert_eq!(Breakpoint::classify(80), Breakpoint::Md);
        assert_eq!(Breakpoint::classify(120), Breakpoint::Lg);
        assert_eq!(Breakpoint::classify(200), Breakpoint::Xl);
        assert!(Breakpoint::Xs < Breakpoint::Xl);
    }

    #[test]
    fn test_initial_size_seed() {
        let target = EventTarget::new();
        let viewport = use_viewport(
            ViewportOptions::new()
                .target(&target)
                .initial_size(100, 30),
        );
        assert_eq!(viewport.size(), (100, 30));
        assert_eq!(viewport.breakpoint(), Breakpoint::Md);
        assert!(viewport.state().supported);
    }

    #[test]
    fn test_zero_debounce_publishes_immediately() {
        let target = EventTarget::new();
        let viewport = use_viewport(
            ViewportOptions::new()
                .target(&target)
                .initial_size(80, 24)
                .debounce(Duration::ZERO),
        );

        target.dispatch(&Event::Resize(150, 40));
        assert_eq!(viewport.size(), (150, 40));
        assert_eq!(viewport.breakpoint(), Breakpoint::Lg);
    }

    #[test]
    fn test_resize_burst_debounced_to_last_value() {
        let target = EventTarget::new();
        let viewport = use_viewport(
            ViewportOptions::new()
                .target(&target)
                .initial_size(80, 24)
                .debounce(Duration::from_millis(20)),
        );

        target.dispatch(&Event::Resize(90, 24));
        target.dispatch(&Event::Resize(100, 24));
        target.dispatch(&Event::Resize(110, 24));
        // Inside the window nothing has published yet.
        assert_eq!(viewport.size(), (80, 24));

        thread::sleep(Duration::from_millis(80));
        assert_eq!(viewport.size(), (110, 24));
    }

    #[test]
    fn test_drop_cancels_pending_publish() {
        let target = EventTarget::new();
        let viewport = use_viewport(
            ViewportOptions::new()
                .target(&target)
                .initial_size(80, 24)
                .debounce(Duration::from_millis(20)),
        );
        let signal = viewport.signal();

        target.dispatch(&Event::Resize(150, 40));
        drop(viewport);

        thread::sleep(Duration::from_millis(80));
        assert_eq!(signal.with(|s| (s.cols, s.rows)), (80, 24));
    }
}
