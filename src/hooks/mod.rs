//! Reactive hooks.
//!
//! Each hook is a small, self-contained adapter with the same shape:
//! subscribe to an event source (or wrap a native collection), expose
//! reactive state through a [`Signal`], clean up on drop.
//!
//! # Core Concepts
//!
//! ## Signals
//!
//! [`Signal<T>`] holds a value that can be read and written; writes bump a
//! version counter and raise the render-request flag so a host render loop
//! knows something changed.
//!
//! ```
//! use tui_hooks::hooks::Signal;
//!
//! let count = Signal::new(0);
//! count.set(42);
//! count.update(|c| *c += 1);
//! assert_eq!(count.get(), 43);
//! ```
//!
//! ## Event targets
//!
//! An [`EventTarget`] is the dispatch surface hooks listen on. The terminal
//! event pump feeds the process default target
//! ([`EventTarget::default_target`]); tests and embedders can construct
//! private targets and dispatch synthetic events.
//!
//! ```
//! use tui_hooks::hooks::{on_key_down, EventResult, EventTarget};
//! use tui_hooks::terminal::{Event, KeyCode, KeyEvent};
//!
//! let target = EventTarget::new();
//! let sub = on_key_down(&target, |event| {
//!     if let Event::KeyDown(key) = event {
//!         if key.code == KeyCode::Enter {
//!             return EventResult::Consumed;
//!         }
//!     }
//!     EventResult::Ignored
//! });
//!
//! target.dispatch(&Event::KeyDown(KeyEvent::new(KeyCode::Enter)));
//! drop(sub); // detaches
//! ```
//!
//! ## Key combinations
//!
//! [`use_key_press`] tracks a key or combination with normalization, locale
//! key mapping, and a live hold duration:
//!
//! ```
//! use tui_hooks::hooks::{use_key_press, EventTarget, KeyPressOptions};
//! use tui_hooks::terminal::{Event, KeyCode, KeyEvent};
//!
//! let target = EventTarget::new();
//! let save = use_key_press(["Control", "s"], KeyPressOptions::new().target(&target));
//!
//! target.dispatch(&Event::KeyDown(KeyEvent::new(KeyCode::Ctrl)));
//! target.dispatch(&Event::KeyDown(KeyEvent::new(KeyCode::Char('s'))));
//! assert!(save.is_pressed());
//! ```
//!
//! # Available Hooks
//!
//! | Hook | Purpose |
//! |------|---------|
//! | [`use_key_press`] | Track a key or key combination |
//! | [`on_event`] / `on_*` | Attach raw event listeners |
//! | [`use_interval`] | Periodic callbacks |
//! | [`use_timeout`] | One-shot callbacks |
//! | [`use_array`] | Array state container |
//! | [`use_map`] | Map state container |
//! | [`use_set`] | Set state container |
//! | [`use_counter`] | Bounded counter |
//! | [`use_viewport`] | Terminal size + breakpoints |
//! | [`use_scroll`] | Scroll offset |
//! | [`use_online`] | Connectivity flag |

mod collections;
mod counter;
mod interval;
mod keypress;
mod listener;
mod online;
mod scroll;
mod signal;
mod viewport;

pub use collections::{use_array, use_map, use_set, ArrayState, MapState, SetState};
pub use counter::{use_counter, Counter, CounterOptions};
pub use interval::{
    use_interval, use_timeout, Debouncer, IntervalHandle, Throttler, TimeoutHandle,
};
pub use keypress::{
    normalize_key, use_key_press, KeyMappings, KeyPress, KeyPressOptions, KeyPressState, KeySpec,
    HOLD_SAMPLE_PERIOD,
};
pub use listener::{
    on_click, on_event, on_focus_change, on_key_down, on_key_up, on_mouse_down, on_mouse_move,
    on_mouse_up, on_paste, on_resize, on_scroll, EventHandler, EventResult, EventTarget,
    Subscription,
};
pub use online::{use_online, Online, OnlineOptions, OnlineProbe, OnlineState};
pub use scroll::{use_scroll, Scroll, ScrollDirection, ScrollOptions, ScrollState};
pub use signal::{request_render, take_render_request, Signal};
pub use viewport::{use_viewport, Breakpoint, Viewport, ViewportOptions, ViewportState};

// Re-export the event vocabulary alongside the hooks that consume it.
pub use crate::terminal::{Event, EventKind, KeyCode, KeyEvent, KeyModifiers};
