//! Reactive hooks for terminal applications.
//!
//! `tui-hooks` brings the hooks style of state management to crossterm-based
//! terminal apps: small composable primitives that subscribe to terminal
//! events, hold state in [`Signal`](hooks::Signal)s, and clean up when
//! dropped.
//!
//! # Quick start
//!
//! ```no_run
//! use tui_hooks::hooks::{use_key_press, KeyPressOptions};
//! use tui_hooks::terminal::pump;
//! use tui_hooks::hooks::EventTarget;
//!
//! # fn main() -> std::io::Result<()> {
//! // Feed the process default target from the terminal.
//! let _pump = pump::spawn(EventTarget::default_target().clone())?;
//!
//! // Track Ctrl+S anywhere in the app.
//! let save = use_key_press(["ctrl", "s"], KeyPressOptions::new());
//! if save.is_pressed() {
//!     // persist...
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Three layers:
//!
//! - [`terminal`] — the backend-neutral event vocabulary ([`terminal::Event`],
//!   [`terminal::KeyCode`]) and the crossterm pump that produces it.
//! - [`hooks`] — the hooks themselves, from the key-combination tracker
//!   ([`hooks::use_key_press`]) down to state containers
//!   ([`hooks::use_array`], [`hooks::use_map`], [`hooks::use_set`]).
//! - [`error`] — [`error::HookError`] for the I/O edges. Hooks never return
//!   `Result`; missing capabilities degrade to `supported = false` state.
//!
//! Every hook handle is RAII: dropping it detaches listeners and stops any
//! timers it owns.

pub mod error;
pub mod hooks;
pub mod terminal;

/// Convenience re-exports for the common path.
pub mod prelude {
    pub use crate::error::HookError;
    pub use crate::hooks::{
        on_event, request_render, take_render_request, use_array, use_counter, use_interval,
        use_key_press, use_map, use_online, use_scroll, use_set, use_timeout, use_viewport,
        EventResult, EventTarget, KeyPressOptions, Signal, Subscription,
    };
    pub use crate::terminal::{Event, EventKind, KeyCode, KeyEvent, KeyModifiers};
}

pub use error::HookError;
