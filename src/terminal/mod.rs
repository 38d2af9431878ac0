//! Terminal event vocabulary and the crossterm event pump.
//!
//! [`Event`] is the crate's backend-neutral event type; hooks never see raw
//! crossterm events. The [`pump`] module bridges the two: it reads from
//! crossterm and dispatches converted events into an
//! [`EventTarget`](crate::hooks::EventTarget).

mod events;
pub mod pump;

pub use events::{
    Event, EventKind, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
