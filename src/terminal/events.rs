//! Event types for the hook surface.
//!
//! These mirror the browser's event vocabulary (key down/up, mouse, resize,
//! focus, paste) on top of crossterm's terminal events. Hooks subscribe to an
//! [`EventKind`] on an event target and receive [`Event`] values.

use bitflags::bitflags;
use std::borrow::Cow;

bitflags! {
    /// Modifier keys held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0001;
        /// Control key.
        const CTRL = 0b0010;
        /// Alt/Option key.
        const ALT = 0b0100;
        /// Super/Command/Windows key.
        const SUPER = 0b1000;
    }
}

/// A key on the keyboard.
///
/// Modifier keys are first-class codes so that their press/release can be
/// tracked like any other key (required for combinations such as Ctrl+S).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A unicode character key.
    Char(char),
    /// Enter/Return.
    Enter,
    /// Escape.
    Esc,
    /// Tab.
    Tab,
    /// Shift+Tab.
    BackTab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Function key (F1-F24).
    F(u8),
    /// Control (either side).
    Ctrl,
    /// Alt/Option (either side).
    Alt,
    /// Shift (either side).
    Shift,
    /// Super/Command/Windows (either side).
    Super,
}

impl KeyCode {
    /// Canonical lower-case name of the key, as used by the key-press
    /// tracker's target lists: `"a"`, `"enter"`, `"ctrl"`, `"f5"`, `"space"`.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Char(' ') => Cow::Borrowed("space"),
            Self::Char(c) => Cow::Owned(c.to_lowercase().collect()),
            Self::Enter => Cow::Borrowed("enter"),
            Self::Esc => Cow::Borrowed("escape"),
            Self::Tab => Cow::Borrowed("tab"),
            Self::BackTab => Cow::Borrowed("backtab"),
            Self::Backspace => Cow::Borrowed("backspace"),
            Self::Delete => Cow::Borrowed("delete"),
            Self::Insert => Cow::Borrowed("insert"),
            Self::Home => Cow::Borrowed("home"),
            Self::End => Cow::Borrowed("end"),
            Self::PageUp => Cow::Borrowed("pageup"),
            Self::PageDown => Cow::Borrowed("pagedown"),
            Self::Up => Cow::Borrowed("up"),
            Self::Down => Cow::Borrowed("down"),
            Self::Left => Cow::Borrowed("left"),
            Self::Right => Cow::Borrowed("right"),
            Self::F(n) => Cow::Owned(format!("f{n}")),
            Self::Ctrl => Cow::Borrowed("ctrl"),
            Self::Alt => Cow::Borrowed("alt"),
            Self::Shift => Cow::Borrowed("shift"),
            Self::Super => Cow::Borrowed("super"),
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that changed state.
    pub code: KeyCode,
    /// Modifiers held at the time of the event.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Attach modifiers.
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button.
    Middle,
}

/// What a mouse event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Pointer moved with no button held.
    Moved,
    /// Pointer moved with a button held.
    Drag(MouseButton),
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
    /// Scroll wheel left.
    ScrollLeft,
    /// Scroll wheel right.
    ScrollRight,
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Kind of mouse event.
    pub kind: MouseEventKind,
    /// Column (0-based).
    pub column: u16,
    /// Row (0-based).
    pub row: u16,
    /// Modifiers held at the time of the event.
    pub modifiers: KeyModifiers,
}

/// An event delivered to listeners on an event target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// A key was pressed (or auto-repeated by the OS).
    KeyDown(KeyEvent),
    /// A key was released.
    KeyUp(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// The terminal gained focus.
    FocusGained,
    /// The terminal lost focus.
    FocusLost,
    /// Bracketed paste.
    Paste(String),
}

/// Discriminant used for listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Key press.
    KeyDown,
    /// Key release.
    KeyUp,
    /// Mouse button press.
    MouseDown,
    /// Mouse button release.
    MouseUp,
    /// Mouse movement (with or without a held button).
    MouseMove,
    /// Scroll wheel.
    Scroll,
    /// Terminal resize.
    Resize,
    /// Focus gained or lost.
    FocusChange,
    /// Bracketed paste.
    Paste,
}

impl Event {
    /// The [`EventKind`] listeners for this event are registered under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::Mouse(m) => match m.kind {
                MouseEventKind::Down(_) => EventKind::MouseDown,
                MouseEventKind::Up(_) => EventKind::MouseUp,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => EventKind::MouseMove,
                MouseEventKind::ScrollUp
                | MouseEventKind::ScrollDown
                | MouseEventKind::ScrollLeft
                | MouseEventKind::ScrollRight => EventKind::Scroll,
            },
            Self::Resize(..) => EventKind::Resize,
            Self::FocusGained | Self::FocusLost => EventKind::FocusChange,
            Self::Paste(_) => EventKind::Paste,
        }
    }

    /// Convert a crossterm event. Returns `None` for events with no hook
    /// counterpart (e.g. media keys). OS key-repeat maps onto `KeyDown`; the
    /// key-press tracker's held-set makes repeats no-ops.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::{Event as Ct, KeyEventKind as CtKind};
        match event {
            Ct::Key(key) => {
                let code = convert_key_code(key.code)?;
                let ev = KeyEvent {
                    code,
                    modifiers: convert_modifiers(key.modifiers),
                };
                match key.kind {
                    CtKind::Press | CtKind::Repeat => Some(Self::KeyDown(ev)),
                    CtKind::Release => Some(Self::KeyUp(ev)),
                }
            }
            Ct::Mouse(mouse) => {
                let kind = convert_mouse_kind(mouse.kind)?;
                Some(Self::Mouse(MouseEvent {
                    kind,
                    column: mouse.column,
                    row: mouse.row,
                    modifiers: convert_modifiers(mouse.modifiers),
                }))
            }
            Ct::Resize(cols, rows) => Some(Self::Resize(cols, rows)),
            Ct::FocusGained => Some(Self::FocusGained),
            Ct::FocusLost => Some(Self::FocusLost),
            Ct::Paste(text) => Some(Self::Paste(text)),
        }
    }
}

fn convert_key_code(code: crossterm::event::KeyCode) -> Option<KeyCode> {
    use crossterm::event::{KeyCode as Ct, ModifierKeyCode as Mk};
    Some(match code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::Enter => KeyCode::Enter,
        Ct::Esc => KeyCode::Esc,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Backspace => KeyCode::Backspace,
        Ct::Delete => KeyCode::Delete,
        Ct::Insert => KeyCode::Insert,
        Ct::Home => KeyCode::Home,
        Ct::End => KeyCode::End,
        Ct::PageUp => KeyCode::PageUp,
        Ct::PageDown => KeyCode::PageDown,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::F(n) => KeyCode::F(n),
        Ct::Modifier(m) => match m {
            Mk::LeftControl | Mk::RightControl => KeyCode::Ctrl,
            Mk::LeftAlt | Mk::RightAlt => KeyCode::Alt,
            Mk::LeftShift | Mk::RightShift => KeyCode::Shift,
            Mk::LeftSuper | Mk::RightSuper | Mk::LeftMeta | Mk::RightMeta | Mk::LeftHyper
            | Mk::RightHyper => KeyCode::Super,
            _ => return None,
        },
        _ => return None,
    })
}

fn convert_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as Ct;
    let mut out = KeyModifiers::empty();
    if modifiers.contains(Ct::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(Ct::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if modifiers.contains(Ct::ALT) {
        out |= KeyModifiers::ALT;
    }
    if modifiers.contains(Ct::SUPER) {
        out |= KeyModifiers::SUPER;
    }
    out
}

fn convert_mouse_kind(kind: crossterm::event::MouseEventKind) -> Option<MouseEventKind> {
    use crossterm::event::MouseEventKind as Ct;
    Some(match kind {
        Ct::Down(b) => MouseEventKind::Down(convert_button(b)),
        Ct::Up(b) => MouseEventKind::Up(convert_button(b)),
        Ct::Drag(b) => MouseEventKind::Drag(convert_button(b)),
        Ct::Moved => MouseEventKind::Moved,
        Ct::ScrollUp => MouseEventKind::ScrollUp,
        Ct::ScrollDown => MouseEventKind::ScrollDown,
        Ct::ScrollLeft => MouseEventKind::ScrollLeft,
        Ct::ScrollRight => MouseEventKind::ScrollRight,
    })
}

fn convert_button(button: crossterm::event::MouseButton) -> MouseButton {
    use crossterm::event::MouseButton as Ct;
    match button {
        Ct::Left => MouseButton::Left,
        Ct::Right => MouseButton::Right,
        Ct::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_canonical() {
        assert_eq!(KeyCode::Char('A').name(), "a");
        assert_eq!(KeyCode::Char(' ').name(), "space");
        assert_eq!(KeyCode::Enter.name(), "enter");
        assert_eq!(KeyCode::Ctrl.name(), "ctrl");
        assert_eq!(KeyCode::F(5).name(), "f5");
    }

    #[test]
    fn test_key_name_non_latin() {
        assert_eq!(KeyCode::Char('ㅁ').name(), "ㅁ");
    }

    #[test]
    fn test_event_kind_mapping() {
        let down = Event::KeyDown(KeyEvent::new(KeyCode::Enter));
        assert_eq!(down.kind(), EventKind::KeyDown);

        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        });
        assert_eq!(scroll.kind(), EventKind::Scroll);

        assert_eq!(Event::Resize(80, 24).kind(), EventKind::Resize);
        assert_eq!(Event::FocusLost.kind(), EventKind::FocusChange);
    }

    #[test]
    fn test_from_crossterm_repeat_is_keydown() {
        use crossterm::event::{
            Event as Ct, KeyCode as CtCode, KeyEvent as CtKey, KeyEventKind, KeyEventState,
            KeyModifiers as CtMods,
        };
        let repeat = Ct::Key(CtKey {
            code: CtCode::Char('a'),
            modifiers: CtMods::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        });
        let converted = Event::from_crossterm(repeat).unwrap();
        assert_eq!(converted.kind(), EventKind::KeyDown);
    }
}
