//! Events and their payloads.
//!
//! Every input occurrence the crate understands is represented as one [`Event`] value:
//! a small, backend-agnostic tagged union that is cheap to copy, compare and persist.
//!
//! ## Value conventions
//! - **Joystick axes:** `position` keeps the backend's nominal range of `[-100.0, 100.0]`.
//! - **Axis / mouse-button indices:** plain integers. They are only validated against the
//!   backend's symbolic enums at the native boundary (see [`crate::native`]).
//! - **Mouse coordinates:** window-client pixels, origin at the top-left corner.
//! - **Time:** [`Event::TimeElapsed`] carries wall-clock time since the previous tick at
//!   nanosecond precision.
//!
//! ### `Empty`
//! [`Event::Empty`] is what an unrecognized or ignored native event turns into. It is a
//! legitimate tick result, not an error, and it never appears in a persisted log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Backend key code.
///
/// The numbering follows the host windowing backend; the named constants below cover
/// the codes tests and demos reach for most often.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "KeyCodeRepr", into = "KeyCodeRepr")]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const UNKNOWN: KeyCode = KeyCode(-1);
    pub const A: KeyCode = KeyCode(0);
    pub const D: KeyCode = KeyCode(3);
    pub const Q: KeyCode = KeyCode(16);
    pub const S: KeyCode = KeyCode(18);
    pub const W: KeyCode = KeyCode(22);
    pub const Z: KeyCode = KeyCode(25);
    pub const NUM0: KeyCode = KeyCode(26);
    pub const NUM9: KeyCode = KeyCode(35);
    pub const ESCAPE: KeyCode = KeyCode(36);
    pub const LCONTROL: KeyCode = KeyCode(37);
    pub const LSHIFT: KeyCode = KeyCode(38);
    pub const LALT: KeyCode = KeyCode(39);
    pub const SPACE: KeyCode = KeyCode(57);
    pub const ENTER: KeyCode = KeyCode(58);
    pub const BACKSPACE: KeyCode = KeyCode(59);
    pub const TAB: KeyCode = KeyCode(60);
    pub const LEFT: KeyCode = KeyCode(71);
    pub const RIGHT: KeyCode = KeyCode(72);
    pub const UP: KeyCode = KeyCode(73);
    pub const DOWN: KeyCode = KeyCode(74);

    /// Raw backend code.
    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keycode {}", self.0)
    }
}

/// Wire form of [`KeyCode`]: `{ "keycode": <int> }`.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyCodeRepr {
    keycode: i32,
}

impl From<KeyCodeRepr> for KeyCode {
    fn from(repr: KeyCodeRepr) -> Self {
        KeyCode(repr.keycode)
    }
}

impl From<KeyCode> for KeyCodeRepr {
    fn from(key: KeyCode) -> Self {
        KeyCodeRepr { keycode: key.0 }
    }
}

/// Keyboard key transition with the modifier state at the time of the event.
///
/// Field order is the persisted order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyInput {
    pub alt: bool,
    pub control: bool,
    pub system: bool,
    pub shift: bool,
    pub key: KeyCode,
}

impl KeyInput {
    /// A key with no modifiers held.
    pub fn plain(key: KeyCode) -> Self {
        Self {
            alt: false,
            control: false,
            system: false,
            shift: false,
            key,
        }
    }
}

/// Joystick button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoystickButtonInput {
    /// Device index.
    pub id: u32,
    /// Button slot on that device.
    pub button: u32,
}

/// Joystick axis motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoystickAxisInput {
    /// Device index.
    pub id: u32,
    /// Axis slot, i.e. the integer value of the backend's axis enum.
    pub axis: u32,
    /// Nominally `[-100.0, 100.0]`.
    pub position: f32,
}

/// Cursor position in window-client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MousePosition {
    pub x: i32,
    pub y: i32,
}

impl MousePosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Mouse button transition and where it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MouseButtonInput {
    /// Button index (integer value of the backend's mouse button enum).
    pub button: i32,
    pub mouse: MousePosition,
}

/// One classified input occurrence, or its absence.
///
/// Exactly one variant is active at a time. Adding a variant means updating every
/// `match` over this type, the [`EventKind`] table and the codec.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Event {
    /// Nothing observable happened this tick.
    #[default]
    Empty,
    KeyPressed(KeyInput),
    KeyReleased(KeyInput),
    JoystickButtonPressed(JoystickButtonInput),
    JoystickButtonReleased(JoystickButtonInput),
    JoystickAxisMoved(JoystickAxisInput),
    MouseMoved(MousePosition),
    MouseButtonPressed(MouseButtonInput),
    MouseButtonReleased(MouseButtonInput),
    WindowClosed,
    /// Wall-clock time since the previous tick.
    TimeElapsed(Duration),
}

impl Event {
    /// Variant name, as used for the top-level key in a session log.
    pub fn name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "Empty",
        }
    }

    /// Loggable kind of this event; `None` for [`Event::Empty`].
    pub fn kind(&self) -> Option<EventKind> {
        let kind = match self {
            Event::Empty => return None,
            Event::KeyPressed(_) => EventKind::KeyPressed,
            Event::KeyReleased(_) => EventKind::KeyReleased,
            Event::JoystickButtonPressed(_) => EventKind::JoystickButtonPressed,
            Event::JoystickButtonReleased(_) => EventKind::JoystickButtonReleased,
            Event::JoystickAxisMoved(_) => EventKind::JoystickAxisMoved,
            Event::MouseMoved(_) => EventKind::MouseMoved,
            Event::MouseButtonPressed(_) => EventKind::MouseButtonPressed,
            Event::MouseButtonReleased(_) => EventKind::MouseButtonReleased,
            Event::WindowClosed => EventKind::WindowClosed,
            Event::TimeElapsed(_) => EventKind::TimeElapsed,
        };
        Some(kind)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Event::Empty)
    }

    #[inline]
    pub fn is_time_elapsed(&self) -> bool {
        matches!(self, Event::TimeElapsed(_))
    }

    /// True for joystick button and axis events.
    pub fn is_joystick(&self) -> bool {
        self.joystick_id().is_some()
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, Event::KeyPressed(_) | Event::KeyReleased(_))
    }

    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            Event::MouseMoved(_) | Event::MouseButtonPressed(_) | Event::MouseButtonReleased(_)
        )
    }

    /// Device index of a joystick event.
    pub fn joystick_id(&self) -> Option<u32> {
        match self {
            Event::JoystickButtonPressed(b) | Event::JoystickButtonReleased(b) => Some(b.id),
            Event::JoystickAxisMoved(a) => Some(a.id),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Empty | Event::WindowClosed => f.write_str(self.name()),
            Event::KeyPressed(k) | Event::KeyReleased(k) => {
                write!(f, "{}({})", self.name(), k.key)
            }
            Event::JoystickButtonPressed(b) | Event::JoystickButtonReleased(b) => {
                write!(f, "{}(js{} button {})", self.name(), b.id, b.button)
            }
            Event::JoystickAxisMoved(a) => {
                write!(f, "{}(js{} axis {} = {:.2})", self.name(), a.id, a.axis, a.position)
            }
            Event::MouseMoved(p) => write!(f, "{}({}, {})", self.name(), p.x, p.y),
            Event::MouseButtonPressed(b) | Event::MouseButtonReleased(b) => {
                write!(f, "{}(button {} at {}, {})", self.name(), b.button, b.mouse.x, b.mouse.y)
            }
            Event::TimeElapsed(elapsed) => write!(f, "{}({:?})", self.name(), elapsed),
        }
    }
}

/// The loggable event variants, in their declared order.
///
/// The order of [`EventKind::ALL`] is part of the log format: decoding resolves a log
/// entry's top-level key by scanning this table front to back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPressed,
    KeyReleased,
    JoystickButtonPressed,
    JoystickButtonReleased,
    JoystickAxisMoved,
    MouseMoved,
    MouseButtonPressed,
    MouseButtonReleased,
    WindowClosed,
    TimeElapsed,
}

const KEY_FIELDS: &[&str] = &["alt", "control", "system", "shift", "key"];
const JOYSTICK_BUTTON_FIELDS: &[&str] = &["id", "button"];
const JOYSTICK_AXIS_FIELDS: &[&str] = &["id", "axis", "position"];
const MOUSE_FIELDS: &[&str] = &["x", "y"];
const MOUSE_BUTTON_FIELDS: &[&str] = &["button", "mouse"];
const TIME_FIELDS: &[&str] = &["elapsed"];

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::KeyPressed,
        EventKind::KeyReleased,
        EventKind::JoystickButtonPressed,
        EventKind::JoystickButtonReleased,
        EventKind::JoystickAxisMoved,
        EventKind::MouseMoved,
        EventKind::MouseButtonPressed,
        EventKind::MouseButtonReleased,
        EventKind::WindowClosed,
        EventKind::TimeElapsed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::KeyPressed => "KeyPressed",
            EventKind::KeyReleased => "KeyReleased",
            EventKind::JoystickButtonPressed => "JoystickButtonPressed",
            EventKind::JoystickButtonReleased => "JoystickButtonReleased",
            EventKind::JoystickAxisMoved => "JoystickAxisMoved",
            EventKind::MouseMoved => "MouseMoved",
            EventKind::MouseButtonPressed => "MouseButtonPressed",
            EventKind::MouseButtonReleased => "MouseButtonReleased",
            EventKind::WindowClosed => "WindowClosed",
            EventKind::TimeElapsed => "TimeElapsed",
        }
    }

    /// Declared field names, in persisted order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            EventKind::KeyPressed | EventKind::KeyReleased => KEY_FIELDS,
            EventKind::JoystickButtonPressed | EventKind::JoystickButtonReleased => {
                JOYSTICK_BUTTON_FIELDS
            }
            EventKind::JoystickAxisMoved => JOYSTICK_AXIS_FIELDS,
            EventKind::MouseMoved => MOUSE_FIELDS,
            EventKind::MouseButtonPressed | EventKind::MouseButtonReleased => MOUSE_BUTTON_FIELDS,
            EventKind::WindowClosed => &[],
            EventKind::TimeElapsed => TIME_FIELDS,
        }
    }

    /// Resolve a variant name. Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<EventKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
