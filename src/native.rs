//! Native event records and their translation to and from [`Event`].
//!
//! [`NativeEvent`] mirrors what a windowing/input backend hands out from its event
//! queue. The crate never owns a backend; it only classifies these records
//! ([`from_native`]) and, for presentation layers that only understand native events,
//! re-encodes replayed events ([`to_native`]).
//!
//! Both directions are pure. Symbolic enums ([`JoystickAxis`], [`MouseButton`]) only
//! exist on this side of the boundary; the event model stores their integer values.

use crate::event::{
    Event, JoystickAxisInput, JoystickButtonInput, KeyCode, KeyInput, MouseButtonInput,
    MousePosition,
};
use std::fmt;
use tracing::debug;

/// Joystick axis as named by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoystickAxis {
    X,
    Y,
    Z,
    R,
    U,
    V,
    PovX,
    PovY,
}

impl JoystickAxis {
    /// Number of axes the backend can name.
    pub const COUNT: u32 = 8;

    pub const ALL: [JoystickAxis; 8] = [
        JoystickAxis::X,
        JoystickAxis::Y,
        JoystickAxis::Z,
        JoystickAxis::R,
        JoystickAxis::U,
        JoystickAxis::V,
        JoystickAxis::PovX,
        JoystickAxis::PovY,
    ];

    /// Validate an axis slot.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            JoystickAxis::X => "X",
            JoystickAxis::Y => "Y",
            JoystickAxis::Z => "Z",
            JoystickAxis::R => "R",
            JoystickAxis::U => "U",
            JoystickAxis::V => "V",
            JoystickAxis::PovX => "PovX",
            JoystickAxis::PovY => "PovY",
        }
    }
}

impl fmt::Display for JoystickAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mouse button as named by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    XButton1,
    XButton2,
}

impl MouseButton {
    pub const COUNT: i32 = 5;

    /// Validate a mouse button index.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Right),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::XButton1),
            4 => Some(MouseButton::XButton2),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> i32 {
        self as i32
    }
}

/// Which wheel a scroll came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseWheel {
    Vertical,
    Horizontal,
}

/// Key transition payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub alt: bool,
    pub control: bool,
    pub shift: bool,
    pub system: bool,
}

/// Mouse button payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
}

/// Joystick button payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JoystickButtonEvent {
    pub joystick_id: u32,
    pub button: u32,
}

/// Joystick axis payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickMoveEvent {
    pub joystick_id: u32,
    pub axis: JoystickAxis,
    pub position: f32,
}

/// One record from the backend's event queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeEvent {
    Closed,
    Resized { width: u32, height: u32 },
    LostFocus,
    GainedFocus,
    TextEntered { unicode: char },
    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),
    MouseWheelScrolled { wheel: MouseWheel, delta: f32, x: i32, y: i32 },
    MouseButtonPressed(MouseButtonEvent),
    MouseButtonReleased(MouseButtonEvent),
    MouseMoved { x: i32, y: i32 },
    MouseEntered,
    MouseLeft,
    JoystickButtonPressed(JoystickButtonEvent),
    JoystickButtonReleased(JoystickButtonEvent),
    JoystickMoved(JoystickMoveEvent),
    JoystickConnected { joystick_id: u32 },
    JoystickDisconnected { joystick_id: u32 },
    TouchBegan { finger: u32, x: i32, y: i32 },
    TouchMoved { finger: u32, x: i32, y: i32 },
    TouchEnded { finger: u32, x: i32, y: i32 },
}

fn key_input(key: &KeyEvent) -> KeyInput {
    KeyInput {
        alt: key.alt,
        control: key.control,
        system: key.system,
        shift: key.shift,
        key: key.code,
    }
}

fn key_event(key: &KeyInput) -> KeyEvent {
    KeyEvent {
        code: key.key,
        alt: key.alt,
        control: key.control,
        shift: key.shift,
        system: key.system,
    }
}

fn mouse_button_input(mouse: &MouseButtonEvent) -> MouseButtonInput {
    MouseButtonInput {
        button: mouse.button.index(),
        mouse: MousePosition::new(mouse.x, mouse.y),
    }
}

fn mouse_button_event(mouse: &MouseButtonInput) -> Option<MouseButtonEvent> {
    let Some(button) = MouseButton::from_index(mouse.button) else {
        debug!(button = mouse.button, "mouse button has no native encoding");
        return None;
    };
    Some(MouseButtonEvent {
        button,
        x: mouse.mouse.x,
        y: mouse.mouse.y,
    })
}

fn joystick_button_input(joy: &JoystickButtonEvent) -> JoystickButtonInput {
    JoystickButtonInput {
        id: joy.joystick_id,
        button: joy.button,
    }
}

fn joystick_button_event(joy: &JoystickButtonInput) -> JoystickButtonEvent {
    JoystickButtonEvent {
        joystick_id: joy.id,
        button: joy.button,
    }
}

/// Classify a native event.
///
/// Total: every kind not listed below (focus, resize, text, wheel, enter/leave,
/// connect/disconnect, touch) becomes [`Event::Empty`].
pub fn from_native(native: &NativeEvent) -> Event {
    match native {
        NativeEvent::Closed => Event::WindowClosed,
        NativeEvent::KeyPressed(key) => Event::KeyPressed(key_input(key)),
        NativeEvent::KeyReleased(key) => Event::KeyReleased(key_input(key)),
        NativeEvent::MouseMoved { x, y } => Event::MouseMoved(MousePosition::new(*x, *y)),
        NativeEvent::MouseButtonPressed(mouse) => {
            Event::MouseButtonPressed(mouse_button_input(mouse))
        }
        NativeEvent::MouseButtonReleased(mouse) => {
            Event::MouseButtonReleased(mouse_button_input(mouse))
        }
        NativeEvent::JoystickButtonPressed(joy) => {
            Event::JoystickButtonPressed(joystick_button_input(joy))
        }
        NativeEvent::JoystickButtonReleased(joy) => {
            Event::JoystickButtonReleased(joystick_button_input(joy))
        }
        NativeEvent::JoystickMoved(joy) => Event::JoystickAxisMoved(JoystickAxisInput {
            id: joy.joystick_id,
            axis: joy.axis.index(),
            position: joy.position,
        }),
        NativeEvent::Resized { .. }
        | NativeEvent::LostFocus
        | NativeEvent::GainedFocus
        | NativeEvent::TextEntered { .. }
        | NativeEvent::MouseWheelScrolled { .. }
        | NativeEvent::MouseEntered
        | NativeEvent::MouseLeft
        | NativeEvent::JoystickConnected { .. }
        | NativeEvent::JoystickDisconnected { .. }
        | NativeEvent::TouchBegan { .. }
        | NativeEvent::TouchMoved { .. }
        | NativeEvent::TouchEnded { .. } => Event::Empty,
    }
}

/// Re-encode an event as a native record.
///
/// `TimeElapsed` and `Empty` have no native form. Neither does an event whose axis or
/// mouse-button index is outside the backend's enum.
pub fn to_native(event: &Event) -> Option<NativeEvent> {
    match event {
        Event::Empty | Event::TimeElapsed(_) => None,
        Event::WindowClosed => Some(NativeEvent::Closed),
        Event::KeyPressed(key) => Some(NativeEvent::KeyPressed(key_event(key))),
        Event::KeyReleased(key) => Some(NativeEvent::KeyReleased(key_event(key))),
        Event::MouseMoved(pos) => Some(NativeEvent::MouseMoved { x: pos.x, y: pos.y }),
        Event::MouseButtonPressed(mouse) => {
            mouse_button_event(mouse).map(NativeEvent::MouseButtonPressed)
        }
        Event::MouseButtonReleased(mouse) => {
            mouse_button_event(mouse).map(NativeEvent::MouseButtonReleased)
        }
        Event::JoystickButtonPressed(joy) => {
            Some(NativeEvent::JoystickButtonPressed(joystick_button_event(joy)))
        }
        Event::JoystickButtonReleased(joy) => {
            Some(NativeEvent::JoystickButtonReleased(joystick_button_event(joy)))
        }
        Event::JoystickAxisMoved(joy) => {
            let Some(axis) = JoystickAxis::from_index(joy.axis) else {
                debug!(axis = joy.axis, "joystick axis has no native encoding");
                return None;
            };
            Some(NativeEvent::JoystickMoved(JoystickMoveEvent {
                joystick_id: joy.id,
                axis,
                position: joy.position,
            }))
        }
    }
}

impl From<NativeEvent> for Event {
    fn from(native: NativeEvent) -> Self {
        from_native(&native)
    }
}

impl From<&NativeEvent> for Event {
    fn from(native: &NativeEvent) -> Self {
        from_native(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_events() -> Vec<Event> {
        let key = KeyInput {
            alt: true,
            control: false,
            system: true,
            shift: false,
            key: KeyCode::W,
        };
        vec![
            Event::KeyPressed(key),
            Event::KeyReleased(KeyInput::plain(KeyCode::ESCAPE)),
            Event::JoystickButtonPressed(JoystickButtonInput { id: 0, button: 2 }),
            Event::JoystickButtonReleased(JoystickButtonInput { id: 1, button: 7 }),
            Event::JoystickAxisMoved(JoystickAxisInput {
                id: 0,
                axis: JoystickAxis::PovY.index(),
                position: -100.0,
            }),
            Event::MouseMoved(MousePosition::new(-4, 300)),
            Event::MouseButtonPressed(MouseButtonInput {
                button: MouseButton::Right.index(),
                mouse: MousePosition::new(10, 20),
            }),
            Event::MouseButtonReleased(MouseButtonInput {
                button: MouseButton::XButton2.index(),
                mouse: MousePosition::new(0, 0),
            }),
            Event::WindowClosed,
        ]
    }

    #[test]
    fn translation_is_stable_for_encodable_events() {
        for event in sample_events() {
            let native = to_native(&event).expect("event has a native encoding");
            assert_eq!(from_native(&native), event, "via {native:?}");
        }
    }

    #[test]
    fn time_and_empty_have_no_native_form() {
        assert_eq!(to_native(&Event::Empty), None);
        assert_eq!(to_native(&Event::TimeElapsed(Duration::from_millis(16))), None);
    }

    #[test]
    fn unmapped_native_kinds_become_empty() {
        let unmapped = [
            NativeEvent::Resized { width: 640, height: 480 },
            NativeEvent::LostFocus,
            NativeEvent::GainedFocus,
            NativeEvent::TextEntered { unicode: 'x' },
            NativeEvent::MouseWheelScrolled {
                wheel: MouseWheel::Vertical,
                delta: 1.0,
                x: 3,
                y: 4,
            },
            NativeEvent::MouseEntered,
            NativeEvent::MouseLeft,
            NativeEvent::JoystickConnected { joystick_id: 0 },
            NativeEvent::JoystickDisconnected { joystick_id: 0 },
            NativeEvent::TouchBegan { finger: 0, x: 1, y: 1 },
            NativeEvent::TouchMoved { finger: 0, x: 2, y: 2 },
            NativeEvent::TouchEnded { finger: 0, x: 2, y: 2 },
        ];
        for native in unmapped {
            assert_eq!(Event::from(native), Event::Empty, "{native:?}");
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected_at_the_boundary() {
        let axis = Event::JoystickAxisMoved(JoystickAxisInput {
            id: 0,
            axis: JoystickAxis::COUNT,
            position: 1.0,
        });
        assert_eq!(to_native(&axis), None);

        let mouse = Event::MouseButtonPressed(MouseButtonInput {
            button: MouseButton::COUNT,
            mouse: MousePosition::default(),
        });
        assert_eq!(to_native(&mouse), None);
    }

    #[test]
    fn axis_names() {
        assert_eq!(JoystickAxis::from_index(6), Some(JoystickAxis::PovX));
        assert_eq!(JoystickAxis::PovX.to_string(), "PovX");
        assert_eq!(JoystickAxis::ALL.len() as u32, JoystickAxis::COUNT);
    }
}
