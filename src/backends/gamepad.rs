//! `gilrs` gamepad backend.
//!
//! Exposes gamepads seen by `gilrs` as a joystick-only [`InputBackend`]. There is no
//! window, so [`set_cursor_position`](InputBackend::set_cursor_position) is a no-op and
//! no keyboard/mouse events are produced.
//!
//! # Channel conventions
//! Buttons are mapped to stable slots in the order of [`BUTTONS`]. Axes are mapped to
//! [`JoystickAxis`] slots:
//! - `X`/`Y`: left stick, `U`/`V`: right stick
//! - `Z`/`R`: left/right analog trigger
//! - `PovX`/`PovY`: D-pad
//!
//! `gilrs` reports `[-1, 1]`; positions are scaled to `[-100, 100]`.

use crate::backends::{InputBackend, JoystickQuery};
use crate::native::{JoystickAxis, JoystickButtonEvent, JoystickMoveEvent, NativeEvent};
use gilrs::{Axis, Button, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info};

/// Button slot order.
pub const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

const AXIS_SCALE: f32 = 100.0;

fn button_slot(button: Button) -> Option<u32> {
    BUTTONS.iter().position(|b| *b == button).map(|i| i as u32)
}

fn axis_for(axis: Axis) -> Option<JoystickAxis> {
    match axis {
        Axis::LeftStickX => Some(JoystickAxis::X),
        Axis::LeftStickY => Some(JoystickAxis::Y),
        Axis::LeftZ => Some(JoystickAxis::Z),
        Axis::RightZ => Some(JoystickAxis::R),
        Axis::RightStickX => Some(JoystickAxis::U),
        Axis::RightStickY => Some(JoystickAxis::V),
        Axis::DPadX => Some(JoystickAxis::PovX),
        Axis::DPadY => Some(JoystickAxis::PovY),
        _ => None,
    }
}

fn gilrs_axis(axis: JoystickAxis) -> Axis {
    match axis {
        JoystickAxis::X => Axis::LeftStickX,
        JoystickAxis::Y => Axis::LeftStickY,
        JoystickAxis::Z => Axis::LeftZ,
        JoystickAxis::R => Axis::RightZ,
        JoystickAxis::U => Axis::RightStickX,
        JoystickAxis::V => Axis::RightStickY,
        JoystickAxis::PovX => Axis::DPadX,
        JoystickAxis::PovY => Axis::DPadY,
    }
}

/// Live gamepad input via `gilrs`.
pub struct GilrsBackend {
    gilrs: Gilrs,
}

impl GilrsBackend {
    pub fn new() -> crate::Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            crate::Error::Backend(e.to_string())
        })?;

        for (id, gamepad) in gilrs.gamepads() {
            info!("Found gamepad {}: {}", usize::from(id), gamepad.name());
        }

        Ok(Self { gilrs })
    }

    fn gamepad(&self, id: u32) -> Option<Gamepad<'_>> {
        self.gilrs
            .gamepads()
            .find(|(gid, _)| usize::from(*gid) == id as usize)
            .map(|(_, gamepad)| gamepad)
    }

    fn convert(id: GamepadId, event: EventType) -> Option<NativeEvent> {
        let joystick_id = usize::from(id) as u32;
        match event {
            EventType::ButtonPressed(button, _) => {
                button_slot(button).map(|button| {
                    NativeEvent::JoystickButtonPressed(JoystickButtonEvent {
                        joystick_id,
                        button,
                    })
                })
            }
            EventType::ButtonReleased(button, _) => {
                button_slot(button).map(|button| {
                    NativeEvent::JoystickButtonReleased(JoystickButtonEvent {
                        joystick_id,
                        button,
                    })
                })
            }
            EventType::AxisChanged(axis, value, _) => axis_for(axis).map(|axis| {
                NativeEvent::JoystickMoved(JoystickMoveEvent {
                    joystick_id,
                    axis,
                    position: value * AXIS_SCALE,
                })
            }),
            EventType::Connected => Some(NativeEvent::JoystickConnected { joystick_id }),
            EventType::Disconnected => Some(NativeEvent::JoystickDisconnected { joystick_id }),
            _ => None,
        }
    }
}

impl JoystickQuery for GilrsBackend {
    fn button_count(&mut self, id: u32) -> u32 {
        match self.gamepad(id) {
            Some(gamepad) if gamepad.is_connected() => BUTTONS.len() as u32,
            _ => 0,
        }
    }

    fn is_button_pressed(&mut self, id: u32, button: u32) -> bool {
        let Some(button) = BUTTONS.get(button as usize) else {
            return false;
        };
        self.gamepad(id).is_some_and(|gamepad| gamepad.is_pressed(*button))
    }

    fn axis_position(&mut self, id: u32, axis: u32) -> f32 {
        let Some(axis) = JoystickAxis::from_index(axis) else {
            return 0.0;
        };
        self.gamepad(id)
            .map_or(0.0, |gamepad| gamepad.value(gilrs_axis(axis)) * AXIS_SCALE)
    }
}

impl InputBackend for GilrsBackend {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        while let Some(event) = self.gilrs.next_event() {
            debug!("gilrs event: {:?}", event.event);
            if let Some(native) = Self::convert(event.id, event.event) {
                return Some(native);
            }
        }
        None
    }

    fn set_cursor_position(&mut self, _x: i32, _y: i32) {}
}
