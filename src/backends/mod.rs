//! Input backends.
//!
//! The crate consumes a windowing/input backend through two traits:
//! - [`JoystickQuery`]: direct joystick state queries, used by the
//!   [`JoystickCache`](crate::joystick::JoystickCache) for discovery and refresh;
//! - [`InputBackend`]: the event queue, cursor warping and the monotonic clock, used by
//!   the [`ReplayDriver`](crate::driver::ReplayDriver).
//!
//! # Feature flags
//! - **`gamepad`**: enables [`GilrsBackend`](gamepad::GilrsBackend), a joystick-only live backend
//!   built on `gilrs`.
//!
//! [`VirtualBackend`](virtual_input::VirtualBackend) is always available. It is scripted
//! in memory and drives a manual clock, which makes it the backend of choice for tests
//! and headless replay.

use crate::native::{JoystickAxis, NativeEvent};
use std::time::{Duration, Instant};

#[cfg(feature = "gamepad")]
#[cfg_attr(docsrs, doc(cfg(feature = "gamepad")))]
pub mod gamepad;
pub mod virtual_input;

pub use virtual_input::VirtualBackend;

/// Joystick state queries.
pub trait JoystickQuery {
    /// Number of buttons device `id` supports. `0` when nothing is attached.
    fn button_count(&mut self, id: u32) -> u32;

    /// Number of axis slots device `id` exposes.
    fn axis_count(&mut self, _id: u32) -> u32 {
        JoystickAxis::COUNT
    }

    fn is_button_pressed(&mut self, id: u32, button: u32) -> bool;

    /// Axis position in `[-100.0, 100.0]`.
    fn axis_position(&mut self, id: u32, axis: u32) -> f32;

    /// Called once before a bulk refresh so the backend can resample hardware.
    fn update(&mut self) {}
}

/// Live input source.
pub trait InputBackend: JoystickQuery {
    /// Next pending native event, if any. Must not block.
    fn poll_event(&mut self) -> Option<NativeEvent>;

    /// Warp the cursor to window-client coordinates.
    fn set_cursor_position(&mut self, x: i32, y: i32);

    /// Monotonic clock.
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Wait for `duration`. Only used when pacing a replay.
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<B: JoystickQuery + ?Sized> JoystickQuery for Box<B> {
    fn button_count(&mut self, id: u32) -> u32 {
        (**self).button_count(id)
    }

    fn axis_count(&mut self, id: u32) -> u32 {
        (**self).axis_count(id)
    }

    fn is_button_pressed(&mut self, id: u32, button: u32) -> bool {
        (**self).is_button_pressed(id, button)
    }

    fn axis_position(&mut self, id: u32, axis: u32) -> f32 {
        (**self).axis_position(id, axis)
    }

    fn update(&mut self) {
        (**self).update()
    }
}

impl<B: InputBackend + ?Sized> InputBackend for Box<B> {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        (**self).poll_event()
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        (**self).set_cursor_position(x, y)
    }

    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Open the live backend compiled into this build.
///
/// Currently this is the gilrs gamepad backend when the `gamepad` feature is enabled.
pub fn probe_backend() -> crate::Result<Box<dyn InputBackend>> {
    #[cfg(feature = "gamepad")]
    {
        let backend = gamepad::GilrsBackend::new()?;
        Ok(Box::new(backend))
    }

    #[cfg(not(feature = "gamepad"))]
    {
        Err(crate::Error::Backend(
            "no live backend compiled in (enable the `gamepad` feature)".to_string(),
        ))
    }
}
