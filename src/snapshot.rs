//! Per-frame snapshot of joystick states.
//!
//! [`Snapshot`] is an **owned**, read-only copy of every cached joystick at a point in
//! time (typically "this frame"). It's produced by
//! [`Session::snapshot`](crate::manager::Session::snapshot) and is cheap to clone for
//! fan-out to presentation code.
//!
//! # Semantics
//! - Devices appear in discovery order.
//! - A snapshot is **immutable** and does not query the backend; it reflects the cache's
//!   last-known state.
//!
//! # Examples
//! ```no_run
//! use eventreplay::native::JoystickAxis;
//! use eventreplay::Snapshot;
//!
//! fn print_sticks(snap: &Snapshot) {
//!     for js in snap.iter() {
//!         let x = js.axis(JoystickAxis::X.index());
//!         let y = js.axis(JoystickAxis::Y.index());
//!         println!("js{}: X={x:.2} Y={y:.2} button0={}", js.id, js.is_pressed(0));
//!     }
//! }
//! ```

use crate::joystick::JoystickDevice;
use serde::Serialize;

/// Owned snapshot of the joystick cache.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot(pub Vec<JoystickDevice>);

impl Snapshot {
    /// State of device `id`.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&JoystickDevice> {
        self.0.iter().find(|js| js.id == id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &JoystickDevice> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the snapshot and return the devices.
    #[inline]
    pub fn into_inner(self) -> Vec<JoystickDevice> {
        self.0
    }
}
