//! Per-device joystick state cache.
//!
//! Devices are discovered lazily: the first time an id is referenced, the cache asks
//! the backend for the device's capabilities and current state and keeps the result.
//! Afterwards, button/axis events update single slots in place; [`JoystickCache::refresh`]
//! re-reads everything from the backend.
//!
//! Slot containers are sized from the backend-reported capability counts. An event that
//! addresses a slot past that bound (e.g. replaying a log recorded on different hardware)
//! grows the container instead of being dropped, up to [`MAX_SLOTS`]. Slots at or past
//! that limit are ignored with a warning.

use crate::backends::JoystickQuery;
use crate::event::Event;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Upper bound on button and axis slots kept per device.
pub const MAX_SLOTS: u32 = 256;

/// Cached state for one device.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JoystickDevice {
    /// Stable device index.
    pub id: u32,
    /// Button capability reported at discovery.
    pub button_count: u32,
    /// One entry per button slot.
    pub button_state: Vec<bool>,
    /// One entry per axis slot.
    pub axis_position: Vec<f32>,
}

impl JoystickDevice {
    /// Query a device's capabilities and full state.
    pub fn discover<Q: JoystickQuery + ?Sized>(id: u32, source: &mut Q) -> Self {
        let button_count = source.button_count(id).min(MAX_SLOTS);
        let axis_count = source.axis_count(id).min(MAX_SLOTS);
        let mut device = Self {
            id,
            button_count,
            button_state: vec![false; button_count as usize],
            axis_position: vec![0.0; axis_count as usize],
        };
        device.refresh(source);
        device
    }

    /// Overwrite every slot with the backend's current state.
    pub fn refresh<Q: JoystickQuery + ?Sized>(&mut self, source: &mut Q) {
        source.update();
        for (button, pressed) in self.button_state.iter_mut().enumerate() {
            *pressed = source.is_button_pressed(self.id, button as u32);
        }
        for (axis, position) in self.axis_position.iter_mut().enumerate() {
            *position = source.axis_position(self.id, axis as u32);
        }
    }

    /// State of one button; `false` for unknown slots.
    pub fn is_pressed(&self, button: u32) -> bool {
        self.button_state
            .get(button as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Position of one axis; `0.0` for unknown slots.
    pub fn axis(&self, axis: u32) -> f32 {
        self.axis_position.get(axis as usize).copied().unwrap_or(0.0)
    }

    fn set_button(&mut self, button: u32, pressed: bool) {
        if button >= MAX_SLOTS {
            warn!(id = self.id, button, "button slot out of range, ignored");
            return;
        }
        let slot = button as usize;
        if slot >= self.button_state.len() {
            debug!(
                id = self.id,
                button, "button slot past reported capability, growing"
            );
            self.button_state.resize(slot + 1, false);
        }
        self.button_state[slot] = pressed;
    }

    fn set_axis(&mut self, axis: u32, position: f32) {
        if axis >= MAX_SLOTS {
            warn!(id = self.id, axis, "axis slot out of range, ignored");
            return;
        }
        let slot = axis as usize;
        if slot >= self.axis_position.len() {
            debug!(id = self.id, axis, "axis slot past reported capability, growing");
            self.axis_position.resize(slot + 1, 0.0);
        }
        self.axis_position[slot] = position;
    }
}

/// All devices seen this session. Entries are never removed.
#[derive(Clone, Debug, Default)]
pub struct JoystickCache {
    devices: Vec<JoystickDevice>,
}

impl JoystickCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_or_discover<Q: JoystickQuery + ?Sized>(&mut self, id: u32, source: &mut Q) -> usize {
        match self.position(id) {
            Some(index) => index,
            None => self.discover(id, source),
        }
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.devices.iter().position(|js| js.id == id)
    }

    fn discover<Q: JoystickQuery + ?Sized>(&mut self, id: u32, source: &mut Q) -> usize {
        let device = JoystickDevice::discover(id, source);
        info!(
            "Discovered joystick {} ({} buttons, {} axes)",
            id,
            device.button_count,
            device.axis_position.len()
        );
        self.devices.push(device);
        self.devices.len() - 1
    }

    /// Existing entry for `id`, or a freshly discovered one.
    pub fn device_by_id<Q: JoystickQuery + ?Sized>(
        &mut self,
        id: u32,
        source: &mut Q,
    ) -> &JoystickDevice {
        let index = self.position_or_discover(id, source);
        &self.devices[index]
    }

    /// Lookup without discovery.
    pub fn get(&self, id: u32) -> Option<&JoystickDevice> {
        self.devices.iter().find(|js| js.id == id)
    }

    pub fn apply_button_event<Q: JoystickQuery + ?Sized>(
        &mut self,
        id: u32,
        button: u32,
        pressed: bool,
        source: &mut Q,
    ) {
        let index = self.position_or_discover(id, source);
        self.devices[index].set_button(button, pressed);
    }

    pub fn apply_axis_event<Q: JoystickQuery + ?Sized>(
        &mut self,
        id: u32,
        axis: u32,
        position: f32,
        source: &mut Q,
    ) {
        let index = self.position_or_discover(id, source);
        self.devices[index].set_axis(axis, position);
    }

    /// Apply a joystick event. Other events are ignored.
    ///
    /// Returns `true` if the cache was touched.
    pub fn apply<Q: JoystickQuery + ?Sized>(&mut self, event: &Event, source: &mut Q) -> bool {
        match event {
            Event::JoystickButtonPressed(b) => {
                self.apply_button_event(b.id, b.button, true, source)
            }
            Event::JoystickButtonReleased(b) => {
                self.apply_button_event(b.id, b.button, false, source)
            }
            Event::JoystickAxisMoved(a) => {
                self.apply_axis_event(a.id, a.axis, a.position, source)
            }
            Event::Empty
            | Event::KeyPressed(_)
            | Event::KeyReleased(_)
            | Event::MouseMoved(_)
            | Event::MouseButtonPressed(_)
            | Event::MouseButtonReleased(_)
            | Event::WindowClosed
            | Event::TimeElapsed(_) => return false,
        }
        true
    }

    /// Re-read one device from the backend. Unknown ids are discovered, which already
    /// reads their full state.
    pub fn refresh<Q: JoystickQuery + ?Sized>(&mut self, id: u32, source: &mut Q) -> &JoystickDevice {
        let index = match self.position(id) {
            Some(index) => {
                self.devices[index].refresh(source);
                index
            }
            None => self.discover(id, source),
        };
        &self.devices[index]
    }

    /// Re-read every known device.
    pub fn refresh_all<Q: JoystickQuery + ?Sized>(&mut self, source: &mut Q) {
        for device in &mut self.devices {
            device.refresh(source);
        }
    }

    pub fn devices(&self) -> &[JoystickDevice] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::VirtualBackend;
    use crate::event::{JoystickAxisInput, JoystickButtonInput};
    use crate::native::JoystickAxis;

    #[test]
    fn discovery_is_idempotent() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(4, 6);
        backend.set_button(4, 1, true);

        let mut cache = JoystickCache::new();
        let first = cache.device_by_id(4, &mut backend).clone();
        let second = cache.device_by_id(4, &mut backend).clone();

        assert_eq!(cache.len(), 1);
        assert_eq!(first, second);
        assert_eq!(backend.button_count_queries(), 1);
        assert_eq!(first.button_count, 6);
        assert!(first.is_pressed(1));
    }

    #[test]
    fn events_update_single_slots() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(0, 4);
        let mut cache = JoystickCache::new();

        cache.apply_button_event(0, 2, true, &mut backend);
        cache.apply_axis_event(0, JoystickAxis::Y.index(), -35.5, &mut backend);

        let device = cache.get(0).expect("device discovered");
        assert!(device.is_pressed(2));
        assert!(!device.is_pressed(0));
        assert_eq!(device.axis(JoystickAxis::Y.index()), -35.5);
        assert_eq!(device.axis(JoystickAxis::X.index()), 0.0);
    }

    #[test]
    fn unknown_device_from_replay_is_created_not_dropped() {
        let mut backend = VirtualBackend::new();
        let mut cache = JoystickCache::new();

        let press = Event::JoystickButtonPressed(JoystickButtonInput { id: 9, button: 3 });
        assert!(cache.apply(&press, &mut backend));

        let device = cache.get(9).expect("device created");
        assert_eq!(device.button_count, 0);
        assert_eq!(device.button_state, vec![false, false, false, true]);

        let axis = Event::JoystickAxisMoved(JoystickAxisInput {
            id: 9,
            axis: 1,
            position: 12.0,
        });
        assert!(cache.apply(&axis, &mut backend));
        assert_eq!(cache.get(9).map(|d| d.axis(1)), Some(12.0));
    }

    #[test]
    fn non_joystick_events_are_ignored() {
        let mut backend = VirtualBackend::new();
        let mut cache = JoystickCache::new();
        assert!(!cache.apply(&Event::WindowClosed, &mut backend));
        assert!(cache.is_empty());
    }

    #[test]
    fn refresh_overwrites_cached_slots() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(1, 3);
        let mut cache = JoystickCache::new();

        cache.apply_button_event(1, 0, true, &mut backend);
        assert!(cache.get(1).is_some_and(|d| d.is_pressed(0)));

        backend.set_button(1, 0, false);
        backend.set_button(1, 2, true);
        let device = cache.refresh(1, &mut backend);
        assert!(!device.is_pressed(0));
        assert!(device.is_pressed(2));
    }

    #[test]
    fn out_of_range_slots_are_ignored() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(0, 4);
        let mut cache = JoystickCache::new();

        cache.apply_button_event(0, u32::MAX, true, &mut backend);
        cache.apply_axis_event(0, u32::MAX, 50.0, &mut backend);
        cache.apply_button_event(0, MAX_SLOTS, true, &mut backend);

        let device = cache.get(0).expect("device discovered");
        assert_eq!(device.button_state.len(), 4);
        assert_eq!(device.axis_position.len(), JoystickAxis::COUNT as usize);
        assert!(!device.is_pressed(u32::MAX));

        cache.apply_button_event(0, MAX_SLOTS - 1, true, &mut backend);
        let device = cache.get(0).expect("device discovered");
        assert_eq!(device.button_state.len(), MAX_SLOTS as usize);
        assert!(device.is_pressed(MAX_SLOTS - 1));
    }

    #[test]
    fn refreshing_an_unseen_device_queries_it_once() {
        struct Counting {
            inner: VirtualBackend,
            reads: usize,
        }

        impl JoystickQuery for Counting {
            fn button_count(&mut self, id: u32) -> u32 {
                self.inner.button_count(id)
            }

            fn is_button_pressed(&mut self, id: u32, button: u32) -> bool {
                self.reads += 1;
                self.inner.is_button_pressed(id, button)
            }

            fn axis_position(&mut self, id: u32, axis: u32) -> f32 {
                self.inner.axis_position(id, axis)
            }
        }

        let mut backend = VirtualBackend::new();
        backend.connect_joystick(3, 5);
        backend.set_button(3, 4, true);
        let mut source = Counting {
            inner: backend,
            reads: 0,
        };

        let mut cache = JoystickCache::new();
        assert!(cache.refresh(3, &mut source).is_pressed(4));
        assert_eq!(source.reads, 5);

        cache.refresh(3, &mut source);
        assert_eq!(source.reads, 10);
    }

    #[test]
    fn refresh_all_touches_every_device() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(0, 2);
        backend.connect_joystick(1, 2);
        let mut cache = JoystickCache::new();
        cache.device_by_id(0, &mut backend);
        cache.device_by_id(1, &mut backend);

        backend.set_button(0, 1, true);
        backend.set_button(1, 0, true);
        cache.refresh_all(&mut backend);

        assert!(cache.get(0).is_some_and(|d| d.is_pressed(1)));
        assert!(cache.get(1).is_some_and(|d| d.is_pressed(0)));
    }
}
