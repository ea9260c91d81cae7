use crate::backends::{InputBackend, JoystickQuery};
use crate::event::KeyCode;
use crate::native::{
    JoystickAxis, JoystickButtonEvent, JoystickMoveEvent, KeyEvent, MouseButton,
    MouseButtonEvent, NativeEvent,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Joystick attached to a [`VirtualBackend`].
#[derive(Clone, Debug)]
struct VirtualJoystick {
    id: u32,
    buttons: Vec<bool>,
    axes: Vec<f32>,
}

/// Scripted, in-memory backend with a manual clock.
///
/// Native events are queued with [`feed`](Self::feed) (or the convenience helpers) and
/// handed out one per [`poll_event`](InputBackend::poll_event). Time only moves through
/// [`advance`](Self::advance) or a replay [`sleep`](InputBackend::sleep).
#[derive(Debug)]
pub struct VirtualBackend {
    events: VecDeque<NativeEvent>,
    joysticks: Vec<VirtualJoystick>,
    cursor: Option<(i32, i32)>,
    origin: Instant,
    elapsed: Duration,
    slept: Duration,
    button_count_queries: usize,
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            joysticks: Vec::new(),
            cursor: None,
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            slept: Duration::ZERO,
            button_count_queries: 0,
        }
    }

    /// Inject a native event into the queue.
    pub fn feed(&mut self, event: NativeEvent) {
        self.events.push_back(event);
    }

    /// Number of queued native events.
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Total time spent in replay sleeps.
    pub fn slept(&self) -> Duration {
        self.slept
    }

    /// Where the cursor was last warped to.
    pub fn cursor_position(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    /// How often a button count was queried; one per device discovery.
    pub fn button_count_queries(&self) -> usize {
        self.button_count_queries
    }

    /// Attach a joystick. Reattaching an id resets its state.
    pub fn connect_joystick(&mut self, id: u32, button_count: u32) {
        self.joysticks.retain(|js| js.id != id);
        self.joysticks.push(VirtualJoystick {
            id,
            buttons: vec![false; button_count as usize],
            axes: vec![0.0; JoystickAxis::COUNT as usize],
        });
        self.feed(NativeEvent::JoystickConnected { joystick_id: id });
    }

    fn joystick_mut(&mut self, id: u32) -> Option<&mut VirtualJoystick> {
        self.joysticks.iter_mut().find(|js| js.id == id)
    }

    fn joystick(&self, id: u32) -> Option<&VirtualJoystick> {
        self.joysticks.iter().find(|js| js.id == id)
    }

    /// Convenience method to set an axis value and queue the matching event.
    pub fn set_axis(&mut self, id: u32, axis: JoystickAxis, position: f32) {
        if let Some(slot) = self
            .joystick_mut(id)
            .and_then(|js| js.axes.get_mut(axis.index() as usize))
        {
            *slot = position;
        }
        self.feed(NativeEvent::JoystickMoved(JoystickMoveEvent {
            joystick_id: id,
            axis,
            position,
        }));
    }

    pub fn press_button(&mut self, id: u32, button: u32) {
        self.set_button(id, button, true);
        self.feed(NativeEvent::JoystickButtonPressed(JoystickButtonEvent {
            joystick_id: id,
            button,
        }));
    }

    pub fn release_button(&mut self, id: u32, button: u32) {
        self.set_button(id, button, false);
        self.feed(NativeEvent::JoystickButtonReleased(JoystickButtonEvent {
            joystick_id: id,
            button,
        }));
    }

    /// Change button state without queueing an event, as if the event was missed.
    pub fn set_button(&mut self, id: u32, button: u32, pressed: bool) {
        if let Some(slot) = self
            .joystick_mut(id)
            .and_then(|js| js.buttons.get_mut(button as usize))
        {
            *slot = pressed;
        }
    }

    pub fn press_key(&mut self, code: KeyCode) {
        self.feed(NativeEvent::KeyPressed(plain_key(code)));
    }

    pub fn release_key(&mut self, code: KeyCode) {
        self.feed(NativeEvent::KeyReleased(plain_key(code)));
    }

    pub fn move_mouse(&mut self, x: i32, y: i32) {
        self.feed(NativeEvent::MouseMoved { x, y });
    }

    pub fn click(&mut self, button: MouseButton, x: i32, y: i32) {
        let event = MouseButtonEvent { button, x, y };
        self.feed(NativeEvent::MouseButtonPressed(event));
        self.feed(NativeEvent::MouseButtonReleased(event));
    }

    pub fn close_window(&mut self) {
        self.feed(NativeEvent::Closed);
    }
}

fn plain_key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        alt: false,
        control: false,
        shift: false,
        system: false,
    }
}

impl JoystickQuery for VirtualBackend {
    fn button_count(&mut self, id: u32) -> u32 {
        self.button_count_queries += 1;
        self.joystick(id).map_or(0, |js| js.buttons.len() as u32)
    }

    fn axis_count(&mut self, id: u32) -> u32 {
        self.joystick(id).map_or(0, |js| js.axes.len() as u32)
    }

    fn is_button_pressed(&mut self, id: u32, button: u32) -> bool {
        self.joystick(id)
            .and_then(|js| js.buttons.get(button as usize).copied())
            .unwrap_or(false)
    }

    fn axis_position(&mut self, id: u32, axis: u32) -> f32 {
        self.joystick(id)
            .and_then(|js| js.axes.get(axis as usize).copied())
            .unwrap_or(0.0)
    }
}

impl InputBackend for VirtualBackend {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.events.pop_front()
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
        self.elapsed += duration;
    }
}
