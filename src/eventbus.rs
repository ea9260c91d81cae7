use crate::event::Event;
use std::collections::BTreeMap;

/// Trait for reacting to delivered events, live or replayed.
pub trait InputListener {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> InputListener for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    /// Everything except `TimeElapsed` and `Empty`.
    InputOnly,
    JoystickOnly,
    KeyboardOnly,
    MouseOnly,
    Custom(fn(&Event) -> bool),
}

impl EventFilter {
    pub fn accepts(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::InputOnly => !event.is_empty() && !event.is_time_elapsed(),
            EventFilter::JoystickOnly => event.is_joystick(),
            EventFilter::KeyboardOnly => event.is_keyboard(),
            EventFilter::MouseOnly => event.is_mouse(),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Metadata-wrapped listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn InputListener>,
    enabled: bool,
    filter: EventFilter,
}

/// Fans delivered events out to registered listeners, in registration order.
#[derive(Default)]
pub struct InputEventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl InputEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn add_listener(
        &mut self,
        listener: impl InputListener + 'static,
        filter: EventFilter,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: u64) {
        self.listeners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &Event) {
        for entry in self.listeners.values_mut() {
            if entry.enabled && entry.filter.accepts(event) {
                entry.listener.on_event(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[Event]) {
        for event in events {
            self.emit(event);
        }
    }
}

impl std::fmt::Debug for InputEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputEventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{JoystickButtonInput, KeyCode, KeyInput};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn collector() -> (Rc<RefCell<Vec<Event>>>, impl FnMut(&Event)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &Event| sink.borrow_mut().push(*event))
    }

    fn sample() -> Vec<Event> {
        vec![
            Event::TimeElapsed(Duration::from_millis(1)),
            Event::KeyPressed(KeyInput::plain(KeyCode::A)),
            Event::JoystickButtonPressed(JoystickButtonInput { id: 0, button: 0 }),
            Event::Empty,
        ]
    }

    #[test]
    fn filters_select_event_classes() {
        let mut bus = InputEventBus::new();
        let (all, all_sink) = collector();
        let (input, input_sink) = collector();
        let (joy, joy_sink) = collector();
        bus.add_listener(all_sink, EventFilter::All);
        bus.add_listener(input_sink, EventFilter::InputOnly);
        bus.add_listener(joy_sink, EventFilter::JoystickOnly);

        bus.emit_all(&sample());

        assert_eq!(all.borrow().len(), 4);
        assert_eq!(input.borrow().len(), 2);
        assert_eq!(joy.borrow().len(), 1);
    }

    #[test]
    fn disabled_and_removed_listeners_are_skipped() {
        let mut bus = InputEventBus::new();
        let (seen, sink) = collector();
        let id = bus.add_listener(sink, EventFilter::All);

        bus.disable(id);
        bus.emit(&Event::WindowClosed);
        assert!(seen.borrow().is_empty());

        bus.enable(id);
        bus.emit(&Event::WindowClosed);
        assert_eq!(seen.borrow().len(), 1);

        bus.remove_listener(id);
        assert!(bus.is_empty());
        bus.emit(&Event::WindowClosed);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn custom_filter() {
        let mut bus = InputEventBus::new();
        let (seen, sink) = collector();
        bus.add_listener(sink, EventFilter::Custom(|e| matches!(e, Event::WindowClosed)));
        bus.emit_all(&sample());
        bus.emit(&Event::WindowClosed);
        assert_eq!(&*seen.borrow(), &[Event::WindowClosed]);
    }
}
