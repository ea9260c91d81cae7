use crate::event::Event;
use crate::eventbus::InputListener;

/// Wraps a listener and filters events based on a user-supplied predicate.
///
/// Use this when [`EventFilter`](crate::eventbus::EventFilter) is too coarse, e.g. to
/// follow a single joystick.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&Event) -> bool>,
    inner: Box<dyn InputListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&Event) -> bool + 'static,
        inner: impl InputListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }

    /// Only joystick events from device `id`.
    pub fn joystick(id: u32, inner: impl InputListener + 'static) -> Self {
        Self::new(move |event| event.joystick_id() == Some(id), inner)
    }
}

impl InputListener for FilteredListener {
    fn on_event(&mut self, event: &Event) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
