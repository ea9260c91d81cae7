//! Session recording.
//!
//! Consecutive `TimeElapsed` ticks are merged into one entry so that idle stretches do
//! not bloat the log; any other event closes the current time entry.

use crate::event::Event;
use crate::session_log::EventLog;

/// Coalescing recorder for the events a session observed.
#[derive(Clone, Debug, Default)]
pub struct SessionRecorder {
    events: Vec<Event>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick result.
    pub fn record(&mut self, event: &Event) {
        if event.is_empty() {
            return;
        }
        if let (Some(Event::TimeElapsed(total)), Event::TimeElapsed(more)) =
            (self.events.last_mut(), event)
        {
            *total = total.saturating_add(*more);
            return;
        }
        self.events.push(*event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn into_log(self) -> EventLog {
        self.events.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyInput, MousePosition};
    use std::time::Duration;

    fn ms(n: u64) -> Event {
        Event::TimeElapsed(Duration::from_millis(n))
    }

    #[test]
    fn consecutive_time_is_merged() {
        let mut recorder = SessionRecorder::new();
        for event in [ms(1), ms(2), ms(3)] {
            recorder.record(&event);
        }
        assert_eq!(recorder.events(), &[ms(6)]);
    }

    #[test]
    fn other_events_split_time_runs() {
        let key = Event::KeyPressed(KeyInput::plain(KeyCode::S));
        let mut recorder = SessionRecorder::new();
        for event in [ms(5), ms(5), key, ms(1), Event::Empty, ms(2), Event::WindowClosed] {
            recorder.record(&event);
        }
        assert_eq!(recorder.events(), &[ms(10), key, ms(3), Event::WindowClosed]);
    }

    #[test]
    fn empty_is_never_recorded() {
        let mut recorder = SessionRecorder::new();
        recorder.record(&Event::Empty);
        assert!(recorder.is_empty());

        recorder.record(&Event::MouseMoved(MousePosition::new(2, 2)));
        recorder.record(&Event::Empty);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn into_log_keeps_order() {
        let mut recorder = SessionRecorder::new();
        recorder.record(&Event::WindowClosed);
        recorder.record(&ms(4));
        let log = recorder.into_log();
        assert_eq!(log.events(), &[Event::WindowClosed, ms(4)]);
    }
}
