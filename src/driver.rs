//! Record/replay driver.
//!
//! [`ReplayDriver::next_event`] is the single "give me the next event" call of the tick
//! loop. While the replay queue holds events they are delivered front to back without
//! touching the backend's event queue; once it is drained the driver polls the backend
//! and synthesizes `TimeElapsed` whenever nothing is pending.
//!
//! Draining the queue is not an error, it is the switch to live input.

use crate::backends::InputBackend;
use crate::event::Event;
use crate::native::from_native;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// How replayed `TimeElapsed` events are paced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayPacing {
    /// Wait for each replayed duration, optionally bounded per event.
    RealTime { max_sleep: Option<Duration> },
    /// Deliver immediately.
    FastForward,
}

impl ReplayPacing {
    pub const DEFAULT_MAX_SLEEP: Duration = Duration::from_secs(10);
}

impl Default for ReplayPacing {
    fn default() -> Self {
        ReplayPacing::RealTime {
            max_sleep: Some(Self::DEFAULT_MAX_SLEEP),
        }
    }
}

/// Replay queue plus the live-mode tick clock.
#[derive(Debug)]
pub struct ReplayDriver {
    pending: VecDeque<Event>,
    last_tick: Instant,
    pacing: ReplayPacing,
}

impl ReplayDriver {
    /// `start` is the instant live time is measured from until the first tick.
    pub fn new(start: Instant, pacing: ReplayPacing) -> Self {
        Self {
            pending: VecDeque::new(),
            last_tick: start,
            pacing,
        }
    }

    /// Replace the replay queue.
    pub fn set_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.pending = events.into_iter().collect();
        debug!("Replay queue loaded with {} event(s)", self.pending.len());
    }

    /// Append one event to the replay queue.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    pub fn is_replaying(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Events still waiting to be replayed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn pacing(&self) -> ReplayPacing {
        self.pacing
    }

    pub fn set_pacing(&mut self, pacing: ReplayPacing) {
        self.pacing = pacing;
    }

    /// Next event: replayed if the queue is non-empty, live otherwise.
    pub fn next_event<B: InputBackend + ?Sized>(&mut self, backend: &mut B) -> Event {
        if let Some(event) = self.pending.pop_front() {
            self.deliver_replayed(&event, backend);
            self.last_tick = backend.now();
            if self.pending.is_empty() {
                debug!("Replay queue drained, switching to live input");
            }
            return event;
        }

        if let Some(native) = backend.poll_event() {
            let event = from_native(&native);
            trace!("Live {:?} -> {}", native, event);
            return event;
        }

        let now = backend.now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        Event::TimeElapsed(elapsed)
    }

    fn deliver_replayed<B: InputBackend + ?Sized>(&self, event: &Event, backend: &mut B) {
        trace!("Replaying {}", event);
        match event {
            Event::TimeElapsed(elapsed) => self.wait(*elapsed, backend),
            Event::MouseMoved(pos) => backend.set_cursor_position(pos.x, pos.y),
            Event::Empty
            | Event::KeyPressed(_)
            | Event::KeyReleased(_)
            | Event::JoystickButtonPressed(_)
            | Event::JoystickButtonReleased(_)
            | Event::JoystickAxisMoved(_)
            | Event::MouseButtonPressed(_)
            | Event::MouseButtonReleased(_)
            | Event::WindowClosed => {}
        }
    }

    fn wait<B: InputBackend + ?Sized>(&self, elapsed: Duration, backend: &mut B) {
        match self.pacing {
            ReplayPacing::FastForward => {}
            ReplayPacing::RealTime { max_sleep } => {
                let duration = match max_sleep {
                    Some(limit) if elapsed > limit => {
                        warn!("Replayed wait of {:?} clamped to {:?}", elapsed, limit);
                        limit
                    }
                    _ => elapsed,
                };
                if !duration.is_zero() {
                    backend.sleep(duration);
                }
            }
        }
    }
}
