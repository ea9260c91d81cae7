//! Session: the tick loop's single owner of input state.
//!
//! A [`Session`] composes a backend, the [`ReplayDriver`], the [`JoystickCache`], the
//! coalescing [`SessionRecorder`] and an [`InputEventBus`]. Each [`tick`](Session::tick)
//! obtains exactly one event and fully processes it before returning, so the cache and
//! the replay queue only ever see one mutation at a time.
//!
//! # Example
//! ```
//! use eventreplay::{Event, EventLog, Session, SessionConfig, VirtualBackend};
//! use eventreplay::config::PacingMode;
//!
//! let config = SessionConfig { pacing: PacingMode::FastForward, ..SessionConfig::default() };
//! let replay = EventLog::from_json_str(r#"[{"WindowClosed": {}}]"#).unwrap();
//!
//! let mut session = Session::new(VirtualBackend::new(), &config).with_replay(replay);
//! while session.is_open() {
//!     session.tick();
//! }
//! assert_eq!(session.finish().events(), &[Event::WindowClosed]);
//! ```

use crate::backends::InputBackend;
use crate::config::SessionConfig;
use crate::driver::ReplayDriver;
use crate::error::Error;
use crate::event::Event;
use crate::eventbus::{EventFilter, InputEventBus};
use crate::joystick::JoystickCache;
use crate::logger::EventLogger;
use crate::native::{to_native, NativeEvent};
use crate::recorder::SessionRecorder;
use crate::session_log::EventLog;
use crate::snapshot::Snapshot;
use std::path::Path;
use tracing::info;

pub struct Session<B: InputBackend> {
    backend: B,
    driver: ReplayDriver,
    joysticks: JoystickCache,
    recorder: SessionRecorder,
    bus: InputEventBus,
    open: bool,
    events_processed: u64,
}

impl<B: InputBackend> Session<B> {
    /// Live session. Any `replay` path in `config` is ignored here; see
    /// [`from_config`](Self::from_config).
    pub fn new(backend: B, config: &SessionConfig) -> Self {
        let driver = ReplayDriver::new(backend.now(), config.replay_pacing());
        let mut bus = InputEventBus::new();
        if config.log_events {
            bus.add_listener(EventLogger::new(), EventFilter::InputOnly);
        }

        Self {
            backend,
            driver,
            joysticks: JoystickCache::new(),
            recorder: SessionRecorder::new(),
            bus,
            open: true,
            events_processed: 0,
        }
    }

    /// Session that first replays `config.replay`, if set.
    ///
    /// A replay file that fails to decode aborts here, before any tick runs.
    pub fn from_config(backend: B, config: &SessionConfig) -> Result<Self, Error> {
        let mut session = Self::new(backend, config);
        if let Some(path) = &config.replay {
            let log = EventLog::load_with(path, config.decode_policy)?;
            info!("Replaying {} event(s) from {}", log.len(), path.display());
            session.driver.set_events(log);
        }
        Ok(session)
    }

    /// Queue `log` for replay ahead of live input.
    pub fn with_replay(mut self, log: EventLog) -> Self {
        self.driver.set_events(log);
        self
    }

    /// Obtain and process the next event.
    pub fn tick(&mut self) -> Event {
        let event = self.driver.next_event(&mut self.backend);
        self.events_processed += 1;

        self.recorder.record(&event);
        self.joysticks.apply(&event, &mut self.backend);
        if matches!(event, Event::WindowClosed) {
            self.open = false;
        }
        self.bus.emit(&event);

        event
    }

    /// Native encoding of `event` for presentation layers that only take native events.
    pub fn native_event(event: &Event) -> Option<NativeEvent> {
        to_native(event)
    }

    /// `false` once a `WindowClosed` has been delivered.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_replaying(&self) -> bool {
        self.driver.is_replaying()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    pub fn joysticks(&self) -> &JoystickCache {
        &self.joysticks
    }

    /// Resynchronize every cached joystick with the backend.
    pub fn refresh_joysticks(&mut self) {
        self.joysticks.refresh_all(&mut self.backend);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.joysticks.devices().to_vec())
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn bus_mut(&mut self) -> &mut InputEventBus {
        &mut self.bus
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Write what has been recorded so far.
    pub fn save_recording(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let log: EventLog = self.recorder.events().iter().copied().collect();
        log.save(path)
    }

    /// End the session and hand back the coalesced recording.
    pub fn finish(self) -> EventLog {
        info!(
            "Total events processed: {}, total recorded {}",
            self.events_processed,
            self.recorder.len()
        );
        self.recorder.into_log()
    }
}

impl<B: InputBackend + std::fmt::Debug> std::fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.backend)
            .field("driver", &self.driver)
            .field("joysticks", &self.joysticks)
            .field("recorded", &self.recorder.len())
            .field("open", &self.open)
            .field("events_processed", &self.events_processed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::VirtualBackend;
    use crate::config::PacingMode;
    use crate::event::{JoystickButtonInput, KeyCode, KeyInput};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn fast() -> SessionConfig {
        SessionConfig {
            pacing: PacingMode::FastForward,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn tick_updates_cache_recorder_and_bus() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(0, 4);
        backend.press_button(0, 1);

        let mut session = Session::new(backend, &fast());
        let seen = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&seen);
        session
            .bus_mut()
            .add_listener(move |_: &Event| *counter.borrow_mut() += 1, EventFilter::JoystickOnly);

        // JoystickConnected maps to Empty, then the button press.
        assert_eq!(session.tick(), Event::Empty);
        assert_eq!(
            session.tick(),
            Event::JoystickButtonPressed(JoystickButtonInput { id: 0, button: 1 })
        );

        assert_eq!(*seen.borrow(), 1);
        assert!(session.snapshot().get(0).is_some_and(|js| js.is_pressed(1)));
        assert_eq!(session.recorder().len(), 1);
        assert_eq!(session.events_processed(), 2);
    }

    #[test]
    fn window_closed_ends_the_session() {
        let mut backend = VirtualBackend::new();
        backend.press_key(KeyCode::ESCAPE);
        backend.close_window();

        let mut session = Session::new(backend, &fast());
        while session.is_open() {
            session.tick();
        }
        let log = session.finish();
        assert_eq!(
            log.events(),
            &[
                Event::KeyPressed(KeyInput::plain(KeyCode::ESCAPE)),
                Event::WindowClosed
            ]
        );
    }

    #[test]
    fn idle_ticks_are_coalesced_in_the_recording() {
        let mut session = Session::new(VirtualBackend::new(), &fast());
        for _ in 0..3 {
            session.backend_mut().advance(Duration::from_millis(5));
            session.tick();
        }
        assert_eq!(
            session.recorder().events(),
            &[Event::TimeElapsed(Duration::from_millis(15))]
        );
    }

    #[test]
    fn native_encoding_is_offered_for_presentation() {
        assert_eq!(
            Session::<VirtualBackend>::native_event(&Event::WindowClosed),
            Some(NativeEvent::Closed)
        );
        assert_eq!(
            Session::<VirtualBackend>::native_event(&Event::TimeElapsed(Duration::ZERO)),
            None
        );
    }

    #[test]
    fn refresh_resynchronizes_missed_state() {
        let mut backend = VirtualBackend::new();
        backend.connect_joystick(0, 2);
        backend.press_button(0, 0);
        let mut session = Session::new(backend, &fast());
        session.tick();
        session.tick();

        session.backend_mut().set_button(0, 0, false);
        assert!(session.joysticks().get(0).is_some_and(|js| js.is_pressed(0)));
        session.refresh_joysticks();
        assert!(session.joysticks().get(0).is_some_and(|js| !js.is_pressed(0)));
    }
}
