//! eventreplay: deterministic record and replay of window, mouse, keyboard and joystick input.
//!
//! A [`Session`] pulls one [`Event`] per tick, either from a queued replay log or from
//! a live [`InputBackend`], keeps a [`JoystickCache`] in sync and records what it saw
//! as a portable JSON [`EventLog`].

pub mod backends;
pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod joystick;
pub mod logger;
pub mod manager;
pub mod native;
pub mod recorder;
pub mod session_log;
pub mod snapshot;

pub use backends::{InputBackend, JoystickQuery, VirtualBackend};
pub use config::SessionConfig;
pub use driver::{ReplayDriver, ReplayPacing};
pub use error::{CodecError, ConfigError, Error, Result};
pub use event::*;
pub use eventbus::{EventFilter, InputEventBus, InputListener};
pub use joystick::{JoystickCache, JoystickDevice};
pub use manager::Session;
pub use recorder::SessionRecorder;
pub use session_log::{DecodePolicy, EventLog};
pub use snapshot::Snapshot;
