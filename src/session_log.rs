//! Persisted session logs.
//!
//! An [`EventLog`] is an ordered sequence of events. On disk it is a JSON array of
//! entries in the format described in [`crate::codec`].
//!
//! # `Empty`
//! [`Event::Empty`] is never written: serialization skips it, and [`EventLog::push`]
//! drops it. A decoded log therefore never contains `Empty`.
//!
//! # Example
//! ```
//! use eventreplay::{Event, EventLog};
//!
//! let log = EventLog::from_json_str(r#"[{"WindowClosed": {}}]"#).unwrap();
//! assert_eq!(log.events(), &[Event::WindowClosed]);
//! assert_eq!(log.to_json_string().unwrap(), r#"[{"WindowClosed":{}}]"#);
//! ```

use crate::codec::decode_entry;
use crate::error::{CodecError, Error};
use crate::event::Event;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// What to do with a log entry that fails to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodePolicy {
    /// The first bad entry fails the whole log.
    #[default]
    Strict,
    /// Bad entries are skipped with a warning.
    SkipInvalid,
}

/// Ordered sequence of events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. `Empty` is dropped.
    pub fn push(&mut self, event: Event) {
        if !event.is_empty() {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Sum of all `TimeElapsed` entries.
    pub fn total_elapsed(&self) -> Duration {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::TimeElapsed(elapsed) => Some(*elapsed),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    pub fn to_json_string(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CodecError> {
        Ok(serde_json::to_writer(writer, self)?)
    }

    /// Write the log to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(io_err)?;
        debug!("Wrote {} event(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Strict decode.
    pub fn from_json_str(text: &str) -> Result<Self, CodecError> {
        Self::from_json_str_with(text, DecodePolicy::Strict)
    }

    pub fn from_json_str_with(text: &str, policy: DecodePolicy) -> Result<Self, CodecError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document, policy)
    }

    pub fn from_reader<R: Read>(reader: R, policy: DecodePolicy) -> Result<Self, CodecError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_value(&document, policy)
    }

    /// Decode a parsed document.
    pub fn from_value(document: &Value, policy: DecodePolicy) -> Result<Self, CodecError> {
        let entries = document.as_array().ok_or(CodecError::NotAnArray)?;
        let mut log = EventLog {
            events: Vec::with_capacity(entries.len()),
        };

        for (index, entry) in entries.iter().enumerate() {
            match decode_entry(entry) {
                Ok(event) => log.events.push(event),
                Err(source) => match policy {
                    DecodePolicy::Strict => {
                        return Err(CodecError::Entry {
                            index,
                            source: Box::new(source),
                        })
                    }
                    DecodePolicy::SkipInvalid => {
                        warn!("Skipping log entry {}: {}", index, source);
                    }
                },
            }
        }

        Ok(log)
    }

    /// Strict load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::load_with(path, DecodePolicy::Strict)
    }

    pub fn load_with(path: impl AsRef<Path>, policy: DecodePolicy) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let log = Self::from_reader(BufReader::new(file), policy)?;
        debug!("Loaded {} event(s) from {}", log.len(), path.display());
        Ok(log)
    }
}

impl Serialize for EventLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for event in self.events.iter().filter(|event| !event.is_empty()) {
            seq.serialize_element(event)?;
        }
        seq.end()
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut log = EventLog::new();
        log.extend(iter);
        log
    }
}

impl Extend<Event> for EventLog {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

impl IntoIterator for EventLog {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
