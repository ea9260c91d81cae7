//! Error types.
//!
//! Only session-log decoding has a failure mode that matters for correctness;
//! unrecognized native events are not errors (they become [`Event::Empty`](crate::Event::Empty)).

use std::path::PathBuf;

/// Failure while encoding or decoding a session log.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The document root is not an array of entries.
    #[error("event log must be a JSON array")]
    NotAnArray,

    /// A log entry is not a JSON object.
    #[error("log entry is not an object")]
    NotAnObject,

    /// A log entry must wrap its fields in exactly one variant key.
    #[error("log entry must have exactly one top-level key, found {0}")]
    KeyCount(usize),

    /// The top-level key names no known event variant.
    #[error("unrecognized log entry `{0}`")]
    UnknownVariant(String),

    /// Wrong number of fields for the named variant.
    #[error("`{variant}` expects {expected} field(s), found {found}")]
    FieldCount {
        variant: &'static str,
        expected: usize,
        found: usize,
    },

    /// A field is missing, unexpected or has the wrong type.
    #[error("`{variant}` has invalid fields: {source}")]
    InvalidField {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// [`Event::Empty`](crate::Event::Empty) has no log representation.
    #[error("the Empty event cannot be written to a session log")]
    EmptyEvent,

    /// Error in one entry of a log, with its position.
    #[error("entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },

    /// Malformed JSON or a writer failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while loading or validating a [`SessionConfig`](crate::config::SessionConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`{field}` is out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        expected: &'static str,
    },
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input backend could not be initialized.
    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
