//! Session configuration.
//!
//! Loaded from TOML; every field is optional.
//!
//! ```toml
//! replay = "session.json"
//! record = "events.json"
//! pacing = "real-time"          # or "fast-forward"
//! max_replay_sleep_ms = 10000   # 0 waits as long as recorded
//! decode_policy = "strict"      # or "skip-invalid"
//! log_events = true
//!
//! [window]
//! width = 1024
//! height = 768
//! scale = 2
//! ```

use crate::driver::ReplayPacing;
use crate::error::ConfigError;
use crate::session_log::DecodePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Replay pacing as written in config files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingMode {
    #[default]
    RealTime,
    FastForward,
}

/// Window parameters for the host backend that opens the window.
///
/// The crate itself never opens a window; these values are validated here and passed
/// through to whoever constructs the live backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// UI scaling factor, `1..=5`.
    pub scale: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            scale: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Log to replay before switching to live input.
    pub replay: Option<PathBuf>,
    /// Where the recorded log is written at shutdown.
    pub record: Option<PathBuf>,
    pub pacing: PacingMode,
    /// Upper bound for a single replayed wait. `0` (or `None`) waits as long as recorded.
    pub max_replay_sleep_ms: Option<u64>,
    pub decode_policy: DecodePolicy,
    /// Log every delivered event through `tracing`.
    pub log_events: bool,
    pub window: WindowConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            replay: None,
            record: Some(PathBuf::from("events.json")),
            pacing: PacingMode::RealTime,
            max_replay_sleep_ms: Some(ReplayPacing::DEFAULT_MAX_SLEEP.as_millis() as u64),
            decode_policy: DecodePolicy::Strict,
            log_events: false,
            window: WindowConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 {
            return Err(ConfigError::OutOfRange {
                field: "window.width",
                value: window.width.into(),
                expected: "greater than 0",
            });
        }
        if window.height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "window.height",
                value: window.height.into(),
                expected: "greater than 0",
            });
        }
        if !(1..=5).contains(&window.scale) {
            return Err(ConfigError::OutOfRange {
                field: "window.scale",
                value: window.scale.into(),
                expected: "1..=5",
            });
        }
        Ok(())
    }

    /// Driver pacing policy described by this config.
    pub fn replay_pacing(&self) -> ReplayPacing {
        match self.pacing {
            PacingMode::FastForward => ReplayPacing::FastForward,
            PacingMode::RealTime => ReplayPacing::RealTime {
                max_sleep: self
                    .max_replay_sleep_ms
                    .filter(|&ms| ms > 0)
                    .map(Duration::from_millis),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.replay_pacing(), ReplayPacing::default());
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
            replay = "in.json"
            record = "out.json"
            pacing = "fast-forward"
            decode_policy = "skip-invalid"
            log_events = true

            [window]
            width = 640
            height = 480
            scale = 1
        "#;
        let config = SessionConfig::from_toml_str(text).unwrap();
        assert_eq!(config.replay, Some(PathBuf::from("in.json")));
        assert_eq!(config.record, Some(PathBuf::from("out.json")));
        assert_eq!(config.replay_pacing(), ReplayPacing::FastForward);
        assert_eq!(config.decode_policy, DecodePolicy::SkipInvalid);
        assert!(config.log_events);
        assert_eq!(config.window.width, 640);
    }

    #[test]
    fn sleep_bound_feeds_real_time_pacing() {
        let config = SessionConfig::from_toml_str("max_replay_sleep_ms = 250").unwrap();
        assert_eq!(
            config.replay_pacing(),
            ReplayPacing::RealTime {
                max_sleep: Some(Duration::from_millis(250))
            }
        );
    }

    #[test]
    fn zero_sleep_bound_means_unbounded() {
        let config = SessionConfig::from_toml_str("max_replay_sleep_ms = 0").unwrap();
        assert_eq!(
            config.replay_pacing(),
            ReplayPacing::RealTime { max_sleep: None }
        );
    }

    #[test]
    fn scale_out_of_range_is_rejected() {
        let err = SessionConfig::from_toml_str("[window]\nscale = 6").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "window.scale",
                value: 6,
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("replay_file = \"x.json\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
