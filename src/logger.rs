use crate::event::Event;
use crate::eventbus::InputListener;
use tracing::Level;

/// A listener that writes delivered events through `tracing`.
///
/// `TimeElapsed` ticks are skipped unless [`with_time`](Self::with_time) is set; they
/// arrive every idle frame.
#[derive(Clone, Debug)]
pub struct EventLogger {
    level: Level,
    include_time: bool,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLogger {
    pub fn new() -> Self {
        Self {
            level: Level::DEBUG,
            include_time: false,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_time(mut self, include_time: bool) -> Self {
        self.include_time = include_time;
        self
    }

    fn wants(&self, event: &Event) -> bool {
        !event.is_empty() && (self.include_time || !event.is_time_elapsed())
    }
}

impl InputListener for EventLogger {
    fn on_event(&mut self, event: &Event) {
        if !self.wants(event) {
            return;
        }
        let level = self.level;
        if level == Level::ERROR {
            tracing::error!("[Input] {}", event);
        } else if level == Level::WARN {
            tracing::warn!("[Input] {}", event);
        } else if level == Level::INFO {
            tracing::info!("[Input] {}", event);
        } else if level == Level::DEBUG {
            tracing::debug!("[Input] {}", event);
        } else {
            tracing::trace!("[Input] {}", event);
        }
    }
}
