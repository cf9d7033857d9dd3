//! Request-scoped diagnostic trail.
//!
//! A [`TraceSink`] is created per request and handed down the call chain by
//! `&mut`. Every recorded event is also forwarded to the `log` facade so the
//! process log keeps the same information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl TraceLevel {
    fn as_str(&self) -> &'static str {
        match self {
            TraceLevel::Debug => "DEBUG",
            TraceLevel::Info => "INFO",
            TraceLevel::Warn => "WARNING",
            TraceLevel::Error => "ERROR",
        }
    }

    fn as_log_level(&self) -> log::Level {
        match self {
            TraceLevel::Debug => log::Level::Debug,
            TraceLevel::Info => log::Level::Info,
            TraceLevel::Warn => log::Level::Warn,
            TraceLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp: DateTime<Utc>,
    pub level: TraceLevel,
    pub message: String,
}

impl TraceEvent {
    /// `2024-05-01 12:00:00 - INFO - message`
    pub fn format_line(&self) -> String {
        format!(
            "{} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

#[derive(Debug, Default)]
pub struct TraceSink {
    events: Vec<TraceEvent>,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, level: TraceLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: "channel_insights::trace", level.as_log_level(), "{message}");
        self.events.push(TraceEvent {
            timestamp: Utc::now(),
            level,
            message,
        });
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(TraceLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(TraceLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(TraceLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(TraceLevel::Error, message);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// All events, one formatted line each.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(TraceEvent::format_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
