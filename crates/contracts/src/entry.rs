//! A single rendered log entry.

use chrono::{DateTime, Local};

use crate::Level;

/// One leveled log entry.
///
/// The body is final text by the time the entry enters the pipeline; the
/// only transformation left downstream is per-instance JSON or template
/// formatting. Constructors always stamp a timestamp, so an entry can never
/// travel without one.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub level: Level,
    pub body: String,
}

impl LogEntry {
    /// Entry stamped with the current time.
    pub fn new(level: Level, body: impl Into<String>) -> Self {
        Self::at(Local::now(), level, body)
    }

    /// Entry with an explicit timestamp.
    pub fn at(time: DateTime<Local>, level: Level, body: impl Into<String>) -> Self {
        Self {
            time,
            level,
            body: body.into(),
        }
    }

    /// Human-readable timestamp, `YYYY-MM-DD HH:MM:SS.mmm`.
    pub fn time_text(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    /// Unix timestamp, whole seconds.
    pub fn unix(&self) -> i64 {
        self.time.timestamp()
    }

    /// Unix timestamp in nanoseconds.
    pub fn nanos(&self) -> i64 {
        self.time.timestamp_nanos_opt().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_text_shape() {
        let entry = LogEntry::new(Level::Info, "hello");
        let text = entry.time_text();
        // e.g. 2026-08-27 13:05:09.042
        assert_eq!(text.len(), 23);
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[10..11], " ");
        assert_eq!(&text[19..20], ".");
    }

    #[test]
    fn test_unix_and_nanos_consistent() {
        let entry = LogEntry::new(Level::Debug, "x");
        assert_eq!(entry.nanos() / 1_000_000_000, entry.unix());
    }
}
