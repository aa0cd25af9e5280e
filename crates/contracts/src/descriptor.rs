//! Instance descriptor: the resolved view a driver connects against.

use serde_json::json;

use crate::{Level, LogEntry, OutputConfig};

/// Name plus finalized configuration of one output instance.
///
/// Handed to [`crate::Driver::connect`] so a connection can keep a cheap
/// reference to its instance's filtering and formatting rules.
#[derive(Debug, Clone)]
pub struct InstanceDescriptor {
    name: String,
    config: OutputConfig,
}

impl InstanceDescriptor {
    /// Bind a name to a normalized config.
    pub fn new(name: impl Into<String>, config: OutputConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// True iff the allowed-level set admits `level`. O(1).
    pub fn allow(&self, level: Level) -> bool {
        self.config.levels.contains(level)
    }

    /// Render one entry as JSON or template text, per the `json` flag.
    pub fn format(&self, entry: &LogEntry) -> String {
        if self.config.json {
            self.format_json(entry)
        } else {
            self.format_template(entry)
        }
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        json!({
            "time": entry.time_text(),
            "unix": entry.unix(),
            "nano": entry.nanos(),
            "level": entry.level.as_str(),
            "name": self.name,
            "flag": self.config.flag,
            "body": entry.body,
        })
        .to_string()
    }

    // Placeholders are replaced one after another over the accumulating
    // result, so a substituted value containing a later placeholder token
    // (e.g. a body holding the literal text "%level%") is substituted again.
    // Known quirk, kept deliberately.
    fn format_template(&self, entry: &LogEntry) -> String {
        let mut message = self.config.format.clone();
        message = message.replace("%nano%", &entry.nanos().to_string());
        message = message.replace("%unix%", &entry.unix().to_string());
        message = message.replace("%time%", &entry.time_text());
        message = message.replace("%name%", &self.name);
        message = message.replace("%flag%", &self.config.flag);
        message = message.replace("%level%", entry.level.as_str());
        message = message.replace("%body%", &entry.body);
        message
    }
}
