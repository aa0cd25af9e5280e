//! Per-instance output configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Level, LevelSet};

/// Name of the implicit default instance and of the built-in driver.
pub const DEFAULT_NAME: &str = "default";

/// Display template applied when none is configured.
pub const DEFAULT_FORMAT: &str = "%time% [%level%] %body%";

/// Queue capacity floor and default per-instance buffer, in entries.
pub const DEFAULT_BUFFER: usize = 1024;

/// Flush interval ceiling and default per-instance timeout.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(200);

/// Configuration of one named output instance.
///
/// A freshly built config may carry unset fields (`buffer == 0`,
/// `timeout == 0`, empty `levels`); [`OutputConfig::normalize`] fills every
/// one of them with its documented default. The engine only ever sees
/// normalized configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Name of the driver producing this instance's connection.
    pub driver: String,
    /// Threshold used to derive `levels` when no explicit set is given.
    pub level: Level,
    /// Explicit allowed-level set; empty means "derive from `level`".
    pub levels: LevelSet,
    /// Emit entries as JSON objects instead of template text.
    pub json: bool,
    /// Per-instance output buffer capacity hint, in entries.
    pub buffer: usize,
    /// Per-instance flush interval hint.
    pub timeout: Duration,
    /// Opaque label surfaced through the `%flag%` placeholder.
    pub flag: String,
    /// Display template, `%time% [%level%] %body%` style.
    pub format: String,
    /// Free-form driver settings.
    pub setting: Map<String, Value>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_NAME.to_string(),
            level: Level::Debug,
            levels: LevelSet::empty(),
            json: false,
            buffer: 0,
            timeout: Duration::ZERO,
            flag: String::new(),
            format: String::new(),
            setting: Map::new(),
        }
    }
}

impl OutputConfig {
    /// Fill every unset field with its default. Idempotent: normalizing an
    /// already-normalized config is a no-op.
    pub fn normalize(mut self) -> Self {
        if self.driver.is_empty() {
            self.driver = DEFAULT_NAME.to_string();
        }
        if self.format.is_empty() {
            self.format = DEFAULT_FORMAT.to_string();
        }
        if self.buffer == 0 {
            self.buffer = DEFAULT_BUFFER;
        }
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_FLUSH_INTERVAL;
        }
        if self.levels.is_empty() {
            self.levels = LevelSet::from_threshold(self.level);
        }
        self
    }
}
