//! # Config Loader
//!
//! Configuration normalization for the log dispatch engine.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration text into the raw settings tree
//! - Split the tree into per-instance settings maps
//! - Merge loosely typed settings into typed [`OutputConfig`]s, silently
//!   ignoring malformed values
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let raw = ConfigLoader::load_from_path(Path::new("log.toml")).unwrap();
//! let instances = config_loader::split_instances(&raw);
//! ```

mod parse;

pub use parse::{parse_duration, parse_duration_text, parse_level, parse_levels, parse_usize};

use std::collections::HashMap;
use std::path::Path;

use contracts::{LogError, OutputConfig, DEFAULT_NAME};
use serde_json::{Map, Value};

/// Configuration text format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Merge one instance's raw settings map into a config.
///
/// Recognized keys: `driver, level, levels, json, flag, format, buffer,
/// timeout, setting`. Malformed or non-positive values are ignored, keeping
/// whatever the config already holds. Unknown keys are ignored.
pub fn merge_settings(config: &mut OutputConfig, settings: &Map<String, Value>) {
    if let Some(Value::String(v)) = settings.get("driver") {
        if !v.is_empty() {
            config.driver = v.clone();
        }
    }
    if let Some(level) = settings.get("level").and_then(parse_level) {
        config.level = level;
    }
    if let Some(levels) = settings.get("levels").and_then(parse_levels) {
        config.levels = levels;
    }
    if let Some(Value::Bool(v)) = settings.get("json") {
        config.json = *v;
    }
    if let Some(Value::String(v)) = settings.get("flag") {
        config.flag = v.clone();
    }
    if let Some(Value::String(v)) = settings.get("format") {
        config.format = v.clone();
    }
    if let Some(buffer) = settings.get("buffer").and_then(parse_usize) {
        if buffer > 0 {
            config.buffer = buffer;
        }
    }
    if let Some(timeout) = settings.get("timeout").and_then(parse_duration) {
        if !timeout.is_zero() {
            config.timeout = timeout;
        }
    }
    if let Some(Value::Object(v)) = settings.get("setting") {
        config.setting = v.clone();
    }
}

/// Split the raw settings tree into per-instance settings maps.
///
/// Top-level entries whose value is an object (except the key `setting`)
/// are per-instance settings keyed by instance name; every remaining
/// top-level key belongs to the nameless default instance.
pub fn split_instances(raw: &Map<String, Value>) -> HashMap<String, Map<String, Value>> {
    let mut instances = HashMap::new();
    let mut root = Map::new();

    for (key, value) in raw {
        match value {
            Value::Object(settings) if key != "setting" => {
                instances.insert(key.clone(), settings.clone());
            }
            _ => {
                root.insert(key.clone(), value.clone());
            }
        }
    }

    if !root.is_empty() {
        instances.insert(DEFAULT_NAME.to_string(), root);
    }
    instances
}

/// Configuration loader
///
/// Provides static methods to load the raw settings tree from files or
/// strings. Parse failures are real errors; value-level problems inside a
/// well-formed tree stay silent by design and are handled in
/// [`merge_settings`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the raw settings tree from a file path.
    ///
    /// Automatically detects format from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    pub fn load_from_path(path: &Path) -> Result<Map<String, Value>, LogError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load the raw settings tree from a string.
    ///
    /// # Errors
    /// Parse failure, or a document whose top level is not a table/object.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Map<String, Value>, LogError> {
        let value: Value = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| LogError::ConfigParse {
                message: format!("TOML parse error: {e}"),
                source: Some(Box::new(e)),
            })?,
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| LogError::ConfigParse {
                    message: format!("JSON parse error: {e}"),
                    source: Some(Box::new(e)),
                })?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(LogError::config_parse(format!(
                "top-level settings must be a table, got {other}"
            ))),
        }
    }

    /// Infer configuration format from a path's extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, LogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LogError::config_parse("cannot determine file format from extension"))?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| LogError::config_parse(format!("unsupported config format: .{ext}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Level, DEFAULT_BUFFER, DEFAULT_FLUSH_INTERVAL};
    use serde_json::json;
    use std::time::Duration;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_settings_full() {
        let settings = as_map(json!({
            "driver": "file",
            "level": "info",
            "json": true,
            "flag": "v1",
            "format": "%level%: %body%",
            "buffer": 64,
            "timeout": "250ms",
            "setting": { "path": "/var/log/app.log" },
        }));

        let mut config = OutputConfig::default();
        merge_settings(&mut config, &settings);

        assert_eq!(config.driver, "file");
        assert_eq!(config.level, Level::Info);
        assert!(config.json);
        assert_eq!(config.flag, "v1");
        assert_eq!(config.format, "%level%: %body%");
        assert_eq!(config.buffer, 64);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.setting["path"], "/var/log/app.log");
    }

    #[test]
    fn test_merge_settings_silent_fallback() {
        let settings = as_map(json!({
            "level": "loud",
            "buffer": "plenty",
            "timeout": "not-a-duration",
            "driver": "",
        }));

        let mut config = OutputConfig::default().normalize();
        let before = config.clone();
        merge_settings(&mut config, &settings);

        assert_eq!(config, before);
        assert_eq!(config.buffer, DEFAULT_BUFFER);
        assert_eq!(config.timeout, DEFAULT_FLUSH_INTERVAL);
    }

    #[test]
    fn test_merge_explicit_levels_replace_threshold() {
        let settings = as_map(json!({ "levels": ["fatal", "error"] }));
        let mut config = OutputConfig::default();
        merge_settings(&mut config, &settings);
        let config = config.normalize();

        assert!(config.levels.contains(Level::Error));
        assert!(!config.levels.contains(Level::Debug));
        assert_eq!(config.levels.len(), 2);
    }

    #[test]
    fn test_split_instances() {
        let raw = as_map(json!({
            "level": "info",
            "audit": { "driver": "file", "level": "error" },
            "setting": { "shared": true },
        }));

        let instances = split_instances(&raw);
        assert_eq!(instances.len(), 2);

        let root = &instances[DEFAULT_NAME];
        assert_eq!(root["level"], "info");
        assert_eq!(root["setting"]["shared"], true);
        assert_eq!(instances["audit"]["driver"], "file");
    }

    #[test]
    fn test_split_instances_named_only() {
        let raw = as_map(json!({ "audit": { "level": "error" } }));
        let instances = split_instances(&raw);
        assert_eq!(instances.len(), 1);
        assert!(!instances.contains_key(DEFAULT_NAME));
    }

    #[test]
    fn test_load_from_str_toml_and_json_agree() {
        let toml_text = r#"
level = "info"

[audit]
driver = "file"
timeout = "50ms"
"#;
        let json_text = r#"{
            "level": "info",
            "audit": { "driver": "file", "timeout": "50ms" }
        }"#;

        let from_toml = ConfigLoader::load_from_str(toml_text, ConfigFormat::Toml).unwrap();
        let from_json = ConfigLoader::load_from_str(json_text, ConfigFormat::Json).unwrap();
        assert_eq!(from_toml, from_json);
    }

    #[test]
    fn test_load_from_str_syntax_error() {
        let result = ConfigLoader::load_from_str("invalid toml [[[", ConfigFormat::Toml);
        assert!(matches!(result, Err(LogError::ConfigParse { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
