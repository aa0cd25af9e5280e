//! # Integration Tests
//!
//! End-to-end tests for the log dispatch pipeline:
//! - Config text → normalized instances → engine lifecycle → sink output
//! - JSON and template formatting through real dispatch
//! - Macro body rendering

#[cfg(test)]
mod common {
    use std::sync::{Arc, Mutex};

    use contracts::{Connection, Driver, InstanceDescriptor, LogEntry, LogError};

    pub type Captured = Arc<Mutex<Vec<(String, String)>>>;

    /// Driver recording (instance name, formatted line) pairs.
    #[derive(Default)]
    pub struct CaptureDriver {
        lines: Captured,
    }

    impl CaptureDriver {
        pub fn new() -> (Self, Captured) {
            let lines: Captured = Arc::default();
            (
                Self {
                    lines: Arc::clone(&lines),
                },
                lines,
            )
        }
    }

    impl Driver for CaptureDriver {
        fn connect(
            &self,
            instance: Arc<InstanceDescriptor>,
        ) -> Result<Box<dyn Connection>, LogError> {
            Ok(Box::new(CaptureConnection {
                instance,
                lines: Arc::clone(&self.lines),
            }))
        }
    }

    struct CaptureConnection {
        instance: Arc<InstanceDescriptor>,
        lines: Captured,
    }

    impl Connection for CaptureConnection {
        fn open(&self) -> Result<(), LogError> {
            Ok(())
        }

        fn close(&self) -> Result<(), LogError> {
            Ok(())
        }

        fn write(&self, entries: &[LogEntry]) -> Result<(), LogError> {
            let mut lines = self.lines.lock().unwrap();
            for entry in entries {
                lines.push((
                    self.instance.name().to_string(),
                    self.instance.format(entry),
                ));
            }
            Ok(())
        }
    }

    pub fn lines_for(captured: &Captured, instance: &str) -> Vec<String> {
        captured
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == instance)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::{log_error, log_info, Engine, EngineBuilder};

    use crate::common::{lines_for, CaptureDriver};

    /// Full pipeline: TOML text → raw tree → engine lifecycle → sink lines.
    #[tokio::test]
    async fn test_e2e_toml_config_pipeline() -> anyhow::Result<()> {
        crate::common::init_tracing();

        let toml_text = r#"
level = "info"
format = "%level%: %body%"
driver = "capture"

[audit]
driver = "capture"
level = "error"
format = "audit %level% %body%"
timeout = "50ms"
"#;
        let raw = ConfigLoader::load_from_str(toml_text, ConfigFormat::Toml)?;

        let (driver, captured) = CaptureDriver::new();
        let engine = Engine::new();
        engine.register_driver("capture", Arc::new(driver));
        engine.configure(&raw);
        engine.setup();
        engine.open()?;
        engine.start();

        log_info!(engine, "hello {}", "world");
        log_error!(engine, "boom");

        engine.stop().await;
        engine.close();

        // The default instance (threshold INFO) sees both entries.
        assert_eq!(
            lines_for(&captured, "default"),
            vec!["INFO: hello world".to_string(), "ERROR: boom".to_string()]
        );
        // The audit instance (threshold ERROR) only sees the error.
        assert_eq!(
            lines_for(&captured, "audit"),
            vec!["audit ERROR boom".to_string()]
        );
        Ok(())
    }

    /// Threshold round trip: INFO passes, DEBUG does not.
    #[tokio::test]
    async fn test_round_trip_threshold() {
        let (driver, captured) = CaptureDriver::new();
        let engine = EngineBuilder::new()
            .driver("default", Arc::new(driver))
            .config(
                "default",
                dispatcher::OutputConfig {
                    level: dispatcher::Level::Info,
                    format: "%level%: %body%".to_string(),
                    ..Default::default()
                },
            )
            .build()
            .unwrap();
        engine.start();

        log_info!(engine, "hello {}", "world");
        dispatcher::log_debug!(engine, "hidden");

        engine.stop().await;
        assert_eq!(
            lines_for(&captured, "default"),
            vec!["INFO: hello world".to_string()]
        );
    }

    /// JSON scenario: instance "svc", flag "v1", Error("boom").
    #[tokio::test]
    async fn test_json_output_fields() {
        let (driver, captured) = CaptureDriver::new();
        let engine = EngineBuilder::new()
            .driver("capture", Arc::new(driver))
            .config(
                "svc",
                dispatcher::OutputConfig {
                    driver: "capture".to_string(),
                    json: true,
                    flag: "v1".to_string(),
                    ..Default::default()
                },
            )
            .build()
            .unwrap();
        engine.start();

        engine.error("boom");
        engine.stop().await;

        let lines = lines_for(&captured, "svc");
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["name"], "svc");
        assert_eq!(value["flag"], "v1");
        assert_eq!(value["body"], "boom");
        let unix = value["unix"].as_i64().unwrap();
        let nano = value["nano"].as_i64().unwrap();
        assert_eq!(nano / 1_000_000_000, unix);
    }

    /// Malformed values in config text fall back silently.
    #[tokio::test]
    async fn test_malformed_config_values_keep_defaults() {
        let json_text = r#"{
            "main": {
                "driver": "capture",
                "level": "whisper",
                "timeout": "not-a-duration",
                "buffer": "lots"
            }
        }"#;
        let raw = ConfigLoader::load_from_str(json_text, ConfigFormat::Json).unwrap();

        let (driver, captured) = CaptureDriver::new();
        let engine = Engine::new();
        engine.register_driver("capture", Arc::new(driver));
        engine.configure(&raw);
        engine.setup();
        engine.open().unwrap();

        // Default level is DEBUG (most permissive), so this passes.
        engine.debug("still works");
        assert_eq!(lines_for(&captured, "main").len(), 1);
    }
}

#[cfg(test)]
mod macro_tests {
    use std::sync::Arc;

    use dispatcher::{
        log_info, log_warning, log_write, Engine, Level, OutputConfig,
    };

    use crate::common::{lines_for, CaptureDriver};

    fn body_engine() -> (Engine, crate::common::Captured) {
        let (driver, captured) = CaptureDriver::new();
        let engine = Engine::new();
        engine.register_driver("capture", Arc::new(driver));
        engine.register_config(
            "main",
            OutputConfig {
                driver: "capture".to_string(),
                format: "%body%".to_string(),
                ..OutputConfig::default()
            },
        );
        engine.setup();
        engine.open().unwrap();
        // Not started: writes dispatch synchronously, keeping tests simple.
        (engine, captured)
    }

    #[test]
    fn test_no_args_renders_empty_body() {
        let (engine, captured) = body_engine();
        log_info!(engine);
        assert_eq!(lines_for(&captured, "main"), vec![String::new()]);
    }

    #[test]
    fn test_single_expression_uses_display() {
        let (engine, captured) = body_engine();
        log_info!(engine, 42);
        log_warning!(engine, "plain");
        assert_eq!(
            lines_for(&captured, "main"),
            vec!["42".to_string(), "plain".to_string()]
        );
    }

    #[test]
    fn test_format_string_with_args() {
        let (engine, captured) = body_engine();
        log_info!(engine, "{} + {} = {}", 1, 2, 3);
        assert_eq!(lines_for(&captured, "main"), vec!["1 + 2 = 3".to_string()]);
    }

    #[test]
    fn test_plain_expressions_space_joined() {
        let (engine, captured) = body_engine();
        let port = 8080;
        log_info!(engine, port, "ready", true);
        assert_eq!(
            lines_for(&captured, "main"),
            vec!["8080 ready true".to_string()]
        );
    }

    #[test]
    fn test_explicit_level_write() {
        let (engine, captured) = body_engine();
        log_write!(engine, Level::Notice, "deploy {}", "done");
        assert_eq!(lines_for(&captured, "main"), vec!["deploy done".to_string()]);
    }
}
