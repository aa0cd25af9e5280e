//! Builder for assembling and opening an engine in one pass.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{Driver, LogError, OutputConfig, DEFAULT_NAME};
use serde_json::{Map, Value};

use crate::engine::Engine;
use crate::registry::DriverRegistry;
use crate::sinks::ConsoleDriver;

/// Builder collecting drivers, typed configs, and raw settings, then
/// producing an engine that has already run Setup and Open.
///
/// Start remains the caller's move; it needs a running tokio runtime.
#[derive(Default)]
pub struct EngineBuilder {
    registry: DriverRegistry,
    configs: HashMap<String, OutputConfig>,
    raw: Option<Map<String, Value>>,
}

impl EngineBuilder {
    /// Builder with an empty first-writer-wins registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with the console driver pre-registered as `"default"`.
    pub fn with_console_default() -> Self {
        let mut builder = Self::new();
        builder
            .registry
            .register(DEFAULT_NAME, Arc::new(ConsoleDriver::new()));
        builder
    }

    /// Replace the driver registry wholesale.
    pub fn registry(mut self, registry: DriverRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one driver.
    pub fn driver(mut self, name: impl Into<String>, driver: Arc<dyn Driver>) -> Self {
        self.registry.register(name, driver);
        self
    }

    /// Register one typed config.
    pub fn config(mut self, name: impl Into<String>, config: OutputConfig) -> Self {
        self.configs.insert(name.into(), config);
        self
    }

    /// Supply a raw settings tree, applied on top of the typed configs.
    pub fn settings(mut self, raw: Map<String, Value>) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Build the engine: register everything, Setup, Open.
    ///
    /// # Errors
    /// Unknown driver names and connect/open failures surface here.
    pub fn build(self) -> Result<Engine, LogError> {
        let engine = Engine::with_registry(self.registry);
        engine.register_configs(self.configs);
        if let Some(raw) = &self.raw {
            engine.configure(raw);
        }
        engine.setup();
        engine.open()?;
        Ok(engine)
    }
}
