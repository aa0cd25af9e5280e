//! Driver registry with an explicit registration policy.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{Driver, DEFAULT_NAME};

/// Named driver registry.
///
/// First registration wins; a registry created with [`with_override`]
/// instead lets later registrations replace earlier ones. An empty name
/// maps to `"default"`.
///
/// [`with_override`]: DriverRegistry::with_override
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
    override_existing: bool,
}

impl DriverRegistry {
    /// Empty registry with first-writer-wins policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry where later registrations replace earlier ones.
    pub fn with_override() -> Self {
        Self {
            override_existing: true,
            ..Self::default()
        }
    }

    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn Driver>) {
        let mut name = name.into();
        if name.is_empty() {
            name = DEFAULT_NAME.to_string();
        }
        if self.override_existing {
            self.drivers.insert(name, driver);
        } else {
            self.drivers.entry(name).or_insert(driver);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
