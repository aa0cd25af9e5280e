//! Instance - a named output bound to an open connection.

use std::sync::Arc;

use contracts::{Connection, InstanceDescriptor, Level, LogEntry, OutputConfig};

/// A named, independently configured output bound to one connection.
///
/// Materialized during Open, one per registered config; destroyed during
/// Close. The engine snapshots `Arc<Instance>`s under a shared lock and
/// writes through them with the lock released.
pub struct Instance {
    descriptor: Arc<InstanceDescriptor>,
    connection: Box<dyn Connection>,
}

impl Instance {
    pub(crate) fn new(descriptor: Arc<InstanceDescriptor>, connection: Box<dyn Connection>) -> Self {
        Self {
            descriptor,
            connection,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn config(&self) -> &OutputConfig {
        self.descriptor.config()
    }

    pub fn descriptor(&self) -> &Arc<InstanceDescriptor> {
        &self.descriptor
    }

    /// True iff the instance's normalized level set admits `level`. O(1).
    pub fn allow(&self, level: Level) -> bool {
        self.descriptor.allow(level)
    }

    /// Render one entry per the instance's `json`/template configuration.
    pub fn format(&self, entry: &LogEntry) -> String {
        self.descriptor.format(entry)
    }

    pub(crate) fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }
}
