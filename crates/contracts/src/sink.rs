//! Driver and Connection traits - the pluggable sink seam.

use std::sync::Arc;

use crate::{InstanceDescriptor, LogEntry, LogError};

/// Manufactures connections for instances.
///
/// A single driver may back any number of instances; `connect` is called
/// once per instance during Open.
pub trait Driver: Send + Sync {
    /// Produce a connection bound to one instance's resolved configuration.
    ///
    /// # Errors
    /// A connect failure aborts the engine's Open sequence.
    fn connect(&self, instance: Arc<InstanceDescriptor>) -> Result<Box<dyn Connection>, LogError>;
}

/// An open sink accepting ordered batches of entries.
///
/// `write` is called from the background worker and, on the backpressure
/// fallback path, directly from producers; implementations must be safe to
/// call concurrently.
pub trait Connection: Send + Sync {
    /// Prepare the sink for writing.
    fn open(&self) -> Result<(), LogError>;

    /// Release the sink's resources.
    fn close(&self) -> Result<(), LogError>;

    /// Write a batch, preserving its order.
    fn write(&self, entries: &[LogEntry]) -> Result<(), LogError>;
}
