//! # Dispatcher
//!
//! The asynchronous log dispatch engine.
//!
//! Responsibilities:
//! - Own the driver/config/instance registries and the lifecycle state
//!   machine (`register → configure → setup → open → start → stop → close`)
//! - Batch entries on a single background worker and fan them out to
//!   per-instance connections, filtered by level
//! - Never block producers: a saturated or inactive queue degrades to a
//!   synchronous per-entry dispatch

pub mod builder;
pub mod engine;
pub mod instance;
mod macros;
pub mod metrics;
pub mod registry;
pub mod sinks;

pub use builder::EngineBuilder;
pub use contracts::{
    Connection, Driver, InstanceDescriptor, Level, LevelSet, LogEntry, LogError, OutputConfig,
};
pub use engine::Engine;
pub use instance::Instance;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use registry::DriverRegistry;
pub use sinks::ConsoleDriver;
