//! # Contracts
//!
//! Frozen interface contracts for the log dispatch core: severity levels,
//! entries, per-instance configuration, the driver/connection seam, and the
//! unified error type. Business crates depend only on this crate; reverse
//! dependencies are prohibited.

mod config;
mod descriptor;
mod entry;
mod error;
mod level;
mod sink;

pub use config::*;
pub use descriptor::InstanceDescriptor;
pub use entry::LogEntry;
pub use error::LogError;
pub use level::{Level, LevelSet};
pub use sink::{Connection, Driver};
