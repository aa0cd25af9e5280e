//! Console sink - the built-in `default` driver.
//!
//! Splits each batch across the two standard streams: WARNING and more
//! severe entries go to stderr, everything else to stdout. Lines are
//! buffered per batch so one batch costs at most two stream writes.

use std::io::Write as _;
use std::sync::Arc;

use contracts::{Connection, Driver, InstanceDescriptor, Level, LogEntry, LogError};

/// Driver writing formatted entries to stdout/stderr.
#[derive(Debug, Default)]
pub struct ConsoleDriver;

impl ConsoleDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for ConsoleDriver {
    fn connect(&self, instance: Arc<InstanceDescriptor>) -> Result<Box<dyn Connection>, LogError> {
        Ok(Box::new(ConsoleConnection { instance }))
    }
}

/// Connection bound to one instance's formatting rules.
pub struct ConsoleConnection {
    instance: Arc<InstanceDescriptor>,
}

impl Connection for ConsoleConnection {
    fn open(&self) -> Result<(), LogError> {
        Ok(())
    }

    fn close(&self) -> Result<(), LogError> {
        Ok(())
    }

    fn write(&self, entries: &[LogEntry]) -> Result<(), LogError> {
        let (out, err) = render_streams(&self.instance, entries);
        if !err.is_empty() {
            std::io::stderr().lock().write_all(err.as_bytes())?;
        }
        if !out.is_empty() {
            std::io::stdout().lock().write_all(out.as_bytes())?;
        }
        Ok(())
    }
}

/// Format a batch into (stdout, stderr) payloads, one line per entry.
fn render_streams(instance: &InstanceDescriptor, entries: &[LogEntry]) -> (String, String) {
    let mut out = String::new();
    let mut err = String::new();
    for entry in entries {
        let target = if entry.level <= Level::Warning {
            &mut err
        } else {
            &mut out
        };
        target.push_str(&instance.format(entry));
        target.push('\n');
    }
    (out, err)
}
