//! Layered error definitions
//!
//! Categorized by source: config / driver / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum LogError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Driver Errors =====
    /// A config references a driver name no registry entry matches
    #[error("unknown log driver: {name}")]
    UnknownDriver { name: String },

    /// Driver failed to produce a connection
    #[error("driver '{driver}' failed to connect instance '{instance}': {message}")]
    Connect {
        driver: String,
        instance: String,
        message: String,
    },

    // ===== Sink Errors =====
    /// Sink open error
    #[error("sink '{name}' open error: {message}")]
    SinkOpen { name: String, message: String },

    /// Sink write error
    #[error("sink '{name}' write error: {message}")]
    SinkWrite { name: String, message: String },

    /// Sink close error
    #[error("sink '{name}' close error: {message}")]
    SinkClose { name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create unknown driver error
    pub fn unknown_driver(name: impl Into<String>) -> Self {
        Self::UnknownDriver { name: name.into() }
    }

    /// Create driver connect error
    pub fn connect(
        driver: impl Into<String>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Connect {
            driver: driver.into(),
            instance: instance.into(),
            message: message.into(),
        }
    }

    /// Create sink open error
    pub fn sink_open(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkOpen {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create sink close error
    pub fn sink_close(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkClose {
            name: name.into(),
            message: message.into(),
        }
    }
}
