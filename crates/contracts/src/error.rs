//! Layered error definitions
//!
//! Categorized by source: config / port / sink. Transient per-record
//! conditions (timeouts, malformed lines, unresolvable rules) are NOT errors;
//! they surface as outcomes or are skipped at the call site.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum AcquisitionError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Port Errors =====
    /// Port open error
    #[error("cannot open port '{port}': {message}")]
    PortOpen { port: String, message: String },

    /// Every configured port is closed; the engine can produce no more data
    #[error("all ports closed")]
    AllPortsClosed,

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl AcquisitionError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create port open error
    pub fn port_open(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PortOpen {
            port: port.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
