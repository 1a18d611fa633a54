//! Error taxonomy
//!
//! Only [`BindingError::Duplicate`] is meant to escape to the caller at startup.
//! Everything raised while a step is running is handled where it happens:
//! clamped, logged and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the binding registry
#[derive(Debug, Error)]
pub enum BindingError {
    /// A binding with the same identity is already registered
    #[error("Cannot register binding '{0}' twice")]
    Duplicate(String),

    /// No binding with this identity exists
    #[error("Unknown binding: {0}")]
    Unknown(String),

    /// A binding needs at least one code
    #[error("Binding '{0}' has no codes")]
    EmptyCodes(String),
}

/// Errors raised by the device layer
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device id outside of the slot table; always clamped, never propagated
    #[error("Controller '{id}' doesn't exist, using slot {clamped}")]
    InvalidDeviceId { id: usize, clamped: usize },

    /// The hardware backend failed
    #[error("Hardware backend error: {0}")]
    Backend(String),

    /// The mapping database could not be read
    #[error("Failed to load mappings from {}: {reason}", .path.display())]
    MappingLoad { path: PathBuf, reason: String },
}

/// Raised by a press action; isolated to the binding that owns the handler
#[derive(Debug, Clone, Error)]
#[error("Handler fault: {reason}")]
pub struct HandlerFault {
    pub reason: String,
}

impl HandlerFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading or writing the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}
