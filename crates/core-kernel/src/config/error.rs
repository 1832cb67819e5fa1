//! # Core Kernel Configuration Errors
//!
//! Defines error types specific to configuration loading.
//!
//! [`ConfigError`] covers loader selection, file parsing and value
//! serialization. Plain lookups never fail: an unknown dotted key reads as
//! `None`.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown configuration loader: '{name}'")]
    UnknownLoader { name: String },

    #[error("Deserialization of '{}' from '{format}' failed: {source}", path.display())]
    Deserialization {
        format: String,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Failed to serialize value for configuration key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        ConfigError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
