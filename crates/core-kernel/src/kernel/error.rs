//! # Core Kernel Errors
//!
//! Defines the top-level error type of the kernel.
//!
//! [`Error`] covers binding lookups, filesystem namespace resolution, network
//! detection and lifecycle misuse. Subsystems with their own error enums
//! ([`ConfigError`], [`EventSystemError`]) convert into it with `?`.
//! Nothing in the kernel recovers from these errors locally: every failure
//! aborts the phase in progress and surfaces to the caller.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::event::error::EventSystemError;

/// Error type shared by every kernel operation
#[derive(Debug, ThisError)]
pub enum Error {
    /// A key was resolved that was never bound. Always a programming error.
    #[error("Binding not found: '{key}'")]
    BindingNotFound { key: String },

    /// The key is bound, but to a value of a different type.
    #[error("Binding '{key}' does not hold a value of type {expected}")]
    BindingTypeMismatch { key: String, expected: &'static str },

    /// A required directory does not exist on disk.
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Token or network missing, or the configured network disagrees with the bound one.
    #[error("Failed to detect network: {reason}")]
    FailedNetworkDetection { reason: String },

    /// No default location could be computed for a path kind.
    #[error("Path resolution failed for '{kind}': {reason}")]
    PathResolutionFailed { kind: String, reason: String },

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
    },

    /// A provider declared a dependency on a provider that is not registered yet.
    #[error("Service provider '{provider}' requires '{required}', which is not registered")]
    MissingRequiredProvider { provider: String, required: String },

    /// A provider hook failed. The kernel does not roll back other providers.
    #[error("Service provider '{provider}' failed during {phase}: {source}")]
    Provider {
        provider: String,
        phase: ProviderPhase,
        #[source]
        source: Box<Error>,
    },

    /// A driver factory was asked for a driver it does not know.
    #[error("Driver '{driver}' is not registered with the {factory} factory")]
    DriverNotFound { factory: String, driver: String },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Bootstrap")]
    Bootstrap,
    #[error("Boot")]
    Boot,
    #[error("Reboot")]
    Reboot,
}

/// The provider hook that was running when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ProviderPhase {
    #[error("register")]
    Register,
    #[error("boot")]
    Boot,
    #[error("dispose")]
    Dispose,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Create an I/O error carrying the operation and the path it touched.
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }

    /// Create a lifecycle error for the given phase.
    pub fn lifecycle(phase: KernelLifecyclePhase, message: impl Into<String>) -> Self {
        Error::KernelLifecycleError {
            phase,
            message: message.into(),
        }
    }

    /// Wrap a provider hook failure with the provider name and phase.
    pub fn provider(provider: impl Into<String>, phase: ProviderPhase, source: Error) -> Self {
        Error::Provider {
            provider: provider.into(),
            phase,
            source: Box::new(source),
        }
    }

    /// Returns true for `BindingNotFound`, looking through provider wrappers.
    pub fn is_binding_not_found(&self) -> bool {
        match self {
            Error::BindingNotFound { .. } => true,
            Error::Provider { source, .. } => source.is_binding_not_found(),
            _ => false,
        }
    }
}
