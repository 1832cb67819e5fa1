//! # Core Kernel
//!
//! An application kernel: a process-lifecycle orchestrator that binds
//! configuration, resolves filesystem namespaces and drives a strict
//! multi-phase startup and shutdown sequence across pluggable service
//! providers.
pub mod bootstrappers;
pub mod config;
pub mod container;
pub mod event;
pub mod kernel;
pub mod provider_system;
pub mod services;

// Re-export key public types/traits for easier use by the binary and providers
pub use bootstrappers::{BootstrapPipeline, Bootstrapper, KernelBootstrapper};
pub use config::{ConfigFactory, ConfigLoader, ConfigRepository, KernelConfig};
pub use container::Container;
pub use event::{AsyncEventHandler, EventKind, EventResult, KernelEvent, SharedEventDispatcher};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, Environment, KernelState, Namespace, PathKind, Result};
pub use provider_system::{ProviderOptions, ProviderRepository, ProviderState, ServiceProvider};
pub use services::{LogFacadeLogger, Logger};

// Shared fixtures for the unit tests
#[cfg(test)]
pub(crate) mod test_support;
