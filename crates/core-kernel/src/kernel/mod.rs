//! # Core Kernel
//!
//! The `kernel` module holds the [`Application`](bootstrap::Application), the
//! process-lifecycle orchestrator that binds configuration, resolves the
//! filesystem namespace and drives service providers through a strict
//! startup and shutdown sequence.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Lifecycle**: [`Application`] with `bootstrap`, `boot`, `reboot`,
//!   `terminate` and maintenance toggling, tracked as a [`KernelState`].
//! - **Namespace**: [`Namespace`] derives `token-network` and `token/network`.
//! - **Paths**: [`PathResolver`] computes the five standard directories,
//!   honouring `CORE_PATH_<KIND>` overrides.
//! - **Environment**: [`Environment`] is the table the kernel publishes its
//!   identity and resolved paths to.
//! - **Constants**: well-known binding keys and variable names in `constants`.
//! - **Error Handling**: the kernel [`Error`](error::Error) and `Result` alias.
pub mod bootstrap;
pub mod constants;
pub mod environment;
pub mod error;
pub mod namespace;
pub mod paths;

pub use bootstrap::{Application, KernelState, MaintenanceFlag};
pub use environment::Environment;
pub use error::{Error, KernelLifecyclePhase, ProviderPhase, Result};
pub use namespace::Namespace;
pub use paths::{PathEntry, PathKind, PathResolver, PathSource};

// Test module declaration
#[cfg(test)]
mod tests;
