//! # Core Kernel Bootstrappers
//!
//! Bootstrappers are the ordered steps that prepare the kernel itself. They
//! are distinct from service providers: a bootstrapper has no state of its own
//! and is identified by its position in the pipeline.
//!
//! - **[`pipeline`]**: the static step order ([`KERNEL_BOOTSTRAPPERS`]) and
//!   the [`BootstrapPipeline`] that runs it.
//! - **[`core_bootstrappers`]**: the five kernel steps.
pub mod core_bootstrappers;
pub mod pipeline;

use async_trait::async_trait;

use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

pub use core_bootstrappers::{
    BootServiceProviders, LoadConfiguration, LoadEnvironmentVariables, RegisterServiceProviders,
    ValidateNetwork, parse_env_file,
};
pub use pipeline::{BootstrapPipeline, KERNEL_BOOTSTRAPPERS, KernelBootstrapper};

/// One step of the bootstrap pipeline
#[async_trait]
pub trait Bootstrapper: Send + Sync {
    /// Name used in the `bootstrapping:` / `bootstrapped:` events
    fn name(&self) -> &'static str;

    /// Whether the step prepares the kernel itself and is skipped on reboot
    fn runs_once(&self) -> bool {
        false
    }

    async fn bootstrap(&self, app: &Application) -> Result<()>;
}

// Test module declaration
#[cfg(test)]
mod tests;
