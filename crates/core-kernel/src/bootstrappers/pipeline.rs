use std::fmt;
use std::sync::Arc;

use crate::bootstrappers::Bootstrapper;
use crate::bootstrappers::core_bootstrappers::{
    BootServiceProviders, LoadConfiguration, LoadEnvironmentVariables, RegisterServiceProviders,
    ValidateNetwork,
};
use crate::event::KernelEvent;
use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

/// The kernel's own steps. The discriminant is the ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KernelBootstrapper {
    LoadEnvironmentVariables = 1,
    LoadConfiguration = 2,
    ValidateNetwork = 3,
    RegisterServiceProviders = 4,
    BootServiceProviders = 5,
}

/// Kernel steps in execution order
pub const KERNEL_BOOTSTRAPPERS: [KernelBootstrapper; 5] = [
    KernelBootstrapper::LoadEnvironmentVariables,
    KernelBootstrapper::LoadConfiguration,
    KernelBootstrapper::ValidateNetwork,
    KernelBootstrapper::RegisterServiceProviders,
    KernelBootstrapper::BootServiceProviders,
];

impl KernelBootstrapper {
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            KernelBootstrapper::LoadEnvironmentVariables => "LoadEnvironmentVariables",
            KernelBootstrapper::LoadConfiguration => "LoadConfiguration",
            KernelBootstrapper::ValidateNetwork => "ValidateNetwork",
            KernelBootstrapper::RegisterServiceProviders => "RegisterServiceProviders",
            KernelBootstrapper::BootServiceProviders => "BootServiceProviders",
        }
    }

    pub fn instantiate(&self) -> Arc<dyn Bootstrapper> {
        match self {
            KernelBootstrapper::LoadEnvironmentVariables => Arc::new(LoadEnvironmentVariables),
            KernelBootstrapper::LoadConfiguration => Arc::new(LoadConfiguration),
            KernelBootstrapper::ValidateNetwork => Arc::new(ValidateNetwork),
            KernelBootstrapper::RegisterServiceProviders => Arc::new(RegisterServiceProviders),
            KernelBootstrapper::BootServiceProviders => Arc::new(BootServiceProviders),
        }
    }
}

impl fmt::Display for KernelBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.ordinal(), self.name())
    }
}

/// Ordered list of bootstrappers.
///
/// Each step is announced with `Bootstrapping`, run, then confirmed with
/// `Bootstrapped`. Steps run strictly one after another and the first error
/// aborts the rest.
#[derive(Clone)]
pub struct BootstrapPipeline {
    steps: Vec<Arc<dyn Bootstrapper>>,
}

impl fmt::Debug for BootstrapPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapPipeline")
            .field("steps", &self.names())
            .finish()
    }
}

impl BootstrapPipeline {
    /// The kernel pipeline, in [`KERNEL_BOOTSTRAPPERS`] order
    pub fn kernel() -> Self {
        Self {
            steps: KERNEL_BOOTSTRAPPERS.iter().map(|step| step.instantiate()).collect(),
        }
    }

    /// A pipeline running exactly `steps`, in the given order
    pub fn with_bootstrappers(steps: Vec<Arc<dyn Bootstrapper>>) -> Self {
        Self { steps }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step.
    pub async fn run(&self, app: &Application) -> Result<()> {
        self.execute(app, self.steps.iter()).await
    }

    /// Run only the steps that are repeated on reboot.
    pub async fn rerun(&self, app: &Application) -> Result<()> {
        self.execute(app, self.steps.iter().filter(|step| !step.runs_once()))
            .await
    }

    async fn execute<'a, I>(&self, app: &Application, steps: I) -> Result<()>
    where
        I: Iterator<Item = &'a Arc<dyn Bootstrapper>>,
    {
        let events = app.events()?;
        for step in steps {
            let name = step.name();
            events
                .dispatch(&KernelEvent::Bootstrapping { bootstrapper: name })
                .await?;
            log::debug!("Running bootstrapper '{}'", name);
            step.bootstrap(app).await.inspect_err(|e| {
                log::error!("Bootstrapper '{}' failed: {}", name, e);
            })?;
            events
                .dispatch(&KernelEvent::Bootstrapped { bootstrapper: name })
                .await?;
        }
        Ok(())
    }
}

impl Default for BootstrapPipeline {
    fn default() -> Self {
        Self::kernel()
    }
}
