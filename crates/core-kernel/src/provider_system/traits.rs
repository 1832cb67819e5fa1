use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

/// Options handed to a provider before it is registered
pub type ProviderOptions = Map<String, Value>;

/// Where a provider is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderState {
    Registered,
    Booted,
    Disposed,
}

impl fmt::Display for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderState::Registered => write!(f, "registered"),
            ProviderState::Booted => write!(f, "booted"),
            ProviderState::Disposed => write!(f, "disposed"),
        }
    }
}

/// A pluggable unit of the kernel.
///
/// The kernel calls `register`, `boot` and `dispose` in that order and owns
/// none of the provider's state. Hooks take `&self`: a provider that needs to
/// remember something across hooks keeps it behind its own lock.
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// The name of the provider
    fn name(&self) -> &str;

    /// Providers that must already be registered before this one
    fn required_providers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Default options, merged under the options given to `make`
    fn defaults(&self) -> ProviderOptions {
        ProviderOptions::new()
    }

    /// Receive the merged options. Called once, before registration.
    fn configure(&mut self, _options: ProviderOptions) {}

    /// Bind the provider's services into the application
    async fn register(&self, app: &Application) -> Result<()>;

    /// Start the provider's services
    async fn boot(&self, _app: &Application) -> Result<()> {
        Ok(())
    }

    /// Release the provider's resources
    async fn dispose(&self, _app: &Application) -> Result<()> {
        Ok(())
    }
}
