use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::repository::merge_values;
use crate::kernel::bootstrap::Application;
use crate::kernel::error::{Error, ProviderPhase, Result};
use crate::provider_system::traits::{ProviderOptions, ProviderState, ServiceProvider};

struct TrackedProvider {
    provider: Arc<dyn ServiceProvider>,
    state: ProviderState,
}

/// Tracks the registered providers in registration order.
///
/// The lock is never held while a hook runs, so hooks may use the repository
/// through the application.
#[derive(Default)]
pub struct ProviderRepository {
    tracked: Mutex<Vec<TrackedProvider>>,
}

impl fmt::Debug for ProviderRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tracked = self.tracked.lock();
        let names: Vec<String> = tracked
            .iter()
            .map(|t| format!("{}({})", t.provider.name(), t.state))
            .collect();
        f.debug_struct("ProviderRepository").field("providers", &names).finish()
    }
}

impl ProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_tracked_name(&self, name: &str) -> bool {
        self.tracked.lock().iter().any(|t| t.provider.name() == name)
    }

    /// Run the provider's `register` hook, then track it.
    ///
    /// Registering the same instance twice runs the hook again but tracks it
    /// once.
    pub async fn register(&self, provider: Arc<dyn ServiceProvider>, app: &Application) -> Result<()> {
        let name = provider.name().to_string();
        for required in provider.required_providers() {
            if !self.is_tracked_name(&required) {
                return Err(Error::MissingRequiredProvider {
                    provider: name,
                    required,
                });
            }
        }

        log::debug!("Registering service provider '{}'", name);
        provider
            .register(app)
            .await
            .map_err(|e| Error::provider(&name, ProviderPhase::Register, e))?;

        let mut tracked = self.tracked.lock();
        if tracked.iter().any(|t| Arc::ptr_eq(&t.provider, &provider)) {
            log::debug!("Service provider '{}' is already tracked", name);
        } else {
            tracked.push(TrackedProvider {
                provider,
                state: ProviderState::Registered,
            });
        }
        Ok(())
    }

    /// Run the provider's `boot` hook. Prior registration is not checked.
    pub async fn boot(&self, provider: Arc<dyn ServiceProvider>, app: &Application) -> Result<()> {
        let name = provider.name().to_string();
        log::debug!("Booting service provider '{}'", name);
        provider
            .boot(app)
            .await
            .map_err(|e| Error::provider(&name, ProviderPhase::Boot, e))?;

        let mut tracked = self.tracked.lock();
        if let Some(entry) = tracked.iter_mut().find(|t| Arc::ptr_eq(&t.provider, &provider)) {
            entry.state = ProviderState::Booted;
        }
        Ok(())
    }

    /// Build and configure a provider without registering it.
    ///
    /// `options` are deep-merged over the provider's `defaults()`.
    pub fn make<P>(&self, options: ProviderOptions) -> Arc<P>
    where
        P: ServiceProvider + Default,
    {
        let mut provider = P::default();
        let mut merged = Value::Object(provider.defaults());
        merge_values(&mut merged, Value::Object(options));
        let merged = match merged {
            Value::Object(map) => map,
            _ => ProviderOptions::new(),
        };
        provider.configure(merged);
        Arc::new(provider)
    }

    /// Dispose every tracked provider, last registered first.
    ///
    /// Each provider leaves the set before its hook runs, so it is disposed at
    /// most once. The first failure stops the sweep; providers not reached yet
    /// stay tracked. Returns the disposed names in disposal order.
    pub async fn dispose_all(&self, app: &Application) -> Result<Vec<String>> {
        let mut disposed = Vec::new();
        loop {
            let next = self.tracked.lock().pop();
            let Some(entry) = next else { break };
            let name = entry.provider.name().to_string();
            log::debug!("Disposing service provider '{}'", name);
            entry
                .provider
                .dispose(app)
                .await
                .map_err(|e| Error::provider(&name, ProviderPhase::Dispose, e))?;
            disposed.push(name);
        }
        Ok(disposed)
    }

    /// Tracked providers in registration order
    pub fn all(&self) -> Vec<Arc<dyn ServiceProvider>> {
        self.tracked.lock().iter().map(|t| Arc::clone(&t.provider)).collect()
    }

    /// First tracked provider with the given name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ServiceProvider>> {
        self.tracked
            .lock()
            .iter()
            .find(|t| t.provider.name() == name)
            .map(|t| Arc::clone(&t.provider))
    }

    pub fn state(&self, name: &str) -> Option<ProviderState> {
        self.tracked
            .lock()
            .iter()
            .find(|t| t.provider.name() == name)
            .map(|t| t.state)
    }

    pub fn len(&self) -> usize {
        self.tracked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.lock().is_empty()
    }
}
