use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::error::ConfigError;
use crate::config::loader::{ConfigLoader, LocalConfigLoader};
use crate::config::repository::ConfigRepository;
use crate::kernel::bootstrap::Application;
use crate::kernel::constants::keys;

type LoaderConstructor = Arc<dyn Fn() -> Arc<dyn ConfigLoader> + Send + Sync>;

/// Selects a configuration loader strategy by name.
///
/// The `"local"` loader is always available; further loaders are added with
/// [`ConfigFactory::extend`] before the application is bootstrapped.
#[derive(Clone)]
pub struct ConfigFactory {
    loaders: HashMap<String, LoaderConstructor>,
}

impl fmt::Debug for ConfigFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFactory")
            .field("loaders", &self.loader_names())
            .finish()
    }
}

impl ConfigFactory {
    /// Create a factory with the built-in loaders
    pub fn new() -> Self {
        let mut factory = Self {
            loaders: HashMap::new(),
        };
        factory.extend("local", || Arc::new(LocalConfigLoader));
        factory
    }

    /// Register (or replace) a loader constructor under `name`.
    pub fn extend<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn ConfigLoader> + Send + Sync + 'static,
    {
        self.loaders.insert(name.into(), Arc::new(constructor));
    }

    /// Check whether a loader is registered under `name`
    pub fn has_loader(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Registered loader names, sorted
    pub fn loader_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build the repository seeded with `seed` and bind the selected loader
    /// under `config.loader` so the `LoadConfiguration` step can run it.
    pub fn make(
        &self,
        app: &Application,
        loader_name: &str,
        seed: Value,
    ) -> Result<ConfigRepository, ConfigError> {
        let constructor = self
            .loaders
            .get(loader_name)
            .ok_or_else(|| ConfigError::UnknownLoader {
                name: loader_name.to_string(),
            })?;
        let loader = constructor();
        log::debug!("Using configuration loader '{}'", loader.name());
        app.bind(keys::CONFIG_LOADER, loader);
        Ok(ConfigRepository::new(seed))
    }
}

impl Default for ConfigFactory {
    fn default() -> Self {
        Self::new()
    }
}
