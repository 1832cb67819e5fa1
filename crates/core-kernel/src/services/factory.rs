use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::kernel::error::{Error, Result};
use crate::services::logger::{LogFacadeLogger, Logger};

type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Named driver constructors for one kind of service.
///
/// Cloning shares the driver table.
pub struct DriverFactory<T> {
    name: &'static str,
    drivers: Arc<RwLock<HashMap<String, Constructor<T>>>>,
}

impl<T> Clone for DriverFactory<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            drivers: Arc::clone(&self.drivers),
        }
    }
}

impl<T> fmt::Debug for DriverFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverFactory")
            .field("name", &self.name)
            .field("drivers", &self.drivers())
            .finish()
    }
}

impl<T> DriverFactory<T> {
    /// An empty factory; `name` appears in `DriverNotFound` errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            drivers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register or replace the driver called `driver`.
    pub fn extend<F>(&self, driver: &str, constructor: F)
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        log::debug!("Registering '{}' driver for the {} factory", driver, self.name);
        self.drivers
            .write()
            .insert(driver.to_string(), Arc::new(constructor));
    }

    /// Build a fresh instance of `driver`.
    pub fn make(&self, driver: &str) -> Result<T> {
        let constructor = self
            .drivers
            .read()
            .get(driver)
            .cloned()
            .ok_or_else(|| Error::DriverNotFound {
                factory: self.name.to_string(),
                driver: driver.to_string(),
            })?;
        Ok(constructor())
    }

    pub fn has(&self, driver: &str) -> bool {
        self.drivers.read().contains_key(driver)
    }

    /// Registered driver names, sorted
    pub fn drivers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Opaque service handle produced by the cache and queue factories
pub type AnyService = Arc<dyn Any + Send + Sync>;

pub type LoggerFactory = DriverFactory<Arc<dyn Logger>>;
pub type CacheFactory = DriverFactory<AnyService>;
pub type QueueFactory = DriverFactory<AnyService>;

/// Logger factory with the default `log` driver registered
pub fn logger_factory() -> LoggerFactory {
    let factory = LoggerFactory::new("logger");
    factory.extend(crate::kernel::constants::DEFAULT_LOGGER_DRIVER, || {
        Arc::new(LogFacadeLogger::default()) as Arc<dyn Logger>
    });
    factory
}

/// Cache factory without drivers; providers extend it
pub fn cache_factory() -> CacheFactory {
    CacheFactory::new("cache")
}

/// Queue factory without drivers; providers extend it
pub fn queue_factory() -> QueueFactory {
    QueueFactory::new("queue")
}
