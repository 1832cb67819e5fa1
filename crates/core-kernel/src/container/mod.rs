//! # Binding Registry
//!
//! Process-wide key to value store used for dependency resolution.
//!
//! Values are stored type-erased and handed back as clones, so services are
//! bound as `Arc<..>` (or another cheaply clonable handle) and plain data such
//! as `String` or `PathBuf` is bound directly. Three binding forms exist:
//!
//! - **instance**: [`Container::bind`], the value itself
//! - **factory**: [`Container::bind_factory`], built on every resolve
//! - **singleton**: [`Container::singleton`], built on first resolve, then cached
//!
//! Rebinding a key overwrites it. Resolving an unbound key fails with
//! [`Error::BindingNotFound`].
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::kernel::error::{Error, Result};

type BoxedValue = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<BoxedValue> + Send + Sync>;

enum Binding {
    Instance(BoxedValue),
    Factory { factory: Factory, singleton: bool },
}

/// Shared binding registry. Clones share the same underlying table.
#[derive(Clone, Default)]
pub struct Container {
    bindings: Arc<RwLock<HashMap<String, Binding>>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .finish()
    }
}

impl Container {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under `key`, replacing any previous binding.
    pub fn bind<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        log::trace!("Binding '{}' ({})", key, type_name::<T>());
        self.bindings
            .write()
            .insert(key, Binding::Instance(Arc::new(value)));
    }

    /// Bind a factory invoked on every resolve of `key`.
    pub fn bind_factory<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_factory(key.into(), factory, false);
    }

    /// Bind a factory invoked once, on the first resolve of `key`.
    pub fn singleton<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_factory(key.into(), factory, true);
    }

    fn insert_factory<T, F>(&self, key: String, factory: F, singleton: bool)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container: &Container| {
            factory(container).map(|value| Arc::new(value) as BoxedValue)
        });
        self.bindings
            .write()
            .insert(key, Binding::Factory { factory, singleton });
    }

    /// Resolve a clone of the value bound under `key`.
    pub fn resolve<T>(&self, key: &str) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let value = self.resolve_boxed(key)?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::BindingTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    fn resolve_boxed(&self, key: &str) -> Result<BoxedValue> {
        // Factories run without the lock held so they can resolve other keys.
        let (factory, singleton) = {
            let bindings = self.bindings.read();
            match bindings.get(key) {
                None => {
                    return Err(Error::BindingNotFound {
                        key: key.to_string(),
                    });
                }
                Some(Binding::Instance(value)) => return Ok(value.clone()),
                Some(Binding::Factory { factory, singleton }) => (factory.clone(), *singleton),
            }
        };

        let value = factory(self)?;
        if !singleton {
            return Ok(value);
        }

        let mut bindings = self.bindings.write();
        match bindings.get(key) {
            // Another caller won the race; keep the first instance.
            Some(Binding::Instance(existing)) => Ok(existing.clone()),
            _ => {
                bindings.insert(key.to_string(), Binding::Instance(value.clone()));
                Ok(value)
            }
        }
    }

    /// Check whether `key` is bound.
    pub fn has(&self, key: &str) -> bool {
        self.bindings.read().contains_key(key)
    }

    /// Whether resolving `key` always yields the same instance.
    /// Returns `None` when the key is unbound.
    pub fn is_shared(&self, key: &str) -> Option<bool> {
        self.bindings.read().get(key).map(|binding| match binding {
            Binding::Instance(_) => true,
            Binding::Factory { singleton, .. } => *singleton,
        })
    }

    /// Remove a binding. Returns true if the key was bound.
    pub fn unbind(&self, key: &str) -> bool {
        self.bindings.write().remove(key).is_some()
    }

    /// All bound keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bindings.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}
