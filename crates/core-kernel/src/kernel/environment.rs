//! Process environment context.
//!
//! The kernel publishes its identity (`CORE_ENV`, `CORE_TOKEN`, ...) and every
//! resolved path (`CORE_PATH_<KIND>`) as environment variables so descendant
//! processes observe the same resolution. Those writes happen once, during
//! bootstrap, and are never rolled back: `terminate` leaves them in place.
//!
//! [`Environment::process`] is the real process table. [`Environment::isolated`]
//! is an in-memory table for running several kernels in one process.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Clone)]
enum Backend {
    Process,
    Isolated(Arc<RwLock<HashMap<String, String>>>),
}

/// Handle to the environment table the kernel reads and writes.
#[derive(Clone)]
pub struct Environment {
    backend: Backend,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match &self.backend {
            Backend::Process => "process",
            Backend::Isolated(_) => "isolated",
        };
        f.debug_struct("Environment").field("backend", &backend).finish()
    }
}

impl Environment {
    /// The real process environment
    pub fn process() -> Self {
        Self {
            backend: Backend::Process,
        }
    }

    /// An in-memory environment seeded with `vars`
    pub fn isolated<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            backend: Backend::Isolated(Arc::new(RwLock::new(table))),
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self.backend, Backend::Process)
    }

    /// Read a variable. Non-unicode process values read as `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Process => std::env::var(key).ok(),
            Backend::Isolated(table) => table.read().get(key).cloned(),
        }
    }

    /// Read a variable, treating an empty or whitespace-only value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Write a variable.
    pub fn set(&self, key: &str, value: &str) {
        log::trace!("Setting environment variable {}={}", key, value);
        match &self.backend {
            // SAFETY: the kernel only writes the environment from the task that
            // drives bootstrap, before providers are booted and start threads
            // of their own.
            Backend::Process => unsafe { std::env::set_var(key, value) },
            Backend::Isolated(table) => {
                table.write().insert(key.to_string(), value.to_string());
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::process()
    }
}
