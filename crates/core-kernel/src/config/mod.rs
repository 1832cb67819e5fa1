//! # Core Kernel Configuration
//!
//! The process configuration lives in a [`ConfigRepository`], a JSON tree
//! addressed by dotted paths. A [`ConfigFactory`] picks the [`ConfigLoader`]
//! named by the initial [`KernelConfig`] and seeds the repository from it;
//! the loader itself runs later, as a bootstrap step.
pub mod error;
pub mod factory;
pub mod format;
pub mod loader;
pub mod repository;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kernel::constants::DEFAULT_CONFIG_LOADER;

pub use error::ConfigError;
pub use factory::ConfigFactory;
pub use format::ConfigFormat;
pub use loader::{ConfigLoader, LocalConfigLoader};
pub use repository::ConfigRepository;

/// Initial configuration object handed to `Application::bootstrap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelConfig {
    #[serde(default)]
    pub env: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub version: String,
    /// Name of the loader strategy, `"local"` when omitted
    #[serde(default = "default_config_loader")]
    pub config_loader: String,
    /// Opaque, loader-specific options
    #[serde(default)]
    pub options: Value,
}

fn default_config_loader() -> String {
    DEFAULT_CONFIG_LOADER.to_string()
}

impl KernelConfig {
    pub fn new(
        env: impl Into<String>,
        token: impl Into<String>,
        network: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            env: env.into(),
            token: token.into(),
            network: network.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_config_loader(mut self, loader: impl Into<String>) -> Self {
        self.config_loader = loader.into();
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// The tree the configuration repository is seeded with.
    pub fn to_value(&self) -> Value {
        // Plain strings and a JSON value cannot fail to serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            env: String::new(),
            token: String::new(),
            network: String::new(),
            version: String::new(),
            config_loader: default_config_loader(),
            options: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests;
