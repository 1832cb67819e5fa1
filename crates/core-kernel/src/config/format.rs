use std::path::Path;

use serde_json::Value;

use crate::config::error::ConfigError;

/// File formats the local loader picks up from the config directory.
///
/// JSON is always read; YAML and TOML follow the `yaml-config` and
/// `toml-config` features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Canonical extension, also used as the format label in parse errors
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Format of a config file, or `None` when the loader should skip it.
    /// Matching is case-insensitive and accepts `.yml`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Parse file contents into a JSON tree. `path` is only used for error context.
    pub fn parse(&self, data: &str, path: &Path) -> Result<Value, ConfigError> {
        let deserialization_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::Deserialization {
                format: self.extension().to_string(),
                path: path.to_path_buf(),
                source,
            }
        };
        match self {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| deserialization_error(Box::new(e)))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| deserialization_error(Box::new(e)))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::from_str(data).map_err(|e| deserialization_error(Box::new(e)))
            }
        }
    }
}
