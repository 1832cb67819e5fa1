use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::config::repository::ConfigRepository;
use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

/// Strategy that fills the configuration repository during the
/// `LoadConfiguration` bootstrap step.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// Name the loader is selected by (`configLoader` in the initial configuration)
    fn name(&self) -> &str;

    /// Load configuration into `repository`.
    async fn load(&self, app: &Application, repository: &ConfigRepository) -> Result<()>;
}

/// Reads every supported file in the config directory and merges each one
/// under the key equal to its file stem, so `peers.json` becomes `peers.*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalConfigLoader;

#[async_trait]
impl ConfigLoader for LocalConfigLoader {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self, app: &Application, repository: &ConfigRepository) -> Result<()> {
        let config_dir = app.config_path()?;
        let files = config_files(&config_dir).await?;
        log::debug!(
            "Local config loader found {} file(s) in {}",
            files.len(),
            config_dir.display()
        );

        for (path, format) in files {
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ConfigError::io(e, "read config file", path.clone()))?;
            let value = format.parse(&data, &path)?;
            log::debug!("Loaded configuration '{}' from {}", stem, path.display());
            repository.merge(stem, value);
        }
        Ok(())
    }
}

/// Supported config files in `dir`, sorted by path. A missing directory yields
/// no files.
async fn config_files(dir: &Path) -> std::result::Result<Vec<(PathBuf, ConfigFormat)>, ConfigError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ConfigError::io(e, "read config directory", dir.to_path_buf()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConfigError::io(e, "read config directory entry", dir.to_path_buf()))?
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(format) = ConfigFormat::from_path(&path) {
            files.push((path, format));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
