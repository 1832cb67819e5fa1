use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use crate::config::KernelConfig;
use crate::kernel::bootstrap::Application;
use crate::kernel::environment::Environment;
use crate::kernel::error::{Error, ProviderPhase, Result};
use crate::kernel::paths::PathKind;
use crate::provider_system::{ProviderOptions, ServiceProvider};

/// Temporary directories for every path kind, exposed as `CORE_PATH_*`
/// overrides in an isolated environment.
pub(crate) struct TestPaths {
    root: TempDir,
}

impl TestPaths {
    pub(crate) fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temporary directory");
        for kind in PathKind::ALL {
            std::fs::create_dir_all(root.path().join(kind.as_str()))
                .expect("Failed to create path kind directory");
        }
        Self { root }
    }

    pub(crate) fn dir(&self, kind: PathKind) -> PathBuf {
        self.root.path().join(kind.as_str())
    }

    pub(crate) fn root(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub(crate) fn environment(&self) -> Environment {
        Environment::isolated(
            PathKind::ALL
                .iter()
                .map(|kind| (kind.env_var(), self.dir(*kind).to_string_lossy().to_string())),
        )
    }

    /// An application wired to these directories
    pub(crate) fn application(&self) -> Application {
        Application::with_environment(self.environment())
    }
}

pub(crate) fn test_config() -> KernelConfig {
    KernelConfig::new("test", "ark", "unitnet", "3.0.0")
}

/// Ordered record of provider hook calls, shared between providers.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Provider that records every hook call and can fail one phase on demand.
#[derive(Default)]
pub(crate) struct RecordingProvider {
    pub(crate) name: String,
    pub(crate) requires: Vec<String>,
    pub(crate) journal: Journal,
    pub(crate) fail_on: Option<ProviderPhase>,
    pub(crate) options: Mutex<ProviderOptions>,
}

impl RecordingProvider {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
            ..Self::default()
        }
    }

    pub(crate) fn requiring(mut self, required: &str) -> Self {
        self.requires.push(required.to_string());
        self
    }

    pub(crate) fn failing_on(mut self, phase: ProviderPhase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    pub(crate) fn shared(self) -> Arc<dyn ServiceProvider> {
        Arc::new(self)
    }

    fn record(&self, phase: ProviderPhase) -> Result<()> {
        self.journal.lock().push(format!("{}:{}", phase, self.name));
        if self.fail_on == Some(phase) {
            return Err(Error::Other(format!("{} refused to {}", self.name, phase)));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceProvider for RecordingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_providers(&self) -> Vec<String> {
        self.requires.clone()
    }

    fn configure(&mut self, options: ProviderOptions) {
        *self.options.get_mut() = options;
    }

    async fn register(&self, app: &Application) -> Result<()> {
        self.record(ProviderPhase::Register)?;
        app.bind(format!("provider.{}", self.name), self.name.clone());
        Ok(())
    }

    async fn boot(&self, _app: &Application) -> Result<()> {
        self.record(ProviderPhase::Boot)
    }

    async fn dispose(&self, _app: &Application) -> Result<()> {
        self.record(ProviderPhase::Dispose)
    }
}
