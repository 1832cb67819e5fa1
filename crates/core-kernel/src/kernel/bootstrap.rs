use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use serde::{Deserialize, Serialize};

use crate::bootstrappers::BootstrapPipeline;
use crate::config::{ConfigFactory, ConfigRepository, KernelConfig};
use crate::container::Container;
use crate::event::{EventResult, KernelEvent, SharedEventDispatcher};
use crate::kernel::constants::{self, env, keys};
use crate::kernel::environment::Environment;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::namespace::Namespace;
use crate::kernel::paths::{PathKind, PathResolver, ensure_directory};
use crate::provider_system::{ProviderRepository, ProviderState, ServiceProvider};
use crate::services::{Logger, cache_factory, logger_factory, queue_factory};

static PANIC_HOOK: Once = Once::new();

/// Lifecycle states of the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelState {
    Uninitialized,
    Bootstrapping,
    Bootstrapped,
    Booted,
    Rebooting,
    Terminating,
    Terminated,
}

impl fmt::Display for KernelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelState::Uninitialized => "uninitialized",
            KernelState::Bootstrapping => "bootstrapping",
            KernelState::Bootstrapped => "bootstrapped",
            KernelState::Booted => "booted",
            KernelState::Rebooting => "rebooting",
            KernelState::Terminating => "terminating",
            KernelState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Contents of the maintenance flag file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceFlag {
    /// Epoch milliseconds at which maintenance was enabled
    pub time: i64,
}

/// The application kernel.
///
/// Owns the binding registry and drives the lifecycle:
/// `bootstrap` → `boot` → (`reboot`)* → `terminate`.
///
/// Services are reached through the registry under well-known keys; the typed
/// accessors are plain lookups and fail with [`Error::BindingNotFound`] when
/// used before the service was bound.
pub struct Application {
    container: Container,
    environment: Environment,
    config_factory: ConfigFactory,
    providers: ProviderRepository,
    declared_providers: Vec<Arc<dyn ServiceProvider>>,
    pipeline: BootstrapPipeline,
    state: KernelState,
    bootstrapped: bool,
    booted: bool,
    prepared: bool,
    inherited_network: Option<String>,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("state", &self.state)
            .field("environment", &self.environment)
            .field("providers", &self.providers)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl Application {
    /// A kernel reading and writing the real process environment
    pub fn new() -> Self {
        Self::with_environment(Environment::process())
    }

    /// A kernel bound to the given environment table
    pub fn with_environment(environment: Environment) -> Self {
        Self {
            container: Container::new(),
            environment,
            config_factory: ConfigFactory::new(),
            providers: ProviderRepository::new(),
            declared_providers: Vec::new(),
            pipeline: BootstrapPipeline::kernel(),
            state: KernelState::Uninitialized,
            bootstrapped: false,
            booted: false,
            prepared: false,
            inherited_network: None,
        }
    }

    /// Declare a provider. Providers are registered in declaration order.
    pub fn provider(&mut self, provider: Arc<dyn ServiceProvider>) -> &mut Self {
        self.declared_providers.push(provider);
        self
    }

    /// Replace the bootstrap pipeline. Must be called before `bootstrap`.
    pub fn set_pipeline(&mut self, pipeline: BootstrapPipeline) -> &mut Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config_factory(&self) -> &ConfigFactory {
        &self.config_factory
    }

    /// Register extra config loaders before bootstrapping.
    pub fn config_factory_mut(&mut self) -> &mut ConfigFactory {
        &mut self.config_factory
    }

    // --- Lifecycle ---

    /// Prepare the kernel and boot it.
    ///
    /// Binds the configuration, the identity values and the namespace,
    /// resolves the standard paths, binds the factories, the event dispatcher
    /// and the logger, then runs [`Application::boot`].
    ///
    /// Succeeds at most once per instance. After `terminate` the kernel is
    /// brought back with [`Application::reboot`]. A failed bootstrap leaves
    /// the kernel `Uninitialized` and may be retried.
    pub async fn bootstrap(&mut self, config: KernelConfig) -> Result<()> {
        if self.prepared || self.bootstrapped {
            return Err(Error::lifecycle(
                KernelLifecyclePhase::Bootstrap,
                "application has already been bootstrapped",
            ));
        }

        log::info!(
            "Bootstrapping {} for {}/{} ({})",
            constants::APP_NAME,
            config.token,
            config.network,
            config.env
        );
        self.state = KernelState::Bootstrapping;
        install_panic_hook();

        if let Err(e) = self.prepare(&config) {
            self.state = KernelState::Uninitialized;
            return Err(e);
        }

        self.state = KernelState::Bootstrapped;
        self.boot().await
    }

    fn prepare(&mut self, config: &KernelConfig) -> Result<()> {
        self.register_configuration(config)?;
        let namespace = Namespace::derive(&config.token, &config.network)?;
        self.inherited_network = self.environment.get_non_empty(env::CORE_NETWORK_NAME);
        self.register_base_bindings(config);
        self.register_namespace(&namespace);
        self.register_paths(&namespace)?;
        self.register_factories();
        self.register_services()
    }

    /// Run the bootstrap pipeline.
    ///
    /// The first boot runs every step; later boots skip the steps that only
    /// prepare the kernel.
    ///
    /// On failure the state falls back to `Uninitialized` (first boot) or
    /// `Terminated` (later boots).
    pub async fn boot(&mut self) -> Result<()> {
        if !self.prepared && self.state != KernelState::Bootstrapped {
            return Err(Error::lifecycle(
                KernelLifecyclePhase::Boot,
                "application must be bootstrapped before it is booted",
            ));
        }

        let pipeline = self.pipeline.clone();
        let outcome = if self.prepared {
            pipeline.rerun(self).await
        } else {
            pipeline.run(self).await
        };
        if let Err(e) = outcome {
            self.state = if self.prepared {
                KernelState::Terminated
            } else {
                KernelState::Uninitialized
            };
            return Err(e);
        }
        self.prepared = true;

        self.bootstrapped = true;
        self.booted = true;
        self.state = KernelState::Booted;
        log::info!(
            "{} booted with {} service provider(s)",
            constants::APP_NAME,
            self.providers.len()
        );
        Ok(())
    }

    /// Dispose every provider, then register and boot them again.
    ///
    /// Configuration, namespace and paths are not resolved again. Both flags
    /// read `false` until the providers are booted again.
    pub async fn reboot(&mut self) -> Result<()> {
        if !self.prepared {
            return Err(Error::lifecycle(
                KernelLifecyclePhase::Reboot,
                "application has never been booted",
            ));
        }

        log::info!("Rebooting {}", constants::APP_NAME);
        self.terminate(Some("reboot"), None).await?;
        self.state = KernelState::Rebooting;
        self.boot().await
    }

    /// Dispose every registered provider and clear the bootstrapped flag.
    ///
    /// Does not end the process. Calling it again disposes an empty set.
    pub async fn terminate(
        &mut self,
        reason: Option<&str>,
        error: Option<&(dyn std::error::Error + Send + Sync)>,
    ) -> Result<()> {
        match reason {
            Some(reason) => log::info!("Terminating {}: {}", constants::APP_NAME, reason),
            None => log::info!("Terminating {}", constants::APP_NAME),
        }
        if let Some(error) = error {
            log::error!("Termination caused by: {}", error);
        }

        self.state = KernelState::Terminating;
        self.bootstrapped = false;
        self.booted = false;

        let disposed = self.providers.dispose_all(self).await?;
        if let Ok(events) = self.events() {
            for provider in disposed.iter() {
                events
                    .dispatch(&KernelEvent::ProviderStateChanged {
                        provider: provider.clone(),
                        state: ProviderState::Disposed,
                    })
                    .await?;
            }
        }
        log::debug!("Disposed {} service provider(s)", disposed.len());

        self.state = KernelState::Terminated;
        Ok(())
    }

    // --- Bootstrap steps that run once ---

    fn register_configuration(&self, config: &KernelConfig) -> Result<()> {
        let repository = self
            .config_factory
            .make(self, &config.config_loader, config.to_value())?;
        self.bind(keys::CONFIG, repository);
        Ok(())
    }

    fn register_base_bindings(&self, config: &KernelConfig) {
        self.bind(keys::APP_ENV, config.env.clone());
        self.bind(keys::APP_TOKEN, config.token.clone());
        self.bind(keys::APP_NETWORK, config.network.clone());
        self.bind(keys::APP_VERSION, config.version.clone());

        self.environment.set(env::CORE_ENV, &config.env);
        self.environment.set(env::NODE_ENV, &config.env);
        self.environment.set(env::CORE_TOKEN, &config.token);
        self.environment.set(env::CORE_NETWORK_NAME, &config.network);
        self.environment.set(env::CORE_VERSION, &config.version);
    }

    fn register_namespace(&self, namespace: &Namespace) {
        log::debug!("Namespace is '{}'", namespace);
        self.bind(keys::APP_NAMESPACE, namespace.name());
        self.bind(keys::APP_DIR_PREFIX, namespace.dir_prefix());
    }

    fn register_paths(&self, namespace: &Namespace) -> Result<()> {
        let resolver = PathResolver::new(&self.environment, namespace);
        for entry in resolver.resolve_all()? {
            self.bind(entry.kind.binding_key(), entry.resolved);
        }
        Ok(())
    }

    fn register_factories(&self) {
        self.bind(keys::LOGGER_FACTORY, logger_factory());
        self.bind(keys::CACHE_FACTORY, cache_factory());
        self.bind(keys::QUEUE_FACTORY, queue_factory());
    }

    /// Bind the dispatcher and the logger unless they were bound up front.
    fn register_services(&self) -> Result<()> {
        if !self.has(keys::EVENT_DISPATCHER) {
            self.bind(keys::EVENT_DISPATCHER, SharedEventDispatcher::new());
        }
        if !self.has(keys::LOG) {
            let factory = logger_factory();
            let logger: Arc<dyn Logger> = factory.make(constants::DEFAULT_LOGGER_DRIVER)?;
            self.bind(keys::LOG, logger);
        }
        Ok(())
    }

    // --- Maintenance ---

    fn maintenance_flag_path(&self) -> Result<PathBuf> {
        self.path_to(PathKind::Temp, constants::MAINTENANCE_FLAG)
    }

    /// Write the maintenance flag and announce it.
    pub async fn enable_maintenance(&self) -> Result<()> {
        let path = self.maintenance_flag_path()?;
        let flag = MaintenanceFlag {
            time: chrono::Utc::now().timestamp_millis(),
        };
        tokio::fs::write(&path, serde_json::to_string(&flag)?)
            .await
            .map_err(|e| Error::io(e, "write maintenance flag", path.clone()))?;
        self.log()?.info("Application is now in maintenance mode.");
        self.dispatch(&KernelEvent::Maintenance { enabled: true }).await?;
        Ok(())
    }

    /// Remove the maintenance flag and announce it. A missing flag is not an error.
    pub async fn disable_maintenance(&self) -> Result<()> {
        let path = self.maintenance_flag_path()?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(e, "remove maintenance flag", path)),
        }
        self.log()?.info("Application is now live.");
        self.dispatch(&KernelEvent::Maintenance { enabled: false }).await?;
        Ok(())
    }

    /// True while the maintenance flag file exists.
    pub fn is_down_for_maintenance(&self) -> Result<bool> {
        Ok(self.maintenance_flag_path()?.is_file())
    }

    /// The maintenance flag contents, if the flag is set.
    pub async fn read_maintenance_flag(&self) -> Result<Option<MaintenanceFlag>> {
        let path = self.maintenance_flag_path()?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(e, "read maintenance flag", path)),
        }
    }

    // --- Events ---

    /// Dispatch `event` through the bound event dispatcher.
    pub async fn dispatch(&self, event: &KernelEvent) -> Result<EventResult> {
        self.events()?.dispatch(event).await
    }

    // --- Paths ---

    /// Rebind `kind` to an existing directory.
    pub fn use_path(&self, kind: PathKind, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_directory(path)?;
        log::debug!("Using {} path {}", kind, path.display());
        self.bind(kind.binding_key(), path.to_path_buf());
        Ok(())
    }

    pub fn use_data_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.use_path(PathKind::Data, path)
    }

    pub fn use_config_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.use_path(PathKind::Config, path)
    }

    pub fn use_cache_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.use_path(PathKind::Cache, path)
    }

    pub fn use_log_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.use_path(PathKind::Log, path)
    }

    pub fn use_temp_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.use_path(PathKind::Temp, path)
    }

    /// The bound directory for `kind`. Fails if it no longer exists.
    pub fn path(&self, kind: PathKind) -> Result<PathBuf> {
        let path: PathBuf = self.resolve(&kind.binding_key())?;
        ensure_directory(&path)?;
        Ok(path)
    }

    /// `sub` joined onto the directory for `kind`. Only the base is checked.
    pub fn path_to(&self, kind: PathKind, sub: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.path(kind)?.join(sub))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        self.path(PathKind::Data)
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        self.path(PathKind::Config)
    }

    pub fn cache_path(&self) -> Result<PathBuf> {
        self.path(PathKind::Cache)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        self.path(PathKind::Log)
    }

    pub fn temp_path(&self) -> Result<PathBuf> {
        self.path(PathKind::Temp)
    }

    // --- Service accessors ---

    pub fn log(&self) -> Result<Arc<dyn Logger>> {
        self.resolve(keys::LOG)
    }

    pub fn events(&self) -> Result<SharedEventDispatcher> {
        self.resolve(keys::EVENT_DISPATCHER)
    }

    pub fn config(&self) -> Result<ConfigRepository> {
        self.resolve(keys::CONFIG)
    }

    pub fn blockchain<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve(keys::BLOCKCHAIN)
    }

    pub fn p2p<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve(keys::P2P)
    }

    pub fn transaction_pool<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve(keys::TRANSACTION_POOL)
    }

    // --- Identity ---

    pub fn namespace(&self) -> Result<String> {
        self.resolve(keys::APP_NAMESPACE)
    }

    pub fn dir_prefix(&self) -> Result<String> {
        self.resolve(keys::APP_DIR_PREFIX)
    }

    pub fn env(&self) -> Result<String> {
        self.resolve(keys::APP_ENV)
    }

    pub fn token(&self) -> Result<String> {
        self.resolve(keys::APP_TOKEN)
    }

    pub fn network(&self) -> Result<String> {
        self.resolve(keys::APP_NETWORK)
    }

    pub fn version(&self) -> Result<String> {
        self.resolve(keys::APP_VERSION)
    }

    // --- State ---

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    pub fn state(&self) -> KernelState {
        self.state
    }

    /// `CORE_NETWORK_NAME` as it was before bootstrap mirrored the bound network
    pub fn inherited_network(&self) -> Option<&str> {
        self.inherited_network.as_deref()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn providers(&self) -> &ProviderRepository {
        &self.providers
    }

    pub fn declared_providers(&self) -> &[Arc<dyn ServiceProvider>] {
        &self.declared_providers
    }

    // --- Registry facade ---

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn bind<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.container.bind(key, value);
    }

    pub fn resolve<T>(&self, key: &str) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.container.resolve(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.container.has(key)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

/// Route panics through the `log` facade before the default hook runs.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log::error!("Unhandled panic: {}", info);
            previous(info);
        }));
    });
}
