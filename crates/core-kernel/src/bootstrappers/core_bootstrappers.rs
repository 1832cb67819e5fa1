use std::sync::Arc;

use async_trait::async_trait;

use crate::bootstrappers::Bootstrapper;
use crate::config::loader::ConfigLoader;
use crate::event::KernelEvent;
use crate::kernel::bootstrap::Application;
use crate::kernel::constants::{ENV_FILE, env, keys};
use crate::kernel::error::{Error, Result};
use crate::provider_system::ProviderState;

/// Reads `<config>/.env` and sets every variable that is not already set.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadEnvironmentVariables;

#[async_trait]
impl Bootstrapper for LoadEnvironmentVariables {
    fn name(&self) -> &'static str {
        "LoadEnvironmentVariables"
    }

    fn runs_once(&self) -> bool {
        true
    }

    async fn bootstrap(&self, app: &Application) -> Result<()> {
        let path = app.config_path()?.join(ENV_FILE);
        if !path.is_file() {
            log::debug!("No environment file at {}", path.display());
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::io(e, "read environment file", path.clone()))?;
        let environment = app.environment();
        let mut applied = 0;
        for (key, value) in parse_env_file(&contents) {
            if environment.contains(&key) {
                continue;
            }
            environment.set(&key, &value);
            applied += 1;
        }
        log::info!("Loaded {} variable(s) from {}", applied, path.display());
        Ok(())
    }
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, a leading `export ` is ignored
/// and a value wrapped in matching single or double quotes is unwrapped.
/// Unquoted values end at ` #`.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Runs the loader selected by the initial configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadConfiguration;

#[async_trait]
impl Bootstrapper for LoadConfiguration {
    fn name(&self) -> &'static str {
        "LoadConfiguration"
    }

    fn runs_once(&self) -> bool {
        true
    }

    async fn bootstrap(&self, app: &Application) -> Result<()> {
        let loader: Arc<dyn ConfigLoader> = app.resolve(keys::CONFIG_LOADER)?;
        let repository = app.config()?;
        log::info!("Loading configuration with the '{}' loader", loader.name());
        loader.load(app, &repository).await
    }
}

/// Checks that the `CORE_NETWORK_NAME` inherited from the environment and the
/// loaded configuration agree with the network the kernel was bootstrapped for.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateNetwork;

#[async_trait]
impl Bootstrapper for ValidateNetwork {
    fn name(&self) -> &'static str {
        "ValidateNetwork"
    }

    fn runs_once(&self) -> bool {
        true
    }

    async fn bootstrap(&self, app: &Application) -> Result<()> {
        let network = app.network()?;

        if let Some(from_env) = app.inherited_network() {
            if from_env != network {
                return Err(Error::FailedNetworkDetection {
                    reason: format!(
                        "{} is '{}' but the kernel was started for '{}'",
                        env::CORE_NETWORK_NAME,
                        from_env,
                        network
                    ),
                });
            }
        }

        if let Some(from_config) = app.config()?.get_as::<String>("network.name") {
            if from_config != network {
                return Err(Error::FailedNetworkDetection {
                    reason: format!(
                        "configuration names network '{}' but the kernel was started for '{}'",
                        from_config, network
                    ),
                });
            }
        }

        log::debug!("Network '{}' validated", network);
        Ok(())
    }
}

/// Registers the declared providers in declaration order.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterServiceProviders;

#[async_trait]
impl Bootstrapper for RegisterServiceProviders {
    fn name(&self) -> &'static str {
        "RegisterServiceProviders"
    }

    async fn bootstrap(&self, app: &Application) -> Result<()> {
        for provider in app.declared_providers() {
            app.providers().register(Arc::clone(provider), app).await?;
            app.dispatch(&KernelEvent::ProviderStateChanged {
                provider: provider.name().to_string(),
                state: ProviderState::Registered,
            })
            .await?;
        }
        log::info!("Registered {} service provider(s)", app.providers().len());
        Ok(())
    }
}

/// Boots the registered providers in registration order.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootServiceProviders;

#[async_trait]
impl Bootstrapper for BootServiceProviders {
    fn name(&self) -> &'static str {
        "BootServiceProviders"
    }

    async fn bootstrap(&self, app: &Application) -> Result<()> {
        for provider in app.providers().all() {
            let name = provider.name().to_string();
            app.providers().boot(provider, app).await?;
            app.dispatch(&KernelEvent::ProviderStateChanged {
                provider: name,
                state: ProviderState::Booted,
            })
            .await?;
        }
        Ok(())
    }
}
