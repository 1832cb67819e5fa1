use clap::{Args, Parser, Subcommand};
use core_kernel::KernelConfig;

/// core: application kernel runner
#[derive(Parser, Debug)]
#[command(name = "core", author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub kernel: KernelArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that become the initial kernel configuration
#[derive(Args, Debug, Clone)]
pub struct KernelArgs {
    /// Token name, the first half of the namespace
    #[arg(long, global = true, default_value = "ark")]
    pub token: String,

    /// Network name, the second half of the namespace
    #[arg(long, global = true, default_value = "testnet")]
    pub network: String,

    /// Deployment environment (production, development, test, ...)
    #[arg(long, global = true, default_value = "development")]
    pub env: String,

    /// Version reported to providers
    #[arg(long = "core-version", global = true, default_value = env!("CARGO_PKG_VERSION"))]
    pub core_version: String,

    /// Configuration loader strategy
    #[arg(long, global = true, default_value = "local")]
    pub config_loader: String,

    /// Loader options as a JSON object
    #[arg(long, global = true)]
    pub options: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the kernel and run until Ctrl-C
    Start,
    /// Bootstrap the kernel, print the resolved namespace and paths, then terminate
    Check,
    /// Manage maintenance mode
    Maintenance {
        #[command(subcommand)]
        command: MaintenanceCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceCommand {
    /// Put the node into maintenance mode
    Enable,
    /// Take the node out of maintenance mode
    Disable,
    /// Report whether the node is in maintenance mode
    Status,
}

impl KernelArgs {
    /// Build the initial configuration. Fails if `--options` is not valid JSON.
    pub fn kernel_config(&self) -> Result<KernelConfig, serde_json::Error> {
        let mut config = KernelConfig::new(&self.env, &self.token, &self.network, &self.core_version)
            .with_config_loader(&self.config_loader);
        if let Some(raw) = &self.options {
            config = config.with_options(serde_json::from_str(raw)?);
        }
        Ok(config)
    }
}
