mod cli; // Declare the cli module

use std::process::ExitCode;

use clap::Parser; // Use clap for argument parsing
use core_kernel::{Application, KernelConfig, KernelError, PathKind};
use log::{error, info};

use cli::{CliArgs, Commands, MaintenanceCommand};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = match args.kernel.kernel_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid --options: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: KernelConfig) -> Result<(), KernelError> {
    let mut app = Application::new();
    app.bootstrap(config).await?;

    let outcome = match command {
        Commands::Start => start(&app).await,
        Commands::Check => check(&app),
        Commands::Maintenance { command } => maintenance(&app, command).await,
    };

    match &outcome {
        Ok(()) => app.terminate(Some("command finished"), None).await?,
        Err(e) => {
            app.terminate(Some("command failed"), Some(e as &(dyn std::error::Error + Send + Sync)))
                .await?
        }
    }
    outcome
}

async fn start(app: &Application) -> Result<(), KernelError> {
    info!("{} is running, press Ctrl-C to stop", app.namespace()?);
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| KernelError::Other(format!("failed to listen for Ctrl-C: {}", e)))?;
    info!("Ctrl-C received");
    Ok(())
}

fn check(app: &Application) -> Result<(), KernelError> {
    println!("Namespace: {}", app.namespace()?);
    println!("Directory prefix: {}", app.dir_prefix()?);
    for kind in PathKind::ALL {
        println!("{}: {}", kind, app.path(kind)?.display());
    }
    println!("Providers: {}", app.providers().len());
    Ok(())
}

async fn maintenance(app: &Application, command: MaintenanceCommand) -> Result<(), KernelError> {
    match command {
        MaintenanceCommand::Enable => {
            app.enable_maintenance().await?;
            println!("Maintenance mode enabled");
        }
        MaintenanceCommand::Disable => {
            app.disable_maintenance().await?;
            println!("Maintenance mode disabled");
        }
        MaintenanceCommand::Status => {
            let status = if app.is_down_for_maintenance()? { "on" } else { "off" };
            println!("Maintenance mode: {}", status);
        }
    }
    Ok(())
}
