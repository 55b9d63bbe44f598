//! Cluster node entry point.
//!
//! ```text
//! cherami-node <ROLE> [--config-dir DIR] [--environment ENV] [--store NAME] [--dir PATH]
//! ```
//!
//! Any bootstrap or start failure is logged with the role and its cause and
//! terminates the process with a non-zero status before (or instead of)
//! serving traffic.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cherami_node::config::{load_layered, LoggingConfig};
use cherami_node::observability::init_logging;
use cherami_node::storage::{StorageOverrides, STORE_DIR_ENV};
use cherami_node::{bootstrap, start_service, DefaultHostFactory, ServiceRole, Shutdown};

#[derive(Parser)]
#[command(name = "cherami-node")]
#[command(about = "Start one node role of the messaging cluster", long_about = None)]
struct Cli {
    /// Role this process runs as.
    #[arg(value_enum)]
    role: ServiceRole,

    /// Directory holding base.toml and per-environment overlays.
    #[arg(long, env = "CHERAMI_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Overlay to apply on top of base.toml.
    #[arg(long, env = "CHERAMI_ENVIRONMENT", default_value = "development")]
    environment: String,

    /// Storage engine hint (store role only).
    #[arg(long)]
    store: Option<String>,

    /// Storage base directory (store role only).
    #[arg(long)]
    dir: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let role = cli.role;

    let config = match load_layered(&cli.config_dir, &cli.environment) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            tracing::error!(role = %role, error = %e, "Unable to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    tracing::info!(
        role = %role,
        version = env!("CARGO_PKG_VERSION"),
        config_dir = %cli.config_dir.display(),
        environment = %cli.environment,
        "cherami-node starting"
    );

    let overrides = StorageOverrides {
        store: cli.store,
        dir: cli.dir,
        env_dir: std::env::var(STORE_DIR_ENV).ok(),
    };
    if !role.profile().selects_backend && !overrides.is_empty() {
        tracing::warn!(role = %role, "--store/--dir only apply to the store role; ignoring");
    }

    let booted = match bootstrap(role, &config, &overrides, &DefaultHostFactory).await {
        Ok(booted) => booted,
        Err(e) => {
            tracing::error!(role = %e.role(), error = %e, "Bootstrap failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    if let Err(e) = start_service(booted, &shutdown).await {
        tracing::error!(role = %e.role, error = %e.source, "Unable to start service");
        shutdown.trigger();
        return ExitCode::FAILURE;
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!(role = %role, "Shutdown signal received");
    shutdown.trigger();

    ExitCode::SUCCESS
}
