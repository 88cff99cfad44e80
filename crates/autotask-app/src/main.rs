//! autotask application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize logging
//! 3. Build the sandbox guard, action registry and dispatcher
//! 4. Start the axum REST API server

mod cli;

use clap::Parser;

use autotask_action::{ActionExecutor, ActionRegistry, Dispatcher, PathGuard};
use autotask_api::routes;
use autotask_api::state::AppState;
use autotask_core::{AutotaskConfig, AutotaskError};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = AutotaskConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(bind) = args.resolve_bind_addr() {
        config.general.bind_addr = bind;
    }
    if let Some(root) = args.resolve_sandbox_root() {
        config.sandbox.root = root;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting autotask v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");
    config.validate()?;

    // Sandbox.
    let guard = PathGuard::new(config.sandbox.root_path()).map_err(|e| {
        tracing::error!(root = %config.sandbox.root, error = %e, "Sandbox root unusable");
        AutotaskError::Sandbox(e.to_string())
    })?;
    tracing::info!(root = %guard.root().display(), "Sandbox root ready");

    // Dispatch engine.
    let registry = ActionRegistry::with_defaults(&config)?;
    tracing::info!(actions = registry.len(), "Action registry built");
    let dispatcher = Dispatcher::new(registry, ActionExecutor::new(guard));

    // === API server ===
    let state = AppState::new(config.clone(), dispatcher);
    routes::start_server(&config, state).await?;

    Ok(())
}
