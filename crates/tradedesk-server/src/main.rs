//! TradeDesk portal server
//!
//! Serves the portal JSON API under `/api` plus health, readiness and
//! Prometheus metrics endpoints.
//!
//! Usage:
//! ```bash
//! # Demo data, defaults
//! tradedesk-server
//!
//! # With config file (env vars override it)
//! TRADEDESK_BILLING_API_KEY=sk_test_... tradedesk-server --config tradedesk.yaml
//!
//! # Show the effective config with secrets masked
//! tradedesk-server --config tradedesk.yaml print-config
//! ```
//!
//! Try it against the demo tenant:
//! ```bash
//! curl http://localhost:8080/api/dashboard \
//!   -H "x-tenant-id: 0b7f3c1e-5a44-4d8e-9c6a-2f1d8e7b9a10" \
//!   -H "x-user-id: mem_priya"
//! ```

mod app;
mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::ServerConfig;
use tracing::{error, info};
use tradedesk_api::ApiServer;
use tradedesk_observability::{HealthState, Metrics, health_router, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("TRADEDESK_COMMIT"),
    ")"
);

/// TradeDesk Server - B2B trade portal backend
#[derive(Parser)]
#[command(name = "tradedesk-server")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "TradeDesk multi-tenant trade portal API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TRADEDESK_CONFIG",
        global = true
    )]
    config: Option<String>,

    /// Port to listen on, overriding config and environment
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default if no command specified)
    Serve,
    /// Print the effective configuration as YAML and exit
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(shellexpand::tilde(path).as_ref())?,
        None => ServerConfig::default(),
    };
    config.merge_env();
    if let Some(port) = cli.port {
        config.http.port = port;
    }

    match cli.command {
        Some(Commands::PrintConfig) => {
            let yaml = serde_yaml::to_string(&config.redacted())
                .context("Failed to render configuration")?;
            print!("{}", yaml);
            return Ok(());
        }
        Some(Commands::Serve) | None => {}
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!(
        "🚀 Starting TradeDesk server {} (commit {})",
        env!("CARGO_PKG_VERSION"),
        env!("TRADEDESK_COMMIT")
    );
    if let Some(path) = &cli.config {
        info!("📁 Configuration loaded from: {}", path);
    }

    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);
    let (state, readiness) = app::build_state(&config, metrics.clone()).await?;

    let health = health_router(HealthState::with_readiness_checker(
        metrics,
        Arc::new(readiness),
    ));

    ApiServer::new(config.http.clone(), state)
        .serve(health, shutdown_signal())
        .await?;

    info!("👋 TradeDesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
