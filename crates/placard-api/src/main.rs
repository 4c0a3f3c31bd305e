#![forbid(unsafe_code)]

//! Placard server
//!
//! Serves the Placard HTTP API over a SQLite translation store and a
//! simulated controller.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use placard_api::{AppState, router};
use placard_core::{PlacardConfig, SimulatedRegisters};
use placard_storage::SqliteStore;
use placard_sync::NameSyncService;

/// Placard HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, env = "PLACARD_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,placard=debug".into()),
        )
        .init();

    let config = PlacardConfig::load(args.config.as_deref())?;
    if args.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let store = Arc::new(
        SqliteStore::connect(&config.database.url, config.database.max_connections).await?,
    );
    store.init_schema().await?;

    tracing::warn!("No controller driver configured; using a simulated register bank");
    let registers = Arc::new(SimulatedRegisters::new());

    let service = NameSyncService::new(
        config.catalog()?,
        config.languages.clone(),
        registers,
        store.clone(),
        store,
    );
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(bind = %config.server.bind, "Placard server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Placard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
