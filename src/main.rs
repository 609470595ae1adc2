//! Drinks API - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use drinks_api::{DrinkRepository, SqliteDrinkStore, api, config::ServerConfig, metrics, store};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "drinks-api")]
#[command(about = "REST API for a catalogue of drinks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override API port
    #[arg(long)]
    port: Option<u16>,

    /// Override database URL (e.g. sqlite://drinks.db)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "json")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    match cli.log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .json()
                .init();
        }
    }

    tracing::info!("Starting Drinks API");

    // Load configuration
    let mut config = ServerConfig::load(cli.config)?;

    // CLI overrides
    if let Some(port) = cli.port {
        config.api_port = port;
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    config.validate()?;
    let seeds = config.normalized_seeds()?;

    tracing::info!(
        api_port = config.api_port,
        database_url = %config.database_url,
        max_connections = config.max_connections,
        seed_drinks = config.drinks.len(),
        "Configuration loaded"
    );

    // Setup metrics
    let prometheus_handle = metrics::setup_metrics()?;

    // Open the store and apply migrations
    let drink_store = SqliteDrinkStore::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to open database")?;

    store::seed(&drink_store, &seeds)
        .await
        .context("Failed to seed drinks")?;

    let existing = drink_store
        .list()
        .await
        .context("Failed to count drinks")?;
    metrics::update_drink_count(existing.len());

    // Setup API
    let app_state = api::AppState {
        drinks: Arc::new(drink_store.clone()),
        prometheus_handle,
    };

    let app = api::create_router(app_state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.api_port));
    tracing::info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind API server")?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    tracing::info!("Shutting down...");

    drink_store.pool().close().await;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
