use std::error::Error;

use clap::Parser;
use prompt_relay::{AppState, RelayConfig, serve};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let config = RelayConfig::parse();

    if !config.static_dir.exists() {
        tokio::fs::create_dir_all(&config.static_dir).await?;
        info!("Created static directory {}", config.static_dir.display());
    }

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let state = AppState::new(config)?;

    serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
