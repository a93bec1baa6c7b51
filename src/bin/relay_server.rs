//! Relay server binary: exposes the HTTP trigger surface for flush cycles.

use anyhow::Context;
use outbox_core::config::OutboxConfig;
use outbox_core::logging::init_structured_logging;
use outbox_core::web::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = OutboxConfig::from_env().context("loading configuration")?;
    let bind_address = config.bind_address.clone();
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;

    info!(bind_address = %bind_address, "🚀 Outbox relay server listening");

    let registry = state.registry().clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    registry.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to install Ctrl+C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
