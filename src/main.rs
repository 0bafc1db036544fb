// =============================================================================
// MarketLens — Main Entry Point
// =============================================================================
//
// Dashboard backend: fetches historical OHLCV data from the market-data
// service, computes statistics and technical indicators, and serves a
// declarative multi-pane chart spec over HTTP. A single background task
// keeps the daily-performance quote board fresh.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod chart;
mod fetch;
mod indicators;
mod pipeline;
mod quotes;
mod runtime_config;
mod series;
mod stats;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MarketLens dashboard backend starting up");

    let mut config = RuntimeConfig::load("marketlens.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Env overrides for containerised deployments.
    if let Ok(url) = std::env::var("MARKETLENS_DATA_URL") {
        config.data_base_url = url;
    }
    if let Ok(tickers) = std::env::var("MARKETLENS_TICKERS") {
        config.watched_tickers = tickers
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(port) = std::env::var("MARKETLENS_PORT") {
        config.bind_port = port.parse().unwrap_or(config.bind_port);
    }

    info!(
        base_url = %config.data_base_url,
        tickers = ?config.watched_tickers,
        annualization = config.annualization_factor,
        "configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Quote board refresh task ──────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let quote_state = state.clone();
    tokio::spawn(async move {
        // Populate the board once up front so the first page load has data.
        quotes::refresh_quote_board(&quote_state).await;
        quotes::run_quote_refresh(quote_state, shutdown_rx).await;
    });

    // ── 4. Start the API server ──────────────────────────────────────────
    let bind_addr = format!("0.0.0.0:{}", state.runtime_config.read().bind_port);
    let api_state = state.clone();
    let bind_addr_clone = bind_addr.clone();

    tokio::spawn(async move {
        let app = api::rest::router(api_state);
        let listener = tokio::net::TcpListener::bind(&bind_addr_clone)
            .await
            .expect("Failed to bind API server");
        info!(addr = %bind_addr_clone, "API server listening");
        axum::serve(listener, app).await.expect("API server failed");
    });

    // ── 5. Run until shutdown ────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");
    let _ = shutdown_tx.send(true);

    Ok(())
}
