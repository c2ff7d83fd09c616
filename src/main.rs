// =============================================================================
// technical-events: HTTP host entry point
// =============================================================================
//
// Loads configuration, builds the configured bar source and serves the
// analysis API. The engine itself holds no state between requests.
// =============================================================================

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use technical_events::api;
use technical_events::app_state::AppState;
use technical_events::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("technical-events starting up");

    let config_path =
        std::env::var("TECHNICALS_CONFIG").unwrap_or_else(|_| "runtime_config.json".into());

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides()?;

    info!(
        provider = %config.provider.kind,
        adjust = %config.provider.adjust,
        history_start = %config.history_start,
        utc_offset_hours = config.reference_utc_offset_hours,
        "engine configured"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, config_path)?);

    // ── 3. Serve ─────────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
