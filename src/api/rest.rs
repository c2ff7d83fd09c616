// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Health and analysis are public; the
// config reload requires the admin bearer token.
//
// The analysis endpoint always answers 200: the body is either the date-keyed
// report or `{"status":"error","error_message":...}`.
//
// CORS is configured permissively; tighten `allowed_origins` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::auth::AdminBearer;
use crate::app_state::AppState;
use crate::engine;
use crate::error::ErrorPayload;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Public ──────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/technical/:symbol", get(technical))
        // ── Admin ───────────────────────────────────────────────────
        .route("/api/v1/config/reload", post(reload_config))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health (public)
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    source: &'static str,
    analyses_served: u64,
    server_time: i64,
    started_at: String,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        source: state.source().name(),
        analyses_served: state.analyses_served(),
        server_time: Utc::now().timestamp_millis(),
        started_at: state.started_at.to_rfc3339(),
    })
}

// =============================================================================
// Technical analysis (public)
// =============================================================================

async fn technical(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    let symbol = symbol.trim().to_string();
    let span = info_span!("technical", request_id = %Uuid::new_v4(), symbol = %symbol);

    async move {
        let active = state.active();
        let fetch_span = active.fetch_span(Utc::now());
        let outcome = engine::analyze(active.source.as_ref(), &symbol, fetch_span).await;
        let served = state.record_analysis();
        info!(ok = outcome.is_report(), served, "analysis request finished");
        Json(outcome)
    }
    .instrument(span)
    .await
}

// =============================================================================
// Config reload (admin)
// =============================================================================

#[derive(Serialize)]
struct ReloadResponse {
    status: &'static str,
    source: String,
    history_start: String,
}

async fn reload_config(
    _auth: AdminBearer,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.reload() {
        Ok(cfg) => {
            info!(provider = %cfg.provider.kind, "config reload via API");
            Json(ReloadResponse {
                status: "ok",
                source: cfg.provider.kind.to_string(),
                history_start: cfg.history_start,
            })
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "config reload failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorPayload::new(format!("{e:#}"))),
            )
                .into_response()
        }
    }
}
