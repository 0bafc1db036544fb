// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The dashboard endpoint runs one full
// render pipeline per request; the quote board and config endpoints are
// read-only snapshots.
//
// CORS is configured permissively for development; tighten the allowed
// origins in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app_state::AppState;
use crate::indicators::IndicatorKind;
use crate::pipeline::{run_pipeline, DashboardView};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/quotes", get(quotes))
        .route("/api/v1/config", get(config))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Dashboard render
// =============================================================================

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    ticker: String,
    /// Inclusive range start (YYYY-MM-DD). Defaults to one year back.
    start: Option<String>,
    /// Inclusive range end (YYYY-MM-DD). Defaults to today.
    end: Option<String>,
    /// Comma-separated indicator names in activation order,
    /// e.g. `10 MA,RSI,MACD`.
    indicators: Option<String>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let ticker = query.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return (StatusCode::BAD_REQUEST, "ticker must not be empty").into_response();
    }

    let today = Utc::now().date_naive();
    let end = match parse_date_param(query.end.as_deref(), today) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let start = match parse_date_param(query.start.as_deref(), today - Duration::days(365)) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    if start > end {
        return (StatusCode::BAD_REQUEST, "start must not be after end").into_response();
    }

    // Unknown indicator names are skipped, not fatal: the dashboard still
    // renders with whatever it recognised.
    let active: Vec<IndicatorKind> = query
        .indicators
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|name| {
            let parsed = IndicatorKind::parse(name);
            if parsed.is_none() {
                warn!(%name, "unknown indicator requested — skipping");
            }
            parsed
        })
        .collect();

    let rows = match state
        .fetch_cache
        .fetch_cached(&state.market_data, &ticker, start, end)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!(%ticker, error = %e, "market data fetch failed");
            let view = DashboardView::NoData {
                reason: format!("market data service unreachable: {e}"),
            };
            return Json(view).into_response();
        }
    };

    let config = state.runtime_config.read().clone();
    let view = run_pipeline(&rows, &ticker, &active, &config);
    Json(view).into_response()
}

fn parse_date_param(
    raw: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, axum::response::Response> {
    match raw {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("invalid date '{s}', expected YYYY-MM-DD"),
            )
                .into_response()
        }),
    }
}

// =============================================================================
// Quote board
// =============================================================================

async fn quotes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let board = state.quote_board.read().clone();
    Json(board)
}

// =============================================================================
// Runtime config snapshot
// =============================================================================

async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.runtime_config.read().clone();
    Json(snapshot)
}
