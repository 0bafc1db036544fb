// =============================================================================
// Quote Board — daily percent change for the watched tickers
// =============================================================================
//
// A small, independent fetch that powers the dashboard's top strip: for
// each watched ticker, the percent change between the two most recent
// closes in a trailing 7-day buffer (the buffer absorbs weekends and
// holidays).
//
// Refresh runs in a single dedicated background task with its own
// cancellation channel, fully decoupled from the render pipeline — a slow
// quote refresh can never delay an in-flight chart render, and render
// requests never mutate the board.
// =============================================================================

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::series::{load, RawRow};

/// One entry on the quote board. `change_pct` is `None` when the ticker
/// had no usable data on the last refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    /// ISO 8601 timestamp of the refresh that produced this entry.
    pub updated_at: String,
}

/// Percent change between the last two closes in `rows`, rounded to two
/// decimals. `None` when fewer than two valid bars survive loading.
pub fn daily_change_pct(rows: &[RawRow]) -> Option<f64> {
    let outcome = load(rows).ok()?;
    let bars = outcome.series.bars();
    if bars.len() < 2 {
        return None;
    }

    let latest = bars[bars.len() - 1].close;
    let prev = bars[bars.len() - 2].close;
    Some(((latest - prev) / prev * 10_000.0).round() / 100.0)
}

/// Refresh every watched ticker once and replace the board.
pub async fn refresh_quote_board(state: &AppState) {
    let tickers = state.runtime_config.read().watched_tickers.clone();
    let today = Utc::now().date_naive();
    let start = today - Duration::days(7);
    let end = today + Duration::days(1);

    let mut board = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        // Straight to the client: the board must see today's data, so the
        // render cache (keyed by fixed ranges) is deliberately bypassed.
        let change = match state.market_data.fetch(&ticker, start, end).await {
            Ok(rows) => daily_change_pct(&rows),
            Err(e) => {
                warn!(%ticker, error = %e, "quote refresh fetch failed");
                None
            }
        };
        board.push(Quote {
            ticker,
            change_pct: change,
            updated_at: Utc::now().to_rfc3339(),
        });
    }

    *state.quote_board.write() = board;
}

/// Background refresh loop. Runs until the shutdown channel fires; the
/// interval comes from configuration (60 s by default).
pub async fn run_quote_refresh(state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    loop {
        let secs = state.runtime_config.read().quote_refresh_secs;
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(secs)) => {
                refresh_quote_board(&state).await;
            }
            _ = shutdown.changed() => {
                info!("quote refresh task stopping");
                return;
            }
        }
    }
}
