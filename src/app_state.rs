// =============================================================================
// Central Application State — MarketLens dashboard backend
// =============================================================================
//
// Shared across all async tasks via `Arc<AppState>`. Renders are stateless:
// the only mutable pieces are the runtime configuration, the quote board
// (written by one background task), and the fetch memo cache — each behind
// a `parking_lot` lock of its own.
// =============================================================================

use parking_lot::RwLock;

use crate::fetch::{FetchCache, MarketDataClient};
use crate::quotes::Quote;
use crate::runtime_config::RuntimeConfig;

/// Shared state for the HTTP handlers and the quote-refresh task.
pub struct AppState {
    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: RwLock<RuntimeConfig>,

    // ── Market data ─────────────────────────────────────────────────────
    pub market_data: MarketDataClient,
    pub fetch_cache: FetchCache,

    // ── Quote board ─────────────────────────────────────────────────────
    pub quote_board: RwLock<Vec<Quote>>,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        let market_data = MarketDataClient::new(&config.data_base_url, config.fetch_timeout_secs);
        Self {
            runtime_config: RwLock::new(config),
            market_data,
            fetch_cache: FetchCache::new(),
            quote_board: RwLock::new(Vec::new()),
        }
    }
}
