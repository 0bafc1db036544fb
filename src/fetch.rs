// =============================================================================
// Market-Data Fetch — HTTP client for the OHLCV collaborator
// =============================================================================
//
// The data service exposes one operation:
//
//   GET {base}/api/stock?ticker=AAPL&start=2024-01-01&end=2024-06-30
//
// returning one JSON object per trading day. The service must be treated as
// fallible and possibly slow: every request carries a 15 s timeout (set at
// client construction) and one bounded retry on failure. An empty body or a
// 404 means "no data for range" — a valid response, distinct from a
// transport error.
//
// Successful responses are memoized in `FetchCache` keyed by
// (ticker, start, end); safe because a fetched row set is never mutated.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::series::RawRow;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the market-data service.
#[derive(Clone)]
pub struct MarketDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketDataClient {
    /// Create a client with the given base URL and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client for MarketDataClient");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/api/stock?ticker={}&start={}&end={}",
            self.base_url, ticker, start, end
        )
    }

    /// Fetch raw OHLCV rows for `ticker` over `[start, end]`.
    ///
    /// Retries once on failure before giving up; the caller maps an error
    /// to the terminal "no data" render state.
    pub async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>> {
        match self.fetch_once(ticker, start, end).await {
            Ok(rows) => Ok(rows),
            Err(first) => {
                warn!(%ticker, error = %first, "fetch failed — retrying once");
                self.fetch_once(ticker, start, end)
                    .await
                    .with_context(|| format!("fetch for {ticker} failed after retry"))
            }
        }
    }

    async fn fetch_once(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>> {
        let url = self.request_url(ticker, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();

        // The service answers 404 with an empty body for an empty range.
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(%ticker, "data service returned 404 — no data for range");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            anyhow::bail!("data service returned {status} for {ticker}");
        }

        let rows: Vec<RawRow> = resp
            .json()
            .await
            .context("failed to parse data service response body")?;

        debug!(%ticker, rows = rows.len(), "fetched raw rows");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Cache key: one fetch request.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FetchKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Pure memo cache over completed fetches. Entries are immutable row sets;
/// renders share them through `Arc` without copying.
#[derive(Default)]
pub struct FetchCache {
    entries: RwLock<HashMap<FetchKey, Arc<Vec<RawRow>>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FetchKey) -> Option<Arc<Vec<RawRow>>> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: FetchKey, rows: Vec<RawRow>) -> Arc<Vec<RawRow>> {
        let arc = Arc::new(rows);
        self.entries.write().insert(key, arc.clone());
        arc
    }

    /// Fetch through the cache: hit returns the shared rows, miss performs
    /// the HTTP request and stores the result.
    pub async fn fetch_cached(
        &self,
        client: &MarketDataClient,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<Vec<RawRow>>> {
        let key = FetchKey {
            ticker: ticker.to_string(),
            start,
            end,
        };

        if let Some(hit) = self.get(&key) {
            debug!(%ticker, "fetch cache hit");
            return Ok(hit);
        }

        let rows = client.fetch(ticker, start, end).await?;
        Ok(self.insert(key, rows))
    }
}
