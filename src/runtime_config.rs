// =============================================================================
// Runtime Configuration — dashboard settings with atomic save
// =============================================================================
//
// Every recognized option lives here: indicator windows, the annualization
// factor, the market-data collaborator endpoint, and the quote-board
// refresh schedule.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_window() -> usize {
    14
}

fn default_stochastic_window() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_ma_windows() -> Vec<usize> {
    vec![10, 20]
}

fn default_ema_spans() -> Vec<usize> {
    vec![9, 20]
}

fn default_annualization_factor() -> u32 {
    252
}

fn default_data_base_url() -> String {
    "http://backend:5000".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_quote_refresh_secs() -> u64 {
    60
}

fn default_watched_tickers() -> Vec<String> {
    vec![
        "AAPL".to_string(),
        "MSFT".to_string(),
        "GOOGL".to_string(),
        "AMZN".to_string(),
        "NVDA".to_string(),
        "META".to_string(),
        "TSLA".to_string(),
    ]
}

fn default_bind_port() -> u16 {
    8080
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Window sizes and spans for the indicator engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// RSI look-back window (deltas averaged per point).
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    /// Stochastic %K trailing high/low window.
    #[serde(default = "default_stochastic_window")]
    pub stochastic_window: usize,

    /// MACD fast EMA span.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// MACD slow EMA span.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// MACD signal-line EMA span.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Moving-average windows offered by the dashboard.
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,

    /// EMA spans offered by the dashboard.
    #[serde(default = "default_ema_spans")]
    pub ema_spans: Vec<usize>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_window: default_rsi_window(),
            stochastic_window: default_stochastic_window(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            ma_windows: default_ma_windows(),
            ema_spans: default_ema_spans(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the dashboard backend.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Statistics ---------------------------------------------------------

    /// Trading periods per year used to scale daily statistics (252).
    #[serde(default = "default_annualization_factor")]
    pub annualization_factor: u32,

    // --- Indicators ---------------------------------------------------------

    #[serde(default)]
    pub indicator_params: IndicatorParams,

    // --- Market-data collaborator -------------------------------------------

    /// Base URL of the OHLCV data service.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Per-request timeout for the data service, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    // --- Quote board --------------------------------------------------------

    /// Refresh interval of the daily-performance quote board, in seconds.
    #[serde(default = "default_quote_refresh_secs")]
    pub quote_refresh_secs: u64,

    /// Tickers shown on the quote board.
    #[serde(default = "default_watched_tickers")]
    pub watched_tickers: Vec<String>,

    // --- Server -------------------------------------------------------------

    /// TCP port the HTTP API binds to.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            annualization_factor: default_annualization_factor(),
            indicator_params: IndicatorParams::default(),
            data_base_url: default_data_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            quote_refresh_secs: default_quote_refresh_secs(),
            watched_tickers: default_watched_tickers(),
            bind_port: default_bind_port(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            base_url = %config.data_base_url,
            tickers = ?config.watched_tickers,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to rename {} into place", tmp.display()))?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_full_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.annualization_factor, 252);
        assert_eq!(config.indicator_params.rsi_window, 14);
        assert_eq!(config.indicator_params.macd_slow, 26);
        assert_eq!(config.fetch_timeout_secs, 15);
        assert_eq!(config.quote_refresh_secs, 60);
        assert_eq!(config.watched_tickers.len(), 7);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"indicator_params": {"rsi_window": 21}}"#).unwrap();
        assert_eq!(config.indicator_params.rsi_window, 21);
        assert_eq!(config.indicator_params.stochastic_window, 14);
        assert_eq!(config.annualization_factor, 252);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let mut config = RuntimeConfig::default();
        config.watched_tickers = vec!["AAPL".to_string()];
        config.bind_port = 9999;

        let path = std::env::temp_dir().join(format!("marketlens_config_{}.json", std::process::id()));
        config.save(&path).unwrap();
        let loaded = RuntimeConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.watched_tickers, vec!["AAPL".to_string()]);
        assert_eq!(loaded.bind_port, 9999);
    }
}
