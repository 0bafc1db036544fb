// =============================================================================
// Return & Risk Statistics
// =============================================================================
//
// Scalar summary of a price series, all derived from the daily returns:
//
//   daily_return[i] = close[i] / close[i-1] - 1            (n-1 values)
//   geometric mean  = geomean(1 + r) - 1
//   annualized ret  = (1 + geomean)^F - 1
//   annualized vol  = sample_stddev(r) * sqrt(F)
//   daily vol       = annualized vol / sqrt(F)
//
// F is the annualization factor (252 trading days by default). Percentages
// are rounded to two decimals; mean volume to the nearest integer. Daily
// volatility is definitionally derived from the annualized figure, not an
// independent statistic.
// =============================================================================

use serde::Serialize;

use crate::series::PriceSeries;

/// Immutable statistics record for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSummary {
    pub geometric_mean_daily_return_pct: f64,
    pub annualized_return_pct: f64,
    pub mean_volume: u64,
    pub annualized_volatility_pct: f64,
    pub daily_volatility_pct: f64,
}

/// Why statistics could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Fewer than two bars: no returns exist.
    InsufficientHistory,
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientHistory => {
                write!(f, "statistics need at least 2 bars of history")
            }
        }
    }
}

impl std::error::Error for StatsError {}

/// Daily simple returns: exactly `len - 1` entries.
pub fn daily_returns(series: &PriceSeries) -> Vec<f64> {
    let closes = series.closes();
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Compute the summary for `series` using the given annualization factor.
pub fn compute_stats(series: &PriceSeries, annualization: u32) -> Result<StatSummary, StatsError> {
    if series.len() < 2 {
        return Err(StatsError::InsufficientHistory);
    }

    let returns = daily_returns(series);
    let factor = annualization as f64;

    // Geometric mean of (1 + r), via log-space for numerical stability.
    let log_sum: f64 = returns.iter().map(|r| (1.0 + r).ln()).sum();
    let geomean = (log_sum / returns.len() as f64).exp();

    let geo_pct = round2((geomean - 1.0) * 100.0);
    let annualized_return_pct = round2((geomean.powf(factor) - 1.0) * 100.0);

    let annualized_volatility_pct = round2(sample_stddev(&returns) * factor.sqrt() * 100.0);
    // Rescaled from the already-rounded annualized figure so the pair stays
    // exactly consistent.
    let daily_volatility_pct = round2(annualized_volatility_pct / factor.sqrt());

    let volumes = series.volumes();
    let mean_volume =
        (volumes.iter().map(|&v| v as f64).sum::<f64>() / volumes.len() as f64).round() as u64;

    Ok(StatSummary {
        geometric_mean_daily_return_pct: geo_pct,
        annualized_return_pct,
        mean_volume,
        annualized_volatility_pct,
        daily_volatility_pct,
    })
}

/// Sample standard deviation (n - 1 denominator). Zero for a single value.
fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
