// =============================================================================
// Render Pipeline — one synchronous pass from raw rows to a dashboard view
// =============================================================================
//
// Each render is a single invocation: load → stats → indicators → chart.
// Nothing is shared between renders except the upstream fetch cache; the
// series and every derived column are produced here and discarded with the
// view.
//
// Terminal states:
//   - loader failure or an empty series => `NoData` (the pipeline does not
//     proceed to stats, indicators, or chart),
//   - too little history for statistics => stats omitted, chart still
//     rendered (a one-bar chart is valid),
//   - rows dropped by the loader are carried in the view for diagnostics.
// =============================================================================

use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{compose_chart, ChartSpec};
use crate::indicators::IndicatorKind;
use crate::runtime_config::RuntimeConfig;
use crate::series::{load, RawRow, RowWarning};
use crate::stats::compute_stats;

/// The outcome of one dashboard render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardView {
    /// Terminal "no data" state: nothing downstream was computed.
    NoData { reason: String },
    /// A renderable chart, with statistics embedded when history allows.
    Ready {
        ticker: String,
        bar_count: usize,
        chart: ChartSpec,
        /// Rows the loader refused, for the diagnostics strip.
        dropped_rows: Vec<RowWarning>,
    },
}

/// Run the full pipeline over already-fetched raw rows.
///
/// Pure with respect to its inputs; the HTTP layer supplies the rows and
/// the activated indicator list.
pub fn run_pipeline(
    rows: &[RawRow],
    ticker: &str,
    active: &[IndicatorKind],
    config: &RuntimeConfig,
) -> DashboardView {
    let outcome = match load(rows) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(%ticker, error = %e, "loader rejected raw input");
            return DashboardView::NoData {
                reason: e.to_string(),
            };
        }
    };

    if outcome.series.is_empty() {
        return DashboardView::NoData {
            reason: format!("no data for {ticker} in the requested range"),
        };
    }

    if !outcome.dropped.is_empty() {
        warn!(
            %ticker,
            dropped = outcome.dropped.len(),
            "loader dropped malformed rows"
        );
    }

    let stats = match compute_stats(&outcome.series, config.annualization_factor) {
        Ok(s) => Some(s),
        Err(e) => {
            info!(%ticker, reason = %e, "statistics omitted");
            None
        }
    };

    let chart = compose_chart(&outcome.series, stats, active, &config.indicator_params);

    info!(
        %ticker,
        bars = outcome.series.len(),
        indicators = active.len(),
        panes = chart.panes.len(),
        "render complete"
    );

    DashboardView::Ready {
        ticker: ticker.to_string(),
        bar_count: outcome.series.len(),
        chart,
        dropped_rows: outcome.dropped,
    }
}
