// =============================================================================
// Chart Composer — declarative multi-pane chart specification
// =============================================================================
//
// Builds a `ChartSpec` from the price series and the activated indicators:
// one primary candlestick pane (wick low→high, body open→close, colored by
// direction) with overlay trend lines, plus one stacked sub-pane per
// oscillator-class indicator.
//
// Every pane shares a single time axis covering the full date range of the
// source series. Warm-up points are carried as `null`s so that lines render
// as gaps instead of shifting or truncating the axis. Pane and overlay
// order is the activation order — the composition is fully deterministic.
//
// RSI and Stochastic panes are clamped to [0, 100] and carry their
// conventional dashed threshold lines (70/30 and 80/20); those thresholds
// are static annotations, not computed values.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::{IndicatorKind, PaneClass};
use crate::runtime_config::IndicatorParams;
use crate::series::PriceSeries;
use crate::stats::StatSummary;

// ---------------------------------------------------------------------------
// Spec types
// ---------------------------------------------------------------------------

/// Body direction of one candle. A doji (close == open) counts as `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    Up,
    Down,
}

/// One candle: wick from `low` to `high`, body from `open` to `close`.
#[derive(Debug, Clone, Serialize)]
pub struct CandlePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub direction: CandleDirection,
}

/// A line aligned with the shared time axis; `None` points are gaps.
#[derive(Debug, Clone, Serialize)]
pub struct ChartLine {
    pub name: String,
    pub points: Vec<Option<f64>>,
}

/// The primary pane: candles plus overlay trend lines on the price axis.
#[derive(Debug, Clone, Serialize)]
pub struct PricePane {
    pub candles: Vec<CandlePoint>,
    pub overlays: Vec<ChartLine>,
}

/// One stacked oscillator sub-pane.
#[derive(Debug, Clone, Serialize)]
pub struct OscillatorPane {
    pub title: String,
    pub lines: Vec<ChartLine>,
    /// Fixed [min, max] y-domain; `None` leaves the range free (MACD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_domain: Option<[f64; 2]>,
    /// Dashed horizontal reference lines.
    pub thresholds: Vec<f64>,
}

/// The full declarative chart: built fresh per render, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    /// Shared x-axis: the full date range of the source series.
    pub time_axis: Vec<NaiveDate>,
    pub primary: PricePane,
    /// Sub-panes in activation order.
    pub panes: Vec<OscillatorPane>,
    /// Display-only statistics block, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatSummary>,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Build the chart spec for `series` with the given activated indicators.
///
/// Each indicator is computed here from the immutable series (never read
/// from a shared working table), so activation order can only affect pane
/// order, not values.
pub fn compose_chart(
    series: &PriceSeries,
    stats: Option<StatSummary>,
    active: &[IndicatorKind],
    params: &IndicatorParams,
) -> ChartSpec {
    let candles = series
        .bars()
        .iter()
        .map(|b| CandlePoint {
            date: b.date,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            direction: if b.close >= b.open {
                CandleDirection::Up
            } else {
                CandleDirection::Down
            },
        })
        .collect();

    let mut overlays = Vec::new();
    let mut panes = Vec::new();

    for kind in active {
        let columns = kind.compute(series, params);
        let lines: Vec<ChartLine> = columns
            .into_iter()
            .map(|c| ChartLine {
                name: c.name,
                points: c.values,
            })
            .collect();

        match kind.pane_class() {
            PaneClass::Overlay => overlays.extend(lines),
            PaneClass::Oscillator => panes.push(OscillatorPane {
                title: kind.to_string(),
                lines,
                y_domain: oscillator_domain(kind),
                thresholds: oscillator_thresholds(kind),
            }),
        }
    }

    ChartSpec {
        time_axis: series.dates(),
        primary: PricePane { candles, overlays },
        panes,
        stats,
    }
}

fn oscillator_domain(kind: &IndicatorKind) -> Option<[f64; 2]> {
    match kind {
        IndicatorKind::Rsi | IndicatorKind::Stochastic => Some([0.0, 100.0]),
        _ => None,
    }
}

fn oscillator_thresholds(kind: &IndicatorKind) -> Vec<f64> {
    match kind {
        IndicatorKind::Rsi => vec![70.0, 30.0],
        IndicatorKind::Stochastic => vec![80.0, 20.0],
        _ => Vec::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{load, RawRow};
    use serde_json::json;

    fn series(n: usize) -> PriceSeries {
        let rows: Vec<RawRow> = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                let v = json!({
                    "Date": format!("2024-03-{:02}", i + 1),
                    "Open": c - 0.5,
                    "High": c + 1.0,
                    "Low": c - 1.0,
                    "Close": c,
                    "Volume": 1000,
                });
                v.as_object().unwrap().clone()
            })
            .collect();
        load(&rows).unwrap().series
    }

    #[test]
    fn pane_count_is_one_per_oscillator() {
        let s = series(30);
        let active = vec![
            IndicatorKind::Ma(10),
            IndicatorKind::Rsi,
            IndicatorKind::Ema(9),
            IndicatorKind::Macd,
        ];
        let spec = compose_chart(&s, None, &active, &IndicatorParams::default());

        assert_eq!(spec.panes.len(), 2);
        assert_eq!(spec.primary.overlays.len(), 2);
    }

    #[test]
    fn pane_order_follows_activation_order() {
        let s = series(30);
        let active = vec![
            IndicatorKind::Macd,
            IndicatorKind::Rsi,
            IndicatorKind::Stochastic,
        ];
        let spec = compose_chart(&s, None, &active, &IndicatorParams::default());

        assert_eq!(spec.panes[0].title, "MACD");
        assert_eq!(spec.panes[1].title, "RSI");
        assert_eq!(spec.panes[2].title, "Stochastic Oscillator");
    }

    #[test]
    fn oscillator_panes_carry_domains_and_thresholds() {
        let s = series(30);
        let active = vec![
            IndicatorKind::Rsi,
            IndicatorKind::Stochastic,
            IndicatorKind::Macd,
        ];
        let spec = compose_chart(&s, None, &active, &IndicatorParams::default());

        assert_eq!(spec.panes[0].y_domain, Some([0.0, 100.0]));
        assert_eq!(spec.panes[0].thresholds, vec![70.0, 30.0]);
        assert_eq!(spec.panes[1].thresholds, vec![80.0, 20.0]);
        assert_eq!(spec.panes[2].y_domain, None);
        assert!(spec.panes[2].thresholds.is_empty());
        assert_eq!(spec.panes[2].lines.len(), 2); // MACD + Signal
    }

    #[test]
    fn all_lines_span_the_full_time_axis() {
        // Even with warm-up, every line has one point per axis entry.
        let s = series(25);
        let active = vec![IndicatorKind::Ma(20), IndicatorKind::Rsi];
        let spec = compose_chart(&s, None, &active, &IndicatorParams::default());

        let n = spec.time_axis.len();
        assert_eq!(n, 25);
        for line in spec
            .primary
            .overlays
            .iter()
            .chain(spec.panes.iter().flat_map(|p| p.lines.iter()))
        {
            assert_eq!(line.points.len(), n, "line {} misaligned", line.name);
        }
        // MA(20) warm-up gap is present, not trimmed.
        assert!(spec.primary.overlays[0].points[18].is_none());
        assert!(spec.primary.overlays[0].points[19].is_some());
    }

    #[test]
    fn candle_direction_by_close_vs_open() {
        let rows: Vec<RawRow> = vec![
            // up day, doji, down day
            ("2024-03-01", 10.0, 11.0, 9.0, 10.5),
            ("2024-03-02", 10.5, 11.0, 10.0, 10.5),
            ("2024-03-03", 10.5, 11.0, 9.5, 10.0),
        ]
        .into_iter()
        .map(|(d, o, h, l, c)| {
            let v = json!({
                "Date": d, "Open": o, "High": h, "Low": l, "Close": c, "Volume": 10,
            });
            v.as_object().unwrap().clone()
        })
        .collect();
        let s = load(&rows).unwrap().series;
        let spec = compose_chart(&s, None, &[], &IndicatorParams::default());

        assert_eq!(spec.primary.candles[0].direction, CandleDirection::Up);
        assert_eq!(spec.primary.candles[1].direction, CandleDirection::Up); // tie => up
        assert_eq!(spec.primary.candles[2].direction, CandleDirection::Down);
    }

    #[test]
    fn single_bar_series_renders_one_candle() {
        let s = series(1);
        let spec = compose_chart(&s, None, &[], &IndicatorParams::default());
        assert_eq!(spec.primary.candles.len(), 1);
        assert!(spec.primary.overlays.is_empty());
        assert!(spec.panes.is_empty());
    }
}
