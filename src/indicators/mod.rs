// =============================================================================
// Indicator Engine
// =============================================================================
//
// Pure, side-effect-free transforms over the canonical price series. Every
// indicator returns columns aligned 1:1 with the input: one `Option<f64>`
// per bar, `None` marking warm-up or numerically undefined points. Nothing
// here mutates the series or any shared table; the chart composer assembles
// a per-render lookup of the outputs it needs.
//
// A series shorter than an indicator's minimum window produces an
// all-`None` column, never an error — the dashboard still renders an empty
// line.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

use serde::Serialize;

use crate::runtime_config::IndicatorParams;
use crate::series::PriceSeries;

/// One derived column, aligned by index with its source series.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Where an indicator is drawn: on the price pane or in its own sub-pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaneClass {
    /// Trend line sharing the primary price axis (MA / EMA).
    Overlay,
    /// Range-bounded or free-scale indicator in a stacked sub-pane.
    Oscillator,
}

/// A selectable indicator. MA/EMA carry their window in the name, exactly
/// as the dashboard presents them ("10 MA", "9 EMA"); the oscillators take
/// their windows from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Ma(usize),
    Ema(usize),
    Rsi,
    Stochastic,
    Macd,
}

impl IndicatorKind {
    /// Parse a dashboard display name ("20 MA", "RSI", "Stochastic
    /// Oscillator") or a compact alias ("ma20", "ema9", "stochastic").
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();

        match lower.as_str() {
            "rsi" => return Some(Self::Rsi),
            "macd" => return Some(Self::Macd),
            "stochastic" | "stochastic oscillator" | "stoch" => return Some(Self::Stochastic),
            _ => {}
        }

        // "<N> MA" / "<N> EMA"
        if let Some((num, kind)) = lower.split_once(' ') {
            if let Ok(w) = num.parse::<usize>() {
                match kind {
                    "ma" => return Some(Self::Ma(w)),
                    "ema" => return Some(Self::Ema(w)),
                    _ => {}
                }
            }
        }
        // "ma<N>" / "ema<N>"
        if let Some(rest) = lower.strip_prefix("ema") {
            if let Ok(w) = rest.parse::<usize>() {
                return Some(Self::Ema(w));
            }
        }
        if let Some(rest) = lower.strip_prefix("ma") {
            if let Ok(w) = rest.parse::<usize>() {
                return Some(Self::Ma(w));
            }
        }

        None
    }

    pub fn pane_class(&self) -> PaneClass {
        match self {
            Self::Ma(_) | Self::Ema(_) => PaneClass::Overlay,
            Self::Rsi | Self::Stochastic | Self::Macd => PaneClass::Oscillator,
        }
    }

    /// Compute this indicator's column(s) for `series`. MACD yields two
    /// columns (line + signal); everything else yields one.
    pub fn compute(&self, series: &PriceSeries, params: &IndicatorParams) -> Vec<IndicatorSeries> {
        let closes = series.closes();
        match self {
            Self::Ma(w) => vec![IndicatorSeries {
                name: self.to_string(),
                values: sma::sma(&closes, *w),
            }],
            Self::Ema(s) => vec![IndicatorSeries {
                name: self.to_string(),
                values: ema::ema(&closes, *s),
            }],
            Self::Rsi => vec![IndicatorSeries {
                name: self.to_string(),
                values: rsi::rsi(&closes, params.rsi_window),
            }],
            Self::Stochastic => vec![IndicatorSeries {
                name: "%K".to_string(),
                values: stochastic::stoch_k(
                    &series.highs(),
                    &series.lows(),
                    &closes,
                    params.stochastic_window,
                ),
            }],
            Self::Macd => {
                let out = macd::macd(
                    &closes,
                    params.macd_fast,
                    params.macd_slow,
                    params.macd_signal,
                );
                vec![
                    IndicatorSeries {
                        name: "MACD".to_string(),
                        values: out.macd,
                    },
                    IndicatorSeries {
                        name: "Signal".to_string(),
                        values: out.signal,
                    },
                ]
            }
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ma(w) => write!(f, "{w} MA"),
            Self::Ema(s) => write!(f, "{s} EMA"),
            Self::Rsi => write!(f, "RSI"),
            Self::Stochastic => write!(f, "Stochastic Oscillator"),
            Self::Macd => write!(f, "MACD"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_names() {
        assert_eq!(IndicatorKind::parse("10 MA"), Some(IndicatorKind::Ma(10)));
        assert_eq!(IndicatorKind::parse("9 EMA"), Some(IndicatorKind::Ema(9)));
        assert_eq!(IndicatorKind::parse("RSI"), Some(IndicatorKind::Rsi));
        assert_eq!(
            IndicatorKind::parse("Stochastic Oscillator"),
            Some(IndicatorKind::Stochastic)
        );
        assert_eq!(IndicatorKind::parse("MACD"), Some(IndicatorKind::Macd));
    }

    #[test]
    fn parses_compact_aliases() {
        assert_eq!(IndicatorKind::parse("ma20"), Some(IndicatorKind::Ma(20)));
        assert_eq!(IndicatorKind::parse("ema20"), Some(IndicatorKind::Ema(20)));
        assert_eq!(
            IndicatorKind::parse("stoch"),
            Some(IndicatorKind::Stochastic)
        );
        assert_eq!(IndicatorKind::parse("junk"), None);
    }

    #[test]
    fn display_round_trips() {
        for kind in [
            IndicatorKind::Ma(10),
            IndicatorKind::Ema(9),
            IndicatorKind::Rsi,
            IndicatorKind::Stochastic,
            IndicatorKind::Macd,
        ] {
            assert_eq!(IndicatorKind::parse(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn pane_classes() {
        assert_eq!(IndicatorKind::Ma(10).pane_class(), PaneClass::Overlay);
        assert_eq!(IndicatorKind::Ema(20).pane_class(), PaneClass::Overlay);
        assert_eq!(IndicatorKind::Rsi.pane_class(), PaneClass::Oscillator);
        assert_eq!(
            IndicatorKind::Stochastic.pane_class(),
            PaneClass::Oscillator
        );
        assert_eq!(IndicatorKind::Macd.pane_class(), PaneClass::Oscillator);
    }
}
