// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(fast, close) - EMA(slow, close)
// Signal line = EMA(signal, MACD line)
//
// Both component EMAs use the adjust-disabled recursion seeded at bar 0
// (see `ema.rs`), so the MACD line is defined for every bar and any
// undefinedness only ever propagates from the inputs.

use super::ema::{ema, ema_opt};

/// The two MACD output columns, aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdResult {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Compute MACD and its signal line over `closes`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdResult {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal = ema_opt(&line, signal_span);

    MacdResult { macd: line, signal }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_fast_minus_slow() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let out = macd(&closes, 12, 26, 9);
        let fast = ema(&closes, 12);
        let slow = ema(&closes, 26);
        for i in 0..closes.len() {
            let expected = fast[i].unwrap() - slow[i].unwrap();
            assert!((out.macd[i].unwrap() - expected).abs() < 1e-12, "index {i}");
        }
    }

    #[test]
    fn signal_is_independent_ema_of_line() {
        // Reconstruct EMA(9) of the MACD line by hand and compare.
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).cos() * 4.0).collect();
        let out = macd(&closes, 12, 26, 9);

        let alpha = 2.0 / 10.0;
        let mut prev = out.macd[0].unwrap();
        assert!((out.signal[0].unwrap() - prev).abs() < 1e-12);
        for i in 1..closes.len() {
            prev = alpha * out.macd[i].unwrap() + (1.0 - alpha) * prev;
            assert!((out.signal[i].unwrap() - prev).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn defined_from_bar_zero() {
        let closes = vec![10.0, 10.5, 11.0];
        let out = macd(&closes, 12, 26, 9);
        assert!(out.macd.iter().all(Option::is_some));
        assert!(out.signal.iter().all(Option::is_some));
    }

    #[test]
    fn empty_input_gives_empty_columns() {
        let out = macd(&[], 12, 26, 9);
        assert!(out.macd.is_empty());
        assert!(out.signal.is_empty());
    }

    #[test]
    fn flat_series_gives_zero_line() {
        let closes = vec![100.0; 40];
        let out = macd(&closes, 12, 26, 9);
        for v in out.macd.iter().flatten() {
            assert!(v.abs() < 1e-12);
        }
    }
}
