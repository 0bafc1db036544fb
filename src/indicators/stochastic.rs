// =============================================================================
// Stochastic Oscillator (%K)
// =============================================================================
//
// Position of the close within the trailing high/low range:
//
//   %K = 100 * (close - min(low, W)) / (max(high, W) - min(low, W))
//
// The first `window - 1` entries are `None`. When the trailing high equals
// the trailing low the range is zero and %K is undefined — `None`, never an
// error or a forced value.

/// Compute the %K column, aligned with the input slices.
///
/// The three slices must describe the same bars; the output length follows
/// `closes`.
pub fn stoch_k(highs: &[f64], lows: &[f64], closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut out = vec![None; closes.len()];
    if window == 0 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let start = i + 1 - window;
        let lowest = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
        let highest = highs[start..=i]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        if highest > lowest {
            out[i] = Some(100.0 * (closes[i] - lowest) / (highest - lowest));
        }
    }

    out
}
