// =============================================================================
// Relative Strength Index (RSI) — rolling-mean form
// =============================================================================
//
// Gains and losses are split from consecutive close-to-close deltas, then
// averaged with a plain trailing mean over `window` deltas (no Wilder
// smoothing):
//
//   gain = max(delta, 0)      loss = max(-delta, 0)
//   RS   = mean(gain, W) / mean(loss, W)
//   RSI  = 100 - 100 / (1 + RS)
//
// The first `window` entries are `None` (the delta at bar 0 does not
// exist). Division semantics follow IEEE float behaviour on the source
// data: a gains-only window (x/0) saturates to RSI 100, while a fully flat
// window (0/0) is undefined and stays `None`.

/// Compute the RSI column for `closes`, aligned with the input.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if window == 0 || n < window + 1 {
        return out;
    }

    // deltas[j] is the change into close index j + 1.
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for i in window..n {
        let span = &deltas[i - window..i];
        let (sum_gain, sum_loss) = span.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });
        let mean_gain = sum_gain / window as f64;
        let mean_loss = sum_loss / window as f64;

        out[i] = if mean_loss == 0.0 {
            if mean_gain == 0.0 {
                None // 0/0: no movement at all in the window.
            } else {
                Some(100.0) // Gains only.
            }
        } else {
            let rs = mean_gain / mean_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_spans_first_window_entries() {
        let closes: Vec<f64> = (100..120).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(Option::is_some));
    }

    #[test]
    fn strictly_rising_series_saturates_to_100() {
        // closes 100..119: no losses ever, so RSI = 100 wherever defined.
        let closes: Vec<f64> = (100..120).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out[19], Some(100.0));
    }

    #[test]
    fn flat_series_is_undefined_past_warm_up() {
        let closes = vec![100.0; 30];
        let out = rsi(&closes, 14);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn bounded_to_0_100_wherever_defined() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 8.0)
            .collect();
        for v in rsi(&closes, 14).iter().flatten() {
            assert!((0.0..=100.0).contains(v), "out of bounds: {v}");
        }
    }

    #[test]
    fn known_value_from_alternating_moves() {
        // +2 then -1 repeating over a 2-delta window: mean gain 1, mean
        // loss 0.5, RS = 2, RSI = 100 - 100/3.
        let closes = vec![10.0, 12.0, 11.0, 13.0, 12.0, 14.0];
        let out = rsi(&closes, 2);
        let expected = 100.0 - 100.0 / 3.0;
        for v in out[2..].iter() {
            assert!((v.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn short_series_is_all_none() {
        // RSI(14) needs 15 bars.
        let closes: Vec<f64> = (0..14).map(|x| x as f64 + 1.0).collect();
        assert!(rsi(&closes, 14).iter().all(Option::is_none));
    }
}
