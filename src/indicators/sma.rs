// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the trailing `window` values, inclusive of the current
// bar. The first `window - 1` entries have insufficient history and are
// `None`; a rolling sum keeps the whole pass O(n).

/// Compute the SMA column for `values`, aligned with the input.
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - `values.len() < window` => all `None`
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..n {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
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
    fn warm_up_is_none_then_means() {
        let values: Vec<f64> = (1..=6).map(|x| x as f64).collect();
        let out = sma(&values, 3);
        assert_eq!(out.len(), 6);
        assert!(out[..2].iter().all(Option::is_none));
        assert_eq!(out[2], Some(2.0)); // (1+2+3)/3
        assert_eq!(out[5], Some(5.0)); // (4+5+6)/3
    }

    #[test]
    fn window_10_over_ascending_closes() {
        // closes 100..119: SMA(10) at index 9 = mean(100..=109) = 104.5
        let closes: Vec<f64> = (100..120).map(|x| x as f64).collect();
        let out = sma(&closes, 10);
        assert!(out[..9].iter().all(Option::is_none));
        assert_eq!(out[9], Some(104.5));
        assert_eq!(out[19], Some(114.5));
    }

    #[test]
    fn each_entry_matches_direct_mean() {
        let values: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let w = 7;
        let out = sma(&values, w);
        for i in (w - 1)..values.len() {
            let direct: f64 = values[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
            assert!((out[i].unwrap() - direct).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn short_series_is_all_none() {
        let out = sma(&[1.0, 2.0], 10);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn window_zero_is_all_none() {
        assert!(sma(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }
}
