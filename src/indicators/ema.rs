// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Adjust-disabled recursive form, applied uniformly for every EMA in the
// system (overlays, MACD components, MACD signal):
//
//   alpha  = 2 / (span + 1)
//   EMA[0] = value[0]
//   EMA[i] = alpha * value[i] + (1 - alpha) * EMA[i-1]
//
// Seeded with the first value, so the column is defined from bar 0 — an EMA
// has no warm-up gap. The alternative seeding (SMA of the first span)
// weights the early sample differently; one convention had to be picked and
// this is it.

/// Compute the EMA column for `values`, aligned with the input.
///
/// # Edge cases
/// - `span == 0` => all `None`
/// - empty input => empty output
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if span == 0 || n == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    out[0] = Some(prev);

    for i in 1..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = Some(prev);
    }

    out
}

/// EMA over a column that may itself carry warm-up `None`s (the MACD signal
/// line smooths the MACD column). The recursion seeds at the first defined
/// point; leading `None`s propagate through unchanged.
pub fn ema_opt(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if span == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = value else { continue };
        let next = match prev {
            None => *v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out[i] = Some(next);
        prev = Some(next);
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
    fn defined_from_bar_zero() {
        let values = vec![10.0, 11.0, 12.0];
        let out = ema(&values, 9);
        assert_eq!(out[0], Some(10.0));
        assert!(out.iter().all(Option::is_some));
    }

    #[test]
    fn matches_hand_recursion() {
        let values: Vec<f64> = (1..=8).map(|x| x as f64).collect();
        let span = 3;
        let alpha = 2.0 / 4.0;
        let out = ema(&values, span);

        let mut expected = values[0];
        assert_eq!(out[0], Some(expected));
        for i in 1..values.len() {
            expected = alpha * values[i] + (1.0 - alpha) * expected;
            assert!((out[i].unwrap() - expected).abs() < 1e-12, "index {i}");
        }
    }

    #[test]
    fn span_zero_is_all_none() {
        assert!(ema(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn ema_opt_seeds_at_first_defined_point() {
        let values = vec![None, None, Some(4.0), Some(6.0)];
        let out = ema_opt(&values, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(4.0));
        assert_eq!(out[3], Some(0.5 * 6.0 + 0.5 * 4.0));
    }

    #[test]
    fn ema_opt_matches_ema_on_fully_defined_input() {
        let values: Vec<f64> = (1..=20).map(|x| x as f64 * 1.5).collect();
        let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let a = ema(&values, 9);
        let b = ema_opt(&wrapped, 9);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x.unwrap() - y.unwrap()).abs() < 1e-12);
        }
    }
}
