use crate::PriceForecaster;

/// Walk-forward (time-series) validation error.
///
/// For each of the last `splits` positions `k` (never earlier than index 2),
/// forecasts from `prices[..k]` and compares with `prices[k]`. Returns the mean
/// absolute error, or `None` with fewer than three points, zero splits, or when
/// no fold produced a forecast. Diagnostic only.
pub fn walk_forward_error(
    forecaster: &dyn PriceForecaster,
    prices: &[f64],
    splits: usize,
) -> Option<f64> {
    let n = prices.len();
    if n < 3 || splits == 0 {
        return None;
    }

    let start = n.saturating_sub(splits).max(2);
    let errors: Vec<f64> = (start..n)
        .filter_map(|k| {
            forecaster
                .forecast(&prices[..k])
                .map(|predicted| (predicted - prices[k]).abs())
        })
        .collect();

    if errors.is_empty() {
        return None;
    }
    Some(errors.iter().sum::<f64>() / errors.len() as f64)
}
