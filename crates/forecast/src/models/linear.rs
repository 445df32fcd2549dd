use tracing::debug;

use common::{Error, Result};

use crate::PriceForecaster;

/// Ordinary least-squares trend line over (index, price), extended one step.
///
/// A falling trend that extrapolates to zero or below is floored at the lowest
/// observed price.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendForecaster;

impl PriceForecaster for LinearTrendForecaster {
    fn name(&self) -> &str {
        "linear_trend"
    }

    fn predict_next(&self, prices: &[f64]) -> Result<f64> {
        let n = prices.len();
        if n < 2 {
            return Err(Error::InsufficientHistory { points: n });
        }

        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = prices.iter().sum::<f64>() / n_f;

        let (mut cov, mut var) = (0.0, 0.0);
        for (i, &y) in prices.iter().enumerate() {
            let dx = i as f64 - mean_x;
            cov += dx * (y - mean_y);
            var += dx * dx;
        }

        let slope = cov / var;
        let next = mean_y + slope * (n_f - mean_x);
        if next > 0.0 {
            return Ok(next);
        }

        let floor = prices.iter().copied().fold(f64::INFINITY, f64::min);
        debug!(trend = next, floor, "Trend extrapolates below zero, flooring at lowest price");
        Ok(floor)
    }
}
