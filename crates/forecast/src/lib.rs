pub mod config;
pub mod models;
pub mod validation;

pub use config::{ForecastModel, ForecasterConfig};
pub use models::{LinearTrendForecaster, RandomForestForecaster};
pub use validation::walk_forward_error;

use tracing::{debug, warn};

use common::{Error, Result};

/// All price models must satisfy this trait.
pub trait PriceForecaster: Send + Sync {
    /// Model name, for logs.
    fn name(&self) -> &str;

    /// Fit on `prices` (oldest first) and predict the value at index `prices.len()`.
    ///
    /// Callers guarantee at least two finite points; use `forecast` for unchecked input.
    fn predict_next(&self, prices: &[f64]) -> Result<f64>;

    /// Predicted next price, or `None` when no usable forecast exists.
    ///
    /// Never panics: fewer than two points, non-finite input, model failures and
    /// non-positive or non-finite predictions all yield `None` with a warning.
    /// A flat series forecasts its own value.
    fn forecast(&self, prices: &[f64]) -> Option<f64> {
        if prices.len() < 2 {
            warn!(
                model = self.name(),
                error = %Error::InsufficientHistory { points: prices.len() },
                "No forecast available"
            );
            return None;
        }
        if prices.iter().any(|p| !p.is_finite()) {
            warn!(model = self.name(), "Price history contains non-finite values, no forecast");
            return None;
        }

        let first = prices[0];
        if prices.iter().all(|p| *p == first) {
            debug!(model = self.name(), price = first, "Flat price history, extrapolating flat");
            return Some(first);
        }

        match self.predict_next(prices) {
            Ok(next) if next.is_finite() && next > 0.0 => {
                debug!(model = self.name(), points = prices.len(), forecast = next, "Forecast computed");
                Some(next)
            }
            Ok(next) => {
                warn!(model = self.name(), forecast = next, "Discarding non-positive forecast");
                None
            }
            Err(e) => {
                warn!(model = self.name(), error = %e, "Forecast failed");
                None
            }
        }
    }
}

/// Build the configured forecaster.
pub fn build_forecaster(cfg: &ForecasterConfig) -> Box<dyn PriceForecaster> {
    match cfg.model {
        ForecastModel::RandomForest => Box::new(RandomForestForecaster::new(
            cfg.n_trees,
            cfg.max_depth,
            cfg.seed,
        )),
        ForecastModel::Linear => Box::new(LinearTrendForecaster),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl PriceForecaster for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict_next(&self, _prices: &[f64]) -> Result<f64> {
            Err(Error::Model("no fit".into()))
        }
    }

    struct Negative;

    impl PriceForecaster for Negative {
        fn name(&self) -> &str {
            "negative"
        }

        fn predict_next(&self, _prices: &[f64]) -> Result<f64> {
            Ok(-0.1)
        }
    }

    #[test]
    fn model_errors_become_none() {
        assert_eq!(Broken.forecast(&[1.0, 2.0]), None);
    }

    #[test]
    fn non_positive_prediction_is_discarded() {
        assert_eq!(Negative.forecast(&[1.0, 0.5]), None);
    }

    #[test]
    fn flat_series_short_circuits_the_model() {
        assert_eq!(Broken.forecast(&[0.7, 0.7, 0.7]), Some(0.7));
    }

    #[test]
    fn nan_in_history_yields_none() {
        assert_eq!(LinearTrendForecaster.forecast(&[1.0, f64::NAN, 2.0]), None);
    }

    #[test]
    fn builder_honours_model_choice() {
        let linear = build_forecaster(&ForecasterConfig {
            model: ForecastModel::Linear,
            ..ForecasterConfig::default()
        });
        assert_eq!(linear.name(), "linear_trend");

        let forest = build_forecaster(&ForecasterConfig::default());
        assert_eq!(forest.name(), "random_forest");
    }
}
