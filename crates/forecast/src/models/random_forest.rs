use smartcore::api::{Predictor, SupervisedEstimator};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use common::{Error, Result};

use crate::PriceForecaster;

/// Random-forest regression of price on sale index.
///
/// The forest is refitted on every call with a fixed seed, so identical
/// histories always produce identical forecasts. Predicting one step past the
/// last index lands in each tree's right-most leaf, so the forecast is a
/// bootstrap-weighted average of recent prices and always stays inside the
/// observed price range.
#[derive(Debug, Clone)]
pub struct RandomForestForecaster {
    pub n_trees: usize,
    pub max_depth: u16,
    pub seed: u64,
}

impl RandomForestForecaster {
    pub fn new(n_trees: usize, max_depth: u16, seed: u64) -> Self {
        Self {
            n_trees: n_trees.max(1),
            max_depth: max_depth.max(1),
            seed,
        }
    }
}

impl Default for RandomForestForecaster {
    fn default() -> Self {
        Self::new(100, 10, 42)
    }
}

impl PriceForecaster for RandomForestForecaster {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn predict_next(&self, prices: &[f64]) -> Result<f64> {
        if prices.len() < 2 {
            return Err(Error::InsufficientHistory {
                points: prices.len(),
            });
        }

        let rows: Vec<Vec<f64>> = (0..prices.len()).map(|i| vec![i as f64]).collect();
        let features = DenseMatrix::from_2d_vec(&rows)
            .map_err(|e| Error::Model(format!("Failed to create feature matrix: {}", e)))?;
        let targets: Vec<f64> = prices.to_vec();

        let parameters = RandomForestRegressorParameters {
            n_trees: self.n_trees as _,
            max_depth: Some(self.max_depth as _),
            min_samples_leaf: 1,
            min_samples_split: 2,
            m: Some(1), // single feature
            keep_samples: false,
            seed: self.seed as _,
        };

        let model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> =
            RandomForestRegressor::fit(&features, &targets, parameters)
                .map_err(|e| Error::Model(format!("Failed to train model: {:?}", e)))?;

        let next = DenseMatrix::from_2d_vec(&vec![vec![prices.len() as f64]])
            .map_err(|e| Error::Model(format!("Failed to create prediction matrix: {}", e)))?;
        let prediction = model
            .predict(&next)
            .map_err(|e| Error::Model(format!("Failed to make prediction: {:?}", e)))?;

        prediction
            .first()
            .copied()
            .ok_or_else(|| Error::Model("model returned no prediction".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_observed_range() {
        let prices = [0.8, 0.9, 0.85, 0.95];
        let next = RandomForestForecaster::default().forecast(&prices).unwrap();
        assert!((0.8..=0.95).contains(&next), "forecast {next} outside observed range");
    }

    #[test]
    fn same_seed_same_forecast() {
        let prices = [1.2, 1.1, 1.4, 1.3, 1.6, 1.5];
        let a = RandomForestForecaster::new(25, 5, 7).forecast(&prices);
        let b = RandomForestForecaster::new(25, 5, 7).forecast(&prices);
        assert_eq!(a, b);
    }

    #[test]
    fn two_points_are_enough() {
        let next = RandomForestForecaster::default().forecast(&[1.0, 2.0]).unwrap();
        assert!((1.0..=2.0).contains(&next));
    }

    #[test]
    fn zero_sizes_are_bumped_to_one() {
        let model = RandomForestForecaster::new(0, 0, 1);
        assert_eq!(model.n_trees, 1);
        assert_eq!(model.max_depth, 1);
    }
}
