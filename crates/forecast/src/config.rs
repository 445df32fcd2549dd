use serde::{Deserialize, Serialize};

/// `[forecaster]` table of the trader config file.
///
/// ```toml
/// [forecaster]
/// model = "random_forest"
/// n_trees = 100
/// max_depth = 10
/// seed = 42
/// validation_splits = 5
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecasterConfig {
    pub model: ForecastModel,
    /// Random forest only.
    pub n_trees: usize,
    /// Random forest only.
    pub max_depth: u16,
    /// Random forest only. Same seed + same history = same forecast.
    pub seed: u64,
    /// Number of one-step-ahead forecasts scored by walk-forward validation.
    pub validation_splits: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    RandomForest,
    Linear,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            model: ForecastModel::RandomForest,
            n_trees: 100,
            max_depth: 10,
            seed: 42,
            validation_splits: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standalone_forest() {
        let cfg = ForecasterConfig::default();
        let forest = crate::RandomForestForecaster::default();
        assert_eq!(cfg.n_trees, 100);
        assert_eq!(cfg.n_trees, forest.n_trees);
        assert_eq!(cfg.max_depth, forest.max_depth);
        assert_eq!(cfg.seed, forest.seed);
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let cfg: ForecasterConfig = toml::from_str("model = \"linear\"\nseed = 7").unwrap();
        assert_eq!(cfg.model, ForecastModel::Linear);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.n_trees, 100);
    }
}
