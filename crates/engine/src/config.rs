use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Error, Result};
use decision::DecisionConfig;
use forecast::ForecasterConfig;

/// Optional tuning file (`TRADER_CONFIG_PATH`).
///
/// Example `config/trader.toml`:
/// ```toml
/// [decision]
/// price_gate = "forecast"
/// sentiment_gate = "block_negative"
/// negative_confidence = 0.5
///
/// [forecaster]
/// model = "random_forest"
/// n_trees = 100
/// max_depth = 10
/// seed = 42
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TraderFileConfig {
    pub decision: DecisionConfig,
    pub forecaster: ForecasterConfig,
}

impl TraderFileConfig {
    /// Load from a TOML file, or defaults when no path is configured.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            info!("No trader config file set, using default decision and forecaster settings");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read trader config at '{path}': {e}"))
        })?;
        let cfg = Self::parse(&content)
            .map_err(|e| Error::Config(format!("Failed to parse trader config at '{path}': {e}")))?;
        info!(path, "Loaded trader config");
        Ok(cfg)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decision::{PriceGate, SentimentGate};
    use forecast::ForecastModel;

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(TraderFileConfig::load(None).unwrap(), TraderFileConfig::default());
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = TraderFileConfig::load(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn parses_both_tables() {
        let cfg = TraderFileConfig::parse(
            r#"
            [decision]
            price_gate = "listed"
            sentiment_gate = "ignore"

            [forecaster]
            model = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.decision.price_gate, PriceGate::Listed);
        assert_eq!(cfg.decision.sentiment_gate, SentimentGate::Ignore);
        assert_eq!(cfg.forecaster.model, ForecastModel::Linear);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(TraderFileConfig::parse("[decision]\nprice_gate = \"vibes\"").is_err());
    }
}
