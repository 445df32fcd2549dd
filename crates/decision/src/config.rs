use serde::{Deserialize, Serialize};

/// `[decision]` table of the trader config file.
///
/// ```toml
/// [decision]
/// price_gate = "forecast"          # or "listed"
/// sentiment_gate = "block_negative" # or "require_positive", "ignore"
/// negative_confidence = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub price_gate: PriceGate,
    pub sentiment_gate: SentimentGate,
    /// Minimum confidence for a negative label to count as unambiguous (e.g. 0.5).
    pub negative_confidence: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            price_gate: PriceGate::Forecast,
            sentiment_gate: SentimentGate::BlockNegative,
            negative_confidence: 0.5,
        }
    }
}

/// Which price is compared against the ceiling and submitted with the purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceGate {
    /// Forecasted next price.
    #[default]
    Forecast,
    /// Current last-sale price of the listing. A forecast is still required.
    Listed,
}

/// How the sentiment signal affects the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentGate {
    /// Unambiguously negative sentiment blocks; absent sentiment does not.
    #[default]
    BlockNegative,
    /// Only a positive label lets the trade through.
    RequirePositive,
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_policy() {
        let cfg: DecisionConfig =
            toml::from_str("price_gate = \"listed\"\nsentiment_gate = \"require_positive\"").unwrap();
        assert_eq!(cfg.price_gate, PriceGate::Listed);
        assert_eq!(cfg.sentiment_gate, SentimentGate::RequirePositive);
        assert_eq!(cfg.negative_confidence, 0.5);
    }

    #[test]
    fn empty_table_is_default_policy() {
        let cfg: DecisionConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, DecisionConfig::default());
    }
}
