use tracing::info;

use common::{DeclineReason, SentimentLabel, SentimentSignal, TradeDecision};

use crate::config::{DecisionConfig, PriceGate, SentimentGate};

/// Everything the engine looks at besides the ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecisionInputs {
    /// Forecasted next price in ETH, if the forecaster produced one.
    pub forecast: Option<f64>,
    /// Current last-sale price in ETH, if the marketplace reported one.
    pub listed_price: Option<f64>,
    pub sentiment: Option<SentimentSignal>,
}

/// The gatekeeper between the forecast and the trade executor.
///
/// `evaluate` is a pure function of its inputs: no I/O, no interior state, and
/// it never panics. Every check runs before anything is submitted.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(mut config: DecisionConfig) -> Self {
        config.negative_confidence = if config.negative_confidence.is_finite() {
            config.negative_confidence.clamp(0.0, 1.0)
        } else {
            DecisionConfig::default().negative_confidence
        };
        info!(
            price_gate = ?config.price_gate,
            sentiment_gate = ?config.sentiment_gate,
            negative_confidence = config.negative_confidence,
            "DecisionEngine initialized"
        );
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Decide whether to attempt a purchase with `max_price` (ETH) as the ceiling.
    pub fn evaluate(&self, inputs: &DecisionInputs, max_price: f64) -> TradeDecision {
        let forecast = inputs.forecast.filter(|p| is_usable_price(*p));

        let Some(forecast_price) = forecast else {
            return decline(DeclineReason::ForecastUnavailable, None);
        };

        // Sentiment gate
        match self.config.sentiment_gate {
            SentimentGate::BlockNegative => {
                if self.is_unambiguously_negative(inputs.sentiment.as_ref()) {
                    return decline(DeclineReason::NegativeSentiment, forecast);
                }
            }
            SentimentGate::RequirePositive => {
                if self.is_unambiguously_negative(inputs.sentiment.as_ref()) {
                    return decline(DeclineReason::NegativeSentiment, forecast);
                }
                let positive = inputs
                    .sentiment
                    .map(|s| s.label == SentimentLabel::Positive)
                    .unwrap_or(false);
                if !positive {
                    return decline(DeclineReason::SentimentNotPositive, forecast);
                }
            }
            SentimentGate::Ignore => {}
        }

        // Price gate
        let gate_price = match self.config.price_gate {
            PriceGate::Forecast => forecast_price,
            PriceGate::Listed => match inputs.listed_price.filter(|p| is_usable_price(*p)) {
                Some(listed) => listed,
                None => return decline(DeclineReason::ListedPriceUnavailable, forecast),
            },
        };

        // Written so that a NaN ceiling declines.
        if !(gate_price <= max_price) {
            return decline(DeclineReason::PriceAboveCeiling, forecast);
        }

        TradeDecision::Attempt {
            expected_price: gate_price,
        }
    }

    fn is_unambiguously_negative(&self, sentiment: Option<&SentimentSignal>) -> bool {
        match sentiment {
            Some(s) => {
                s.label == SentimentLabel::Negative
                    && s.confidence >= self.config.negative_confidence
            }
            None => false,
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DecisionConfig::default())
    }
}

fn is_usable_price(p: f64) -> bool {
    p.is_finite() && p > 0.0
}

fn decline(reason: DeclineReason, forecast: Option<f64>) -> TradeDecision {
    TradeDecision::Decline { reason, forecast }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
