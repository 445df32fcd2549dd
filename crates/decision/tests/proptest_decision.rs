use common::{DeclineReason, SentimentLabel, SentimentSignal, TradeDecision};
use decision::{DecisionConfig, DecisionEngine, DecisionInputs, PriceGate, SentimentGate};
use proptest::prelude::*;

fn any_sentiment() -> impl Strategy<Value = Option<SentimentSignal>> {
    prop::option::of(
        (
            prop_oneof![
                Just(SentimentLabel::Positive),
                Just(SentimentLabel::Negative),
                Just(SentimentLabel::Neutral),
            ],
            0.0f64..=1.0,
        )
            .prop_map(|(label, confidence)| SentimentSignal::new(label, confidence)),
    )
}

fn any_price() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0001f64..1_000_000.0,
        1 => Just(0.0),
        1 => Just(-1.0),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn any_config() -> impl Strategy<Value = DecisionConfig> {
    (
        prop_oneof![Just(PriceGate::Forecast), Just(PriceGate::Listed)],
        prop_oneof![
            Just(SentimentGate::BlockNegative),
            Just(SentimentGate::RequirePositive),
            Just(SentimentGate::Ignore),
        ],
        any::<f64>(),
    )
        .prop_map(|(price_gate, sentiment_gate, negative_confidence)| DecisionConfig {
            price_gate,
            sentiment_gate,
            negative_confidence,
        })
}

proptest! {
    /// No forecast means no trade, whatever the rest of the inputs.
    #[test]
    fn no_forecast_never_trades(
        config in any_config(),
        listed in prop::option::of(any_price()),
        sentiment in any_sentiment(),
        ceiling in any_price(),
    ) {
        let engine = DecisionEngine::new(config);
        let d = engine.evaluate(&DecisionInputs { forecast: None, listed_price: listed, sentiment }, ceiling);
        prop_assert_eq!(d.reason(), Some(DeclineReason::ForecastUnavailable));
    }

    /// Evaluation never panics, never attempts above the ceiling, and is repeatable.
    #[test]
    fn attempts_respect_ceiling_and_are_idempotent(
        config in any_config(),
        forecast in prop::option::of(any_price()),
        listed in prop::option::of(any_price()),
        sentiment in any_sentiment(),
        ceiling in any_price(),
    ) {
        let engine = DecisionEngine::new(config);
        let inputs = DecisionInputs { forecast, listed_price: listed, sentiment };
        let first = engine.evaluate(&inputs, ceiling);
        let second = engine.evaluate(&inputs, ceiling);

        match (first, second) {
            (TradeDecision::Attempt { expected_price: a }, TradeDecision::Attempt { expected_price: b }) => {
                prop_assert_eq!(a.to_bits(), b.to_bits());
                prop_assert!(a.is_finite() && a > 0.0);
                prop_assert!(a <= ceiling);
            }
            (TradeDecision::Decline { reason: ra, .. }, TradeDecision::Decline { reason: rb, .. }) => {
                prop_assert_eq!(ra, rb);
            }
            _ => prop_assert!(false, "decision changed between identical evaluations"),
        }
    }

    /// Under the default policy a positive or missing signal with a forecast
    /// under the ceiling always trades at the forecast.
    #[test]
    fn default_policy_trades_under_ceiling(
        forecast in 0.0001f64..1.0,
        headroom in 0.0f64..10.0,
        positive in any::<bool>(),
    ) {
        let sentiment = positive.then(|| SentimentSignal::new(SentimentLabel::Positive, 0.9));
        let d = DecisionEngine::default().evaluate(
            &DecisionInputs { forecast: Some(forecast), listed_price: None, sentiment },
            forecast + headroom,
        );
        prop_assert_eq!(d, TradeDecision::Attempt { expected_price: forecast });
    }
}

#[test]
fn reference_scenario_accepts_trade() {
    use forecast::{PriceForecaster, RandomForestForecaster};

    let prices = [0.8, 0.9, 0.85, 0.95];
    let forecast = RandomForestForecaster::default().forecast(&prices);
    assert!(matches!(forecast, Some(p) if (0.8..=1.1).contains(&p)));

    let d = DecisionEngine::default().evaluate(
        &DecisionInputs {
            forecast,
            listed_price: None,
            sentiment: Some(SentimentSignal::new(SentimentLabel::Positive, 0.99)),
        },
        1.0,
    );
    assert!(d.should_trade());
    assert_eq!(d.expected_price(), forecast);
}
