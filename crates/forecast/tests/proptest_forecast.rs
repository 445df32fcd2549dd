use forecast::{walk_forward_error, LinearTrendForecaster, PriceForecaster, RandomForestForecaster};
use proptest::prelude::*;

fn forest() -> RandomForestForecaster {
    RandomForestForecaster::new(20, 8, 42)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Fewer than two points never produce a forecast and never panic.
    #[test]
    fn short_history_is_unavailable(prices in prop::collection::vec(0.0001f64..1_000.0, 0..2)) {
        prop_assert!(forest().forecast(&prices).is_none());
        prop_assert!(LinearTrendForecaster.forecast(&prices).is_none());
    }

    /// Well-formed histories always yield a finite forest forecast inside the observed range.
    #[test]
    fn forest_forecast_is_finite_and_bounded(prices in prop::collection::vec(0.0001f64..1_000.0, 2..30)) {
        let next = forest().forecast(&prices);
        prop_assert!(next.is_some());
        let next = next.unwrap();
        let lo = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(next.is_finite());
        prop_assert!(next >= lo - 1e-9 && next <= hi + 1e-9, "{} not in [{}, {}]", next, lo, hi);
    }

    /// Well-formed histories always yield a finite, positive linear forecast.
    #[test]
    fn linear_forecast_is_finite(prices in prop::collection::vec(0.0001f64..1_000.0, 2..30)) {
        let next = LinearTrendForecaster.forecast(&prices);
        prop_assert!(next.is_some(), "no forecast for {:?}", prices);
        let next = next.unwrap();
        prop_assert!(next.is_finite() && next > 0.0);
    }

    /// Strictly falling histories still forecast, never below zero.
    #[test]
    fn falling_history_still_forecasts(start in 1.0f64..100.0, step in 0.01f64..0.99, len in 2usize..12) {
        let prices: Vec<f64> = (0..len).map(|i| start * (1.0 - step).powi(i as i32)).collect();
        let next = LinearTrendForecaster.forecast(&prices);
        prop_assert!(matches!(next, Some(p) if p.is_finite() && p > 0.0), "got {:?}", next);
    }

    /// A constant series forecasts its own value.
    #[test]
    fn flat_line_property(p in 0.0001f64..1_000.0, len in 2usize..20) {
        let prices = vec![p; len];
        let forest_next = forest().forecast(&prices).unwrap();
        let linear_next = LinearTrendForecaster.forecast(&prices).unwrap();
        prop_assert!((forest_next - p).abs() < 1e-9);
        prop_assert!((linear_next - p).abs() < 1e-9);
    }

    /// Forecasting is a pure function of the history.
    #[test]
    fn forecasts_are_repeatable(prices in prop::collection::vec(0.0001f64..1_000.0, 2..15)) {
        let model = forest();
        prop_assert_eq!(model.forecast(&prices), model.forecast(&prices));
    }

    #[test]
    fn walk_forward_error_is_finite(prices in prop::collection::vec(0.0001f64..1_000.0, 3..15)) {
        if let Some(mae) = walk_forward_error(&forest(), &prices, 5) {
            prop_assert!(mae.is_finite() && mae >= 0.0);
        }
    }
}

#[test]
fn reference_scenario_forecast_is_plausible() {
    let prices = [0.8, 0.9, 0.85, 0.95];
    let next = RandomForestForecaster::default().forecast(&prices).unwrap();
    assert!((0.8..=1.1).contains(&next), "forecast {next} outside plausible range");
}
