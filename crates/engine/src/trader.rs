use std::sync::Arc;

use tracing::{debug, error, info, warn};

use common::{
    AssetDetails, MarketDataSource, PriceHistory, PurchaseOrder, SentimentScorer,
    SentimentSignal, TradeDecision, TradeExecutor, TradeOutcome, TradeParameters,
};
use decision::{DecisionEngine, DecisionInputs};
use forecast::{walk_forward_error, PriceForecaster};

/// Runs the fetch → forecast → decide → execute flow for one asset.
///
/// Every collaborator failure before the decision is downgraded to "no data";
/// only the executor can turn a run into `PurchaseFailed`.
/// This is the ONLY component that calls `TradeExecutor::submit_purchase`.
pub struct Trader {
    market: Arc<dyn MarketDataSource>,
    scorer: Arc<dyn SentimentScorer>,
    forecaster: Box<dyn PriceForecaster>,
    decision: DecisionEngine,
    executor: Arc<dyn TradeExecutor>,
    validation_splits: usize,
}

impl Trader {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        scorer: Arc<dyn SentimentScorer>,
        forecaster: Box<dyn PriceForecaster>,
        decision: DecisionEngine,
        executor: Arc<dyn TradeExecutor>,
        validation_splits: usize,
    ) -> Self {
        Self {
            market,
            scorer,
            forecaster,
            decision,
            executor,
            validation_splits,
        }
    }

    pub async fn evaluate(&self, params: &TradeParameters) -> TradeOutcome {
        let asset = &params.asset;
        info!(%asset, max_price_eth = params.max_price_eth, "Evaluating asset");

        let details = match self.market.asset_details(asset).await {
            Ok(details) => details,
            Err(e) => {
                warn!(%asset, error = %e, "Asset details unavailable");
                AssetDetails::default()
            }
        };

        let sentiment = self.sentiment(details.description.as_deref()).await;

        let history = match self.market.sale_history(asset).await {
            Ok(sales) => PriceHistory::from_sales(&sales),
            Err(e) => {
                warn!(%asset, error = %e, "Sale history unavailable");
                PriceHistory::default()
            }
        };
        debug!(%asset, points = history.len(), "Price history loaded");

        let forecast = self.forecaster.forecast(history.as_slice());
        if let Some(mae) =
            walk_forward_error(self.forecaster.as_ref(), history.as_slice(), self.validation_splits)
        {
            debug!(model = self.forecaster.name(), mae, "Walk-forward validation error");
        }

        let inputs = DecisionInputs {
            forecast,
            listed_price: details.last_sale_price,
            sentiment,
        };
        let decision = self.decision.evaluate(&inputs, params.max_price_eth);

        let expected_price = match decision {
            TradeDecision::Attempt { expected_price } => expected_price,
            TradeDecision::Decline { reason, forecast } => {
                info!(
                    %asset,
                    %reason,
                    forecast = ?forecast,
                    max_price_eth = params.max_price_eth,
                    "Trade declined"
                );
                return TradeOutcome::Declined(decision);
            }
        };

        let order = PurchaseOrder::new(asset.clone(), expected_price);
        info!(%asset, order_id = %order.id, price_eth = expected_price, "Trade approved");

        match self
            .executor
            .submit_purchase(&order, &params.credentials)
            .await
        {
            Ok(receipt) => {
                info!(
                    %asset,
                    tx_hash = %receipt.tx_hash,
                    mode = %receipt.mode,
                    "Purchase submitted"
                );
                TradeOutcome::Purchased(receipt)
            }
            Err(e) => {
                error!(%asset, order_id = %order.id, error = %e, "Purchase failed");
                TradeOutcome::PurchaseFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn sentiment(&self, description: Option<&str>) -> Option<SentimentSignal> {
        let text = description.map(str::trim).filter(|t| !t.is_empty())?;
        match self.scorer.score(text).await {
            Ok(signal) => {
                info!(%signal, "Description sentiment");
                Some(signal)
            }
            Err(e) => {
                warn!(error = %e, "No sentiment signal");
                None
            }
        }
    }
}
