use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, SentimentScorer, TradeExecutor, TradeOutcome, TradingMode};
use decision::DecisionEngine;
use engine::{
    DisabledScorer, EthereumExecutor, GasSettings, HuggingFaceScorer, OpenSeaClient, Trader,
    TraderFileConfig,
};
use paper::PaperExecutor;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("Invalid configuration")?;
    info!(mode = %cfg.trading_mode, asset = %cfg.asset, "Flipbot starting");

    let file_cfg = TraderFileConfig::load(cfg.trader_config_path.as_deref())?;
    let timeout = Duration::from_secs(cfg.http_timeout_secs);
    let credentials = cfg.credentials();

    // ── Marketplace + sentiment ───────────────────────────────────────────────
    let market = Arc::new(OpenSeaClient::new(
        cfg.opensea_api_key.clone(),
        cfg.opensea_base_url.clone(),
        timeout,
    )?);

    let scorer: Arc<dyn SentimentScorer> = match &cfg.sentiment_api_token {
        Some(token) => {
            info!(model = %cfg.sentiment_model, "Sentiment scoring enabled");
            Arc::new(HuggingFaceScorer::new(
                &cfg.sentiment_base_url,
                &cfg.sentiment_model,
                token.clone(),
                timeout,
            )?)
        }
        None => {
            warn!("SENTIMENT_API_TOKEN not set, sentiment scoring disabled");
            Arc::new(DisabledScorer)
        }
    };

    // ── Trade executor (injected based on TRADING_MODE) ───────────────────────
    let executor: Arc<dyn TradeExecutor> = match cfg.trading_mode {
        TradingMode::Live => {
            info!("Live trading mode, using EthereumExecutor");
            let gas = GasSettings {
                chain_id: cfg.chain_id,
                gas_limit: cfg.gas_limit,
                gas_price_gwei: cfg.gas_price_gwei,
            };
            Arc::new(EthereumExecutor::connect(cfg.eth_node_url.clone(), gas, &credentials, timeout).await?)
        }
        TradingMode::Paper => {
            info!(balance_eth = cfg.paper_balance_eth, "Paper trading mode, using PaperExecutor");
            Arc::new(PaperExecutor::new(cfg.paper_balance_eth))
        }
    };

    // ── Trader ────────────────────────────────────────────────────────────────
    let trader = Trader::new(
        market,
        scorer,
        forecast::build_forecaster(&file_cfg.forecaster),
        DecisionEngine::new(file_cfg.decision.clone()),
        executor,
        file_cfg.forecaster.validation_splits,
    );

    let outcome = trader.evaluate(&cfg.trade_parameters()).await;
    info!(%outcome, "Run complete");

    match outcome {
        TradeOutcome::PurchaseFailed { error } => bail!("Purchase failed: {error}"),
        TradeOutcome::Purchased(_) | TradeOutcome::Declined(_) => Ok(()),
    }
}
