use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use common::{
    Error, PurchaseOrder, Result, TradeExecutor, TradingMode, TxReceipt, WalletCredentials,
};

/// Simulated trade executor for paper trading.
///
/// Purchases are paid from an in-memory ETH balance and recorded with a
/// synthetic transaction hash. Nothing is ever sent to an Ethereum node.
pub struct PaperExecutor {
    /// Simulated wallet balance in ETH.
    balance_eth: Arc<RwLock<f64>>,
    /// Accepted purchases, oldest first.
    purchases: Arc<RwLock<Vec<TxReceipt>>>,
}

impl PaperExecutor {
    pub fn new(initial_balance_eth: f64) -> Self {
        info!(balance_eth = initial_balance_eth, "PaperExecutor initialized");
        Self {
            balance_eth: Arc::new(RwLock::new(initial_balance_eth)),
            purchases: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn balance_eth(&self) -> f64 {
        *self.balance_eth.read().await
    }

    /// Every simulated purchase so far (for auditing and tests).
    pub async fn purchases(&self) -> Vec<TxReceipt> {
        self.purchases.read().await.clone()
    }
}

#[async_trait]
impl TradeExecutor for PaperExecutor {
    async fn submit_purchase(
        &self,
        order: &PurchaseOrder,
        credentials: &WalletCredentials,
    ) -> Result<TxReceipt> {
        if !order.price_eth.is_finite() || order.price_eth <= 0.0 {
            return Err(Error::Execution(format!(
                "invalid purchase price: {} ETH",
                order.price_eth
            )));
        }

        let mut balance = self.balance_eth.write().await;
        if order.price_eth > *balance {
            return Err(Error::Execution(format!(
                "insufficient paper balance: {:.6} ETH available, {:.6} ETH required",
                *balance, order.price_eth
            )));
        }
        *balance -= order.price_eth;

        let receipt = TxReceipt {
            order_id: order.id.clone(),
            tx_hash: synthetic_tx_hash(),
            asset: order.asset.clone(),
            price_eth: order.price_eth,
            mode: TradingMode::Paper,
            submitted_at: Utc::now(),
        };

        debug!(
            asset = %order.asset,
            wallet = %credentials.address,
            price_eth = order.price_eth,
            remaining_eth = *balance,
            tx_hash = %receipt.tx_hash,
            "Paper purchase simulated"
        );

        self.purchases.write().await.push(receipt.clone());
        Ok(receipt)
    }
}

/// `0x` + 64 hex digits, shaped like a real transaction hash.
fn synthetic_tx_hash() -> String {
    format!("0x{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
