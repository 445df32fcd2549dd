use async_trait::async_trait;

use crate::{AssetDetails, AssetId, PurchaseOrder, Result, SaleEvent, TxReceipt, WalletCredentials};

/// Read-only view of an NFT marketplace.
///
/// `OpenSeaClient` implements this against the OpenSea REST API.
/// Implementations return `Error::DataUnavailable` for transport failures and
/// malformed payloads; missing optional fields are not errors.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Last sale price and description of an asset.
    async fn asset_details(&self, asset: &AssetId) -> Result<AssetDetails>;

    /// Historical sale events, oldest first.
    async fn sale_history(&self, asset: &AssetId) -> Result<Vec<SaleEvent>>;
}

/// Submits purchase transactions.
///
/// `EthereumExecutor` implements this for live trading.
/// `PaperExecutor` implements this for simulation.
///
/// Only `Trader` in `crates/engine` calls `submit_purchase`, and only after
/// the decision engine has approved the trade. Failures are never retried.
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    /// Pay `order.price_eth` from the `credentials` wallet for `order.asset`.
    async fn submit_purchase(
        &self,
        order: &PurchaseOrder,
        credentials: &WalletCredentials,
    ) -> Result<TxReceipt>;
}
