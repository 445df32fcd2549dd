pub mod transaction;

use std::time::Duration;

use alloy::consensus::TxLegacy;
use alloy::primitives::{hex, TxKind};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use common::{
    Error, PurchaseOrder, Result, TradeExecutor, TradingMode, TxReceipt, WalletCredentials,
};

/// Fee and replay-protection settings. Not estimated from the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSettings {
    pub chain_id: u64,
    pub gas_limit: u64,
    pub gas_price_gwei: f64,
}

/// Submits purchases as signed legacy transactions through an Ethereum node's
/// JSON-RPC endpoint.
pub struct EthereumExecutor {
    node_url: String,
    gas: GasSettings,
    gas_price_wei: u128,
    http: Client,
}

impl EthereumExecutor {
    /// Connect to the node and check it is usable with these credentials.
    ///
    /// Fails when the node is unreachable, reports a different chain id, or the
    /// private key does not belong to the configured wallet address.
    pub async fn connect(
        node_url: impl Into<String>,
        gas: GasSettings,
        credentials: &WalletCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let executor = Self {
            node_url: node_url.into(),
            gas,
            gas_price_wei: transaction::gwei_to_wei(gas.gas_price_gwei)?,
            http: crate::http_client(timeout)?,
        };

        let signer = transaction::signer_for(credentials)?;

        let chain_hex: String = executor
            .rpc("eth_chainId", json!([]))
            .await
            .map_err(|e| Error::Config(format!("Failed to connect to Ethereum node: {e}")))?;
        let node_chain_id = parse_quantity(&chain_hex)?;
        if node_chain_id != gas.chain_id as u128 {
            return Err(Error::Config(format!(
                "Ethereum node is on chain {node_chain_id}, configured CHAIN_ID is {}",
                gas.chain_id
            )));
        }

        info!(
            chain_id = gas.chain_id,
            wallet = %signer.address(),
            gas_limit = gas.gas_limit,
            gas_price_gwei = gas.gas_price_gwei,
            "Connected to Ethereum node"
        );
        Ok(executor)
    }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp = self
            .http
            .post(&self.node_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Http(format!("{method}: {e}")))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(format!("{method}: {e}")))?;
        if !status.is_success() {
            return Err(Error::Http(format!("{method}: HTTP {status}: {body}")));
        }

        let parsed: RpcResponse<T> = serde_json::from_str(&body)?;
        match (parsed.result, parsed.error) {
            (_, Some(err)) => Err(Error::Execution(format!(
                "{method} rejected by node ({}): {}",
                err.code, err.message
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::Execution(format!("{method}: empty response"))),
        }
    }

    async fn send_purchase(
        &self,
        order: &PurchaseOrder,
        credentials: &WalletCredentials,
    ) -> Result<String> {
        let signer = transaction::signer_for(credentials)?;
        let contract = transaction::parse_address(&order.asset.contract_address)?;
        let token_id = transaction::parse_token_id(&order.asset.token_id)?;

        let nonce_hex: String = self
            .rpc(
                "eth_getTransactionCount",
                json!([signer.address().to_string(), "pending"]),
            )
            .await?;
        let nonce = u64::try_from(parse_quantity(&nonce_hex)?)
            .map_err(|_| Error::Execution(format!("nonce out of range: {nonce_hex}")))?;

        let tx = TxLegacy {
            chain_id: Some(self.gas.chain_id),
            nonce,
            gas_price: self.gas_price_wei,
            gas_limit: self.gas.gas_limit,
            to: TxKind::Call(contract),
            value: transaction::eth_to_wei(order.price_eth)?,
            input: transaction::transfer_from_calldata(signer.address(), contract, token_id),
        };
        debug!(nonce, value_wei = %tx.value, "Signing purchase transaction");

        let raw = transaction::sign_legacy(&signer, tx)?;
        self.rpc("eth_sendRawTransaction", json!([hex::encode_prefixed(raw)]))
            .await
    }
}

#[async_trait]
impl TradeExecutor for EthereumExecutor {
    async fn submit_purchase(
        &self,
        order: &PurchaseOrder,
        credentials: &WalletCredentials,
    ) -> Result<TxReceipt> {
        info!(asset = %order.asset, price_eth = order.price_eth, "Submitting purchase transaction");

        let tx_hash = self
            .send_purchase(order, credentials)
            .await
            .map_err(|e| match e {
                Error::Execution(_) => e,
                other => Error::Execution(other.to_string()),
            })?;

        Ok(TxReceipt {
            order_id: order.id.clone(),
            tx_hash,
            asset: order.asset.clone(),
            price_eth: order.price_eth,
            mode: TradingMode::Live,
            submitted_at: Utc::now(),
        })
    }
}

/// JSON-RPC hex quantity (`0x1a`) to an integer.
fn parse_quantity(raw: &str) -> Result<u128> {
    let digits = raw.trim().trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| Error::Execution(format!("invalid hex quantity: '{raw}'")))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}
