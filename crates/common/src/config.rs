use std::str::FromStr;

use crate::{is_hex_address, AssetId, Error, Result, TradeParameters, TradingMode, WalletCredentials};

const REQUIRED_VARS: [&str; 7] = [
    "OPENSEA_API_KEY",
    "ETH_NODE_URL",
    "WALLET_ADDRESS",
    "WALLET_PRIVATE_KEY",
    "NFT_CONTRACT_ADDRESS",
    "NFT_TOKEN_ID",
    "MAX_PRICE_ETH",
];

/// All configuration loaded from environment variables at startup.
/// Missing or malformed variables produce one `Error::Config` naming every problem.
#[derive(Clone)]
pub struct Config {
    // Marketplace
    pub opensea_api_key: String,
    pub opensea_base_url: String,

    // Ethereum node and wallet
    pub eth_node_url: String,
    pub wallet_address: String,
    pub wallet_private_key: String,
    pub chain_id: u64,
    pub gas_limit: u64,
    pub gas_price_gwei: f64,

    // Target
    pub asset: AssetId,
    pub max_price_eth: f64,

    // Sentiment (disabled without a token)
    pub sentiment_api_token: Option<String>,
    pub sentiment_model: String,
    pub sentiment_base_url: String,

    // Trading
    pub trading_mode: TradingMode,
    pub paper_balance_eth: f64,
    pub http_timeout_secs: u64,

    // Decision / forecaster tuning file
    pub trader_config_path: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required environment variable(s): {}. Check your .env file.",
                missing.join(", ")
            )));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let mut problems: Vec<String> = Vec::new();

        let wallet_address = required("WALLET_ADDRESS");
        if !is_hex_address(&wallet_address) {
            problems.push(format!("WALLET_ADDRESS is not a 0x-prefixed 20-byte address: '{wallet_address}'"));
        }

        let wallet_private_key = required("WALLET_PRIVATE_KEY");
        let key_hex = wallet_private_key.trim_start_matches("0x");
        if key_hex.len() != 64 || !key_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            problems.push("WALLET_PRIVATE_KEY must be 32 bytes of hex".to_string());
        }

        let asset = match AssetId::new(required("NFT_CONTRACT_ADDRESS"), required("NFT_TOKEN_ID")) {
            Ok(asset) => Some(asset),
            Err(e) => {
                problems.push(format!("NFT_CONTRACT_ADDRESS/NFT_TOKEN_ID: {e}"));
                None
            }
        };

        let max_price_eth = match required("MAX_PRICE_ETH").parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                problems.push(format!(
                    "MAX_PRICE_ETH must be a positive number, got '{}'",
                    required("MAX_PRICE_ETH")
                ));
                0.0
            }
        };

        let trading_mode = match get("TRADING_MODE").map(|v| v.to_lowercase()).as_deref() {
            None | Some("paper") => TradingMode::Paper,
            Some("live") => TradingMode::Live,
            Some(other) => {
                problems.push(format!("TRADING_MODE must be 'paper' or 'live', got: '{other}'"));
                TradingMode::Paper
            }
        };

        let chain_id = optional_parsed(&get, "CHAIN_ID", 1u64, &mut problems);
        let gas_limit = optional_parsed(&get, "GAS_LIMIT", 200_000u64, &mut problems);
        let gas_price_gwei = optional_parsed(&get, "GAS_PRICE_GWEI", 50.0f64, &mut problems);
        let paper_balance_eth = optional_parsed(&get, "PAPER_BALANCE_ETH", 10.0f64, &mut problems);
        let http_timeout_secs = optional_parsed(&get, "HTTP_TIMEOUT_SECS", 15u64, &mut problems);

        if !(gas_price_gwei.is_finite() && gas_price_gwei >= 0.0) {
            problems.push("GAS_PRICE_GWEI must be a non-negative number".to_string());
        }
        if http_timeout_secs == 0 {
            problems.push("HTTP_TIMEOUT_SECS must be at least 1".to_string());
        }
        if !(paper_balance_eth.is_finite() && paper_balance_eth >= 0.0) {
            problems.push("PAPER_BALANCE_ETH must be a non-negative number".to_string());
        }

        let asset = match (asset, problems.is_empty()) {
            (Some(asset), true) => asset,
            _ => return Err(Error::Config(problems.join("; "))),
        };

        Ok(Config {
            opensea_api_key: required("OPENSEA_API_KEY"),
            opensea_base_url: get("OPENSEA_BASE_URL")
                .unwrap_or_else(|| "https://api.opensea.io".to_string()),
            eth_node_url: required("ETH_NODE_URL"),
            wallet_address,
            wallet_private_key,
            chain_id,
            gas_limit,
            gas_price_gwei,
            asset,
            max_price_eth,
            sentiment_api_token: get("SENTIMENT_API_TOKEN"),
            sentiment_model: get("SENTIMENT_MODEL").unwrap_or_else(|| {
                "distilbert-base-uncased-finetuned-sst-2-english".to_string()
            }),
            sentiment_base_url: get("SENTIMENT_BASE_URL")
                .unwrap_or_else(|| "https://api-inference.huggingface.co".to_string()),
            trading_mode,
            paper_balance_eth,
            http_timeout_secs,
            trader_config_path: get("TRADER_CONFIG_PATH"),
        })
    }

    pub fn credentials(&self) -> WalletCredentials {
        WalletCredentials {
            address: self.wallet_address.clone(),
            private_key: self.wallet_private_key.clone(),
        }
    }

    pub fn trade_parameters(&self) -> TradeParameters {
        TradeParameters {
            asset: self.asset.clone(),
            max_price_eth: self.max_price_eth,
            credentials: self.credentials(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("opensea_base_url", &self.opensea_base_url)
            .field("eth_node_url", &self.eth_node_url)
            .field("wallet_address", &self.wallet_address)
            .field("chain_id", &self.chain_id)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price_gwei", &self.gas_price_gwei)
            .field("asset", &self.asset)
            .field("max_price_eth", &self.max_price_eth)
            .field("sentiment_enabled", &self.sentiment_api_token.is_some())
            .field("sentiment_model", &self.sentiment_model)
            .field("trading_mode", &self.trading_mode)
            .field("paper_balance_eth", &self.paper_balance_eth)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("trader_config_path", &self.trader_config_path)
            .finish_non_exhaustive()
    }
}

fn optional_parsed<T, G>(get: &G, key: &str, default: T, problems: &mut Vec<String>) -> T
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            problems.push(format!("{key} has an invalid value: '{raw}'"));
            default
        }),
    }
}
