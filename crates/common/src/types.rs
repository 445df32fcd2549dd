use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An NFT on an ERC-721 contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetId {
    /// `0x`-prefixed, 40 hex digits.
    pub contract_address: String,
    /// Unsigned decimal, up to 256 bits. Kept as text: token ids routinely exceed `u64`.
    pub token_id: String,
}

impl AssetId {
    pub fn new(contract_address: impl Into<String>, token_id: impl Into<String>) -> Result<Self> {
        let contract_address = contract_address.into().trim().to_string();
        let token_id = token_id.into().trim().to_string();

        if !is_hex_address(&contract_address) {
            return Err(Error::Config(format!(
                "contract address must be 0x followed by 40 hex digits, got '{contract_address}'"
            )));
        }
        if token_id.is_empty() || !token_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Config(format!(
                "token id must be an unsigned decimal integer, got '{token_id}'"
            )));
        }
        if !fits_u256(&token_id) {
            return Err(Error::Config(format!(
                "token id does not fit in 256 bits: '{token_id}'"
            )));
        }

        Ok(Self {
            contract_address,
            token_id,
        })
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.contract_address, self.token_id)
    }
}

/// 2^256 - 1 in decimal.
const U256_MAX_DECIMAL: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// Whether an all-digit decimal string is at most `2^256 - 1`.
fn fits_u256(digits: &str) -> bool {
    let significant = digits.trim_start_matches('0');
    match significant.len().cmp(&U256_MAX_DECIMAL.len()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Equal => significant <= U256_MAX_DECIMAL,
        std::cmp::Ordering::Greater => false,
    }
}

/// True for `0x` followed by exactly 40 hex digits (checksum casing is not verified).
pub fn is_hex_address(s: &str) -> bool {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Currency a sale was settled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    pub symbol: String,
    pub decimals: u32,
}

impl PaymentToken {
    pub fn ether() -> Self {
        Self {
            symbol: "ETH".into(),
            decimals: 18,
        }
    }

    /// ETH and WETH prices are directly comparable with an ETH ceiling.
    pub fn is_ether(&self) -> bool {
        matches!(self.symbol.to_uppercase().as_str(), "ETH" | "WETH")
    }
}

/// One historical sale of an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleEvent {
    /// Sale price in units of `payment_token` (already scaled by its decimals).
    pub price: f64,
    pub payment_token: PaymentToken,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Listing details. Every field may be missing upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetDetails {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Price of the most recent sale, in ETH.
    pub last_sale_price: Option<f64>,
}

/// Chronological ETH price series of one asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory(Vec<f64>);

impl PriceHistory {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    /// Keep ETH-denominated sales with a finite positive price, preserving order.
    pub fn from_sales(sales: &[SaleEvent]) -> Self {
        Self(
            sales
                .iter()
                .filter(|s| s.payment_token.is_ether())
                .map(|s| s.price)
                .filter(|p| p.is_finite() && *p > 0.0)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Categorical sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Parse the label names classification models commonly emit.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "pos" => Some(SentimentLabel::Positive),
            "negative" | "neg" => Some(SentimentLabel::Negative),
            "neutral" | "neu" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
            SentimentLabel::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Sentiment of an asset description: a label with its confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentSignal {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, confidence }
    }

    /// Build from a continuous polarity in [-1, 1]; the sign picks the label.
    pub fn from_polarity(polarity: f64) -> Self {
        let p = if polarity.is_finite() {
            polarity.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let label = if p > 0.0 {
            SentimentLabel::Positive
        } else if p < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self {
            label,
            confidence: p.abs(),
        }
    }

    /// Signed polarity in [-1, 1].
    pub fn polarity(&self) -> f64 {
        match self.label {
            SentimentLabel::Positive => self.confidence,
            SentimentLabel::Negative => -self.confidence,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

impl std::fmt::Display for SentimentSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.label, self.confidence)
    }
}

/// Whether purchases go to the real chain or are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Live,
    Paper,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Live => write!(f, "live"),
            TradingMode::Paper => write!(f, "paper"),
        }
    }
}

/// A purchase approved by the decision engine, handed to a `TradeExecutor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub asset: AssetId,
    /// ETH amount sent with the transaction.
    pub price_eth: f64,
}

impl PurchaseOrder {
    pub fn new(asset: AssetId, price_eth: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset,
            price_eth,
        }
    }
}

/// Confirmation that a purchase transaction was accepted for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    pub order_id: String,
    pub tx_hash: String,
    pub asset: AssetId,
    pub price_eth: f64,
    pub mode: TradingMode,
    pub submitted_at: DateTime<Utc>,
}

/// Why the decision engine declined a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclineReason {
    ForecastUnavailable,
    NegativeSentiment,
    PriceAboveCeiling,
    ListedPriceUnavailable,
    SentimentNotPositive,
}

impl std::fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclineReason::ForecastUnavailable => write!(f, "forecast unavailable"),
            DeclineReason::NegativeSentiment => write!(f, "negative sentiment"),
            DeclineReason::PriceAboveCeiling => write!(f, "price above ceiling"),
            DeclineReason::ListedPriceUnavailable => write!(f, "listed price unavailable"),
            DeclineReason::SentimentNotPositive => write!(f, "sentiment not positive"),
        }
    }
}

/// Outcome of one decision engine evaluation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TradeDecision {
    Attempt {
        /// Price the purchase will be submitted at.
        expected_price: f64,
    },
    Decline {
        reason: DeclineReason,
        /// Forecast seen by the engine, if there was one.
        forecast: Option<f64>,
    },
}

impl TradeDecision {
    pub fn should_trade(&self) -> bool {
        matches!(self, TradeDecision::Attempt { .. })
    }

    pub fn expected_price(&self) -> Option<f64> {
        match self {
            TradeDecision::Attempt { expected_price } => Some(*expected_price),
            TradeDecision::Decline { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<DeclineReason> {
        match self {
            TradeDecision::Attempt { .. } => None,
            TradeDecision::Decline { reason, .. } => Some(*reason),
        }
    }
}

/// Wallet used to pay for purchases. `Debug` never prints the key.
#[derive(Clone)]
pub struct WalletCredentials {
    pub address: String,
    pub private_key: String,
}

impl std::fmt::Debug for WalletCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletCredentials")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Inputs of one invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct TradeParameters {
    pub asset: AssetId,
    /// Ceiling, in ETH.
    pub max_price_eth: f64,
    pub credentials: WalletCredentials,
}

/// Final result of one run of the trader pipeline.
#[derive(Debug, Clone)]
pub enum TradeOutcome {
    Purchased(TxReceipt),
    Declined(TradeDecision),
    PurchaseFailed { error: String },
}

impl std::fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeOutcome::Purchased(receipt) => write!(
                f,
                "purchased {} at {} ETH (tx {})",
                receipt.asset, receipt.price_eth, receipt.tx_hash
            ),
            TradeOutcome::Declined(decision) => match decision.reason() {
                Some(reason) => write!(f, "declined: {reason}"),
                None => write!(f, "declined"),
            },
            TradeOutcome::PurchaseFailed { error } => write!(f, "purchase failed: {error}"),
        }
    }
}
