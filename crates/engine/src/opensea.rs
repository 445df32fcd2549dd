use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use common::{
    AssetDetails, AssetId, Error, MarketDataSource, PaymentToken, Result, SaleEvent,
};

/// REST client for the OpenSea asset API. Read-only; used for listing details
/// and sale history.
pub struct OpenSeaClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenSeaClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: crate::http_client(timeout)?,
        })
    }

    async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::DataUnavailable(format!("GET {path}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::DataUnavailable(format!("GET {path}: {e}")))?;

        if !status.is_success() {
            return Err(Error::DataUnavailable(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for OpenSeaClient {
    async fn asset_details(&self, asset: &AssetId) -> Result<AssetDetails> {
        let path = format!("/api/v1/asset/{}/{}/", asset.contract_address, asset.token_id);
        debug!(asset = %asset, "Fetching asset details from OpenSea");
        let body = self.get(&path).await?;
        parse_asset_details(&body)
    }

    async fn sale_history(&self, asset: &AssetId) -> Result<Vec<SaleEvent>> {
        let path = format!(
            "/api/v1/asset/{}/{}/events?event_type=successful",
            asset.contract_address, asset.token_id
        );
        debug!(asset = %asset, "Fetching sale events from OpenSea");
        let body = self.get(&path).await?;
        parse_sale_events(&body)
    }
}

// ─── Payload parsing ──────────────────────────────────────────────────────────

/// Accepts both `{"asset": {...}}` and a bare asset object.
fn parse_asset_details(body: &str) -> Result<AssetDetails> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::DataUnavailable(format!("malformed asset payload: {e}")))?;

    let record = match value.get("asset") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ if value.is_object() => value,
        _ => return Err(Error::DataUnavailable("asset payload is not an object".into())),
    };
    let record: AssetRecord = serde_json::from_value(record)
        .map_err(|e| Error::DataUnavailable(format!("unexpected asset structure: {e}")))?;

    let last_sale_price = record.last_sale.as_ref().and_then(|sale| {
        let token = sale.payment_token();
        let price = sale.price(&token)?;
        if token.is_ether() {
            Some(price)
        } else {
            debug!(symbol = %token.symbol, "Last sale not priced in ETH, ignoring");
            None
        }
    });

    Ok(AssetDetails {
        name: record.name,
        description: record.description.filter(|d| !d.trim().is_empty()),
        last_sale_price,
    })
}

/// Sale events oldest first. Events without a parseable price are dropped.
fn parse_sale_events(body: &str) -> Result<Vec<SaleEvent>> {
    let page: EventsPage = serde_json::from_str(body)
        .map_err(|e| Error::DataUnavailable(format!("malformed events payload: {e}")))?;

    let mut events: Vec<SaleEvent> = page
        .asset_events
        .iter()
        .filter_map(|record| {
            let payment_token = record.payment_token();
            let price = record.price(&payment_token)?;
            Some(SaleEvent {
                price,
                payment_token,
                timestamp: record.timestamp(),
            })
        })
        .collect();

    let dropped = page.asset_events.len() - events.len();
    if dropped > 0 {
        debug!(dropped, "Skipped events without a usable total_price");
    }

    // The API lists newest first.
    if events.iter().all(|e| e.timestamp.is_some()) {
        events.sort_by_key(|e| e.timestamp);
    } else {
        warn!("Some sale events lack timestamps, assuming newest-first order");
        events.reverse();
    }
    Ok(events)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AssetRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    last_sale: Option<SaleRecord>,
}

#[derive(Deserialize)]
struct EventsPage {
    #[serde(default)]
    asset_events: Vec<SaleRecord>,
}

#[derive(Deserialize)]
struct SaleRecord {
    /// Smallest-unit amount; OpenSea sends a decimal string, occasionally a number.
    #[serde(default)]
    total_price: Option<Value>,
    #[serde(default)]
    payment_token: Option<TokenRecord>,
    #[serde(default)]
    event_timestamp: Option<String>,
    #[serde(default)]
    created_date: Option<String>,
}

#[derive(Deserialize)]
struct TokenRecord {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    decimals: Option<u32>,
}

impl SaleRecord {
    /// Missing payment token means ETH, as on OpenSea's legacy listings.
    fn payment_token(&self) -> PaymentToken {
        let eth = PaymentToken::ether();
        match &self.payment_token {
            Some(token) => PaymentToken {
                symbol: token.symbol.clone().unwrap_or(eth.symbol),
                decimals: token.decimals.unwrap_or(eth.decimals),
            },
            None => eth,
        }
    }

    fn price(&self, token: &PaymentToken) -> Option<f64> {
        let raw = match self.total_price.as_ref()? {
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            Value::Number(n) => n.as_f64()?,
            _ => return None,
        };
        let price = raw / 10f64.powi(token.decimals as i32);
        (price.is_finite() && price > 0.0).then_some(price)
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.event_timestamp
            .as_deref()
            .or(self.created_date.as_deref())
            .and_then(parse_timestamp)
    }
}
