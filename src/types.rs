//! Upstream market data shapes and query types
//!
//! These mirror the CoinGecko JSON payloads closely. Numeric fields the API
//! may send as `null` are made tolerant here so a single odd coin does not
//! fail a whole page.

use crate::constants::{
    COINGECKO_COIN_ENDPOINT, COINGECKO_MARKETS_ENDPOINT, DEFAULT_CHANGE_WINDOWS,
    DEFAULT_PAGE_SIZE, DEFAULT_VS_CURRENCY,
};
use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Price values keyed by display currency (`usd`, `eur`, ...)
pub type CurrencyMap = BTreeMap<String, f64>;

/// Supported coin list orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Largest market cap first
    #[default]
    MarketCapDesc,
    /// Smallest market cap first
    MarketCapAsc,
    /// Most expensive first
    PriceDesc,
    /// Cheapest first
    PriceAsc,
    /// Best 24h percentage change first
    PercentChangeDesc,
    /// Worst 24h percentage change first
    PercentChangeAsc,
    /// Highest 24h volume first
    VolumeDesc,
    /// Lowest 24h volume first
    VolumeAsc,
}

impl SortOrder {
    /// Upstream query value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PercentChangeDesc => "percent_change_desc",
            SortOrder::PercentChangeAsc => "percent_change_asc",
            SortOrder::VolumeDesc => "volume_desc",
            SortOrder::VolumeAsc => "volume_asc",
        }
    }

    /// Get all supported orders
    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::MarketCapDesc,
            SortOrder::MarketCapAsc,
            SortOrder::PriceDesc,
            SortOrder::PriceAsc,
            SortOrder::PercentChangeDesc,
            SortOrder::PercentChangeAsc,
            SortOrder::VolumeDesc,
            SortOrder::VolumeAsc,
        ]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::all()
            .iter()
            .copied()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| ProviderError::invalid_request(format!("unknown sort order: {}", s)))
    }
}

/// Parameters of a `/coins/markets` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    /// Display currency
    pub vs_currency: String,
    /// Upstream ordering
    pub order: SortOrder,
    /// Page size, must be positive
    pub per_page: u32,
    /// 1-based page number, must be positive
    pub page: u32,
    /// Whether to request 7d sparkline data
    pub sparkline: bool,
    /// Comma separated change windows (`24h,7d`)
    pub price_change_percentage: String,
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self {
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            order: SortOrder::default(),
            per_page: DEFAULT_PAGE_SIZE,
            page: 1,
            sparkline: false,
            price_change_percentage: DEFAULT_CHANGE_WINDOWS.to_string(),
        }
    }
}

impl MarketQuery {
    /// Creates a query for one page in the given order
    pub fn new(order: SortOrder, per_page: u32, page: u32) -> Self {
        Self {
            order,
            per_page,
            page,
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, vs_currency: impl Into<String>) -> Self {
        self.vs_currency = vs_currency.into();
        self
    }

    pub fn with_sparkline(mut self, sparkline: bool) -> Self {
        self.sparkline = sparkline;
        self
    }

    pub fn with_change_windows(mut self, windows: impl Into<String>) -> Self {
        self.price_change_percentage = windows.into();
        self
    }

    /// Rejects zero page sizes and page numbers
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.per_page == 0 {
            return Err(ProviderError::invalid_request("per_page must be positive"));
        }
        if self.page == 0 {
            return Err(ProviderError::invalid_request("page must be positive"));
        }
        Ok(())
    }

    /// Endpoint path for this query
    pub fn endpoint(&self) -> &'static str {
        COINGECKO_MARKETS_ENDPOINT
    }

    /// Stringified query parameters, as sent upstream
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", self.order.as_str().to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", self.sparkline.to_string()),
            ("price_change_percentage", self.price_change_percentage.clone()),
        ]
    }
}

/// Characters left as-is in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Detail endpoint path for a coin id
///
/// The id is percent-encoded as a single segment, so `/`, `?` or `#` in it
/// cannot change the request path.
pub fn coin_endpoint(id: &str) -> String {
    format!(
        "{}/{}",
        COINGECKO_COIN_ENDPOINT,
        utf8_percent_encode(id, PATH_SEGMENT)
    )
}

/// Market snapshot of one coin from `/coins/markets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub total_volume: f64,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, alias = "price_change_percentage_7d_in_currency")]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub atl: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Response of `/search/trending`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingCoin>,
    #[serde(default)]
    pub nfts: Vec<serde_json::Value>,
    #[serde(default)]
    pub categories: Vec<serde_json::Value>,
}

/// Wrapper object around each trending entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub item: TrendingEntry,
}

/// A currently trending coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    #[serde(default)]
    pub coin_id: Option<u64>,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Price relative to BTC
    #[serde(default)]
    pub price_btc: Option<f64>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub data: Option<TrendingData>,
}

/// Optional market block attached to newer trending payloads
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendingData {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
}

/// Deep record of one coin from `/coins/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: CoinDescription,
    #[serde(default)]
    pub image: CoinImage,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: DetailMarketData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoinDescription {
    #[serde(default, deserialize_with = "nullable_string")]
    pub en: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

/// Market block of a coin detail, keyed by display currency
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailMarketData {
    #[serde(default, deserialize_with = "currency_map")]
    pub current_price: CurrencyMap,
    #[serde(default, deserialize_with = "currency_map")]
    pub market_cap: CurrencyMap,
    #[serde(default, deserialize_with = "currency_map")]
    pub total_volume: CurrencyMap,
    #[serde(default, deserialize_with = "currency_map")]
    pub high_24h: CurrencyMap,
    #[serde(default, deserialize_with = "currency_map")]
    pub low_24h: CurrencyMap,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Serving live upstream data
    Healthy,
    /// Serving synthetic fallback data
    Degraded,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

// Trending prices have shipped both as numbers and as "$1,234.56" strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) => Some(value),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .ok(),
        None => None,
    })
}

fn currency_map<'de, D>(deserializer: D) -> Result<CurrencyMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(currency, value)| value.map(|v| (currency, v)))
        .collect())
}
