//! Display-ready projections of upstream records
//!
//! View models are derived and disposable: they are rebuilt from the latest
//! fetch every time and carry no identity of their own. Symbols are always
//! upper-cased and missing numeric fields are already defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the coin table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    /// 0 when the upstream rank is unknown
    pub market_cap_rank: u32,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ListItem {
    /// Case-insensitive substring match over name and symbol
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.symbol.to_lowercase().contains(&term)
    }
}

/// One entry of a highlight card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: Option<f64>,
    pub volume_24h: Option<f64>,
    pub market_cap_rank: Option<u32>,
}

/// Curated highlight lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Gainers,
    Losers,
    Volume,
    Trending,
    Performance7d,
}

impl HighlightKind {
    /// Card title
    pub fn title(&self) -> &'static str {
        match self {
            HighlightKind::Gainers => "Top Gainers (24h)",
            HighlightKind::Losers => "Top Losers (24h)",
            HighlightKind::Volume => "Highest Volume (24h)",
            HighlightKind::Trending => "Trending",
            HighlightKind::Performance7d => "Top Performers (7d)",
        }
    }

    pub fn all() -> &'static [HighlightKind] {
        &[
            HighlightKind::Gainers,
            HighlightKind::Losers,
            HighlightKind::Volume,
            HighlightKind::Trending,
            HighlightKind::Performance7d,
        ]
    }
}

/// Detail panel contents for one coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailViewModel {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub market_cap_rank: u32,
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: f64,
    pub price_change_percentage_30d: f64,
}
