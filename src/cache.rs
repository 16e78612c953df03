//! Time-boxed in-memory response cache
//!
//! Entries are keyed by request signature (endpoint plus sorted query
//! parameters) and are only ever dropped by [`ResponseCache::clear`].
//! Staleness is checked at read time: an entry older than the TTL is
//! treated as absent but left in place until overwritten.

use crate::{
    constants::{COINGECKO_TRENDING_ENDPOINT, DETAIL_QUERY_FLAGS},
    types::{coin_endpoint, CoinDetail, MarketCoin, MarketQuery, TrendingResponse},
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Request signature used as cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from an endpoint and its parameters, ordered by name
    pub fn new<K: AsRef<str>, V: AsRef<str>>(endpoint: &str, params: &[(K, V)]) -> Self {
        let sorted: BTreeMap<&str, &str> = params
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();

        if sorted.is_empty() {
            return Self(endpoint.to_string());
        }

        let query = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        Self(format!("{}?{}", endpoint, query))
    }

    pub fn for_market(query: &MarketQuery) -> Self {
        Self::new(query.endpoint(), &query.params())
    }

    pub fn for_trending() -> Self {
        Self::new::<&str, &str>(COINGECKO_TRENDING_ENDPOINT, &[])
    }

    pub fn for_detail(id: &str) -> Self {
        Self::new(&coin_endpoint(id), DETAIL_QUERY_FLAGS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached upstream payload
#[derive(Debug, Clone)]
pub enum CachedResponse {
    Markets(Vec<MarketCoin>),
    Trending(TrendingResponse),
    Detail(CoinDetail),
}

#[derive(Debug)]
struct CacheEntry {
    payload: CachedResponse,
    stored_at: Instant,
}

/// In-memory response cache with a fixed time-to-live
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the payload stored under `key` if it is younger than the TTL
    pub async fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.stored_at.elapsed() >= self.ttl {
            tracing::debug!(key = %key, "Cache entry expired");
            return None;
        }

        Some(entry.payload.clone())
    }

    /// Stores a payload, overwriting any previous entry for the key
    pub async fn insert(&self, key: CacheKey, payload: CachedResponse) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "Cleared response cache");
    }

    /// Number of stored entries, fresh or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
