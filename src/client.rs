//! Market Data Client
//!
//! Facade over the provider stack used by the coordinators:
//!
//! ```text
//! MarketDataClient
//!     ↓
//! FallbackProvider ── degraded ──→ SyntheticProvider
//!     ↓ live
//! CachedProvider (ResponseCache, 30s TTL)
//!     ↓ miss
//! CoinGeckoProvider
//! ```
//!
//! Build one instance at startup and share it through an `Arc`.

use crate::{
    cache::ResponseCache,
    config::{ClientConfig, DataMode},
    error::ProviderError,
    metrics::{ClientMetrics, MetricsCollector},
    provider::MarketDataProvider,
    providers::{CachedProvider, CoinGeckoProvider, FallbackProvider, SyntheticProvider},
    types::{CoinDetail, ComponentHealth, HealthStatus, MarketCoin, MarketQuery, TrendingResponse},
};
use std::sync::Arc;

/// Cached, self-degrading market data client
///
/// # Example
/// ```no_run
/// use market_dashboard_sdk::{MarketDataClient, MarketQuery, SortOrder};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let client = MarketDataClient::from_env()?;
/// let coins = client
///     .list_market(&MarketQuery::new(SortOrder::VolumeDesc, 10, 1))
///     .await?;
/// for coin in coins {
///     println!("{}: ${:.2}", coin.symbol, coin.current_price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataClient {
    provider: FallbackProvider,
    cache: Arc<ResponseCache>,
    metrics: Arc<MetricsCollector>,
    vs_currency: String,
}

impl MarketDataClient {
    /// Creates a client from environment configuration
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(&config)?)
    }

    /// Creates a client talking to CoinGecko with the synthetic fallback
    pub fn new(config: &ClientConfig) -> Result<Self, ProviderError> {
        let live = Arc::new(CoinGeckoProvider::new(config)?);
        Ok(Self::with_providers(
            config,
            live,
            Arc::new(SyntheticProvider::new().with_currency(config.vs_currency.clone())),
        ))
    }

    /// Creates a client with custom live and fallback providers
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_providers(
        config: &ClientConfig,
        live: Arc<dyn MarketDataProvider>,
        fallback: Arc<dyn MarketDataProvider>,
    ) -> Self {
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));
        let metrics = Arc::new(MetricsCollector::new());
        let cached: Arc<dyn MarketDataProvider> =
            Arc::new(CachedProvider::new(live, cache.clone(), metrics.clone()));

        let provider = match config.mode {
            DataMode::Live => FallbackProvider::new(cached, fallback, metrics.clone()),
            DataMode::Synthetic => FallbackProvider::degraded(cached, fallback, metrics.clone()),
        };

        tracing::info!(
            base_url = %config.base_url,
            api_key = config.api_key.is_some(),
            mode = ?config.mode,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            "Market data client ready"
        );

        Self {
            provider,
            cache,
            metrics,
            vs_currency: config.vs_currency.clone(),
        }
    }

    /// Fetches one page of coins
    ///
    /// # Returns
    /// At most `query.per_page` coins; `InvalidRequest` for a zero page size
    /// or page number. Live failures are answered from synthetic data.
    pub async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError> {
        query.validate()?;
        self.provider.list_market(query).await
    }

    /// Fetches the trending list
    pub async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
        self.provider.trending().await
    }

    /// Fetches one coin's detail
    ///
    /// # Returns
    /// `NotFound` when neither the live API nor the fallback know the id
    pub async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        self.provider.detail(id).await
    }

    /// Drops every cached response
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// True once the client serves synthetic data
    pub fn is_degraded(&self) -> bool {
        self.provider.is_degraded()
    }

    /// Name of the provider currently answering
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Display currency the coordinators should request
    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    /// Gets request, cache and fallback metrics
    pub async fn metrics(&self) -> ClientMetrics {
        self.metrics.snapshot().await
    }

    /// Perform a health check on the client
    ///
    /// # Returns
    /// `Healthy` while serving live data, `Degraded` once synthetic
    pub async fn health_check(&self) -> ComponentHealth {
        let metrics = self.metrics().await;
        let mut details = std::collections::HashMap::new();

        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.provider_name()),
        );
        details.insert(
            "cache_entries".to_string(),
            serde_json::json!(self.cache.len().await),
        );
        details.insert(
            "cache_ttl_secs".to_string(),
            serde_json::json!(self.cache.ttl().as_secs()),
        );
        details.insert(
            "live_requests".to_string(),
            serde_json::json!(metrics.live_requests),
        );
        details.insert(
            "live_failures".to_string(),
            serde_json::json!(metrics.live_failures),
        );
        details.insert(
            "fallback_responses".to_string(),
            serde_json::json!(metrics.fallback_responses),
        );
        details.insert(
            "latency_p50_ms".to_string(),
            serde_json::json!(metrics.latency_p50_ms),
        );

        let (status, message) = if self.is_degraded() {
            (
                HealthStatus::Degraded,
                "Serving synthetic market data; live API unavailable".to_string(),
            )
        } else {
            (
                HealthStatus::Healthy,
                "Serving live market data".to_string(),
            )
        };

        ComponentHealth {
            name: "market_data_client".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: chrono::Utc::now(),
        }
    }
}
