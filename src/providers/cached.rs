//! Caching decorator for market data providers

use crate::{
    cache::{CacheKey, CachedResponse, ResponseCache},
    error::ProviderError,
    metrics::MetricsCollector,
    provider::MarketDataProvider,
    types::{CoinDetail, MarketCoin, MarketQuery, TrendingResponse},
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Provider that answers repeated requests from a [`ResponseCache`]
///
/// Only successful responses are stored. A fresh hit never reaches the
/// inner provider; a miss or stale entry goes to the inner provider and the
/// result overwrites whatever was cached under the same key.
pub struct CachedProvider {
    inner: Arc<dyn MarketDataProvider>,
    cache: Arc<ResponseCache>,
    metrics: Arc<MetricsCollector>,
}

impl CachedProvider {
    pub fn new(
        inner: Arc<dyn MarketDataProvider>,
        cache: Arc<ResponseCache>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            inner,
            cache,
            metrics,
        }
    }

    async fn lookup(&self, key: &CacheKey) -> Option<CachedResponse> {
        let hit = self.cache.get(key).await;
        self.metrics.record_cache(hit.is_some()).await;
        if hit.is_some() {
            tracing::debug!(key = %key, "Cache hit");
        } else {
            tracing::debug!(key = %key, "Cache miss");
        }
        hit
    }

    /// Awaits an inner call, recording its latency and outcome
    async fn timed<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let start = Instant::now();
        let result = call.await;
        self.metrics.record_live(start.elapsed(), result.is_ok()).await;
        result
    }
}

#[async_trait]
impl MarketDataProvider for CachedProvider {
    async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError> {
        let key = CacheKey::for_market(query);
        if let Some(CachedResponse::Markets(coins)) = self.lookup(&key).await {
            return Ok(coins);
        }

        let coins = self.timed(self.inner.list_market(query)).await?;
        self.cache
            .insert(key, CachedResponse::Markets(coins.clone()))
            .await;
        Ok(coins)
    }

    async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
        let key = CacheKey::for_trending();
        if let Some(CachedResponse::Trending(trending)) = self.lookup(&key).await {
            return Ok(trending);
        }

        let trending = self.timed(self.inner.trending()).await?;
        self.cache
            .insert(key, CachedResponse::Trending(trending.clone()))
            .await;
        Ok(trending)
    }

    async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        let key = CacheKey::for_detail(id);
        if let Some(CachedResponse::Detail(detail)) = self.lookup(&key).await {
            return Ok(detail);
        }

        let detail = self.timed(self.inner.detail(id)).await?;
        self.cache
            .insert(key, CachedResponse::Detail(detail.clone()))
            .await;
        Ok(detail)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use crate::types::SortOrder;
    use std::time::Duration;

    fn cached(mock: &Arc<MockProvider>) -> (CachedProvider, Arc<ResponseCache>) {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(30)));
        let provider = CachedProvider::new(
            mock.clone(),
            cache.clone(),
            Arc::new(MetricsCollector::new()),
        );
        (provider, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_calls_within_ttl_hit_network_once() {
        let mock = Arc::new(MockProvider::new());
        let (provider, _) = cached(&mock);
        let query = MarketQuery::new(SortOrder::PriceDesc, 10, 1);

        let first = provider.list_market(&query).await.unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;
        let second = provider.list_market(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.list_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_beyond_ttl_hit_network_twice() {
        let mock = Arc::new(MockProvider::new());
        let (provider, _) = cached(&mock);

        provider.trending().await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        provider.trending().await.unwrap();

        assert_eq!(mock.trending_calls(), 2);
    }

    #[tokio::test]
    async fn test_different_parameters_are_cached_separately() {
        let mock = Arc::new(MockProvider::new());
        let (provider, _) = cached(&mock);

        provider
            .list_market(&MarketQuery::new(SortOrder::PriceDesc, 10, 1))
            .await
            .unwrap();
        provider
            .list_market(&MarketQuery::new(SortOrder::PriceDesc, 10, 2))
            .await
            .unwrap();
        provider.detail("bitcoin").await.unwrap();
        provider.detail("bitcoin").await.unwrap();

        assert_eq!(mock.list_calls(), 2);
        assert_eq!(mock.detail_calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mock = Arc::new(MockProvider::failing());
        let (provider, cache) = cached(&mock);

        assert!(provider.trending().await.is_err());
        assert!(cache.is_empty().await);

        mock.set_failing(false);
        assert!(provider.trending().await.is_ok());
        assert_eq!(mock.trending_calls(), 2);
    }

    #[tokio::test]
    async fn test_clearing_the_cache_forces_a_refetch() {
        let mock = Arc::new(MockProvider::new());
        let (provider, cache) = cached(&mock);

        provider.detail("ethereum").await.unwrap();
        cache.clear().await;
        provider.detail("ethereum").await.unwrap();

        assert_eq!(mock.detail_calls(), 2);
    }
}
