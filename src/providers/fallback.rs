//! Latching fallback provider implementation

use crate::{
    error::ProviderError,
    metrics::MetricsCollector,
    provider::MarketDataProvider,
    types::{CoinDetail, MarketCoin, MarketQuery, TrendingResponse},
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Provider that switches to a fallback for good after the primary fails
///
/// The first failed primary call of any kind sets the shared `degraded`
/// latch and is answered by the fallback. From then on every call of every
/// kind goes straight to the fallback; the primary is never retried.
pub struct FallbackProvider {
    primary: Arc<dyn MarketDataProvider>,
    fallback: Arc<dyn MarketDataProvider>,
    degraded: AtomicBool,
    metrics: Arc<MetricsCollector>,
}

impl FallbackProvider {
    /// Creates a new fallback provider
    pub fn new(
        primary: Arc<dyn MarketDataProvider>,
        fallback: Arc<dyn MarketDataProvider>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            primary,
            fallback,
            degraded: AtomicBool::new(false),
            metrics,
        }
    }

    /// Creates a provider that starts out degraded
    pub fn degraded(
        primary: Arc<dyn MarketDataProvider>,
        fallback: Arc<dyn MarketDataProvider>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        let provider = Self::new(primary, fallback, metrics);
        provider.degraded.store(true, Ordering::SeqCst);
        provider
    }

    /// True once any primary call has failed
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Runs `primary` unless degraded, latching on failure; `fallback` otherwise
    async fn dispatch<T, P, PF, F, FF>(
        &self,
        operation: &'static str,
        primary: P,
        fallback: F,
    ) -> Result<T, ProviderError>
    where
        P: FnOnce() -> PF,
        PF: Future<Output = Result<T, ProviderError>>,
        F: FnOnce() -> FF,
        FF: Future<Output = Result<T, ProviderError>>,
    {
        if !self.is_degraded() {
            match primary().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        provider = self.primary.provider_name(),
                        operation,
                        error = %e,
                        "Live request failed, falling back"
                    );
                    if !self.degraded.swap(true, Ordering::SeqCst) {
                        tracing::warn!(
                            fallback = self.fallback.provider_name(),
                            "Switching to fallback data for the rest of the session"
                        );
                    }
                }
            }
        }

        self.metrics.record_fallback().await;
        fallback().await
    }
}

#[async_trait]
impl MarketDataProvider for FallbackProvider {
    async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError> {
        self.dispatch(
            "list_market",
            || self.primary.list_market(query),
            || self.fallback.list_market(query),
        )
        .await
    }

    async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
        self.dispatch(
            "trending",
            || self.primary.trending(),
            || self.fallback.trending(),
        )
        .await
    }

    async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        self.dispatch(
            "detail",
            || self.primary.detail(id),
            || self.fallback.detail(id),
        )
        .await
    }

    fn provider_name(&self) -> &'static str {
        if self.is_degraded() {
            self.fallback.provider_name()
        } else {
            self.primary.provider_name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use crate::types::SortOrder;

    fn fallback_over(
        primary: &Arc<MockProvider>,
        fallback: &Arc<MockProvider>,
    ) -> FallbackProvider {
        FallbackProvider::new(
            primary.clone(),
            fallback.clone(),
            Arc::new(MetricsCollector::new()),
        )
    }

    #[tokio::test]
    async fn test_healthy_primary_is_used() {
        let primary = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let provider = fallback_over(&primary, &fallback);

        provider.list_market(&MarketQuery::default()).await.unwrap();
        provider.trending().await.unwrap();

        assert!(!provider.is_degraded());
        assert_eq!(primary.call_count(), 2);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_failure_latches_for_every_kind() {
        let primary = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let provider = fallback_over(&primary, &fallback);

        primary.set_detail_failing(true);
        let detail = provider.detail("bitcoin").await.unwrap();
        assert_eq!(detail.id, "bitcoin");
        assert!(provider.is_degraded());
        assert_eq!(provider.provider_name(), "mock");

        // Primary is healthy again but never consulted.
        primary.set_failing(false);
        provider
            .list_market(&MarketQuery::new(SortOrder::VolumeAsc, 5, 3))
            .await
            .unwrap();
        provider.trending().await.unwrap();
        provider.detail("solana").await.unwrap();

        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.list_calls(), 1);
        assert_eq!(fallback.trending_calls(), 1);
        assert_eq!(fallback.detail_calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_errors_propagate() {
        let primary = Arc::new(MockProvider::failing());
        let fallback = Arc::new(MockProvider::new());
        let provider = fallback_over(&primary, &fallback);

        let err = provider.detail("not-a-real-coin").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_starting_degraded_skips_primary() {
        let primary = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let provider = FallbackProvider::degraded(
            primary.clone(),
            fallback.clone(),
            Arc::new(MetricsCollector::new()),
        );

        provider.trending().await.unwrap();
        assert_eq!(primary.call_count(), 0);
        assert_eq!(fallback.call_count(), 1);
    }
}
