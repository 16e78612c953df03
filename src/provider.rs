//! Provider abstraction for market data sources

use crate::{
    error::ProviderError,
    types::{CoinDetail, MarketCoin, MarketQuery, TrendingResponse},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implemented by the live CoinGecko provider, the synthetic generator and
/// the decorators layered on top of them (cache, fallback).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of coins in the requested order
    ///
    /// # Arguments
    /// * `query` - Currency, order, page size/number and change windows
    async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError>;

    /// Fetches the global trending list
    async fn trending(&self) -> Result<TrendingResponse, ProviderError>;

    /// Fetches the deep record of a single coin
    ///
    /// # Returns
    /// The coin detail, or `ProviderError::NotFound` if the id is unknown
    async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::providers::SyntheticProvider;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock provider for testing
    ///
    /// Answers from an instant synthetic universe and counts calls per kind.
    /// Each kind can be switched to fail with an HTTP 503.
    pub struct MockProvider {
        data: SyntheticProvider,
        list_calls: AtomicUsize,
        trending_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        fail_list: AtomicBool,
        fail_trending: AtomicBool,
        fail_detail: AtomicBool,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                data: SyntheticProvider::instant(),
                list_calls: AtomicUsize::new(0),
                trending_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                fail_list: AtomicBool::new(false),
                fail_trending: AtomicBool::new(false),
                fail_detail: AtomicBool::new(false),
            }
        }

        /// A mock whose every call fails
        pub fn failing() -> Self {
            let mock = Self::new();
            mock.set_failing(true);
            mock
        }

        pub fn set_failing(&self, failing: bool) {
            self.fail_list.store(failing, Ordering::SeqCst);
            self.fail_trending.store(failing, Ordering::SeqCst);
            self.fail_detail.store(failing, Ordering::SeqCst);
        }

        pub fn set_list_failing(&self, failing: bool) {
            self.fail_list.store(failing, Ordering::SeqCst);
        }

        pub fn set_trending_failing(&self, failing: bool) {
            self.fail_trending.store(failing, Ordering::SeqCst);
        }

        pub fn set_detail_failing(&self, failing: bool) {
            self.fail_detail.store(failing, Ordering::SeqCst);
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub fn trending_calls(&self) -> usize {
            self.trending_calls.load(Ordering::SeqCst)
        }

        pub fn detail_calls(&self) -> usize {
            self.detail_calls.load(Ordering::SeqCst)
        }

        pub fn call_count(&self) -> usize {
            self.list_calls() + self.trending_calls() + self.detail_calls()
        }

        fn outage(flag: &AtomicBool) -> Result<(), ProviderError> {
            if flag.load(Ordering::SeqCst) {
                Err(ProviderError::HttpStatus { status: 503 })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn list_market(
            &self,
            query: &MarketQuery,
        ) -> Result<Vec<MarketCoin>, ProviderError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Self::outage(&self.fail_list)?;
            self.data.list_market(query).await
        }

        async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
            self.trending_calls.fetch_add(1, Ordering::SeqCst);
            Self::outage(&self.fail_trending)?;
            self.data.trending().await
        }

        async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Self::outage(&self.fail_detail)?;
            self.data.detail(id).await
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
