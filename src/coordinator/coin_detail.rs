//! Single-coin detail panel

use crate::{
    adapter,
    client::MarketDataClient,
    coordinator::{state::Generation, LoadStatus},
    view::DetailViewModel,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Snapshot published by [`CoinDetailCoordinator`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoinDetailState {
    pub detail: Option<DetailViewModel>,
    pub status: LoadStatus,
    /// Last requested coin id, kept for retry
    pub coin_id: Option<String>,
}

/// Fetches one coin's detail on demand
pub struct CoinDetailCoordinator {
    client: Arc<MarketDataClient>,
    min_load_time: Duration,
    state: watch::Sender<CoinDetailState>,
    generation: Generation,
}

impl CoinDetailCoordinator {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self {
            client,
            min_load_time: Duration::ZERO,
            state: watch::Sender::new(CoinDetailState::default()),
            generation: Generation::default(),
        }
    }

    /// Pads successful loads so the loading state lasts at least `min`
    pub fn with_min_load_time(mut self, min: Duration) -> Self {
        self.min_load_time = min;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<CoinDetailState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CoinDetailState {
        self.state.borrow().clone()
    }

    /// Fetches detail for `id`
    pub async fn fetch(&self, id: &str) {
        let generation = self.generation.next();
        self.state.send_modify(|state| {
            state.status = LoadStatus::Loading;
            state.coin_id = Some(id.to_string());
        });

        let started = Instant::now();
        let result = self.client.detail(id).await;

        if result.is_ok() {
            let elapsed = started.elapsed();
            if elapsed < self.min_load_time {
                tokio::time::sleep(self.min_load_time - elapsed).await;
            }
        }

        if !self.generation.is_current(generation) {
            tracing::debug!(generation, id, "Discarding stale coin detail response");
            return;
        }

        match result {
            Ok(detail) => {
                let view = adapter::detail_view(&detail, self.client.vs_currency());
                self.state.send_modify(|state| {
                    state.detail = Some(view);
                    state.status = LoadStatus::Success;
                });
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Coin detail request failed");
                self.state.send_modify(|state| {
                    state.detail = None;
                    state.status = LoadStatus::Error(e.to_string());
                });
            }
        }
    }

    /// Fetches the last requested coin again
    ///
    /// # Returns
    /// False when no coin has been requested yet
    pub async fn retry(&self) -> bool {
        let id = self.state.borrow().coin_id.clone();
        match id {
            Some(id) => {
                self.fetch(&id).await;
                true
            }
            None => false,
        }
    }

    /// Resets to idle and drops any in-flight response
    pub fn clear(&self) {
        self.generation.next();
        self.state.send_replace(CoinDetailState::default());
    }
}
