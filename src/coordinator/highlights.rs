//! Highlight cards: gainers, losers, volume, trending, 7-day performers

use crate::{
    adapter,
    client::MarketDataClient,
    constants::{HIGHLIGHT_LIMIT, PERFORMANCE_UNIVERSE_SIZE},
    coordinator::{state::Generation, LoadStatus},
    types::{MarketCoin, MarketQuery, SortOrder},
    view::{HighlightItem, HighlightKind},
};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot published by [`HighlightsCoordinator`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighlightsState {
    pub gainers: Vec<HighlightItem>,
    pub losers: Vec<HighlightItem>,
    pub volume: Vec<HighlightItem>,
    pub trending: Vec<HighlightItem>,
    pub performance_7d: Vec<HighlightItem>,
    pub status: LoadStatus,
}

impl HighlightsState {
    /// Items of one card
    pub fn items(&self, kind: HighlightKind) -> &[HighlightItem] {
        match kind {
            HighlightKind::Gainers => &self.gainers,
            HighlightKind::Losers => &self.losers,
            HighlightKind::Volume => &self.volume,
            HighlightKind::Trending => &self.trending,
            HighlightKind::Performance7d => &self.performance_7d,
        }
    }

    fn clear_sets(&mut self) {
        self.gainers.clear();
        self.losers.clear();
        self.volume.clear();
        self.trending.clear();
        self.performance_7d.clear();
    }
}

/// Loads all five highlight sets as one batch
///
/// The five queries run concurrently and are published together. If any of
/// them fails the whole batch fails: every set is emptied and a single error
/// is stored for [`retry`](Self::retry).
pub struct HighlightsCoordinator {
    client: Arc<MarketDataClient>,
    state: watch::Sender<HighlightsState>,
    generation: Generation,
}

impl HighlightsCoordinator {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self {
            client,
            state: watch::Sender::new(HighlightsState::default()),
            generation: Generation::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HighlightsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> HighlightsState {
        self.state.borrow().clone()
    }

    /// Fetches all five sets
    pub async fn load(&self) {
        let generation = self.generation.next();
        self.state.send_modify(|state| state.status = LoadStatus::Loading);

        let currency = self.client.vs_currency();
        let top = |order| {
            MarketQuery::new(order, HIGHLIGHT_LIMIT as u32, 1)
                .with_currency(currency)
                .with_change_windows("24h")
        };
        let gainers = top(SortOrder::PercentChangeDesc);
        let losers = top(SortOrder::PercentChangeAsc);
        let volume = top(SortOrder::VolumeDesc);
        let universe = MarketQuery::new(SortOrder::MarketCapDesc, PERFORMANCE_UNIVERSE_SIZE, 1)
            .with_currency(currency)
            .with_change_windows("7d");

        let result = futures::try_join!(
            self.client.list_market(&gainers),
            self.client.list_market(&losers),
            self.client.list_market(&volume),
            self.client.trending(),
            self.client.list_market(&universe),
        );

        if !self.generation.is_current(generation) {
            tracing::debug!(generation, "Discarding stale highlights response");
            return;
        }

        match result {
            Ok((gainers, losers, volume, trending, universe)) => {
                let next = HighlightsState {
                    gainers: gainers.iter().map(adapter::market_highlight).collect(),
                    losers: losers.iter().map(adapter::market_highlight).collect(),
                    volume: volume.iter().map(adapter::market_highlight).collect(),
                    trending: trending
                        .coins
                        .iter()
                        .take(HIGHLIGHT_LIMIT)
                        .map(|coin| adapter::trending_highlight(&coin.item))
                        .collect(),
                    performance_7d: top_performers(&universe, HIGHLIGHT_LIMIT),
                    status: LoadStatus::Success,
                };
                self.state.send_replace(next);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Highlights request failed");
                self.state.send_modify(|state| {
                    state.clear_sets();
                    state.status = LoadStatus::Error(e.to_string());
                });
            }
        }
    }

    /// Re-issues all five queries
    pub async fn retry(&self) {
        self.load().await;
    }
}

/// Best 7-day performers, highest first
///
/// Coins without a usable 7-day change are skipped.
pub(crate) fn top_performers(coins: &[MarketCoin], limit: usize) -> Vec<HighlightItem> {
    let mut ranked: Vec<(f64, &MarketCoin)> = coins
        .iter()
        .filter_map(|coin| {
            coin.price_change_percentage_7d
                .filter(|change| !change.is_nan())
                .map(|change| (change, coin))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, coin)| adapter::performance_highlight(coin))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_over;
    use crate::provider::mock::MockProvider;
    use crate::providers::SyntheticProvider;

    #[tokio::test]
    async fn test_load_publishes_all_sets() {
        let live = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let coordinator = HighlightsCoordinator::new(client_over(&live, &fallback));

        coordinator.load().await;
        let state = coordinator.snapshot();

        assert_eq!(state.status, LoadStatus::Success);
        for kind in HighlightKind::all() {
            assert!(!state.items(*kind).is_empty(), "{} is empty", kind.title());
        }
        assert_eq!(state.gainers.len(), 10);
        assert_eq!(state.performance_7d.len(), 10);
        assert_eq!(state.trending.len(), 7);
        assert!(state
            .gainers
            .windows(2)
            .all(|pair| pair[0].price_change_percentage_24h >= pair[1].price_change_percentage_24h));
        assert!(state
            .losers
            .windows(2)
            .all(|pair| pair[0].price_change_percentage_24h <= pair[1].price_change_percentage_24h));
        assert_eq!(live.list_calls(), 4);
        assert_eq!(live.trending_calls(), 1);
    }

    #[tokio::test]
    async fn test_performers_sorted_by_seven_day_change() {
        let live = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let coordinator = HighlightsCoordinator::new(client_over(&live, &fallback));

        coordinator.load().await;
        let changes: Vec<f64> = coordinator
            .snapshot()
            .performance_7d
            .iter()
            .map(|item| item.price_change_percentage_7d.unwrap())
            .collect();

        assert!(changes.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[tokio::test]
    async fn test_one_failure_clears_every_set() {
        let live = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockProvider::new());
        let client = client_over(&live, &fallback);
        let coordinator = HighlightsCoordinator::new(client.clone());

        coordinator.load().await;
        assert_eq!(coordinator.snapshot().status, LoadStatus::Success);

        // Trending (the fourth query) fails live and in the fallback.
        client.clear_cache().await;
        live.set_trending_failing(true);
        fallback.set_trending_failing(true);
        coordinator.retry().await;

        let state = coordinator.snapshot();
        assert_eq!(
            state.status,
            LoadStatus::Error("HTTP error! status: 503".to_string())
        );
        for kind in HighlightKind::all() {
            assert!(state.items(*kind).is_empty());
        }

        fallback.set_trending_failing(false);
        coordinator.retry().await;
        assert_eq!(coordinator.snapshot().status, LoadStatus::Success);
        assert_eq!(coordinator.snapshot().trending.len(), 7);
    }

    #[test]
    fn test_top_performers_skips_missing_and_nan() {
        let synthetic = SyntheticProvider::instant();
        let mut coins: Vec<MarketCoin> = synthetic.universe().take(4).cloned().collect();
        coins[0].price_change_percentage_7d = None;
        coins[1].price_change_percentage_7d = Some(f64::NAN);
        coins[2].price_change_percentage_7d = Some(-3.0);
        coins[3].price_change_percentage_7d = Some(12.5);

        let top = top_performers(&coins, 10);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, coins[3].id);
        assert_eq!(top[0].price_change_percentage_7d, Some(12.5));
        assert_eq!(top[1].id, coins[2].id);
        assert!(top_performers(&coins, 1).len() == 1);
    }
}
