//! Paginated, sortable coin table

use crate::{
    adapter,
    client::MarketDataClient,
    constants::{DEFAULT_PAGE_SIZE, SEARCH_DEBOUNCE_MS},
    coordinator::{debounce::Debouncer, state::Generation, LoadStatus},
    types::{MarketQuery, SortOrder},
    view::ListItem,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Snapshot published by [`CoinListCoordinator`]
#[derive(Debug, Clone, PartialEq)]
pub struct CoinListState {
    /// Every row fetched so far, in server order
    pub items: Vec<ListItem>,
    pub status: LoadStatus,
    /// Last page applied to `items`, 0 before the first load
    pub page: u32,
    /// False once a page came back shorter than the page size, or after a
    /// failed reload
    pub has_more: bool,
    pub sort: SortOrder,
    /// Debounced filter term
    pub search_term: String,
}

impl Default for CoinListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            page: 0,
            has_more: true,
            sort: SortOrder::default(),
            search_term: String::new(),
        }
    }
}

impl CoinListState {
    /// Rows matching the current search term
    pub fn visible_items(&self) -> Vec<ListItem> {
        self.items
            .iter()
            .filter(|item| item.matches(&self.search_term))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageRequest {
    sort: SortOrder,
    page: u32,
    append: bool,
}

/// Drives the coin table: first page, sort changes, "load more" and search
///
/// State is published through a `watch` channel. Every request takes a new
/// generation and only the latest one may write its result, so a slow
/// response for an old sort order can never overwrite a newer one.
pub struct CoinListCoordinator {
    client: Arc<MarketDataClient>,
    page_size: u32,
    state: Arc<watch::Sender<CoinListState>>,
    generation: Generation,
    last_request: Mutex<Option<PageRequest>>,
    search: Debouncer,
}

impl CoinListCoordinator {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            state: Arc::new(watch::Sender::new(CoinListState::default())),
            generation: Generation::default(),
            last_request: Mutex::new(None),
            search: Debouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS)),
        }
    }

    /// Overrides the page size; zero is treated as one
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<CoinListState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CoinListState {
        self.state.borrow().clone()
    }

    /// Fetches page 1 in the current sort order, replacing all rows
    pub async fn load(&self) {
        let sort = self.state.borrow().sort;
        self.request(PageRequest {
            sort,
            page: 1,
            append: false,
        })
        .await;
    }

    /// Switches the sort order and reloads from page 1
    ///
    /// Does nothing when `sort` is already active.
    pub async fn set_sort(&self, sort: SortOrder) {
        let changed = self.state.send_if_modified(|state| {
            if state.sort == sort {
                return false;
            }
            state.sort = sort;
            true
        });
        if !changed {
            return;
        }

        self.request(PageRequest {
            sort,
            page: 1,
            append: false,
        })
        .await;
    }

    /// Appends the next page
    ///
    /// # Returns
    /// False, without issuing a request, while a request is in flight or
    /// once the end of the list has been reached
    pub async fn load_more(&self) -> bool {
        let next = {
            let state = self.state.borrow();
            if state.status.is_loading() || !state.has_more {
                return false;
            }
            PageRequest {
                sort: state.sort,
                page: state.page + 1,
                append: true,
            }
        };

        self.request(next).await;
        true
    }

    /// Re-issues the last page request with the same parameters
    ///
    /// # Returns
    /// False when nothing has been requested yet
    pub async fn retry(&self) -> bool {
        let last = *self.last_request.lock();
        match last {
            Some(request) => {
                self.request(request).await;
                true
            }
            None => false,
        }
    }

    /// Updates the filter term after the search debounce delay
    ///
    /// Filtering is client-side only and never triggers a request.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime, since the debounce timer
    /// is a spawned task.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let state = self.state.clone();
        self.search.call(move || {
            state.send_if_modified(|current| {
                if current.search_term == term {
                    return false;
                }
                current.search_term = term;
                true
            });
        });
    }

    /// Rows matching the current search term
    pub fn visible_items(&self) -> Vec<ListItem> {
        self.state.borrow().visible_items()
    }

    async fn request(&self, request: PageRequest) {
        let generation = self.generation.next();
        *self.last_request.lock() = Some(request);
        self.state.send_modify(|state| state.status = LoadStatus::Loading);

        let query = MarketQuery::new(request.sort, self.page_size, request.page)
            .with_currency(self.client.vs_currency());
        let result = self.client.list_market(&query).await;

        if !self.generation.is_current(generation) {
            tracing::debug!(
                generation,
                sort = %request.sort,
                page = request.page,
                "Discarding stale coin list response"
            );
            return;
        }

        match result {
            Ok(coins) => {
                let rows: Vec<ListItem> = coins.iter().map(adapter::list_item).collect();
                let has_more = rows.len() == self.page_size as usize;
                self.state.send_modify(|state| {
                    if request.append {
                        state.items.extend(rows);
                    } else {
                        state.items = rows;
                    }
                    state.page = request.page;
                    state.has_more = has_more;
                    state.status = LoadStatus::Success;
                });
            }
            Err(e) => {
                tracing::warn!(
                    sort = %request.sort,
                    page = request.page,
                    error = %e,
                    "Coin list request failed"
                );
                // Rows left over from a failed reload belong to another query;
                // paging resumes only after `retry` replaces them.
                self.state.send_modify(|state| {
                    if !request.append {
                        state.has_more = false;
                    }
                    state.status = LoadStatus::Error(e.to_string());
                });
            }
        }
    }
}
