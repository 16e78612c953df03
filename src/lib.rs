//! # Market Dashboard SDK
//!
//! Data layer for a cryptocurrency market dashboard backed by the CoinGecko
//! REST API.
//!
//! ## Resilience
//!
//! Responses are cached for 30 seconds. The first failed live request of any
//! kind switches the client to a seeded synthetic dataset for the rest of the
//! process, so the views keep rendering while the API is unavailable.
//!
//! ## Usage
//!
//! Build one [`MarketDataClient`] at startup, share it through an `Arc`, and
//! hand it to the coordinators that drive each view:
//!
//! ```no_run
//! use market_dashboard_sdk::{CoinListCoordinator, MarketDataClient, SortOrder};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = Arc::new(MarketDataClient::from_env()?);
//! let coins = CoinListCoordinator::new(client.clone());
//!
//! coins.load().await;
//! coins.set_sort(SortOrder::VolumeDesc).await;
//! for row in coins.visible_items() {
//!     println!("{:>3} {:<6} ${:.2}", row.market_cap_rank, row.symbol, row.current_price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod format;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use client::MarketDataClient;
pub use config::{ClientConfig, DataMode};
pub use coordinator::{
    CoinDetailCoordinator, CoinDetailState, CoinListCoordinator, CoinListState, Debouncer,
    HighlightsCoordinator, HighlightsState, LoadStatus,
};
pub use error::{ConfigError, ProviderError};
pub use metrics::ClientMetrics;
pub use provider::MarketDataProvider;
pub use types::{
    CoinDetail, ComponentHealth, HealthStatus, MarketCoin, MarketQuery, SortOrder,
    TrendingResponse,
};
pub use view::{DetailViewModel, HighlightItem, HighlightKind, ListItem};
