//! State coordinators behind the dashboard views
//!
//! Each coordinator owns one view's state, publishes it through a
//! `tokio::sync::watch` channel and turns every client error into a
//! [`LoadStatus::Error`] message. Nothing escapes as a `Result`.

pub mod coin_detail;
pub mod coin_list;
pub mod debounce;
pub mod highlights;
pub mod state;

pub use coin_detail::{CoinDetailCoordinator, CoinDetailState};
pub use coin_list::{CoinListCoordinator, CoinListState};
pub use debounce::Debouncer;
pub use highlights::{HighlightsCoordinator, HighlightsState};
pub use state::LoadStatus;
