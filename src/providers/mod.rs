//! Market data provider implementations

pub mod cached;
pub mod coingecko;
pub mod fallback;
pub mod synthetic;

pub use cached::CachedProvider;
pub use coingecko::CoinGeckoProvider;
pub use fallback::FallbackProvider;
pub use synthetic::SyntheticProvider;
