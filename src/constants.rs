//! Constants for the market dashboard SDK
//!
//! Compile-time defaults live here. The few settings that may change per
//! deployment (base URL, API key, mode, cache TTL) can be overridden from the
//! environment, see [`crate::config::ClientConfig::from_env`].

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Paginated coin list endpoint
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Global trending endpoint
pub const COINGECKO_TRENDING_ENDPOINT: &str = "/search/trending";

/// Coin detail endpoint prefix (`/coins/{id}`)
pub const COINGECKO_COIN_ENDPOINT: &str = "/coins";

/// Header carrying the optional demo API key
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Query flags sent with every detail request
pub const DETAIL_QUERY_FLAGS: &[(&str, &str)] = &[
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

/// How long a cached response may be served (in seconds)
pub const CACHE_TTL_SECS: u64 = 30;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "market-dashboard-sdk/0.1.0";

/// Default display currency
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Default change windows requested with coin lists
pub const DEFAULT_CHANGE_WINDOWS: &str = "24h,7d";

/// Coin list page size
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Search input debounce (in milliseconds)
pub const SEARCH_DEBOUNCE_MS: u64 = 150;

/// Entries per highlight card
pub const HIGHLIGHT_LIMIT: usize = 10;

/// Size of the market-cap universe ranked by 7-day performance
pub const PERFORMANCE_UNIVERSE_SIZE: u32 = 100;

/// Minimum detail loading time used by the demo (in milliseconds)
pub const DETAIL_MIN_LOAD_MS: u64 = 1000;

/// Number of coins in the synthetic universe
pub const SYNTHETIC_UNIVERSE_SIZE: usize = 100;

/// Number of named major coins at the head of the synthetic universe
pub const SYNTHETIC_MAJOR_COUNT: usize = 7;

/// Seed for the synthetic generator
pub const SYNTHETIC_SEED: u64 = 0x00C0_FFEE_D00D;

/// Simulated latency of synthetic coin lists (in milliseconds)
pub const SYNTHETIC_LIST_LATENCY_MS: u64 = 500;

/// Simulated latency of synthetic trending/detail lookups (in milliseconds)
pub const SYNTHETIC_LOOKUP_LATENCY_MS: u64 = 300;

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "COINGECKO_API_URL";

/// Environment variable holding the optional API key
pub const ENV_API_KEY: &str = "COINGECKO_API_KEY";

/// Environment variable selecting `live` or `synthetic` mode
pub const ENV_MODE: &str = "MARKET_DATA_MODE";

/// Environment variable overriding the cache TTL (in seconds)
pub const ENV_CACHE_TTL_SECS: &str = "MARKET_DATA_CACHE_TTL_SECS";
