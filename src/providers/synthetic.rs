//! Synthetic market data provider
//!
//! Serves a fixed universe of 100 coins when the live API is unavailable:
//! seven named majors followed by a seeded, generated long tail. The same
//! seed always yields the same universe. Every call waits a short simulated
//! latency so the UI goes through its loading states just as it does live.

use crate::{
    constants::{
        DEFAULT_VS_CURRENCY, SYNTHETIC_LIST_LATENCY_MS, SYNTHETIC_LOOKUP_LATENCY_MS,
        SYNTHETIC_MAJOR_COUNT, SYNTHETIC_SEED, SYNTHETIC_UNIVERSE_SIZE,
    },
    error::ProviderError,
    provider::MarketDataProvider,
    types::{
        CoinDescription, CoinDetail, CoinImage, CurrencyMap, DetailMarketData, MarketCoin,
        MarketQuery, SortOrder, TrendingCoin, TrendingData, TrendingEntry, TrendingResponse,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;
use std::time::Duration;

/// Snapshot timestamp stamped on every synthetic coin (2024-01-15T10:30:00Z)
const SNAPSHOT_TIMESTAMP: i64 = 1_705_314_600;

struct MajorCoin {
    id: &'static str,
    symbol: &'static str,
    name: &'static str,
    image_id: u32,
    image_file: &'static str,
    price: f64,
    market_cap: f64,
    volume: f64,
    high_24h: f64,
    low_24h: f64,
    change_24h: f64,
    change_pct_24h: f64,
    change_pct_7d: f64,
    change_pct_30d: f64,
    circulating_supply: f64,
    max_supply: Option<f64>,
    ath: f64,
    atl: f64,
}

const MAJOR_COINS: [MajorCoin; SYNTHETIC_MAJOR_COUNT] = [
    MajorCoin {
        id: "bitcoin",
        symbol: "btc",
        name: "Bitcoin",
        image_id: 1,
        image_file: "bitcoin.png",
        price: 67234.56,
        market_cap: 1_329_456_789_012.0,
        volume: 28_456_789_012.0,
        high_24h: 68123.45,
        low_24h: 66789.12,
        change_24h: 1245.67,
        change_pct_24h: 1.89,
        change_pct_7d: 5.23,
        change_pct_30d: 11.4,
        circulating_supply: 19_789_456.78,
        max_supply: Some(21_000_000.0),
        ath: 73738.0,
        atl: 67.81,
    },
    MajorCoin {
        id: "ethereum",
        symbol: "eth",
        name: "Ethereum",
        image_id: 279,
        image_file: "ethereum.png",
        price: 3456.78,
        market_cap: 415_678_901_234.0,
        volume: 15_678_901_234.0,
        high_24h: 3567.89,
        low_24h: 3398.45,
        change_24h: 89.12,
        change_pct_24h: 2.64,
        change_pct_7d: 8.45,
        change_pct_30d: 14.1,
        circulating_supply: 120_345_678.91,
        max_supply: None,
        ath: 4878.26,
        atl: 0.432979,
    },
    MajorCoin {
        id: "tether",
        symbol: "usdt",
        name: "Tether",
        image_id: 325,
        image_file: "Tether.png",
        price: 1.0002,
        market_cap: 91_234_567_890.0,
        volume: 45_678_901_234.0,
        high_24h: 1.0012,
        low_24h: 0.9995,
        change_24h: 0.0002,
        change_pct_24h: 0.02,
        change_pct_7d: 0.01,
        change_pct_30d: 0.03,
        circulating_supply: 91_200_000_000.0,
        max_supply: None,
        ath: 1.32,
        atl: 0.572521,
    },
    MajorCoin {
        id: "binancecoin",
        symbol: "bnb",
        name: "BNB",
        image_id: 825,
        image_file: "bnb-icon2_2x.png",
        price: 412.56,
        market_cap: 81_789_012_345.0,
        volume: 1_234_567_890.0,
        high_24h: 418.23,
        low_24h: 408.91,
        change_24h: 7.89,
        change_pct_24h: 1.95,
        change_pct_7d: 4.23,
        change_pct_30d: 6.8,
        circulating_supply: 149_789_456.12,
        max_supply: Some(200_000_000.0),
        ath: 686.31,
        atl: 0.0398177,
    },
    MajorCoin {
        id: "solana",
        symbol: "sol",
        name: "Solana",
        image_id: 4128,
        image_file: "solana.png",
        price: 178.45,
        market_cap: 79_456_789_012.0,
        volume: 3_456_789_012.0,
        high_24h: 182.34,
        low_24h: 175.67,
        change_24h: 4.23,
        change_pct_24h: 2.43,
        change_pct_7d: 12.34,
        change_pct_30d: 21.7,
        circulating_supply: 445_123_456.78,
        max_supply: None,
        ath: 259.96,
        atl: 0.500801,
    },
    MajorCoin {
        id: "ripple",
        symbol: "xrp",
        name: "XRP",
        image_id: 44,
        image_file: "xrp-symbol-white-128.png",
        price: 0.6234,
        market_cap: 34_567_890_123.0,
        volume: 1_987_654_321.0,
        high_24h: 0.6412,
        low_24h: 0.6101,
        change_24h: -0.0123,
        change_pct_24h: -1.93,
        change_pct_7d: -3.12,
        change_pct_30d: 2.4,
        circulating_supply: 55_432_109_876.0,
        max_supply: Some(100_000_000_000.0),
        ath: 3.4,
        atl: 0.00268621,
    },
    MajorCoin {
        id: "usd-coin",
        symbol: "usdc",
        name: "USDC",
        image_id: 6319,
        image_file: "usdc.png",
        price: 0.9998,
        market_cap: 33_123_456_789.0,
        volume: 6_543_210_987.0,
        high_24h: 1.0004,
        low_24h: 0.9991,
        change_24h: -0.0001,
        change_pct_24h: -0.01,
        change_pct_7d: 0.0,
        change_pct_30d: -0.02,
        circulating_supply: 33_130_000_000.0,
        max_supply: None,
        ath: 1.17,
        atl: 0.877647,
    },
];

const TAIL_NAMES: [(&str, &str); 30] = [
    ("Cardano", "ADA"),
    ("Dogecoin", "DOGE"),
    ("TRON", "TRX"),
    ("Avalanche", "AVAX"),
    ("Chainlink", "LINK"),
    ("Polygon", "MATIC"),
    ("Litecoin", "LTC"),
    ("Polkadot", "DOT"),
    ("Internet Computer", "ICP"),
    ("Uniswap", "UNI"),
    ("Bitcoin Cash", "BCH"),
    ("Stellar", "XLM"),
    ("Ethereum Classic", "ETC"),
    ("Monero", "XMR"),
    ("Cosmos", "ATOM"),
    ("VeChain", "VET"),
    ("Algorand", "ALGO"),
    ("Filecoin", "FIL"),
    ("NEAR Protocol", "NEAR"),
    ("Aptos", "APT"),
    ("Hedera", "HBAR"),
    ("Cronos", "CRO"),
    ("Lido DAO", "LDO"),
    ("Quant", "QNT"),
    ("Arbitrum", "ARB"),
    ("Kaspa", "KAS"),
    ("Maker", "MKR"),
    ("Optimism", "OP"),
    ("Stacks", "STX"),
    ("Immutable", "IMX"),
];

/// Upper bound for generated market caps, below the smallest major
const TAIL_MAX_MARKET_CAP: f64 = 30_000_000_000.0;
const TAIL_MIN_MARKET_CAP: f64 = 1_000_000_000.0;

struct SyntheticCoin {
    market: MarketCoin,
    change_pct_30d: f64,
}

/// Synthetic market data provider
///
/// Generated figures carry no real currency. Lists ignore
/// `MarketQuery::vs_currency`, and detail price maps are keyed by the
/// provider's display currency (`usd` unless set with
/// [`with_currency`](Self::with_currency)).
pub struct SyntheticProvider {
    coins: Vec<SyntheticCoin>,
    list_latency: Duration,
    lookup_latency: Duration,
    currency: String,
}

impl SyntheticProvider {
    /// Creates the default universe with simulated network latency
    pub fn new() -> Self {
        Self::with_seed(SYNTHETIC_SEED)
    }

    /// Creates a universe from an explicit seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            coins: generate_universe(seed),
            list_latency: Duration::from_millis(SYNTHETIC_LIST_LATENCY_MS),
            lookup_latency: Duration::from_millis(SYNTHETIC_LOOKUP_LATENCY_MS),
            currency: DEFAULT_VS_CURRENCY.to_string(),
        }
    }

    /// Creates the default universe without simulated latency
    pub fn instant() -> Self {
        Self::new().with_latency(Duration::ZERO, Duration::ZERO)
    }

    /// Overrides the simulated latency for lists and for trending/detail lookups
    pub fn with_latency(mut self, list: Duration, lookup: Duration) -> Self {
        self.list_latency = list;
        self.lookup_latency = lookup;
        self
    }

    /// Sets the currency key used in detail price maps
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_lowercase();
        self
    }

    /// The whole universe in rank order
    pub fn universe(&self) -> impl Iterator<Item = &MarketCoin> {
        self.coins.iter().map(|coin| &coin.market)
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    fn priced(&self, value: f64) -> CurrencyMap {
        CurrencyMap::from([(self.currency.clone(), value)])
    }

    fn find(&self, id: &str) -> Option<&SyntheticCoin> {
        self.coins.iter().find(|coin| coin.market.id == id)
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordering applied by `list_market` for each sort order
///
/// Ties fall back to market-cap rank so paging over equal values is stable.
pub fn compare(order: SortOrder, a: &MarketCoin, b: &MarketCoin) -> Ordering {
    let change = |coin: &MarketCoin| coin.price_change_percentage_24h.unwrap_or_default();

    let primary = match order {
        SortOrder::MarketCapDesc => b.market_cap.total_cmp(&a.market_cap),
        SortOrder::MarketCapAsc => a.market_cap.total_cmp(&b.market_cap),
        SortOrder::PriceDesc => b.current_price.total_cmp(&a.current_price),
        SortOrder::PriceAsc => a.current_price.total_cmp(&b.current_price),
        SortOrder::PercentChangeDesc => change(b).total_cmp(&change(a)),
        SortOrder::PercentChangeAsc => change(a).total_cmp(&change(b)),
        SortOrder::VolumeDesc => b.total_volume.total_cmp(&a.total_volume),
        SortOrder::VolumeAsc => a.total_volume.total_cmp(&b.total_volume),
    };

    primary.then_with(|| {
        let rank = |coin: &MarketCoin| coin.market_cap_rank.unwrap_or(u32::MAX);
        rank(a).cmp(&rank(b))
    })
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

fn snapshot_time() -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(SNAPSHOT_TIMESTAMP, 0)
}

fn image_url(image_id: u32, size: &str, file: &str) -> String {
    format!(
        "https://assets.coingecko.com/coins/images/{}/{}/{}",
        image_id, size, file
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn generate_universe(seed: u64) -> Vec<SyntheticCoin> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut coins: Vec<SyntheticCoin> = MAJOR_COINS
        .iter()
        .enumerate()
        .map(|(i, major)| major_coin(major, i as u32 + 1))
        .collect();

    let tail_len = SYNTHETIC_UNIVERSE_SIZE - SYNTHETIC_MAJOR_COUNT;
    let mut caps: Vec<f64> = (0..tail_len)
        .map(|_| {
            (rng.random::<f64>() * (TAIL_MAX_MARKET_CAP - TAIL_MIN_MARKET_CAP)
                + TAIL_MIN_MARKET_CAP)
                .floor()
        })
        .collect();
    caps.sort_by(|a, b| b.total_cmp(a));

    for (i, market_cap) in caps.into_iter().enumerate() {
        let rank = (SYNTHETIC_MAJOR_COUNT + i + 1) as u32;
        coins.push(tail_coin(&mut rng, i, rank, market_cap));
    }

    coins
}

fn major_coin(major: &MajorCoin, rank: u32) -> SyntheticCoin {
    SyntheticCoin {
        market: MarketCoin {
            id: major.id.to_string(),
            symbol: major.symbol.to_string(),
            name: major.name.to_string(),
            image: image_url(major.image_id, "large", major.image_file),
            current_price: major.price,
            market_cap: major.market_cap,
            market_cap_rank: Some(rank),
            total_volume: major.volume,
            high_24h: Some(major.high_24h),
            low_24h: Some(major.low_24h),
            price_change_24h: Some(major.change_24h),
            price_change_percentage_24h: Some(major.change_pct_24h),
            price_change_percentage_7d: Some(major.change_pct_7d),
            market_cap_change_24h: Some(major.market_cap * major.change_pct_24h / 100.0),
            market_cap_change_percentage_24h: Some(major.change_pct_24h),
            circulating_supply: Some(major.circulating_supply),
            total_supply: Some(major.max_supply.unwrap_or(major.circulating_supply)),
            max_supply: major.max_supply,
            ath: Some(major.ath),
            atl: Some(major.atl),
            last_updated: snapshot_time(),
        },
        change_pct_30d: major.change_pct_30d,
    }
}

fn tail_coin(rng: &mut StdRng, index: usize, rank: u32, market_cap: f64) -> SyntheticCoin {
    let (name, symbol) = TAIL_NAMES[index % TAIL_NAMES.len()];
    let cycle = index / TAIL_NAMES.len();
    let slug = name.to_lowercase().replace(' ', "-");
    let id = if cycle == 0 {
        slug
    } else {
        format!("{}-{}", slug, cycle + 1)
    };
    let symbol = symbol.to_lowercase();

    let base_price = round_to(rng.random::<f64>() * 100.0 + 0.1, 8);
    let change_24h = (rng.random::<f64>() - 0.5) * 10.0;
    let circulating = (rng.random::<f64>() * 1e9 + 1e6).floor();
    let max_supply = if rng.random::<f64>() > 0.5 {
        Some((circulating * (1.0 + rng.random::<f64>())).floor())
    } else {
        None
    };

    SyntheticCoin {
        market: MarketCoin {
            image: image_url(100 + rank, "large", &format!("{}.png", symbol)),
            id,
            symbol,
            name: name.to_string(),
            current_price: base_price,
            market_cap,
            market_cap_rank: Some(rank),
            total_volume: (rng.random::<f64>() * 5e9 + 1e8).floor(),
            high_24h: Some(base_price * (1.0 + rng.random::<f64>() * 0.1)),
            low_24h: Some(base_price * (1.0 - rng.random::<f64>() * 0.1)),
            price_change_24h: Some(change_24h),
            price_change_percentage_24h: Some(change_24h / base_price * 100.0),
            price_change_percentage_7d: Some((rng.random::<f64>() - 0.5) * 20.0),
            market_cap_change_24h: Some((rng.random::<f64>() * 1e9).floor()),
            market_cap_change_percentage_24h: Some((rng.random::<f64>() - 0.5) * 5.0),
            circulating_supply: Some(circulating),
            total_supply: Some(max_supply.unwrap_or(circulating)),
            max_supply,
            ath: Some(base_price * (1.0 + rng.random::<f64>() * 2.0)),
            atl: Some(base_price * rng.random::<f64>() * 0.1),
            last_updated: snapshot_time(),
        },
        change_pct_30d: (rng.random::<f64>() - 0.5) * 30.0,
    }
}

fn sized_image(large: &str, size: &str) -> String {
    large.replacen("/large/", &format!("/{}/", size), 1)
}

#[async_trait]
impl MarketDataProvider for SyntheticProvider {
    async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError> {
        query.validate()?;
        simulate_latency(self.list_latency).await;

        let mut sorted: Vec<&MarketCoin> = self.universe().collect();
        sorted.sort_by(|a, b| compare(query.order, a, b));

        let per_page = query.per_page as usize;
        let start = (query.page as usize - 1).saturating_mul(per_page);

        Ok(sorted
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
        simulate_latency(self.lookup_latency).await;

        let btc_price = self
            .find("bitcoin")
            .map(|coin| coin.market.current_price)
            .unwrap_or(1.0);

        let coins = self
            .coins
            .iter()
            .take(SYNTHETIC_MAJOR_COUNT)
            .enumerate()
            .map(|(i, coin)| {
                let market = &coin.market;
                TrendingCoin {
                    item: TrendingEntry {
                        id: market.id.clone(),
                        coin_id: market.market_cap_rank.map(u64::from),
                        name: market.name.clone(),
                        symbol: market.symbol.clone(),
                        market_cap_rank: market.market_cap_rank,
                        thumb: sized_image(&market.image, "thumb"),
                        small: sized_image(&market.image, "small"),
                        large: market.image.clone(),
                        slug: Some(market.id.clone()),
                        price_btc: Some(market.current_price / btc_price),
                        score: Some(i as u32),
                        data: Some(TrendingData {
                            price: Some(market.current_price),
                        }),
                    },
                }
            })
            .collect();

        Ok(TrendingResponse {
            coins,
            nfts: Vec::new(),
            categories: Vec::new(),
        })
    }

    async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        simulate_latency(self.lookup_latency).await;

        let coin = self.find(id).ok_or_else(|| ProviderError::not_found(id))?;
        let market = &coin.market;

        Ok(CoinDetail {
            id: market.id.clone(),
            symbol: market.symbol.clone(),
            name: market.name.clone(),
            description: CoinDescription {
                en: format!(
                    "{} is a decentralized digital cryptocurrency that enables peer-to-peer \
                     transactions. It was created to provide a secure, fast, and efficient way \
                     to transfer value across the internet without the need for traditional \
                     financial intermediaries.",
                    market.name
                ),
            },
            image: CoinImage {
                thumb: sized_image(&market.image, "thumb"),
                small: sized_image(&market.image, "small"),
                large: market.image.clone(),
            },
            market_cap_rank: market.market_cap_rank,
            market_data: DetailMarketData {
                current_price: self.priced(market.current_price),
                market_cap: self.priced(market.market_cap),
                total_volume: self.priced(market.total_volume),
                high_24h: self.priced(market.high_24h.unwrap_or(market.current_price)),
                low_24h: self.priced(market.low_24h.unwrap_or(market.current_price)),
                price_change_24h: market.price_change_24h,
                price_change_percentage_24h: market.price_change_percentage_24h,
                price_change_percentage_7d: market.price_change_percentage_7d,
                price_change_percentage_30d: Some(coin.change_pct_30d),
            },
        })
    }

    fn provider_name(&self) -> &'static str {
        "synthetic"
    }
}
