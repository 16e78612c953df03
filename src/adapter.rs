//! Pure mappings from upstream records to view models

use crate::{
    types::{CoinDetail, CurrencyMap, MarketCoin, TrendingEntry},
    view::{DetailViewModel, HighlightItem, ListItem},
};

/// Maps a market snapshot to a coin table row
pub fn list_item(coin: &MarketCoin) -> ListItem {
    ListItem {
        id: coin.id.clone(),
        symbol: coin.symbol.to_uppercase(),
        name: coin.name.clone(),
        image: coin.image.clone(),
        current_price: coin.current_price,
        market_cap: coin.market_cap,
        market_cap_rank: coin.market_cap_rank.unwrap_or_default(),
        volume_24h: coin.total_volume,
        price_change_24h: coin.price_change_24h.unwrap_or_default(),
        price_change_percentage_24h: coin.price_change_percentage_24h.unwrap_or_default(),
        last_updated: coin.last_updated,
    }
}

/// Maps a market snapshot to a gainers/losers/volume highlight
pub fn market_highlight(coin: &MarketCoin) -> HighlightItem {
    HighlightItem {
        id: coin.id.clone(),
        symbol: coin.symbol.to_uppercase(),
        name: coin.name.clone(),
        image: coin.image.clone(),
        current_price: coin.current_price,
        price_change_percentage_24h: coin.price_change_percentage_24h.unwrap_or_default(),
        price_change_percentage_7d: None,
        volume_24h: Some(coin.total_volume),
        market_cap_rank: coin.market_cap_rank,
    }
}

/// Maps a market snapshot to a 7-day performance highlight
pub fn performance_highlight(coin: &MarketCoin) -> HighlightItem {
    HighlightItem {
        price_change_percentage_7d: Some(coin.price_change_percentage_7d.unwrap_or_default()),
        ..market_highlight(coin)
    }
}

/// Maps a trending entry to a highlight
///
/// Trending entries carry no change data; a missing price becomes 0.
pub fn trending_highlight(entry: &TrendingEntry) -> HighlightItem {
    HighlightItem {
        id: entry.id.clone(),
        symbol: entry.symbol.to_uppercase(),
        name: entry.name.clone(),
        image: entry.large.clone(),
        current_price: entry
            .data
            .as_ref()
            .and_then(|data| data.price)
            .unwrap_or_default(),
        price_change_percentage_24h: 0.0,
        price_change_percentage_7d: None,
        volume_24h: None,
        market_cap_rank: entry.market_cap_rank,
    }
}

/// Maps a coin detail to the detail panel, reading prices in `currency`
pub fn detail_view(detail: &CoinDetail, currency: &str) -> DetailViewModel {
    let market = &detail.market_data;
    let in_currency = |map: &CurrencyMap| map.get(currency).copied().unwrap_or_default();

    DetailViewModel {
        id: detail.id.clone(),
        symbol: detail.symbol.to_uppercase(),
        name: detail.name.clone(),
        image: detail.image.large.clone(),
        description: detail.description.en.clone(),
        market_cap_rank: detail.market_cap_rank.unwrap_or_default(),
        current_price: in_currency(&market.current_price),
        market_cap: in_currency(&market.market_cap),
        volume_24h: in_currency(&market.total_volume),
        high_24h: in_currency(&market.high_24h),
        low_24h: in_currency(&market.low_24h),
        price_change_24h: market.price_change_24h.unwrap_or_default(),
        price_change_percentage_24h: market.price_change_percentage_24h.unwrap_or_default(),
        price_change_percentage_7d: market.price_change_percentage_7d.unwrap_or_default(),
        price_change_percentage_30d: market.price_change_percentage_30d.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoinImage, DetailMarketData, TrendingData};

    fn coin(symbol: &str) -> MarketCoin {
        serde_json::from_value(serde_json::json!({
            "id": "dogecoin",
            "symbol": symbol,
            "name": "Dogecoin",
            "image": "https://example.com/doge.png",
            "current_price": 0.08,
            "market_cap": 11_000_000_000.0,
            "market_cap_rank": 9,
            "total_volume": 500_000_000.0,
            "price_change_24h": -0.001,
            "price_change_percentage_24h": -1.2,
            "price_change_percentage_7d": 4.0
        }))
        .unwrap()
    }

    #[test]
    fn test_symbol_is_upper_cased_regardless_of_input_case() {
        for symbol in ["doge", "DOGE", "dOgE"] {
            assert_eq!(list_item(&coin(symbol)).symbol, "DOGE");
            assert_eq!(market_highlight(&coin(symbol)).symbol, "DOGE");
        }
    }

    #[test]
    fn test_adapters_are_deterministic() {
        let source = coin("doge");
        let first = serde_json::to_vec(&list_item(&source)).unwrap();
        let second = serde_json::to_vec(&list_item(&source)).unwrap();
        assert_eq!(first, second);
        assert_eq!(performance_highlight(&source), performance_highlight(&source));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let mut source = coin("doge");
        source.market_cap_rank = None;
        source.price_change_24h = None;
        source.price_change_percentage_7d = None;

        let item = list_item(&source);
        assert_eq!(item.market_cap_rank, 0);
        assert_eq!(item.price_change_24h, 0.0);
        assert_eq!(performance_highlight(&source).price_change_percentage_7d, Some(0.0));
    }

    #[test]
    fn test_trending_without_price_yields_zero() {
        let mut entry = TrendingEntry {
            id: "pepe".to_string(),
            coin_id: Some(29850),
            name: "Pepe".to_string(),
            symbol: "pepe".to_string(),
            market_cap_rank: Some(30),
            thumb: "thumb.png".to_string(),
            small: "small.png".to_string(),
            large: "large.png".to_string(),
            slug: None,
            price_btc: Some(0.0000001),
            score: Some(0),
            data: None,
        };

        let highlight = trending_highlight(&entry);
        assert_eq!(highlight.current_price, 0.0);
        assert_eq!(highlight.symbol, "PEPE");
        assert_eq!(highlight.image, "large.png");

        entry.data = Some(TrendingData { price: Some(0.0000123) });
        assert_eq!(trending_highlight(&entry).current_price, 0.0000123);
    }

    #[test]
    fn test_detail_view_reads_requested_currency() {
        let mut market_data = DetailMarketData::default();
        market_data.current_price.insert("usd".to_string(), 100.0);
        market_data.current_price.insert("eur".to_string(), 92.0);
        market_data.price_change_percentage_30d = Some(12.5);

        let detail = CoinDetail {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            description: Default::default(),
            image: CoinImage {
                thumb: "t".to_string(),
                small: "s".to_string(),
                large: "l".to_string(),
            },
            market_cap_rank: Some(1),
            market_data,
        };

        let usd = detail_view(&detail, "usd");
        assert_eq!(usd.current_price, 100.0);
        assert_eq!(usd.symbol, "BTC");
        assert_eq!(usd.image, "l");
        assert_eq!(usd.high_24h, 0.0);
        assert_eq!(usd.price_change_percentage_30d, 12.5);
        assert_eq!(detail_view(&detail, "eur").current_price, 92.0);
    }
}
