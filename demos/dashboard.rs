use market_dashboard_sdk::constants::DETAIL_MIN_LOAD_MS;
use market_dashboard_sdk::format::{format_compact, format_currency, format_percentage};
use market_dashboard_sdk::{
    CoinDetailCoordinator, CoinListCoordinator, HighlightKind, HighlightsCoordinator,
    MarketDataClient, SortOrder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,market_dashboard_sdk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Market Dashboard");
    println!("================");

    let client = Arc::new(MarketDataClient::from_env()?);

    // 1. Coin table
    let coins = CoinListCoordinator::new(client.clone()).with_page_size(20);
    let start = Instant::now();
    coins.load().await;
    println!(
        "\n1. Top coins by market cap ({:?}, provider: {})",
        start.elapsed(),
        client.provider_name()
    );
    print_table(&coins);

    coins.set_sort(SortOrder::VolumeDesc).await;
    println!("\n   Sorted by 24h volume:");
    print_table(&coins);

    coins.load_more().await;
    coins.set_search_term("coin");
    tokio::time::sleep(Duration::from_millis(200)).await;
    let matches = coins.visible_items();
    println!(
        "\n   {} of {} loaded rows match \"coin\"",
        matches.len(),
        coins.snapshot().items.len()
    );

    // 2. Highlights
    let highlights = HighlightsCoordinator::new(client.clone());
    highlights.load().await;
    let state = highlights.snapshot();
    println!("\n2. Highlights");
    if let Some(message) = state.status.error() {
        println!("   Error: {} (retry with highlights.retry())", message);
    }
    for kind in HighlightKind::all() {
        println!("\n   {}", kind.title());
        for item in state.items(*kind).iter().take(5) {
            let change = match kind {
                HighlightKind::Performance7d => item.price_change_percentage_7d.unwrap_or_default(),
                _ => item.price_change_percentage_24h,
            };
            println!(
                "   {:<8} {:>14} {:>9}",
                item.symbol,
                format_currency(item.current_price, false),
                format_percentage(change)
            );
        }
    }

    // 3. Detail panel
    let detail = CoinDetailCoordinator::new(client.clone())
        .with_min_load_time(Duration::from_millis(DETAIL_MIN_LOAD_MS));
    for id in ["bitcoin", "not-a-real-coin"] {
        detail.fetch(id).await;
        let state = detail.snapshot();
        println!("\n3. Detail: {}", id);
        match (&state.detail, state.status.error()) {
            (Some(view), _) => {
                println!("   {} ({}) rank #{}", view.name, view.symbol, view.market_cap_rank);
                println!("   Price:      {}", format_currency(view.current_price, false));
                println!("   Market cap: {}", format_compact(view.market_cap));
                println!(
                    "   24h range:  {} - {}",
                    format_currency(view.low_24h, false),
                    format_currency(view.high_24h, false)
                );
                println!(
                    "   Change:     24h {}  7d {}  30d {}",
                    format_percentage(view.price_change_percentage_24h),
                    format_percentage(view.price_change_percentage_7d),
                    format_percentage(view.price_change_percentage_30d)
                );
            }
            (None, Some(message)) => println!("   Error: {}", message),
            (None, None) => println!("   Nothing loaded"),
        }
    }

    // 4. Client health
    let health = client.health_check().await;
    let metrics = client.metrics().await;
    println!("\n4. Client health: {:?}", health.status);
    if let Some(message) = &health.message {
        println!("   {}", message);
    }
    println!(
        "   Live requests: {}  failures: {}  cache hits: {}  fallback responses: {}",
        metrics.live_requests,
        metrics.live_failures,
        metrics.cache_hits,
        metrics.fallback_responses
    );
    println!(
        "   Latency p50: {:.1}ms  p99: {:.1}ms",
        metrics.latency_p50_ms, metrics.latency_p99_ms
    );

    Ok(())
}

fn print_table(coins: &CoinListCoordinator) {
    let state = coins.snapshot();
    if let Some(message) = state.status.error() {
        println!("   Error: {}", message);
        return;
    }

    println!(
        "   {:>4} {:<8} {:>14} {:>9} {:>10} {:>10}",
        "#", "Symbol", "Price", "24h", "Volume", "Mkt Cap"
    );
    for row in state.items.iter().take(10) {
        println!(
            "   {:>4} {:<8} {:>14} {:>9} {:>10} {:>10}",
            row.market_cap_rank,
            row.symbol,
            format_currency(row.current_price, false),
            format_percentage(row.price_change_percentage_24h),
            format_compact(row.volume_24h),
            format_compact(row.market_cap)
        );
    }
}
