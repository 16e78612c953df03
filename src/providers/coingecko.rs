//! CoinGecko market data provider implementation

use crate::{
    config::ClientConfig,
    constants::{API_KEY_HEADER, COINGECKO_TRENDING_ENDPOINT, DETAIL_QUERY_FLAGS, USER_AGENT},
    error::ProviderError,
    provider::MarketDataProvider,
    types::{coin_endpoint, CoinDetail, MarketCoin, MarketQuery, TrendingResponse},
};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    ///
    /// The API key, when configured, is attached to every request as a
    /// default header.
    pub fn new(config: &ClientConfig) -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(api_key) = &config.api_key {
            let value = header::HeaderValue::from_str(api_key)
                .map_err(|e| ProviderError::invalid_request(format!("invalid API key: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T, P>(&self, endpoint: &str, params: &[(&str, P)]) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        P: AsRef<str>,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_ref())).collect();
        tracing::debug!(url = %url, "Fetching from CoinGecko");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(ProviderError::Network)?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!(
                "Failed to parse CoinGecko response from {}: {}",
                endpoint, e
            ))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn list_market(&self, query: &MarketQuery) -> Result<Vec<MarketCoin>, ProviderError> {
        let coins: Vec<MarketCoin> = self.get_json(query.endpoint(), &query.params()).await?;

        tracing::debug!(
            count = coins.len(),
            order = %query.order,
            page = query.page,
            "Fetched coin list from CoinGecko"
        );

        Ok(coins)
    }

    async fn trending(&self) -> Result<TrendingResponse, ProviderError> {
        self.get_json::<_, &str>(COINGECKO_TRENDING_ENDPOINT, &[])
            .await
    }

    async fn detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        self.get_json(&coin_endpoint(id), DETAIL_QUERY_FLAGS).await
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, api_key: Option<&str>) -> CoinGeckoProvider {
        let config = ClientConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            ..ClientConfig::default()
        };
        CoinGeckoProvider::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_list_market_sends_query_parameters() {
        let server = MockServer::start().await;

        let body = r#"[{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 67234.56,
            "market_cap": 1329456789012,
            "market_cap_rank": 1,
            "total_volume": 28456789012,
            "price_change_24h": 1245.67,
            "price_change_percentage_24h": 1.89,
            "price_change_percentage_7d_in_currency": 5.23,
            "last_updated": "2024-01-15T10:30:00.000Z"
        }]"#;

        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("order", "volume_desc"))
            .and(query_param("per_page", "10"))
            .and(query_param("page", "2"))
            .and(query_param("sparkline", "false"))
            .and(query_param("price_change_percentage", "24h"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let query = MarketQuery::new(SortOrder::VolumeDesc, 10, 2).with_change_windows("24h");
        let coins = provider(&server, None).list_market(&query).await.unwrap();

        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[0].price_change_percentage_7d, Some(5.23));
    }

    #[tokio::test]
    async fn test_api_key_is_sent_as_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/trending"))
            .and(header("x-cg-demo-api-key", "demo-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"coins": [], "nfts": [], "categories": []}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let trending = provider(&server, Some("demo-key")).trending().await.unwrap();
        assert!(trending.coins.is_empty());
    }

    #[tokio::test]
    async fn test_detail_requests_market_data_only() {
        let server = MockServer::start().await;

        let body = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "description": {"en": "Digital gold."},
            "image": {"thumb": "t", "small": "s", "large": "l"},
            "market_cap_rank": 1,
            "market_data": {
                "current_price": {"usd": 67234.56},
                "market_cap": {"usd": 1329456789012},
                "total_volume": {"usd": 28456789012},
                "high_24h": {"usd": 68123.45},
                "low_24h": {"usd": 66789.12},
                "price_change_24h": 1245.67,
                "price_change_percentage_24h": 1.89,
                "price_change_percentage_7d": 5.23,
                "price_change_percentage_30d": 11.4
            }
        }"#;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .and(query_param("market_data", "true"))
            .and(query_param("tickers", "false"))
            .and(query_param("localization", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let detail = provider(&server, None).detail("bitcoin").await.unwrap();
        assert_eq!(detail.description.en, "Digital gold.");
        assert_eq!(detail.market_data.current_price.get("usd"), Some(&67234.56));
    }

    #[tokio::test]
    async fn test_detail_id_stays_one_path_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/odd%2Fcoin%3Fx"))
            .and(query_param("market_data", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"id": "odd/coin?x", "symbol": "odd", "name": "Odd"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let detail = provider(&server, None).detail("odd/coin?x").await.unwrap();
        assert_eq!(detail.id, "odd/coin?x");
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .list_market(&MarketQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::HttpStatus { status: 429 }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server, None).trending().await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
