//! Runtime configuration for the market data client
//!
//! Defaults come from [`crate::constants`]; a handful of settings can be
//! overridden through environment variables. Empty values count as unset.

use crate::{
    constants::{
        CACHE_TTL_SECS, COINGECKO_API_URL, DEFAULT_VS_CURRENCY, ENV_API_KEY, ENV_API_URL,
        ENV_CACHE_TTL_SECS, ENV_MODE, REQUEST_TIMEOUT_SECS,
    },
    error::ConfigError,
};
use std::str::FromStr;
use std::time::Duration;

/// Where the client gets its data from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Live API first, synthetic data after the first failure
    #[default]
    Live,
    /// Synthetic data only, as if the live API had already failed
    Synthetic,
}

impl FromStr for DataMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" | "coingecko" => Ok(DataMode::Live),
            "synthetic" | "mock" => Ok(DataMode::Synthetic),
            _ => Err(ConfigError::invalid_value(ENV_MODE, s)),
        }
    }
}

/// Market data client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Optional demo API key
    pub api_key: Option<String>,
    /// Startup mode
    pub mode: DataMode,
    /// Maximum age of a cached response
    pub cache_ttl: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Display currency used by the coordinators
    pub vs_currency: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            api_key: None,
            mode: DataMode::default(),
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(base_url) = get(ENV_API_URL) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config.api_key = get(ENV_API_KEY);

        if let Some(mode) = get(ENV_MODE) {
            config.mode = mode.parse()?;
        }

        if let Some(ttl) = get(ENV_CACHE_TTL_SECS) {
            let secs = ttl
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_value(ENV_CACHE_TTL_SECS, &ttl))?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("COINGECKO_API_URL", "http://localhost:8080/api/v3/"),
            ("COINGECKO_API_KEY", " CG-demo "),
            ("MARKET_DATA_MODE", "Synthetic"),
            ("MARKET_DATA_CACHE_TTL_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/api/v3");
        assert_eq!(config.api_key.as_deref(), Some("CG-demo"));
        assert_eq!(config.mode, DataMode::Synthetic);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("COINGECKO_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("MARKET_DATA_MODE", "offline")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::invalid_value("MARKET_DATA_MODE", "offline"));

        assert!(
            ClientConfig::from_lookup(lookup(&[("MARKET_DATA_CACHE_TTL_SECS", "soon")])).is_err()
        );
    }
}
