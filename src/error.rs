//! Error types for the market dashboard SDK

use thiserror::Error;

/// Errors that can occur when querying a market data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No provider holds the requested coin
    #[error("Coin with id {0} not found")]
    NotFound(String),

    /// Query parameters rejected before dispatch
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid_value(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl ProviderError {
    /// Creates a NotFound error
    pub fn not_found(id: &str) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates an InvalidRequest error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Returns the HTTP status for `HttpStatus` failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for failures that mean the coin does not exist anywhere
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
