// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`GatewayConfig`] loader
//! used by the HTTP gateway.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `VC_API_URL` | Virtual cards GraphQL endpoint | Required |
//! | `VC_API_KEY` | API key sent as `x-api-key` | Optional |
//! | `VC_REQUEST_TIMEOUT_SECS` | HTTP request timeout in seconds | `15` |

use std::time::Duration;

use url::Url;

/// Environment variable name for the GraphQL endpoint URL.
pub const API_URL_ENV: &str = "VC_API_URL";

/// Environment variable name for the API key.
pub const API_KEY_ENV: &str = "VC_API_KEY";

/// Environment variable name for the request timeout override.
pub const REQUEST_TIMEOUT_ENV: &str = "VC_REQUEST_TIMEOUT_SECS";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default page size for list operations when the caller gives no limit.
pub const DEFAULT_LIST_LIMIT: i32 = 100;

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

/// Settings for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// GraphQL endpoint.
    pub endpoint: Url,
    /// API key, sent as the `x-api-key` header when present.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Build a configuration for an explicit endpoint with defaults for the
    /// rest.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        let endpoint = endpoint
            .parse()
            .map_err(|e: url::ParseError| ConfigError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            endpoint,
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env_required(API_URL_ENV)?;
        let mut config = Self::new(&endpoint)?;
        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty());
        if let Ok(raw) = std::env::var(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    name: REQUEST_TIMEOUT_ENV,
                    message: e.to_string(),
                }
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_endpoint_gets_defaults() {
        let config = GatewayConfig::new("https://cards.example.com/graphql").unwrap();
        assert_eq!(config.endpoint.as_str(), "https://cards.example.com/graphql");
        assert_eq!(config.timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(matches!(
            GatewayConfig::new("not a url"),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn with_api_key_sets_header_value() {
        let config = GatewayConfig::new("https://cards.example.com/graphql")
            .unwrap()
            .with_api_key("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
