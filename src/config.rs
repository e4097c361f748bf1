// SPDX-License-Identifier: Apache-2.0

//! Gateway configuration
//!
//! Environment-driven settings. `.env` files are honored for local
//! development; production deployments set real environment variables.

use std::env;

use thiserror::Error;

use crate::guard::metrics::DEFAULT_PREVIEW_LIMIT;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {key} is not set")]
    MissingVar { key: &'static str },

    #[error("environment variable {key} has invalid value '{value}'")]
    InvalidVar { key: &'static str, value: String },
}

/// Runtime configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Truncation bound for SQL previews in metrics.
    pub preview_limit: usize,
    /// Pool size for the Postgres executor.
    pub max_connections: u32,
}

impl GatewayConfig {
    /// Configuration with defaults for everything but the URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// `DATABASE_URL` is required. `SQLGATE_PREVIEW_LIMIT` and
    /// `SQLGATE_MAX_CONNECTIONS` override the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar { key: "DATABASE_URL" })?;

        let preview_limit =
            parse_var("SQLGATE_PREVIEW_LIMIT", DEFAULT_PREVIEW_LIMIT as u64)? as usize;
        let max_connections =
            parse_var("SQLGATE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS as u64)? as u32;

        Ok(Self {
            database_url,
            preview_limit,
            max_connections,
        })
    }
}

fn parse_var(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = GatewayConfig::new("postgres://localhost/test");
        assert_eq!(config.preview_limit, DEFAULT_PREVIEW_LIMIT);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        assert_eq!(parse_var("SQLGATE_TEST_UNSET_VAR", 42).unwrap(), 42);
    }
}
