//! Stock ledger configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | variable                         | default        |
//! |----------------------------------|----------------|
//! | `TIENDA_DATABASE_PATH`           | `./tienda.db`  |
//! | `TIENDA_DB_MAX_CONNECTIONS`      | `5`            |
//! | `TIENDA_DB_CONNECT_TIMEOUT_SECS` | `30`           |
//! | `TIENDA_LOW_STOCK_THRESHOLD`     | `5`            |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tienda_core::DEFAULT_LOW_STOCK_THRESHOLD;

use crate::pool::DbConfig;

/// Stock ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool upper bound
    pub max_connections: u32,

    /// Pool acquire timeout in seconds
    pub connect_timeout_secs: u64,

    /// Default threshold for low-stock alerts
    pub low_stock_threshold: i64,
}

impl Default for StockConfig {
    fn default() -> Self {
        StockConfig {
            database_path: PathBuf::from("./tienda.db"),
            max_connections: 5,
            connect_timeout_secs: 30,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl StockConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StockConfig::default();

        let config = StockConfig {
            database_path: lookup("TIENDA_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(&lookup, "TIENDA_DB_MAX_CONNECTIONS", defaults.max_connections)?,

            connect_timeout_secs: parse_or(
                &lookup,
                "TIENDA_DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,

            low_stock_threshold: parse_or(
                &lookup,
                "TIENDA_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("TIENDA_DB_MAX_CONNECTIONS".to_string()));
        }

        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue("TIENDA_LOW_STOCK_THRESHOLD".to_string()));
        }

        Ok(config)
    }

    /// Pool configuration derived from these settings.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
