use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse, env_required};

use crate::common::RetryConfig;

/// Connection pool settings.
///
/// Built by hand with [`PostgresConfig::new`] or loaded from the environment
/// with the `config` feature.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Retries of the initial connection before startup fails
    pub connect_retries: u32,
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Backoff policy for establishing the pool: `connect_retries` retries,
    /// at most 10 seconds between attempts.
    pub fn retry_policy(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(self.connect_retries)
            .with_max_delay(Duration::from_secs(10))
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 600,
            connect_retries: 3,
            sqlx_logging: true,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default: 20)
/// - `DB_MIN_CONNECTIONS` (default: 2)
/// - `DB_CONNECT_TIMEOUT` seconds (default: 8)
/// - `DB_ACQUIRE_TIMEOUT` seconds (default: 8)
/// - `DB_IDLE_TIMEOUT` seconds (default: 600)
/// - `DB_CONNECT_RETRIES` (default: 3)
/// - `DB_SQLX_LOGGING` (default: true)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: env_parse("DB_MAX_CONNECTIONS", "20")?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", "2")?,
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT", "8")?,
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT", "8")?,
            idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT", "600")?,
            connect_retries: env_parse("DB_CONNECT_RETRIES", "3")?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", "true")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_pool_defaults() {
        let config = PostgresConfig::new("postgresql://localhost/catalog");
        assert_eq!(config.url(), "postgresql://localhost/catalog");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_retries, 3);
    }

    #[test]
    fn test_with_pool_size() {
        let config = PostgresConfig::new("postgresql://localhost/catalog").with_pool_size(50, 10);
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.min_connections, 10);
    }

    #[test]
    fn test_retry_policy_follows_connect_retries() {
        let mut config = PostgresConfig::new("postgresql://localhost/catalog");
        config.connect_retries = 5;

        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_minimal() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("DB_MAX_CONNECTIONS", None),
                ("DB_CONNECT_RETRIES", None),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.url, "postgresql://localhost/catalog");
                assert_eq!(config.max_connections, 20);
                assert_eq!(config.connect_retries, 3);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("DB_MAX_CONNECTIONS", Some("5")),
                ("DB_CONNECT_TIMEOUT", Some("15")),
                ("DB_CONNECT_RETRIES", Some("0")),
                ("DB_SQLX_LOGGING", Some("false")),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.max_connections, 5);
                assert_eq!(config.connect_timeout_secs, 15);
                assert_eq!(config.connect_retries, 0);
                assert!(!config.sqlx_logging);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            let err = PostgresConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_invalid_number() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("DB_MIN_CONNECTIONS", Some("two")),
            ],
            || {
                let err = PostgresConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("DB_MIN_CONNECTIONS"));
            },
        );
    }
}
