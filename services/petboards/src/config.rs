//! Service configuration loaded once at startup

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use config::{Config, Environment};
use serde::Deserialize;

use crate::security::{SigningSecret, token::DEFAULT_TOKEN_TTL_SECS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Deserialize)]
struct RawConfig {
    secret: Option<String>,
    token_ttl_secs: Option<i64>,
    bind_addr: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret used to sign bearer tokens
    pub secret: SigningSecret,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Address the HTTP server binds to
    pub bind_addr: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PETBOARDS_SECRET`: Token signing secret (required)
    /// - `PETBOARDS_TOKEN_TTL_SECS`: Token lifetime in seconds (default: 86400)
    /// - `PETBOARDS_BIND_ADDR`: Listen address (default: "0.0.0.0:3000")
    pub fn from_env() -> Result<Self> {
        let raw: RawConfig = Config::builder()
            .add_source(Environment::with_prefix("PETBOARDS"))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Invalid PETBOARDS_* configuration")?;

        let secret = raw
            .secret
            .and_then(SigningSecret::new)
            .ok_or_else(|| anyhow::anyhow!("PETBOARDS_SECRET environment variable not set"))?;

        let token_ttl_secs = raw.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if token_ttl_secs <= 0 {
            anyhow::bail!("PETBOARDS_TOKEN_TTL_SECS must be a positive number of seconds");
        }

        let token_ttl = Duration::try_seconds(token_ttl_secs)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                anyhow::anyhow!("PETBOARDS_TOKEN_TTL_SECS is too large: {token_ttl_secs}")
            })?;

        Ok(AppConfig {
            secret,
            token_ttl,
            bind_addr: raw
                .bind_addr
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("PETBOARDS_SECRET");
            std::env::remove_var("PETBOARDS_TOKEN_TTL_SECS");
            std::env::remove_var("PETBOARDS_BIND_ADDR");
        }
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_fatal() {
        clear_env();

        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("PETBOARDS_SECRET"));
    }

    #[test]
    #[serial]
    fn test_empty_secret_is_fatal() {
        clear_env();
        unsafe {
            std::env::set_var("PETBOARDS_SECRET", "");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        unsafe {
            std::env::set_var("PETBOARDS_SECRET", "s3cr3t");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.token_ttl, Duration::hours(24));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("PETBOARDS_SECRET", "s3cr3t");
            std::env::set_var("PETBOARDS_TOKEN_TTL_SECS", "600");
            std::env::set_var("PETBOARDS_BIND_ADDR", "127.0.0.1:8080");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.token_ttl, Duration::minutes(10));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_non_positive_ttl_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("PETBOARDS_SECRET", "s3cr3t");
            std::env::set_var("PETBOARDS_TOKEN_TTL_SECS", "0");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_oversized_ttl_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("PETBOARDS_SECRET", "s3cr3t");
        }

        for ttl in ["9000000000000", "9300000000000000", "9223372036854775807"] {
            unsafe {
                std::env::set_var("PETBOARDS_TOKEN_TTL_SECS", ttl);
            }

            let err = AppConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("too large"), "{ttl}: {err}");
        }

        clear_env();
    }
}
