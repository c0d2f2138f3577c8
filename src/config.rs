//! Configuration management for the risk scoring service
//!
//! Loads configuration from environment variables (via .env file) and provides
//! validated, type-safe access to all service parameters.

use anyhow::{Context, Result};
use std::env;

/// Complete configuration for the risk scoring service
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub scoring: ScoringConfig,
    pub history: HistoryConfig,
    pub analytics: AnalyticsConfig,
    pub service: ServiceConfig,
}

/// HTTP server binding configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (typically 0.0.0.0 in containers)
    pub host: String,
    /// Port to serve the API on
    pub port: u16,
}

impl ServerConfig {
    /// Get the host:port pair for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Decision threshold configuration
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Score at or above which a transaction is flagged for review
    pub flag_threshold: f64,
    /// Score at or above which a transaction is declined outright
    pub decline_threshold: f64,
}

/// Transaction history retention configuration
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum entries retained before FIFO eviction
    pub max_entries: usize,
    /// Page size when the history endpoint gets no explicit limit
    pub default_return_limit: usize,
}

/// Business metrics configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Assumed loss prevented per caught fraud (USD)
    pub avg_fraud_loss_usd: f64,
}

/// Service identity configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deployment environment name (development, staging, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Expects a .env file in the working directory or environment variables to be set.
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (ignoring error if not found)
        let _ = dotenv::dotenv();

        Ok(Config {
            server: ServerConfig {
                host: get_env_string("HOST", "0.0.0.0")?,
                port: get_env_u16("PORT", 8000)?,
            },
            scoring: ScoringConfig {
                flag_threshold: get_env_f64("FLAG_THRESHOLD", 0.70)?,
                decline_threshold: get_env_f64("DECLINE_THRESHOLD", 0.90)?,
            },
            history: HistoryConfig {
                max_entries: get_env_usize("MAX_HISTORY_SIZE", 100)?,
                default_return_limit: get_env_usize("HISTORY_RETURN_LIMIT", 20)?,
            },
            analytics: AnalyticsConfig {
                avg_fraud_loss_usd: get_env_f64("AVG_FRAUD_LOSS_USD", 500.0)?,
            },
            service: ServiceConfig {
                environment: get_env_string("APP_ENV", "development")?,
            },
        })
    }

    /// Validate configuration values are within acceptable ranges
    pub fn validate(&self) -> Result<()> {
        // Server
        if self.server.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }

        // Thresholds
        if self.scoring.flag_threshold <= 0.0 || self.scoring.flag_threshold > 1.0 {
            anyhow::bail!("FLAG_THRESHOLD must be between 0.0 and 1.0");
        }
        if self.scoring.decline_threshold <= 0.0 || self.scoring.decline_threshold > 1.0 {
            anyhow::bail!("DECLINE_THRESHOLD must be between 0.0 and 1.0");
        }
        if self.scoring.flag_threshold >= self.scoring.decline_threshold {
            anyhow::bail!("FLAG_THRESHOLD must be below DECLINE_THRESHOLD");
        }

        // History
        if self.history.max_entries == 0 {
            anyhow::bail!("MAX_HISTORY_SIZE must be > 0");
        }
        if self.history.default_return_limit == 0 || self.history.default_return_limit > 100 {
            anyhow::bail!("HISTORY_RETURN_LIMIT must be between 1 and 100");
        }

        // Analytics
        if self.analytics.avg_fraud_loss_usd < 0.0 {
            anyhow::bail!("AVG_FRAUD_LOSS_USD must be ≥ 0");
        }

        // Service
        if !matches!(
            self.service.environment.as_str(),
            "development" | "staging" | "production"
        ) {
            log::warn!(
                "APP_ENV '{}' is not a recognized environment",
                self.service.environment
            );
        }

        Ok(())
    }
}

// Helper functions for environment variable parsing

fn get_env_string(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn get_env_u16(key: &str, default: u16) -> Result<u16> {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .or(Some(default))
        .context(format!("Invalid {} value", key))
}

fn get_env_usize(key: &str, default: usize) -> Result<usize> {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .or(Some(default))
        .context(format!("Invalid {} value", key))
}

fn get_env_f64(key: &str, default: f64) -> Result<f64> {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .or(Some(default))
        .context(format!("Invalid {} value", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Run this test separately: cargo test test_config_from_env_with_defaults -- --ignored
    fn test_config_from_env_with_defaults() {
        // Clean up any env vars from other tests
        env::remove_var("FLAG_THRESHOLD");

        let config = Config::from_env().expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.scoring.flag_threshold, 0.70);
        assert_eq!(config.scoring.decline_threshold, 0.90);
        assert_eq!(config.history.max_entries, 100);
        assert_eq!(config.history.default_return_limit, 20);
        assert_eq!(config.analytics.avg_fraud_loss_usd, 500.0);
        assert_eq!(config.service.environment, "development");
    }

    #[test]
    #[ignore] // Run this test separately: cargo test test_env_var_override -- --ignored
    fn test_env_var_override() {
        env::set_var("FLAG_THRESHOLD", "0.65");
        let config = Config::from_env().expect("Failed to load config");
        assert_eq!(config.scoring.flag_threshold, 0.65);
        // Clean up immediately
        env::remove_var("FLAG_THRESHOLD");

        let config2 = Config::from_env().expect("Failed to load config");
        assert_eq!(config2.scoring.flag_threshold, 0.70);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::from_env().expect("Failed to load config");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = Config::from_env().expect("Failed to load config");
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_threshold_range() {
        let mut config = Config::from_env().expect("Failed to load config");
        config.scoring.flag_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_threshold_order() {
        let mut config = Config::from_env().expect("Failed to load config");
        config.scoring.flag_threshold = 0.95;
        config.scoring.decline_threshold = 0.90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_history_limits() {
        let mut config = Config::from_env().expect("Failed to load config");
        config.history.max_entries = 0;
        assert!(config.validate().is_err());

        let mut config = Config::from_env().expect("Failed to load config");
        config.history.default_return_limit = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.bind_address(), "127.0.0.1:9000");
    }
}
