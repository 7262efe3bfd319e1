//! Calculator configuration.

use std::time::Duration;

use crate::policy::FeePolicy;

/// Public endpoint serving the current EUR-based rate table.
pub const DEFAULT_RATES_URL: &str =
    "https://developers.paysera.com/tasks/api/currency-exchange-rates";

/// Rate source configuration.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    /// URL of the JSON rate table.
    pub url: String,
    /// How long a fetched rate is reused.
    pub cache_ttl: Duration,
    /// Maximum number of cached currency pairs.
    pub cache_max_entries: usize,
    /// Timeout for a single rate table request.
    pub http_timeout: Duration,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RATES_URL.to_string(),
            cache_ttl: Duration::from_secs(3600),
            cache_max_entries: 1024,
            http_timeout: Duration::from_secs(10),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of plain text.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Rate source configuration.
    pub rates: RatesConfig,
    /// Fee rule table.
    pub policy: FeePolicy,
    /// Logging configuration.
    pub log: LogConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FEES_RATES_URL") {
            config.rates.url = url;
        }

        if let Ok(ttl) = std::env::var("FEES_CACHE_TTL_SECS") {
            if let Ok(ttl) = ttl.parse() {
                config.rates.cache_ttl = Duration::from_secs(ttl);
            }
        }

        if let Ok(timeout) = std::env::var("FEES_HTTP_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                config.rates.http_timeout = Duration::from_secs(timeout);
            }
        }

        if let Ok(level) = std::env::var("FEES_LOG_LEVEL") {
            config.log.level = level;
        }

        if let Ok(json) = std::env::var("FEES_LOG_JSON") {
            config.log.json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.rates.url.is_empty() {
            return Err("Rates URL cannot be empty".to_string());
        }

        if self.rates.cache_ttl.is_zero() {
            return Err("Rate cache TTL cannot be zero".to_string());
        }

        if self.rates.cache_max_entries == 0 {
            return Err("Rate cache must hold at least one entry".to_string());
        }

        if self.rates.http_timeout.is_zero() {
            return Err("HTTP timeout cannot be zero".to_string());
        }

        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rates.url, DEFAULT_RATES_URL);
        assert_eq!(config.rates.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = EngineConfig::default();
        config.rates.cache_ttl = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.rates.url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_policy_fails_validation() {
        let mut config = EngineConfig::default();
        config.policy.private_withdraw_rate = -config.policy.private_withdraw_rate;
        assert!(config.validate().is_err());
    }
}
