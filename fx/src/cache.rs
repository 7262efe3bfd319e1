//! FX rate caching with TTL support.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use commission_common::{CurrencyPair, FxRate};
use dashmap::DashMap;
use tracing::{debug, instrument};

use crate::error::FxResult;
use crate::provider::RateProvider;

/// Cached rate entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: FxRate,
    cached_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn new(rate: FxRate, ttl: Duration) -> Self {
        Self {
            rate,
            cached_at: Utc::now(),
            ttl,
        }
    }

    /// The cache TTL alone decides expiry; the quote's own validity window
    /// is ignored once cached.
    fn is_valid(&self) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age < self.ttl
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// Default TTL for cached rates.
    pub default_ttl: Duration,
    /// Maximum number of entries.
    pub max_entries: usize,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::hours(1),
            max_entries: 1024,
        }
    }
}

/// Thread-safe rate cache with TTL.
pub struct RateCache {
    cache: DashMap<CurrencyPair, CacheEntry>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a new rate cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(config: RateCacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            config,
        }
    }

    /// Get a rate from cache if valid.
    pub fn get(&self, pair: &CurrencyPair) -> Option<FxRate> {
        if let Some(entry) = self.cache.get(pair) {
            if entry.is_valid() {
                debug!(pair = %pair, "Cache hit");
                return Some(entry.rate.clone());
            }
            debug!(pair = %pair, "Cache entry expired");
            drop(entry);
            self.cache.remove(pair);
        }

        debug!(pair = %pair, "Cache miss");
        None
    }

    /// Insert a rate into cache.
    pub fn insert(&self, rate: FxRate) {
        self.insert_with_ttl(rate, self.config.default_ttl);
    }

    /// Insert a rate with custom TTL.
    pub fn insert_with_ttl(&self, rate: FxRate, ttl: Duration) {
        if self.cache.len() >= self.config.max_entries {
            self.evict_expired();
        }
        // Still full of live entries: drop one to stay within bounds.
        if self.cache.len() >= self.config.max_entries {
            let victim = self.cache.iter().next().map(|e| e.key().clone());
            if let Some(victim) = victim {
                self.cache.remove(&victim);
            }
        }

        let pair = rate.pair.clone();
        self.cache.insert(pair, CacheEntry::new(rate, ttl));
    }

    /// Remove a rate from cache.
    pub fn remove(&self, pair: &CurrencyPair) {
        self.cache.remove(pair);
    }

    /// Clear all cached rates.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        self.cache.retain(|_, entry| entry.is_valid());
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total = self.cache.len();
        let valid = self.cache.iter().filter(|e| e.is_valid()).count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Provider that answers from a [`RateCache`] and falls back to `inner`
/// on a miss, caching whatever `inner` returns.
pub struct CachedRateProvider<P> {
    inner: P,
    cache: RateCache,
}

impl<P: RateProvider> CachedRateProvider<P> {
    /// Wrap `inner` with a cache using the default configuration.
    pub fn new(inner: P) -> Self {
        Self::with_config(inner, RateCacheConfig::default())
    }

    /// Wrap `inner` with a cache using `config`.
    pub fn with_config(inner: P, config: RateCacheConfig) -> Self {
        Self {
            inner,
            cache: RateCache::with_config(config),
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }
}

#[async_trait]
impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[instrument(skip_all, fields(pair = %pair))]
    async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<FxRate> {
        if let Some(cached) = self.cache.get(pair) {
            return Ok(cached);
        }

        let rate = self.inner.get_rate(pair).await?;
        self.cache.insert(rate.clone());

        Ok(rate)
    }
}
