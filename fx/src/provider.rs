//! Rate provider trait and the fixed-table implementation.

use async_trait::async_trait;
use commission_common::{Currency, CurrencyPair, FxRate};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::error::{FxError, FxResult};

/// How long a rate from a fixed table stays valid once quoted.
const FIXED_RATE_VALIDITY_SECS: i64 = 86_400;

/// Trait for FX rate providers.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the rate for a currency pair. Fails with
    /// [`FxError::RateNotAvailable`] when the pair cannot be resolved.
    async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<FxRate>;
}

#[async_trait]
impl<P: RateProvider + ?Sized> RateProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<FxRate> {
        (**self).get_rate(pair).await
    }
}

/// Fixed table of rates into the reference currency.
///
/// A rate of `1.2` for `USD` means one US dollar is worth 1.2 units of the
/// reference currency. Pairs not involving the reference currency are
/// crossed through it.
pub struct FixedRateProvider {
    name: String,
    rates: DashMap<Currency, Decimal>,
}

impl FixedRateProvider {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
        }
    }

    /// Builder form of [`FixedRateProvider::set_rate`].
    pub fn with_rate(self, currency: impl Into<Currency>, rate: Decimal) -> Self {
        self.set_rate(currency, rate);
        self
    }

    /// Set how many reference units one unit of `currency` is worth.
    pub fn set_rate(&self, currency: impl Into<Currency>, rate: Decimal) {
        self.rates.insert(currency.into(), rate);
    }

    /// Number of currencies in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn to_reference(&self, currency: &Currency, pair: &CurrencyPair) -> FxResult<Decimal> {
        if currency.is_reference() {
            return Ok(Decimal::ONE);
        }

        let rate = self
            .rates
            .get(currency)
            .map(|r| *r)
            .ok_or_else(|| FxError::RateNotAvailable(pair.clone()))?;

        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency: currency.clone(),
                rate,
            });
        }

        Ok(rate)
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<FxRate> {
        if pair.is_identity() {
            return Ok(FxRate::identity(pair.base.clone()));
        }

        let base = self.to_reference(&pair.base, pair)?;
        let quote = self.to_reference(&pair.quote, pair)?;
        let rate = base / quote;

        debug!(provider = %self.name, pair = %pair, rate = %rate, "Resolved fixed rate");

        Ok(FxRate::new(
            pair.clone(),
            rate,
            FIXED_RATE_VALIDITY_SECS,
            self.name.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider() -> FixedRateProvider {
        FixedRateProvider::new("test")
            .with_rate("USD", dec!(0.8))
            .with_rate("JPY", dec!(0.008))
    }

    #[tokio::test]
    async fn test_rate_to_reference() {
        let pair = CurrencyPair::to_reference(Currency::usd());
        let rate = provider().get_rate(&pair).await.unwrap();

        assert_eq!(rate.pair, pair);
        assert_eq!(rate.rate, dec!(0.8));
        assert_eq!(rate.source, "test");
        assert!(rate.is_valid());
    }

    #[tokio::test]
    async fn test_rate_from_reference() {
        let pair = CurrencyPair::new(Currency::eur(), Currency::usd());
        let rate = provider().get_rate(&pair).await.unwrap();

        assert_eq!(rate.rate, dec!(1.25));
    }

    #[tokio::test]
    async fn test_cross_rate() {
        let pair = CurrencyPair::new(Currency::usd(), Currency::jpy());
        let rate = provider().get_rate(&pair).await.unwrap();

        assert_eq!(rate.rate, dec!(100));
    }

    #[tokio::test]
    async fn test_identity_needs_no_table() {
        let empty = FixedRateProvider::new("empty");
        let pair = CurrencyPair::new(Currency::jpy(), Currency::jpy());

        let rate = empty.get_rate(&pair).await.unwrap();
        assert_eq!(rate.rate, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_rate_not_available() {
        let pair = CurrencyPair::to_reference(Currency::new("GBP"));
        let result = provider().get_rate(&pair).await;

        assert!(matches!(result, Err(FxError::RateNotAvailable(p)) if p == pair));
    }

    #[tokio::test]
    async fn test_non_positive_rate_rejected() {
        let provider = FixedRateProvider::new("test").with_rate("USD", Decimal::ZERO);
        let pair = CurrencyPair::to_reference(Currency::usd());

        assert!(matches!(
            provider.get_rate(&pair).await,
            Err(FxError::InvalidRate { .. })
        ));
    }

    #[tokio::test]
    async fn test_shared_provider() {
        let shared: Arc<dyn RateProvider> = Arc::new(provider());
        let pair = CurrencyPair::to_reference(Currency::usd());

        assert_eq!(shared.name(), "test");
        assert_eq!(shared.get_rate(&pair).await.unwrap().rate, dec!(0.8));
    }
}
