//! Rate provider backed by a remote JSON rate table.

use async_trait::async_trait;
use commission_common::{Currency, CurrencyPair, FxRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Validity attached to rates fetched from the remote table.
const FETCHED_RATE_VALIDITY_SECS: i64 = 3_600;

const PROVIDER_NAME: &str = "HTTP";

/// Wire form of the remote document:
/// `{"base": "EUR", "date": "...", "rates": {"USD": 1.1497, "JPY": 129.53}}`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    base: Option<String>,
    rates: HashMap<String, serde_json::Number>,
}

/// A table of quotes against a single base currency. Each quote is how
/// many units of that currency one unit of the base buys.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: Currency,
    pub quotes: HashMap<Currency, Decimal>,
}

impl RateTable {
    /// Parse a JSON rate document. A document without `base` is taken to
    /// be quoted against the reference currency.
    pub fn from_json(body: &str) -> FxResult<Self> {
        let response: RatesResponse = serde_json::from_str(body)
            .map_err(|e| FxError::MalformedResponse(e.to_string()))?;

        let base = response
            .base
            .map(Currency::new)
            .unwrap_or_else(Currency::reference);

        let mut quotes = HashMap::with_capacity(response.rates.len());
        for (code, number) in response.rates {
            let text = number.to_string();
            let value = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| FxError::MalformedResponse(format!("{code}: {e}")))?;
            quotes.insert(Currency::new(code), value);
        }

        Ok(Self { base, quotes })
    }

    fn quote(&self, currency: &Currency, pair: &CurrencyPair) -> FxResult<Decimal> {
        if *currency == self.base {
            return Ok(Decimal::ONE);
        }

        let quote = *self
            .quotes
            .get(currency)
            .ok_or_else(|| FxError::RateNotAvailable(pair.clone()))?;

        if quote <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency: currency.clone(),
                rate: quote,
            });
        }

        Ok(quote)
    }

    /// Units of `pair.quote` per one unit of `pair.base`.
    pub fn rate(&self, pair: &CurrencyPair) -> FxResult<Decimal> {
        if pair.is_identity() {
            return Ok(Decimal::ONE);
        }

        let from = self.quote(&pair.base, pair)?;
        let to = self.quote(&pair.quote, pair)?;

        Ok(to / from)
    }
}

/// Fetches the whole rate table on every lookup. Wrap it in a
/// [`CachedRateProvider`](crate::CachedRateProvider) to avoid refetching.
pub struct HttpRateProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpRateProvider {
    /// Create a provider reading from `url`, giving up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> FxResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the current rate table.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_table(&self) -> FxResult<RateTable> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                warn!(error = %e, "Rate source answered with an error");
                FxError::Request(e)
            })?;

        let body = response.text().await?;
        let table = RateTable::from_json(&body)?;

        debug!(base = %table.base, currencies = table.quotes.len(), "Fetched rate table");

        Ok(table)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<FxRate> {
        if pair.is_identity() {
            return Ok(FxRate::identity(pair.base.clone()));
        }

        let table = self.fetch_table().await?;
        let rate = table.rate(pair)?;

        Ok(FxRate::new(
            pair.clone(),
            rate,
            FETCHED_RATE_VALIDITY_SECS,
            PROVIDER_NAME,
        ))
    }
}
