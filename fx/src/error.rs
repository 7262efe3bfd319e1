//! FX error types.

use commission_common::{Currency, CurrencyPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while looking up rates.
#[derive(Debug, Error)]
pub enum FxError {
    /// Rate not available for the requested currency pair.
    #[error("Rate not available for {0}")]
    RateNotAvailable(CurrencyPair),

    /// The source quoted a zero or negative rate.
    #[error("Invalid rate {rate} quoted for {currency}")]
    InvalidRate { currency: Currency, rate: Decimal },

    /// The rate source could not be reached or answered with an error.
    #[error("Rate source request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The rate source answered with a body we cannot read.
    #[error("Malformed rate response: {0}")]
    MalformedResponse(String),
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
