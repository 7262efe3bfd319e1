//! Error types shared by the commission crates.

use crate::{Currency, CurrencyPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from monetary arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonetaryError {
    /// Operands are in different currencies.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// Rate cannot be used to convert (zero).
    #[error("Invalid rate {1} for {0}")]
    InvalidRate(CurrencyPair, Decimal),
}

/// Errors when reading enumerated operation fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown user type: `{0}`")]
    UnknownUserType(String),

    #[error("Unknown operation type: `{0}`")]
    UnknownOperationType(String),
}
