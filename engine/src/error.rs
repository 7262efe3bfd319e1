//! Engine error types.

use commission_common::{Currency, FieldError, MonetaryError};
use commission_fx::FxError;
use thiserror::Error;

/// Failure reading operations from input.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot open input `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Line {line}: invalid {field} `{value}`")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: {source}")]
    UnknownVariant {
        line: u64,
        #[source]
        source: FieldError,
    },
}

/// Failure computing a commission.
#[derive(Error, Debug)]
pub enum CommissionError {
    /// No rate could be obtained for a conversion the rules require.
    #[error("Rate unavailable for {currency}: {source}")]
    RateUnavailable {
        currency: Currency,
        #[source]
        source: FxError,
    },

    #[error(transparent)]
    Monetary(#[from] MonetaryError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CommissionError>;
