//! Commission FX
//!
//! Exchange rate lookup used to compare withdrawals against the weekly
//! free allowance in the reference currency.
//!
//! # Providers
//!
//! - [`FixedRateProvider`]: in-memory table, for tests and offline runs
//! - [`HttpRateProvider`]: fetches the current rate table over HTTP
//! - [`CachedRateProvider`]: wraps any provider with a TTL cache
//!
//! # Example
//!
//! ```rust,ignore
//! use commission_fx::{CachedRateProvider, HttpRateProvider, RateProvider};
//! use commission_common::{Currency, CurrencyPair};
//!
//! let provider = CachedRateProvider::new(HttpRateProvider::new(url, timeout)?);
//! let rate = provider.get_rate(&CurrencyPair::to_reference(Currency::usd())).await?;
//! ```

pub mod provider;
pub mod cache;
pub mod http;
pub mod error;

pub use provider::{FixedRateProvider, RateProvider};
pub use cache::{CachedRateProvider, RateCache, RateCacheConfig};
pub use http::{HttpRateProvider, RateTable};
pub use error::{FxError, FxResult};
