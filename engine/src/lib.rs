//! Commission Engine
//!
//! Computes the commission charged on each deposit and withdrawal of a
//! batch of operations.
//!
//! Operations are first recorded into an [`OperationStore`], then every
//! operation is priced in input order by the [`CommissionCalculator`],
//! which consults the store for the user's weekly withdrawal count and a
//! [`RateProvider`] for conversions into the reference currency.

pub mod calculator;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod policy;
pub mod store;

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use commission_common::{Money, Operation};
use commission_fx::{CachedRateProvider, FxResult, HttpRateProvider, RateCacheConfig, RateProvider};
use tracing::{error, info, instrument};

pub use calculator::CommissionCalculator;
pub use config::EngineConfig;
pub use error::{CommissionError, IngestError, Result};
pub use policy::FeePolicy;
pub use store::OperationStore;

/// Price every operation, returning commissions in input order.
///
/// The whole batch is recorded before any commission is computed. The
/// first failure aborts the batch.
#[instrument(skip_all, fields(operations = operations.len(), provider = rates.name()))]
pub async fn calculate_commissions(
    operations: &[Operation],
    rates: &dyn RateProvider,
    policy: &FeePolicy,
) -> Result<Vec<Money>> {
    let store = OperationStore::from_operations(operations);
    let calculator = CommissionCalculator::new(&store, rates, policy);

    let mut commissions = Vec::with_capacity(operations.len());
    for (index, op) in operations.iter().enumerate() {
        match calculator.compute_commission(op).await {
            Ok(commission) => commissions.push(commission),
            Err(e) => {
                error!(row = index + 1, operation = %op, error = %e, "Aborting batch");
                return Err(e);
            }
        }
    }

    info!(users = store.user_count(), "Computed commissions");
    Ok(commissions)
}

/// Read operations from `reader`, price them and write one commission per
/// line to `writer`. Nothing is written unless the whole batch succeeds.
pub async fn execute<R: Read, W: Write>(
    reader: R,
    writer: W,
    rates: &dyn RateProvider,
    policy: &FeePolicy,
) -> Result<()> {
    let operations = ingest::read_operations(reader)?;
    price_and_write(&operations, writer, rates, policy).await
}

/// [`execute`] over the file at `path`. A missing file fails as an
/// ingestion error before any operation is priced.
pub async fn execute_path<P: AsRef<Path>, W: Write>(
    path: P,
    writer: W,
    rates: &dyn RateProvider,
    policy: &FeePolicy,
) -> Result<()> {
    let operations = ingest::read_operations_from_path(path)?;
    price_and_write(&operations, writer, rates, policy).await
}

async fn price_and_write<W: Write>(
    operations: &[Operation],
    writer: W,
    rates: &dyn RateProvider,
    policy: &FeePolicy,
) -> Result<()> {
    let commissions = calculate_commissions(operations, rates, policy).await?;
    output::write_commissions(&commissions, writer)?;
    Ok(())
}

/// HTTP rate source wrapped in a TTL cache, as configured.
pub fn live_rate_provider(config: &config::RatesConfig) -> FxResult<Arc<dyn RateProvider>> {
    let source = HttpRateProvider::new(config.url.clone(), config.http_timeout)?;
    let cache = RateCacheConfig {
        default_ttl: chrono::Duration::from_std(config.cache_ttl)
            .unwrap_or_else(|_| chrono::Duration::days(365)),
        max_entries: config.cache_max_entries,
    };
    Ok(Arc::new(CachedRateProvider::with_config(source, cache)))
}
