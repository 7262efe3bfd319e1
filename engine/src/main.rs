//! Commission fee calculator binary.
//!
//! Reads operations from a CSV file and prints the commission of each one,
//! in input order, to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commission_engine::config::LogConfig;
use commission_engine::{execute_path, live_rate_provider, EngineConfig};
use commission_fx::{FixedRateProvider, RateProvider};

/// Calculate commission fees for deposits and withdrawals
#[derive(Parser, Debug)]
#[command(name = "fees", version)]
#[command(about = "Calculate commission fees based on CSV input")]
struct Args {
    /// CSV file of operations: date,user_id,user_type,operation_type,amount,currency
    input: PathBuf,

    /// URL of the JSON rate table
    #[arg(long)]
    rates_url: Option<String>,

    /// Seconds a fetched rate is reused
    #[arg(long)]
    cache_ttl_secs: Option<u64>,

    /// Fixed rate into EUR, e.g. `USD=0.87`; repeatable. Disables fetching.
    #[arg(long = "rate", value_name = "CODE=RATE", value_parser = parse_fixed_rate)]
    rates: Vec<(String, Decimal)>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn parse_fixed_rate(s: &str) -> Result<(String, Decimal), String> {
    let (code, rate) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=RATE, got `{s}`"))?;
    let rate: Decimal = rate
        .trim()
        .parse()
        .map_err(|e| format!("invalid rate `{rate}`: {e}"))?;
    if rate <= Decimal::ZERO {
        return Err(format!("rate for {code} must be positive"));
    }
    Ok((code.trim().to_string(), rate))
}

fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the commissions
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::from_env();
    if let Some(url) = args.rates_url {
        config.rates.url = url;
    }
    if let Some(ttl) = args.cache_ttl_secs {
        config.rates.cache_ttl = std::time::Duration::from_secs(ttl);
    }
    config.log.json |= args.log_json;

    init_logging(&config.log);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let rates: Arc<dyn RateProvider> = if args.rates.is_empty() {
        info!(url = %config.rates.url, "Using live rates");
        live_rate_provider(&config.rates).context("Failed to set up rate source")?
    } else {
        let table = args
            .rates
            .into_iter()
            .fold(FixedRateProvider::new("FIXED"), |table, (code, rate)| {
                table.with_rate(code.as_str(), rate)
            });
        info!(currencies = table.len(), "Using fixed rates");
        Arc::new(table)
    };

    let stdout = std::io::stdout();
    if let Err(e) = execute_path(&args.input, stdout.lock(), rates.as_ref(), &config.policy).await {
        error!(error = %e, "Commission calculation failed");
        return Err(e.into());
    }

    Ok(())
}
