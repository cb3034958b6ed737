use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod client;
pub mod currency;
pub mod date;
pub mod logging;
pub mod store;

pub use client::{Config, ExchangeClient, ExchangeRateResult, FetchError, RateQuery};
pub use currency::{CurrencyCatalog, CurrencyCode};
pub use logging::Logger;
pub use store::{PersistedRecord, ResultPersister, SaveError};

/// Get the exchange rate between two currencies on a given date, and save it as JSON.
///
/// The rate is written to `<data-dir>/<FROM>_<TO>_<DATE>.json`, replacing any earlier result for
/// the same query. Errors are also appended to the log file.
#[derive(Parser)]
#[command(after_help = "Examples:
  fx_rate USD EUR 2025-03-15
  fx_rate MDL USD 2025-06-01
  fx_rate EUR RON 2025-01-01")]
pub struct Cli {
    /// Source currency code (e.g. USD, EUR)
    pub from_currency: String,
    /// Target currency code (e.g. USD, EUR)
    pub to_currency: String,
    /// Date in YYYY-MM-DD format (2025-01-01 to 2025-09-15)
    pub date: String,

    /// Base URL of the exchange service
    #[arg(long, default_value = client::DEFAULT_BASE_URL)]
    pub base_url: String,
    /// API key sent with every request
    #[arg(long, default_value = client::DEFAULT_API_KEY)]
    pub api_key: String,
    /// Seconds to wait for each request, 0 to wait indefinitely
    #[arg(long, value_name = "SECS", default_value_t = client::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
    /// Directory results are written to
    #[arg(long, value_name = "DIR", default_value = store::DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// File log lines are appended to
    #[arg(long, value_name = "PATH", default_value = "error.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
        }
    }
}

/// Why a run stopped. The `Display` text is what the user sees after `Error: `.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(
        "Invalid date '{0}'. Date must be in YYYY-MM-DD format and between 2025-01-01 and 2025-09-15."
    )]
    InvalidDate(String),
    #[error("Could not open log file {}: {source}", path.display())]
    Logging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not fetch available currencies. Check if the API service is running.")]
    Catalog(#[source] FetchError),
    #[error("Currency '{0}' is not available.")]
    Unavailable(CurrencyCode),
    #[error("Could not fetch exchange rate data.")]
    Rate(#[source] FetchError),
    #[error("Failed to save data.")]
    Save(#[source] SaveError),
    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

/// Validate the date, check both currencies are offered, then fetch and save the rate.
///
/// Progress and the final report go to `out`. Returns the path of the saved file.
pub fn run<W: Write>(args: &Cli, out: &mut W) -> Result<PathBuf, RunError> {
    let date = date::parse_query_date(&args.date)
        .ok_or_else(|| RunError::InvalidDate(args.date.clone()))?;

    let logger =
        Logger::to_stdout_and_file(&args.log_file).map_err(|source| RunError::Logging {
            path: args.log_file.clone(),
            source,
        })?;
    let client = ExchangeClient::new(args.config(), logger.clone());
    let persister = ResultPersister::new(&args.data_dir, logger);

    writeln!(out, "Fetching available currencies...")?;
    let currencies = client.list_currencies().map_err(RunError::Catalog)?;
    writeln!(out, "Available currencies: {currencies}")?;

    let query = RateQuery {
        from: CurrencyCode::new(&args.from_currency),
        to: CurrencyCode::new(&args.to_currency),
        date,
    };
    for code in [&query.from, &query.to] {
        if !currencies.contains(code) {
            return Err(RunError::Unavailable(code.clone()));
        }
    }

    writeln!(
        out,
        "Fetching exchange rate from {} to {} for {}...",
        query.from, query.to, query.date
    )?;
    let rate = client
        .fetch_rate(&query.from, &query.to, Some(query.date))
        .map_err(RunError::Rate)?;

    writeln!(out)?;
    writeln!(out, "Exchange Rate Information:")?;
    writeln!(out, "From: {}", rate.from)?;
    writeln!(out, "To: {}", rate.to)?;
    writeln!(out, "Rate: {}", rate.rate)?;
    writeln!(out, "Date: {}", rate.date)?;

    let path = persister.save(&rate, &query).map_err(RunError::Save)?;
    writeln!(out)?;
    writeln!(out, "Data successfully saved to {}", path.display())?;
    Ok(path)
}
