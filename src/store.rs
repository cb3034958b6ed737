use crate::client::{ExchangeRateResult, RateQuery};
use crate::currency::CurrencyCode;
use crate::logging::Logger;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "data";

/// What was asked for, and when it was saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub date: String,
    pub timestamp: DateTime,
}

/// The on-disk form of one fetched rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub request: RecordedRequest,
    pub response: ExchangeRateResult,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes each fetched rate to `<dir>/<FROM>_<TO>_<DATE>.json`, replacing any earlier file.
pub struct ResultPersister {
    dir: PathBuf,
    logger: Logger,
}

impl ResultPersister {
    pub fn new(dir: impl Into<PathBuf>, logger: Logger) -> Self {
        ResultPersister {
            dir: dir.into(),
            logger,
        }
    }

    /// Path the record for `query` is written to.
    pub fn path_for(&self, query: &RateQuery) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}.json", query.from, query.to, query.date))
    }

    pub fn save(
        &self,
        response: &ExchangeRateResult,
        query: &RateQuery,
    ) -> Result<PathBuf, SaveError> {
        let result = self.write(response, query);
        match &result {
            Ok(path) => self
                .logger
                .info(format_args!("Data saved to {}", path.display())),
            Err(e) => self.logger.error(format_args!("Error saving data: {e}")),
        }
        result
    }

    fn write(&self, response: &ExchangeRateResult, query: &RateQuery) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(&self.dir).map_err(|source| SaveError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let record = PersistedRecord {
            request: RecordedRequest {
                from_currency: query.from.clone(),
                to_currency: query.to.clone(),
                date: query.date.to_string(),
                timestamp: jiff::Zoned::now().datetime(),
            },
            response: response.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        let path = self.path_for(query);
        fs::write(&path, json).map_err(|source| SaveError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
