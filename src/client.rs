use crate::currency::{CurrencyCatalog, CurrencyCode};
use crate::logging::Logger;
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::io::ErrorKind;
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_KEY: &str = "EXAMPLE_API_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the exchange service lives and how to authenticate with it.
#[derive(Clone, Debug)]
pub struct Config {
    /// Endpoint to query
    pub base_url: String,
    /// Credential sent as the `key` form field with every request
    pub api_key: String,
    /// Upper bound on a whole request, `None` to wait indefinitely
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// A currency pair on a given day.
#[derive(Clone, Debug, PartialEq)]
pub struct RateQuery {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub date: Date,
}

/// The `data` payload of a successful rate request.
///
/// The typed fields are read out for display. The payload itself is kept as sent and is what gets
/// serialized, so a stored response always equals the service's.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ExchangeRateResult {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Value of 1 unit of `from` in `to`
    pub rate: Decimal,
    pub date: String,
    payload: Value,
}

#[derive(Deserialize)]
struct RateFields {
    from: CurrencyCode,
    to: CurrencyCode,
    rate: Decimal,
    date: String,
}

impl ExchangeRateResult {
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl TryFrom<Value> for ExchangeRateResult {
    type Error = serde_json::Error;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let RateFields {
            from,
            to,
            rate,
            date,
        } = RateFields::deserialize(&payload)?;
        Ok(ExchangeRateResult {
            from,
            to,
            rate,
            date,
            payload,
        })
    }
}

impl Serialize for ExchangeRateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

/// A decoded response body: either the payload or the message of its `error` field.
#[derive(Debug, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Value,
    data: Option<Value>,
}

/// Decode a response body, checking the `error` field before anything else.
pub fn decode_response(body: &str) -> Result<ApiResponse<Option<Value>>, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(if is_truthy(&envelope.error) {
        ApiResponse::Failure(match envelope.error {
            Value::String(message) => message,
            other => other.to_string(),
        })
    } else {
        ApiResponse::Success(envelope.data)
    })
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection error: unable to connect to {base_url}. Make sure the API service is running")]
    Unreachable {
        base_url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("network error: {0}")]
    Transport(#[source] ureq::Error),
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("response carried no data")]
    MissingData,
}

/// Blocking client for the currency-exchange service.
pub struct ExchangeClient {
    config: Config,
    agent: Agent,
    logger: Logger,
}

impl ExchangeClient {
    pub fn new(config: Config, logger: Logger) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(config.timeout)
            .build()
            .into();
        ExchangeClient {
            config,
            agent,
            logger,
        }
    }

    /// List the currencies the service can quote.
    ///
    /// A response without `data` yields an empty catalog rather than an error.
    pub fn list_currencies(&self) -> Result<CurrencyCatalog, FetchError> {
        let url = format!("{}?currencies", self.root_url());
        let result = self.post(&url, &[]).and_then(|data| match data {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => {
                self.logger
                    .warn(format_args!("Currency listing carried no data, treating as empty"));
                Ok(CurrencyCatalog::default())
            }
        });

        result.inspect_err(|e| {
            self.logger
                .error(format_args!("Error getting currencies: {e}"))
        })
    }

    /// Fetch the rate for one currency pair, optionally on a given date.
    pub fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: Option<Date>,
    ) -> Result<ExchangeRateResult, FetchError> {
        let from = from.as_str().to_uppercase();
        let to = to.as_str().to_uppercase();
        let date = date.map(|date| date.to_string());

        let mut params = vec![("from", from.as_str()), ("to", to.as_str())];
        if let Some(date) = &date {
            params.push(("date", date.as_str()));
        }

        let result = self
            .post(&self.root_url(), &params)
            .and_then(|data| match data {
                Some(data) => Ok(ExchangeRateResult::try_from(data)?),
                None => Err(FetchError::MissingData),
            });

        result.inspect_err(|e| {
            self.logger
                .error(format_args!("Error getting exchange rate: {e}"))
        })
    }

    fn root_url(&self) -> String {
        format!("{}/", self.config.base_url.trim_end_matches('/'))
    }

    /// POST the API key to `url` and return the `data` field of a successful response.
    fn post(&self, url: &str, params: &[(&str, &str)]) -> Result<Option<Value>, FetchError> {
        let mut request = self.agent.post(url);
        for (key, value) in params {
            request = request.query(key, value);
        }

        let mut resp = request
            .send_form([("key", self.config.api_key.as_str())])
            .map_err(|e| self.classify(e))?;
        let body = resp
            .body_mut()
            .read_to_string()
            .map_err(|e| self.classify(e))?;

        match decode_response(&body)? {
            ApiResponse::Success(data) => Ok(data),
            ApiResponse::Failure(message) => Err(FetchError::Api(message)),
        }
    }

    fn classify(&self, error: ureq::Error) -> FetchError {
        let unreachable = match &error {
            ureq::Error::HostNotFound => true,
            ureq::Error::Io(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::NotConnected
                    | ErrorKind::AddrNotAvailable
            ),
            _ => false,
        };

        if unreachable {
            FetchError::Unreachable {
                base_url: self.config.base_url.clone(),
                source: error,
            }
        } else {
            FetchError::Transport(error)
        }
    }
}
