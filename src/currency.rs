use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency code such as `USD`.
///
/// Codes built from user input are uppercased. Codes decoded from the exchange service are kept
/// exactly as sent, so comparisons ignore ASCII case.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for CurrencyCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currencies the exchange service can quote, as returned by the listing endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCatalog(Vec<CurrencyCode>);

impl CurrencyCatalog {
    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.0.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<CurrencyCode> for CurrencyCatalog {
    fn from_iter<I: IntoIterator<Item = CurrencyCode>>(iter: I) -> Self {
        CurrencyCatalog(iter.into_iter().collect())
    }
}

impl fmt::Display for CurrencyCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}")?;
        }
        Ok(())
    }
}
