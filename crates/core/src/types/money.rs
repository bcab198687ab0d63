//! Money amounts in cent precision.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyCodeError {
    /// The input is not exactly three characters long.
    #[error("currency code must be exactly 3 characters (got {0})")]
    InvalidLength(usize),
    /// The input contains something other than upper-case ASCII letters.
    #[error("currency code must consist of upper-case letters A-Z")]
    InvalidCharacters,
}

/// ISO 4217 currency code (e.g., "EUR", "USD").
///
/// Only the shape is checked here. Whether the project actually has the
/// currency enabled is decided by the server.
///
/// ```
/// use commerce_discounts_core::CurrencyCode;
///
/// assert!(CurrencyCode::parse("EUR").is_ok());
/// assert!(CurrencyCode::parse("eur").is_err());
/// assert!(CurrencyCode::parse("EURO").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not three upper-case ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        if s.len() != 3 {
            return Err(CurrencyCodeError::InvalidLength(s.chars().count()));
        }
        if !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(CurrencyCodeError::InvalidCharacters);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A monetary amount in the smallest currency unit.
///
/// Drafts only need `centAmount` and `currencyCode`. Responses additionally
/// carry `type` and `fractionDigits`, which are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in cents (or the currency's smallest unit).
    pub cent_amount: i64,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(cent_amount: i64, currency_code: CurrencyCode) -> Self {
        Self {
            cent_amount,
            currency_code,
        }
    }
}
