//! Configuration to wire conversion.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use commerce_discounts_core::{
    CurrencyCode, CurrencyCodeError, Money, ProductDiscountDraft, ProductDiscountValue, ValueType,
};
use thiserror::Error;

use super::data::{MoneyBlock, ProductDiscountConfig, ValueBlock};

/// Format of `valid_from` / `valid_until` in configuration and state.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors turning configuration into a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// `value.type` is not a known discount type.
    #[error("Unknown product discount type {0:?}")]
    UnknownValueType(String),

    /// `value` must hold exactly one block.
    #[error("Expected exactly one value block, found {0}")]
    ValueCount(usize),

    /// A `relative` value without `permyriad`.
    #[error("A relative value requires permyriad")]
    MissingPermyriad,

    /// An `absolute` value without money entries.
    #[error("An absolute value requires at least one money entry")]
    MissingMoney,

    /// A money entry with a malformed currency code.
    #[error("Invalid currency code {code:?}: {source}")]
    InvalidCurrency {
        /// The rejected code.
        code: String,
        /// Why it was rejected.
        #[source]
        source: CurrencyCodeError,
    },

    /// A validity bound that is not a `YYYY-MM-DD` date.
    #[error("Invalid date {value:?} for {field}: expected YYYY-MM-DD")]
    InvalidDate {
        /// Attribute name.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Build the creation payload for a configuration.
///
/// # Errors
///
/// Returns an error if the value block or a validity date is malformed.
pub fn expand_draft(config: &ProductDiscountConfig) -> Result<ProductDiscountDraft, ExpandError> {
    Ok(ProductDiscountDraft {
        name: config.name.clone(),
        key: config.key.clone(),
        description: config.description.clone(),
        value: expand_value(&config.value)?,
        predicate: config.predicate.clone(),
        sort_order: config.sort_order.clone(),
        is_active: config.is_active,
        valid_from: expand_optional_date("valid_from", config.valid_from.as_deref())?,
        valid_until: expand_optional_date("valid_until", config.valid_until.as_deref())?,
    })
}

/// Convert the `value` list into a discount value.
///
/// # Errors
///
/// Returns an error unless the list holds exactly one well-formed block.
pub fn expand_value(blocks: &[ValueBlock]) -> Result<ProductDiscountValue, ExpandError> {
    match blocks {
        [block] => expand_value_block(block),
        _ => Err(ExpandError::ValueCount(blocks.len())),
    }
}

/// Convert a single value block.
///
/// Payload fields that do not belong to the block's type are ignored.
///
/// # Errors
///
/// Returns an error for an unknown type or a missing payload.
pub fn expand_value_block(block: &ValueBlock) -> Result<ProductDiscountValue, ExpandError> {
    let value_type: ValueType = block
        .value_type
        .parse()
        .map_err(|_| ExpandError::UnknownValueType(block.value_type.clone()))?;

    match value_type {
        ValueType::External => Ok(ProductDiscountValue::External),
        ValueType::Relative => {
            let permyriad = block.permyriad.ok_or(ExpandError::MissingPermyriad)?;
            Ok(ProductDiscountValue::Relative { permyriad })
        }
        ValueType::Absolute => {
            if block.money.is_empty() {
                return Err(ExpandError::MissingMoney);
            }
            let money = block
                .money
                .iter()
                .map(expand_money)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ProductDiscountValue::Absolute { money })
        }
    }
}

fn expand_money(block: &MoneyBlock) -> Result<Money, ExpandError> {
    let currency_code =
        CurrencyCode::parse(&block.currency_code).map_err(|source| ExpandError::InvalidCurrency {
            code: block.currency_code.clone(),
            source,
        })?;
    Ok(Money::new(block.cent_amount, currency_code))
}

/// Parse a `YYYY-MM-DD` date into UTC midnight of that day.
///
/// # Errors
///
/// Returns `ExpandError::InvalidDate` for anything but a zero-padded
/// calendar date.
pub fn expand_date(field: &'static str, value: &str) -> Result<DateTime<Utc>, ExpandError> {
    let invalid = || ExpandError::InvalidDate {
        field,
        value: value.to_string(),
    };

    // chrono accepts unpadded months and days; state must round-trip exactly
    if value.len() != 10 {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Like [`expand_date`], treating an absent bound as unset.
///
/// # Errors
///
/// Returns `ExpandError::InvalidDate` if a present value is malformed.
pub fn expand_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ExpandError> {
    value.map(|v| expand_date(field, v)).transpose()
}
