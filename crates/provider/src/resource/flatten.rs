//! Wire to configuration conversion.

use chrono::{DateTime, Utc};
use commerce_discounts_core::{ProductDiscount, ProductDiscountValue};

use super::data::{MoneyBlock, ResourceData, ValueBlock};
use super::expand::DATE_FORMAT;

/// Convert a discount value into its single-block list form.
#[must_use]
pub fn flatten_value(value: &ProductDiscountValue) -> Vec<ValueBlock> {
    let block = match value {
        ProductDiscountValue::External => ValueBlock::external(),
        ProductDiscountValue::Relative { permyriad } => ValueBlock::relative(*permyriad),
        ProductDiscountValue::Absolute { money } => ValueBlock::absolute(
            money
                .iter()
                .map(|m| MoneyBlock::new(m.cent_amount, m.currency_code.as_str()))
                .collect(),
        ),
    };
    vec![block]
}

/// Render the date part of a timestamp as `YYYY-MM-DD`.
#[must_use]
pub fn flatten_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.date_naive().format(DATE_FORMAT).to_string()
}

/// Copy every remote field into local state.
pub fn apply_remote(state: &mut ResourceData, remote: &ProductDiscount) {
    state.id = Some(remote.id.clone());
    state.version = remote.version;

    let attributes = &mut state.attributes;
    attributes.name = remote.name.clone();
    attributes.key = remote.key.clone();
    attributes.description = remote.description.clone().filter(|d| !d.is_empty());
    attributes.predicate = remote.predicate.clone();
    attributes.sort_order = remote.sort_order.clone();
    attributes.is_active = remote.is_active;
    attributes.valid_from = remote.valid_from.as_ref().map(flatten_date);
    attributes.valid_until = remote.valid_until.as_ref().map(flatten_date);
    attributes.value = flatten_value(&remote.value);
}
