//! Configuration and state shapes of the `product_discount` resource.
//!
//! These mirror the declarative schema: dates are `YYYY-MM-DD` strings and
//! the discount value is a list of blocks, exactly one of which is expected.
//! Conversion to and from the wire types lives in `expand` and `flatten`.

use std::collections::BTreeMap;

use commerce_discounts_core::{LocalizedString, ProductDiscountId};
use serde::{Deserialize, Serialize};

/// Attributes outside the schema, keyed by name.
///
/// Kept so validation can reject them instead of a typo silently falling
/// back to a default.
pub type UnknownAttributes = BTreeMap<String, serde_json::Value>;

/// Predicate applied when the configuration does not set one.
pub const DEFAULT_PREDICATE: &str = "1=1";

fn default_predicate() -> String {
    DEFAULT_PREDICATE.to_string()
}

/// Desired attributes of a product discount, as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscountConfig {
    /// Localized display name.
    pub name: LocalizedString,

    /// User-defined unique key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Localized description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,

    /// Product predicate selecting the discounted prices.
    #[serde(default = "default_predicate")]
    pub predicate: String,

    /// Decimal between 0 and 1 ordering overlapping discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    /// Whether the discount is applied.
    #[serde(default)]
    pub is_active: bool,

    /// First day the discount is valid, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,

    /// Last day the discount is valid, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,

    /// Discount value blocks.
    #[serde(default)]
    pub value: Vec<ValueBlock>,

    /// Attributes not in the schema.
    #[serde(flatten)]
    pub unknown: UnknownAttributes,
}

impl Default for ProductDiscountConfig {
    fn default() -> Self {
        Self {
            name: LocalizedString::new(),
            key: None,
            description: None,
            predicate: default_predicate(),
            sort_order: None,
            is_active: false,
            valid_from: None,
            valid_until: None,
            value: Vec::new(),
            unknown: UnknownAttributes::new(),
        }
    }
}

/// One `value` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBlock {
    /// One of `external`, `relative`, `absolute`.
    #[serde(rename = "type")]
    pub value_type: String,

    /// Amounts for an `absolute` discount.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub money: Vec<MoneyBlock>,

    /// Fraction for a `relative` discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permyriad: Option<i64>,

    /// Attributes not in the schema.
    #[serde(flatten)]
    pub unknown: UnknownAttributes,
}

impl ValueBlock {
    /// An `external` block.
    #[must_use]
    pub fn external() -> Self {
        Self {
            value_type: "external".to_string(),
            ..Self::default()
        }
    }

    /// A `relative` block.
    #[must_use]
    pub fn relative(permyriad: i64) -> Self {
        Self {
            value_type: "relative".to_string(),
            permyriad: Some(permyriad),
            ..Self::default()
        }
    }

    /// An `absolute` block.
    #[must_use]
    pub fn absolute(money: Vec<MoneyBlock>) -> Self {
        Self {
            value_type: "absolute".to_string(),
            money,
            ..Self::default()
        }
    }
}

/// One `value.money` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyBlock {
    /// Amount in the currency's smallest unit.
    pub cent_amount: i64,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency_code: String,

    /// Attributes not in the schema.
    #[serde(flatten)]
    pub unknown: UnknownAttributes,
}

impl MoneyBlock {
    /// Create a money entry.
    #[must_use]
    pub fn new(cent_amount: i64, currency_code: impl Into<String>) -> Self {
        Self {
            cent_amount,
            currency_code: currency_code.into(),
            unknown: UnknownAttributes::new(),
        }
    }
}

/// Persisted state of one product discount.
///
/// `id` is `None` until the discount has been created (or after it was
/// deleted or found missing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductDiscountId>,

    /// Server-assigned version used for optimistic concurrency.
    #[serde(default)]
    pub version: i64,

    /// Last observed attributes.
    #[serde(flatten)]
    pub attributes: ProductDiscountConfig,
}

impl ResourceData {
    /// State for a resource that exists remotely with the given identity.
    #[must_use]
    pub fn with_id(id: ProductDiscountId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Whether this state refers to an existing remote object.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Forget the remote identity.
    pub fn clear_identity(&mut self) {
        self.id = None;
        self.version = 0;
    }
}
