//! Product discount domain types for the commercetools HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductDiscountId;
use super::localized::LocalizedString;
use super::money::Money;

// =============================================================================
// Discount Value
// =============================================================================

/// How a product discount reduces the price.
///
/// Exactly one variant is active per discount. On the wire the variant is
/// selected by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProductDiscountValue {
    /// The discounted price is supplied by an external system.
    External,
    /// Fixed amount off, one entry per currency.
    Absolute {
        /// Amount to subtract, per currency.
        money: Vec<Money>,
    },
    /// Fraction off, in parts per ten thousand (1000 = 10%).
    Relative {
        /// Discount in permyriad.
        permyriad: i64,
    },
}

/// Discriminant of [`ProductDiscountValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// See [`ProductDiscountValue::External`].
    External,
    /// See [`ProductDiscountValue::Relative`].
    Relative,
    /// See [`ProductDiscountValue::Absolute`].
    Absolute,
}

impl ValueType {
    /// The tag used in configuration and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external" => Ok(Self::External),
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            _ => Err(format!("unknown product discount type: {s}")),
        }
    }
}

// =============================================================================
// Draft
// =============================================================================

/// Payload for creating a product discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscountDraft {
    /// Display name.
    pub name: LocalizedString,
    /// User-defined unique key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    /// Discount value.
    pub value: ProductDiscountValue,
    /// Product predicate selecting the prices the discount applies to.
    pub predicate: String,
    /// Decimal between 0 and 1; higher values are applied first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    /// Whether the discount is applied.
    pub is_active: bool,
    /// Start of the validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

// =============================================================================
// Entity
// =============================================================================

/// A persisted product discount as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscount {
    /// Server-assigned ID.
    pub id: ProductDiscountId,
    /// Optimistic concurrency version, incremented on every change.
    pub version: i64,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default)]
    pub last_modified_at: Option<DateTime<Utc>>,
    /// Display name.
    pub name: LocalizedString,
    /// User-defined unique key.
    #[serde(default)]
    pub key: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<LocalizedString>,
    /// Discount value.
    pub value: ProductDiscountValue,
    /// Product predicate.
    pub predicate: String,
    /// Sort order.
    #[serde(default)]
    pub sort_order: Option<String>,
    /// Whether the discount is applied.
    pub is_active: bool,
    /// Resources referenced by the predicate.
    #[serde(default)]
    pub references: Vec<serde_json::Value>,
    /// Start of the validity window.
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window.
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::money::CurrencyCode;

    #[test]
    fn test_value_external_wire_shape() {
        let json = serde_json::to_value(ProductDiscountValue::External).unwrap();
        assert_eq!(json, serde_json::json!({"type": "external"}));
    }

    #[test]
    fn test_value_relative_wire_shape() {
        let json = serde_json::to_value(ProductDiscountValue::Relative { permyriad: 1000 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "relative", "permyriad": 1000}));
    }

    #[test]
    fn test_value_absolute_from_response() {
        let value: ProductDiscountValue = serde_json::from_value(serde_json::json!({
            "type": "absolute",
            "money": [{
                "type": "centPrecision",
                "currencyCode": "EUR",
                "centAmount": 500,
                "fractionDigits": 2
            }]
        }))
        .unwrap();

        assert_eq!(
            value,
            ProductDiscountValue::Absolute {
                money: vec![Money::new(500, CurrencyCode::parse("EUR").unwrap())],
            }
        );
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("external".parse::<ValueType>(), Ok(ValueType::External));
        assert_eq!("relative".parse::<ValueType>(), Ok(ValueType::Relative));
        assert_eq!("absolute".parse::<ValueType>(), Ok(ValueType::Absolute));
        assert!("percentage".parse::<ValueType>().is_err());
    }

    #[test]
    fn test_draft_omits_unset_fields() {
        let draft = ProductDiscountDraft {
            name: LocalizedString::new().with("en", "Sale"),
            key: None,
            description: None,
            value: ProductDiscountValue::External,
            predicate: "1=1".to_string(),
            sort_order: Some("0.5".to_string()),
            is_active: false,
            valid_from: None,
            valid_until: None,
        };

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": {"en": "Sale"},
                "value": {"type": "external"},
                "predicate": "1=1",
                "sortOrder": "0.5",
                "isActive": false
            })
        );
    }

    #[test]
    fn test_entity_from_response() {
        let discount: ProductDiscount = serde_json::from_value(serde_json::json!({
            "id": "pd-1",
            "version": 3,
            "createdAt": "2024-01-10T09:00:00.000Z",
            "lastModifiedAt": "2024-01-11T09:00:00.000Z",
            "name": {"en": "Sale"},
            "value": {"type": "relative", "permyriad": 1500},
            "predicate": "sku = \"ABC\"",
            "sortOrder": "0.3",
            "isActive": true,
            "references": [],
            "validFrom": "2024-01-15T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(discount.id.as_str(), "pd-1");
        assert_eq!(discount.version, 3);
        assert_eq!(discount.key, None);
        assert_eq!(discount.description, None);
        assert!(discount.valid_from.is_some());
        assert!(discount.valid_until.is_none());
    }
}
