//! Update actions for product discounts.
//!
//! commercetools never accepts a full replacement of a resource. Changes are
//! expressed as an ordered list of actions submitted together with the
//! version the client last saw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::discount::ProductDiscountValue;
use super::localized::LocalizedString;

/// A single change to a product discount.
///
/// Setter actions (`set*`) take an optional value; omitting it clears the
/// field on the server. `change*` actions always carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ProductDiscountUpdateAction {
    /// Set or clear the user-defined key.
    #[serde(rename_all = "camelCase")]
    SetKey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    /// Activate or deactivate the discount.
    #[serde(rename_all = "camelCase")]
    ChangeIsActive { is_active: bool },
    /// Replace the product predicate.
    #[serde(rename_all = "camelCase")]
    ChangePredicate { predicate: String },
    /// Replace the sort order.
    #[serde(rename_all = "camelCase")]
    ChangeSortOrder { sort_order: String },
    /// Set or clear the start of the validity window.
    #[serde(rename_all = "camelCase")]
    SetValidFrom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_from: Option<DateTime<Utc>>,
    },
    /// Set or clear the end of the validity window.
    #[serde(rename_all = "camelCase")]
    SetValidUntil {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid_until: Option<DateTime<Utc>>,
    },
    /// Replace the display name.
    #[serde(rename_all = "camelCase")]
    ChangeName { name: LocalizedString },
    /// Set or clear the description.
    #[serde(rename_all = "camelCase")]
    SetDescription {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<LocalizedString>,
    },
    /// Replace the discount value.
    #[serde(rename_all = "camelCase")]
    ChangeValue { value: ProductDiscountValue },
}

impl ProductDiscountUpdateAction {
    /// The action name as sent in the `action` field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetKey { .. } => "setKey",
            Self::ChangeIsActive { .. } => "changeIsActive",
            Self::ChangePredicate { .. } => "changePredicate",
            Self::ChangeSortOrder { .. } => "changeSortOrder",
            Self::SetValidFrom { .. } => "setValidFrom",
            Self::SetValidUntil { .. } => "setValidUntil",
            Self::ChangeName { .. } => "changeName",
            Self::SetDescription { .. } => "setDescription",
            Self::ChangeValue { .. } => "changeValue",
        }
    }
}

/// Body of an update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscountUpdate {
    /// Version the actions were computed against.
    pub version: i64,
    /// Actions, applied by the server in order.
    pub actions: Vec<ProductDiscountUpdateAction>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_change_is_active_wire_shape() {
        let action = ProductDiscountUpdateAction::ChangeIsActive { is_active: true };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({"action": "changeIsActive", "isActive": true})
        );
    }

    #[test]
    fn test_set_key_without_value_clears() {
        let action = ProductDiscountUpdateAction::SetKey { key: None };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({"action": "setKey"})
        );
    }

    #[test]
    fn test_change_value_nests_tagged_value() {
        let action = ProductDiscountUpdateAction::ChangeValue {
            value: ProductDiscountValue::Relative { permyriad: 250 },
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({
                "action": "changeValue",
                "value": {"type": "relative", "permyriad": 250}
            })
        );
    }

    #[test]
    fn test_action_name_matches_wire_tag() {
        let actions = [
            ProductDiscountUpdateAction::SetKey { key: None },
            ProductDiscountUpdateAction::ChangeSortOrder {
                sort_order: "0.1".to_string(),
            },
            ProductDiscountUpdateAction::SetValidUntil { valid_until: None },
            ProductDiscountUpdateAction::SetDescription { description: None },
        ];

        for action in actions {
            let json = serde_json::to_value(&action).unwrap();
            assert_eq!(json["action"], action.name());
        }
    }

    #[test]
    fn test_update_body() {
        let update = ProductDiscountUpdate {
            version: 4,
            actions: vec![ProductDiscountUpdateAction::ChangePredicate {
                predicate: "1=1".to_string(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({
                "version": 4,
                "actions": [{"action": "changePredicate", "predicate": "1=1"}]
            })
        );
    }
}
