//! Change detection between observed and desired attributes.
//!
//! Fields are compared in a fixed order and every changed field maps to
//! exactly one update action, so the action list for a given pair of
//! configurations is deterministic.

use commerce_discounts_core::{LocalizedString, ProductDiscountUpdateAction};

use super::data::{ProductDiscountConfig, ResourceData};
use super::expand::{ExpandError, expand_optional_date, expand_value};

/// An attribute that differs between prior and desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangedField {
    /// `key`
    Key,
    /// `is_active`
    IsActive,
    /// `predicate`
    Predicate,
    /// `sort_order`
    SortOrder,
    /// `valid_from`
    ValidFrom,
    /// `valid_until`
    ValidUntil,
    /// `name`
    Name,
    /// `description`
    Description,
    /// `value`
    Value,
}

impl ChangedField {
    /// Every field, in the order update actions are emitted.
    pub const ALL: [Self; 9] = [
        Self::Key,
        Self::IsActive,
        Self::Predicate,
        Self::SortOrder,
        Self::ValidFrom,
        Self::ValidUntil,
        Self::Name,
        Self::Description,
        Self::Value,
    ];

    /// Attribute name in configuration.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::IsActive => "is_active",
            Self::Predicate => "predicate",
            Self::SortOrder => "sort_order",
            Self::ValidFrom => "valid_from",
            Self::ValidUntil => "valid_until",
            Self::Name => "name",
            Self::Description => "description",
            Self::Value => "value",
        }
    }

    fn differs(self, prior: &ProductDiscountConfig, desired: &ProductDiscountConfig) -> bool {
        match self {
            Self::Key => prior.key != desired.key,
            Self::IsActive => prior.is_active != desired.is_active,
            Self::Predicate => prior.predicate != desired.predicate,
            // The platform has no way to unset a sort order
            Self::SortOrder => {
                desired.sort_order.is_some() && prior.sort_order != desired.sort_order
            }
            Self::ValidFrom => prior.valid_from != desired.valid_from,
            Self::ValidUntil => prior.valid_until != desired.valid_until,
            Self::Name => prior.name != desired.name,
            Self::Description => {
                non_empty(prior.description.as_ref()) != non_empty(desired.description.as_ref())
            }
            Self::Value => value_differs(prior, desired),
        }
    }
}

impl std::fmt::Display for ChangedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.attribute())
    }
}

fn non_empty(description: Option<&LocalizedString>) -> Option<&LocalizedString> {
    description.filter(|d| !d.is_empty())
}

/// Compare values by meaning when both sides expand, so payload fields the
/// type ignores do not produce a perpetual change.
fn value_differs(prior: &ProductDiscountConfig, desired: &ProductDiscountConfig) -> bool {
    match (expand_value(&prior.value), expand_value(&desired.value)) {
        (Ok(prior), Ok(desired)) => prior != desired,
        _ => prior.value != desired.value,
    }
}

/// Fields whose desired value differs from the prior one, in action order.
#[must_use]
pub fn diff(prior: &ProductDiscountConfig, desired: &ProductDiscountConfig) -> Vec<ChangedField> {
    ChangedField::ALL
        .into_iter()
        .filter(|field| field.differs(prior, desired))
        .collect()
}

/// Map changed fields onto update actions carrying the desired values.
///
/// Unset optional fields produce the clearing form of their action.
///
/// # Errors
///
/// Returns an error if a changed date or value cannot be expanded.
pub fn build_actions(
    changes: &[ChangedField],
    desired: &ProductDiscountConfig,
) -> Result<Vec<ProductDiscountUpdateAction>, ExpandError> {
    let mut actions = Vec::with_capacity(changes.len());

    for field in changes {
        let action = match field {
            ChangedField::Key => ProductDiscountUpdateAction::SetKey {
                key: desired.key.clone(),
            },
            ChangedField::IsActive => ProductDiscountUpdateAction::ChangeIsActive {
                is_active: desired.is_active,
            },
            ChangedField::Predicate => ProductDiscountUpdateAction::ChangePredicate {
                predicate: desired.predicate.clone(),
            },
            ChangedField::SortOrder => match &desired.sort_order {
                Some(sort_order) => ProductDiscountUpdateAction::ChangeSortOrder {
                    sort_order: sort_order.clone(),
                },
                None => continue,
            },
            ChangedField::ValidFrom => ProductDiscountUpdateAction::SetValidFrom {
                valid_from: expand_optional_date("valid_from", desired.valid_from.as_deref())?,
            },
            ChangedField::ValidUntil => ProductDiscountUpdateAction::SetValidUntil {
                valid_until: expand_optional_date("valid_until", desired.valid_until.as_deref())?,
            },
            ChangedField::Name => ProductDiscountUpdateAction::ChangeName {
                name: desired.name.clone(),
            },
            ChangedField::Description => ProductDiscountUpdateAction::SetDescription {
                description: non_empty(desired.description.as_ref()).cloned(),
            },
            ChangedField::Value => ProductDiscountUpdateAction::ChangeValue {
                value: expand_value(&desired.value)?,
            },
        };
        actions.push(action);
    }

    Ok(actions)
}

/// What applying a configuration would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No remote object is tracked; one will be created.
    Create,
    /// The remote object differs in the listed fields.
    Update {
        /// Changed fields in action order.
        changes: Vec<ChangedField>,
    },
    /// The remote object already matches.
    NoChange,
}

/// Decide how to reconcile `state` with `desired`.
#[must_use]
pub fn plan(state: Option<&ResourceData>, desired: &ProductDiscountConfig) -> Plan {
    match state {
        Some(state) if state.exists() => {
            let changes = diff(&state.attributes, desired);
            if changes.is_empty() {
                Plan::NoChange
            } else {
                Plan::Update { changes }
            }
        }
        _ => Plan::Create,
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::NoChange => write!(f, "no changes"),
            Self::Update { changes } => {
                let fields = changes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "update in place: {fields}")
            }
        }
    }
}
