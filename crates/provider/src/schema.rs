//! Resource schema and configuration validation.
//!
//! The schema describes the `product_discount` attributes for display and
//! documentation. [`validate`] checks a parsed configuration against it
//! before any request is made.

use commerce_discounts_core::{CurrencyCode, ValueType};

use crate::resource::data::{
    DEFAULT_PREDICATE, ProductDiscountConfig, UnknownAttributes, ValueBlock,
};
use crate::resource::expand::expand_optional_date;

// =============================================================================
// Diagnostics
// =============================================================================

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be applied.
    Error,
    /// The configuration can be applied but something looks wrong.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable description.
    pub summary: String,
    /// Attribute path such as `value.0.type`, if the finding is about one.
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    #[must_use]
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            attribute: None,
        }
    }

    /// Create a warning diagnostic.
    #[must_use]
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            attribute: None,
        }
    }

    /// Attach the attribute path the finding is about.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if let Some(attribute) = &self.attribute {
            write!(f, " (at {attribute})")?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Whether any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    /// Error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Warning diagnostics only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// All diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Returns `true` if there are no diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    /// Map from locale to text.
    LocalizedString,
    /// `YYYY-MM-DD`.
    Date,
    /// List of nested blocks.
    List,
}

/// Who sets an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Required,
    Optional,
    /// Assigned by the server.
    Computed,
}

/// One attribute of a resource schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Dotted path, e.g. `value.money.currency_code`.
    pub name: &'static str,
    pub kind: AttributeType,
    pub mode: AttributeMode,
    /// Default applied when unset.
    pub default: Option<&'static str>,
    /// Accepted values, empty when unrestricted.
    pub one_of: &'static [&'static str],
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeType, mode: AttributeMode) -> Self {
        Self {
            name,
            kind,
            mode,
            default: None,
            one_of: &[],
        }
    }

    const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    const fn with_one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = values;
        self
    }
}

/// Attribute list of a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Resource type name.
    pub name: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Look up an attribute by dotted path.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

const VALUE_TYPES: [&str; 3] = [
    ValueType::External.as_str(),
    ValueType::Relative.as_str(),
    ValueType::Absolute.as_str(),
];

/// Schema of the `product_discount` resource.
#[must_use]
pub fn product_discount_schema() -> ResourceSchema {
    use AttributeMode::{Computed, Optional, Required};
    use AttributeType::{Bool, Date, Int, List, LocalizedString as Localized, String as Text};

    ResourceSchema {
        name: "product_discount",
        attributes: vec![
            Attribute::new("name", Localized, Required),
            Attribute::new("key", Text, Optional),
            Attribute::new("description", Localized, Optional),
            Attribute::new("predicate", Text, Optional).with_default(DEFAULT_PREDICATE),
            Attribute::new("sort_order", Text, Optional),
            Attribute::new("is_active", Bool, Optional).with_default("false"),
            Attribute::new("valid_from", Date, Optional),
            Attribute::new("valid_until", Date, Optional),
            Attribute::new("value", List, Required),
            Attribute::new("value.type", Text, Required).with_one_of(&VALUE_TYPES),
            Attribute::new("value.money", List, Optional),
            Attribute::new("value.money.cent_amount", Int, Required),
            Attribute::new("value.money.currency_code", Text, Required),
            Attribute::new("value.permyriad", Int, Optional),
            Attribute::new("version", Int, Computed),
        ],
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a configuration without touching the network.
#[must_use]
pub fn validate(config: &ProductDiscountConfig) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    validate_unknown("", &config.unknown, &mut diagnostics);

    if config.name.is_empty() {
        diagnostics.push(
            Diagnostic::error("name must have at least one localized value").with_attribute("name"),
        );
    }

    for (field, value) in [
        ("valid_from", config.valid_from.as_deref()),
        ("valid_until", config.valid_until.as_deref()),
    ] {
        if let Err(err) = expand_optional_date(field, value) {
            diagnostics.push(Diagnostic::error(err.to_string()).with_attribute(field));
        }
    }

    if config.value.len() != 1 {
        diagnostics.push(
            Diagnostic::error(format!(
                "value must contain exactly one block, found {}",
                config.value.len()
            ))
            .with_attribute("value"),
        );
    }

    for (index, block) in config.value.iter().enumerate() {
        validate_value_block(index, block, &mut diagnostics);
    }

    diagnostics
}

fn validate_value_block(index: usize, block: &ValueBlock, diagnostics: &mut Diagnostics) {
    validate_unknown(&format!("value.{index}."), &block.unknown, diagnostics);
    for (i, money) in block.money.iter().enumerate() {
        validate_unknown(
            &format!("value.{index}.money.{i}."),
            &money.unknown,
            diagnostics,
        );
    }

    let Some(value_type) = validate_product_discount_type(index, &block.value_type, diagnostics)
    else {
        return;
    };
    let path = |field: &str| format!("value.{index}.{field}");

    match value_type {
        ValueType::Relative => {
            if block.permyriad.is_none() {
                diagnostics.push(
                    Diagnostic::error("a relative value requires permyriad")
                        .with_attribute(path("permyriad")),
                );
            }
        }
        ValueType::Absolute => {
            if block.money.is_empty() {
                diagnostics.push(
                    Diagnostic::error("an absolute value requires at least one money entry")
                        .with_attribute(path("money")),
                );
            }
            for (i, money) in block.money.iter().enumerate() {
                if let Err(err) = CurrencyCode::parse(&money.currency_code) {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "{:?} is not a valid currency code: {err}",
                            money.currency_code
                        ))
                        .with_attribute(path(&format!("money.{i}.currency_code"))),
                    );
                }
            }
        }
        ValueType::External => {}
    }

    if value_type != ValueType::Relative && block.permyriad.is_some() {
        diagnostics.push(
            Diagnostic::warning(format!("permyriad is ignored when type is {value_type}"))
                .with_attribute(path("permyriad")),
        );
    }
    if value_type != ValueType::Absolute && !block.money.is_empty() {
        diagnostics.push(
            Diagnostic::warning(format!("money is ignored when type is {value_type}"))
                .with_attribute(path("money")),
        );
    }
}

/// Report every attribute the schema does not define, under `prefix`.
fn validate_unknown(prefix: &str, unknown: &UnknownAttributes, diagnostics: &mut Diagnostics) {
    for name in unknown.keys() {
        diagnostics.push(
            Diagnostic::error(format!("unsupported argument {name:?}"))
                .with_attribute(format!("{prefix}{name}")),
        );
    }
}

/// Check `value.N.type`, returning the parsed type when it is accepted.
fn validate_product_discount_type(
    index: usize,
    value: &str,
    diagnostics: &mut Diagnostics,
) -> Option<ValueType> {
    let key = format!("value.{index}.type");
    if let Ok(value_type) = value.parse() {
        Some(value_type)
    } else {
        diagnostics.push(
            Diagnostic::error(format!("{value:?} not a valid value for {key:?}"))
                .with_attribute(key),
        );
        None
    }
}
