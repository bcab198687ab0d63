//! Offline commands: validate, show and schema.

use std::path::Path;

use commerce_discounts_provider::schema::{self, Severity};
use commerce_discounts_provider::{Diagnostics, ProviderError};
use tracing::{error, info, warn};

use super::CommandError;
use super::files::{load_config, load_state};

/// Log every diagnostic at a level matching its severity.
pub fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let attribute = diagnostic.attribute.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Error => error!(attribute, "{}", diagnostic.summary),
            Severity::Warning => warn!(attribute, "{}", diagnostic.summary),
        }
    }
}

/// Validate a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or has validation errors.
pub fn validate(config_path: &Path) -> Result<(), CommandError> {
    let config = load_config(config_path)?;
    let diagnostics = schema::validate(&config);
    report(&diagnostics);

    if diagnostics.has_errors() {
        return Err(ProviderError::Validation(diagnostics).into());
    }

    info!(
        path = %config_path.display(),
        warnings = diagnostics.len(),
        "Configuration is valid"
    );
    Ok(())
}

/// Print the stored state.
///
/// # Errors
///
/// Returns an error if there is no state or it cannot be loaded.
pub fn show(state_path: &Path) -> Result<(), CommandError> {
    let state = load_state(state_path)?.ok_or_else(|| CommandError::NoState {
        path: state_path.to_path_buf(),
    })?;

    let json = serde_json::to_string_pretty(&state).map_err(|source| CommandError::StateFile {
        path: state_path.to_path_buf(),
        source,
    })?;
    info!("\n{json}");
    Ok(())
}

/// Print the resource schema.
pub fn schema() {
    let schema = schema::product_discount_schema();
    info!(resource = schema.name, "Resource schema");

    for attribute in &schema.attributes {
        info!(
            name = attribute.name,
            kind = ?attribute.kind,
            mode = ?attribute.mode,
            default = attribute.default.unwrap_or("-"),
            one_of = %attribute.one_of.join(", "),
            "Attribute"
        );
    }
}
