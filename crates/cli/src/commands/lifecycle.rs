//! Commands that talk to the API: plan, apply, import and destroy.

use std::path::Path;

use commerce_discounts_provider::{
    CommercetoolsClient, Plan, ProductDiscountConfig, ProductDiscountResource, ProviderError,
    ResourceData, resource, schema,
};
use tracing::{info, warn};

use super::files::{load_config, load_state, remove_state, save_state};
use super::inspect::report;
use super::{CommandError, connect};

/// Load and validate a configuration before any request is made.
fn load_valid_config(config_path: &Path) -> Result<ProductDiscountConfig, CommandError> {
    let config = load_config(config_path)?;
    let diagnostics = schema::validate(&config);
    report(&diagnostics);

    if diagnostics.has_errors() {
        return Err(ProviderError::Validation(diagnostics).into());
    }
    Ok(config)
}

/// Load state and refresh it from the API.
async fn refreshed_state(
    resource: &ProductDiscountResource<CommercetoolsClient>,
    state_path: &Path,
) -> Result<Option<ResourceData>, CommandError> {
    let Some(mut state) = load_state(state_path)? else {
        return Ok(None);
    };

    resource.read(&mut state).await?;
    Ok(Some(state))
}

/// Show what `apply` would do.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the refresh fails.
pub async fn plan(config_path: &Path, state_path: &Path) -> Result<(), CommandError> {
    let config = load_valid_config(config_path)?;
    let resource = connect()?;

    let state = refreshed_state(&resource, state_path).await?;
    let plan = resource::plan(state.as_ref(), &config);

    info!(%plan, "Plan");
    Ok(())
}

/// Create or update the discount, then write state.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a request fails.
/// State is only written after a successful operation.
pub async fn apply(config_path: &Path, state_path: &Path) -> Result<(), CommandError> {
    let config = load_valid_config(config_path)?;
    let resource = connect()?;

    let state = refreshed_state(&resource, state_path).await?;
    let plan = resource::plan(state.as_ref(), &config);
    info!(%plan, "Applying");

    let state = match (plan, state) {
        (Plan::Update { .. }, Some(mut state)) => {
            resource.update(&mut state, &config).await?;
            state
        }
        (Plan::NoChange, Some(state)) => state,
        _ => resource.create(&config).await?,
    };

    save_state(state_path, &state)?;
    info!(
        id = ?state.id,
        version = state.version,
        path = %state_path.display(),
        "Apply complete"
    );
    Ok(())
}

/// Adopt an existing discount into a new state file.
///
/// # Errors
///
/// Returns an error if the state file already tracks a discount or the
/// import fails.
pub async fn import(id: &str, state_path: &Path) -> Result<(), CommandError> {
    if let Some(ResourceData {
        id: Some(existing), ..
    }) = load_state(state_path)?
    {
        return Err(CommandError::AlreadyManaged {
            path: state_path.to_path_buf(),
            id: existing.into_inner(),
        });
    }

    let resource = connect()?;
    let state = resource.import(id).await?;

    save_state(state_path, &state)?;
    info!(id, version = state.version, "Import complete");
    Ok(())
}

/// Delete the discount and remove the state file.
///
/// # Errors
///
/// Returns an error if there is no state file or the delete fails. The
/// state file is kept when the delete fails.
pub async fn destroy(state_path: &Path) -> Result<(), CommandError> {
    let mut state = load_state(state_path)?.ok_or_else(|| CommandError::NoState {
        path: state_path.to_path_buf(),
    })?;

    if state.exists() {
        let resource = connect()?;
        resource.delete(&mut state).await?;
    } else {
        warn!("State tracks no product discount, removing state file only");
    }

    remove_state(state_path)?;
    info!(path = %state_path.display(), "Destroy complete");
    Ok(())
}
