//! Resource adapter mapping `product_discount` operations onto the API.

use commerce_discounts_core::{ProductDiscountId, ProductDiscountUpdateAction};
use tracing::{debug, error, info, instrument, warn};

use super::data::{ProductDiscountConfig, ResourceData};
use super::diff::{build_actions, diff};
use super::expand::expand_draft;
use super::flatten::apply_remote;
use crate::client::{ClientError, ProductDiscountApi};
use crate::error::ProviderError;
use crate::schema::validate;

/// Create / read / update / delete / import of product discounts.
///
/// The adapter owns no state of its own; callers pass the persisted
/// [`ResourceData`] in and get it back mutated.
#[derive(Debug, Clone)]
pub struct ProductDiscountResource<C> {
    client: C,
}

impl<C: ProductDiscountApi> ProductDiscountResource<C> {
    /// Create an adapter over the given client.
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Create the discount and return its normalized state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a date cannot be
    /// parsed, or a request fails.
    #[instrument(skip_all, fields(key = ?config.key))]
    pub async fn create(
        &self,
        config: &ProductDiscountConfig,
    ) -> Result<ResourceData, ProviderError> {
        ensure_valid(config)?;

        let draft = expand_draft(config)?;
        debug!(?draft, "Going to create draft");

        let created = self.client.create(&draft).await?;
        info!(id = %created.id, version = created.version, "Created product discount");

        let mut state = ResourceData {
            id: Some(created.id),
            version: created.version,
            attributes: config.clone(),
        };
        self.read(&mut state).await?;
        Ok(state)
    }

    /// Refresh `state` from the API.
    ///
    /// A discount that no longer exists clears the identity in `state`
    /// instead of failing. State without an ID is left untouched.
    ///
    /// # Errors
    ///
    /// Returns any client error other than not-found.
    #[instrument(skip_all, fields(id = ?state.id))]
    pub async fn read(&self, state: &mut ResourceData) -> Result<(), ProviderError> {
        let Some(id) = state.id.clone() else {
            debug!("State has no ID, nothing to read");
            return Ok(());
        };

        debug!("Reading product discount from commercetools");
        match self.client.get_by_id(&id).await {
            Ok(remote) => {
                debug!(?remote, "Found product discount");
                apply_remote(state, &remote);
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                warn!(%id, "Product discount not found, removing from state");
                state.clear_identity();
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Bring the remote discount in line with `desired`.
    ///
    /// All changed fields are sent as one action list against the version in
    /// `state`; nothing is sent when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, `state` has no ID,
    /// or the update is rejected. A stale version surfaces as a 409.
    #[instrument(skip_all, fields(id = ?state.id, version = state.version))]
    pub async fn update(
        &self,
        state: &mut ResourceData,
        desired: &ProductDiscountConfig,
    ) -> Result<(), ProviderError> {
        ensure_valid(desired)?;
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;

        let changes = diff(&state.attributes, desired);
        let actions = build_actions(&changes, desired)?;
        if actions.is_empty() {
            debug!("No changes to apply");
            return Ok(());
        }

        debug!(
            actions = %action_names(&actions),
            detail = ?actions,
            "Going to update product discount"
        );

        match self
            .client
            .update_by_id(&id, state.version, &actions)
            .await
        {
            Ok(updated) => {
                info!(version = updated.version, "Updated product discount");
                apply_remote(state, &updated);
            }
            Err(err) => {
                log_update_error(&id, state.version, &err);
                return Err(err.into());
            }
        }

        self.read(state).await
    }

    /// Delete the discount and clear the identity in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` has no ID or the request fails.
    #[instrument(skip_all, fields(id = ?state.id, version = state.version))]
    pub async fn delete(&self, state: &mut ResourceData) -> Result<(), ProviderError> {
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;

        let deleted = self.client.delete_by_id(&id, state.version).await?;
        info!(version = deleted.version, "Deleted product discount");

        state.clear_identity();
        Ok(())
    }

    /// Adopt an existing discount by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is unusable, nothing exists under it, or
    /// the read fails.
    #[instrument(skip(self))]
    pub async fn import(&self, id: &str) -> Result<ResourceData, ProviderError> {
        let parsed = ProductDiscountId::parse(id).map_err(|e| ProviderError::InvalidId {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

        let mut state = ResourceData::with_id(parsed);
        self.read(&mut state).await?;

        if !state.exists() {
            return Err(ProviderError::ImportNotFound(id.to_string()));
        }
        Ok(state)
    }
}

/// Log warnings and reject a configuration with validation errors.
fn ensure_valid(config: &ProductDiscountConfig) -> Result<(), ProviderError> {
    let diagnostics = validate(config);
    for warning in diagnostics.warnings() {
        warn!(%warning, "Configuration warning");
    }
    if diagnostics.has_errors() {
        return Err(ProviderError::Validation(diagnostics));
    }
    Ok(())
}

fn action_names(actions: &[ProductDiscountUpdateAction]) -> String {
    actions
        .iter()
        .map(ProductDiscountUpdateAction::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_update_error(id: &ProductDiscountId, version: i64, err: &ClientError) {
    match err.response() {
        Some(response) => error!(
            %id,
            version,
            error = %err,
            extras = %response.format_extras(),
            "Failed to update product discount"
        ),
        None => error!(%id, version, error = %err, "Failed to update product discount"),
    }
}
