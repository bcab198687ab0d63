//! Unified error handling for the provider.

use thiserror::Error;

use crate::client::ClientError;
use crate::resource::ExpandError;
use crate::schema::Diagnostics;

/// Top-level error for resource operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration failed validation; nothing was sent.
    #[error("Invalid configuration: {0}")]
    Validation(Diagnostics),

    /// Configuration could not be turned into a request payload.
    #[error("Expand error: {0}")]
    Expand(#[from] ExpandError),

    /// commercetools API operation failed.
    #[error("commercetools error: {0}")]
    Client(#[from] ClientError),

    /// The operation needs a resource ID but the state has none.
    #[error("Resource has no ID; it has not been created or was deleted")]
    MissingId,

    /// Nothing exists remotely under the imported ID.
    #[error("Cannot import non-existent product discount {0}")]
    ImportNotFound(String),

    /// An import ID is not usable as a resource identifier.
    #[error("Invalid resource ID {id:?}: {reason}")]
    InvalidId {
        /// The rejected ID.
        id: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ProviderError {
    /// HTTP status of the underlying API error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client(err) => err.status_code(),
            _ => None,
        }
    }
}
