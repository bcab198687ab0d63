//! commercetools API access for product discounts.
//!
//! # Architecture
//!
//! - [`ProductDiscountApi`] is the seam the resource adapter talks to. It
//!   knows nothing about HTTP, tokens or retries.
//! - [`CommercetoolsClient`] implements it over the commercetools HTTP API
//!   using an OAuth2 client-credentials token cached in memory.
//!
//! Tests substitute their own implementation of the trait.

mod auth;
mod error;
mod http;
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod test_server;

pub use auth::AccessToken;
pub use error::{ApiError, ClientError, ErrorResponse};
pub use http::CommercetoolsClient;

use async_trait::async_trait;
use commerce_discounts_core::{
    ProductDiscount, ProductDiscountDraft, ProductDiscountId, ProductDiscountUpdateAction,
};

/// Operations on the product discount endpoint.
///
/// Every error carrying an HTTP status is reported as [`ClientError::Api`],
/// so callers can tell a missing resource (404) from a stale version (409).
#[async_trait]
pub trait ProductDiscountApi: Send + Sync {
    /// Create a product discount from a draft.
    async fn create(&self, draft: &ProductDiscountDraft) -> Result<ProductDiscount, ClientError>;

    /// Fetch a product discount by ID.
    async fn get_by_id(&self, id: &ProductDiscountId) -> Result<ProductDiscount, ClientError>;

    /// Apply update actions against the given version.
    async fn update_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
        actions: &[ProductDiscountUpdateAction],
    ) -> Result<ProductDiscount, ClientError>;

    /// Delete a product discount at the given version.
    async fn delete_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
    ) -> Result<ProductDiscount, ClientError>;
}

#[async_trait]
impl<T: ProductDiscountApi + ?Sized> ProductDiscountApi for std::sync::Arc<T> {
    async fn create(&self, draft: &ProductDiscountDraft) -> Result<ProductDiscount, ClientError> {
        (**self).create(draft).await
    }

    async fn get_by_id(&self, id: &ProductDiscountId) -> Result<ProductDiscount, ClientError> {
        (**self).get_by_id(id).await
    }

    async fn update_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
        actions: &[ProductDiscountUpdateAction],
    ) -> Result<ProductDiscount, ClientError> {
        (**self).update_by_id(id, version, actions).await
    }

    async fn delete_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
    ) -> Result<ProductDiscount, ClientError> {
        (**self).delete_by_id(id, version).await
    }
}
