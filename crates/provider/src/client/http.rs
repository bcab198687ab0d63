//! commercetools HTTP API client.
//!
//! - Base URL: `CTP_API_URL` + `/{project_key}`
//! - Authentication: `Authorization: Bearer <token>` from the client-credentials flow
//! - Errors: JSON body `{ statusCode, message, errors[] }`

use std::sync::Arc;

use async_trait::async_trait;
use commerce_discounts_core::{
    ProductDiscount, ProductDiscountDraft, ProductDiscountId, ProductDiscountUpdate,
    ProductDiscountUpdateAction,
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::auth::{AccessToken, client_credentials};
use super::{ClientError, ErrorResponse, ProductDiscountApi};
use crate::config::ProviderConfig;

/// commercetools API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the cached
/// access token.
#[derive(Clone)]
pub struct CommercetoolsClient {
    inner: Arc<CommercetoolsClientInner>,
}

struct CommercetoolsClientInner {
    client: reqwest::Client,
    config: ProviderConfig,
    /// In-memory token cache
    token: RwLock<Option<AccessToken>>,
}

impl CommercetoolsClient {
    /// Create a new client. No token is requested until the first call.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("commerce-discounts/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CommercetoolsClientInner {
                client,
                config,
                token: RwLock::new(None),
            }),
        })
    }

    /// The project every request is scoped to.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.inner.config.project_key
    }

    /// Drop the cached token so the next call authenticates again.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Build the URL of a project-scoped endpoint.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.inner.config.api_url.as_str().trim_end_matches('/'),
            self.inner.config.project_key,
            path.trim_start_matches('/')
        )
    }

    /// Return a valid access token, requesting a new one if needed.
    async fn access_token(&self) -> Result<String, ClientError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        let mut guard = self.inner.token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        let token = client_credentials(&self.inner.client, &self.inner.config).await?;
        let value = token.access_token.expose_secret().to_string();
        *guard = Some(token);
        Ok(value)
    }

    /// Authenticate and send a request, decoding a JSON success body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Parse(format!("Failed to parse response: {e}")));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Access token rejected, clearing cached token");
            self.clear_token().await;
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the API.
    ///
    /// Bodies that are not a commercetools error object still produce an
    /// `Api` error carrying the HTTP status.
    async fn parse_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let error = serde_json::from_str::<ErrorResponse>(&body).unwrap_or_else(|_| {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            };
            ErrorResponse::new(status.as_u16(), message)
        });

        ClientError::Api(error)
    }
}

#[async_trait]
impl ProductDiscountApi for CommercetoolsClient {
    #[instrument(skip(self, draft), fields(project = %self.project_key()))]
    async fn create(&self, draft: &ProductDiscountDraft) -> Result<ProductDiscount, ClientError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("product-discounts"))
            .json(draft);

        let discount: ProductDiscount = self.send(request).await?;
        debug!(id = %discount.id, version = discount.version, "Product discount created");
        Ok(discount)
    }

    #[instrument(skip(self), fields(project = %self.project_key()))]
    async fn get_by_id(&self, id: &ProductDiscountId) -> Result<ProductDiscount, ClientError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(&format!("product-discounts/{id}")));

        self.send(request).await
    }

    #[instrument(
        skip(self, actions),
        fields(project = %self.project_key(), actions = actions.len())
    )]
    async fn update_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
        actions: &[ProductDiscountUpdateAction],
    ) -> Result<ProductDiscount, ClientError> {
        let body = ProductDiscountUpdate {
            version,
            actions: actions.to_vec(),
        };
        let request = self
            .inner
            .client
            .post(self.endpoint(&format!("product-discounts/{id}")))
            .json(&body);

        let discount: ProductDiscount = self.send(request).await?;
        debug!(version = discount.version, "Product discount updated");
        Ok(discount)
    }

    #[instrument(skip(self), fields(project = %self.project_key()))]
    async fn delete_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
    ) -> Result<ProductDiscount, ClientError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("product-discounts/{id}?version={version}")));

        let discount: ProductDiscount = self.send(request).await?;
        debug!("Product discount deleted");
        Ok(discount)
    }
}

impl std::fmt::Debug for CommercetoolsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommercetoolsClient")
            .field("project_key", &self.inner.config.project_key)
            .field("api_url", &self.inner.config.api_url.as_str())
            .finish_non_exhaustive()
    }
}
