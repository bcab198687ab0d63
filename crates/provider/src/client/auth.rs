//! commercetools OAuth2 client-credentials flow.
//!
//! Exchanges the API client ID and secret for a bearer token used on every
//! API request.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::ClientError;
use crate::config::ProviderConfig;

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Bearer token obtained from the auth endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Token sent in the `Authorization` header.
    pub access_token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
    #[serde(default)]
    scope: String,
}

/// Error response from the token endpoint.
#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Request a new token with the client-credentials grant.
///
/// # Errors
///
/// Returns `ClientError::Authentication` if the credentials are rejected and
/// `ClientError::Http` on network failures.
#[instrument(skip(client, config), fields(client_id = %config.client_id))]
pub async fn client_credentials(
    client: &reqwest::Client,
    config: &ProviderConfig,
) -> Result<AccessToken, ClientError> {
    let now = chrono::Utc::now().timestamp();
    let url = format!(
        "{}/oauth/token",
        config.auth_url.as_str().trim_end_matches('/')
    );
    let scope = config.scope_param();

    let response = client
        .post(&url)
        .basic_auth(&config.client_id, Some(config.client_secret.expose_secret()))
        .form(&[
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Invalid token response: {e}")))?;

        tracing::debug!(scope = %token.scope, expires_in = token.expires_in, "Obtained access token");

        Ok(AccessToken {
            access_token: SecretString::from(token.access_token),
            expires_at: now + token.expires_in,
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<TokenErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error_description.or(e.message).or(e.error))
            .unwrap_or(body);

        Err(ClientError::Authentication(format!(
            "HTTP {status}: {message}"
        )))
    }
}

impl AccessToken {
    /// Check if the token has expired or is about to.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_BUFFER_SECS
    }
}
