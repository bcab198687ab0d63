//! Provider configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CTP_PROJECT_KEY` - commercetools project key
//! - `CTP_CLIENT_ID` - API client ID
//! - `CTP_CLIENT_SECRET` - API client secret (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `CTP_SCOPES` - Space-separated OAuth scopes (default: `manage_project:<project key>`)
//! - `CTP_API_URL` - HTTP API base URL (default: `https://api.europe-west1.gcp.commercetools.com`)
//! - `CTP_AUTH_URL` - OAuth base URL (default: `https://auth.europe-west1.gcp.commercetools.com`)
//! - `CTP_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
pub const DEFAULT_AUTH_URL: &str = "https://auth.europe-west1.gcp.commercetools.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// commercetools issues 32-character client secrets.
const MIN_SECRET_LEN: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Fragments of values copied from setup guides instead of the API client page
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "secret", "xxxx"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// commercetools API client configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Project key, the first path segment of every API call
    pub project_key: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret (HIGH PRIVILEGE)
    pub client_secret: SecretString,
    /// OAuth scopes requested for the token
    pub scopes: Vec<String>,
    /// HTTP API base URL
    pub api_url: Url,
    /// OAuth base URL
    pub auth_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("api_url", &self.api_url.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, URLs or the
    /// timeout fail to parse, or the client secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let project_key = env.required("CTP_PROJECT_KEY")?;
        let client_id = env.required("CTP_CLIENT_ID")?;
        let client_secret = env.validated_secret("CTP_CLIENT_SECRET", &client_id)?;

        let scopes = env.optional("CTP_SCOPES").map_or_else(
            || vec![format!("manage_project:{project_key}")],
            |s| s.split_whitespace().map(String::from).collect(),
        );

        let api_url = env.url("CTP_API_URL", DEFAULT_API_URL)?;
        let auth_url = env.url("CTP_AUTH_URL", DEFAULT_AUTH_URL)?;

        let request_timeout = env
            .or_default("CTP_REQUEST_TIMEOUT_SECS", &DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CTP_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            project_key,
            client_id,
            client_secret,
            scopes,
            api_url,
            auth_url,
            request_timeout,
        })
    }

    /// Scopes joined for the token request.
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an absolute http(s) URL, falling back to a default.
    fn url(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.or_default(key, default);
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// Load a client secret and reject values that cannot be real.
    fn validated_secret(&self, key: &str, client_id: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        check_client_secret(&value, client_id)
            .map_err(|reason| ConfigError::InsecureSecret(key.to_string(), reason))?;
        Ok(SecretString::from(value))
    }
}

/// Shannon entropy of the bytes of `s`, in bits per byte.
fn shannon_entropy(s: &str) -> f64 {
    let counts = s.bytes().fold(BTreeMap::<u8, u32>::new(), |mut counts, b| {
        *counts.entry(b).or_default() += 1;
        counts
    });

    #[allow(clippy::cast_precision_loss)] // secrets are far shorter than 2^52 bytes
    let len = s.len() as f64;
    counts
        .into_values()
        .map(|count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Check a client secret against the shape commercetools issues.
///
/// Returns the reason the secret was rejected.
fn check_client_secret(secret: &str, client_id: &str) -> Result<(), String> {
    if secret == client_id {
        return Err("is the same as CTP_CLIENT_ID".to_string());
    }

    if let Some(c) = secret
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_')))
    {
        return Err(format!("contains {c:?}, which never appears in an API client secret"));
    }

    let lower = secret.to_ascii_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("looks like a placeholder (contains '{pattern}')"));
    }

    if secret.len() < MIN_SECRET_LEN {
        return Err(format!(
            "is {} characters, API client secrets have {MIN_SECRET_LEN}",
            secret.len()
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}
