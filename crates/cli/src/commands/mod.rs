//! CLI command implementations.

pub mod files;
pub mod inspect;
pub mod lifecycle;

use std::path::PathBuf;

use commerce_discounts_provider::config::ConfigError;
use commerce_discounts_provider::{
    ClientError, CommercetoolsClient, ProductDiscountResource, ProviderConfig, ProviderError,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the resource.
    #[error("Invalid configuration file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The state file is not valid JSON state.
    #[error("Invalid state file {}: {source}", path.display())]
    StateFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Provider environment is incomplete or invalid.
    #[error("Configuration error: {0}")]
    Environment(#[from] ConfigError),

    /// Building the API client failed.
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// A resource operation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The command needs a state file that does not exist.
    #[error("No state found at {}", path.display())]
    NoState { path: PathBuf },

    /// Import into a state file that already tracks a discount.
    #[error("State at {} already tracks product discount {id}", path.display())]
    AlreadyManaged { path: PathBuf, id: String },
}

/// Build a resource adapter from the environment.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or the HTTP client
/// cannot be built.
pub fn connect() -> Result<ProductDiscountResource<CommercetoolsClient>, CommandError> {
    let config = ProviderConfig::from_env()?;
    tracing::debug!(?config, "Loaded provider configuration");

    let client = CommercetoolsClient::new(config)?;
    Ok(ProductDiscountResource::new(client))
}
