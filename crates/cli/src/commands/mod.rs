//! Subcommand implementations.

pub mod migrate;
pub mod orders;
pub mod seed;

use forkful_backend::{BackendClient, BackendConfig, BackendError};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Errors shared by commands that talk to the data backend.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable is set but unusable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// Command-line argument didn't parse.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// Data backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Build a backend client holding the service key.
///
/// Reads `BACKEND_URL` and `BACKEND_SERVICE_KEY`.
pub fn service_client() -> Result<BackendClient, CommandError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("BACKEND_URL").map_err(|_| CommandError::MissingEnvVar("BACKEND_URL"))?;
    let url = Url::parse(&url).map_err(|e| CommandError::InvalidEnvVar("BACKEND_URL", e.to_string()))?;
    let key = std::env::var("BACKEND_SERVICE_KEY")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("BACKEND_SERVICE_KEY"))?;

    Ok(BackendClient::new(&BackendConfig::new(url, key))?)
}
