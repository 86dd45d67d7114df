//! Application state shared across handlers.

use std::sync::Arc;

use forkful_backend::{BackendClient, BackendError};
use sqlx::PgPool;

use crate::config::{StoreInfo, StorefrontConfig};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; nothing inside is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    backend: BackendClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client can't be built from the config.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                backend,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the data backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Store identity (name, phone, currency).
    #[must_use]
    pub fn store(&self) -> &StoreInfo {
        &self.inner.config.store
    }
}
