//! HTTP client for the backend REST interface.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;
use crate::error::{BackendError, error_message};
use crate::query::{Query, Table};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the backend's PostgREST endpoint.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl BackendClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or the HTTP client fails
    /// to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                endpoint: config.rest_endpoint()?,
                api_key: config.api_key.expose_secret().to_string(),
            }),
        })
    }

    /// REST root this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    fn request(&self, method: Method, table: Table) -> Result<RequestBuilder, BackendError> {
        let url = self.inner.endpoint.join(table.as_str())?;
        Ok(self
            .inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .header("Accept", "application/json"))
    }

    /// Send a request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        table: Table,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                %table,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                %table,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Read rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid, the request fails, or rows
    /// don't deserialize into `T`.
    #[instrument(skip(self, query))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let pairs = query.to_pairs()?;
        debug!(?pairs, "select");
        let request = self.request(Method::GET, table)?.query(&pairs);
        self.execute(request, table).await
    }

    /// Read the first row matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if nothing matches, or any error
    /// [`select`](Self::select) can return.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: Table,
        query: Query,
    ) -> Result<T, BackendError> {
        self.select(table, &query.limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(table.to_string()))
    }

    /// Insert one row (or an array of rows) and return what was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the row.
    #[instrument(skip(self, body))]
    pub async fn insert<B, T>(&self, table: Table, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, table)?
            .header("Prefer", "return=representation")
            .json(body);
        self.execute(request, table).await
    }

    /// Insert, merging into an existing row on `on_conflict` collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the row.
    #[instrument(skip(self, body))]
    pub async fn upsert<B, T>(
        &self,
        table: Table,
        body: &B,
        on_conflict: &str,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, table)?
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body);
        self.execute(request, table).await
    }

    /// Patch every row matching `query`'s filters and return the new rows.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidFilter`] for an unfiltered query (which
    /// would touch the whole table), or any request error.
    #[instrument(skip(self, query, body))]
    pub async fn update<B, T>(
        &self,
        table: Table,
        query: &Query,
        body: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        if !query.has_filters() {
            return Err(BackendError::InvalidFilter(
                "update without a filter".to_string(),
            ));
        }
        let pairs = query.to_pairs()?;
        let request = self
            .request(Method::PATCH, table)?
            .query(&pairs)
            .header("Prefer", "return=representation")
            .json(body);
        self.execute(request, table).await
    }

    /// Cheap reachability check used by readiness probes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't be reached or rejects the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let query = Query::new().select("id").limit(1);
        self.select::<serde_json::Value>(Table::Categories, &query)
            .await
            .map(|_| ())
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
