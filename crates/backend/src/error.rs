//! Backend client errors.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body didn't match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single-row lookup matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A query used a column name that can't be sent safely.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Configured base URL can't be turned into a REST endpoint.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Whether this is a "no such row" condition rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Pull a human-readable message out of an error body.
///
/// PostgREST errors look like `{"code":"22P02","message":"...","details":...}`;
/// anything else is returned truncated.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_postgrest_body() {
        let body = r#"{"code":"22P02","details":null,"hint":null,"message":"invalid input syntax for type uuid"}"#;
        assert_eq!(error_message(body), "invalid input syntax for type uuid");
    }

    #[test]
    fn test_error_message_truncates_plain_body() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
    }

    #[test]
    fn test_status_display() {
        let err = BackendError::Status {
            status: 404,
            message: "relation \"public.nope\" does not exist".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned 404: relation \"public.nope\" does not exist"
        );
        assert!(!err.is_not_found());
        assert!(BackendError::NotFound("orders".into()).is_not_found());
    }
}
