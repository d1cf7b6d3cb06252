//! Error handling for catalog API operations.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the catalog for rejected requests,
/// e.g. `{"status_code": 7, "status_message": "Invalid API key"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub status_code: Option<i64>,
    pub status_message: String,
}

/// Common error type for catalog API operations.
///
/// Every variant is terminal for the request that produced it,
/// the client never retries on its own.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The request could not be built, e.g. a page number below 1.
    #[error("invalid catalog request: {0}")]
    InvalidRequest(String),
    /// Connection, timeout or body transfer failure.
    #[error("could not reach the movie catalog")]
    Transport(#[source] reqwest::Error),
    /// The response body was not the expected JSON document.
    #[error("could not decode catalog response")]
    Decode(#[source] serde_json::Error),
    /// The catalog answered with a non-success status.
    #[error("catalog responded with {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl CatalogClientError {
    /// Build an [CatalogClientError::Api] from a non-success response body.
    ///
    /// The body is only used if it parses as an [ApiErrorResponse],
    /// anything else may be HTML garbage from a proxy and is omitted.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ApiErrorResponse>(body) {
            Ok(parsed) => parsed.status_message,
            Err(_) => "response body omitted".to_string(),
        };
        CatalogClientError::Api { status, message }
    }

    /// Whether the error happened before a well-formed answer was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogClientError::Transport(_) | CatalogClientError::Api { .. }
        )
    }
}
