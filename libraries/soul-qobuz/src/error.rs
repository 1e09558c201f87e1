//! Error types for the Qobuz catalog client.

use thiserror::Error;

/// Errors that can occur while talking to the Qobuz API or building entities
/// from its responses.
#[derive(Error, Debug)]
pub enum QobuzError {
    /// A mandatory fragment was absent from an API payload
    #[error("{entity} payload is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// An API payload could not be turned into an entity
    #[error("invalid {entity} payload: {reason}")]
    InvalidPayload {
        entity: &'static str,
        reason: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Credentials or user token were rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// API is unreachable (connect error or timeout)
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// A response body was not valid JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A batching operation was asked for zero ids per request
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Invalid or incomplete client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl QobuzError {
    /// Whether the error came out of the transport rather than entity
    /// construction or local validation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request(_)
                | Self::ServerError { .. }
                | Self::AuthFailed(_)
                | Self::ServerUnreachable(_)
                | Self::ParseError(_)
        )
    }

    pub(crate) fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}

/// Result type for Qobuz client operations.
pub type Result<T> = std::result::Result<T, QobuzError>;
