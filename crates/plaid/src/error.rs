//! Error types for the Plaid client crate.

use thiserror::Error;

/// Result type alias for Plaid API operations.
pub type Result<T> = std::result::Result<T, PlaidError>;

/// Errors that can occur while talking to the Plaid API.
#[derive(Debug, Error)]
pub enum PlaidError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured error response from the Plaid API
    #[error("Plaid API error ({status}) {error_type}/{error_code}: {message}")]
    Api {
        status: u16,
        error_type: String,
        error_code: String,
        message: String,
    },

    /// Invalid request (missing required data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl PlaidError {
    pub fn api(
        status: u16,
        error_type: impl Into<String>,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            status,
            error_type: error_type.into(),
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

impl From<PlaidError> for pocketledger_core::Error {
    fn from(err: PlaidError) -> Self {
        pocketledger_core::Error::Aggregator(err.to_string())
    }
}
