//! Smoke call error types

use spoke_http::HttpError;
use thiserror::Error;

pub type SmokeResult<T> = Result<T, SmokeError>;

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Response has no {0}")]
    MissingData(&'static str),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl SmokeError {
    /// Map a non-success response onto an error
    pub(crate) fn from_status(response: &spoke_http::HttpResponse) -> Self {
        let message = response
            .error_message()
            .unwrap_or_else(|| "Unknown error".to_string());
        if response.status == 401 {
            SmokeError::Unauthorized(message)
        } else {
            SmokeError::UnexpectedStatus {
                status: response.status,
                message,
            }
        }
    }
}
