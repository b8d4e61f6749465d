//! Authentication error types

use crate::version::AuthVersion;
use spoke_config::ConfigError;
use spoke_http::HttpError;
use std::fmt;
use thiserror::Error;

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// The two requests of the OTP handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    Login,
    Verify,
}

impl fmt::Display for AuthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStep::Login => f.write_str("login request"),
            AuthStep::Verify => f.write_str("OTP verification"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The service answered with a status other than the contract's success code
    #[error("{step} ({version}) expected status {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        step: AuthStep,
        version: AuthVersion,
        expected: u16,
        actual: u16,
        body: String,
    },

    /// Verification succeeded but the token was not where the contract puts it
    #[error("{version} verify response has no {path}")]
    MissingToken { version: AuthVersion, path: &'static str },

    #[error("HTTP error during {step}: {source}")]
    Http {
        step: AuthStep,
        #[source]
        source: HttpError,
    },

    #[error("Auth configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AuthError {
    pub fn step(&self) -> Option<AuthStep> {
        match self {
            AuthError::UnexpectedStatus { step, .. } | AuthError::Http { step, .. } => Some(*step),
            AuthError::MissingToken { .. } => Some(AuthStep::Verify),
            AuthError::Config(_) => None,
        }
    }
}
