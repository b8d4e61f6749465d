//! Credentials, tokens and virtual-user identifiers

use chrono::{DateTime, Utc};
use spoke_config::domains::utils::mask_secret;
use spoke_config::{ConfigError, CredentialsConfig};
use std::fmt;

/// Identifier of a virtual user within one run
pub type VuId = u32;

/// Characters of a token shown in diagnostics
const TOKEN_PREVIEW_LEN: usize = 20;

/// Identity, delivery channel and OTP code for the handshake
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identity: String,
    pub delivery_type: String,
    pub code: String,
}

impl Credentials {
    pub fn new(
        identity: impl Into<String>,
        delivery_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            delivery_type: delivery_type.into(),
            code: code.into(),
        }
    }

    pub fn masked_code(&self) -> String {
        mask_secret(&self.code)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("delivery_type", &self.delivery_type)
            .field("code", &self.masked_code())
            .finish()
    }
}

impl TryFrom<&CredentialsConfig> for Credentials {
    type Error = ConfigError;

    fn try_from(config: &CredentialsConfig) -> Result<Self, Self::Error> {
        let missing = |field: &str| ConfigError::MissingField {
            domain: "credentials".to_string(),
            field: field.to_string(),
        };

        let identity = config.phone.clone().ok_or_else(|| missing("phone"))?;
        let code = config.code.clone().ok_or_else(|| missing("code"))?;

        Ok(Self {
            identity,
            delivery_type: config.delivery_type.clone(),
            code,
        })
    }
}

/// Tokens returned by a successful OTP verification
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub acquired_at: DateTime<Utc>,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            acquired_at: Utc::now(),
        }
    }

    /// `JWT <access>` form some services still accept
    pub fn jwt_token(&self) -> String {
        format!("JWT {}", self.access_token)
    }

    /// `Bearer <access>` authorization header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Leading slice of the access token, safe to log
    pub fn preview(&self) -> String {
        let head: String = self.access_token.chars().take(TOKEN_PREVIEW_LEN).collect();
        if head.len() < self.access_token.len() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &self.preview())
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}
