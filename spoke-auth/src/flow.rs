//! Two-step OTP handshake: request a code, then exchange it for tokens

use crate::error::{AuthError, AuthResult, AuthStep};
use crate::protocol::AuthProtocol;
use crate::types::{AuthTokens, Credentials};
use crate::version::AuthVersion;
use spoke_config::SpokeConfig;
use spoke_http::{join_url, HttpClient, HttpResponse};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Upper bound on response text carried into error messages
const MAX_BODY_IN_ERROR: usize = 512;

/// Runs the login handshake against the users service
#[derive(Clone)]
pub struct AuthFlow {
    client: Arc<dyn HttpClient>,
    users_url: String,
    login_endpoint: String,
    verify_endpoint: String,
    credentials: Credentials,
}

impl AuthFlow {
    pub fn new(
        client: Arc<dyn HttpClient>,
        users_url: impl Into<String>,
        login_endpoint: impl Into<String>,
        verify_endpoint: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            users_url: users_url.into(),
            login_endpoint: login_endpoint.into(),
            verify_endpoint: verify_endpoint.into(),
            credentials,
        }
    }

    /// Build from configuration, failing if any handshake setting is missing
    pub fn from_config(client: Arc<dyn HttpClient>, config: &SpokeConfig) -> AuthResult<Self> {
        config.validate_for_auth()?;

        let credentials = Credentials::try_from(&config.credentials)?;
        // validate_for_auth guarantees these are present
        let users_url = config.services.users_url.clone().unwrap_or_default();
        let login_endpoint = config.endpoints.login_request.clone().unwrap_or_default();
        let verify_endpoint = config.endpoints.verify_login.clone().unwrap_or_default();

        Ok(Self::new(
            client,
            users_url,
            login_endpoint,
            verify_endpoint,
            credentials,
        ))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn login_url(&self) -> String {
        join_url(&self.users_url, &self.login_endpoint)
    }

    pub fn verify_url(&self) -> String {
        join_url(&self.users_url, &self.verify_endpoint)
    }

    /// Ask the users service to send an OTP to the configured identity
    pub async fn request_login(&self, protocol: &dyn AuthProtocol) -> AuthResult<HttpResponse> {
        let url = self.login_url();
        debug!(
            "Requesting OTP ({}) for {} via {} at {}",
            protocol.version(),
            self.credentials.identity,
            self.credentials.delivery_type,
            url
        );

        let response = self
            .client
            .post_json(&url, protocol.login_payload(&self.credentials))
            .await
            .map_err(|source| AuthError::Http {
                step: AuthStep::Login,
                source,
            })?;

        expect_status(
            &response,
            AuthStep::Login,
            protocol.version(),
            protocol.login_success_status(),
        )?;
        Ok(response)
    }

    /// Exchange the OTP code for tokens
    pub async fn verify_otp(&self, protocol: &dyn AuthProtocol) -> AuthResult<AuthTokens> {
        let url = self.verify_url();
        debug!("Verifying OTP ({}) at {}", protocol.version(), url);

        let response = self
            .client
            .post_json(&url, protocol.verify_payload(&self.credentials))
            .await
            .map_err(|source| AuthError::Http {
                step: AuthStep::Verify,
                source,
            })?;

        expect_status(
            &response,
            AuthStep::Verify,
            protocol.version(),
            protocol.verify_success_status(),
        )?;
        protocol.extract_tokens(&response.body)
    }

    /// Login then verify. A failed login short-circuits; nothing is retried.
    pub async fn authenticate(&self, version: AuthVersion) -> AuthResult<AuthTokens> {
        let protocol = version.protocol();
        self.request_login(protocol).await?;
        let tokens = self.verify_otp(protocol).await?;
        info!(
            "Authenticated with {} contract, access token {}",
            version,
            tokens.preview()
        );
        Ok(tokens)
    }

    /// Like [`authenticate`](Self::authenticate), but failures are logged with
    /// enough context to fix the configuration and reported as `None`.
    pub async fn acquire(&self, version: AuthVersion) -> Option<AuthTokens> {
        match self.authenticate(version).await {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                error!(
                    version = %version,
                    users_url = %self.users_url,
                    login_endpoint = %self.login_endpoint,
                    verify_endpoint = %self.verify_endpoint,
                    identity = %self.credentials.identity,
                    delivery_type = %self.credentials.delivery_type,
                    code = %self.credentials.masked_code(),
                    "Failed to obtain authentication token: {}",
                    e
                );
                None
            }
        }
    }
}

fn expect_status(
    response: &HttpResponse,
    step: AuthStep,
    version: AuthVersion,
    expected: u16,
) -> AuthResult<()> {
    if response.status == expected {
        return Ok(());
    }

    let mut body = match &response.body {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if body.len() > MAX_BODY_IN_ERROR {
        let mut cut = MAX_BODY_IN_ERROR;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }

    Err(AuthError::UnexpectedStatus {
        step,
        version,
        expected,
        actual: response.status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expect_status() {
        let ok = HttpResponse::new(201, json!({}));
        assert!(expect_status(&ok, AuthStep::Verify, AuthVersion::V2, 201).is_ok());

        // 200 is not success for the V2 verify step
        let wrong = HttpResponse::new(200, json!({"access_token": "a"}));
        match expect_status(&wrong, AuthStep::Verify, AuthVersion::V2, 201) {
            Err(AuthError::UnexpectedStatus {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 201);
                assert_eq!(actual, 200);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_error_body_is_truncated() {
        let response = HttpResponse::new(500, json!("x".repeat(2000)));
        let err = expect_status(&response, AuthStep::Login, AuthVersion::V1, 200).unwrap_err();
        match err {
            AuthError::UnexpectedStatus { body, .. } => {
                assert_eq!(body.len(), MAX_BODY_IN_ERROR + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
