//! Wire formats of the two users-service login contracts
//!
//! | contract | login body         | verify body        | verify ok | tokens at |
//! |----------|--------------------|--------------------|-----------|-----------|
//! | V1       | `{phone, type}`    | `{to, code}`       | 200       | `data.*`  |
//! | V2       | `{identity, type}` | `{identity, code}` | 201       | top level |

use crate::error::{AuthError, AuthResult};
use crate::types::{AuthTokens, Credentials};
use crate::version::AuthVersion;
use serde_json::{json, Value as JsonValue};

/// Strategy for one login contract
pub trait AuthProtocol: Send + Sync {
    fn version(&self) -> AuthVersion;

    /// Body of the OTP request
    fn login_payload(&self, credentials: &Credentials) -> JsonValue;

    /// Body of the OTP verification
    fn verify_payload(&self, credentials: &Credentials) -> JsonValue;

    fn login_success_status(&self) -> u16 {
        200
    }

    fn verify_success_status(&self) -> u16;

    /// Pull the tokens out of a successful verification body
    fn extract_tokens(&self, body: &JsonValue) -> AuthResult<AuthTokens>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct V1Protocol;

#[derive(Debug, Clone, Copy, Default)]
pub struct V2Protocol;

impl AuthProtocol for V1Protocol {
    fn version(&self) -> AuthVersion {
        AuthVersion::V1
    }

    fn login_payload(&self, credentials: &Credentials) -> JsonValue {
        json!({
            "phone": credentials.identity,
            "type": credentials.delivery_type,
        })
    }

    fn verify_payload(&self, credentials: &Credentials) -> JsonValue {
        json!({
            "to": credentials.identity,
            "code": credentials.code,
        })
    }

    fn verify_success_status(&self) -> u16 {
        200
    }

    fn extract_tokens(&self, body: &JsonValue) -> AuthResult<AuthTokens> {
        const PATH: &str = "data.access_token";
        match body.get("data") {
            Some(data) => tokens_from(data, self.version(), PATH),
            None => Err(AuthError::MissingToken {
                version: self.version(),
                path: PATH,
            }),
        }
    }
}

impl AuthProtocol for V2Protocol {
    fn version(&self) -> AuthVersion {
        AuthVersion::V2
    }

    fn login_payload(&self, credentials: &Credentials) -> JsonValue {
        json!({
            "identity": credentials.identity,
            "type": credentials.delivery_type,
        })
    }

    fn verify_payload(&self, credentials: &Credentials) -> JsonValue {
        json!({
            "identity": credentials.identity,
            "code": credentials.code,
        })
    }

    fn verify_success_status(&self) -> u16 {
        201
    }

    fn extract_tokens(&self, body: &JsonValue) -> AuthResult<AuthTokens> {
        tokens_from(body, self.version(), "access_token")
    }
}

fn tokens_from(
    container: &JsonValue,
    version: AuthVersion,
    path: &'static str,
) -> AuthResult<AuthTokens> {
    let access_token = container
        .get("access_token")
        .and_then(JsonValue::as_str)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken { version, path })?;

    let refresh_token = container
        .get("refresh_token")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    Ok(AuthTokens::new(access_token, refresh_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("6281200000001", "whatsapp", "123456")
    }

    #[test]
    fn test_v1_payloads() {
        let protocol = V1Protocol;
        assert_eq!(
            protocol.login_payload(&creds()),
            json!({"phone": "6281200000001", "type": "whatsapp"})
        );
        assert_eq!(
            protocol.verify_payload(&creds()),
            json!({"to": "6281200000001", "code": "123456"})
        );
        assert_eq!(protocol.login_success_status(), 200);
        assert_eq!(protocol.verify_success_status(), 200);
    }

    #[test]
    fn test_v2_payloads() {
        let protocol = V2Protocol;
        assert_eq!(
            protocol.login_payload(&creds()),
            json!({"identity": "6281200000001", "type": "whatsapp"})
        );
        assert_eq!(
            protocol.verify_payload(&creds()),
            json!({"identity": "6281200000001", "code": "123456"})
        );
        assert_eq!(protocol.login_success_status(), 200);
        assert_eq!(protocol.verify_success_status(), 201);
    }

    #[test]
    fn test_v1_tokens_are_nested() {
        let body = json!({"data": {"access_token": "a1", "refresh_token": "r1"}});
        let tokens = V1Protocol.extract_tokens(&body).unwrap();
        assert_eq!(tokens.access_token, "a1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r1"));

        // top-level tokens are not the V1 shape
        let flat = json!({"access_token": "a1"});
        assert!(matches!(
            V1Protocol.extract_tokens(&flat),
            Err(AuthError::MissingToken { path: "data.access_token", .. })
        ));
    }

    #[test]
    fn test_v2_tokens_are_top_level() {
        let body = json!({"access_token": "a2", "refresh_token": "r2"});
        let tokens = V2Protocol.extract_tokens(&body).unwrap();
        assert_eq!(tokens.access_token, "a2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r2"));

        let nested = json!({"data": {"access_token": "a2"}});
        assert!(V2Protocol.extract_tokens(&nested).is_err());
    }

    #[test]
    fn test_refresh_token_is_optional_but_access_token_is_not() {
        let tokens = V2Protocol.extract_tokens(&json!({"access_token": "a"})).unwrap();
        assert!(tokens.refresh_token.is_none());

        assert!(V2Protocol.extract_tokens(&json!({"access_token": ""})).is_err());
        assert!(V2Protocol.extract_tokens(&json!({"access_token": 42})).is_err());
        assert!(V1Protocol.extract_tokens(&JsonValue::Null).is_err());
    }
}
