//! Integration tests for spoke-config

use spoke_config::domains::logging::{LogFormat, LogLevel};
use spoke_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

const AUTH_VARS: [&str; 16] = [
    "ENVIRONMENT",
    "USER_URL",
    "BIKE_URL",
    "NOTIF_URL",
    "LOGIN_REQUEST_ENDPOINT",
    "VERIFY_LOGIN_ENDPOINT",
    "LIST_NOTIFICATIONS_ENDPOINT",
    "UPDATE_NOTIFICATION_ENDPOINT",
    "LIST_BIKES_ENDPOINT",
    "PHONE",
    "TYPE",
    "CODE",
    "HTTP_TIMEOUT",
    "HTTP_USER_AGENT",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

/// Every known variable, unset unless overridden, so the host environment
/// cannot leak into a test.
fn env_with(
    overrides: &[(&'static str, &'static str)],
) -> Vec<(&'static str, Option<&'static str>)> {
    let mut vars: Vec<(&'static str, Option<&'static str>)> = AUTH_VARS
        .iter()
        .map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| *value);
            (*name, value)
        })
        .collect();
    for (key, value) in overrides {
        if !AUTH_VARS.contains(key) {
            vars.push((*key, Some(*value)));
        }
    }
    vars
}

#[test]
fn test_config_loader_from_env() {
    let vars = env_with(&[
        ("ENVIRONMENT", "prodv1"),
        ("USER_URL", "https://users.example.com"),
        ("NOTIF_URL", "https://notifications.example.com"),
        ("LOGIN_REQUEST_ENDPOINT", "/auth/login"),
        ("VERIFY_LOGIN_ENDPOINT", "/auth/verify"),
        ("PHONE", "6281200000001"),
        ("CODE", "123456"),
        ("HTTP_TIMEOUT", "5"),
        ("LOG_LEVEL", "debug"),
        ("LOG_FORMAT", "json"),
    ]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.environment.name(), Some("prodv1"));
        assert_eq!(
            config.services.users_url.as_deref(),
            Some("https://users.example.com")
        );
        assert_eq!(config.credentials.phone.as_deref(), Some("6281200000001"));
        assert_eq!(config.credentials.delivery_type, "whatsapp");
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate_for_auth().is_ok());
    });
}

#[test]
fn test_blank_and_undefined_values_are_unset() {
    let vars = env_with(&[("PHONE", "  "), ("CODE", "undefined")]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert!(config.credentials.phone.is_none());
        assert!(config.credentials.code.is_none());
    });
}

#[test]
fn test_env_values_are_trimmed() {
    let vars = env_with(&[("ENVIRONMENT", "stagev1 "), ("PHONE", " 6281200000001\n")]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.environment.name(), Some("stagev1"));
        assert_eq!(config.credentials.phone.as_deref(), Some("6281200000001"));
    });
}

#[test]
fn test_non_numeric_identity_loads() {
    let vars = env_with(&[("PHONE", "qa@example.com"), ("CODE", "123456")]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.credentials.phone.as_deref(), Some("qa@example.com"));
    });
}

#[test]
fn test_prefixed_loader() {
    let vars = env_with(&[
        ("PHONE", "111"),
        ("SPOKE_PHONE", "6281200000002"),
        ("SPOKE_TYPE", "sms"),
    ]);

    with_vars(vars, || {
        let config = ConfigLoader::with_prefix("SPOKE").from_env().unwrap();
        assert_eq!(config.credentials.phone.as_deref(), Some("6281200000002"));
        assert_eq!(config.credentials.delivery_type, "sms");
    });
}

#[test]
fn test_invalid_env_values_are_rejected() {
    with_vars(env_with(&[("HTTP_TIMEOUT", "soon")]), || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    });

    with_vars(env_with(&[("USER_URL", "users.internal")]), || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { .. }));
    });
}

#[test]
fn test_yaml_file_with_env_override() {
    let yaml = r#"
environment:
  name: stage
services:
  users_url: "https://users.example.com"
endpoints:
  login_request: /auth/login
  verify_login: /auth/verify
credentials:
  phone: "6281200000001"
  type: whatsapp
  code: "000000"
http:
  timeout: 15
  user_agent: "spoke-test"
logging:
  level: warn
  format: compact
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(env_with(&[("ENVIRONMENT", "stagev1")]), || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert_eq!(config.environment.name(), Some("stagev1"));
        assert_eq!(config.http.timeout, Duration::from_secs(15));
        assert_eq!(config.http.user_agent, "spoke-test");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.credentials.code.as_deref(), Some("000000"));
    });
}

#[test]
fn test_missing_file_is_read_error() {
    let err = ConfigLoader::new()
        .from_file("/definitely/not/here/spoke.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}
