//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate that an optional setting was provided, returning it
pub fn require<'a>(value: Option<&'a str>, field_name: &str, domain: &str) -> ConfigResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField {
            domain: domain.to_string(),
            field: field_name.to_string(),
        }),
    }
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }

    let parsed = url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!(
                "{} must use http or https, got '{}'",
                field_name,
                parsed.scheme()
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://users.example.com", "users_url", "services").is_ok());
        assert!(validate_url("http://localhost:8080/api", "users_url", "services").is_ok());
        assert!(validate_url("", "users_url", "services").is_err());
        assert!(validate_url("users.example.com", "users_url", "services").is_err());
        assert!(validate_url("ftp://files.example.com", "users_url", "services").is_err());
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some("x"), "phone", "credentials").unwrap(), "x");

        let err = require(Some("  "), "phone", "credentials").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
        assert!(require(None, "phone", "credentials").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u64, "timeout", "http").is_ok());
        assert!(validate_positive(0u64, "timeout", "http").is_err());
    }
}
