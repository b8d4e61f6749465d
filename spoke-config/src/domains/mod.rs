//! Domain-specific configuration modules

pub mod credentials;
pub mod endpoints;
pub mod environment;
pub mod http;
pub mod logging;
pub mod services;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::{require, Validatable};
use serde::{Deserialize, Serialize};

/// Main spoke configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpokeConfig {
    /// Target environment
    #[serde(default)]
    pub environment: environment::EnvironmentConfig,

    /// Service base URLs
    #[serde(default)]
    pub services: services::ServicesConfig,

    /// Endpoint paths
    #[serde(default)]
    pub endpoints: endpoints::EndpointsConfig,

    /// Test account credentials
    #[serde(default)]
    pub credentials: credentials::CredentialsConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl SpokeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.environment.validate()?;
        self.services.validate()?;
        self.endpoints.validate()?;
        self.credentials.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Check that everything the OTP login handshake needs is present
    pub fn validate_for_auth(&self) -> ConfigResult<()> {
        require(self.services.users_url.as_deref(), "users_url", "services")?;
        require(
            self.endpoints.login_request.as_deref(),
            "login_request",
            "endpoints",
        )?;
        require(
            self.endpoints.verify_login.as_deref(),
            "verify_login",
            "endpoints",
        )?;
        require(self.credentials.phone.as_deref(), "phone", "credentials")?;
        require(self.credentials.code.as_deref(), "code", "credentials")?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = SpokeConfig::default();
        config.environment.name = Some("stage".to_string());
        config.services.users_url = Some("https://users.example.com".to_string());
        config.services.bikes_url = Some("https://bikes.example.com".to_string());
        config.services.notifications_url = Some("https://notifications.example.com".to_string());
        config.endpoints.login_request = Some("/auth/login".to_string());
        config.endpoints.verify_login = Some("/auth/verify".to_string());
        config.endpoints.list_notifications = Some("/notifications".to_string());
        config.endpoints.update_notification = Some("/notifications".to_string());
        config.endpoints.list_bikes = Some("/bikes".to_string());

        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
