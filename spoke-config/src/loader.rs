//! Configuration loading and environment variable handling

use crate::domains::utils::non_blank;
use crate::domains::SpokeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;

/// Configuration loader with environment variable support
///
/// Variables are read unprefixed by default (`USER_URL`, `PHONE`, ...), which
/// matches how the suite is driven from CI. A prefix turns `PHONE` into
/// `{PREFIX}_PHONE`.
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader reading unprefixed variables
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: non_blank(Some(prefix)),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SpokeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SpokeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SpokeConfig> {
        let mut config = SpokeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SpokeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut SpokeConfig) -> ConfigResult<()> {
        self.apply_environment_overrides(&mut config.environment);
        self.apply_services_overrides(&mut config.services);
        self.apply_endpoints_overrides(&mut config.endpoints);
        self.apply_credentials_overrides(&mut config.credentials);
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_environment_overrides(
        &self,
        config: &mut crate::domains::environment::EnvironmentConfig,
    ) {
        if let Some(name) = self.get_env_var("ENVIRONMENT") {
            config.name = Some(name);
        }
    }

    fn apply_services_overrides(&self, config: &mut crate::domains::services::ServicesConfig) {
        self.override_opt(&mut config.users_url, "USER_URL");
        self.override_opt(&mut config.bikes_url, "BIKE_URL");
        self.override_opt(&mut config.notifications_url, "NOTIF_URL");
    }

    fn apply_endpoints_overrides(&self, config: &mut crate::domains::endpoints::EndpointsConfig) {
        self.override_opt(&mut config.login_request, "LOGIN_REQUEST_ENDPOINT");
        self.override_opt(&mut config.verify_login, "VERIFY_LOGIN_ENDPOINT");
        self.override_opt(&mut config.list_notifications, "LIST_NOTIFICATIONS_ENDPOINT");
        self.override_opt(
            &mut config.update_notification,
            "UPDATE_NOTIFICATION_ENDPOINT",
        );
        self.override_opt(&mut config.list_bikes, "LIST_BIKES_ENDPOINT");
    }

    fn apply_credentials_overrides(
        &self,
        config: &mut crate::domains::credentials::CredentialsConfig,
    ) {
        self.override_opt(&mut config.phone, "PHONE");
        self.override_opt(&mut config.code, "CODE");
        if let Some(delivery_type) = self.get_env_var("TYPE") {
            config.delivery_type = delivery_type;
        }
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Some(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Some(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Some(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_VERIFY_SSL: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        use std::str::FromStr;

        if let Some(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Some(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn override_opt(&self, slot: &mut Option<String>, name: &str) {
        if let Some(value) = self.get_env_var(name) {
            *slot = Some(value);
        }
    }

    /// Get a non-blank environment variable, honouring the prefix
    fn get_env_var(&self, name: &str) -> Option<String> {
        let key = match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, name),
            None => name.to_string(),
        };
        non_blank(std::env::var(key).ok())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
