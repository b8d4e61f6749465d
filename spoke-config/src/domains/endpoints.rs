//! API endpoint paths, relative to the service base URLs

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Users service: request an OTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_request: Option<String>,

    /// Users service: exchange the OTP for tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_login: Option<String>,

    /// Notifications service: list notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_notifications: Option<String>,

    /// Notifications service: update a notification (id is appended)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_notification: Option<String>,

    /// Bikes service: list bikes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_bikes: Option<String>,
}

impl Validatable for EndpointsConfig {
    fn validate(&self) -> ConfigResult<()> {
        let endpoints = [
            ("login_request", &self.login_request),
            ("verify_login", &self.verify_login),
            ("list_notifications", &self.list_notifications),
            ("update_notification", &self.update_notification),
            ("list_bikes", &self.list_bikes),
        ];

        for (field, endpoint) in endpoints {
            if let Some(endpoint) = endpoint {
                if endpoint.contains("://") {
                    return Err(self.validation_error(format!(
                        "{} must be a path, not an absolute URL: {}",
                        field, endpoint
                    )));
                }
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "endpoints"
    }
}
