//! Base URLs of the services under test

use crate::error::ConfigResult;
use crate::validation::{validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Base URLs for the users, bikes and notifications services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Users service (login and OTP verification live here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_url: Option<String>,

    /// Bikes service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bikes_url: Option<String>,

    /// Notifications service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_url: Option<String>,
}

impl Validatable for ServicesConfig {
    fn validate(&self) -> ConfigResult<()> {
        let urls = [
            ("users_url", &self.users_url),
            ("bikes_url", &self.bikes_url),
            ("notifications_url", &self.notifications_url),
        ];

        for (field, url) in urls {
            if let Some(url) = url {
                validate_url(url, field, self.domain_name())?;
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "services"
    }
}
