//! Test account credentials

use crate::domains::utils::mask_secret;
use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity, OTP delivery channel and the fixed OTP code of the test account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Phone number / identity of the test account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// OTP delivery channel
    #[serde(rename = "type", default = "default_delivery_type")]
    pub delivery_type: String,

    /// OTP code accepted for the test account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            phone: None,
            delivery_type: default_delivery_type(),
            code: None,
        }
    }
}

// The OTP code never reaches logs in clear text.
impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("phone", &self.phone)
            .field("delivery_type", &self.delivery_type)
            .field("code", &self.code.as_deref().map(mask_secret))
            .finish()
    }
}

impl Validatable for CredentialsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.delivery_type, "type", self.domain_name())?;

        if let Some(ref phone) = self.phone {
            validate_required_string(phone, "phone", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "credentials"
    }
}

fn default_delivery_type() -> String {
    "whatsapp".to_string()
}
