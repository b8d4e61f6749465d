//! Target environment selection

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Which deployment the suite is pointed at.
///
/// The name doubles as the auth contract selector: names ending in `v1`
/// (e.g. `stagev1`, `prodv1`) talk to the legacy users API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment name, e.g. `stage`, `stagev1`, `prod`, `prodv1`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EnvironmentConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Validatable for EnvironmentConfig {
    // Every name maps to a contract
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_name_is_valid() {
        assert!(EnvironmentConfig::default().validate().is_ok());
        assert!(EnvironmentConfig::named("prodv1").validate().is_ok());
        assert!(EnvironmentConfig::named("qa env").validate().is_ok());
        assert_eq!(EnvironmentConfig::named("stagev1").name(), Some("stagev1"));
    }
}
