//! Environment name → auth contract resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::protocol::{AuthProtocol, V1Protocol, V2Protocol};

/// Environment assumed when neither the caller nor the configuration names one
pub const DEFAULT_ENVIRONMENT: &str = "stage";

/// Users-service login contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthVersion {
    /// Legacy contract (`phone`/`to` fields, tokens nested under `data`)
    V1,
    /// Current contract (`identity` fields, tokens at the top level)
    #[default]
    V2,
}

impl AuthVersion {
    /// Pick the contract for an environment name.
    ///
    /// Names ending in `v1` (any case) select V1; everything else, including
    /// an absent or empty name, selects V2.
    pub fn resolve(environment: Option<&str>) -> AuthVersion {
        match environment {
            Some(name) if !name.is_empty() => {
                if name.to_lowercase().ends_with("v1") {
                    AuthVersion::V1
                } else {
                    AuthVersion::V2
                }
            }
            _ => AuthVersion::V2,
        }
    }

    /// The wire-format strategy for this contract
    pub fn protocol(self) -> &'static dyn AuthProtocol {
        static V1: V1Protocol = V1Protocol;
        static V2: V2Protocol = V2Protocol;

        match self {
            AuthVersion::V1 => &V1,
            AuthVersion::V2 => &V2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthVersion::V1 => "V1",
            AuthVersion::V2 => "V2",
        }
    }
}

impl fmt::Display for AuthVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "V1" => Ok(AuthVersion::V1),
            "V2" => Ok(AuthVersion::V2),
            _ => Err(format!("Invalid auth version: {}", s)),
        }
    }
}

/// Deployment family an environment name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseEnvironment {
    Stage,
    Prod,
}

impl BaseEnvironment {
    /// `prod*` names are production; everything else (stage, staging, dev, ...) is stage
    pub fn of(environment: Option<&str>) -> BaseEnvironment {
        match environment {
            Some(name) if name.to_lowercase().starts_with("prod") => BaseEnvironment::Prod,
            _ => BaseEnvironment::Stage,
        }
    }
}

impl fmt::Display for BaseEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseEnvironment::Stage => f.write_str("stage"),
            BaseEnvironment::Prod => f.write_str("prod"),
        }
    }
}

/// Effective environment name: an explicit non-empty name wins, then the
/// configured one, then [`DEFAULT_ENVIRONMENT`].
pub fn resolve_environment(explicit: Option<&str>, configured: Option<&str>) -> String {
    explicit
        .filter(|name| !name.is_empty())
        .or(configured.filter(|name| !name.is_empty()))
        .unwrap_or(DEFAULT_ENVIRONMENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_suffix_selects_v1() {
        for name in ["stagev1", "prodv1", "PRODV1", "StageV1", "v1", "qa-V1"] {
            assert_eq!(AuthVersion::resolve(Some(name)), AuthVersion::V1, "{}", name);
        }
    }

    #[test]
    fn test_everything_else_selects_v2() {
        for name in ["stage", "prod", "dev", "test", "v1stage", "prodv2", "v", "1"] {
            assert_eq!(AuthVersion::resolve(Some(name)), AuthVersion::V2, "{}", name);
        }
        assert_eq!(AuthVersion::resolve(Some("")), AuthVersion::V2);
        assert_eq!(AuthVersion::resolve(None), AuthVersion::V2);
    }

    #[test]
    fn test_protocol_matches_version() {
        assert_eq!(AuthVersion::V1.protocol().version(), AuthVersion::V1);
        assert_eq!(AuthVersion::V2.protocol().version(), AuthVersion::V2);
    }

    #[test]
    fn test_version_parse_and_display() {
        assert_eq!("v1".parse::<AuthVersion>().unwrap(), AuthVersion::V1);
        assert_eq!("V2".parse::<AuthVersion>().unwrap(), AuthVersion::V2);
        assert!("v3".parse::<AuthVersion>().is_err());
        assert_eq!(AuthVersion::V1.to_string(), "V1");
    }

    #[test]
    fn test_base_environment() {
        assert_eq!(BaseEnvironment::of(Some("prodv1")), BaseEnvironment::Prod);
        assert_eq!(BaseEnvironment::of(Some("Production")), BaseEnvironment::Prod);
        assert_eq!(BaseEnvironment::of(Some("stagev1")), BaseEnvironment::Stage);
        assert_eq!(BaseEnvironment::of(Some("dev")), BaseEnvironment::Stage);
        assert_eq!(BaseEnvironment::of(None), BaseEnvironment::Stage);
    }

    #[test]
    fn test_resolve_environment_precedence() {
        assert_eq!(resolve_environment(Some("prodv1"), Some("stage")), "prodv1");
        assert_eq!(resolve_environment(Some(""), Some("prod")), "prod");
        assert_eq!(resolve_environment(None, None), "stage");
        assert_eq!(resolve_environment(None, Some("")), "stage");
    }
}
