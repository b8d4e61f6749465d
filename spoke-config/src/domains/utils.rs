//! Utility functions and helpers for configuration

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serde helper module for Duration serialization as whole seconds
pub mod serde_duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(seconds))
    }
}

/// Default functions for serde
pub fn default_true() -> bool {
    true
}

/// Trim a setting, treating blank strings (and the literal "undefined" that
/// shell wrappers leak) as an unset value.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() || trimmed == "undefined" {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Mask a secret for diagnostics, keeping at most the first two characters
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    if secret.chars().count() <= 2 {
        "*".repeat(secret.chars().count().max(1))
    } else {
        format!("{}{}", visible, "*".repeat(secret.chars().count() - 2))
    }
}
