//! Preset load shapes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many virtual users run, and how many iterations each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub vus: u32,
    pub iterations: u32,
}

impl LoadProfile {
    pub const fn new(vus: u32, iterations: u32) -> Self {
        Self { vus, iterations }
    }

    /// One VU, one pass: "is it up and can we log in"
    pub const fn smoke() -> Self {
        Self::new(1, 1)
    }

    /// A handful of VUs reusing their cached tokens
    pub const fn quick() -> Self {
        Self::new(5, 3)
    }

    pub fn total_iterations(&self) -> u64 {
        u64::from(self.vus) * u64::from(self.iterations)
    }
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self::smoke()
    }
}

impl fmt::Display for LoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VU(s) x {} iteration(s)", self.vus, self.iterations)
    }
}

impl FromStr for LoadProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smoke" => Ok(Self::smoke()),
            "quick" => Ok(Self::quick()),
            _ => Err(format!("Unknown load profile: {} (expected smoke or quick)", s)),
        }
    }
}
