//! Named pass/fail assertions over responses
//!
//! A failed check is recorded, never raised: the run goes on and the
//! tallies end up in the report.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use spoke_http::HttpResponse;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTally {
    pub passed: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
pub struct Checks {
    tallies: BTreeMap<String, CheckTally>,
}

/// Totals plus the per-check breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub passed: u64,
    pub failed: u64,
    pub checks: BTreeMap<String, CheckTally>,
}

impl CheckSummary {
    pub fn pass_rate(&self) -> f64 {
        let total = self.passed + self.failed;
        if total == 0 {
            return 1.0;
        }
        self.passed as f64 / total as f64
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arbitrary condition under `name`
    pub fn check(&mut self, name: impl Into<String>, ok: bool) -> bool {
        let name = name.into();
        if !ok {
            warn!(check = %name, "Check failed");
        }
        let tally = self.tallies.entry(name).or_default();
        if ok {
            tally.passed += 1;
        } else {
            tally.failed += 1;
        }
        ok
    }

    pub fn check_status(&mut self, response: &HttpResponse, expected: u16) -> bool {
        self.check(
            format!("Status is {}", expected),
            response.status == expected,
        )
    }

    pub fn check_response_time(&mut self, response: &HttpResponse, max_ms: u128) -> bool {
        self.check(
            format!("Response time < {}ms", max_ms),
            response.elapsed.as_millis() < max_ms,
        )
    }

    pub fn check_field_exists(&mut self, response: &HttpResponse, field: &str) -> bool {
        self.check(
            format!("Field \"{}\" exists in response", field),
            response.field(field).is_some(),
        )
    }

    pub fn check_array_field(&mut self, response: &HttpResponse, field: &str) -> bool {
        self.check(
            format!("Field \"{}\" is an array", field),
            response.field(field).is_some_and(JsonValue::is_array),
        )
    }

    pub fn summary(&self) -> CheckSummary {
        let (passed, failed) = self
            .tallies
            .values()
            .fold((0, 0), |(p, f), t| (p + t.passed, f + t.failed));
        CheckSummary {
            passed,
            failed,
            checks: self.tallies.clone(),
        }
    }
}
