//! Sequential per-VU smoke iterations

use crate::bikes::BikesApi;
use crate::checks::{CheckSummary, Checks};
use crate::notifications::{NotificationFilters, NotificationsApi};
use crate::profile::LoadProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spoke_auth::{AuthVersion, Authenticator, TokenCacheStats, VuId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Latency budget for a single request
const MAX_RESPONSE_MS: u128 = 500;

/// Outcome of a smoke run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeReport {
    pub environment: String,
    pub auth_version: AuthVersion,
    pub profile: LoadProfile,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub iterations_run: u64,
    /// Iterations dropped because the VU had no token
    pub iterations_skipped: u64,
    pub checks: CheckSummary,
    pub token_cache: TokenCacheStats,
}

impl SmokeReport {
    pub fn passed(&self) -> bool {
        self.iterations_skipped == 0 && self.checks.all_passed()
    }
}

pub struct SmokeRunner {
    authenticator: Arc<Authenticator>,
    notifications: NotificationsApi,
    bikes: Option<BikesApi>,
    toggle_read: bool,
}

impl SmokeRunner {
    pub fn new(authenticator: Arc<Authenticator>, notifications: NotificationsApi) -> Self {
        Self {
            authenticator,
            notifications,
            bikes: None,
            toggle_read: false,
        }
    }

    /// Also look up the account's first bike each iteration
    pub fn with_bikes(mut self, bikes: BikesApi) -> Self {
        self.bikes = Some(bikes);
        self
    }

    /// Flip `is_read` on the first listed notification each iteration
    pub fn with_toggle_read(mut self, toggle_read: bool) -> Self {
        self.toggle_read = toggle_read;
        self
    }

    pub async fn run(&self, profile: LoadProfile) -> SmokeReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut checks = Checks::new();
        let mut iterations_run = 0;
        let mut iterations_skipped = 0;

        info!(
            "Starting smoke run against {} ({}): {}",
            self.authenticator.environment(),
            self.authenticator.version(),
            profile
        );

        for iteration in 0..profile.iterations {
            for vu in 1..=profile.vus {
                if self.run_iteration(vu, iteration, &mut checks).await {
                    iterations_run += 1;
                } else {
                    iterations_skipped += 1;
                }
            }
        }

        let report = SmokeReport {
            environment: self.authenticator.environment().to_string(),
            auth_version: self.authenticator.version(),
            profile,
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            iterations_run,
            iterations_skipped,
            checks: checks.summary(),
            token_cache: self.authenticator.cache().stats(),
        };

        info!(
            "Smoke run finished: {} run, {} skipped, {}/{} checks passed",
            report.iterations_run,
            report.iterations_skipped,
            report.checks.passed,
            report.checks.passed + report.checks.failed
        );
        report
    }

    /// Returns false when the iteration was skipped for lack of a token
    async fn run_iteration(&self, vu: VuId, iteration: u32, checks: &mut Checks) -> bool {
        let tokens = match self.authenticator.token_for(vu).await {
            Some(tokens) => tokens,
            None => {
                warn!(vu, iteration, "Skipping iteration: no valid token available");
                return false;
            }
        };
        let token = tokens.access_token.as_str();

        let filters = NotificationFilters::default();
        match self.notifications.list_response(token, &filters).await {
            Ok(response) => {
                checks.check_status(&response, 200);
                checks.check_array_field(&response, "data");
                checks.check_response_time(&response, MAX_RESPONSE_MS);

                if self.toggle_read {
                    self.toggle_first(token, &response, checks).await;
                }
            }
            Err(e) => {
                error!(vu, iteration, "Notifications request failed: {}", e);
                checks.check("Notifications request completed", false);
            }
        }

        if let Some(ref bikes) = self.bikes {
            let found = match bikes.first_bike_id(token).await {
                Ok(id) => id.is_some(),
                Err(e) => {
                    error!(vu, iteration, "Bikes request failed: {}", e);
                    false
                }
            };
            checks.check("Bike ID retrieved", found);
        }

        true
    }

    async fn toggle_first(
        &self,
        token: &str,
        listing: &spoke_http::HttpResponse,
        checks: &mut Checks,
    ) {
        let first = match NotificationsApi::parse_page(listing) {
            Ok(page) => page.notifications.into_iter().next(),
            Err(e) => {
                debug!("Not toggling is_read, listing is unusable: {}", e);
                return;
            }
        };
        let Some(notification) = first else {
            info!("No notifications to update");
            return;
        };

        match self
            .notifications
            .update_response(token, &notification.id, !notification.is_read)
            .await
        {
            Ok(response) => {
                checks.check("Update notification status is 200", response.status == 200);
            }
            Err(e) => {
                error!("Update notification {} failed: {}", notification.id, e);
                checks.check("Update notification status is 200", false);
            }
        }
    }
}
