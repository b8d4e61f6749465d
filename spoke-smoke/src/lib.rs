//! Smoke checks for the services behind the users-service login
//!
//! Every call here needs a bearer token from [`spoke_auth::Authenticator`];
//! when a virtual user has none, its iteration is skipped rather than failed.

pub mod bikes;
pub mod checks;
pub mod error;
pub mod notifications;
pub mod profile;
pub mod runner;

pub use bikes::BikesApi;
pub use checks::{CheckSummary, CheckTally, Checks};
pub use error::{SmokeError, SmokeResult};
pub use notifications::{Notification, NotificationFilters, NotificationPage, NotificationsApi};
pub use profile::LoadProfile;
pub use runner::{SmokeReport, SmokeRunner};
