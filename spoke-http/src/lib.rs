//! HTTP client functionality for spoke
//!
//! Every call the suite makes is a JSON request against one of the services
//! under test. The [`HttpClient`] trait is the seam the auth flow and the
//! smoke calls are written against; [`HttpManager`] is the reqwest-backed
//! implementation.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;
pub mod url;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpRequest, HttpResponse};
pub use url::{append_path_segment, join_url, with_query};
