//! Domain-driven configuration for spoke
//!
//! Configuration is split by functional domain (environment, services,
//! endpoints, credentials, http, logging) and can be loaded from a YAML file,
//! from environment variables, or both, with validation applied last.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    credentials::CredentialsConfig, endpoints::EndpointsConfig, environment::EnvironmentConfig,
    http::HttpConfig, logging::LoggingConfig, services::ServicesConfig, SpokeConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
