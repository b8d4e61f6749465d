//! Logging initialisation for spoke

mod init;

pub use init::{build_filter, init_logging_from_config, init_simple_tracing};
