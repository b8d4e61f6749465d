//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Read environment variables as PREFIX_NAME instead of NAME
    #[arg(long, value_name = "PREFIX", global = true)]
    pub env_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which auth contract an environment name selects
    AuthVersion {
        /// Environment name (defaults to the configured ENVIRONMENT)
        environment: Option<String>,
    },

    /// Run the OTP login handshake once and report the result
    Login {
        /// Environment name, overriding ENVIRONMENT
        #[arg(long, short, value_name = "NAME")]
        environment: Option<String>,

        /// Print the full access token instead of a preview
        #[arg(long)]
        show_token: bool,
    },

    /// Log each virtual user in once and run smoke iterations
    Smoke {
        /// Environment name, overriding ENVIRONMENT
        #[arg(long, short, value_name = "NAME")]
        environment: Option<String>,

        /// Preset load shape: smoke, quick
        #[arg(long, value_name = "PROFILE", default_value = "smoke")]
        profile: String,

        /// Number of virtual users (overrides the profile)
        #[arg(long, value_name = "N")]
        vus: Option<u32>,

        /// Iterations per virtual user (overrides the profile)
        #[arg(long, value_name = "N")]
        iterations: Option<u32>,

        /// Flip is_read on the first notification each iteration
        #[arg(long)]
        toggle_read: bool,

        /// Also look up the first bike each iteration
        #[arg(long)]
        bikes: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration, including the settings login needs
    Validate,

    /// Show the effective configuration (OTP code masked)
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },

    /// Print a sample configuration file
    Sample,
}
