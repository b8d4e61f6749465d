use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

mod cli;
use cli::{Cli, Commands, ConfigCommands};

use spoke_auth::{resolve_environment, AuthVersion, Authenticator, BaseEnvironment};
use spoke_config::domains::logging::LogLevel;
use spoke_config::domains::utils::mask_secret;
use spoke_config::{ConfigLoader, SpokeConfig};
use spoke_http::{HttpClient, HttpConfig, HttpManager};
use spoke_logging::{init_logging_from_config, init_simple_tracing};
use spoke_smoke::{BikesApi, LoadProfile, NotificationsApi, SmokeReport, SmokeRunner};

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    File(PathBuf),
    /// A path was given but does not exist, so only the environment was read
    MissingFile(PathBuf),
    Environment,
}

impl ConfigSource {
    /// Logged once the configured subscriber is installed
    fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from: {:?}", path),
            ConfigSource::MissingFile(path) => {
                warn!("Configuration file not found: {:?}. Using environment.", path)
            }
            ConfigSource::Environment => {
                debug!("No configuration file specified. Loaded from environment.")
            }
        }
    }
}

/// Load configuration from file or environment
fn load_config(
    config_path: Option<&PathBuf>,
    env_prefix: Option<&str>,
) -> Result<(SpokeConfig, ConfigSource)> {
    let loader = match env_prefix {
        Some(prefix) => ConfigLoader::with_prefix(prefix),
        None => ConfigLoader::new(),
    };

    match config_path {
        Some(path) if path.exists() => {
            let config = loader
                .from_file(path)
                .context(format!("Failed to load configuration from {:?}", path))?;
            Ok((config, ConfigSource::File(path.clone())))
        }
        Some(path) => {
            // Logging is not set up yet; make sure this reaches the terminal
            eprintln!(
                "{} Configuration file not found: {:?}. Using environment.",
                "warning:".yellow().bold(),
                path
            );
            let config = loader
                .from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, ConfigSource::MissingFile(path.clone())))
        }
        None => {
            let config = loader
                .from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, ConfigSource::Environment))
        }
    }
}

fn build_client(config: &SpokeConfig) -> Result<Arc<dyn HttpClient>> {
    let manager = HttpManager::with_config(HttpConfig::from(&config.http))
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(manager))
}

/// Print which contract an environment name selects
fn handle_auth_version(config: &SpokeConfig, environment: Option<&str>) {
    let environment = resolve_environment(environment, config.environment.name());
    let version = AuthVersion::resolve(Some(&environment));
    let base = BaseEnvironment::of(Some(&environment));

    println!("{} {}", "Environment:".bold(), environment);
    println!("{} {}", "Base environment:".bold(), base);
    println!("{} {}", "Auth version:".bold(), version.to_string().cyan());
}

/// Run the login handshake once, bypassing the token cache
async fn handle_login(
    config: &SpokeConfig,
    environment: Option<&str>,
    show_token: bool,
) -> Result<()> {
    let client = build_client(config)?;
    let authenticator = Authenticator::from_config(client, config, environment)
        .context("Configuration is incomplete for login")?;

    println!(
        "{} {} ({})",
        "Logging in against".bold(),
        authenticator.environment(),
        authenticator.version()
    );

    match authenticator.login().await {
        Ok(tokens) => {
            let shown = if show_token {
                tokens.jwt_token()
            } else {
                tokens.preview()
            };
            println!("{} Login succeeded", "✓".green());
            println!("  Token: {}", shown);
            println!(
                "  Refresh token: {}",
                if tokens.refresh_token.is_some() {
                    "present"
                } else {
                    "absent"
                }
            );
            Ok(())
        }
        Err(e) => {
            match e.step() {
                Some(step) => println!("{} Login failed during {}", "✗".red(), step),
                None => println!("{} Login failed", "✗".red()),
            }
            bail!(e)
        }
    }
}

fn resolve_profile(
    profile: &str,
    vus: Option<u32>,
    iterations: Option<u32>,
) -> Result<LoadProfile> {
    let mut resolved = LoadProfile::from_str(profile).map_err(anyhow::Error::msg)?;
    if let Some(vus) = vus {
        resolved.vus = vus;
    }
    if let Some(iterations) = iterations {
        resolved.iterations = iterations;
    }
    if resolved.vus == 0 || resolved.iterations == 0 {
        bail!("VUs and iterations must both be at least 1");
    }
    Ok(resolved)
}

fn print_report(report: &SmokeReport) {
    println!("{}", "Smoke run".bold());
    println!(
        "  Environment: {} ({})",
        report.environment, report.auth_version
    );
    println!("  Profile: {}", report.profile);
    println!("  Duration: {}ms", report.duration_ms);
    println!(
        "  Iterations: {} run, {} skipped",
        report.iterations_run, report.iterations_skipped
    );
    println!(
        "  Token cache: {} acquired, {} failed, {} hits",
        report.token_cache.acquired, report.token_cache.failed, report.token_cache.hits
    );

    println!("{}", "Checks".bold());
    for (name, tally) in &report.checks.checks {
        let mark = if tally.failed == 0 {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {} ({} passed, {} failed)",
            mark, name, tally.passed, tally.failed
        );
    }
    println!(
        "  {:.1}% of {} checks passed",
        report.checks.pass_rate() * 100.0,
        report.checks.passed + report.checks.failed
    );
}

#[allow(clippy::too_many_arguments)]
async fn handle_smoke(
    config: &SpokeConfig,
    environment: Option<&str>,
    profile: &str,
    vus: Option<u32>,
    iterations: Option<u32>,
    toggle_read: bool,
    bikes: bool,
    json: bool,
) -> Result<()> {
    let profile = resolve_profile(profile, vus, iterations)?;
    let client = build_client(config)?;
    let authenticator = Authenticator::from_config(client.clone(), config, environment)
        .context("Configuration is incomplete for login")?;

    let mut runner = SmokeRunner::new(
        Arc::new(authenticator),
        NotificationsApi::from_config(client.clone(), config),
    )
    .with_toggle_read(toggle_read);
    if bikes {
        runner = runner.with_bikes(BikesApi::from_config(client, config));
    }

    let report = runner.run(profile).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.passed() {
        bail!(
            "Smoke run failed: {} failed check(s), {} skipped iteration(s)",
            report.checks.failed,
            report.iterations_skipped
        );
    }
    println!("{} Smoke run passed", "✓".green());
    Ok(())
}

/// Handle config validate command
fn handle_config_validate(config: &SpokeConfig) -> Result<()> {
    // Loading already ran the per-domain validation
    println!("{} Configuration is valid", "✓".green());

    match config.validate_for_auth() {
        Ok(()) => println!("{} Login settings are complete", "✓".green()),
        Err(e) => {
            println!("{} Login settings are incomplete: {}", "✗".red(), e);
            bail!(e)
        }
    }

    Ok(())
}

/// Handle config show command
fn handle_config_show(config: &SpokeConfig, format: &str) -> Result<()> {
    let mut shown = config.clone();
    shown.credentials.code = shown.credentials.code.as_deref().map(mask_secret);

    match format.to_lowercase().as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&shown)?),
        "yaml" => println!("{}", serde_yaml::to_string(&shown)?),
        other => bail!("Unsupported format '{}'. Use yaml or json.", other),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = match load_config(cli.config.as_ref(), cli.env_prefix.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            // No configured logging yet; report through a plain subscriber
            init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
            error!("{:#}", e);
            return Err(e);
        }
    };

    if let Some(level) = cli.log_level.as_deref() {
        config.logging.level = LogLevel::from_str(level).map_err(anyhow::Error::msg)?;
    }
    init_logging_from_config(&config.logging)?;
    source.log();

    debug!("spoke CLI starting");

    match cli.command {
        Some(Commands::AuthVersion { environment }) => {
            handle_auth_version(&config, environment.as_deref());
            Ok(())
        }
        Some(Commands::Login {
            environment,
            show_token,
        }) => handle_login(&config, environment.as_deref(), show_token).await,
        Some(Commands::Smoke {
            environment,
            profile,
            vus,
            iterations,
            toggle_read,
            bikes,
            json,
        }) => {
            handle_smoke(
                &config,
                environment.as_deref(),
                &profile,
                vus,
                iterations,
                toggle_read,
                bikes,
                json,
            )
            .await
        }
        Some(Commands::Config { config_cmd }) => match config_cmd {
            ConfigCommands::Validate => handle_config_validate(&config),
            ConfigCommands::Show { format } => handle_config_show(&config, &format),
            ConfigCommands::Sample => {
                println!("{}", SpokeConfig::generate_sample());
                Ok(())
            }
        },
        None => {
            println!("No command specified. Use --help to see available commands.");
            Ok(())
        }
    }
}
