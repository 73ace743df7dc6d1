//! # Alert-Intake CLI
//!
//! Command-line interface for Alert-Intake.
//!
//! This module provides CLI commands for:
//! - Normalizing a captured vendor payload offline, exactly as the service
//!   would
//! - Validating and showing the service configuration
//! - Listing the built-in webhook providers

use alert_intake_api::{ConfigError as ServiceConfigError, ProviderRegistry, ServiceConfig};
use alert_intake_core::{AlertRecord, WebhookError, WebhookRequest};
use clap::{Parser, Subcommand};
use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Structure
// ============================================================================

/// Alert-Intake CLI - Normalize monitoring-system webhooks
#[derive(Parser, Debug)]
#[command(name = "alert-intake")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Normalize monitoring-system webhook payloads into alert records")]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short, long, global = true, env = "ALERT_INTAKE_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a payload through a provider's adapter and print the alerts
    Normalize {
        /// Provider ID (prometheus, hsdp, cloudmonitor)
        #[arg(short, long)]
        provider: String,

        /// Payload file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short = 'o', long, default_value = "json")]
        format: OutputFormat,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// List the registered webhook providers
    Providers,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Check a configuration file for errors
    Validate {
        /// Configuration file to validate (defaults to --config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the resolved configuration with defaults filled in
    Show {
        /// Configuration file to show (defaults to --config)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short = 'o', long, default_value = "yaml")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

// ============================================================================
// Error Types
// ============================================================================

/// CLI operation errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Unknown provider '{provider}'; available: {available}")]
    UnknownProvider { provider: String, available: String },

    #[error("Payload rejected: {0}")]
    Rejected(#[from] WebhookError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Output formatting failed: {message}")]
    Output { message: String },

    #[error("Logging initialization failed: {message}")]
    Logging { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 1,
            Self::UnknownProvider { .. } => 2,
            Self::Rejected(_) | Self::InvalidPayload(_) => 3,
            Self::Output { .. } | Self::Logging { .. } => 4,
            Self::Io(_) => 5,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ServiceConfigError),
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse the process arguments and run the selected command against
/// stdin/stdout.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(cli, &mut stdin.lock(), &mut stdout.lock())
}

/// Run a parsed command with explicit input and output streams.
pub fn run(cli: Cli, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Commands::Normalize {
            provider,
            file,
            format,
        } => {
            let config = load_configuration(cli.config.as_deref())?;
            execute_normalize(&config, &provider, file.as_deref(), format, input, output)
        }
        Commands::Config { action } => match action {
            ConfigCommands::Validate { file } => {
                let path = file.or(cli.config);
                execute_config_validate(path.as_deref(), output)
            }
            ConfigCommands::Show { file, format } => {
                let path = file.or(cli.config);
                execute_config_show(path.as_deref(), format, output)
            }
        },
        Commands::Providers => {
            let config = load_configuration(cli.config.as_deref())?;
            let registry = ProviderRegistry::with_default_adapters(&config.intake);
            for id in registry.provider_ids() {
                writeln!(output, "{id}")?;
            }
            Ok(())
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Initialize logging based on CLI arguments
///
/// Logs go to stderr so that command output on stdout stays parseable.
fn initialize_logging(cli: &Cli) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(&cli.log_level).map_err(|e| CliError::Logging {
        message: e.to_string(),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if cli.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

/// Load a service configuration file, or the defaults when no path is given.
pub fn load_configuration(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let Some(path) = path else {
        debug!("No configuration file given; using defaults");
        return Ok(ServiceConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: ServiceConfig = serde_yaml::from_str(&contents)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn execute_normalize(
    config: &ServiceConfig,
    provider: &str,
    file: Option<&Path>,
    format: OutputFormat,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    config.validate().map_err(ConfigError::from)?;

    let registry = ProviderRegistry::with_default_adapters(&config.intake);
    let adapter = registry
        .get(provider)
        .ok_or_else(|| CliError::UnknownProvider {
            provider: provider.to_string(),
            available: registry.provider_ids().join(", "),
        })?;

    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            input.read_to_string(&mut buffer)?;
            buffer
        }
    };
    let payload = serde_json::from_str(&raw)?;

    let alerts = adapter
        .incoming(&WebhookRequest::new("", "", payload))?
        .into_alerts();
    info!(provider = %provider, count = alerts.len(), "Normalized payload");

    write_alerts(&alerts, format, output)
}

fn write_alerts(
    alerts: &[AlertRecord],
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let rendered = render(alerts, format)?;
    writeln!(output, "{}", rendered.trim_end())?;
    Ok(())
}

fn execute_config_validate(path: Option<&Path>, output: &mut dyn Write) -> Result<(), CliError> {
    let config = load_configuration(path)?;
    config.validate().map_err(ConfigError::from)?;

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    writeln!(output, "Configuration is valid ({source})")?;
    Ok(())
}

fn execute_config_show(
    path: Option<&Path>,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let config = load_configuration(path)?;
    let rendered = render(&config, format)?;
    writeln!(output, "{}", rendered.trim_end())?;
    Ok(())
}

fn render<T: serde::Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| CliError::Output {
            message: e.to_string(),
        }),
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| CliError::Output {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
