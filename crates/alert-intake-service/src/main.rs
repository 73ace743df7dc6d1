//! # Alert-Intake Service
//!
//! Binary entry point for the Alert-Intake HTTP service.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Registers the built-in vendor adapters
//! - Starts the HTTP server from alert-intake-api

use alert_intake_api::{
    start_server, LoggingAlertSink, LoggingConfig, ProviderRegistry, ServiceConfig, ServiceError,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming an operator-supplied configuration file.
const CONFIG_FILE_ENV: &str = "ALERT_INTAKE_CONFIG_FILE";

/// Prefix for configuration overrides, e.g. `ALERT_INTAKE__SERVER__PORT=9090`.
const ENV_PREFIX: &str = "ALERT_INTAKE";

const DEFAULT_LOG_FILTER: &str =
    "alert_intake_service=info,alert_intake_api=info,alert_intake_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let explicit_path = std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|path| !path.is_empty());

    let service_config = match load_configuration(explicit_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!(
                error = %e,
                "Could not load service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    init_logging(&service_config.logging);
    info!("Starting Alert-Intake Service");
    if let Some(path) = &explicit_path {
        info!(path = %path, "Loaded configuration from explicit path");
    }

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    let providers = ProviderRegistry::with_default_adapters(&service_config.intake);
    info!(providers = ?providers.provider_ids(), "Registered webhook adapters");

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        "Starting HTTP server"
    );

    if let Err(e) = start_server(
        service_config,
        Arc::new(providers),
        Arc::new(LoggingAlertSink),
    )
    .await
    {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}

// ============================================================================
// Private helpers
// ============================================================================

/// Build the service configuration from layered sources.
///
/// Sources, later ones overriding earlier ones:
///  1. `/etc/alert-intake/service.yaml`
///  2. `./config/service.yaml`
///  3. `explicit_path` (required when given)
///  4. Environment variables prefixed `ALERT_INTAKE__` with `__` separators
///
/// Every field carries a serde default, so missing files yield the built-in
/// defaults. A malformed file or an override of the wrong type is an error.
fn load_configuration(explicit_path: Option<&str>) -> Result<ServiceConfig, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/alert-intake/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Some(path) = explicit_path {
        builder = builder.add_source(
            config::File::with_name(path)
                .required(true)
                .format(config::FileFormat::Yaml),
        );
    }

    builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
}

/// Build the log filter: `RUST_LOG` wins, then `logging.level` when it is
/// not the default, then the built-in per-crate filter.
fn log_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if logging.level == LoggingConfig::default().level {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        } else {
            EnvFilter::new(&logging.level)
        }
    })
}

fn init_logging(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(log_filter(logging));
    if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
