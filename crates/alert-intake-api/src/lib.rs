//! # Alert-Intake HTTP Service
//!
//! HTTP server that receives monitoring-system webhooks and turns them into
//! normalized alert records.
//!
//! This service provides:
//! - `POST /webhooks/{provider}` (and `/webhooks/{provider}/{*path}`) for
//!   every registered vendor adapter
//! - `GET /health` for liveness checks
//! - `GET /metrics` in the Prometheus text format

pub mod config;
pub mod errors;
pub mod metrics;
pub mod provider_registry;
pub mod responses;
pub mod sink;

pub use config::{LoggingConfig, ServerConfig, ServiceConfig};
pub use errors::{ConfigError, ServiceError, WebhookHandlerError};
pub use metrics::ServiceMetrics;
pub use provider_registry::{ProviderId, ProviderRegistry};
pub use responses::{HealthResponse, WebhookResponse};
pub use sink::{AlertSink, LoggingAlertSink, SinkError};

use alert_intake_core::{CorrelationId, WebhookRequest};
use axum::{
    extract::{DefaultBodyLimit, Path, RawQuery, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, instrument};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<ServiceConfig>,

    /// Vendor adapters keyed by provider ID
    pub providers: Arc<ProviderRegistry>,

    /// Destination for normalized alerts
    pub sink: Arc<dyn AlertSink>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServiceConfig,
        providers: Arc<ProviderRegistry>,
        sink: Arc<dyn AlertSink>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            providers,
            sink,
            metrics,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let webhook_routes = Router::new()
        .route("/webhooks/{provider}", post(handle_webhook))
        .route("/webhooks/{provider}/{*path}", post(handle_webhook_with_path));

    let service_routes = Router::new()
        .route("/health", get(handle_health_check))
        .route("/metrics", get(metrics_endpoint));

    let mut router = Router::new()
        .merge(webhook_routes)
        .merge(service_routes)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_size))
        .layer(TraceLayer::new_for_http());

    if state.config.server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// Start HTTP server
///
/// Binds to `server.host:server.port` and serves until SIGINT or SIGTERM.
pub async fn start_server(
    config: ServiceConfig,
    providers: Arc<ProviderRegistry>,
    sink: Arc<dyn AlertSink>,
) -> Result<(), ServiceError> {
    let metrics = ServiceMetrics::new().map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("Failed to initialize metrics: {}", e),
        })
    })?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, providers, sink, metrics);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: address.clone(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", address);

    let shutdown_signal = async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to install Ctrl+C signal handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM signal handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
        }
    };

    // In-flight requests are allowed to finish; new connections are refused
    // as soon as the signal arrives.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Webhook Handlers
// ============================================================================

/// Handle `POST /webhooks/{provider}`
pub async fn handle_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), WebhookHandlerError> {
    process_webhook(state, provider, String::new(), query, body).await
}

/// Handle `POST /webhooks/{provider}/{*path}`
pub async fn handle_webhook_with_path(
    State(state): State<AppState>,
    Path((provider, path)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), WebhookHandlerError> {
    process_webhook(state, provider, path, query, body).await
}

/// Run the adapter for `provider`, hand the alerts to the sink and record
/// metrics for the outcome.
#[instrument(skip(state, query, body), fields(correlation_id = %CorrelationId::new()))]
async fn process_webhook(
    state: AppState,
    provider: String,
    path: String,
    query: Option<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), WebhookHandlerError> {
    let started = Instant::now();
    info!(body_size = body.len(), "Received webhook request");

    let result = normalize_and_submit(&state, &provider, path, query, &body).await;

    let provider_label = if state.providers.contains(&provider) {
        provider.as_str()
    } else {
        metrics::UNKNOWN_PROVIDER_LABEL
    };
    let outcome = match &result {
        Ok(_) => "accepted",
        Err(e) => e.outcome(),
    };
    state
        .metrics
        .record_webhook_request(provider_label, outcome, started.elapsed());

    let alerts = result?;
    state
        .metrics
        .record_alerts_normalized(provider_label, alerts.len());

    info!(count = alerts.len(), "Accepted webhook alerts");
    Ok((StatusCode::CREATED, Json(WebhookResponse::ok(alerts))))
}

async fn normalize_and_submit(
    state: &AppState,
    provider: &str,
    path: String,
    query: Option<String>,
    body: &Bytes,
) -> Result<Vec<alert_intake_core::AlertRecord>, WebhookHandlerError> {
    let adapter =
        state
            .providers
            .get(provider)
            .ok_or_else(|| WebhookHandlerError::ProviderNotFound {
                provider: provider.to_string(),
            })?;

    // Adapters report their own "no alerts" error for unusable bodies.
    let payload = serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(error = %e, "Request body is not valid JSON; treating it as null");
        serde_json::Value::Null
    });

    let request = WebhookRequest::new(path, query.unwrap_or_default(), payload);
    let alerts = adapter.incoming(&request)?.into_alerts();

    state.sink.submit(&alerts).await?;
    Ok(alerts)
}

// ============================================================================
// Service Handlers
// ============================================================================

/// Basic health check endpoint
#[instrument(skip(state))]
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state
            .providers
            .provider_ids()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.encode_text().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
