//! Error types for the HTTP service

use crate::sink::SinkError;
use alert_intake_core::{IntakeConfigError, WebhookError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

/// Seconds a sender should wait before retrying after a sink failure.
const SINK_RETRY_AFTER_SECONDS: u64 = 30;

/// Webhook handler errors with HTTP status code mapping
///
/// - `400 Bad Request`: the payload cannot be interpreted by the adapter
/// - `404 Not Found`: no adapter is registered for the provider segment
/// - `503 Service Unavailable`: the downstream alert sink rejected the batch;
///   the sender should retry
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Webhook provider not found in the registry
    ///
    /// Occurs when the `{provider}` URL segment does not match any entry
    /// in the [`ProviderRegistry`](crate::provider_registry::ProviderRegistry).
    #[error("Webhook provider not found: {provider}")]
    ProviderNotFound { provider: String },

    /// The adapter rejected the payload.
    ///
    /// The adapter's message is returned verbatim so that senders see e.g.
    /// `no alerts in Prometheus notification payload`.
    #[error("{0}")]
    ProcessingFailed(#[from] WebhookError),

    /// The alert sink could not accept the normalized alerts.
    #[error("Alert delivery failed: {0}")]
    DeliveryFailed(#[from] SinkError),
}

impl WebhookHandlerError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ProviderNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ProcessingFailed(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::DeliveryFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Label used for the `outcome` dimension of request metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ProviderNotFound { .. } => "unknown_provider",
            Self::ProcessingFailed(_) => "rejected",
            Self::DeliveryFailed(_) => "delivery_failed",
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, retry_after) = match &self {
            Self::ProviderNotFound { provider } => {
                warn!(provider = %provider, "Webhook provider not found");
                (self.to_string(), None)
            }
            Self::ProcessingFailed(e) => {
                warn!(error = %e, category = ?e.error_category(), "Rejected webhook payload");
                (self.to_string(), None)
            }
            Self::DeliveryFailed(e) => {
                error!(
                    error = %e,
                    category = ?e.error_category(),
                    "Alert sink rejected normalized alerts"
                );
                (self.to_string(), Some(SINK_RETRY_AFTER_SECONDS))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let mut response = (status, Json(body)).into_response();

        if let Some(retry_seconds) = retry_after {
            if let Ok(header_value) = retry_seconds.to_string().parse() {
                response.headers_mut().insert("Retry-After", header_value);
            }
        }

        response
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid intake configuration: {0}")]
    Intake(#[from] IntakeConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
