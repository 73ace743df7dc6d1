//! Hand-off point between the HTTP layer and the alerting platform.
//!
//! Storage, de-duplication and correlation live in the host pipeline. The
//! HTTP layer only needs something that accepts a batch of normalized alerts.

use alert_intake_core::{AlertRecord, ErrorCategory};
use async_trait::async_trait;
use tracing::info;

/// Downstream consumer of normalized alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Accept a batch of alerts produced from one webhook request.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the batch could not be handed over. The HTTP
    /// layer reports this as `503 Service Unavailable`.
    async fn submit(&self, alerts: &[AlertRecord]) -> Result<(), SinkError>;
}

/// Errors raised by an [`AlertSink`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SinkError {
    #[error("Alert sink unavailable: {message}")]
    Unavailable { message: String },

    #[error("Alert sink rejected alert '{resource}/{event}': {message}")]
    Rejected {
        resource: String,
        event: String,
        message: String,
    },
}

impl SinkError {
    /// Whether resubmitting the same batch later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn error_category(&self) -> ErrorCategory {
        if self.is_transient() {
            ErrorCategory::Transient
        } else {
            ErrorCategory::Permanent
        }
    }
}

/// Sink that writes every alert to the log and accepts the batch.
///
/// Used when no pipeline is wired in, e.g. for local testing of vendor
/// webhook configurations.
#[derive(Debug, Clone, Default)]
pub struct LoggingAlertSink;

#[async_trait]
impl AlertSink for LoggingAlertSink {
    async fn submit(&self, alerts: &[AlertRecord]) -> Result<(), SinkError> {
        for alert in alerts {
            info!(
                resource = %alert.resource,
                event = %alert.event,
                environment = %alert.environment,
                severity = %alert.severity,
                group = %alert.group,
                origin = %alert.origin,
                event_type = %alert.event_type,
                "Received alert"
            );
        }
        Ok(())
    }
}
