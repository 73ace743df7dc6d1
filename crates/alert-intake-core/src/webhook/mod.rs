//! # Webhook Adapter Module
//!
//! Turns vendor webhook payloads into [`AlertRecord`]s.
//!
//! Every vendor is served by a [`WebhookAdapter`]. Adapters are pure
//! functions of the request: they hold only read-only configuration, perform
//! no I/O, and either return alert records or a client-facing
//! [`WebhookError`] carrying an HTTP 400 status.

use crate::{config::IntakeConfig, AlertRecord, ErrorCategory};
use std::sync::Arc;

pub mod alertmanager;
pub mod cloudmonitor;
pub mod labels;
pub mod payload;
pub mod projector;

pub use alertmanager::AlertmanagerAdapter;
pub use cloudmonitor::CloudMonitorAdapter;
pub use labels::{normalize, render_template, LabelMap, TemplateError};
pub use payload::RawAlertItem;
pub use projector::{AlertProjector, ProjectionProfile};

// ============================================================================
// Core Types
// ============================================================================

/// Inbound webhook data handed over by the HTTP layer.
///
/// `path` and `query_string` are passed through for adapters that need them;
/// none of the built-in adapters currently do.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub path: String,
    pub query_string: String,
    pub payload: serde_json::Value,
}

impl WebhookRequest {
    /// Create new webhook request
    pub fn new(
        path: impl Into<String>,
        query_string: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            path: path.into(),
            query_string: query_string.into(),
            payload,
        }
    }
}

/// Result of a successful adapter invocation.
///
/// Single-alert vendors (CloudMonitor) return [`AdapterOutput::Single`];
/// batching vendors return [`AdapterOutput::Batch`], which may be empty.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutput {
    Single(AlertRecord),
    Batch(Vec<AlertRecord>),
}

impl AdapterOutput {
    /// Number of alert records carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(alerts) => alerts.len(),
        }
    }

    /// `true` when a batch carried no alerts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a list of records, preserving order.
    pub fn into_alerts(self) -> Vec<AlertRecord> {
        match self {
            Self::Single(alert) => vec![alert],
            Self::Batch(alerts) => alerts,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Client-facing failure raised while interpreting a webhook payload.
///
/// Every variant is permanent and maps to HTTP 400; template substitution and
/// timeout parsing failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    /// Required top-level structure (`alerts`, `alertName`) is absent.
    #[error("no alerts in {vendor} notification payload")]
    NoAlerts { vendor: &'static str },

    /// An alert item lacks `startsAt` or `endsAt`.
    #[error("alert {index} is missing required attribute '{field}'")]
    MissingAttribute { index: usize, field: &'static str },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },
}

impl WebhookError {
    /// HTTP status code reported to the webhook sender.
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Check if error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        false
    }

    /// Get error category for monitoring
    pub fn error_category(&self) -> ErrorCategory {
        if self.is_transient() {
            ErrorCategory::Transient
        } else {
            ErrorCategory::Permanent
        }
    }
}

// ============================================================================
// Core Operations (Traits)
// ============================================================================

/// Vendor-specific webhook receiver.
pub trait WebhookAdapter: Send + Sync {
    /// URL-safe identifier the adapter is registered under (`/webhooks/{id}`).
    fn provider_id(&self) -> &'static str;

    /// Convert an inbound payload into alert records.
    fn incoming(&self, request: &WebhookRequest) -> Result<AdapterOutput, WebhookError>;
}

/// Build every built-in adapter from the shared configuration.
pub fn default_adapters(config: &IntakeConfig) -> Vec<Arc<dyn WebhookAdapter>> {
    vec![
        Arc::new(AlertmanagerAdapter::prometheus(config)),
        Arc::new(AlertmanagerAdapter::hsdp(config)),
        Arc::new(CloudMonitorAdapter::new(config)),
    ]
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
