//! # Alert-Intake Core
//!
//! Core business logic for the Alert-Intake webhook receiver.
//!
//! This crate turns third-party monitoring webhooks (Prometheus Alertmanager,
//! HSDP log management, AliCloud CloudMonitor) into the platform's canonical
//! [`AlertRecord`]. Everything here is synchronous and request-scoped: an
//! adapter receives an already-parsed JSON payload and returns alert records
//! or a client-facing [`WebhookError`].
//!
//! ## Architecture
//!
//! - [`webhook::labels`] resolves `{label}` templates inside label and
//!   annotation values.
//! - [`webhook::projector`] maps normalized labels onto alert fields using a
//!   per-vendor [`ProjectionProfile`].
//! - [`webhook::alertmanager`] and [`webhook::cloudmonitor`] implement the
//!   [`WebhookAdapter`] trait for each vendor.
//! - [`config::IntakeConfig`] carries the static configuration the adapters
//!   are built from; nothing in this crate reads ambient process state.
//!
//! ## Usage
//!
//! ```rust
//! use alert_intake_core::{
//!     config::IntakeConfig,
//!     webhook::{alertmanager::AlertmanagerAdapter, WebhookAdapter, WebhookRequest},
//! };
//! use serde_json::json;
//!
//! let adapter = AlertmanagerAdapter::prometheus(&IntakeConfig::default());
//! let request = WebhookRequest::new(
//!     "",
//!     "",
//!     json!({"alerts": [{
//!         "status": "firing",
//!         "labels": {"alertname": "HighCPU", "job": "svc1"},
//!         "annotations": {"summary": "CPU high"},
//!         "startsAt": "t0",
//!         "endsAt": "t1"
//!     }]}),
//! );
//!
//! let alerts = adapter.incoming(&request).unwrap().into_alerts();
//! assert_eq!(alerts[0].event, "HighCPU");
//! assert_eq!(alerts[0].group, "svc1");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use uuid::Uuid;

// ============================================================================
// Identifier Types
// ============================================================================

/// Identifier for tracing a webhook request across log lines and responses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get string representation
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = s.parse::<Uuid>().map_err(|_| ParseError::InvalidFormat {
            expected: "UUID format".to_string(),
            actual: s.to_string(),
        })?;
        Ok(Self(uuid))
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// High-level error categorization for retry and alerting decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Temporary failures that should be retried
    Transient,
    /// Permanent failures that won't succeed on retry
    Permanent,
}

/// Error type for string parsing failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid format: expected {expected}, got '{actual}'")]
    InvalidFormat { expected: String, actual: String },
}

// ============================================================================
// Module declarations
// ============================================================================

/// Canonical alert record produced by every adapter
pub mod alert;

/// Static intake configuration (field mappings, severity sentinels)
pub mod config;

/// Vendor webhook adapters and the shared normalization pipeline
pub mod webhook;

// Re-export key types for convenience
pub use alert::AlertRecord;
pub use config::{FieldMappingConfig, IntakeConfig, IntakeConfigError, TriggerLevelMapping};
pub use webhook::{
    projector::ProjectionProfile, AdapterOutput, WebhookAdapter, WebhookError, WebhookRequest,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
