//! Response types for the API.

use alert_intake_core::AlertRecord;
use serde::Serialize;

/// Body of a successful webhook request (`201 Created`).
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: String,
    pub count: usize,
    pub alerts: Vec<AlertRecord>,
}

impl WebhookResponse {
    pub fn ok(alerts: Vec<AlertRecord>) -> Self {
        Self {
            status: "ok".to_string(),
            count: alerts.len(),
            alerts,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub providers: Vec<String>,
}
