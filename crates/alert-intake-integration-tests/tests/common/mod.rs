//! Common test utilities for alert-intake-api integration tests
//!
//! This module provides:
//! - A recording [`AlertSink`] for asserting what reached the pipeline
//! - Router and request builders
//! - Vendor payload fixtures

use alert_intake_api::{
    create_router, AlertSink, AppState, ProviderRegistry, ServiceConfig, ServiceMetrics,
    SinkError,
};
use alert_intake_core::{AlertRecord, IntakeConfig};
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// ============================================================================
// Recording sink
// ============================================================================

/// Sink that keeps every submitted batch in memory.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<AlertRecord>>>,
    fail: bool,
}

impl RecordingSink {
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    #[allow(dead_code)]
    pub fn alerts(&self) -> Vec<AlertRecord> {
        self.batches.lock().unwrap().concat()
    }

    #[allow(dead_code)]
    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AlertSink for RecordingSink {
    async fn submit(&self, alerts: &[AlertRecord]) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Unavailable {
                message: "pipeline offline".to_string(),
            });
        }
        self.batches.lock().unwrap().push(alerts.to_vec());
        Ok(())
    }
}

// ============================================================================
// Router builders
// ============================================================================

/// Build a router over the built-in adapters using `intake` configuration.
pub fn create_test_app(intake: IntakeConfig, sink: Arc<RecordingSink>) -> Router {
    let config = ServiceConfig {
        intake,
        ..ServiceConfig::default()
    };
    let providers = ProviderRegistry::with_default_adapters(&config.intake);
    let metrics = ServiceMetrics::new().unwrap();
    create_router(AppState::new(config, Arc::new(providers), sink, metrics))
}

/// Intake configuration resembling a production deployment.
#[allow(dead_code)]
pub fn production_intake_config() -> IntakeConfig {
    IntakeConfig::default()
        .with_field_mapping("prometheus", ["exported_instance", "instance"])
        .with_field_mapping("hsdp", ["application"])
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Payload fixtures
// ============================================================================

/// Alertmanager notification with two alerts for the same group.
#[allow(dead_code)]
pub fn alertmanager_payload() -> Value {
    json!({
        "receiver": "alert-intake",
        "status": "firing",
        "externalURL": "http://alertmanager.example.net:9093",
        "groupLabels": {"alertname": "InstanceDown", "cluster": "eu-west"},
        "commonLabels": {"alertname": "InstanceDown"},
        "alerts": [
            {
                "status": "firing",
                "labels": {
                    "alertname": "InstanceDown",
                    "instance": "web01:9100",
                    "job": "node",
                    "severity": "critical",
                    "environment": "production",
                    "team": "infra",
                    "runbook": "https://wiki.example.net/{alertname}"
                },
                "annotations": {
                    "summary": "{instance} down",
                    "description": "Instance {instance} of job {job} is down",
                    "dashboard": "https://grafana.example.net/d/{job}"
                },
                "startsAt": "2024-03-01T10:00:00Z",
                "endsAt": "0001-01-01T00:00:00Z",
                "generatorURL": "http://prometheus.example.net/graph?g0.expr=up"
            },
            {
                "status": "resolved",
                "labels": {
                    "alertname": "InstanceDown",
                    "exported_instance": "db01",
                    "instance": "pushgateway:9091",
                    "severity": "critical"
                },
                "annotations": {"summary": "db01 down"},
                "startsAt": "2024-03-01T09:00:00Z",
                "endsAt": "2024-03-01T09:30:00Z"
            }
        ]
    })
}

/// HSDP log-management notification.
#[allow(dead_code)]
pub fn hsdp_payload() -> Value {
    json!({
        "alerts": [{
            "status": "firing",
            "labels": {
                "alertname": "ErrorRateHigh",
                "application": "billing-gateway",
                "severity": "error",
                "organization": "finance",
                "monitor": "logs-eu",
                "namespace": "cf-prod",
                "timeout": "7200",
                "correlate": "ErrorRateHigh,ErrorRateNormal"
            },
            "annotations": {"description": "Error rate above threshold"},
            "startsAt": "2024-03-01T10:00:00Z",
            "endsAt": "0001-01-01T00:00:00Z"
        }]
    })
}

/// AliCloud CloudMonitor alarm callback.
#[allow(dead_code)]
pub fn cloudmonitor_payload() -> Value {
    json!({
        "alertName": "Disk usage",
        "alertState": "ALERT",
        "curValue": "91.2",
        "dimensions": "{instanceId=i-bp1, device=/dev/vda1}",
        "expression": "$Maximum>=90",
        "instanceName": "ecs-frontend-1",
        "metricName": "diskusage_utilization",
        "namespace": "acs_ecs_dashboard",
        "timestamp": 1709287200000_i64,
        "triggerLevel": "CRITICAL",
        "userId": "1289"
    })
}
