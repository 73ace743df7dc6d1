//! Adapter for AliCloud CloudMonitor alarm callbacks.
//!
//! CloudMonitor posts one alarm per request as a flat JSON object, so there
//! is no label normalization or projection profile involved.

use super::{
    payload::scalar_to_string, AdapterOutput, WebhookAdapter, WebhookError, WebhookRequest,
};
use crate::{
    alert::AlertRecord,
    config::{IntakeConfig, TriggerLevelMapping},
};
use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

const VENDOR: &str = "CloudMonitor";
const ENVIRONMENT: &str = "HSC";
const EVENT_TYPE: &str = "hscAlert";

#[derive(Debug, Clone)]
pub struct CloudMonitorAdapter {
    severities: TriggerLevelMapping,
    normal_severity: String,
}

impl CloudMonitorAdapter {
    pub fn new(config: &IntakeConfig) -> Self {
        Self {
            severities: config.cloudmonitor.clone(),
            normal_severity: config.normal_severity.clone(),
        }
    }

    fn project(&self, payload: &Map<String, Value>, raw: &Value) -> AlertRecord {
        let text_field = |key: &str| {
            payload
                .get(key)
                .and_then(scalar_to_string)
                .unwrap_or_default()
        };

        let trigger_level = text_field("triggerLevel");
        let severity = self
            .severities
            .severity_for(&trigger_level, &self.normal_severity);

        let service = payload
            .get("userId")
            .and_then(scalar_to_string)
            .filter(|id| !id.is_empty())
            .into_iter()
            .collect();

        let group = Some(text_field("namespace"))
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| VENDOR.to_string());

        let mut attributes = IndexMap::new();
        for key in ["dimensions", "ruleId", "signature"] {
            if let Some(value) = payload.get(key) {
                attributes.insert(key.to_string(), value.clone());
            }
        }

        AlertRecord {
            environment: ENVIRONMENT.to_string(),
            severity,
            service,
            group,
            value: payload.get("curValue").and_then(scalar_to_string),
            text: format!(
                "Alert created when {} {}",
                text_field("metricName"),
                text_field("expression")
            ),
            attributes,
            origin: VENDOR.to_string(),
            event_type: EVENT_TYPE.to_string(),
            create_time: payload.get("timestamp").and_then(parse_millis),
            raw_data: raw.clone(),
            ..AlertRecord::new(text_field("instanceName"), text_field("alertName"))
        }
    }
}

impl WebhookAdapter for CloudMonitorAdapter {
    fn provider_id(&self) -> &'static str {
        "cloudmonitor"
    }

    #[instrument(skip(self, request), fields(provider = "cloudmonitor"))]
    fn incoming(&self, request: &WebhookRequest) -> Result<AdapterOutput, WebhookError> {
        let payload = request
            .payload
            .as_object()
            .filter(|payload| payload.contains_key("alertName"))
            .ok_or(WebhookError::NoAlerts { vendor: VENDOR })?;

        let alert = self.project(payload, &request.payload);
        info!(
            resource = %alert.resource,
            event = %alert.event,
            severity = %alert.severity,
            "Normalized CloudMonitor alarm"
        );

        Ok(AdapterOutput::Single(alert))
    }
}

/// Parse a millisecond epoch given as a number or numeric string.
fn parse_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let parsed = millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single());
    if parsed.is_none() {
        debug!(timestamp = %value, "Ignoring unparsable CloudMonitor timestamp");
    }
    parsed
}

#[cfg(test)]
#[path = "cloudmonitor_tests.rs"]
mod tests;
