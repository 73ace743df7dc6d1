//! Projection of normalized labels and annotations onto an [`AlertRecord`].
//!
//! Prometheus and HSDP both speak the Alertmanager webhook format and differ
//! only in a handful of constants, captured in a [`ProjectionProfile`]. A
//! single [`AlertProjector`] handles both.
//!
//! Every label that feeds a record field is *consumed*; whatever is left over
//! becomes the record's tags, in payload order.

use super::{
    labels::{normalize, LabelMap},
    payload::RawAlertItem,
};
use crate::{
    alert::{severity, AlertRecord, UNKNOWN},
    config::{FieldMappingConfig, IntakeConfig},
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Status value for an active alert.
pub const STATUS_FIRING: &str = "firing";

/// Status value for a cleared alert.
pub const STATUS_RESOLVED: &str = "resolved";

// ============================================================================
// ProjectionProfile
// ============================================================================

/// Per-vendor constants for the shared projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionProfile {
    /// Display name used in error messages and the `moreInfo` link.
    pub vendor: &'static str,
    /// Adapter ID, also the key into `field_mappings`.
    pub provider_id: &'static str,
    pub event_type: &'static str,
    pub origin_prefix: &'static str,
    pub default_environment: &'static str,
    pub default_group: &'static str,
    /// Resource used when no candidate label is present.
    pub unknown_resource: &'static str,
    /// Split the resource at the first `-` into `project` and `resource`.
    pub split_resource: bool,
    /// Severity substituted for a firing `severity=error` label.
    pub error_severity_alias: Option<&'static str>,
}

impl ProjectionProfile {
    pub const PROMETHEUS: Self = Self {
        vendor: "Prometheus",
        provider_id: "prometheus",
        event_type: "prometheusAlert",
        origin_prefix: "prometheus/",
        default_environment: "HSC",
        default_group: "Prometheus",
        unknown_resource: UNKNOWN,
        split_resource: false,
        error_severity_alias: None,
    };

    pub const HSDP: Self = Self {
        vendor: "HSDP",
        provider_id: "hsdp",
        event_type: "hsdpAlert",
        origin_prefix: "hsdp/",
        default_environment: "HSDP",
        default_group: "HSDP",
        unknown_resource: "Unknown-Unknown",
        split_resource: true,
        error_severity_alias: Some(severity::WARNING),
    };
}

// ============================================================================
// AlertProjector
// ============================================================================

/// Builds alert records from Alertmanager-style items for one vendor.
#[derive(Debug, Clone)]
pub struct AlertProjector {
    profile: ProjectionProfile,
    field_mapping: FieldMappingConfig,
    normal_severity: String,
}

impl AlertProjector {
    pub fn new(
        profile: ProjectionProfile,
        field_mapping: FieldMappingConfig,
        normal_severity: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            field_mapping,
            normal_severity: normal_severity.into(),
        }
    }

    /// Build a projector using the field mapping registered for the profile's
    /// provider ID.
    pub fn from_config(profile: ProjectionProfile, config: &IntakeConfig) -> Self {
        Self::new(
            profile,
            config.field_mapping(profile.provider_id),
            config.normal_severity.clone(),
        )
    }

    pub fn profile(&self) -> &ProjectionProfile {
        &self.profile
    }

    /// Project a single alert item.
    ///
    /// `group_labels` is the batch-level fallback for the resource and event;
    /// `external_url` is the batch-level `externalURL`, if any.
    pub fn project(
        &self,
        item: &RawAlertItem,
        group_labels: &LabelMap,
        external_url: Option<&str>,
    ) -> AlertRecord {
        let (labels, annotations) = normalize(&item.labels, &item.annotations);
        let mut labels = LabelCursor::new(&labels);
        let mut group = LabelCursor::new(group_labels);

        let severity = self.severity(&item.status, &mut labels);
        let resource = self.resource(&mut labels, &mut group);

        let event = labels
            .take_first(&["event", "alertname"])
            .or_else(|| group.take_first(&["alertname"]))
            .unwrap_or(UNKNOWN)
            .to_string();

        let (project, resource, service) = if self.profile.split_resource {
            let (project, resource) = split_resource(resource);
            let service = vec![resource.clone()];
            (project, resource, service)
        } else {
            let project = labels
                .take_first(&["namespace", "project"])
                .unwrap_or(UNKNOWN)
                .to_string();
            (project, resource.to_string(), vec![resource.to_string()])
        };

        let environment = labels
            .take_first(&["environment"])
            .unwrap_or(self.profile.default_environment)
            .to_string();
        let customer = labels.take_first(&["customer"]).map(str::to_string);
        let correlate = labels
            .take_first(&["correlate"])
            .map(|c| c.split(',').map(str::to_string).collect());
        let group_name = labels
            .take_first(&["group", "organization", "job"])
            .unwrap_or(self.profile.default_group)
            .to_string();
        let origin = format!(
            "{}{}",
            self.profile.origin_prefix,
            labels.take_first(&["monitor"]).unwrap_or("-")
        );
        let timeout = labels.take("timeout").and_then(parse_timeout);

        let tags = labels
            .remaining()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();

        let text = non_empty(annotations.get("description"))
            .or_else(|| non_empty(annotations.get("summary")))
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("{}: {} is {}", severity.to_uppercase(), resource, event)
            });
        let value = annotations.get("value").cloned();
        let attributes = self.attributes(item, &annotations, external_url);

        debug!(
            provider = self.profile.provider_id,
            index = item.index,
            resource = %resource,
            event = %event,
            severity = %severity,
            "Projected alert item"
        );

        AlertRecord {
            environment,
            severity,
            service,
            group: group_name,
            project: Some(project),
            customer,
            correlate,
            value,
            text,
            tags,
            attributes,
            origin,
            event_type: self.profile.event_type.to_string(),
            timeout,
            create_time: None,
            raw_data: item.raw.clone(),
            ..AlertRecord::new(resource, event)
        }
    }

    fn severity(&self, status: &str, labels: &mut LabelCursor<'_>) -> String {
        match status {
            STATUS_FIRING => {
                let label = labels.take_first(&["severity"]).unwrap_or(severity::WARNING);
                match self.profile.error_severity_alias {
                    Some(alias) if label == "error" => alias.to_string(),
                    _ => label.to_string(),
                }
            }
            STATUS_RESOLVED => self.normal_severity.clone(),
            _ => severity::UNKNOWN.to_string(),
        }
    }

    /// Walk the candidate list, checking item labels before group labels.
    fn resource<'a>(
        &self,
        labels: &mut LabelCursor<'a>,
        group: &mut LabelCursor<'a>,
    ) -> &'a str {
        for candidate in &self.field_mapping.candidates {
            if let Some(value) = labels.take_non_empty(candidate) {
                return value;
            }
            if let Some(value) = group.take_non_empty(candidate) {
                return value;
            }
        }
        self.profile.unknown_resource
    }

    fn attributes(
        &self,
        item: &RawAlertItem,
        annotations: &LabelMap,
        external_url: Option<&str>,
    ) -> IndexMap<String, Value> {
        let mut attributes = IndexMap::new();
        attributes.insert("startsAt".to_string(), item.starts_at.clone());
        attributes.insert("endsAt".to_string(), item.ends_at.clone());

        for (key, value) in annotations {
            if !matches!(key.as_str(), "value" | "summary" | "description") {
                attributes.insert(key.clone(), Value::String(value.clone()));
            }
        }

        if let Some(url) = external_url {
            attributes.insert("externalUrl".to_string(), Value::String(url.to_string()));
        }
        if let Some(url) = &item.generator_url {
            attributes.insert(
                "moreInfo".to_string(),
                Value::String(format!(
                    "<a href=\"{url}\" target=\"_blank\">{} Graph</a>",
                    self.profile.vendor
                )),
            );
        }

        attributes
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read-only view over a label map that records which keys were used.
struct LabelCursor<'a> {
    labels: &'a LabelMap,
    consumed: Vec<bool>,
}

impl<'a> LabelCursor<'a> {
    fn new(labels: &'a LabelMap) -> Self {
        Self {
            labels,
            consumed: vec![false; labels.len()],
        }
    }

    /// Consume `key` and return its value, even if empty.
    fn take(&mut self, key: &str) -> Option<&'a str> {
        let (index, _, value) = self.labels.get_full(key)?;
        if std::mem::replace(&mut self.consumed[index], true) {
            return None;
        }
        Some(value.as_str())
    }

    /// Consume keys in order until one yields a non-empty value.
    fn take_first(&mut self, keys: &[&str]) -> Option<&'a str> {
        keys.iter()
            .find_map(|key| self.take(key).filter(|value| !value.is_empty()))
    }

    /// Consume `key` only if it holds a non-empty value.
    fn take_non_empty(&mut self, key: &str) -> Option<&'a str> {
        let (index, _, value) = self.labels.get_full(key)?;
        if self.consumed[index] || value.is_empty() {
            return None;
        }
        self.consumed[index] = true;
        Some(value.as_str())
    }

    /// Labels that were never consumed, in source order.
    fn remaining(&self) -> impl Iterator<Item = (&'a String, &'a String)> + '_ {
        self.labels
            .iter()
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(entry, _)| entry)
    }
}

/// Split `project-resource`, falling back to `Unknown` for empty halves.
fn split_resource(value: &str) -> (String, String) {
    let (project, resource) = value
        .split_once('-')
        .unwrap_or(("", ""));
    (or_unknown(project), or_unknown(resource))
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Parse a timeout label; only positive whole seconds are accepted.
fn parse_timeout(raw: &str) -> Option<u64> {
    match raw.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => u64::try_from(seconds).ok(),
        Ok(seconds) => {
            debug!(timeout = seconds, "Ignoring non-positive timeout");
            None
        }
        Err(e) => {
            debug!(timeout = %raw, error = %e, "Ignoring unparsable timeout");
            None
        }
    }
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
