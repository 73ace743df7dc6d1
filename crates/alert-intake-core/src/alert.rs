//! # Alert Record
//!
//! The canonical alert entity handed to the alerting platform's ingestion
//! pipeline. Records are built fresh for every webhook request and never
//! mutated after an adapter returns them.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fallback used when a payload cannot supply a resource or event name.
pub const UNKNOWN: &str = "Unknown";

/// Well-known severity names used by the adapters.
pub mod severity {
    /// Severity for firing alerts without a `severity` label.
    pub const WARNING: &str = "warning";

    /// Severity for alerts whose status is neither firing nor resolved.
    pub const UNKNOWN: &str = "unknown";

    /// Default "normal/OK" sentinel when the platform does not configure one.
    pub const DEFAULT_NORMAL: &str = "normal";
}

/// Normalized alert produced by a [`WebhookAdapter`](crate::WebhookAdapter).
///
/// `resource` and `event` are never empty: adapters substitute a sentinel
/// such as [`UNKNOWN`] when the vendor payload does not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub resource: String,
    pub event: String,
    pub environment: String,
    pub severity: String,
    pub service: Vec<String>,
    pub group: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Related event names; absent (not empty) when the vendor sent none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlate: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    pub text: String,

    /// Leftover labels rendered as `key=value`.
    pub tags: Vec<String>,

    pub attributes: IndexMap<String, serde_json::Value>,
    pub origin: String,
    pub event_type: String,

    /// Seconds until the platform expires the alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    pub raw_data: serde_json::Value,
}

impl AlertRecord {
    /// Create a record with the mandatory identity fields and empty extras.
    ///
    /// Empty `resource` or `event` values are replaced with [`UNKNOWN`].
    pub fn new(resource: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            resource: non_empty_or_unknown(resource.into()),
            event: non_empty_or_unknown(event.into()),
            environment: String::new(),
            severity: severity::UNKNOWN.to_string(),
            service: Vec::new(),
            group: String::new(),
            project: None,
            customer: None,
            correlate: None,
            value: None,
            text: String::new(),
            tags: Vec::new(),
            attributes: IndexMap::new(),
            origin: String::new(),
            event_type: String::new(),
            timeout: None,
            create_time: None,
            raw_data: serde_json::Value::Null,
        }
    }

    /// Look up a tag value by key (tags are stored as `key=value`).
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.iter().find_map(|tag| {
            tag.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }
}

fn non_empty_or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
