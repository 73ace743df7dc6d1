//! Lenient access to vendor JSON payloads.
//!
//! Vendors are inconsistent about value types: label values occasionally
//! arrive as numbers or booleans, and optional objects are sometimes `null`.
//! The helpers here coerce those shapes into [`LabelMap`]s and strings so the
//! projector only ever deals with text.

use super::{labels::LabelMap, WebhookError};
use serde_json::{Map, Value};

/// Status assumed when an alert item carries none.
pub const DEFAULT_STATUS: &str = "firing";

/// One element of an Alertmanager-style `alerts` array.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAlertItem {
    /// Position in the `alerts` array, used in error messages.
    pub index: usize,
    pub status: String,
    pub labels: LabelMap,
    pub annotations: LabelMap,
    /// Copied verbatim into the record's attributes.
    pub starts_at: Value,
    pub ends_at: Value,
    pub generator_url: Option<String>,
    /// The item exactly as received.
    pub raw: Value,
}

impl RawAlertItem {
    /// Extract an alert item from the `index`th element of `alerts`.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::MalformedPayload`] if the element, its `labels` or its
    ///   `annotations` are not JSON objects
    /// - [`WebhookError::MissingAttribute`] if `startsAt` or `endsAt` is absent
    pub fn from_value(index: usize, value: &Value) -> Result<Self, WebhookError> {
        let item = value
            .as_object()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: format!("alert {index} is not a JSON object"),
            })?;

        // Only an absent key defaults; `null` becomes an empty status.
        let status = match item.get("status") {
            None => DEFAULT_STATUS.to_string(),
            Some(value) => scalar_to_string(value).unwrap_or_default(),
        };

        let labels = string_map(item.get("labels"), index, "labels")?;
        let annotations = string_map(item.get("annotations"), index, "annotations")?;

        let starts_at = required(item, index, "startsAt")?;
        let ends_at = required(item, index, "endsAt")?;

        let generator_url = item
            .get("generatorURL")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Self {
            index,
            status,
            labels,
            annotations,
            starts_at,
            ends_at,
            generator_url,
            raw: value.clone(),
        })
    }
}

fn required(
    item: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Value, WebhookError> {
    item.get(field)
        .cloned()
        .ok_or(WebhookError::MissingAttribute { index, field })
}

/// Convert an optional JSON object into a [`LabelMap`].
///
/// Absent or `null` objects yield an empty map.
fn string_map(
    value: Option<&Value>,
    index: usize,
    field: &str,
) -> Result<LabelMap, WebhookError> {
    match value {
        None | Some(Value::Null) => Ok(LabelMap::new()),
        Some(Value::Object(map)) => Ok(object_to_labels(map)),
        Some(_) => Err(WebhookError::MalformedPayload {
            message: format!("alert {index} has non-object '{field}'"),
        }),
    }
}

/// Like [`string_map`] but treats any non-object as empty.
///
/// Used for batch-level `groupLabels`, which is a fallback source only.
pub fn lenient_string_map(value: Option<&Value>) -> LabelMap {
    match value {
        Some(Value::Object(map)) => object_to_labels(map),
        _ => LabelMap::new(),
    }
}

fn object_to_labels(map: &Map<String, Value>) -> LabelMap {
    map.iter()
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Render a JSON value as label text.
///
/// Strings are taken as-is, `null` is dropped, everything else becomes its
/// JSON text (`42`, `true`, `[1,2]`).
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
