//! Static intake configuration consumed by the vendor adapters.
//!
//! The configuration is loaded once at startup (YAML file and environment
//! overrides, see the service binary) and shared read-only by every request.
//! Adapters receive the pieces they need at construction time.
//!
//! # Example
//!
//! ```yaml
//! normal_severity: normal
//! field_mappings:
//!   prometheus: [exported_instance, instance]
//!   hsdp: [application]
//! cloudmonitor:
//!   critical: major
//!   warn: warning
//! ```

use crate::alert::severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// IntakeConfig
// ============================================================================

/// Configuration shared by all webhook adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Severity the platform uses for "resolved" / "OK" alerts.
    pub normal_severity: String,

    /// Ordered resource candidate lists keyed by adapter ID
    /// (`prometheus`, `hsdp`).
    pub field_mappings: HashMap<String, FieldMappingConfig>,

    /// CloudMonitor trigger level to severity mapping.
    pub cloudmonitor: TriggerLevelMapping,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            normal_severity: severity::DEFAULT_NORMAL.to_string(),
            field_mappings: HashMap::new(),
            cloudmonitor: TriggerLevelMapping::default(),
        }
    }
}

impl IntakeConfig {
    /// Resource field mapping for an adapter; empty when none is configured.
    pub fn field_mapping(&self, adapter_id: &str) -> FieldMappingConfig {
        self.field_mappings
            .get(adapter_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Set the field mapping for an adapter. Returns `self` for chaining.
    pub fn with_field_mapping<I, S>(mut self, adapter_id: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_mappings.insert(
            adapter_id.to_string(),
            FieldMappingConfig::new(candidates),
        );
        self
    }

    /// Validate this configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`IntakeConfigError`] encountered:
    /// - `normal_severity` is empty
    /// - a field mapping contains an empty candidate name
    /// - a CloudMonitor severity override is empty
    pub fn validate(&self) -> Result<(), IntakeConfigError> {
        if self.normal_severity.trim().is_empty() {
            return Err(IntakeConfigError::EmptySeverity {
                field: "normal_severity".to_string(),
            });
        }

        for (adapter_id, mapping) in &self.field_mappings {
            mapping.validate(adapter_id)?;
        }

        self.cloudmonitor.validate()
    }
}

// ============================================================================
// FieldMappingConfig
// ============================================================================

/// Ordered list of label names that may supply an alert's resource.
///
/// Serialized as a plain list: `[exported_instance, instance]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMappingConfig {
    pub candidates: Vec<String>,
}

impl FieldMappingConfig {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    fn validate(&self, adapter_id: &str) -> Result<(), IntakeConfigError> {
        if let Some(position) = self.candidates.iter().position(|c| c.trim().is_empty()) {
            return Err(IntakeConfigError::EmptyCandidate {
                adapter_id: adapter_id.to_string(),
                position,
            });
        }
        Ok(())
    }
}

// ============================================================================
// TriggerLevelMapping
// ============================================================================

/// Severity names assigned to CloudMonitor `triggerLevel` values.
///
/// `info` and `ok` default to the platform's normal severity when unset.
/// Levels outside `CRITICAL`, `WARN`, `INFO` and `OK` map to `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerLevelMapping {
    pub critical: String,
    pub warn: String,
    pub info: Option<String>,
    pub ok: Option<String>,
}

impl Default for TriggerLevelMapping {
    fn default() -> Self {
        Self {
            critical: "major".to_string(),
            warn: severity::WARNING.to_string(),
            info: None,
            ok: None,
        }
    }
}

impl TriggerLevelMapping {
    /// Resolve the severity for a CloudMonitor trigger level.
    pub fn severity_for(&self, trigger_level: &str, normal_severity: &str) -> String {
        match trigger_level {
            "CRITICAL" => self.critical.clone(),
            "WARN" => self.warn.clone(),
            "INFO" => self
                .info
                .clone()
                .unwrap_or_else(|| normal_severity.to_string()),
            "OK" => self
                .ok
                .clone()
                .unwrap_or_else(|| normal_severity.to_string()),
            _ => severity::UNKNOWN.to_string(),
        }
    }

    fn validate(&self) -> Result<(), IntakeConfigError> {
        let fields = [
            ("cloudmonitor.critical", Some(&self.critical)),
            ("cloudmonitor.warn", Some(&self.warn)),
            ("cloudmonitor.info", self.info.as_ref()),
            ("cloudmonitor.ok", self.ok.as_ref()),
        ];
        for (field, value) in fields {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(IntakeConfigError::EmptySeverity {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// IntakeConfigError
// ============================================================================

/// Errors raised by [`IntakeConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeConfigError {
    #[error("Severity '{field}' must not be empty")]
    EmptySeverity { field: String },

    #[error("Field mapping for '{adapter_id}' has an empty candidate at position {position}")]
    EmptyCandidate { adapter_id: String, position: usize },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
