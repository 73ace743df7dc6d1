//! Provider registry for multi-vendor webhook routing.
//!
//! This module provides [`ProviderRegistry`] for associating provider IDs
//! (e.g. `"prometheus"`, `"cloudmonitor"`) with their [`WebhookAdapter`]
//! implementations. The registry is built once at startup and used read-only
//! during request handling.
//!
//! # URL Structure
//!
//! Each registered provider is reachable at:
//! ```text
//! POST /webhooks/{provider_id}
//! POST /webhooks/{provider_id}/{*path}
//! ```

use alert_intake_core::{webhook::default_adapters, IntakeConfig, WebhookAdapter};
use std::{collections::HashMap, sync::Arc};

// ============================================================================
// ProviderId
// ============================================================================

/// URL-safe identifier for a webhook provider.
///
/// A provider ID must consist entirely of lowercase ASCII letters, digits,
/// hyphens (`-`), or underscores (`_`). It must not be empty.
///
/// Provider IDs appear verbatim as URL path segments:
/// `POST /webhooks/{provider_id}`
///
/// # Examples
///
/// ```rust
/// use alert_intake_api::provider_registry::ProviderId;
///
/// let id = ProviderId::new("cloudmonitor").unwrap();
/// assert_eq!(id.as_str(), "cloudmonitor");
///
/// let id = ProviderId::new("hsdp-eu_1").unwrap();
/// assert_eq!(id.as_str(), "hsdp-eu_1");
///
/// assert!(ProviderId::new("Prometheus").is_err()); // uppercase not allowed
/// assert!(ProviderId::new("").is_err());       // empty not allowed
/// assert!(ProviderId::new("../escape").is_err()); // slashes not allowed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    /// Create a new `ProviderId`, validating it contains only URL-safe characters.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProviderIdError::Empty`] if the value is empty.
    /// Returns [`InvalidProviderIdError::InvalidChars`] if the value contains
    /// characters outside `[a-z0-9\-_]`.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidProviderIdError> {
        let s = value.into();
        if s.is_empty() {
            return Err(InvalidProviderIdError::Empty);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(InvalidProviderIdError::InvalidChars { value: s });
        }
        Ok(Self(s))
    }

    /// Return the provider ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// InvalidProviderIdError
// ============================================================================

/// Error returned when a [`ProviderId`] cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProviderIdError {
    /// Provider ID must not be empty.
    #[error("Provider ID must not be empty")]
    Empty,

    /// Provider ID contains characters outside `[a-z0-9\\-_]`.
    #[error(
        "Provider ID '{value}' contains invalid characters; \
         use lowercase alphanumeric, hyphens, or underscores"
    )]
    InvalidChars { value: String },
}

// ============================================================================
// ProviderRegistry
// ============================================================================

/// Registry mapping provider IDs to their webhook adapters.
///
/// Built once at service startup and used read-only during request handling.
/// Adapters are stored as `Arc<dyn WebhookAdapter>` so they can be shared
/// across tasks without copying their configuration.
///
/// # Examples
///
/// ```rust
/// use alert_intake_api::provider_registry::ProviderRegistry;
/// use alert_intake_core::IntakeConfig;
///
/// let registry = ProviderRegistry::with_default_adapters(&IntakeConfig::default());
/// assert!(registry.contains("prometheus"));
/// assert!(!registry.contains("zabbix"));
/// ```
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<String, Arc<dyn WebhookAdapter>>,
}

impl ProviderRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in adapter, keyed by its own
    /// provider ID.
    pub fn with_default_adapters(config: &IntakeConfig) -> Self {
        let mut registry = Self::new();
        for adapter in default_adapters(config) {
            // Built-in IDs are static lowercase names.
            if let Ok(id) = ProviderId::new(adapter.provider_id()) {
                registry.register(id, adapter);
            }
        }
        registry
    }

    /// Register a provider with its webhook adapter.
    ///
    /// If a provider with the same ID is already registered it is replaced.
    /// Returns `&mut Self` to allow method chaining.
    pub fn register(&mut self, id: ProviderId, adapter: Arc<dyn WebhookAdapter>) -> &mut Self {
        self.adapters.insert(id.0, adapter);
        self
    }

    /// Look up an adapter by provider name.
    ///
    /// Returns `None` if the provider is not registered.
    pub fn get(&self, provider: &str) -> Option<Arc<dyn WebhookAdapter>> {
        self.adapters.get(provider).cloned()
    }

    /// Check whether a provider is registered.
    pub fn contains(&self, provider: &str) -> bool {
        self.adapters.contains_key(provider)
    }

    /// Registered provider IDs in lexical order.
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "provider_registry_tests.rs"]
mod tests;
