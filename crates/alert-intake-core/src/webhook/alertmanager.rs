//! Adapter for Alertmanager-format webhooks (Prometheus and HSDP).

use super::{
    payload::{lenient_string_map, RawAlertItem},
    projector::{AlertProjector, ProjectionProfile},
    AdapterOutput, WebhookAdapter, WebhookError, WebhookRequest,
};
use crate::config::IntakeConfig;
use tracing::{info, instrument};

/// Receives batched Alertmanager notifications and projects every item.
#[derive(Debug, Clone)]
pub struct AlertmanagerAdapter {
    projector: AlertProjector,
}

impl AlertmanagerAdapter {
    pub fn new(profile: ProjectionProfile, config: &IntakeConfig) -> Self {
        Self {
            projector: AlertProjector::from_config(profile, config),
        }
    }

    /// Adapter for Prometheus Alertmanager (`/webhooks/prometheus`).
    pub fn prometheus(config: &IntakeConfig) -> Self {
        Self::new(ProjectionProfile::PROMETHEUS, config)
    }

    /// Adapter for HSDP log management alerts (`/webhooks/hsdp`).
    pub fn hsdp(config: &IntakeConfig) -> Self {
        Self::new(ProjectionProfile::HSDP, config)
    }

    pub fn profile(&self) -> &ProjectionProfile {
        self.projector.profile()
    }
}

impl WebhookAdapter for AlertmanagerAdapter {
    fn provider_id(&self) -> &'static str {
        self.profile().provider_id
    }

    #[instrument(skip(self, request), fields(provider = self.profile().provider_id))]
    fn incoming(&self, request: &WebhookRequest) -> Result<AdapterOutput, WebhookError> {
        let vendor = self.profile().vendor;

        let payload = request
            .payload
            .as_object()
            .filter(|payload| !payload.is_empty())
            .ok_or(WebhookError::NoAlerts { vendor })?;

        let alerts = payload
            .get("alerts")
            .ok_or(WebhookError::NoAlerts { vendor })?
            .as_array()
            .ok_or_else(|| WebhookError::MalformedPayload {
                message: "'alerts' must be an array".to_string(),
            })?;

        let items = alerts
            .iter()
            .enumerate()
            .map(|(index, value)| RawAlertItem::from_value(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        let group_labels = lenient_string_map(payload.get("groupLabels"));
        let external_url = payload
            .get("externalURL")
            .and_then(|url| url.as_str())
            .filter(|url| !url.is_empty());

        let records: Vec<_> = items
            .iter()
            .map(|item| self.projector.project(item, &group_labels, external_url))
            .collect();

        info!(count = records.len(), "Normalized {} notification", vendor);

        Ok(AdapterOutput::Batch(records))
    }
}

#[cfg(test)]
#[path = "alertmanager_tests.rs"]
mod tests;
