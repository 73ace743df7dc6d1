//! Prometheus metrics for the webhook endpoints.
//!
//! Metrics are held in a registry owned by [`ServiceMetrics`] rather than the
//! process-global default registry, so several instances (one per test router)
//! can coexist.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::{sync::Arc, time::Duration};

/// Provider label used when the URL names an unregistered provider.
pub const UNKNOWN_PROVIDER_LABEL: &str = "unknown";

/// Service metrics for observability
pub struct ServiceMetrics {
    registry: Registry,

    /// Webhook requests by provider and outcome.
    pub webhook_requests_total: IntCounterVec,

    /// Alert records produced by each adapter.
    pub alerts_normalized_total: IntCounterVec,

    /// Time spent handling a webhook, by provider.
    pub webhook_duration_seconds: HistogramVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let webhook_requests_total = IntCounterVec::new(
            Opts::new(
                "alert_intake_webhook_requests_total",
                "Total webhook requests received",
            ),
            &["provider", "outcome"],
        )?;
        let alerts_normalized_total = IntCounterVec::new(
            Opts::new(
                "alert_intake_alerts_normalized_total",
                "Alert records produced from webhook payloads",
            ),
            &["provider"],
        )?;
        let webhook_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "alert_intake_webhook_duration_seconds",
                "Webhook processing time distribution",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["provider"],
        )?;

        registry.register(Box::new(webhook_requests_total.clone()))?;
        registry.register(Box::new(alerts_normalized_total.clone()))?;
        registry.register(Box::new(webhook_duration_seconds.clone()))?;

        Ok(Arc::new(Self {
            registry,
            webhook_requests_total,
            alerts_normalized_total,
            webhook_duration_seconds,
        }))
    }

    /// Record one handled webhook request.
    pub fn record_webhook_request(&self, provider: &str, outcome: &str, duration: Duration) {
        self.webhook_requests_total
            .with_label_values(&[provider, outcome])
            .inc();
        self.webhook_duration_seconds
            .with_label_values(&[provider])
            .observe(duration.as_secs_f64());
    }

    /// Record alert records produced by an adapter.
    pub fn record_alerts_normalized(&self, provider: &str, count: usize) {
        self.alerts_normalized_total
            .with_label_values(&[provider])
            .inc_by(count as u64);
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
