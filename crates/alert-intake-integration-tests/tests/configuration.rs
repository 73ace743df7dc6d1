//! Integration tests for configuration-driven adapter behavior.

mod common;

use alert_intake_api::ServiceConfig;
use alert_intake_core::IntakeConfig;
use axum::http::StatusCode;
use common::{
    alertmanager_payload, body_json, cloudmonitor_payload, create_test_app, hsdp_payload,
    post_json, RecordingSink,
};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn test_without_field_mapping_resources_are_unknown() {
    // Arrange
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(IntakeConfig::default(), sink.clone());

    // Act
    let prometheus = app
        .clone()
        .oneshot(post_json(
            "/webhooks/prometheus",
            alertmanager_payload().to_string(),
        ))
        .await
        .unwrap();
    let hsdp = app
        .oneshot(post_json("/webhooks/hsdp", hsdp_payload().to_string()))
        .await
        .unwrap();

    // Assert
    assert_eq!(prometheus.status(), StatusCode::CREATED);
    assert_eq!(hsdp.status(), StatusCode::CREATED);

    let alerts = sink.alerts();
    assert_eq!(alerts[0].resource, "Unknown");
    assert_eq!(alerts[0].tag("instance"), Some("web01:9100"));
    assert_eq!(alerts[2].project.as_deref(), Some("Unknown"));
    assert_eq!(alerts[2].resource, "Unknown");
}

#[tokio::test]
async fn test_group_labels_supply_resource_candidates() {
    // Arrange
    let sink = Arc::new(RecordingSink::default());
    let intake = IntakeConfig::default().with_field_mapping("prometheus", ["cluster"]);
    let app = create_test_app(intake, sink.clone());

    // Act
    let response = app
        .oneshot(post_json(
            "/webhooks/prometheus",
            alertmanager_payload().to_string(),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::CREATED);
    let alerts = sink.alerts();
    assert_eq!(alerts[0].resource, "eu-west");
    // Every item sees the full set of group labels.
    assert_eq!(alerts[1].resource, "eu-west");
}

#[tokio::test]
async fn test_custom_normal_severity_and_trigger_levels() {
    // Arrange
    let sink = Arc::new(RecordingSink::default());
    let config: ServiceConfig = serde_json::from_str(
        r#"{
            "intake": {
                "normal_severity": "ok",
                "cloudmonitor": {"critical": "critical", "warn": "minor"}
            }
        }"#,
    )
    .unwrap();
    config.validate().unwrap();
    let app = create_test_app(config.intake, sink.clone());

    let mut warn_alarm = cloudmonitor_payload();
    warn_alarm["triggerLevel"] = "WARN".into();
    let mut ok_alarm = cloudmonitor_payload();
    ok_alarm["triggerLevel"] = "OK".into();

    // Act
    for payload in [cloudmonitor_payload(), warn_alarm, ok_alarm] {
        let response = app
            .clone()
            .oneshot(post_json("/webhooks/cloudmonitor", payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .oneshot(post_json(
            "/webhooks/prometheus",
            alertmanager_payload().to_string(),
        ))
        .await
        .unwrap();

    // Assert
    let body = body_json(response).await;
    assert_eq!(body["alerts"][1]["severity"], "ok");

    let severities: Vec<_> = sink.alerts().into_iter().map(|a| a.severity).collect();
    assert_eq!(severities[..3], ["critical", "minor", "ok"]);
}
