use super::*;
use serde_json::json;

fn sample_payload() -> Value {
    json!({
        "alertName": "cpu_total",
        "alertState": "ALERT",
        "curValue": 97.5,
        "dimensions": "{userId=1234, instanceId=i-abc}",
        "expression": "$Average>=90",
        "instanceName": "web-frontend-01",
        "metricName": "CPUUtilization",
        "metricProject": "acs_ecs_dashboard",
        "namespace": "acs_ecs_dashboard",
        "ruleId": "rule-42",
        "signature": "eEq1zHuCUp0XSmLD8p8VtTKF8HQ=",
        "timestamp": "1508136760000",
        "triggerLevel": "WARN",
        "userId": "1234"
    })
}

fn incoming(payload: Value) -> Result<AlertRecord, WebhookError> {
    let adapter = CloudMonitorAdapter::new(&IntakeConfig::default());
    match adapter.incoming(&WebhookRequest::new("", "", payload))? {
        AdapterOutput::Single(alert) => Ok(alert),
        other => panic!("expected a single alert, got {other:?}"),
    }
}

#[test]
fn test_full_payload() {
    let payload = sample_payload();

    let alert = incoming(payload.clone()).unwrap();

    assert_eq!(alert.resource, "web-frontend-01");
    assert_eq!(alert.event, "cpu_total");
    assert_eq!(alert.environment, "HSC");
    assert_eq!(alert.severity, "warning");
    assert_eq!(alert.service, vec!["1234".to_string()]);
    assert_eq!(alert.group, "acs_ecs_dashboard");
    assert_eq!(alert.value.as_deref(), Some("97.5"));
    assert_eq!(alert.text, "Alert created when CPUUtilization $Average>=90");
    assert_eq!(alert.origin, "CloudMonitor");
    assert_eq!(alert.event_type, "hscAlert");
    assert_eq!(
        alert.create_time.map(|t| t.timestamp_millis()),
        Some(1_508_136_760_000)
    );
    let keys: Vec<_> = alert.attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["dimensions", "ruleId", "signature"]);
    assert_eq!(alert.raw_data, payload);
    assert!(alert.tags.is_empty());
}

#[test]
fn test_missing_alert_name_is_client_error() {
    let mut payload = sample_payload();
    payload.as_object_mut().unwrap().remove("alertName");

    let err = incoming(payload).unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "no alerts in CloudMonitor notification payload");
}

#[test]
fn test_non_object_payload_is_client_error() {
    assert!(matches!(
        incoming(json!(null)),
        Err(WebhookError::NoAlerts { vendor: "CloudMonitor" })
    ));
}

#[test]
fn test_minimal_payload_uses_fallbacks() {
    let alert = incoming(json!({"alertName": ""})).unwrap();

    assert_eq!(alert.resource, "Unknown");
    assert_eq!(alert.event, "Unknown");
    assert_eq!(alert.severity, "unknown");
    assert!(alert.service.is_empty());
    assert_eq!(alert.group, "CloudMonitor");
    assert_eq!(alert.value, None);
    assert_eq!(alert.create_time, None);
    assert_eq!(alert.text, "Alert created when  ");
    assert!(alert.attributes.is_empty());
}

#[test]
fn test_trigger_levels() {
    for (level, expected) in [
        ("CRITICAL", "major"),
        ("WARN", "warning"),
        ("INFO", "normal"),
        ("OK", "normal"),
        ("FATAL", "unknown"),
    ] {
        let alert = incoming(json!({"alertName": "a", "triggerLevel": level})).unwrap();
        assert_eq!(alert.severity, expected, "trigger level {level}");
    }
}

#[test]
fn test_configured_trigger_levels() {
    let config = IntakeConfig {
        normal_severity: "ok".to_string(),
        cloudmonitor: TriggerLevelMapping {
            critical: "critical".to_string(),
            ..TriggerLevelMapping::default()
        },
        ..IntakeConfig::default()
    };
    let adapter = CloudMonitorAdapter::new(&config);

    let severity = |level: &str| {
        adapter
            .incoming(&WebhookRequest::new(
                "",
                "",
                json!({"alertName": "a", "triggerLevel": level}),
            ))
            .unwrap()
            .into_alerts()
            .remove(0)
            .severity
    };

    assert_eq!(severity("CRITICAL"), "critical");
    assert_eq!(severity("OK"), "ok");
}

#[test]
fn test_numeric_timestamp_and_string_value() {
    let alert = incoming(json!({
        "alertName": "a",
        "timestamp": 1_700_000_000_123_i64,
        "curValue": "12"
    }))
    .unwrap();

    assert_eq!(
        alert.create_time.map(|t| t.timestamp_millis()),
        Some(1_700_000_000_123)
    );
    assert_eq!(alert.value.as_deref(), Some("12"));
}

#[test]
fn test_unparsable_timestamp_is_absent() {
    let alert = incoming(json!({"alertName": "a", "timestamp": "yesterday"})).unwrap();
    assert_eq!(alert.create_time, None);
}
