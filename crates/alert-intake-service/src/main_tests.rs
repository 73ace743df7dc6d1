//! Tests for configuration loading in the service binary.

use super::*;
use std::io::Write;

fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_explicit_file_overrides_defaults() {
    let file = yaml_file(
        r#"
server:
  port: 9191
logging:
  json_format: true
intake:
  field_mappings:
    hsdp: [application]
  cloudmonitor:
    critical: critical
"#,
    );

    let config = load_configuration(file.path().to_str()).unwrap();

    assert_eq!(config.server.port, 9191);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(config.logging.json_format);
    assert_eq!(
        config.intake.field_mapping("hsdp").candidates,
        vec!["application".to_string()]
    );
    assert_eq!(config.intake.cloudmonitor.critical, "critical");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = load_configuration(Some("/nonexistent/alert-intake/service.yaml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_value_is_error() {
    let file = yaml_file("server:\n  port: not-a-number\n");
    assert!(load_configuration(file.path().to_str()).is_err());
}

#[test]
fn test_log_filter_accepts_configured_level() {
    let logging = LoggingConfig {
        level: "debug".to_string(),
        json_format: false,
    };
    // Only checks that a filter is produced for both branches.
    let _ = log_filter(&logging);
    let _ = log_filter(&LoggingConfig::default());
}
