//! Tests for [`IntakeConfig`] and its nested types.

use super::*;

mod intake_config_tests {
    use super::*;

    /// Verify that the default configuration is valid and uses "normal".
    #[test]
    fn test_default_config_is_valid() {
        let config = IntakeConfig::default();
        assert_eq!(config.normal_severity, "normal");
        assert!(config.field_mappings.is_empty());
        assert!(config.validate().is_ok());
    }

    /// Verify that an unconfigured adapter gets an empty candidate list.
    #[test]
    fn test_missing_field_mapping_is_empty() {
        let config = IntakeConfig::default();
        assert!(config.field_mapping("prometheus").candidates.is_empty());
    }

    /// Verify that `with_field_mapping` preserves candidate order.
    #[test]
    fn test_with_field_mapping_preserves_order() {
        let config = IntakeConfig::default()
            .with_field_mapping("prometheus", ["exported_instance", "instance"]);
        assert_eq!(
            config.field_mapping("prometheus").candidates,
            vec!["exported_instance".to_string(), "instance".to_string()]
        );
    }

    /// Verify that an empty normal severity is rejected.
    #[test]
    fn test_empty_normal_severity_rejected() {
        let config = IntakeConfig {
            normal_severity: " ".to_string(),
            ..IntakeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IntakeConfigError::EmptySeverity { .. })
        ));
    }

    /// Verify that an empty candidate name is rejected with its position.
    #[test]
    fn test_empty_candidate_rejected() {
        let config = IntakeConfig::default().with_field_mapping("hsdp", ["application", ""]);
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            IntakeConfigError::EmptyCandidate {
                adapter_id: "hsdp".to_string(),
                position: 1,
            }
        );
    }

    /// Verify that the YAML form deserializes with defaults for absent keys.
    #[test]
    fn test_yaml_deserialization() {
        let yaml = r#"
field_mappings:
  prometheus: [exported_instance, instance]
cloudmonitor:
  critical: critical
"#;
        let config: IntakeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.normal_severity, "normal");
        assert_eq!(
            config.field_mapping("prometheus").candidates,
            vec!["exported_instance".to_string(), "instance".to_string()]
        );
        assert_eq!(config.cloudmonitor.critical, "critical");
        assert_eq!(config.cloudmonitor.warn, "warning");
    }
}

mod trigger_level_tests {
    use super::*;

    /// Verify the default mapping for every known trigger level.
    #[test]
    fn test_default_mapping() {
        let mapping = TriggerLevelMapping::default();
        assert_eq!(mapping.severity_for("CRITICAL", "normal"), "major");
        assert_eq!(mapping.severity_for("WARN", "normal"), "warning");
        assert_eq!(mapping.severity_for("INFO", "normal"), "normal");
        assert_eq!(mapping.severity_for("OK", "ok"), "ok");
        assert_eq!(mapping.severity_for("PANIC", "normal"), "unknown");
    }

    /// Verify that level names are matched case-sensitively.
    #[test]
    fn test_lowercase_level_is_unknown() {
        let mapping = TriggerLevelMapping::default();
        assert_eq!(mapping.severity_for("critical", "normal"), "unknown");
    }

    /// Verify that configured overrides win over the normal sentinel.
    #[test]
    fn test_overrides() {
        let mapping = TriggerLevelMapping {
            critical: "critical".to_string(),
            info: Some("informational".to_string()),
            ..TriggerLevelMapping::default()
        };
        assert_eq!(mapping.severity_for("CRITICAL", "normal"), "critical");
        assert_eq!(mapping.severity_for("INFO", "normal"), "informational");
        assert_eq!(mapping.severity_for("OK", "normal"), "normal");
    }

    /// Verify that an empty override is rejected by validation.
    #[test]
    fn test_empty_override_rejected() {
        let config = IntakeConfig {
            cloudmonitor: TriggerLevelMapping {
                ok: Some(String::new()),
                ..TriggerLevelMapping::default()
            },
            ..IntakeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(IntakeConfigError::EmptySeverity {
                field: "cloudmonitor.ok".to_string()
            })
        );
    }
}
