//! Tests for the alert-intake-core library module.

use super::*;

#[test]
fn test_correlation_id_generation() {
    let id1 = CorrelationId::new();
    let id2 = CorrelationId::new();

    assert_ne!(id1, id2);
    assert!(!id1.as_str().is_empty());
}

#[test]
fn test_correlation_id_round_trips_through_display() {
    let id = CorrelationId::new();
    let parsed: CorrelationId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);

    assert!("not-a-uuid".parse::<CorrelationId>().is_err());
}

