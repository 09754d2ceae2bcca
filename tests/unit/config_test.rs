//! Tests for configuration loading and validation

use std::time::Duration;

use ticket_pool::config::{ConfigError, SimulationConfig, CAPACITY_ENV, MECHANISM_ENV};
use ticket_pool::core::SyncMechanism;

#[test]
fn test_partial_json_takes_defaults() {
    let cfg = SimulationConfig::from_json_str(r#"{ "capacity": 4 }"#).unwrap();
    assert_eq!(cfg.capacity, 4);
    assert_eq!(cfg.mechanism, SyncMechanism::Mutex);
    assert_eq!(cfg.full_pool_backoff_factor, 2);
    assert_eq!(cfg.state_sample_size, 3);
    assert_eq!(cfg.rwlock_poll_interval(), Duration::from_millis(100));
}

#[test]
fn test_full_json() {
    let cfg = SimulationConfig::from_json_str(
        r#"{
            "capacity": 20,
            "mechanism": "RWLOCK",
            "rwlock_poll_interval_ms": 25,
            "full_pool_backoff_factor": 3,
            "state_sample_size": 5
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.mechanism, SyncMechanism::RwLock);
    assert_eq!(cfg.rwlock_poll_interval(), Duration::from_millis(25));
    assert_eq!(cfg.full_pool_backoff_factor, 3);
    assert_eq!(cfg.state_sample_size, 5);
}

#[test]
fn test_legacy_mechanism_name_in_json() {
    let cfg = SimulationConfig::from_json_str(r#"{ "mechanism": "SYNCHRONIZED" }"#).unwrap();
    assert_eq!(cfg.mechanism, SyncMechanism::Mutex);
}

#[test]
fn test_underscored_rwlock_name_in_json() {
    let cfg = SimulationConfig::from_json_str(r#"{ "mechanism": "RW_LOCK" }"#).unwrap();
    assert_eq!(cfg.mechanism, SyncMechanism::RwLock);
    assert_eq!(
        "RW_LOCK".parse::<SyncMechanism>().unwrap(),
        cfg.mechanism
    );
}

#[test]
fn test_zero_values_rejected() {
    for json in [
        r#"{ "capacity": 0 }"#,
        r#"{ "rwlock_poll_interval_ms": 0 }"#,
        r#"{ "full_pool_backoff_factor": 0 }"#,
    ] {
        let err = SimulationConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = SimulationConfig::from_json_str("{ capacity: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = SimulationConfig::from_json_str(r#"{ "mechanism": "FUTEX" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SimulationConfig::from_json_file("/nonexistent/ticket_pool.json").unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert!(path.ends_with("ticket_pool.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_file_round_trip() {
    let path = std::env::temp_dir().join(format!("ticket_pool_cfg_{}.json", std::process::id()));
    let cfg = SimulationConfig {
        capacity: 12,
        mechanism: SyncMechanism::Channel,
        ..SimulationConfig::default()
    };
    std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();

    let loaded = SimulationConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn test_env_overrides() {
    let cfg = SimulationConfig::default()
        .with_overrides(|key| match key {
            CAPACITY_ENV => Some(" 30 ".into()),
            MECHANISM_ENV => Some("blocking_queue".into()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cfg.capacity, 30);
    assert_eq!(cfg.mechanism, SyncMechanism::Channel);
}

#[test]
fn test_env_overrides_validated() {
    let err = SimulationConfig::default()
        .with_overrides(|key| (key == CAPACITY_ENV).then(|| "0".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = SimulationConfig::default()
        .with_overrides(|key| (key == MECHANISM_ENV).then(|| "fast".to_string()))
        .unwrap_err();
    assert_eq!(err.to_string(), format!("invalid value `fast` for {MECHANISM_ENV}"));
}
