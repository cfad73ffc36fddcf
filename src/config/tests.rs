//! Tests for lock configuration.

use crate::config::{LockConfig, LockMode, Timeout};
use crate::error::FlockError;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = LockConfig::new("/tmp/test.lock").unwrap();

    assert_eq!(config.path(), PathBuf::from("/tmp/test.lock"));
    assert_eq!(config.mode(), LockMode::Exclusive);
    assert_eq!(config.timeout(), Timeout::NonBlocking);
}

#[test]
fn test_relative_path_is_made_absolute() {
    let config = LockConfig::new("some/dir/test.lock").unwrap();

    assert!(config.path().is_absolute());
    assert!(config.path().ends_with("some/dir/test.lock"));
    assert!(config.path().starts_with(std::env::current_dir().unwrap()));
}

#[test]
fn test_empty_path_is_rejected() {
    let err = LockConfig::new("").unwrap_err();
    assert!(matches!(err, FlockError::InvalidConfig(_)));
}

#[test]
fn test_builders() {
    let config = LockConfig::new("/tmp/a.lock")
        .unwrap()
        .shared()
        .wait_for(Duration::from_millis(1500));
    assert_eq!(config.mode(), LockMode::Shared);
    assert_eq!(config.timeout(), Timeout::After(Duration::from_millis(1500)));

    let config = config.exclusive().wait_forever();
    assert_eq!(config.mode(), LockMode::Exclusive);
    assert_eq!(config.timeout(), Timeout::Infinite);

    // A zero wait collapses to non-blocking.
    let config = config.wait_for(Duration::ZERO);
    assert_eq!(config.timeout(), Timeout::NonBlocking);
}

#[test]
fn test_timeout_from_secs() {
    assert_eq!(Timeout::from_secs_f64(0.0).unwrap(), Timeout::NonBlocking);
    assert_eq!(
        Timeout::from_secs_f64(2.5).unwrap(),
        Timeout::After(Duration::from_millis(2500))
    );
}

#[test]
fn test_invalid_timeouts_are_rejected() {
    for secs in [-1.0, -0.001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = Timeout::from_secs_f64(secs).unwrap_err();
        assert!(
            matches!(err, FlockError::InvalidConfig(_)),
            "expected InvalidConfig for {}",
            secs
        );
    }
}

#[test]
fn test_huge_timeouts_are_rejected_not_panicking() {
    for secs in [1e20, f64::MAX] {
        let err = Timeout::from_secs_f64(secs).unwrap_err();
        assert!(matches!(err, FlockError::InvalidConfig(_)));
        assert!(err.to_string().contains("out of range"));
    }

    let err = LockConfig::from_json(r#"{"path": "/tmp/x.lock", "timeout": 1e20}"#).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_json_wire_format() {
    let config = LockConfig::new("/var/lock/app.lock")
        .unwrap()
        .shared()
        .wait_for(Duration::from_millis(500));

    let json = config.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["path"], "/var/lock/app.lock");
    assert_eq!(value["mode"], "shared");
    assert_eq!(value["timeout"], 0.5);
    assert!(!json.contains('\n'));
}

#[test]
fn test_json_infinite_timeout_is_null() {
    let config = LockConfig::new("/var/lock/app.lock").unwrap().wait_forever();
    let value: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();

    assert!(value["timeout"].is_null());
    assert_eq!(LockConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
}

#[test]
fn test_parse_minimal_json() {
    let config = LockConfig::from_json(r#"{"path": "/tmp/x.lock"}"#).unwrap();

    assert_eq!(config.mode(), LockMode::Exclusive);
    assert_eq!(config.timeout(), Timeout::NonBlocking);
}

#[test]
fn test_parse_rejects_negative_timeout() {
    let err = LockConfig::from_json(r#"{"path": "/tmp/x.lock", "timeout": -3}"#).unwrap_err();
    assert!(err.to_string().contains("non-negative"));
}

#[test]
fn test_parse_rejects_relative_path() {
    let err = LockConfig::from_json(r#"{"path": "x.lock"}"#).unwrap_err();
    assert!(err.to_string().contains("absolute"));
}

#[test]
fn test_parse_rejects_unknown_fields() {
    let result = LockConfig::from_json(r#"{"path": "/tmp/x.lock", "lockfile": "/tmp/y"}"#);
    assert!(result.is_err());
}

#[test]
fn test_validate_catches_relative_path() {
    let config = LockConfig::new("/tmp/x.lock")
        .unwrap()
        .with_raw_path(PathBuf::from("relative.lock"));
    assert!(config.validate().is_err());
}

#[test]
fn test_lock_mode_from_shared() {
    assert_eq!(LockMode::from_shared(true), LockMode::Shared);
    assert_eq!(LockMode::from_shared(false), LockMode::Exclusive);
    assert_eq!(LockMode::Shared.to_string(), "shared");
}

#[test]
fn test_timeout_display() {
    assert_eq!(Timeout::Infinite.to_string(), "infinite");
    assert_eq!(Timeout::NonBlocking.to_string(), "non-blocking");
    assert_eq!(Timeout::After(Duration::from_millis(1500)).to_string(), "1.5s");
}
