//! Tests for engine configuration defaults and validation

use std::time::Duration;

use crate::config::{ConfigError, EngineConfig};

#[test]
fn test_defaults() {
    let config = EngineConfig::default();

    assert_eq!(config.max_batch_size, 100);
    assert_eq!(config.max_wait_time, Duration::from_secs(5));
    assert_eq!(config.max_memory_usage, None);
    assert!(!config.enable_retry);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.retry_base_delay, Duration::from_secs(1));
    assert_eq!(config.retry_max_delay, Duration::from_secs(10));
    assert!(config.validate().is_ok());
}

#[test]
fn test_chained_builders() {
    let config = EngineConfig::default()
        .with_max_batch_size(32)
        .with_max_wait_time(Duration::from_millis(250))
        .with_max_memory_usage(64 * 1024)
        .with_retry(5);

    assert_eq!(config.max_batch_size, 32);
    assert_eq!(config.max_wait_time, Duration::from_millis(250));
    assert_eq!(config.max_memory_usage, Some(64 * 1024));
    assert!(config.enable_retry);
    assert_eq!(config.max_retries, 5);
}

#[test]
fn test_validate_rejects_zero_batch_size() {
    let config = EngineConfig::default().with_max_batch_size(0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBatchSize)
    ));
}

#[test]
fn test_validate_rejects_retry_without_budget() {
    let config = EngineConfig::default().with_retry(0);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRetries)));
}

#[test]
fn test_validate_rejects_inverted_delays() {
    let config = EngineConfig::default()
        .with_retry_delays(Duration::from_secs(5), Duration::from_secs(1));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRetryDelays)
    ));
}

#[test]
fn test_deserialize_from_json_millis() {
    let config: EngineConfig = serde_json::from_str(
        r#"{
            "max_batch_size": 10,
            "max_wait_time": 100,
            "enable_retry": true,
            "max_retries": 2
        }"#,
    )
    .unwrap();

    assert_eq!(config.max_batch_size, 10);
    assert_eq!(config.max_wait_time, Duration::from_millis(100));
    assert!(config.enable_retry);
    assert_eq!(config.max_retries, 2);
    // Unspecified knobs fall back to defaults.
    assert_eq!(config.retry_max_delay, Duration::from_secs(10));
}
