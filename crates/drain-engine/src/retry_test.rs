//! Tests for the backoff schedule

use std::time::Duration;

use crate::config::EngineConfig;
use crate::retry::RetryPolicy;

#[test]
fn test_default_policy_is_disabled() {
    let policy = RetryPolicy::default();
    assert!(!policy.enabled());
    assert_eq!(policy.base_delay, Duration::from_secs(1));
    assert_eq!(policy.max_delay, Duration::from_secs(10));
}

#[test]
fn test_delays_double_per_attempt() {
    let policy = RetryPolicy {
        base_delay: Duration::from_millis(1000),
        max_delay: Duration::from_millis(10_000),
        max_retries: 5,
    };

    assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
}

#[test]
fn test_delay_is_capped() {
    let policy = RetryPolicy {
        base_delay: Duration::from_millis(1000),
        max_delay: Duration::from_millis(10_000),
        max_retries: 10,
    };

    assert_eq!(policy.delay_for(4), Duration::from_millis(10_000));
    assert_eq!(policy.delay_for(9), Duration::from_millis(10_000));
    // Far past any representable doubling.
    assert_eq!(policy.delay_for(64), Duration::from_millis(10_000));
}

#[test]
fn test_from_config_respects_enable_flag() {
    let disabled = EngineConfig::default();
    assert!(!RetryPolicy::from_config(&disabled).enabled());

    let enabled = EngineConfig::default().with_retry(2);
    let policy = RetryPolicy::from_config(&enabled);
    assert!(policy.enabled());
    assert_eq!(policy.max_retries, 2);
}
