//! Tests for engine statistics

use crate::stats::EngineStats;

#[test]
fn test_new_stats_are_zero() {
    let stats = EngineStats::new();
    let snapshot = stats.snapshot();

    assert_eq!(snapshot.total_events, 0);
    assert_eq!(snapshot.events_flushed, 0);
    assert_eq!(snapshot.batches_flushed, 0);
    assert_eq!(snapshot.avg_batch_size, 0.0);
    assert_eq!(snapshot.pending_events, 0);
    assert_eq!(snapshot.errors, 0);
    assert_eq!(snapshot.retries, 0);
}

#[test]
fn test_append_then_flush_accounting() {
    let stats = EngineStats::new();

    stats.record_appended(5);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.total_events, 5);
    assert_eq!(snapshot.pending_events, 5);

    stats.record_flushed(3);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_flushed, 1);
    assert_eq!(snapshot.events_flushed, 3);
    assert_eq!(snapshot.pending_events, 2);
    // Identity: total == flushed + pending
    assert_eq!(
        snapshot.total_events,
        snapshot.events_flushed + snapshot.pending_events
    );
}

#[test]
fn test_avg_batch_size_is_running_average() {
    let stats = EngineStats::new();

    stats.record_appended(10);
    stats.record_flushed(4);
    stats.record_flushed(6);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.batches_flushed, 2);
    assert!((snapshot.avg_batch_size - 5.0).abs() < 1e-9);
}

#[test]
fn test_errors_and_retries() {
    let stats = EngineStats::new();

    stats.record_error();
    stats.record_error();
    stats.record_retry();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.errors, 2);
    assert_eq!(snapshot.retries, 1);
}
