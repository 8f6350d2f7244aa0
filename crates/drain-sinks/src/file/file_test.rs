//! Tests for the file sink

use std::path::PathBuf;

use drain_engine::{Batch, BatchSink};
use drain_protocol::{ErrorInfo, LogEvent, LogLevel};
use serde_json::json;
use tempfile::TempDir;

use super::{FileSink, FileSinkConfig};

fn event(message: &str) -> LogEvent {
    LogEvent {
        message: Some(message.to_string()),
        timestamp_ms: Some(1_736_936_445_123), // 2025-01-15T10:20:45.123Z
        ..LogEvent::default()
    }
}

// =============================================================================
// Config tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = FileSinkConfig::default();
    assert_eq!(config.path, PathBuf::from("drain.log"));
    assert!(config.append);
}

#[test]
fn test_config_builders() {
    let config = FileSinkConfig::default()
        .with_path("/data/logs/app.log")
        .with_truncate();
    assert_eq!(config.path, PathBuf::from("/data/logs/app.log"));
    assert!(!config.append);
}

// =============================================================================
// Write tests
// =============================================================================

#[tokio::test]
async fn test_single_write_per_flush() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");
    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));

    let batch = Batch::from_events(vec![event("first"), event("second")]);
    sink.consume(&batch).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("first"));
    assert!(lines[1].ends_with("second"));

    let snapshot = sink.metrics().snapshot();
    assert_eq!(snapshot.batches_written, 1);
    assert_eq!(snapshot.lines_written, 2);
    assert_eq!(snapshot.bytes_written, content.len() as u64);
    assert_eq!(snapshot.write_errors, 0);
}

#[tokio::test]
async fn test_creates_parent_directory_lazily() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/out.log");
    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));

    sink.consume(&Batch::from_events(vec![event("hello")]))
        .await
        .unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn test_line_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");
    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));

    let full = LogEvent {
        message: Some("disk almost full".into()),
        data: Some(json!({"free": 1024})),
        context: Some("storage".into()),
        error: Some(ErrorInfo::new("ENOSPC")),
        level: LogLevel::Warning,
        timestamp_ms: Some(1_736_936_445_123),
    };
    sink.consume(&Batch::from_events(vec![full])).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(
        content,
        "[2025-01-15T10:20:45.123Z] [WARNING] [storage] disk almost full \
         data={\"free\":1024} error=ENOSPC\n"
    );
}

#[tokio::test]
async fn test_unstamped_event_gets_write_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");
    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));

    let mut bare = LogEvent::new();
    bare.message = Some("no clock".into());
    sink.consume(&Batch::from_events(vec![bare])).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    // A current-year timestamp was substituted, not a zero epoch.
    assert!(!content.starts_with("[1970"));
    assert!(content.contains("[INFO] no clock"));
}

#[tokio::test]
async fn test_append_mode_preserves_existing_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");
    tokio::fs::write(&path, "existing line\n").await.unwrap();

    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));
    sink.consume(&Batch::from_events(vec![event("appended")]))
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(content.starts_with("existing line\n"));
    assert!(content.contains("appended"));
}

#[tokio::test]
async fn test_truncate_mode_clears_once_then_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.log");
    tokio::fs::write(&path, "stale content\n").await.unwrap();

    let sink = FileSink::new(
        FileSinkConfig::default().with_path(&path).with_truncate(),
    );
    sink.consume(&Batch::from_events(vec![event("fresh")]))
        .await
        .unwrap();
    sink.consume(&Batch::from_events(vec![event("second flush")]))
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(!content.contains("stale content"));
    assert!(content.contains("fresh"));
    // Truncation applies only to the first open.
    assert!(content.contains("second flush"));
}

#[tokio::test]
async fn test_write_failure_records_error() {
    let dir = TempDir::new().unwrap();
    // A directory at the target path makes the open fail.
    let path = dir.path().join("not_a_file");
    tokio::fs::create_dir(&path).await.unwrap();

    let sink = FileSink::new(FileSinkConfig::default().with_path(&path));
    let result = sink.consume(&Batch::from_events(vec![event("x")])).await;

    assert!(result.is_err());
    assert_eq!(sink.metrics().snapshot().write_errors, 1);
    assert_eq!(sink.metrics().snapshot().batches_written, 0);
}
