//! File Sink - line-oriented log storage
//!
//! Formats each event into one line and performs a single append write
//! of the joined lines per flush. The parent directory and the file are
//! created lazily on first use.
//!
//! # Output Format
//!
//! ```text
//! [2025-01-15T10:30:45.123Z] [WARNING] [storage] disk almost full data={"free":1024} error=ENOSPC
//! [2025-01-15T10:30:45.130Z] [INFO] request completed
//! ```
//!
//! A failed write fails the entire batch - there is no partial-success
//! bookkeeping within a batch; the engine decides whether to retry.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, TimeZone, Utc};
use drain_engine::{Batch, BatchSink, SinkError};
use drain_protocol::LogEvent;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::warn;

/// Configuration for the file sink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file path
    pub path: PathBuf,

    /// Append to an existing file (default) versus truncating it on
    /// first open; writes after the first are always appends
    pub append: bool,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("drain.log"),
            append: true,
        }
    }
}

impl FileSinkConfig {
    /// Create config with a custom path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Truncate the file on first open instead of appending
    #[must_use]
    pub fn with_truncate(mut self) -> Self {
        self.append = false;
        self
    }
}

/// Metrics for the file sink
#[derive(Debug, Default)]
pub struct FileSinkMetrics {
    batches_written: AtomicU64,
    lines_written: AtomicU64,
    bytes_written: AtomicU64,
    write_errors: AtomicU64,
}

impl FileSinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            batches_written: AtomicU64::new(0),
            lines_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record a successfully written batch
    #[inline]
    pub fn record_batch(&self, lines: u64, bytes: u64) {
        self.batches_written.fetch_add(1, Ordering::Relaxed);
        self.lines_written.fetch_add(lines, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed write
    #[inline]
    pub fn record_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_written: self.batches_written.load(Ordering::Relaxed),
            lines_written: self.lines_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of file sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches_written: u64,
    pub lines_written: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
}

/// Reference sink writing one line per event
pub struct FileSink {
    config: FileSinkConfig,
    name: String,
    metrics: Arc<FileSinkMetrics>,
    /// First-use guard: creates the parent directory and applies the
    /// truncate-on-open mode exactly once
    init: OnceCell<()>,
}

impl FileSink {
    /// Create a file sink with the given configuration
    pub fn new(config: FileSinkConfig) -> Self {
        Self::with_name(config, "file")
    }

    /// Create a file sink with a custom name
    pub fn with_name(config: FileSinkConfig, name: impl Into<String>) -> Self {
        Self {
            config,
            name: name.into(),
            metrics: Arc::new(FileSinkMetrics::new()),
            init: OnceCell::new(),
        }
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &FileSinkMetrics {
        &self.metrics
    }

    /// The configured output path
    #[inline]
    pub fn path(&self) -> &PathBuf {
        &self.config.path
    }

    /// Lazily create the parent directory; truncate once if configured
    async fn ensure_ready(&self) -> Result<(), SinkError> {
        self.init
            .get_or_try_init(|| async {
                if let Some(parent) = self.config.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
                if !self.config.append {
                    OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(&self.config.path)
                        .await?;
                }
                Ok::<_, SinkError>(())
            })
            .await?;
        Ok(())
    }

    async fn write_batch(&self, batch: &Batch) -> Result<usize, SinkError> {
        self.ensure_ready().await?;

        let mut out = String::new();
        for event in batch.events() {
            format_event(&mut out, event)?;
            out.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.config.path)
            .await?;
        file.write_all(out.as_bytes()).await?;
        file.flush().await?;
        Ok(out.len())
    }
}

#[async_trait]
impl BatchSink for FileSink {
    async fn consume(&self, batch: &Batch) -> Result<(), SinkError> {
        match self.write_batch(batch).await {
            Ok(bytes) => {
                self.metrics.record_batch(batch.len() as u64, bytes as u64);
                Ok(())
            }
            Err(err) => {
                self.metrics.record_error();
                warn!(sink = %self.name, error = %err, "batch write failed");
                Err(err)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Render one event as a log line
///
/// `[timestamp] [LEVEL] [context] message data=<json> error=<message>`;
/// absent fields are omitted. Events without a timestamp are stamped at
/// write time.
fn format_event(out: &mut String, event: &LogEvent) -> Result<(), SinkError> {
    let ts = event
        .timestamp_ms
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now);

    let _ = write!(
        out,
        "[{}] [{}]",
        ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        event.level.label()
    );
    if let Some(context) = &event.context {
        let _ = write!(out, " [{context}]");
    }
    if let Some(message) = &event.message {
        let _ = write!(out, " {message}");
    }
    if let Some(data) = &event.data {
        let _ = write!(out, " data={}", serde_json::to_string(data)?);
    }
    if let Some(error) = &event.error {
        let _ = write!(out, " error={}", error.message);
    }
    Ok(())
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
