//! LogEvent - the record that flows through the pipeline
//!
//! Events are produced by a logger façade, buffered by the batch engine,
//! and rendered by sinks. All mutable fields can be cleared with
//! [`LogEvent::reset`] so instances survive recycling through the object
//! pool.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::level::LogLevel;

/// Fixed per-event overhead used by the size heuristic, in bytes
///
/// Covers struct layout, vector bookkeeping and small-field slack. The
/// engine's memory trigger is advisory, so a rough constant is enough.
pub const EVENT_SIZE_OVERHEAD: usize = 64;

/// Structured error payload attached to a log event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable error message
    pub message: String,

    /// Error class or kind, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Captured stack trace, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    /// Create an error payload from a message alone
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            stack: None,
        }
    }
}

/// A single log record
///
/// The engine treats events as read-only; only the pool mutates them
/// (via `reset`) when they are recycled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Primary message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Arbitrary structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Logger context (component or subsystem name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,

    /// Severity level
    #[serde(default)]
    pub level: LogLevel,

    /// Milliseconds since the Unix epoch, if stamped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl LogEvent {
    /// Create an empty event at the default level
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the event with the current wall-clock time
    pub fn stamp_now(&mut self) {
        self.timestamp_ms = Some(Utc::now().timestamp_millis());
    }

    /// Clear all mutable fields back to their defaults
    ///
    /// Called by the pool when an event is released, so a later
    /// `acquire()` never observes residual data.
    pub fn reset(&mut self) {
        self.message = None;
        self.data = None;
        self.context = None;
        self.error = None;
        self.level = LogLevel::default();
        self.timestamp_ms = None;
    }

    /// Heuristic in-memory size estimate in bytes
    ///
    /// Fixed overhead plus the byte length of text fields and the
    /// serialized length of the structured payload. UTF-8 byte counts
    /// are used rather than code-unit counts; the figure feeds an
    /// advisory flush trigger, not an accounting ledger.
    pub fn estimated_size(&self) -> usize {
        let mut size = EVENT_SIZE_OVERHEAD;
        if let Some(message) = &self.message {
            size += message.len();
        }
        if let Some(context) = &self.context {
            size += context.len();
        }
        if let Some(error) = &self.error {
            size += error.message.len();
            if let Some(stack) = &error.stack {
                size += stack.len();
            }
        }
        if let Some(data) = &self.data {
            // Serializing a Value cannot fail; fall back to zero anyway
            // rather than panicking in the hot path.
            size += serde_json::to_string(data).map(|s| s.len()).unwrap_or(0);
        }
        size
    }

    /// True when every mutable field is at its default
    pub fn is_reset(&self) -> bool {
        self.message.is_none()
            && self.data.is_none()
            && self.context.is_none()
            && self.error.is_none()
            && self.level == LogLevel::default()
            && self.timestamp_ms.is_none()
    }
}
