//! The sink extension point
//!
//! The engine is agnostic to where batches go; concrete sinks (file,
//! network, database) implement [`BatchSink`] and are plugged in at
//! engine construction.

use async_trait::async_trait;
use thiserror::Error;

use crate::batch::Batch;

/// Errors a sink may surface while consuming a batch
///
/// This is the only error kind the retry state machine handles.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying I/O failure (file write, socket, ...)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Event payload could not be rendered
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Destination temporarily unreachable
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// Anything else the sink wants to report
    #[error("{0}")]
    Other(String),
}

/// A pluggable consumer that durably delivers a batch
///
/// Implementations must tolerate being invoked more than once for the
/// same logical batch: under retry, a batch that failed is re-delivered
/// as-is, so a retried call is not novel data.
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Durably consume one batch
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the batch could not be delivered as a
    /// whole; there is no partial-success bookkeeping within a batch.
    async fn consume(&self, batch: &Batch) -> Result<(), SinkError>;

    /// Sink name for logging and diagnostics
    fn name(&self) -> &str;
}
