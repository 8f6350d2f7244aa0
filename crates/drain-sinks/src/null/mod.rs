//! Null sink - discards all data
//!
//! Used for benchmarking the engine without any I/O overhead: it
//! accepts batches, updates counters, and drops the data. Trivially
//! tolerant of retried batches.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use drain_engine::{Batch, BatchSink, SinkError};

/// Sink that counts and discards every batch
#[derive(Debug, Default)]
pub struct NullSink {
    batches_received: AtomicU64,
    events_received: AtomicU64,
}

impl NullSink {
    /// Create a null sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches consumed so far
    #[inline]
    pub fn batches_received(&self) -> u64 {
        self.batches_received.load(Ordering::Relaxed)
    }

    /// Events consumed so far
    #[inline]
    pub fn events_received(&self) -> u64 {
        self.events_received.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BatchSink for NullSink {
    async fn consume(&self, batch: &Batch) -> Result<(), SinkError> {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
        self.events_received
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
