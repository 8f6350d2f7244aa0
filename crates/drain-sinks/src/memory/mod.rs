//! Memory sink - records batches for tests
//!
//! Keeps a copy of every consumed batch and can be scripted to fail
//! its first N consumes, which is how the retry path is exercised in
//! integration tests. Kept in the library (not behind `cfg(test)`) so
//! downstream crates can use it in their own tests.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use drain_engine::{Batch, BatchSink, SinkError};
use drain_protocol::LogEvent;
use parking_lot::Mutex;

/// Sink that stores consumed batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<LogEvent>>>,
    fail_remaining: AtomicU32,
    calls: AtomicU64,
}

impl MemorySink {
    /// Create a memory sink that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` consume calls with `SinkError::Unavailable`
    #[must_use]
    pub fn fail_times(self, n: u32) -> Self {
        self.fail_remaining.store(n, Ordering::Relaxed);
        self
    }

    /// Total consume invocations, including failed ones
    #[inline]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Sizes of the successfully consumed batches, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }

    /// Copies of the successfully consumed batches
    pub fn batches(&self) -> Vec<Vec<LogEvent>> {
        self.batches.lock().clone()
    }

    /// All consumed events flattened, in delivery order
    pub fn events(&self) -> Vec<LogEvent> {
        self.batches.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl BatchSink for MemorySink {
    async fn consume(&self, batch: &Batch) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self
            .fail_remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SinkError::Unavailable("scripted failure".into()));
        }
        self.batches.lock().push(batch.events().to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
