//! Engine statistics
//!
//! Counters mutated only by the engine, read by operators for tuning.
//! All fields use atomics so snapshots never need a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters owned by the batch engine
#[derive(Debug, Default)]
pub struct EngineStats {
    /// Events accepted by `append`
    total_events: AtomicU64,

    /// Events delivered in successful batches
    events_flushed: AtomicU64,

    /// Batches delivered successfully
    batches_flushed: AtomicU64,

    /// Events buffered and not yet successfully delivered
    pending_events: AtomicU64,

    /// Failed sink invocations
    errors: AtomicU64,

    /// Retry attempts performed
    retries: AtomicU64,
}

impl EngineStats {
    /// Create stats with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_events: AtomicU64::new(0),
            events_flushed: AtomicU64::new(0),
            batches_flushed: AtomicU64::new(0),
            pending_events: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Record events accepted into the pending buffer
    #[inline]
    pub fn record_appended(&self, count: u64) {
        self.total_events.fetch_add(count, Ordering::Relaxed);
        self.pending_events.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a successfully delivered batch
    #[inline]
    pub fn record_flushed(&self, count: u64) {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
        self.events_flushed.fetch_add(count, Ordering::Relaxed);
        self.pending_events.fetch_sub(count, Ordering::Relaxed);
    }

    /// Record a failed sink invocation
    #[inline]
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one retry attempt
    #[inline]
    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot
    pub fn snapshot(&self) -> StatsSnapshot {
        let events_flushed = self.events_flushed.load(Ordering::Relaxed);
        let batches_flushed = self.batches_flushed.load(Ordering::Relaxed);
        let avg_batch_size = if batches_flushed == 0 {
            0.0
        } else {
            events_flushed as f64 / batches_flushed as f64
        };
        StatsSnapshot {
            total_events: self.total_events.load(Ordering::Relaxed),
            events_flushed,
            batches_flushed,
            avg_batch_size,
            pending_events: self.pending_events.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of engine statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Events accepted by `append`
    pub total_events: u64,
    /// Events delivered in successful batches
    pub events_flushed: u64,
    /// Batches delivered successfully
    pub batches_flushed: u64,
    /// Running average batch size (0 until the first flush)
    pub avg_batch_size: f64,
    /// Events buffered and not yet successfully delivered; terminally
    /// dropped events stay counted here, preserving the identity
    /// `total_events == events_flushed + pending_events`
    pub pending_events: u64,
    /// Failed sink invocations
    pub errors: u64,
    /// Retry attempts performed
    pub retries: u64,
}
