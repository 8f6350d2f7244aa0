//! The batch engine
//!
//! Accumulates pooled events into a pending buffer, decides when to
//! flush (size, memory pressure, or a single armed timer), delivers
//! batches to the sink, and drives retry with exponential backoff on
//! failure. In every failure path the batch's events are released back
//! to the pool, so sustained sink failures cannot starve the pool.
//!
//! # Concurrency
//!
//! The pending buffer, timer slot and pool sit behind `parking_lot`
//! mutexes with short critical sections; no guard is ever held across
//! an await. Stats are atomics. Overlapping flush invocations are not
//! serialized: callers that need strict cross-batch ordering must
//! serialize their producers.
//!
//! Delivery is cancellation-safe: a batch in flight is held by a lease
//! that returns its events to the pool when dropped, and a disarmed
//! flush timer is flagged rather than aborted, so no task is ever
//! cancelled while it holds events taken out of the pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, trace};

use crate::batch::Batch;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pool::{EventHandle, ObjectPool};
use crate::retry::RetryPolicy;
use crate::sink::{BatchSink, SinkError};
use crate::stats::{EngineStats, StatsSnapshot};
use crate::Result;

/// Pending intake buffer, replaced wholesale at every flush
#[derive(Debug, Default)]
struct Pending {
    handles: Vec<EventHandle>,
    estimated_bytes: usize,
}

/// Holds a batch for the duration of delivery
///
/// Delivery borrows the batch through the lease, so its events come
/// back to the pool on every exit path, including the delivering
/// future being dropped mid-consume.
struct BatchLease {
    batch: Batch,
    pool: Arc<Mutex<ObjectPool>>,
}

impl Drop for BatchLease {
    fn drop(&mut self) {
        let mut pool = self.pool.lock();
        for (handle, event) in self.batch.drain_parts() {
            pool.release_taken(handle, event);
        }
    }
}

struct Inner {
    config: EngineConfig,
    retry: RetryPolicy,
    sink: Arc<dyn BatchSink>,
    pool: Arc<Mutex<ObjectPool>>,
    pending: Mutex<Pending>,
    /// Cancellation flag of the single armed flush timer, if any
    ///
    /// Disarming sets the flag instead of aborting the timer task: a
    /// task that has already passed its sleep may hold events taken
    /// out of the pool, and an abort landing mid-delivery would strand
    /// them. The task checks the flag under this lock and turns a
    /// disarmed fire into a no-op.
    timer: Mutex<Option<Arc<AtomicBool>>>,
    /// Set once by `shutdown`; afterwards new intake is rejected
    draining: AtomicBool,
    stats: EngineStats,
}

/// Batching engine between producers and a sink
///
/// Cheap to clone (shared inner state); timer tasks hold a clone so
/// timed flushes work without the original handle.
#[derive(Clone)]
pub struct BatchEngine {
    inner: Arc<Inner>,
}

impl BatchEngine {
    /// Create an engine delivering to `sink`, recycling through `pool`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the configuration fails
    /// [`EngineConfig::validate`].
    pub fn new(
        config: EngineConfig,
        sink: Arc<dyn BatchSink>,
        pool: Arc<Mutex<ObjectPool>>,
    ) -> Result<Self> {
        config.validate()?;
        let retry = RetryPolicy::from_config(&config);
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                retry,
                sink,
                pool,
                pending: Mutex::new(Pending::default()),
                timer: Mutex::new(None),
                draining: AtomicBool::new(false),
                stats: EngineStats::new(),
            }),
        })
    }

    /// Append one pooled event
    ///
    /// Returns `false` when the engine is draining; the rejected event
    /// is released back to the pool so its lease cannot leak. Never
    /// blocks the producer and never returns an error - a flush
    /// triggered here reports failures through logging only.
    pub async fn append(&self, handle: EventHandle) -> bool {
        self.append_many(vec![handle]).await == 1
    }

    /// Append a group of pooled events, returning how many were accepted
    pub async fn append_many(&self, handles: Vec<EventHandle>) -> usize {
        if handles.is_empty() {
            return 0;
        }
        if self.inner.draining.load(Ordering::Acquire) {
            let mut pool = self.inner.pool.lock();
            for handle in &handles {
                pool.release(*handle);
            }
            trace!(rejected = handles.len(), "append rejected while draining");
            return 0;
        }

        let count = handles.len();
        let added_bytes = {
            let pool = self.inner.pool.lock();
            handles
                .iter()
                .map(|h| pool.get(*h).map(|e| e.estimated_size()).unwrap_or(0))
                .sum::<usize>()
        };

        let trigger = {
            let mut pending = self.inner.pending.lock();
            pending.handles.extend(handles);
            pending.estimated_bytes += added_bytes;
            self.should_flush(&pending)
        };
        self.inner.stats.record_appended(count as u64);

        if trigger {
            if let Err(err) = self.flush().await {
                error!(error = %err, "size-triggered flush failed");
            }
        } else {
            self.arm_timer();
        }
        count
    }

    /// Flush whatever is pending
    ///
    /// Disarms the timer first (preventing a double fire), swaps the
    /// pending buffer for an empty one, and delivers the batch. An
    /// empty buffer is a successful no-op.
    pub async fn flush(&self) -> Result<()> {
        self.disarm_timer();
        self.flush_now().await
    }

    /// Drain and stop accepting new events
    ///
    /// Idempotent: only the first caller performs the final flush;
    /// re-entrant or concurrent calls return immediately. An in-flight
    /// sink invocation runs to completion regardless.
    pub async fn shutdown(&self) -> Result<()> {
        if self.inner.draining.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        info!(sink = self.inner.sink.name(), "engine draining");
        self.disarm_timer();
        self.flush_now().await
    }

    /// True once `shutdown` has been called
    #[inline]
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Acquire)
    }

    /// The engine configuration
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Snapshot of the engine statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Events currently buffered (pending batch length)
    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().handles.len()
    }

    /// Size or memory trigger, evaluated under the pending lock
    fn should_flush(&self, pending: &Pending) -> bool {
        if pending.handles.len() >= self.inner.config.max_batch_size {
            return true;
        }
        match self.inner.config.max_memory_usage {
            Some(limit) => pending.estimated_bytes >= limit,
            None => false,
        }
    }

    /// Arm the single flush timer if none is armed
    fn arm_timer(&self) {
        let mut timer = self.inner.timer.lock();
        if timer.is_some() {
            return;
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let engine = self.clone();
        let wait = self.inner.config.max_wait_time;
        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            // Claim the slot, but only if it still holds this timer; a
            // disarm during the sleep already emptied or replaced it.
            // The flag is read under the same lock disarm writes it
            // under, so claim and disarm cannot interleave.
            {
                let mut slot = engine.inner.timer.lock();
                if slot.as_ref().is_some_and(|f| Arc::ptr_eq(f, &flag)) {
                    *slot = None;
                }
                if flag.load(Ordering::Acquire) {
                    return;
                }
            }
            debug!("timed flush firing");
            if let Err(err) = engine.flush_now().await {
                error!(error = %err, "timed flush failed");
            }
        });
        *timer = Some(cancelled);
    }

    /// Disarm the timer without cancelling an in-progress fire
    ///
    /// The task is never aborted; it wakes, observes the flag and
    /// returns. A fire that already claimed its slot proceeds: it races
    /// the caller's own flush on the pending buffer and exactly one of
    /// the two delivers the events.
    fn disarm_timer(&self) {
        let mut slot = self.inner.timer.lock();
        if let Some(cancelled) = slot.take() {
            cancelled.store(true, Ordering::Release);
        }
    }

    async fn flush_now(&self) -> Result<()> {
        let handles = {
            let mut pending = self.inner.pending.lock();
            if pending.handles.is_empty() {
                return Ok(());
            }
            pending.estimated_bytes = 0;
            std::mem::take(&mut pending.handles)
        };
        let batch = {
            let mut pool = self.inner.pool.lock();
            Batch::take_from(&mut pool, handles)
        };
        if batch.is_empty() {
            return Ok(());
        }
        // Leasing the batch guarantees its events return to the pool
        // however delivery ends, so sustained sink failures - or this
        // future being dropped - cannot starve the pool.
        let lease = BatchLease {
            batch,
            pool: Arc::clone(&self.inner.pool),
        };
        self.deliver(lease).await
    }

    async fn deliver(&self, lease: BatchLease) -> Result<()> {
        let events = lease.batch.len();
        match self.inner.sink.consume(&lease.batch).await {
            Ok(()) => {
                self.inner.stats.record_flushed(events as u64);
                Ok(())
            }
            Err(err) => {
                self.inner.stats.record_error();
                if self.inner.retry.enabled() {
                    self.retry_batch(lease, err).await
                } else {
                    Err(EngineError::Sink {
                        events,
                        source: err,
                    })
                }
            }
        }
    }

    /// Sequential retry loop for one failed batch
    async fn retry_batch(&self, lease: BatchLease, first_err: SinkError) -> Result<()> {
        let policy = self.inner.retry;
        let events = lease.batch.len();
        let mut last_err = first_err;
        let mut attempt = 0u32;
        while attempt < policy.max_retries {
            tokio::time::sleep(policy.delay_for(attempt)).await;
            self.inner.stats.record_retry();
            debug!(attempt = attempt + 1, events, "retrying batch");
            match self.inner.sink.consume(&lease.batch).await {
                Ok(()) => {
                    self.inner.stats.record_flushed(events as u64);
                    return Ok(());
                }
                Err(err) => {
                    self.inner.stats.record_error();
                    last_err = err;
                    attempt += 1;
                }
            }
        }

        error!(
            events,
            attempts = policy.max_retries,
            error = %last_err,
            "dropping batch after exhausting retries"
        );
        Err(EngineError::RetriesExhausted {
            attempts: policy.max_retries,
            events,
            source: last_err,
        })
    }
}

impl std::fmt::Debug for BatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEngine")
            .field("sink", &self.inner.sink.name())
            .field("draining", &self.is_draining())
            .field("config", &self.inner.config)
            .finish()
    }
}
