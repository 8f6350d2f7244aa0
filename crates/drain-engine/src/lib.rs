//! Drain Engine - batching, retry and pooling for log delivery
//!
//! The engine decouples high-frequency log production from slower,
//! failure-prone sinks. Events accumulate in a bounded pending buffer
//! and are flushed as a batch when a size, memory or time trigger
//! fires; failed flushes retry with exponential backoff; a slab-based
//! object pool recycles event records to cut allocation churn.
//!
//! # Architecture
//!
//! ```text
//! [Producer]                [BatchEngine]                 [Sink]
//!   acquire ──→ populate ──→ append() ──→ pending buffer
//!                                │ size / memory / timer
//!                                ▼
//!                             flush() ──→ Batch ──→ consume()
//!                                │                    │
//!                                │        ok ◄────────┤ err → backoff → retry
//!                                ▼
//!                       release events to pool, update stats
//! ```
//!
//! # Key Design
//!
//! - **Ownership transfer at flush**: the flush path takes the buffered
//!   events out of the pool into a [`Batch`], so the buffer being
//!   delivered can never alias new intake
//! - **Single armed timer**: at most one pending flush timer per
//!   engine; every flush disarms it first to prevent double firing
//! - **Explicit lifecycle**: [`BatchEngine::shutdown`] drains pending
//!   events exactly once; the owning process decides when to call it
//! - **No producer blocking**: `append` never applies backpressure;
//!   without a configured memory cap, pending growth between triggers
//!   is unbounded (documented, not enforced)
//! - **Unserialized flushes**: rapid unawaited appends can put two
//!   flushes in flight at once; cross-batch completion order is then
//!   the caller's concern
//!
//! # Example
//!
//! ```ignore
//! use drain_engine::{BatchEngine, EngineConfig, ObjectPool};
//! use std::sync::Arc;
//!
//! let pool = Arc::new(parking_lot::Mutex::new(ObjectPool::new(256)));
//! let sink = Arc::new(my_sink);
//! let engine = BatchEngine::new(EngineConfig::default(), sink, pool.clone())?;
//!
//! let handle = pool.lock().acquire();
//! if let Some(event) = pool.lock().get_mut(handle) {
//!     event.message = Some("started".into());
//!     event.stamp_now();
//! }
//! engine.append(handle).await;
//! // ...
//! engine.shutdown().await?;
//! ```

mod batch;
mod config;
mod engine;
mod error;
mod pool;
mod retry;
mod sink;
mod stats;

pub use batch::Batch;
pub use config::{ConfigError, EngineConfig};
pub use engine::BatchEngine;
pub use error::EngineError;
pub use pool::{EventHandle, ObjectPool, PoolStatsSnapshot};
pub use retry::RetryPolicy;
pub use sink::{BatchSink, SinkError};
pub use stats::{EngineStats, StatsSnapshot};

// Re-export the event types sinks and producers work with
pub use drain_protocol::{ErrorInfo, LogEvent, LogLevel};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Default maximum events per batch
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Default maximum wait before a timed flush (milliseconds)
pub const DEFAULT_MAX_WAIT_TIME_MS: u64 = 5_000;

/// Default retry attempts when retry is enabled
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Cap on the backoff delay (milliseconds)
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;
#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
