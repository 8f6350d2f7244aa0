//! Drain - Sinks
//!
//! Reference sink implementations for the drain batching engine.
//!
//! # Architecture
//!
//! Each sink implements [`drain_engine::BatchSink`]: the engine hands it
//! a [`drain_engine::Batch`] and the sink delivers it as a whole. A
//! failed delivery fails the entire batch; the engine owns retry and
//! event-release bookkeeping, so sinks stay stateless about failure.
//!
//! ```text
//! [BatchEngine] --Batch--> [BatchSink::consume] --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Purpose |
//! |------|---------|
//! | `file` | Line-oriented append-only log file |
//! | `null` | Discard everything (benchmarking) |
//! | `memory` | Record batches in memory (tests) |
//!
//! # Example
//!
//! ```ignore
//! use drain_sinks::file::{FileSink, FileSinkConfig};
//! use drain_engine::{BatchEngine, EngineConfig, ObjectPool};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(FileSink::new(
//!     FileSinkConfig::default().with_path("logs/app.log"),
//! ));
//! let pool = Arc::new(parking_lot::Mutex::new(ObjectPool::new(256)));
//! let engine = BatchEngine::new(EngineConfig::default(), sink, pool)?;
//! ```

/// File sink - line-oriented append-only log storage
pub mod file;

/// Memory sink - records batches for tests
pub mod memory;

/// Null sink - discards all data (for benchmarking)
pub mod null;

pub use file::{FileSink, FileSinkConfig, FileSinkMetrics};
pub use memory::MemorySink;
pub use null::NullSink;
