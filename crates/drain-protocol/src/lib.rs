//! Drain Protocol - Core event types for the drain pipeline
//!
//! This crate provides the foundational types that flow through the
//! batching engine:
//! - `LogEvent` - The semantic log record produced by a logger façade
//! - `LogLevel` - Severity classification
//! - `ErrorInfo` - Structured error payload attached to an event
//!
//! # Design Principles
//!
//! - **Poolable**: `LogEvent` carries a `reset()` operation so instances
//!   can be recycled through an object pool without reallocation
//! - **Heuristic sizing**: `estimated_size()` gives a cheap advisory
//!   estimate used by the engine's memory-pressure flush trigger; it is
//!   not an exact accounting ledger
//! - **Serde-friendly**: all types derive `Serialize`/`Deserialize` so
//!   sinks can render them without bespoke glue

mod error;
mod event;
mod level;

pub use error::ProtocolError;
pub use event::{ErrorInfo, LogEvent, EVENT_SIZE_OVERHEAD};
pub use level::LogLevel;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
