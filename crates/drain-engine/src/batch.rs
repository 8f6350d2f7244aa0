//! Batch - the unit of delivery handed to sinks
//!
//! A batch is built at flush time by taking the pending events out of
//! the pool. That explicit ownership transfer means the buffer being
//! delivered can never alias new intake: producers keep appending into
//! a fresh pending buffer while the batch is in flight.

use drain_protocol::LogEvent;

use crate::pool::{EventHandle, ObjectPool};

/// An ordered, immutable group of events awaiting delivery
///
/// Events stay in FIFO append order. Sinks read the events through
/// [`Batch::events`]; the parallel handles travel with the batch so the
/// engine can return the events to the pool once the batch reaches a
/// terminal outcome.
#[derive(Debug)]
pub struct Batch {
    handles: Vec<EventHandle>,
    events: Vec<LogEvent>,
}

impl Batch {
    /// Build a batch by taking ownership of pooled events
    ///
    /// Handles whose lease went stale are skipped, keeping the two
    /// vectors aligned.
    pub(crate) fn take_from(pool: &mut ObjectPool, handles: Vec<EventHandle>) -> Self {
        let mut kept = Vec::with_capacity(handles.len());
        let mut events = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Some(event) = pool.take(handle) {
                kept.push(handle);
                events.push(event);
            }
        }
        Self {
            handles: kept,
            events,
        }
    }

    /// Build a batch directly from owned events
    ///
    /// For sink unit tests and benchmarks that do not involve a pool;
    /// such a batch has no handles to release.
    pub fn from_events(events: Vec<LogEvent>) -> Self {
        Self {
            handles: Vec::new(),
            events,
        }
    }

    /// The events in FIFO order
    #[inline]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Number of events in the batch
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the batch carries no events
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of the per-event heuristic size estimates
    pub fn estimated_bytes(&self) -> usize {
        self.events.iter().map(LogEvent::estimated_size).sum()
    }

    /// Remove every handle/event pair for release back to the pool
    ///
    /// Draining rather than consuming lets the engine empty a batch
    /// from a `Drop` impl, where only `&mut self` is available.
    pub(crate) fn drain_parts(&mut self) -> impl Iterator<Item = (EventHandle, LogEvent)> + '_ {
        self.handles.drain(..).zip(self.events.drain(..))
    }
}
