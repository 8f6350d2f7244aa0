//! Slab-based object pool for log event records
//!
//! Recycles `LogEvent` instances to cut allocation churn on the hot
//! logging path. Callers receive an opaque [`EventHandle`] carrying a
//! slot index and a generation counter; the generation is validated on
//! every access, so a stale handle (use-after-release, double release)
//! degrades to a no-op instead of corrupting the free list.
//!
//! # Ownership invariant
//!
//! A live event is owned either by the pool's free list or by exactly
//! one lease - never both, never neither. Releasing bumps the slot
//! generation, invalidating every copy of the old handle at once.
//!
//! # Capacity
//!
//! The free list is bounded by `max_pool_size`. Releases beyond that
//! capacity discard the event storage (the slot is kept and reused for
//! later allocations), a deliberate simplicity tradeoff over a
//! hard-capped blocking pool. Exhaustion on `acquire` is never an
//! error: the slab just grows.

use drain_protocol::LogEvent;

/// Opaque handle to a pooled event
///
/// Cheap to copy; validity is checked against the slot generation on
/// every pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle {
    index: u32,
    generation: u32,
}

/// What a slot currently holds
#[derive(Debug)]
enum SlotState {
    /// On the free list, reset and ready for reuse
    Pooled(LogEvent),
    /// Checked out by a caller, data lives in the slot
    Leased(LogEvent),
    /// Checked out and the data was taken for a flush in progress
    InFlight,
    /// Storage discarded (released beyond capacity); index reusable
    Vacant,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    state: SlotState,
}

/// Point-in-time snapshot of pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolStatsSnapshot {
    /// Events currently on the free list
    pub pool_size: usize,
    /// Free list capacity
    pub max_pool_size: usize,
    /// Total events constructed
    pub created: u64,
    /// Acquires served from the free list
    pub reused: u64,
    /// Events currently leased or in flight
    pub active: usize,
    /// reused / total acquires (1.0 when nothing was acquired yet)
    pub hit_rate: f64,
}

/// Reuse cache for mutable event records
///
/// Not internally synchronized; the engine shares it behind a
/// `parking_lot::Mutex` with short critical sections.
#[derive(Debug)]
pub struct ObjectPool {
    slots: Vec<Slot>,
    /// Indices of `Pooled` slots
    free: Vec<u32>,
    /// Indices of `Vacant` slots
    vacant: Vec<u32>,
    max_pool_size: usize,
    created: u64,
    reused: u64,
    acquired: u64,
    active: usize,
}

impl ObjectPool {
    /// Create a pool whose free list holds at most `max_pool_size` events
    pub fn new(max_pool_size: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            vacant: Vec::new(),
            max_pool_size,
            created: 0,
            reused: 0,
            acquired: 0,
            active: 0,
        }
    }

    /// Check out an event
    ///
    /// Reuses a pooled instance when one is available, otherwise
    /// constructs a new one. O(1); never blocks, never performs I/O.
    /// The leased event starts fully reset.
    pub fn acquire(&mut self) -> EventHandle {
        self.acquired += 1;
        self.active += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            if let SlotState::Pooled(event) = std::mem::replace(&mut slot.state, SlotState::Vacant)
            {
                slot.state = SlotState::Leased(event);
                self.reused += 1;
            } else {
                // Free list out of sync with the slot; self-heal by
                // allocating fresh storage in place.
                slot.state = SlotState::Leased(LogEvent::new());
                self.created += 1;
            }
            return EventHandle {
                index,
                generation: slot.generation,
            };
        }

        self.created += 1;
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = SlotState::Leased(LogEvent::new());
            return EventHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            state: SlotState::Leased(LogEvent::new()),
        });
        EventHandle {
            index,
            generation: 0,
        }
    }

    /// Read access to a leased event
    ///
    /// Returns `None` for stale handles and for events whose data was
    /// taken by a flush in progress.
    pub fn get(&self, handle: EventHandle) -> Option<&LogEvent> {
        let slot = self.slot(handle)?;
        match &slot.state {
            SlotState::Leased(event) => Some(event),
            _ => None,
        }
    }

    /// Mutable access to a leased event (producers populate through this)
    pub fn get_mut(&mut self, handle: EventHandle) -> Option<&mut LogEvent> {
        let slot = self.slot_mut(handle)?;
        match &mut slot.state {
            SlotState::Leased(event) => Some(event),
            _ => None,
        }
    }

    /// Take ownership of a leased event for delivery
    ///
    /// The slot stays checked out (`InFlight`) until the batch reaches
    /// a terminal outcome and the event comes back via
    /// [`ObjectPool::release_taken`].
    pub fn take(&mut self, handle: EventHandle) -> Option<LogEvent> {
        let slot = self.slot_mut(handle)?;
        match slot.state {
            SlotState::Leased(_) => {
                match std::mem::replace(&mut slot.state, SlotState::InFlight) {
                    SlotState::Leased(event) => Some(event),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Return a leased event whose data still lives in the slot
    ///
    /// Idempotent: a stale generation or an already-pooled slot is a
    /// no-op returning `false`, so double release cannot duplicate an
    /// entry on the free list.
    pub fn release(&mut self, handle: EventHandle) -> bool {
        let Some(slot) = self.slot(handle) else {
            return false;
        };
        if !matches!(slot.state, SlotState::Leased(_)) {
            return false;
        }
        let index = handle.index;
        let slot = &mut self.slots[index as usize];
        match std::mem::replace(&mut slot.state, SlotState::Vacant) {
            SlotState::Leased(event) => {
                self.finish_release(index, event);
                true
            }
            state => {
                slot.state = state;
                false
            }
        }
    }

    /// Return an event previously taken with [`ObjectPool::take`]
    ///
    /// Same idempotence and capacity rules as `release`; with a stale
    /// handle the event value is simply dropped.
    pub fn release_taken(&mut self, handle: EventHandle, event: LogEvent) -> bool {
        let Some(slot) = self.slot(handle) else {
            return false;
        };
        if !matches!(slot.state, SlotState::InFlight) {
            return false;
        }
        self.finish_release(handle.index, event);
        true
    }

    /// Eagerly populate up to `min(n, max_pool_size)` reset instances
    pub fn prewarm(&mut self, n: usize) {
        for _ in 0..n {
            if self.free.len() >= self.max_pool_size {
                break;
            }
            self.created += 1;
            if let Some(index) = self.vacant.pop() {
                let slot = &mut self.slots[index as usize];
                slot.state = SlotState::Pooled(LogEvent::new());
                self.free.push(index);
            } else {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Pooled(LogEvent::new()),
                });
                self.free.push(index);
            }
        }
    }

    /// Events currently on the free list
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.free.len()
    }

    /// Free list capacity
    #[inline]
    pub fn max_pool_size(&self) -> usize {
        self.max_pool_size
    }

    /// Events currently checked out (leased or in flight)
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Take a snapshot of pool statistics for capacity tuning
    pub fn stats(&self) -> PoolStatsSnapshot {
        let hit_rate = if self.acquired == 0 {
            1.0
        } else {
            self.reused as f64 / self.acquired as f64
        };
        PoolStatsSnapshot {
            pool_size: self.free.len(),
            max_pool_size: self.max_pool_size,
            created: self.created,
            reused: self.reused,
            active: self.active,
            hit_rate,
        }
    }

    fn slot(&self, handle: EventHandle) -> Option<&Slot> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.generation == handle.generation).then_some(slot)
    }

    fn slot_mut(&mut self, handle: EventHandle) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        (slot.generation == handle.generation).then_some(slot)
    }

    /// Reset, bump the generation and pool or discard the storage
    fn finish_release(&mut self, index: u32, mut event: LogEvent) {
        event.reset();
        self.active = self.active.saturating_sub(1);
        let below_capacity = self.free.len() < self.max_pool_size;
        let slot = &mut self.slots[index as usize];
        // Invalidate every outstanding copy of the old handle.
        slot.generation = slot.generation.wrapping_add(1);
        if below_capacity {
            slot.state = SlotState::Pooled(event);
            self.free.push(index);
        } else {
            slot.state = SlotState::Vacant;
            self.vacant.push(index);
        }
    }
}
