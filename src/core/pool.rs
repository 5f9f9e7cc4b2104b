//! Slot arena used for queue item metadata and other indexed records.
//!
//! Per the cyclic/back-pointer design note, owning structures are
//! addressed by index into this arena rather than by raw pointer. Slots
//! freed with [`Pool::release`] are recycled by later [`Pool::alloc`]
//! calls instead of leaking monotonically.

use thiserror::Error;

/// Index into a [`Pool`]. Opaque outside this module's callers; callers
/// should wrap it in a domain-specific newtype (see [`crate::core::ItemId`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolIndex(pub usize);

enum Slot<T> {
    Occupied(T),
    Free { next_free: Option<usize> },
}

/// A slot arena with free-list recycling.
///
/// Grows by reallocating (doubling) when full, unless constructed with
/// [`Pool::with_hard_cap`], in which case `alloc` past capacity fails
/// with [`PoolError::OutOfPool`] rather than growing.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
    hard_cap: Option<usize>,
}

impl<T> Pool<T> {
    /// Create a pool that grows on demand.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
            hard_cap: None,
        }
    }

    /// Create a pool that fails with [`PoolError::OutOfPool`] instead of
    /// growing past `capacity`. Used where the contract requires a hard
    /// allocation ceiling (e.g. per-connection receive-buffer capping).
    pub fn with_hard_cap(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
            hard_cap: Some(capacity),
        }
    }

    /// Number of live (allocated, not yet released) slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a hard-capped pool has no room for another allocation.
    pub fn is_full(&self) -> bool {
        match self.hard_cap {
            Some(cap) => self.free_head.is_none() && self.slots.len() >= cap,
            None => false,
        }
    }

    /// Allocate a slot holding `value`, returning its index.
    pub fn alloc(&mut self, value: T) -> Result<PoolIndex, PoolError> {
        if let Some(idx) = self.free_head {
            match self.slots[idx] {
                Slot::Free { next_free } => {
                    self.free_head = next_free;
                }
                Slot::Occupied(_) => unreachable!("free list pointed at an occupied slot"),
            }
            self.slots[idx] = Slot::Occupied(value);
            self.len += 1;
            return Ok(PoolIndex(idx));
        }

        if let Some(cap) = self.hard_cap {
            if self.slots.len() >= cap {
                return Err(PoolError::OutOfPool);
            }
        }

        let idx = self.slots.len();
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(PoolIndex(idx))
    }

    pub fn get(&self, idx: PoolIndex) -> Option<&T> {
        match self.slots.get(idx.0) {
            Some(Slot::Occupied(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, idx: PoolIndex) -> Option<&mut T> {
        match self.slots.get_mut(idx.0) {
            Some(Slot::Occupied(v)) => Some(v),
            _ => None,
        }
    }

    /// Release a slot, returning its value and making the slot available
    /// for reuse by a future `alloc`.
    pub fn release(&mut self, idx: PoolIndex) -> Option<T> {
        let slot = self.slots.get_mut(idx.0)?;
        if matches!(slot, Slot::Free { .. }) {
            return None;
        }
        let occupied = std::mem::replace(
            slot,
            Slot::Free {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(idx.0);
        self.len -= 1;
        match occupied {
            Slot::Occupied(v) => Some(v),
            Slot::Free { .. } => unreachable!(),
        }
    }
}

/// Errors raised by [`Pool`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool is at its hard capacity")]
    OutOfPool,
}
