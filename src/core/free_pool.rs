//! Process-wide recycling pool of drained [`Block`]s.
//!
//! Capped at `cap` blocks; blocks offered past the cap are simply
//! dropped, freeing their buffer. Acquired only while moving a block
//! into or out of the pool, never held across a queue lock (lock
//! order: queue lock -> free-block-pool lock, never the reverse).

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::block::Block;

pub struct FreeBlockPool {
    cap: usize,
    blocks: Mutex<VecDeque<Block>>,
}

impl FreeBlockPool {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            blocks: Mutex::new(VecDeque::with_capacity(cap)),
        }
    }

    /// Take a recycled block if one is available.
    pub fn acquire(&self) -> Option<Block> {
        self.blocks.lock().pop_front()
    }

    /// Offer a drained block back to the pool. Dropped (buffer freed) if
    /// the pool is already at capacity.
    ///
    /// Caller must ensure `block.is_empty()`; only drained blocks are
    /// valid free-pool members.
    pub fn release(&self, mut block: Block) {
        debug_assert!(block.is_empty());
        block.reset();
        let mut guard = self.blocks.lock();
        if guard.len() < self.cap {
            guard.push_back(block);
        }
        // else: `block` drops here, freeing its buffer.
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
