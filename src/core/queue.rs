//! Named FIFO queue: doubly-linked item list over block-backed storage.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use super::block::{Block, BlockId};
use super::free_pool::FreeBlockPool;
use super::item::{Item, ItemId};
use super::pool::Pool;

/// Outcome of a successful push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome;

/// Outcome of a pop: either the removed payload, or the queue was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    Value(Vec<u8>),
    Empty,
}

/// Rough bytes-per-slot estimate used to turn the configured, byte-sized
/// `pool_size` knob into an initial slot count for the item pool. A slot
/// holds an `Item` plus the enum's free-list discriminant; 64 bytes is a
/// generous round number that keeps the pre-sized `Vec` from wasting much
/// space while still avoiding an early reallocation on a freshly created
/// queue.
const ITEM_RECORD_SIZE_ESTIMATE: usize = 64;

/// A named FIFO queue. All mutation goes through `inner`'s lock
/// (`qlock` in the spec's terms); the free-block pool's lock is only
/// ever taken while `inner`'s lock is already held, observing the
/// global lock order queue -> free-block-pool.
pub struct Queue {
    name: Box<[u8]>,
    block_size: usize,
    free_pool: Arc<FreeBlockPool>,
    inner: Mutex<Inner>,
}

struct Inner {
    items: Pool<Item>,
    blocks: Pool<Block>,
    head: Option<ItemId>,
    tail: Option<ItemId>,
    tail_block: Option<BlockId>,
    count: usize,
}

impl Queue {
    /// Create a new, empty queue. Does not allocate a tail block eagerly
    /// (the first push acquires one, preferring the free-block pool, per
    /// the tie-break rule in the storage-engine contract). `pool_size` is
    /// the configured item-metadata pool size in bytes; it seeds the item
    /// pool's initial slot count so a freshly created queue doesn't pay
    /// for an early reallocation.
    pub fn new(
        name: Box<[u8]>,
        block_size: usize,
        pool_size: usize,
        free_pool: Arc<FreeBlockPool>,
    ) -> Self {
        let item_capacity = (pool_size / ITEM_RECORD_SIZE_ESTIMATE).max(1);
        Self {
            name,
            block_size,
            free_pool,
            inner: Mutex::new(Inner {
                items: Pool::new(item_capacity),
                blocks: Pool::new(4),
                head: None,
                tail: None,
                tail_block: None,
                count: 0,
            }),
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn count(&self) -> usize {
        self.inner.lock().count
    }

    pub fn rpush(&self, payload: &[u8]) -> Result<PushOutcome, QueueError> {
        self.push(payload, Side::Tail)
    }

    pub fn lpush(&self, payload: &[u8]) -> Result<PushOutcome, QueueError> {
        self.push(payload, Side::Head)
    }

    pub fn rpop(&self) -> PopOutcome {
        self.pop(Side::Tail)
    }

    pub fn lpop(&self) -> PopOutcome {
        self.pop(Side::Head)
    }

    fn push(&self, payload: &[u8], side: Side) -> Result<PushOutcome, QueueError> {
        if payload.len() > u32::MAX as usize {
            return Err(QueueError::OutOfMemory);
        }

        let mut inner = self.inner.lock();

        let needs_new_block = match inner.tail_block {
            Some(id) => inner
                .blocks
                .get(id.0)
                .map(|b| b.remaining() < payload.len())
                .unwrap_or(true),
            None => true,
        };

        if needs_new_block {
            let wanted = payload.len().max(self.block_size);
            let fresh = if wanted <= self.block_size {
                self.free_pool.acquire().unwrap_or_else(|| Block::new(self.block_size))
            } else {
                Block::new(wanted)
            };
            let idx = inner
                .blocks
                .alloc(fresh)
                .map_err(|_| QueueError::OutOfMemory)?;
            inner.tail_block = Some(BlockId(idx));
        }

        let block_id = inner.tail_block.expect("just ensured a tail block exists");
        let block = inner
            .blocks
            .get_mut(block_id.0)
            .expect("tail_block always names a live slot");
        let offset = block.write(payload);

        let item = Item::new(block_id, offset as u32, payload.len() as u32);
        let item_idx = inner
            .items
            .alloc(item)
            .map_err(|_| QueueError::OutOfMemory)?;
        let item_id = ItemId(item_idx);

        match side {
            Side::Tail => self.link_tail(&mut inner, item_id),
            Side::Head => self.link_head(&mut inner, item_id),
        }
        inner.count += 1;

        Ok(PushOutcome)
    }

    fn pop(&self, side: Side) -> PopOutcome {
        let mut inner = self.inner.lock();

        let item_id = match side {
            Side::Tail => inner.tail,
            Side::Head => inner.head,
        };
        let item_id = match item_id {
            Some(id) => id,
            None => return PopOutcome::Empty,
        };

        self.unlink(&mut inner, item_id);
        inner.count -= 1;

        let item = inner
            .items
            .release(item_id.0)
            .expect("linked item must be present in the item pool");
        let payload = inner
            .blocks
            .get(item.block.0)
            .expect("item's owning block must still be live")
            .read(item.offset as usize, item.len as usize)
            .to_vec();

        self.release_block_reference(&mut inner, item.block);

        PopOutcome::Value(payload)
    }

    fn release_block_reference(&self, inner: &mut Inner, block_id: BlockId) {
        let remaining_nelt = {
            let block = inner
                .blocks
                .get_mut(block_id.0)
                .expect("item's owning block must still be live");
            block.release_item()
        };

        if remaining_nelt != 0 {
            return;
        }

        if inner.tail_block == Some(block_id) {
            // Tail-block reuse policy: cheaper to keep and reset than to
            // round-trip through the free-block pool.
            inner
                .blocks
                .get_mut(block_id.0)
                .expect("checked above")
                .reset();
            return;
        }

        let block = inner
            .blocks
            .release(block_id.0)
            .expect("item's owning block must still be live");
        self.free_pool.release(block);
    }

    fn link_tail(&self, inner: &mut Inner, item_id: ItemId) {
        let old_tail = inner.tail;
        if let Some(old) = old_tail {
            inner.items.get_mut(old.0).unwrap().next = Some(item_id);
        }
        inner.items.get_mut(item_id.0).unwrap().prev = old_tail;
        inner.items.get_mut(item_id.0).unwrap().next = None;
        inner.tail = Some(item_id);
        if inner.head.is_none() {
            inner.head = Some(item_id);
        }
    }

    fn link_head(&self, inner: &mut Inner, item_id: ItemId) {
        let old_head = inner.head;
        if let Some(old) = old_head {
            inner.items.get_mut(old.0).unwrap().prev = Some(item_id);
        }
        inner.items.get_mut(item_id.0).unwrap().next = old_head;
        inner.items.get_mut(item_id.0).unwrap().prev = None;
        inner.head = Some(item_id);
        if inner.tail.is_none() {
            inner.tail = Some(item_id);
        }
    }

    fn unlink(&self, inner: &mut Inner, item_id: ItemId) {
        let (prev, next) = {
            let item = inner.items.get(item_id.0).unwrap();
            (item.prev, item.next)
        };

        match prev {
            Some(p) => inner.items.get_mut(p.0).unwrap().next = next,
            None => inner.head = next,
        }
        match next {
            Some(n) => inner.items.get_mut(n.0).unwrap().prev = prev,
            None => inner.tail = prev,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Head,
    Tail,
}

/// Errors raised by queue storage-engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("out of memory")]
    OutOfMemory,
}
