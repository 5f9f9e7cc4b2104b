//! Named-queue storage engine.
//!
//! Carves large fixed-size [`block`] buffers into per-item payload
//! regions, keeps item metadata in a recyclable [`pool`] arena, and
//! recycles drained blocks through a capacity-capped [`free_pool`].

pub mod block;
pub mod free_pool;
pub mod item;
pub mod pool;
pub mod queue;

pub use block::{Block, BlockId};
pub use free_pool::FreeBlockPool;
pub use item::{Item, ItemId};
pub use pool::{Pool, PoolError};
pub use queue::{PopOutcome, PushOutcome, Queue, QueueError};
