//! Process-wide context threaded through the acceptor and every worker.
//!
//! Per the global-state design note, the registry and free-block pool
//! are not ambient globals. The acceptor constructs one [`Server`] at
//! startup and hands an `Arc` of it to each worker at spawn.

use std::sync::Arc;

use crate::config::Config;
use crate::core::FreeBlockPool;
use crate::registry::Registry;

pub struct Server {
    pub config: Config,
    pub registry: Registry,
}

impl Server {
    pub fn new(config: Config) -> Arc<Self> {
        let free_pool = Arc::new(FreeBlockPool::new(config.queue.free_block_pool_cap));
        prewarm_free_pool(&free_pool, &config);
        let registry = Registry::new(config.queue.pool_size, config.queue.block_size, free_pool);

        Arc::new(Self { config, registry })
    }
}

/// Pre-populate the free-block pool with `initial_block_count` blocks so
/// the first few block-growth events across all queues are allocation
/// free, rather than paying for a fresh `Block::new` each time.
fn prewarm_free_pool(free_pool: &FreeBlockPool, config: &Config) {
    use crate::core::Block;

    let warm = config
        .queue
        .initial_block_count
        .min(config.queue.free_block_pool_cap);
    for _ in 0..warm {
        free_pool.release(Block::new(config.queue.block_size));
    }
}
