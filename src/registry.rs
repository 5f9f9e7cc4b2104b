//! Name -> queue lookup with concurrent read and lazy, locked creation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{FreeBlockPool, Queue};

/// Process-wide queue registry. Read-mostly: `lookup` takes a read lock;
/// `get_or_create` only takes the write lock when the queue doesn't
/// exist yet, via double-checked locking.
pub struct Registry {
    queues: RwLock<HashMap<Box<[u8]>, Arc<Queue>>>,
    free_pool: Arc<FreeBlockPool>,
    pool_size: usize,
    block_size: usize,
}

impl Registry {
    pub fn new(pool_size: usize, block_size: usize, free_pool: Arc<FreeBlockPool>) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            free_pool,
            pool_size,
            block_size,
        }
    }

    /// Look up an existing queue by name. Does not create one.
    pub fn lookup(&self, name: &[u8]) -> Option<Arc<Queue>> {
        self.queues.read().get(name).cloned()
    }

    /// Look up a queue, creating it if absent. Never destroys queues
    /// (queue garbage collection is explicitly out of scope).
    pub fn get_or_create(&self, name: &[u8]) -> Arc<Queue> {
        if let Some(queue) = self.lookup(name) {
            return queue;
        }

        let mut queues = self.queues.write();
        if let Some(queue) = queues.get(name) {
            return Arc::clone(queue);
        }

        let queue = Arc::new(Queue::new(
            name.to_vec().into_boxed_slice(),
            self.block_size,
            self.pool_size,
            Arc::clone(&self.free_pool),
        ));
        queues.insert(name.to_vec().into_boxed_slice(), Arc::clone(&queue));
        queue
    }

    /// Current length of a named queue, `0` if it doesn't exist. Never
    /// triggers creation.
    pub fn count(&self, name: &[u8]) -> usize {
        self.lookup(name).map(|q| q.count()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.queues.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
