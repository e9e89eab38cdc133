//! Thread-safe free lists for `Trade` and `Slot` objects (spec §9,
//! "Object pooling"). Backed by `crossbeam::queue::SegQueue`, a lock-free
//! MPMC queue, matching the pattern used elsewhere in the pack for shared
//! work queues. A `get` on an empty pool allocates a fresh object; a `put`
//! returns a cleared one. Correctness never depends on these pools being
//! used — they exist only to cap allocator pressure under sustained load.

use crossbeam::queue::SegQueue;

use super::types::{Slot, Trade};

/// Generic free list for any `Default`-constructible, reusable object.
pub struct Pool<T> {
    free: SegQueue<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            free: SegQueue::new(),
        }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a previously recycled object if one is free.
    pub fn get(&self) -> Option<T> {
        self.free.pop()
    }

    /// Returns `obj` to the pool for future reuse.
    pub fn put(&self, obj: T) {
        self.free.push(obj);
    }
}

/// Pool of recycled `Slot`s, refilled whenever a pair engine evicts the
/// oldest entry of its window.
pub type SlotPool = Pool<Slot>;

/// Pool of recycled `Trade`s, refilled by workers once a trade has been
/// fully aggregated.
pub type TradePool = Pool<Trade>;

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn empty_pool_returns_none() {
        let pool: SlotPool = Pool::new();
        assert!(pool.get().is_none());
    }

    #[test]
    fn put_then_get_roundtrips() {
        let pool: SlotPool = Pool::new();
        pool.put(Slot {
            pv: BigDecimal::from(1),
            v: BigDecimal::from(2),
        });
        let slot = pool.get().expect("pool should return the recycled slot");
        assert_eq!(slot.pv, BigDecimal::from(1));
        assert_eq!(slot.v, BigDecimal::from(2));
        assert!(pool.get().is_none());
    }
}
