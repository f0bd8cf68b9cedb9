//! Fixed-capacity storage blocks for chunkseq containers.
//!
//! A [`Block`] is the unit of allocation: a contiguous array of slots that a
//! chunked sequence strings together to get cheap growth at both ends.
//! [`GrowthPolicy`] decides, as a pure function, what happens when a block
//! fills up or empties out, so the amortized allocation behavior can be
//! tested without a container in the loop.

use serde::{Deserialize, Serialize};

/// Default number of element slots per block.
pub const DEFAULT_BLOCK_CAPACITY: usize = 32;

/// A fixed-capacity array of element slots.
///
/// Slots are `Option<T>` so the block can hand elements in and out without
/// unsafe code; a slot is either occupied or vacant. The capacity is fixed at
/// construction and never changes.
#[derive(Debug, Clone)]
pub struct Block<T> {
    slots: Vec<Option<T>>,
}

impl<T> Block<T> {
    /// Creates a block with `capacity` vacant slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "block capacity must be nonzero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Number of slots in this block.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` in the slot at `offset`.
    ///
    /// The slot must be vacant; occupied slots are never silently overwritten.
    pub fn put(&mut self, offset: usize, value: T) {
        debug_assert!(self.slots[offset].is_none(), "slot {offset} is occupied");
        self.slots[offset] = Some(value);
    }

    /// Removes and returns the element at `offset`, leaving the slot vacant.
    pub fn take(&mut self, offset: usize) -> Option<T> {
        self.slots[offset].take()
    }

    /// Borrows the element at `offset`, if the slot is occupied.
    pub fn get(&self, offset: usize) -> Option<&T> {
        self.slots[offset].as_ref()
    }

    /// Mutably borrows the element at `offset`, if the slot is occupied.
    pub fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        self.slots[offset].as_mut()
    }

    /// Returns true if the slot at `offset` holds no element.
    pub fn is_vacant(&self, offset: usize) -> bool {
        self.slots[offset].is_none()
    }

    /// Drops every element, leaving all slots vacant for reuse.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

/// What to do with a block that has just become empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockDisposal {
    /// Keep the block in the index (it is the sole remaining block).
    Retain,
    /// Detach the block and hold it in the spare pool for reuse.
    Pool,
    /// Detach the block and release its allocation.
    Drop,
}

/// Allocation strategy for a chunked sequence.
///
/// Growth is always by a single block at the overflowing end. Shrink is lazy:
/// a block is detached only once fully vacated, the sole remaining block is
/// never detached, and up to `spare_limit` detached blocks are pooled instead
/// of released so refill after drain does not churn the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Maximum number of empty blocks held back for reuse.
    pub spare_limit: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self { spare_limit: 1 }
    }
}

impl GrowthPolicy {
    /// Policy that never pools: vacated blocks are released immediately.
    pub fn no_spares() -> Self {
        Self { spare_limit: 0 }
    }

    /// Number of blocks to allocate when an end block overflows.
    pub fn grow_step(&self) -> usize {
        1
    }

    /// Decides the fate of a block that has just emptied.
    ///
    /// `remaining` is the count of live blocks left in the index if this one
    /// is detached; `pooled` is the current spare-pool size.
    pub fn dispose(&self, remaining: usize, pooled: usize) -> BlockDisposal {
        if remaining == 0 {
            BlockDisposal::Retain
        } else if pooled < self.spare_limit {
            BlockDisposal::Pool
        } else {
            BlockDisposal::Drop
        }
    }

    /// Number of blocks needed to hold `count` elements at `capacity` slots
    /// per block, assuming a block-aligned front.
    pub fn blocks_needed(&self, count: usize, capacity: usize) -> usize {
        count.div_ceil(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_put_take() {
        let mut block: Block<i32> = Block::new(4);

        assert!(block.is_vacant(0));
        block.put(0, 10);
        assert!(!block.is_vacant(0));

        assert_eq!(block.get(0), Some(&10));
        assert_eq!(block.take(0), Some(10));
        assert!(block.is_vacant(0));
        assert_eq!(block.take(0), None);
    }

    #[test]
    fn test_block_get_mut() {
        let mut block: Block<i32> = Block::new(2);

        block.put(1, 5);
        if let Some(value) = block.get_mut(1) {
            *value = 7;
        }

        assert_eq!(block.get(1), Some(&7));
    }

    #[test]
    fn test_block_reset() {
        let mut block: Block<i32> = Block::new(3);

        block.put(0, 1);
        block.put(2, 3);
        block.reset();

        assert!(block.is_vacant(0));
        assert!(block.is_vacant(1));
        assert!(block.is_vacant(2));
        assert_eq!(block.capacity(), 3);
    }

    #[test]
    #[should_panic(expected = "block capacity must be nonzero")]
    fn test_block_zero_capacity_panics() {
        let _block: Block<i32> = Block::new(0);
    }

    #[test]
    fn test_policy_retains_sole_block() {
        let policy = GrowthPolicy::default();

        assert_eq!(policy.dispose(0, 0), BlockDisposal::Retain);
        assert_eq!(policy.dispose(0, 1), BlockDisposal::Retain);
    }

    #[test]
    fn test_policy_pools_up_to_limit() {
        let policy = GrowthPolicy { spare_limit: 2 };

        assert_eq!(policy.dispose(3, 0), BlockDisposal::Pool);
        assert_eq!(policy.dispose(3, 1), BlockDisposal::Pool);
        assert_eq!(policy.dispose(3, 2), BlockDisposal::Drop);
    }

    #[test]
    fn test_policy_no_spares_always_drops() {
        let policy = GrowthPolicy::no_spares();

        assert_eq!(policy.dispose(1, 0), BlockDisposal::Drop);
        assert_eq!(policy.dispose(5, 0), BlockDisposal::Drop);
        // Sole-block retention still wins over the pool setting.
        assert_eq!(policy.dispose(0, 0), BlockDisposal::Retain);
    }

    #[test]
    fn test_policy_grow_step() {
        assert_eq!(GrowthPolicy::default().grow_step(), 1);
    }

    #[test]
    fn test_blocks_needed() {
        let policy = GrowthPolicy::default();

        assert_eq!(policy.blocks_needed(0, 8), 0);
        assert_eq!(policy.blocks_needed(1, 8), 1);
        assert_eq!(policy.blocks_needed(8, 8), 1);
        assert_eq!(policy.blocks_needed(9, 8), 2);
        assert_eq!(policy.blocks_needed(17, 8), 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // blocks_needed is the least block count whose slots cover count.
            #[test]
            fn prop_blocks_needed_is_minimal_cover(
                count in 0usize..10_000,
                capacity in 1usize..512
            ) {
                let needed = GrowthPolicy::default().blocks_needed(count, capacity);

                prop_assert!(needed * capacity >= count);
                prop_assert!(needed == 0 || (needed - 1) * capacity < count);
            }

            // the sole remaining block is never detached, whatever the limit.
            #[test]
            fn prop_sole_block_always_retained(
                spare_limit in 0usize..16,
                pooled in 0usize..16
            ) {
                let policy = GrowthPolicy { spare_limit };

                prop_assert_eq!(policy.dispose(0, pooled), BlockDisposal::Retain);
            }
        }
    }
}
