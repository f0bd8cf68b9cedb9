//! Chunked double-ended sequence container.
//!
//! [`ChunkedSequence`] stores elements in a chain of fixed-capacity blocks
//! (see `chunkseq-block`) instead of one contiguous buffer. Growth at either
//! end allocates a single block at that end, so pushes never relocate
//! existing elements; random access costs two dereferences: one to find the
//! block, one to find the slot within it.
//!
//! Cost model:
//! - `push_front` / `push_back` / `pop_front` / `pop_back`: amortized O(1)
//! - indexed access (`at`, `Index`): O(1)
//! - `insert` / `remove` at interior positions: O(n), shifting only the
//!   shorter side toward the nearer end
//! - `swap`: O(1), structural exchange only
//!
//! The container is single-owner and not synchronized; wrap it in a lock if
//! it must be shared across threads.

pub mod cursor;
pub mod error;
pub mod iter;

pub use cursor::Cursor;
pub use error::SequenceError;
pub use iter::{IntoIter, Iter};

pub use chunkseq_block::{BlockDisposal, DEFAULT_BLOCK_CAPACITY, GrowthPolicy};

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use chunkseq_block::Block;
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A double-ended sequence over fixed-capacity blocks.
///
/// The block index holds live blocks only; logical element `i` lives at the
/// absolute slot `front_offset + i`, which maps to
/// `(slot / block_cap, slot % block_cap)`. The mapping is recomputed on every
/// access and never cached.
///
/// Invariants:
/// - empty: `front_offset == 0`, index holds zero blocks or one retained one
/// - nonempty: `front_offset < block_cap` and the index spans exactly
///   `ceil((front_offset + len) / block_cap)` blocks
pub struct ChunkedSequence<T> {
    blocks: VecDeque<Block<T>>,
    /// Vacated blocks held for reuse, bounded by the policy's spare limit.
    spares: Vec<Block<T>>,
    front_offset: usize,
    len: usize,
    block_cap: usize,
    policy: GrowthPolicy,
    /// Bumped whenever elements move between slots; checks detached cursors.
    generation: u64,
}

impl<T> ChunkedSequence<T> {
    /// Upper bound on the element count.
    ///
    /// Absolute slot arithmetic (`front_offset + len`) must not overflow
    /// `usize`, so the bound is `usize::MAX / 2` regardless of element type
    /// or block capacity.
    pub const MAX_SIZE: usize = usize::MAX / 2;

    /// Creates an empty sequence with the default block capacity.
    pub fn new() -> Self {
        Self::with_block_capacity(DEFAULT_BLOCK_CAPACITY)
    }

    /// Creates an empty sequence with `capacity` slots per block.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` or `capacity > MAX_SIZE`.
    pub fn with_block_capacity(capacity: usize) -> Self {
        Self::with_policy(capacity, GrowthPolicy::default())
    }

    /// Creates an empty sequence with an explicit block capacity and
    /// allocation policy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` or `capacity > MAX_SIZE`.
    pub fn with_policy(capacity: usize, policy: GrowthPolicy) -> Self {
        assert!(capacity >= 2, "block capacity must be at least 2");
        assert!(
            capacity <= Self::MAX_SIZE,
            "block capacity exceeds MAX_SIZE"
        );
        Self {
            blocks: VecDeque::new(),
            spares: Vec::new(),
            front_offset: 0,
            len: 0,
            block_cap: capacity,
            policy,
            generation: 0,
        }
    }

    /// Creates a sequence holding `count` copies of `value`.
    pub fn filled(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut seq = Self::new();
        seq.assign(count, value);
        seq
    }

    /// Number of elements, O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The documented upper bound on `len()`; see [`Self::MAX_SIZE`].
    pub fn max_size(&self) -> usize {
        Self::MAX_SIZE
    }

    /// Slots per block, fixed at construction.
    pub fn block_capacity(&self) -> usize {
        self.block_cap
    }

    /// Number of blocks currently in the index.
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Number of vacated blocks pooled for reuse.
    pub fn spare_blocks(&self) -> usize {
        self.spares.len()
    }

    /// Checked element access.
    ///
    /// Fails with [`SequenceError::OutOfRange`] when `index >= len()`; never
    /// fails otherwise.
    pub fn at(&self, index: usize) -> Result<&T, SequenceError> {
        self.element(index).ok_or(SequenceError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Checked mutable element access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, SequenceError> {
        let len = self.len;
        self.element_mut(index)
            .ok_or(SequenceError::OutOfRange { index, len })
    }

    /// First element, or `None` when empty.
    pub fn front(&self) -> Option<&T> {
        self.element(0)
    }

    /// Last element, or `None` when empty.
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.element(last))
    }

    /// Appends `value` at the back, amortized O(1).
    ///
    /// Allocates a block only when the back block is exhausted, preferring
    /// the spare pool over a fresh allocation.
    ///
    /// # Panics
    ///
    /// Panics with a capacity-overflow message when `len() == max_size()`;
    /// the check runs before any mutation.
    pub fn push_back(&mut self, value: T) {
        self.check_capacity();
        self.open_back_slot();
        self.put_at(self.len - 1, value);
    }

    /// Prepends `value` at the front, amortized O(1).
    ///
    /// # Panics
    ///
    /// Panics with a capacity-overflow message when `len() == max_size()`.
    pub fn push_front(&mut self, value: T) {
        self.check_capacity();
        self.open_front_slot();
        self.put_at(0, value);
    }

    /// Removes and returns the last element, or `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.take_at(self.len - 1);
        self.close_back_slot();
        value
    }

    /// Removes and returns the first element, or `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.take_at(0);
        self.close_front_slot();
        value
    }

    /// Grows or shrinks to exactly `new_len` elements.
    ///
    /// Shrinking removes from the back only; growing appends clones of
    /// `value` at the back. `resize(len(), _)` is a no-op. Elements at
    /// indices below `min(old_len, new_len)` are untouched.
    ///
    /// # Panics
    ///
    /// Panics when `new_len > max_size()`, before any mutation.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        assert!(
            new_len <= Self::MAX_SIZE,
            "requested length exceeds max_size"
        );
        if new_len < self.len {
            self.truncate(new_len);
        } else {
            while self.len < new_len {
                self.push_back(value.clone());
            }
        }
    }

    /// Removes elements from the back until `len() <= new_len`.
    pub fn truncate(&mut self, new_len: usize) {
        while self.len > new_len {
            let _ = self.pop_back();
        }
    }

    /// Replaces the content with `count` copies of `value`.
    ///
    /// Existing block allocations are recycled through the spare pool, up to
    /// the policy's spare limit, before any fresh block is allocated.
    ///
    /// # Panics
    ///
    /// Panics when `count > max_size()`, before any mutation.
    pub fn assign(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        assert!(count <= Self::MAX_SIZE, "requested length exceeds max_size");
        self.clear();
        for _ in 0..count {
            self.push_back(value.clone());
        }
    }

    /// Drops every element, retaining allocations per the policy.
    pub fn clear(&mut self) {
        for mut block in self.blocks.drain(..) {
            if self.spares.len() < self.policy.spare_limit {
                block.reset();
                self.spares.push(block);
            }
        }
        self.front_offset = 0;
        self.len = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Inserts `value` before logical position `index`, O(n).
    ///
    /// Shifts whichever side of `index` is shorter; when the distances are
    /// equal the back segment is shifted. `index == 0` and `index == len()`
    /// degrade to `push_front` / `push_back`.
    ///
    /// Fails with [`SequenceError::OutOfRange`] when `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), SequenceError> {
        if index > self.len {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.len,
            });
        }
        if index == 0 {
            self.push_front(value);
            return Ok(());
        }
        if index == self.len {
            self.push_back(value);
            return Ok(());
        }
        self.check_capacity();
        if index < self.len - index {
            // Shorter front side: open a slot at the front and walk the
            // prefix one position toward it.
            self.open_front_slot();
            for i in 1..=index {
                self.shift_slot(i, i - 1);
            }
        } else {
            self.open_back_slot();
            let mut i = self.len - 1;
            while i > index {
                self.shift_slot(i - 1, i);
                i -= 1;
            }
        }
        self.put_at(index, value);
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Removes and returns the element at `index`, O(n).
    ///
    /// Same nearer-end shifting rule as [`Self::insert`], with ties filling
    /// the gap from the back.
    ///
    /// Fails with [`SequenceError::OutOfRange`] when `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T, SequenceError> {
        if index >= self.len {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.len,
            });
        }
        let Some(removed) = self.take_at(index) else {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.len,
            });
        };
        if index < self.len - 1 - index {
            let mut i = index;
            while i > 0 {
                self.shift_slot(i - 1, i);
                i -= 1;
            }
            self.close_front_slot();
        } else {
            for i in index + 1..self.len {
                self.shift_slot(i, i - 1);
            }
            self.close_back_slot();
        }
        self.generation = self.generation.wrapping_add(1);
        Ok(removed)
    }

    /// Exchanges the contents of two sequences in O(1).
    ///
    /// Only structural fields change hands; no element is copied or moved
    /// between slots. Detached cursors on either side become stale.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.blocks, &mut other.blocks);
        std::mem::swap(&mut self.spares, &mut other.spares);
        std::mem::swap(&mut self.front_offset, &mut other.front_offset);
        std::mem::swap(&mut self.len, &mut other.len);
        std::mem::swap(&mut self.block_cap, &mut other.block_cap);
        std::mem::swap(&mut self.policy, &mut other.policy);
        // both counters jump past either history: a pre-swap cursor can
        // never match either container again, whichever side it came from
        let next = self.generation.max(other.generation).wrapping_add(1);
        self.generation = next;
        other.generation = next;
    }

    /// Borrowed iterator in logical order, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(
            &self.blocks,
            self.block_cap,
            self.front_offset,
            self.front_offset + self.len,
        )
    }

    /// Copies the content into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// A detached cursor at logical position `index`.
    ///
    /// Fails with [`SequenceError::OutOfRange`] when `index >= len()`.
    pub fn cursor(&self, index: usize) -> Result<Cursor, SequenceError> {
        if index >= self.len {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(Cursor {
            generation: self.generation,
            slot: self.front_offset + index,
        })
    }

    /// Resolves a detached cursor.
    ///
    /// Fails with [`SequenceError::StaleCursor`] if the container went
    /// through a structural mutation since the cursor was taken, or if the
    /// pointed-at element has been removed.
    pub fn get(&self, cursor: Cursor) -> Result<&T, SequenceError> {
        self.check_cursor(cursor)?;
        self.blocks
            .get(cursor.slot / self.block_cap)
            .and_then(|block| block.get(cursor.slot % self.block_cap))
            .ok_or(SequenceError::StaleCursor)
    }

    /// Resolves a detached cursor mutably.
    pub fn get_mut(&mut self, cursor: Cursor) -> Result<&mut T, SequenceError> {
        self.check_cursor(cursor)?;
        let capacity = self.block_cap;
        self.blocks
            .get_mut(cursor.slot / capacity)
            .and_then(|block| block.get_mut(cursor.slot % capacity))
            .ok_or(SequenceError::StaleCursor)
    }

    /// Pure index mapping: logical position to (block, offset).
    fn locate(&self, index: usize) -> (usize, usize) {
        let absolute = self.front_offset + index;
        (absolute / self.block_cap, absolute % self.block_cap)
    }

    fn element(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (block, offset) = self.locate(index);
        self.blocks.get(block).and_then(|b| b.get(offset))
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let (block, offset) = self.locate(index);
        self.blocks.get_mut(block).and_then(|b| b.get_mut(offset))
    }

    fn put_at(&mut self, index: usize, value: T) {
        let (block, offset) = self.locate(index);
        self.blocks[block].put(offset, value);
    }

    fn take_at(&mut self, index: usize) -> Option<T> {
        let (block, offset) = self.locate(index);
        self.blocks[block].take(offset)
    }

    fn shift_slot(&mut self, from: usize, to: usize) {
        if let Some(value) = self.take_at(from) {
            self.put_at(to, value);
        }
    }

    fn check_capacity(&self) {
        assert!(
            self.len < Self::MAX_SIZE,
            "chunked sequence exceeds max_size"
        );
    }

    fn check_cursor(&self, cursor: Cursor) -> Result<(), SequenceError> {
        if cursor.generation != self.generation
            || cursor.slot < self.front_offset
            || cursor.slot >= self.front_offset + self.len
        {
            return Err(SequenceError::StaleCursor);
        }
        Ok(())
    }

    /// A block for a growing end: the spare pool first, fresh otherwise.
    fn fresh_block(&mut self) -> Block<T> {
        self.spares
            .pop()
            .unwrap_or_else(|| Block::new(self.block_cap))
    }

    /// Makes a vacant slot the new logical position 0 and grows `len`.
    fn open_front_slot(&mut self) {
        if self.blocks.is_empty() {
            let block = self.fresh_block();
            self.blocks.push_back(block);
            self.front_offset = self.block_cap;
        } else if self.len == 0 {
            self.front_offset = self.block_cap;
        } else if self.front_offset == 0 {
            let block = self.fresh_block();
            self.blocks.push_front(block);
            self.front_offset = self.block_cap;
            // prepending a block shifts every element's absolute slot
            self.generation = self.generation.wrapping_add(1);
        }
        self.front_offset -= 1;
        self.len += 1;
    }

    /// Makes a vacant slot the new logical position `len` and grows `len`.
    fn open_back_slot(&mut self) {
        if self.blocks.is_empty() {
            let block = self.fresh_block();
            self.blocks.push_back(block);
            self.front_offset = 0;
        } else if self.len == 0 {
            self.front_offset = 0;
        } else if self.front_offset + self.len == self.blocks.len() * self.block_cap {
            let block = self.fresh_block();
            self.blocks.push_back(block);
        }
        self.len += 1;
    }

    /// Retires the (already vacated) slot at logical position 0.
    fn close_front_slot(&mut self) {
        self.front_offset += 1;
        self.len -= 1;
        // a later push may reuse this slot; cursors to it must not revive
        self.generation = self.generation.wrapping_add(1);
        if self.len == 0 {
            self.normalize_empty();
        } else if self.front_offset == self.block_cap {
            self.detach_front_block();
            self.front_offset = 0;
        }
    }

    /// Retires the (already vacated) slot at the logical back.
    fn close_back_slot(&mut self) {
        self.len -= 1;
        // a later push may reuse this slot; cursors to it must not revive
        self.generation = self.generation.wrapping_add(1);
        if self.len == 0 {
            self.normalize_empty();
            return;
        }
        let tail = self.front_offset + self.len;
        if tail % self.block_cap == 0 && self.blocks.len() > tail / self.block_cap {
            self.detach_back_block();
        }
    }

    fn detach_front_block(&mut self) {
        let disposal = self.policy.dispose(self.blocks.len() - 1, self.spares.len());
        if disposal == BlockDisposal::Retain {
            return;
        }
        if let Some(mut block) = self.blocks.pop_front() {
            if disposal == BlockDisposal::Pool {
                block.reset();
                self.spares.push(block);
            }
        }
        // dropping the front block shifts every element's absolute slot
        self.generation = self.generation.wrapping_add(1);
    }

    fn detach_back_block(&mut self) {
        let disposal = self.policy.dispose(self.blocks.len() - 1, self.spares.len());
        if disposal == BlockDisposal::Retain {
            return;
        }
        if let Some(mut block) = self.blocks.pop_back() {
            if disposal == BlockDisposal::Pool {
                block.reset();
                self.spares.push(block);
            }
        }
        // surviving elements keep their slots; no generation bump
    }

    /// Restores the canonical empty form: offset zero, at most one block.
    fn normalize_empty(&mut self) {
        self.front_offset = 0;
        while self.blocks.len() > 1 {
            self.detach_back_block();
        }
        if let Some(block) = self.blocks.front_mut() {
            block.reset();
        }
    }
}

impl<T> Default for ChunkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ChunkedSequence<T> {
    /// Deep copy: fresh blocks, no sharing with the source.
    fn clone(&self) -> Self {
        let mut copy = Self::with_policy(self.block_cap, self.policy.clone());
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for ChunkedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ChunkedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ChunkedSequence<T> {}

impl<T> Index<usize> for ChunkedSequence<T> {
    type Output = T;

    /// Unchecked-contract access: panics on an out-of-bounds index. Use
    /// [`ChunkedSequence::at`] for a recoverable error instead.
    fn index(&self, index: usize) -> &T {
        match self.element(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {}", self.len),
        }
    }
}

impl<T> IndexMut<usize> for ChunkedSequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.element_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {len}"),
        }
    }
}

impl<T> Extend<T> for ChunkedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for ChunkedSequence<T> {
    /// Range construction: single pass, no size needed up front.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl<T> IntoIterator for ChunkedSequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a ChunkedSequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Serialize> Serialize for ChunkedSequence<T> {
    /// Serializes as a flat sequence of elements; the block layout is an
    /// implementation detail, not a wire shape.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ChunkedSequence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ElementsVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ElementsVisitor<T> {
            type Value = ChunkedSequence<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of elements")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut seq = ChunkedSequence::new();
                while let Some(value) = access.next_element()? {
                    seq.push_back(value);
                }
                Ok(seq)
            }
        }

        deserializer.deserialize_seq(ElementsVisitor(PhantomData))
    }
}
