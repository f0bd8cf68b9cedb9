//! Iterators over a [`ChunkedSequence`].
//!
//! All block-boundary crossing lives here and in the container's index
//! mapping: an iterator walks absolute slot positions and recomputes
//! `(block, offset)` on every step, so no call site duplicates the
//! crossing arithmetic.
//!
//! [`ChunkedSequence`]: crate::ChunkedSequence

use std::collections::VecDeque;
use std::iter::FusedIterator;

use chunkseq_block::Block;

use crate::ChunkedSequence;

/// Borrowed iterator in logical order, front to back.
pub struct Iter<'a, T> {
    blocks: &'a VecDeque<Block<T>>,
    capacity: usize,
    /// Absolute slot of the next front element.
    head: usize,
    /// Absolute slot one past the last element.
    tail: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(
        blocks: &'a VecDeque<Block<T>>,
        capacity: usize,
        head: usize,
        tail: usize,
    ) -> Self {
        Self {
            blocks,
            capacity,
            head,
            tail,
        }
    }

    fn slot(&self, absolute: usize) -> Option<&'a T> {
        let blocks = self.blocks;
        blocks
            .get(absolute / self.capacity)
            .and_then(|block| block.get(absolute % self.capacity))
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            return None;
        }
        let item = self.slot(self.head);
        self.head += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tail - self.head;
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            return None;
        }
        self.tail -= 1;
        self.slot(self.tail)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks,
            capacity: self.capacity,
            head: self.head,
            tail: self.tail,
        }
    }
}

/// Draining iterator produced by consuming a sequence, front to back.
pub struct IntoIter<T> {
    seq: ChunkedSequence<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(seq: ChunkedSequence<T>) -> Self {
        Self { seq }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.seq.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.seq.len(), Some(self.seq.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.seq.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
