//! Detached, generation-checked positions into a [`ChunkedSequence`].
//!
//! A [`Cursor`] is a plain value: it borrows nothing, so it can be stored
//! across mutations of the container. The price is that it can go stale.
//! Every mutation that moves elements between slots bumps the container's
//! generation counter, and resolving a stale cursor returns
//! [`SequenceError::StaleCursor`] instead of an arbitrary element.
//!
//! Cursors address the slot, not the logical index: pushes at either end
//! leave a cursor usable as long as no block is attached at the front. Any
//! removal bumps the generation, so a slot vacated by a pop can never be
//! revived by a later push at the same end.
//!
//! [`ChunkedSequence`]: crate::ChunkedSequence
//! [`SequenceError::StaleCursor`]: crate::SequenceError::StaleCursor

/// A detached position into a chunked sequence.
///
/// Created by [`ChunkedSequence::cursor`](crate::ChunkedSequence::cursor) and
/// resolved by [`ChunkedSequence::get`](crate::ChunkedSequence::get) /
/// [`ChunkedSequence::get_mut`](crate::ChunkedSequence::get_mut).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) generation: u64,
    /// Absolute slot index: `block * capacity + offset`.
    pub(crate) slot: usize,
}

impl Cursor {
    /// The cursor one element toward the back.
    pub fn advance(self) -> Cursor {
        Cursor {
            generation: self.generation,
            slot: self.slot + 1,
        }
    }

    /// The cursor one element toward the front, or `None` at slot zero.
    pub fn retreat(self) -> Option<Cursor> {
        let slot = self.slot.checked_sub(1)?;
        Some(Cursor {
            generation: self.generation,
            slot,
        })
    }
}
