//! Property tests for chunkseq
//!
//! Differential tests against a `VecDeque` reference model, plus the
//! container's order, access, and resize invariants.

use std::collections::VecDeque;

use chunkseq::{ChunkedSequence, SequenceError};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum EndOp {
    PushBack(i32),
    PushFront(i32),
    PopBack,
    PopFront,
}

fn strategy_end_op() -> impl Strategy<Value = EndOp> {
    prop_oneof![
        any::<i32>().prop_map(EndOp::PushBack),
        any::<i32>().prop_map(EndOp::PushFront),
        Just(EndOp::PopBack),
        Just(EndOp::PopFront),
    ]
}

fn strategy_block_capacity() -> impl Strategy<Value = usize> {
    2usize..9
}

// ============================================================================
// Differential Model Tests
// ============================================================================

proptest! {
    // Any sequence of end operations matches the VecDeque model exactly:
    // every popped value, the final length, and the final order.
    #[test]
    fn prop_end_ops_match_model(
        ops in proptest::collection::vec(strategy_end_op(), 0..300),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            match op {
                EndOp::PushBack(v) => {
                    seq.push_back(v);
                    model.push_back(v);
                }
                EndOp::PushFront(v) => {
                    seq.push_front(v);
                    model.push_front(v);
                }
                EndOp::PopBack => prop_assert_eq!(seq.pop_back(), model.pop_back()),
                EndOp::PopFront => prop_assert_eq!(seq.pop_front(), model.pop_front()),
            }
            prop_assert_eq!(seq.len(), model.len());
        }

        prop_assert!(seq.iter().eq(model.iter()));
    }

    // Interior insert/remove at arbitrary positions matches the model.
    #[test]
    fn prop_interior_ops_match_model(
        seed in proptest::collection::vec(any::<i32>(), 0..40),
        edits in proptest::collection::vec((any::<usize>(), any::<i32>(), any::<bool>()), 0..40),
        cap in strategy_block_capacity()
    ) {
        let mut seq: ChunkedSequence<i32> = ChunkedSequence::with_block_capacity(cap);
        seq.extend(seed.iter().copied());
        let mut model: VecDeque<i32> = seed.into_iter().collect();

        for (position, value, is_insert) in edits {
            if is_insert {
                let index = position % (model.len() + 1);
                seq.insert(index, value).unwrap();
                model.insert(index, value);
            } else if !model.is_empty() {
                let index = position % model.len();
                prop_assert_eq!(seq.remove(index).unwrap(), model.remove(index).unwrap());
            }
        }

        prop_assert_eq!(seq.len(), model.len());
        prop_assert!(seq.iter().eq(model.iter()));
    }
}

// ============================================================================
// Access and Order Invariants
// ============================================================================

proptest! {
    // Collecting a range and iterating front to back round-trips the order.
    #[test]
    fn prop_collect_iterate_round_trip(
        values in proptest::collection::vec(any::<i32>(), 0..200),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());

        let out: Vec<i32> = seq.iter().copied().collect();
        prop_assert_eq!(out, values);
    }

    // at(i) agrees with taking i steps from the front.
    #[test]
    fn prop_at_matches_iteration(
        values in proptest::collection::vec(any::<i32>(), 1..100),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());

        for (i, value) in seq.iter().enumerate() {
            prop_assert_eq!(seq.at(i), Ok(value));
        }
    }

    // at() fails exactly at and beyond len.
    #[test]
    fn prop_at_boundary(
        values in proptest::collection::vec(any::<i32>(), 1..100),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());
        let len = seq.len();

        prop_assert!(seq.at(len - 1).is_ok());
        prop_assert_eq!(seq.at(len), Err(SequenceError::OutOfRange { index: len, len }));
        prop_assert_eq!(
            seq.at(len + 1),
            Err(SequenceError::OutOfRange { index: len + 1, len })
        );
    }

    // resize to the current length never changes content, whatever the fill.
    #[test]
    fn prop_resize_same_len_is_noop(
        values in proptest::collection::vec(any::<i32>(), 0..100),
        fill in any::<i32>(),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());
        let before: Vec<i32> = seq.to_vec();

        seq.resize(seq.len(), fill);

        prop_assert_eq!(seq.to_vec(), before);
        prop_assert_eq!(seq.len(), values.len());
    }

    // resize preserves the surviving prefix and appends only at the back.
    #[test]
    fn prop_resize_preserves_prefix(
        values in proptest::collection::vec(any::<i32>(), 0..100),
        new_len in 0usize..150,
        fill in any::<i32>(),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());

        seq.resize(new_len, fill);

        prop_assert_eq!(seq.len(), new_len);
        for i in 0..new_len.min(values.len()) {
            prop_assert_eq!(seq.at(i), Ok(&values[i]));
        }
        for i in values.len()..new_len {
            prop_assert_eq!(seq.at(i), Ok(&fill));
        }
    }

    // assign always produces count copies, regardless of prior content.
    #[test]
    fn prop_assign_matches_fill(
        values in proptest::collection::vec(any::<i32>(), 0..60),
        count in 0usize..60,
        fill in any::<i32>(),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());

        seq.assign(count, fill);

        prop_assert_eq!(seq, ChunkedSequence::filled(count, fill));
    }

    // swap is a pure structural exchange.
    #[test]
    fn prop_swap_exchanges_contents(
        left in proptest::collection::vec(any::<i32>(), 0..60),
        right in proptest::collection::vec(any::<i32>(), 0..60),
        cap in strategy_block_capacity()
    ) {
        let mut a = ChunkedSequence::with_block_capacity(cap);
        a.extend(left.iter().copied());
        let mut b = ChunkedSequence::with_block_capacity(cap);
        b.extend(right.iter().copied());

        let a_front = a.front().map(std::ptr::from_ref);
        let b_front = b.front().map(std::ptr::from_ref);

        a.swap(&mut b);

        prop_assert_eq!(a.to_vec(), right);
        prop_assert_eq!(b.to_vec(), left);
        prop_assert_eq!(a.front().map(std::ptr::from_ref), b_front);
        prop_assert_eq!(b.front().map(std::ptr::from_ref), a_front);
    }

    // serde round-trips through the flat-sequence wire shape.
    #[test]
    fn prop_serde_round_trip(
        values in proptest::collection::vec(any::<i32>(), 0..60),
        cap in strategy_block_capacity()
    ) {
        let mut seq = ChunkedSequence::with_block_capacity(cap);
        seq.extend(values.iter().copied());

        let json = serde_json::to_string(&seq).unwrap();
        let back: ChunkedSequence<i32> = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(seq, back);
    }
}
