//! Fuzz harness for chunked-sequence operations
//!
//! Interprets the fuzzer input as a sequence of container operations and
//! applies it to both a `ChunkedSequence` and a `VecDeque` reference model,
//! asserting identical observable behavior at every step.

#![no_main]

use std::collections::VecDeque;

use chunkseq::{ChunkedSequence, GrowthPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut bytes = data.iter().copied();
    let Some(cap_byte) = bytes.next() else { return };
    let cap = 2 + usize::from(cap_byte % 16);
    let policy = if cap_byte & 0x10 == 0 {
        GrowthPolicy::default()
    } else {
        GrowthPolicy::no_spares()
    };

    let mut seq: ChunkedSequence<u8> = ChunkedSequence::with_policy(cap, policy);
    let mut model: VecDeque<u8> = VecDeque::new();

    while let Some(op) = bytes.next() {
        match op % 8 {
            0 => {
                let value = bytes.next().unwrap_or(0);
                seq.push_back(value);
                model.push_back(value);
            }
            1 => {
                let value = bytes.next().unwrap_or(0);
                seq.push_front(value);
                model.push_front(value);
            }
            2 => assert_eq!(seq.pop_back(), model.pop_back()),
            3 => assert_eq!(seq.pop_front(), model.pop_front()),
            4 => {
                let value = bytes.next().unwrap_or(0);
                let index = usize::from(bytes.next().unwrap_or(0)) % (model.len() + 1);
                seq.insert(index, value).expect("in-range insert");
                model.insert(index, value);
            }
            5 => {
                if !model.is_empty() {
                    let index = usize::from(bytes.next().unwrap_or(0)) % model.len();
                    assert_eq!(seq.remove(index).ok(), model.remove(index));
                }
            }
            6 => {
                let new_len = usize::from(bytes.next().unwrap_or(0));
                let fill = bytes.next().unwrap_or(0);
                seq.resize(new_len, fill);
                model.resize(new_len, fill);
            }
            _ => {
                assert_eq!(seq.front(), model.front());
                assert_eq!(seq.back(), model.back());
            }
        }
        assert_eq!(seq.len(), model.len());
    }

    assert!(seq.iter().eq(model.iter()));
});
