//! Error type for checked sequence operations.

use serde::{Deserialize, Serialize};

/// Errors returned by the checked accessors and interior operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceError {
    /// The requested logical index is not within `[0, len)` (or `[0, len]`
    /// for insertion).
    OutOfRange { index: usize, len: usize },
    /// A detached cursor outlived the element it pointed at: the container
    /// went through a structural mutation, or the element was removed.
    StaleCursor,
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            SequenceError::StaleCursor => write!(f, "cursor is stale"),
        }
    }
}

impl std::error::Error for SequenceError {}
