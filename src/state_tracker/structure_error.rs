use std::fmt::Display;

use thiserror::Error;

/// A violation of the canonical bencode structure, shared between the
/// encoding and decoding directions.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Error)]
pub enum StructureError {
    /// Wrong type of token detected.
    #[error("Saw the wrong type of token: {state}")]
    InvalidState {
        /// Description of the violated expectation.
        state: String,
    },

    /// Dictionary keys were not in ascending byte order.
    #[error("Keys were not sorted")]
    UnsortedKeys,

    /// The same dictionary key appeared twice.
    #[error("Duplicate dictionary key")]
    DuplicateKeys,

    /// A dictionary key was empty.
    #[error("Dictionary keys must not be empty")]
    EmptyKey,

    /// EOF reached too early.
    #[error("Reached EOF in the middle of a message")]
    UnexpectedEof,

    /// Unexpected characters detected.
    #[error("Malformed number or unexpected character: {unexpected}")]
    SyntaxError {
        /// Description of the unexpected input.
        unexpected: String,
    },

    /// Exceeded the recursion limit.
    #[error("Maximum nesting depth exceeded")]
    NestingTooDeep,
}

impl StructureError {
    pub(crate) fn unexpected(expected: impl Display, got: char, offset: usize) -> Self {
        StructureError::SyntaxError {
            unexpected: format!("Expected {expected}, got {got:?} at offset {offset}"),
        }
    }

    pub(crate) fn invalid_state(state: impl Display) -> Self {
        StructureError::InvalidState {
            state: state.to_string(),
        }
    }

    pub(crate) fn syntax(unexpected: impl Display) -> Self {
        StructureError::SyntaxError {
            unexpected: unexpected.to_string(),
        }
    }
}
