use std::str::Utf8Error;

use num_bigint::ParseBigIntError;
use thiserror::Error;

use crate::state_tracker::StructureError;

/// An enumeration of potential errors that appear during bencode decoding.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error in the bencode structure (e.g. a missing end separator).
    #[error("bencode encoding corrupted: {source}")]
    StructureError {
        /// The underlying structure violation.
        #[from]
        source: StructureError,
    },

    /// Unconsumed bytes remained after the single top-level value.
    #[error("{trailing} trailing bytes after the top-level value at offset {offset}")]
    TrailingBytes {
        /// Offset of the first unconsumed byte.
        offset: usize,
        /// How many bytes were left over.
        trailing: usize,
    },

    /// A dictionary key was not valid UTF-8 while text keys were requested.
    #[error("dictionary key is not valid UTF-8: {source}")]
    NonUtf8Key {
        /// The underlying UTF-8 violation.
        #[from]
        source: Utf8Error,
    },

    /// An integer literal could not be materialized.
    #[error("malformed integer literal: {source}")]
    MalformedInteger {
        /// The underlying parse failure.
        #[from]
        source: ParseBigIntError,
    },
}

#[test]
fn decoding_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<Error>();
    is_sync::<Error>();
}
