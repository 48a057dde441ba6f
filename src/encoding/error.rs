use thiserror::Error;

use crate::state_tracker::StructureError;

/// An enumeration of potential errors that appear during bencode encoding.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error in the bencode structure (e.g. exceeding the nesting depth).
    #[error("bencode encoding corrupted: {source}")]
    StructureError {
        /// The underlying structure violation.
        #[from]
        source: StructureError,
    },

    /// Two dictionary keys coerce to the same byte sequence.
    #[error("duplicate dictionary keys {first} and {second}")]
    DuplicateKeys {
        /// The representation of the key encountered first.
        first: String,
        /// The representation of the colliding key.
        second: String,
    },

    /// A container turned out to be its own ancestor.
    #[error("circular reference found while encoding a {kind}")]
    CircularReference {
        /// Which kind of container closed the cycle.
        kind: &'static str,
    },
}

#[test]
fn encoding_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<Error>();
    is_sync::<Error>();
}
