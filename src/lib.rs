//! Encodes and decodes bencoded value trees.
//!
//! The decoder is explicitly designed to not accept any sort of invalid
//! encoding in any mode (including non-canonical encodings), and the
//! encoder likewise ensures that it only produces valid, canonical
//! structures: dictionary keys come out sorted and duplicate-free, integers
//! carry no superfluous leading zeros, and a given value tree has exactly
//! one byte representation.
//!
//! The two directions share one value model ([`Value`]) and one set of
//! canonicalization rules, but are otherwise independent: [`encode`] turns
//! a tree into bytes, [`decode`] turns bytes into a tree, and both are pure
//! functions without any shared state between calls.
#![cfg_attr(not(test), warn(missing_docs))]

pub mod decoding;
pub mod encoding;
pub mod state_tracker;
pub mod value;

pub use crate::value::{Dict, Key, Value};

/// Encode a value tree into its canonical bencode byte representation.
///
/// Fails — without producing any output — if the tree contains a container
/// that is its own ancestor, dictionary keys that coerce to the same bytes,
/// or nesting beyond the default depth limit.
///
/// ```
/// use bender::{Dict, Value};
///
/// let mut dict = Dict::new();
/// dict.insert("cow", "moo");
/// dict.insert("spam", "eggs");
///
/// let encoded = bender::encode(&Value::from(dict))?;
/// assert_eq!(b"d3:cow3:moo4:spam4:eggse", encoded.as_slice());
/// # Ok::<(), bender::encoding::Error>(())
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, encoding::Error> {
    let mut encoder = encoding::Encoder::new();
    encoder.emit_value(value)?;
    encoder.get_output()
}

/// Decode a single bencode value with the default options (dictionary keys
/// stay raw bytes).
///
/// The whole buffer must hold exactly one value: truncated input, trailing
/// bytes and every non-canonical encoding are fatal errors.
///
/// ```
/// use bender::Value;
///
/// let value = bender::decode(b"i42e")?;
/// assert_eq!(Value::from(42), value);
/// # Ok::<(), bender::decoding::Error>(())
/// ```
pub fn decode(bytes: &[u8]) -> Result<Value, decoding::Error> {
    decoding::Decoder::new(bytes).decode()
}
