//! An encoder for bencode. Guarantees that the output is valid, canonical
//! bencode.
//!
//! # Encoding a value tree
//!
//! Build a [`Value`] and hand it to [`crate::encode`]:
//!
//! ```
//! use bender::{Dict, Value};
//!
//! let mut dict = Dict::new();
//! dict.insert("cow", "moo");
//! dict.insert("spam", "eggs");
//!
//! let encoded = bender::encode(&Value::from(dict))?;
//! assert_eq!(b"d3:cow3:moo4:spam4:eggse", encoded.as_slice());
//! # Ok::<(), bender::encoding::Error>(())
//! ```
//!
//! Dictionaries are emitted in canonical key order no matter how they were
//! built, text keys and values are coerced to their UTF-8 bytes, and
//! booleans become the integers `1` and `0`.
//!
//! # Nesting depth limits
//!
//! The encoder enforces a maximum nesting depth (2048 levels by default) so
//! that a pathologically deep tree produces a recoverable error instead of
//! exhausting the stack. For trees that legitimately nest deeper, construct
//! the [`Encoder`] manually:
//!
//! ```
//! use bender::{encoding::Encoder, Value};
//!
//! let mut encoder = Encoder::new().with_max_depth(4096);
//! encoder.emit_value(&Value::from(0))?;
//! let _output = encoder.get_output()?;
//! # Ok::<(), bender::encoding::Error>(())
//! ```
//!
//! # Error handling
//!
//! Once an error occurs during encoding, all future calls to the same
//! encoder will fail early with the same error. No partial output can be
//! observed: the encoded bytes are only handed out by
//! [`Encoder::get_output`], which fails if anything went wrong before.
//!
//! [`Value`]: crate::value::Value

mod encoder;
mod error;

pub use self::{encoder::Encoder, error::Error};
