//! Decodes a bencoded buffer into a value tree.
//!
//! # Basic decoding
//!
//! [`crate::decode`] parses exactly one value and fails if anything is left
//! over:
//!
//! ```
//! let value = bender::decode(b"l4:spam4:eggse")?;
//! let list = value.as_list().unwrap();
//! assert_eq!(2, list.len());
//! # Ok::<(), bender::decoding::Error>(())
//! ```
//!
//! For anything beyond the defaults, construct a [`Decoder`]. Decoders have
//! a depth limit to prevent resource exhaustion from hostile inputs. By
//! default, it's set high enough for most structures that you'd encounter
//! when prototyping, but for production use, not only may it not be enough,
//! but the higher the depth limit, the more stack space an attacker can
//! cause your program to use, so we recommend setting the bounds tightly:
//!
//! ```
//! use bender::decoding::Decoder;
//!
//! let _value = Decoder::new(b"d3:fooi1ee").with_max_depth(3).decode()?;
//! # Ok::<(), bender::decoding::Error>(())
//! ```
//!
//! # Dictionary keys
//!
//! Dictionary keys are raw byte strings on the wire, and that is how they
//! are materialized by default. [`Decoder::with_str_keys`] turns them into
//! UTF-8 text instead; a key that is not valid UTF-8 then becomes a fatal
//! decode error. This only affects the returned tree, never the parsing:
//!
//! ```
//! use bender::{decoding::Decoder, Key};
//!
//! let value = Decoder::new(b"d3:cow3:mooe").with_str_keys(true).decode()?;
//! let dict = value.as_dict().unwrap();
//! let (key, _) = dict.iter().next().unwrap();
//! assert_eq!(&Key::Text("cow".to_owned()), key);
//! # Ok::<(), bender::decoding::Error>(())
//! ```
//!
//! # Error handling
//!
//! The decoder won't try to muddle through malformed input; the first
//! violation (a syntax error, an unsorted or duplicate dictionary key, a
//! truncated buffer, trailing bytes) aborts the decode with an [`Error`]
//! describing the offending input. There is no best-effort mode: a decode
//! yields either a complete, fully validated value or an error.

mod decoder;
mod error;

pub use self::{decoder::Decoder, error::Error};
