//! `Value`s hold arbitrary bencode data as an owned tree. Containers are
//! shared handles, so the same list or dictionary instance may appear in
//! several places of a tree; the encoder rejects trees in which a container
//! is its own ancestor.

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
    str,
};

use num_bigint::BigInt;

/// An owned bencode value.
///
/// [`Text`] and [`Bool`] exist as encoder input conveniences only: a text
/// string encodes as its UTF-8 bytes and a boolean encodes as the integer
/// `1` or `0`, so the decoder never produces either variant.
///
/// Cloning a value is shallow for containers: the clone shares the same
/// list or dictionary handle. This is what makes self-referential trees
/// constructible in the first place, and the encoder reports them as
/// circular-reference errors instead of recursing forever.
///
/// [`Text`]: Value::Text
/// [`Bool`]: Value::Bool
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A signed integer of arbitrary magnitude
    Integer(BigInt),
    /// A raw byte string
    Bytes(Vec<u8>),
    /// A UTF-8 text string, encoded as its byte representation
    Text(String),
    /// A boolean, canonicalized to integer `1` or `0` at encode time
    Bool(bool),
    /// A shared handle to an ordered sequence of values
    List(Rc<RefCell<Vec<Value>>>),
    /// A shared handle to a dictionary
    Dict(Rc<RefCell<Dict>>),
}

impl Value {
    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(number) => Some(number),
            _ => None,
        }
    }

    /// Returns the value as a raw byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the value as text, if it is a text string or a byte string
    /// holding valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Bytes(bytes) => str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Borrows the value as a list, if it is one.
    pub fn as_list(&self) -> Option<Ref<'_, Vec<Value>>> {
        match self {
            Value::List(list) => Some(list.borrow()),
            _ => None,
        }
    }

    /// Borrows the value as a dictionary, if it is one.
    pub fn as_dict(&self) -> Option<Ref<'_, Dict>> {
        match self {
            Value::Dict(dict) => Some(dict.borrow()),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// The returned value is a clone, which is shallow for containers.
    pub fn get(&self, key: &[u8]) -> Option<Value> {
        self.as_dict()?.get(key).cloned()
    }
}

/// A dictionary key: a raw byte string, or text that is coerced to its
/// UTF-8 bytes when the dictionary is encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A raw byte string key
    Bytes(Vec<u8>),
    /// A text key, coerced to UTF-8 bytes at encode time
    Text(String),
}

impl Key {
    /// The byte representation the wire format sorts and compares by.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Key::Bytes(bytes) => bytes,
            Key::Text(text) => text.as_bytes(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bytes(bytes) => write!(f, "b\"{}\"", String::from_utf8_lossy(bytes)),
            Key::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

/// A bencode dictionary under construction.
///
/// Entries keep their insertion order; the canonical byte-lexicographic key
/// order is imposed when the dictionary is encoded. Two keys with different
/// representations (such as `Key::Text("a")` and `Key::Bytes(b"a")`) may
/// coexist here — they only collide once coerced to bytes, and the encoder
/// reports that collision as a duplicate-key error.
#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: Vec<(Key, Value)>,
}

// Insertion order has no relevance to what a dictionary means, so equality
// ignores it.
impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, value)| {
                other
                    .entries
                    .iter()
                    .any(|(other_key, other_value)| key == other_key && value == other_value)
            })
    }
}

impl Eq for Dict {}

impl Dict {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Insert a key/value pair, replacing the value of an entry whose key
    /// is exactly equal (same representation, same content). Returns the
    /// replaced value, if any.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        for (existing, slot) in &mut self.entries {
            if *existing == key {
                return Some(std::mem::replace(slot, value));
            }
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a value by the byte representation of its key.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_bytes() == key)
            .map(|(_, value)| value)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl FromIterator<(Key, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

macro_rules! impl_value_from_integer {
    ($($type:ty)*) => {$(
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::Integer(BigInt::from(value))
            }
        }
    )*}
}

impl_value_from_integer!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}

// Fixed-size ordered sequences are equivalent to lists.
impl<const N: usize> From<[Value; N]> for Value {
    fn from(items: [Value; N]) -> Self {
        Value::from(items.to_vec())
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Key::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(value: &[u8; N]) -> Self {
        Key::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Key::Bytes(value)
    }
}
