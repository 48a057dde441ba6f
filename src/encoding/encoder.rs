use std::{collections::HashSet, rc::Rc};

use crate::{
    encoding::Error,
    state_tracker::{StateTracker, Token},
    value::{Dict, Key, Value},
};

/// The actual encoder. Walks a [`Value`] tree and produces its canonical
/// byte representation; every emitted token is also run through the shared
/// state tracker, so the output is valid bencode by construction.
#[derive(Default, Debug)]
pub struct Encoder {
    state: StateTracker<Vec<u8>, Error>,
    output: Vec<u8>,
    /// Identities of the containers on the currently open recursion chain.
    open: HashSet<usize>,
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Set the max nesting depth of the encoded object
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.state.set_max_depth(max_depth);
        self
    }

    /// Emit a single token to the output
    fn emit_token(&mut self, token: Token) -> Result<(), Error> {
        self.state.check_error()?;
        self.state.observe_token(&token)?;
        match token {
            Token::List => self.output.push(b'l'),
            Token::Dict => self.output.push(b'd'),
            Token::String(s) => {
                // Writing to a vec can't fail
                let length = s.len().to_string();
                self.output.extend_from_slice(length.as_bytes());
                self.output.push(b':');
                self.output.extend_from_slice(s);
            },
            Token::Num(num) => {
                self.output.push(b'i');
                self.output.extend_from_slice(num.as_bytes());
                self.output.push(b'e');
            },
            Token::End => self.output.push(b'e'),
        }

        Ok(())
    }

    /// Emit a complete value tree.
    pub fn emit_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Integer(number) => {
                // `BigInt` renders a canonical decimal literal: no leading
                // zeros and no "-0".
                let literal = number.to_str_radix(10);
                self.emit_token(Token::Num(&literal))
            },
            Value::Bool(flag) => self.emit_token(Token::Num(if *flag { "1" } else { "0" })),
            Value::Text(text) => self.emit_token(Token::String(text.as_bytes())),
            Value::Bytes(bytes) => self.emit_token(Token::String(bytes)),
            Value::List(list) => {
                let identity = Rc::as_ptr(list) as usize;
                self.enter_container(identity, "list")?;
                let items = list.borrow();
                let result = self.emit_list(&items);
                self.open.remove(&identity);
                result
            },
            Value::Dict(dict) => {
                let identity = Rc::as_ptr(dict) as usize;
                self.enter_container(identity, "dictionary")?;
                let dict = dict.borrow();
                let result = self.emit_dict(&dict);
                self.open.remove(&identity);
                result
            },
        }
    }

    /// Record a container on the open chain, failing if it is already there.
    /// A container that appears several times in a tree is fine as long as
    /// it is never an ancestor of itself.
    fn enter_container(&mut self, identity: usize, kind: &'static str) -> Result<(), Error> {
        if self.open.insert(identity) {
            Ok(())
        } else {
            self.state.latch_err(Err(Error::CircularReference { kind }))
        }
    }

    fn emit_list(&mut self, items: &[Value]) -> Result<(), Error> {
        self.emit_token(Token::List)?;
        for item in items {
            self.emit_value(item)?;
        }
        self.emit_token(Token::End)
    }

    fn emit_dict(&mut self, dict: &Dict) -> Result<(), Error> {
        self.emit_token(Token::Dict)?;

        // Coerce every key to bytes and impose the canonical order. The sort
        // is stable, so a duplicate pair ends up adjacent to its first
        // occurrence and a single scan finds it.
        let mut pairs: Vec<(&Key, &Value)> = dict.iter().collect();
        pairs.sort_by(|(left, _), (right, _)| left.as_bytes().cmp(right.as_bytes()));

        for adjacent in pairs.windows(2) {
            let (first, _) = adjacent[0];
            let (second, _) = adjacent[1];
            if first.as_bytes() == second.as_bytes() {
                return self.state.latch_err(Err(Error::DuplicateKeys {
                    first: first.to_string(),
                    second: second.to_string(),
                }));
            }
        }

        for (key, value) in pairs {
            self.emit_token(Token::String(key.as_bytes()))?;
            self.emit_value(value)?;
        }

        self.emit_token(Token::End)
    }

    /// Return the encoded bytes, if the written structure is complete
    pub fn get_output(mut self) -> Result<Vec<u8>, Error> {
        self.state.observe_eof()?;
        Ok(self.output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(value: &Value) -> Result<Vec<u8>, Error> {
        let mut encoder = Encoder::new();
        encoder.emit_value(value)?;
        encoder.get_output()
    }

    #[test]
    fn simple_encoding_works() {
        let mut dict = Dict::new();
        dict.insert(b"bar", 25);
        dict.insert(b"foo", vec![Value::from("baz"), Value::from("qux")]);

        let encoded = encode(&Value::from(dict)).expect("Encoding shouldn't fail");
        assert_eq!(&encoded, &b"d3:bari25e3:fool3:baz3:quxee");
    }

    #[test]
    fn keys_are_sorted_regardless_of_insertion_order() {
        let mut dict = Dict::new();
        dict.insert(b"foo", 1);
        dict.insert(b"bar", 2);

        let encoded = encode(&Value::from(dict)).unwrap();
        assert_eq!(&encoded, &b"d3:bari2e3:fooi1ee");
    }

    #[test]
    fn booleans_canonicalize_to_integers() {
        assert_eq!(encode(&Value::from(true)).unwrap(), b"i1e");
        assert_eq!(encode(&Value::from(false)).unwrap(), b"i0e");
    }

    #[test]
    fn text_and_bytes_encode_identically() {
        assert_eq!(encode(&Value::from("spam")).unwrap(), b"4:spam");
        assert_eq!(encode(&Value::from(&b"spam"[..])).unwrap(), b"4:spam");
    }

    #[test]
    fn colliding_key_representations_are_duplicates() {
        let mut dict = Dict::new();
        dict.insert("a", 1);
        dict.insert(b"a", 2);

        let err = encode(&Value::from(dict)).unwrap_err();
        assert!(matches!(err, Error::DuplicateKeys { .. }));
        assert_eq!(
            err.to_string(),
            "duplicate dictionary keys \"a\" and b\"a\""
        );
    }

    #[test]
    fn self_referential_dict_fails() {
        let value = Value::from(Dict::new());
        if let Value::Dict(dict) = &value {
            dict.borrow_mut().insert(b"self", value.clone());
        }

        let err = encode(&value).unwrap_err();
        assert!(matches!(
            err,
            Error::CircularReference {
                kind: "dictionary",
            }
        ));
    }

    #[test]
    fn self_referential_list_fails() {
        let value = Value::from(vec![Value::from(1)]);
        if let Value::List(list) = &value {
            let cycle = value.clone();
            list.borrow_mut().push(cycle);
        }

        let err = encode(&value).unwrap_err();
        assert!(matches!(err, Error::CircularReference { kind: "list" }));
    }

    #[test]
    fn indirect_cycle_fails() {
        let inner = Value::from(Vec::<Value>::new());
        let outer = Value::from(vec![inner.clone()]);
        if let Value::List(list) = &inner {
            list.borrow_mut().push(outer.clone());
        }

        let err = encode(&outer).unwrap_err();
        assert!(matches!(err, Error::CircularReference { kind: "list" }));
    }

    #[test]
    fn shared_but_acyclic_containers_are_fine() {
        let shared = Value::from(vec![Value::from(1), Value::from(2)]);
        let value = Value::from(vec![shared.clone(), shared]);

        let encoded = encode(&value).unwrap();
        assert_eq!(&encoded, &b"lli1ei2eeli1ei2eee");
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut value = Value::from(Vec::<Value>::new());
        for _ in 0..4 {
            value = Value::from(vec![value]);
        }

        assert!(
            Encoder::new()
                .with_max_depth(5)
                .emit_value(&value)
                .is_ok()
        );

        let err = {
            let mut encoder = Encoder::new().with_max_depth(4);
            encoder.emit_value(&value).unwrap_err()
        };
        assert!(matches!(
            err,
            Error::StructureError {
                source: crate::state_tracker::StructureError::NestingTooDeep,
            }
        ));
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut dict = Dict::new();
        dict.insert(b"", 1);

        let err = encode(&Value::from(dict)).unwrap_err();
        assert!(matches!(
            err,
            Error::StructureError {
                source: crate::state_tracker::StructureError::EmptyKey,
            }
        ));
    }

    #[test]
    fn big_integers_encode_in_full() {
        let number: num_bigint::BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            encode(&Value::from(number)).unwrap(),
            b"i123456789012345678901234567890e"
        );
    }
}
