use std::str;

use crate::{
    decoding::Error,
    state_tracker::{StateTracker, StructureError, Token},
    value::{Dict, Key, Value},
};

/// A bencode decoder
///
/// Parses exactly one value out of a complete input buffer, rejecting any
/// malformed or non-canonical encoding along the way. Options are set
/// builder-style before calling [`Decoder::decode`].
#[derive(Debug)]
pub struct Decoder<'ser> {
    source: &'ser [u8],
    offset: usize,
    str_keys: bool,
    state: StateTracker<&'ser [u8], Error>,
}

impl<'ser> Decoder<'ser> {
    /// Create a new decoder for the given byte buffer
    pub fn new(buffer: &'ser [u8]) -> Self {
        Decoder {
            source: buffer,
            offset: 0,
            str_keys: false,
            state: StateTracker::new(),
        }
    }

    /// Set the maximum nesting depth of the decoder. Input nested deeper
    /// than this fails with a nesting error instead of exhausting the stack.
    #[must_use]
    pub fn with_max_depth(mut self, new_max_depth: usize) -> Self {
        self.state.set_max_depth(new_max_depth);
        self
    }

    /// Materialize dictionary keys as UTF-8 text instead of raw bytes.
    /// A key that is not valid UTF-8 then becomes a fatal decode error.
    /// This does not change how the wire format is parsed.
    #[must_use]
    pub fn with_str_keys(mut self, str_keys: bool) -> Self {
        self.str_keys = str_keys;
        self
    }

    fn take_byte(&mut self) -> Option<u8> {
        if self.offset < self.source.len() {
            let ret = Some(self.source[self.offset]);
            self.offset += 1;
            ret
        } else {
            None
        }
    }

    fn take_chunk(&mut self, count: usize) -> Option<&'ser [u8]> {
        match self.offset.checked_add(count) {
            Some(end_pos) if end_pos <= self.source.len() => {
                let ret = &self.source[self.offset..end_pos];
                self.offset = end_pos;
                Some(ret)
            },
            _ => None,
        }
    }

    /// Scan a canonical integer literal up to (and consuming) the expected
    /// terminator. Rejects empty digit sequences, a lone `-`, `-0`, and any
    /// superfluous leading zero.
    fn take_int(&mut self, expected_terminator: char) -> Result<&'ser str, StructureError> {
        let start = self.offset;
        let mut curpos = start;

        if self.source.get(curpos) == Some(&b'-') {
            curpos += 1;
        }

        let digits = curpos;
        while matches!(self.source.get(curpos), Some(b'0'..=b'9')) {
            curpos += 1;
        }

        if curpos == digits {
            let expected = if digits > start {
                "'1'..'9'"
            } else {
                "'-' or '0'..'9'"
            };
            return match self.source.get(curpos) {
                Some(&got) => Err(StructureError::unexpected(expected, got as char, curpos)),
                None => Err(StructureError::UnexpectedEof),
            };
        }

        if self.source[digits] == b'0' {
            if digits > start {
                // "-0" is not a canonical integer
                return Err(StructureError::unexpected("'1'..'9'", '0', digits));
            }
            if curpos - digits > 1 {
                // a leading zero is only allowed on the literal zero itself
                return Err(StructureError::unexpected(
                    format!("{expected_terminator:?}"),
                    self.source[digits + 1] as char,
                    digits + 1,
                ));
            }
        }

        match self.source.get(curpos) {
            Some(&got) if got as char == expected_terminator => {},
            Some(&got) => {
                return Err(StructureError::unexpected(
                    format!("{expected_terminator:?} or '0'..'9'"),
                    got as char,
                    curpos,
                ));
            },
            None => return Err(StructureError::UnexpectedEof),
        }

        let slice = &self.source[start..curpos];
        self.offset = curpos + 1;

        let literal = if cfg!(debug_assertions) {
            str::from_utf8(slice).expect("We've already examined every byte in the literal")
        } else {
            // Avoid a second UTF-8 check here
            unsafe { str::from_utf8_unchecked(slice) }
        };

        Ok(literal)
    }

    fn raw_next_token(&mut self) -> Result<Token<'ser>, Error> {
        let token = match self.take_byte().ok_or(StructureError::UnexpectedEof)? as char {
            'e' => Token::End,
            'l' => Token::List,
            'd' => Token::Dict,
            'i' => Token::Num(self.take_int('e')?),
            c if c.is_ascii_digit() => {
                self.offset -= 1;

                let curpos = self.offset;
                let literal = self.take_int(':')?;
                let length = literal.parse::<usize>().map_err(|_| {
                    StructureError::syntax(format!(
                        "Unrepresentable string length at offset {curpos}"
                    ))
                })?;
                Token::String(self.take_chunk(length).ok_or(StructureError::UnexpectedEof)?)
            },
            tok => {
                return Err(Error::from(StructureError::syntax(format!(
                    "Invalid token starting with {:?} at offset {}",
                    tok,
                    self.offset - 1
                ))));
            },
        };

        Ok(token)
    }

    /// Read the next token. Returns Ok(Some(token)) if a token was successfully read,
    fn next_token(&mut self) -> Result<Option<Token<'ser>>, Error> {
        self.state.check_error()?;

        if self.offset == self.source.len() {
            self.state.observe_eof()?;
            return Ok(None);
        }

        let tok_result = self.raw_next_token();
        let tok = self.state.latch_err(tok_result)?;

        self.state.observe_token(&tok)?;
        Ok(Some(tok))
    }

    /// Decode exactly one value and verify that the whole buffer was
    /// consumed by it; trailing bytes are a fatal error.
    pub fn decode(mut self) -> Result<Value, Error> {
        let token = self
            .next_token()?
            .ok_or(StructureError::UnexpectedEof)?;
        let value = self.parse_value(token)?;

        if self.offset != self.source.len() {
            return Err(Error::TrailingBytes {
                offset: self.offset,
                trailing: self.source.len() - self.offset,
            });
        }

        Ok(value)
    }

    fn parse_value(&mut self, token: Token<'ser>) -> Result<Value, Error> {
        match token {
            Token::Num(literal) => Ok(Value::Integer(literal.parse()?)),
            Token::String(bytes) => Ok(Value::Bytes(bytes.to_vec())),
            Token::List => {
                let mut items = Vec::new();
                loop {
                    match self.next_token()? {
                        None => return Err(Error::from(StructureError::UnexpectedEof)),
                        Some(Token::End) => break,
                        Some(inner) => items.push(self.parse_value(inner)?),
                    }
                }
                Ok(Value::from(items))
            },
            Token::Dict => {
                let mut dict = Dict::new();
                loop {
                    // The state tracker has already rejected non-string keys
                    // and duplicates by the time a token comes back here.
                    let raw_key = match self.next_token()? {
                        None => return Err(Error::from(StructureError::UnexpectedEof)),
                        Some(Token::End) => break,
                        Some(Token::String(key)) => key,
                        Some(_) => {
                            return Err(Error::from(StructureError::invalid_state(
                                "Map keys must be strings",
                            )));
                        },
                    };
                    let key = self.materialize_key(raw_key)?;

                    let value_token = self
                        .next_token()?
                        .ok_or(StructureError::UnexpectedEof)?;
                    let value = self.parse_value(value_token)?;

                    dict.insert(key, value);
                }
                Ok(Value::from(dict))
            },
            Token::End => Err(Error::from(StructureError::invalid_state(
                "End not allowed at top level",
            ))),
        }
    }

    fn materialize_key(&self, raw: &'ser [u8]) -> Result<Key, Error> {
        if self.str_keys {
            let text = str::from_utf8(raw)?;
            Ok(Key::Text(text.to_owned()))
        } else {
            Ok(Key::Bytes(raw.to_vec()))
        }
    }
}
