use crate::state_tracker::{StructureError, Token};

/// The state of one open level of the structure
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
enum State<S: AsRef<[u8]>, E> {
    /// An inner list. Allows any token
    Seq,
    /// Inside a map, expecting a key. Contains the last key read, so sorting can be validated
    MapKey(Option<S>),
    /// Inside a map, expecting a value. Contains the last key read, so sorting can be validated
    MapValue(S),
    /// Received an error while processing the structure
    Failed(E),
}

/// Validates that a token stream forms a canonical bencode structure.
///
/// Both directions of the codec feed their tokens through a tracker, so the
/// canonicalization rules (key ordering, key uniqueness, non-empty keys,
/// matched terminators, nesting depth) are enforced by one piece of code.
#[derive(Debug)]
pub(crate) struct StateTracker<S: AsRef<[u8]>, E = StructureError> {
    state: Vec<State<S, E>>,
    max_depth: usize,
}

impl<S: AsRef<[u8]>, E> Default for StateTracker<S, E> {
    fn default() -> Self {
        StateTracker {
            state: Vec::new(),
            max_depth: 2048,
        }
    }
}

impl<S, E> StateTracker<S, E>
where
    S: AsRef<[u8]>,
    E: From<StructureError> + Clone,
{
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn set_max_depth(&mut self, new_max_depth: usize) {
        self.max_depth = new_max_depth
    }

    /// Observe that an EOF was seen. This function is idempotent.
    pub fn observe_eof(&mut self) -> Result<(), E> {
        self.check_error()?;

        if self.state.is_empty() {
            Ok(())
        } else {
            self.latch_err(Err(E::from(StructureError::UnexpectedEof)))
        }
    }

    pub fn observe_token<'a>(&mut self, token: &Token<'a>) -> Result<(), E>
    where
        S: From<&'a [u8]>,
    {
        use self::{State::*, Token::*};

        match (self.state.pop(), *token) {
            (None, End) => {
                return self.latch_err(Err(E::from(StructureError::invalid_state(
                    "End not allowed at top level",
                ))));
            },
            (Some(Seq), End) => {},
            (Some(MapKey(_)), End) => {},
            (Some(MapKey(last_key)), String(label)) => {
                if label.is_empty() {
                    return self.latch_err(Err(E::from(StructureError::EmptyKey)));
                }
                if let Some(last_key) = last_key {
                    if last_key.as_ref() == label {
                        return self.latch_err(Err(E::from(StructureError::DuplicateKeys)));
                    }
                    if last_key.as_ref() > label {
                        return self.latch_err(Err(E::from(StructureError::UnsortedKeys)));
                    }
                }
                self.state.push(MapValue(S::from(label)));
            },
            (Some(oldstate @ MapKey(_)), _tok) => {
                self.state.push(oldstate);
                return self.latch_err(Err(E::from(StructureError::invalid_state(
                    "Map keys must be strings",
                ))));
            },
            (Some(MapValue(label)), List) => {
                self.state.push(MapKey(Some(label)));
                return self.open_level(Seq);
            },
            (Some(MapValue(label)), Dict) => {
                self.state.push(MapKey(Some(label)));
                return self.open_level(MapKey(None));
            },
            (Some(oldstate @ MapValue(_)), End) => {
                self.state.push(oldstate);
                return self.latch_err(Err(E::from(StructureError::invalid_state(
                    "Missing map value",
                ))));
            },
            (Some(MapValue(label)), _) => {
                self.state.push(MapKey(Some(label)));
            },
            (oldstate, List) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
                return self.open_level(Seq);
            },
            (oldstate, Dict) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
                return self.open_level(MapKey(None));
            },
            (oldstate, _) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
            },
        }
        Ok(())
    }

    /// Push the entry state of a freshly opened container, enforcing the depth limit.
    fn open_level(&mut self, level: State<S, E>) -> Result<(), E> {
        if self.state.len() >= self.max_depth {
            return self.latch_err(Err(E::from(StructureError::NestingTooDeep)));
        }
        self.state.push(level);
        Ok(())
    }

    pub fn latch_err<T>(&mut self, result: Result<T, E>) -> Result<T, E> {
        self.check_error()?;
        if let Err(ref err) = result {
            self.state.push(State::Failed(err.clone()))
        }
        result
    }

    pub fn check_error(&self) -> Result<(), E> {
        if let Some(State::Failed(error)) = self.state.last() {
            Err(error.clone())
        } else {
            Ok(())
        }
    }
}
