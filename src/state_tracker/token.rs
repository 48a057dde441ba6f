/// A raw bencode token
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Token<'a> {
    /// The beginning of a list
    List,
    /// The beginning of a dictionary
    Dict,
    /// A byte string; may not be UTF-8
    String(&'a [u8]),
    /// An integer literal, kept as validated decimal text; the value model
    /// materializes it as a big integer
    Num(&'a str),
    /// The end of a list or dictionary
    End,
}
