//! Primitive parsers
//!
//! Leaves of every grammar. Each one skips ignorable input through its
//! [`SkipPolicy`], tests its token against the unconsumed tail, and on
//! success records the consumed length so that `unparse` can give back
//! exactly that much. Scanning only peeks, so a failed leaf never has
//! anything to retreat except its own skip.

use super::parser::Parser;
use super::result::ResultValue;
use super::skip::{NoSkip, SkipPolicy, Whitespace};
use super::stream::Stream;
use super::undo::{Slot, UndoLog};

/// Shared bookkeeping of a leaf: skip policy, consumed lengths, value
#[derive(Debug, Clone)]
struct Leaf<K> {
    skip: K,
    consumed: UndoLog<usize>,
    value: Slot<ResultValue>,
}

impl<K: SkipPolicy> Leaf<K> {
    fn new(node: &'static str, skip: K) -> Self {
        Self {
            skip,
            consumed: UndoLog::new(node),
            value: Slot::new(node),
        }
    }

    /// Skip, then let `scan` decide how many bytes of the tail match
    fn attempt<S, F>(&self, stream: &mut S, scan: F) -> bool
    where
        S: Stream + ?Sized,
        F: FnOnce(&[u8]) -> Option<(usize, ResultValue)>,
    {
        self.skip.skip(stream);
        match scan(stream.rest()) {
            Some((len, value)) => {
                stream.advance(len);
                self.consumed.push(len);
                self.value.fill(value);
                true
            }
            None => {
                self.skip.unskip(stream);
                false
            }
        }
    }

    #[track_caller]
    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        let len = self.consumed.pop();
        self.value.clear();
        stream.retreat(len);
        self.skip.unskip(stream);
    }

    fn is_settled(&self) -> bool {
        self.consumed.is_empty() && self.skip.is_settled()
    }
}

/// Implements [`Parser`] for a leaf type with a `leaf` field and a `scan`
/// method
macro_rules! impl_leaf_parser {
    ($ty:ident) => {
        impl<K: SkipPolicy> Parser for $ty<K> {
            #[inline]
            fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
                self.leaf.attempt(stream, |rest| self.scan(rest))
            }

            #[inline]
            fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
                self.leaf.unparse(stream)
            }

            #[inline]
            fn result(&self) -> ResultValue {
                self.leaf.value.take()
            }

            #[inline]
            fn is_settled(&self) -> bool {
                self.leaf.is_settled()
            }
        }
    };
}

/// Match one specific byte
#[derive(Debug, Clone)]
pub struct Char<K = Whitespace> {
    ch: u8,
    leaf: Leaf<K>,
}

impl Char {
    /// Match `ch`, skipping leading whitespace
    pub fn new(ch: u8) -> Self {
        Self::with_skip(ch, Whitespace::new())
    }
}

impl<K: SkipPolicy> Char<K> {
    /// Match `ch` with an explicit skip policy
    pub fn with_skip(ch: u8, skip: K) -> Self {
        Self {
            ch,
            leaf: Leaf::new("char", skip),
        }
    }

    fn scan(&self, rest: &[u8]) -> Option<(usize, ResultValue)> {
        match rest.first() {
            Some(&b) if b == self.ch => Some((1, ResultValue::Text(char::from(b).to_string()))),
            _ => None,
        }
    }
}

impl_leaf_parser!(Char);

/// Match an exact byte sequence
#[derive(Debug, Clone)]
pub struct Literal<K = Whitespace> {
    pattern: String,
    leaf: Leaf<K>,
}

impl Literal {
    /// Match `pattern`, skipping leading whitespace
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_skip(pattern, Whitespace::new())
    }
}

impl<K: SkipPolicy> Literal<K> {
    /// Match `pattern` with an explicit skip policy
    pub fn with_skip(pattern: impl Into<String>, skip: K) -> Self {
        Self {
            pattern: pattern.into(),
            leaf: Leaf::new("literal", skip),
        }
    }

    /// The text this literal matches
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn scan(&self, rest: &[u8]) -> Option<(usize, ResultValue)> {
        let pattern = self.pattern.as_bytes();
        match rest.get(..pattern.len()) {
            Some(head) if head == pattern => {
                Some((pattern.len(), ResultValue::Text(self.pattern.clone())))
            }
            _ => None,
        }
    }
}

impl_leaf_parser!(Literal);

/// Match a maximal run of decimal digits as an `i64`
///
/// A run whose value does not fit in `i64` does not match.
#[derive(Debug, Clone)]
pub struct Integer<K = Whitespace> {
    leaf: Leaf<K>,
}

impl Integer {
    /// Match an integer, skipping leading whitespace
    pub fn new() -> Self {
        Self::with_skip(Whitespace::new())
    }
}

impl Default for Integer {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SkipPolicy> Integer<K> {
    /// Match an integer with an explicit skip policy
    pub fn with_skip(skip: K) -> Self {
        Self {
            leaf: Leaf::new("integer", skip),
        }
    }

    fn scan(&self, rest: &[u8]) -> Option<(usize, ResultValue)> {
        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let value = rest[..digits].iter().try_fold(0i64, |acc, &b| {
            acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
        })?;
        Some((digits, ResultValue::Integer(value)))
    }
}

impl_leaf_parser!(Integer);

/// Match a double-quoted string without escapes
///
/// The value is the text between the quotes. Input ending before the closing
/// quote does not match.
#[derive(Debug, Clone)]
pub struct Quoted<K = Whitespace> {
    leaf: Leaf<K>,
}

impl Quoted {
    /// Match a quoted string, skipping leading whitespace
    pub fn new() -> Self {
        Self::with_skip(Whitespace::new())
    }
}

impl Default for Quoted {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SkipPolicy> Quoted<K> {
    /// Match a quoted string with an explicit skip policy
    pub fn with_skip(skip: K) -> Self {
        Self {
            leaf: Leaf::new("quoted string", skip),
        }
    }

    fn scan(&self, rest: &[u8]) -> Option<(usize, ResultValue)> {
        let body = match rest.split_first() {
            Some((b'"', body)) => body,
            _ => return None,
        };
        // Unterminated: nothing was advanced, so nothing to give back
        let close = memchr::memchr(b'"', body)?;
        let text = String::from_utf8_lossy(&body[..close]).into_owned();
        Some((close + 2, ResultValue::Text(text)))
    }
}

impl_leaf_parser!(Quoted);

/// Match only at the end of input, consuming nothing
///
/// Contributes no part to an enclosing chain.
#[derive(Debug, Clone)]
pub struct End<K = Whitespace> {
    leaf: Leaf<K>,
}

impl End {
    /// Match the end of input, skipping trailing whitespace
    pub fn new() -> Self {
        Self::with_skip(Whitespace::new())
    }
}

impl Default for End {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SkipPolicy> End<K> {
    /// Match the end of input with an explicit skip policy
    pub fn with_skip(skip: K) -> Self {
        Self {
            leaf: Leaf::new("end of input", skip),
        }
    }
}

impl<K: SkipPolicy> Parser for End<K> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        self.leaf
            .attempt(stream, |rest| rest.is_empty().then_some((0, ResultValue::Empty)))
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.leaf.unparse(stream)
    }

    fn result(&self) -> ResultValue {
        self.leaf.value.take()
    }

    fn take_parts(&self, _parts: &mut Vec<ResultValue>) {
        self.leaf.value.take();
    }

    fn is_settled(&self) -> bool {
        self.leaf.is_settled()
    }
}

/// Always match, consuming nothing
///
/// Contributes no part to an enclosing chain.
#[derive(Debug, Clone)]
pub struct Epsilon {
    leaf: Leaf<NoSkip>,
}

impl Epsilon {
    /// Create an epsilon parser
    pub fn new() -> Self {
        Self {
            leaf: Leaf::new("epsilon", NoSkip),
        }
    }
}

impl Default for Epsilon {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Epsilon {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        self.leaf.attempt(stream, |_| Some((0, ResultValue::Empty)))
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.leaf.unparse(stream)
    }

    fn result(&self) -> ResultValue {
        self.leaf.value.take()
    }

    fn take_parts(&self, _parts: &mut Vec<ResultValue>) {
        self.leaf.value.take();
    }

    fn is_settled(&self) -> bool {
        self.leaf.is_settled()
    }
}
