//! The parser capability and top-level entry points
//!
//! Every grammar node implements [`Parser`]:
//!
//! - [`attempt`](Parser::attempt) tries to match at the cursor. On failure
//!   the cursor and all internal state are exactly as before the call.
//! - [`unparse`](Parser::unparse) undoes the most recent successful match
//!   that has not been undone yet.
//! - [`result`](Parser::result) moves out the value of that match. It may be
//!   called once, right after a successful `attempt`.
//!
//! [`DynParser`] is the object-safe mirror of the same contract, over
//! `&mut dyn Stream`, used wherever a node has to be type-erased.

use super::config::RunConfig;
use super::error::{RunError, UsageError};
use super::result::ResultValue;
use super::stream::{Cursor, Stream};

/// A grammar node
pub trait Parser {
    /// Try to match at the cursor
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool;

    /// Undo the most recent successful match
    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S);

    /// Take the value of the most recent successful match
    fn result(&self) -> ResultValue;

    /// Take the value as the parts it contributes to an enclosing chain
    ///
    /// Most nodes contribute their single result. Chains contribute their
    /// parts individually, which flattens `a >> b >> c` into three parts.
    /// Nodes with no value contribute nothing.
    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        parts.push(self.result());
    }

    /// Whether no successful match is waiting to be undone
    fn is_settled(&self) -> bool;
}

impl<P: Parser + ?Sized> Parser for &P {
    #[inline]
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        (**self).attempt(stream)
    }

    #[inline]
    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        (**self).unparse(stream)
    }

    #[inline]
    fn result(&self) -> ResultValue {
        (**self).result()
    }

    #[inline]
    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        (**self).take_parts(parts)
    }

    #[inline]
    fn is_settled(&self) -> bool {
        (**self).is_settled()
    }
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    #[inline]
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        (**self).attempt(stream)
    }

    #[inline]
    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        (**self).unparse(stream)
    }

    #[inline]
    fn result(&self) -> ResultValue {
        (**self).result()
    }

    #[inline]
    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        (**self).take_parts(parts)
    }

    #[inline]
    fn is_settled(&self) -> bool {
        (**self).is_settled()
    }
}

/// Object-safe form of [`Parser`]
pub trait DynParser {
    /// See [`Parser::attempt`]
    fn attempt_dyn(&self, stream: &mut dyn Stream) -> bool;

    /// See [`Parser::unparse`]
    fn unparse_dyn(&self, stream: &mut dyn Stream);

    /// See [`Parser::result`]
    fn result_dyn(&self) -> ResultValue;

    /// See [`Parser::take_parts`]
    fn take_parts_dyn(&self, parts: &mut Vec<ResultValue>);

    /// See [`Parser::is_settled`]
    fn is_settled_dyn(&self) -> bool;
}

impl<P: Parser> DynParser for P {
    fn attempt_dyn(&self, stream: &mut dyn Stream) -> bool {
        self.attempt(stream)
    }

    fn unparse_dyn(&self, stream: &mut dyn Stream) {
        self.unparse(stream)
    }

    fn result_dyn(&self) -> ResultValue {
        self.result()
    }

    fn take_parts_dyn(&self, parts: &mut Vec<ResultValue>) {
        self.take_parts(parts)
    }

    fn is_settled_dyn(&self) -> bool {
        self.is_settled()
    }
}

/// Run a grammar over the whole input
///
/// Unlike [`try_run`] with the default [`RunConfig`], there is no input size
/// limit.
///
/// Matching a prefix is success; add [`end`](super::dsl::end) to the grammar
/// when the whole input must be consumed. After success the grammar is
/// unwound again, so its undo logs are empty and it can be run on the next
/// input.
///
/// # Panics
///
/// Panics if the grammar still holds undo entries from an attempt that was
/// never unwound.
///
/// # Example
///
/// ```rust
/// use rewind::prelude::*;
///
/// let greeting = lit("hello") >> lit("world");
/// let value = run(&greeting, "hello  world").unwrap();
/// assert_eq!(value.to_string(), "([String:hello],[String:world])");
/// assert!(run(&greeting, "hello there").is_none());
/// ```
pub fn run<P: Parser + ?Sized>(parser: &P, input: impl AsRef<[u8]>) -> Option<ResultValue> {
    let config = RunConfig::default().with_max_input_size(usize::MAX);
    match try_run(parser, input, &config) {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

/// Run a grammar with explicit limits
pub fn try_run<P: Parser + ?Sized>(
    parser: &P,
    input: impl AsRef<[u8]>,
    config: &RunConfig,
) -> Result<Option<ResultValue>, RunError> {
    let input = input.as_ref();
    if input.len() > config.max_input_size {
        return Err(RunError::InputTooLarge {
            input_size: input.len(),
            max_size: config.max_input_size,
        });
    }
    if config.check_settled && !parser.is_settled() {
        return Err(UsageError::Unsettled.into());
    }

    log_debug!("Starting parse: input_len={}", input.len());

    let mut cursor = Cursor::from_bytes(input);
    if !parser.attempt(&mut cursor) {
        debug_assert_eq!(cursor.position(), 0);
        log_debug!("Parse failed");
        return Ok(None);
    }

    let value = parser.result();
    log_debug!("Parse successful: consumed {} bytes", cursor.position());
    parser.unparse(&mut cursor);
    debug_assert_eq!(cursor.position(), 0);
    Ok(Some(value))
}

/// Whether the grammar matches a prefix of the input
pub fn matches<P: Parser + ?Sized>(parser: &P, input: impl AsRef<[u8]>) -> bool {
    run(parser, input).is_some()
}
