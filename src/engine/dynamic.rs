//! Type-erased nodes
//!
//! Every combinator is generic over its children, so a large grammar has a
//! deeply nested type. [`Dynamic`] boxes a node behind [`DynParser`] to cut
//! the nesting, and lets differently shaped grammars share one type, e.g. as
//! the branches of a [`Choice`](super::combinators::Choice).

use super::parser::{DynParser, Parser};
use super::result::ResultValue;
use super::stream::{Stream, StreamAdapter};
use std::fmt;

/// A boxed, type-erased node
///
/// Transparent: it contributes exactly the parts of the node it wraps.
pub struct Dynamic(Box<dyn DynParser>);

impl Dynamic {
    /// Erase the type of a node
    pub fn new<P: Parser + 'static>(parser: P) -> Self {
        Dynamic(Box::new(parser))
    }
}

impl Parser for Dynamic {
    #[inline]
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        self.0.attempt_dyn(&mut StreamAdapter::new(stream))
    }

    #[inline]
    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.0.unparse_dyn(&mut StreamAdapter::new(stream))
    }

    #[inline]
    fn result(&self) -> ResultValue {
        self.0.result_dyn()
    }

    #[inline]
    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        self.0.take_parts_dyn(parts)
    }

    #[inline]
    fn is_settled(&self) -> bool {
        self.0.is_settled_dyn()
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dynamic")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::Choice;
    use crate::engine::dsl::{dynamic, int, lit, quoted, ParserExt};
    use crate::engine::stream::Cursor;

    #[test]
    fn test_choice_of_mixed_nodes() {
        let grammar = Choice::new(vec![
            dynamic(int()),
            dynamic(quoted()),
            dynamic(lit("(") >> int() >> lit(")")),
        ]);
        let mut cursor = Cursor::new(" \"x\"");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result(), ResultValue::text("x"));
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_keeps_parts_flat() {
        let grammar = (int() >> int()).boxed() >> int();
        let mut cursor = Cursor::new("1 2 3");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([Int:1],[Int:2],[Int:3])");
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
    }
}
