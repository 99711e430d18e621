//! Combinators
//!
//! Nodes that compose other nodes. Each one keeps exactly the undo state it
//! needs to reverse its own decisions:
//!
//! | Node | Undo entry | Result |
//! |------|------------|--------|
//! | [`Chain`] | none, children keep their own | flattened parts |
//! | [`Seq`] | none, children keep their own | flattened parts |
//! | [`Alternative`] | which branch matched | the branch's result |
//! | [`Choice`] | index of the matching branch | the branch's result |
//! | [`Repeat`] | iteration count | one item per iteration |
//! | [`Optional`] | whether the inner node matched | inner result or `Empty` |
//!
//! A child's value is taken as soon as the child succeeds. A deferred node
//! can re-enter this very node while the rest of the composition runs, and
//! that inner run must find the child's slot empty.

use super::action::FromParts;
use super::parser::Parser;
use super::result::ResultValue;
use super::stream::Stream;
use super::undo::{Slot, UndoLog};

/// Match `first` then `second`
///
/// Built by `a >> b` or [`then`](super::dsl::ParserExt::then). Parts flatten
/// through nested chains, so `a >> b >> c` contributes three parts.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
    parts: Slot<Vec<ResultValue>>,
}

impl<A: Parser, B: Parser> Chain<A, B> {
    /// Create a chain
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            parts: Slot::new("chain"),
        }
    }
}

impl<A: Parser, B: Parser> Parser for Chain<A, B> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        if !self.first.attempt(stream) {
            return false;
        }
        let mut parts = Vec::new();
        self.first.take_parts(&mut parts);
        if !self.second.attempt(stream) {
            self.first.unparse(stream);
            return false;
        }
        self.second.take_parts(&mut parts);
        self.parts.fill(parts);
        true
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.parts.clear();
        self.second.unparse(stream);
        self.first.unparse(stream);
    }

    fn result(&self) -> ResultValue {
        ResultValue::Sequence(self.parts.take())
    }

    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        parts.extend(self.parts.take());
    }

    fn is_settled(&self) -> bool {
        self.first.is_settled() && self.second.is_settled()
    }
}

/// Match every node of a list in order
///
/// The N-ary form of [`Chain`] for lists built at runtime.
#[derive(Debug, Clone)]
pub struct Seq<P> {
    items: Vec<P>,
    parts: Slot<Vec<ResultValue>>,
}

impl<P: Parser> Seq<P> {
    /// Create a sequence
    pub fn new(items: Vec<P>) -> Self {
        Self {
            items,
            parts: Slot::new("sequence"),
        }
    }
}

impl<P: Parser> Parser for Seq<P> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        let mut parts = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if !item.attempt(stream) {
                for done in self.items[..i].iter().rev() {
                    done.unparse(stream);
                }
                return false;
            }
            item.take_parts(&mut parts);
        }
        self.parts.fill(parts);
        true
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.parts.clear();
        for item in self.items.iter().rev() {
            item.unparse(stream);
        }
    }

    fn result(&self) -> ResultValue {
        ResultValue::Sequence(self.parts.take())
    }

    fn take_parts(&self, parts: &mut Vec<ResultValue>) {
        parts.extend(self.parts.take());
    }

    fn is_settled(&self) -> bool {
        self.items.iter().all(|item| item.is_settled())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    First,
    Second,
}

/// Match `first`, or `second` if `first` fails
///
/// Built by `a | b` or [`or`](super::dsl::ParserExt::or). The first branch
/// that matches wins; there is no longest-match search.
#[derive(Debug, Clone)]
pub struct Alternative<A, B> {
    first: A,
    second: B,
    chosen: UndoLog<Branch>,
    value: Slot<ResultValue>,
}

impl<A: Parser, B: Parser> Alternative<A, B> {
    /// Create an alternative
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            chosen: UndoLog::new("alternative"),
            value: Slot::new("alternative"),
        }
    }
}

impl<A: Parser, B: Parser> Parser for Alternative<A, B> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        if self.first.attempt(stream) {
            self.value.fill(self.first.result());
            self.chosen.push(Branch::First);
            true
        } else if self.second.attempt(stream) {
            self.value.fill(self.second.result());
            self.chosen.push(Branch::Second);
            true
        } else {
            false
        }
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.value.clear();
        match self.chosen.pop() {
            Branch::First => self.first.unparse(stream),
            Branch::Second => self.second.unparse(stream),
        }
    }

    fn result(&self) -> ResultValue {
        self.value.take()
    }

    fn is_settled(&self) -> bool {
        self.chosen.is_empty() && self.first.is_settled() && self.second.is_settled()
    }
}

/// Match the first node of a list that matches
///
/// The N-ary form of [`Alternative`]. Branches share one type, so lists of
/// differently shaped grammars are usually built from
/// [`Dynamic`](super::dynamic::Dynamic) nodes.
#[derive(Debug, Clone)]
pub struct Choice<P> {
    branches: Vec<P>,
    chosen: UndoLog<usize>,
    value: Slot<ResultValue>,
}

impl<P: Parser> Choice<P> {
    /// Create a choice
    pub fn new(branches: Vec<P>) -> Self {
        Self {
            branches,
            chosen: UndoLog::new("choice"),
            value: Slot::new("choice"),
        }
    }
}

impl<P: Parser> Parser for Choice<P> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        for (i, branch) in self.branches.iter().enumerate() {
            if branch.attempt(stream) {
                self.value.fill(branch.result());
                self.chosen.push(i);
                return true;
            }
        }
        false
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.value.clear();
        let i = self.chosen.pop();
        self.branches[i].unparse(stream);
    }

    fn result(&self) -> ResultValue {
        self.value.take()
    }

    fn is_settled(&self) -> bool {
        self.chosen.is_empty() && self.branches.iter().all(|item| item.is_settled())
    }
}

/// Match a node zero or more times, as often as possible
///
/// Always succeeds. An iteration that matches without consuming input is
/// undone and ends the loop, so nullable bodies terminate. Each iteration's
/// parts become one item, the same way an action with a single
/// [`ResultValue`] argument receives them.
#[derive(Debug, Clone)]
pub struct Repeat<P> {
    inner: P,
    counts: UndoLog<usize>,
    items: Slot<Vec<ResultValue>>,
}

impl<P: Parser> Repeat<P> {
    /// Create a repetition
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            counts: UndoLog::new("repeat"),
            items: Slot::new("repeat"),
        }
    }
}

impl<P: Parser> Parser for Repeat<P> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        let mut items = Vec::new();
        loop {
            let start = stream.position();
            if !self.inner.attempt(stream) {
                break;
            }
            let mut parts = Vec::new();
            self.inner.take_parts(&mut parts);
            if stream.position() == start {
                self.inner.unparse(stream);
                break;
            }
            items.push(ResultValue::from_parts(parts));
        }
        self.counts.push(items.len());
        self.items.fill(items);
        true
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.items.clear();
        for _ in 0..self.counts.pop() {
            self.inner.unparse(stream);
        }
    }

    fn result(&self) -> ResultValue {
        ResultValue::Sequence(self.items.take())
    }

    fn is_settled(&self) -> bool {
        self.counts.is_empty() && self.inner.is_settled()
    }
}

/// Match a node or nothing
#[derive(Debug, Clone)]
pub struct Optional<P> {
    inner: P,
    matched: UndoLog<bool>,
    value: Slot<ResultValue>,
}

impl<P: Parser> Optional<P> {
    /// Create an optional node
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            matched: UndoLog::new("optional"),
            value: Slot::new("optional"),
        }
    }
}

impl<P: Parser> Parser for Optional<P> {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        let matched = self.inner.attempt(stream);
        let value = if matched {
            self.inner.result()
        } else {
            ResultValue::Empty
        };
        self.value.fill(value);
        self.matched.push(matched);
        true
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.value.clear();
        if self.matched.pop() {
            self.inner.unparse(stream);
        }
    }

    fn result(&self) -> ResultValue {
        self.value.take()
    }

    fn is_settled(&self) -> bool {
        self.matched.is_empty() && self.inner.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dsl::{ch, end, epsilon, int, lit, optional, ParserExt};
    use crate::engine::stream::Cursor;

    #[test]
    fn test_chain_flattens_parts() {
        let grammar = lit("a") >> lit("b") >> lit("c");
        let mut cursor = Cursor::new("abc");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([String:a],[String:b],[String:c])");
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_chain_failure_restores_first() {
        let grammar = lit("ab") >> lit("cd");
        let mut cursor = Cursor::new("  ab  ce");
        assert!(!grammar.attempt(&mut cursor));
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_chain_unparse_is_right_to_left() {
        let grammar = int() >> int();
        let mut cursor = Cursor::new("1 22");
        assert!(grammar.attempt(&mut cursor));
        grammar.result();
        assert_eq!(cursor.position(), 4);
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_chain_skips_valueless_parts() {
        let grammar = epsilon() >> int() >> end();
        let mut cursor = Cursor::new("5");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([Int:5])");
        grammar.unparse(&mut cursor);
    }

    #[test]
    fn test_seq() {
        let grammar = Seq::new(vec![lit("x"), lit("y"), lit("z")]);
        let mut cursor = Cursor::new("x y z");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([String:x],[String:y],[String:z])");
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new("x y q");
        assert!(!grammar.attempt(&mut cursor));
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_alternative_first_match_wins() {
        let grammar = lit("ab") | lit("abc");
        let mut cursor = Cursor::new("abc");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result(), ResultValue::text("ab"));
        assert_eq!(cursor.position(), 2);
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_alternative_second_branch() {
        let grammar = int() | lit("x");
        let mut cursor = Cursor::new(" x");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result(), ResultValue::text("x"));
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new("y");
        assert!(!grammar.attempt(&mut cursor));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_choice_records_index() {
        let grammar = Choice::new(vec![lit("a"), lit("b"), lit("c")]);
        let mut cursor = Cursor::new("c");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result(), ResultValue::text("c"));
        assert!(!grammar.is_settled());
        grammar.unparse(&mut cursor);
        assert!(grammar.is_settled());

        assert!(!grammar.attempt(&mut Cursor::new("d")));
    }

    #[test]
    fn test_repeat_counts() {
        let grammar = lit("ab").many();
        for (input, count) in [("", 0), ("ab", 1), ("ab ab abx", 3)] {
            let mut cursor = Cursor::new(input);
            assert!(grammar.attempt(&mut cursor));
            let items = grammar.result().into_sequence().unwrap();
            assert_eq!(items.len(), count, "input {:?}", input);
            grammar.unparse(&mut cursor);
            assert_eq!(cursor.position(), 0);
            assert!(grammar.is_settled());
        }
    }

    #[test]
    fn test_repeat_items_from_parts() {
        let grammar = (int() >> lit(";")).many();
        let mut cursor = Cursor::new("1; 2;");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(
            grammar.result().to_string(),
            "(([Int:1],[String:;]),([Int:2],[String:;]))"
        );
        grammar.unparse(&mut cursor);

        let grammar = (int() >> end()).many();
        let mut cursor = Cursor::new("7");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([Int:7])");
        grammar.unparse(&mut cursor);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_repeat_stops_on_no_progress() {
        let grammar = optional(lit("a")).many();
        let mut cursor = Cursor::new("aab");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(cursor.position(), 2);
        assert_eq!(grammar.result().into_sequence().unwrap().len(), 2);
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_repeat_then_more() {
        let grammar = ch(b'a').many() >> ch(b'b');
        let mut cursor = Cursor::new("aaab");
        assert!(grammar.attempt(&mut cursor));
        let parts = grammar.result().into_sequence().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_sequence().map(|s| s.len()), Some(3));
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_optional() {
        let grammar = optional(ch(b'-')) >> int();
        let mut cursor = Cursor::new("-4");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([String:-],[Int:4])");
        grammar.unparse(&mut cursor);

        let mut cursor = Cursor::new("4");
        assert!(grammar.attempt(&mut cursor));
        assert_eq!(grammar.result().to_string(), "([],[Int:4])");
        grammar.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(grammar.is_settled());
    }

    #[test]
    fn test_clone_has_fresh_state() {
        let grammar = lit("a") | lit("b");
        let mut cursor = Cursor::new("a");
        assert!(grammar.attempt(&mut cursor));
        let copy = grammar.clone();
        assert!(copy.is_settled());
        assert!(!grammar.is_settled());
        grammar.result();
        grammar.unparse(&mut cursor);
    }

    #[test]
    #[should_panic(expected = "unparse on alternative with an empty undo log")]
    fn test_alternative_unparse_without_attempt_panics() {
        let grammar = lit("a") | lit("b");
        grammar.unparse(&mut Cursor::new("a"));
    }
}
