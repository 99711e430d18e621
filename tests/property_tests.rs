//! Property-based tests using proptest
//!
//! These tests check the backtracking contract across a wide range of
//! inputs: a failed attempt leaves the cursor where it was, an unparse after
//! a successful attempt restores it, and no undo entries survive either.

use proptest::prelude::*;
use rewind::prelude::*;

fn brackets() -> Deferred {
    recursive("brackets", |inner| ch(b'(') >> many(inner) >> ch(b')'))
}

fn is_balanced(input: &str) -> bool {
    let mut depth = 0i32;
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        depth += if c == '(' { 1 } else { -1 };
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Attempt at the start of `input`; on success unparse. Returns whether the
/// cursor and undo state were restored.
fn restores<P: Parser>(grammar: &P, input: &str) -> bool {
    let mut cursor = Cursor::new(input);
    if grammar.attempt(&mut cursor) {
        grammar.result();
        grammar.unparse(&mut cursor);
    }
    cursor.position() == 0 && grammar.is_settled()
}

// =============================================================================
// Restoration Properties
// =============================================================================

proptest! {
    /// Primitives restore on any input
    #[test]
    fn test_primitives_restore(input in "[ a-z0-9\"(){}:,+*-]{0,24}") {
        prop_assert!(restores(&int(), &input));
        prop_assert!(restores(&quoted(), &input));
        prop_assert!(restores(&lit("ab"), &input));
        prop_assert!(restores(&ch(b'('), &input));
        prop_assert!(restores(&end(), &input));
    }

    /// Composite grammars restore on any input
    #[test]
    fn test_combinators_restore(input in "[ ab0-9]{0,24}") {
        let grammar = many(lit("a") | int()) >> optional(lit("b")) >> many1(lit("ab"));
        prop_assert!(restores(&grammar, &input));
        let grammar = (int() >> int() >> lit("b")) | (int() >> lit("a"));
        prop_assert!(restores(&grammar, &input));
    }

    /// Recursive grammars restore on any input
    #[test]
    fn test_recursive_restores(input in "[() ]{0,32}") {
        let grammar = brackets() >> end();
        prop_assert!(restores(&grammar, &input));
    }
}

// =============================================================================
// Recognition Properties
// =============================================================================

proptest! {
    /// Bracket grammar accepts exactly the balanced, non-empty inputs
    #[test]
    fn test_brackets_match_balance(input in "[()]{1,32}") {
        let grammar = many1(brackets()) >> end();
        prop_assert_eq!(matches(&grammar, &input), is_balanced(&input));
    }

    /// Whitespace between tokens does not change the result
    #[test]
    fn test_whitespace_neutral(
        numbers in prop::collection::vec(0i64..1000, 1..8),
        gap in "[ \t\n]{0,3}",
    ) {
        let grammar = int() >> many(ch(b',') >> int()) >> end();
        let compact = numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",");
        let spaced = numbers
            .iter()
            .map(|n| format!("{}{}", gap, n))
            .collect::<Vec<_>>()
            .join(&format!("{},", gap));
        prop_assert_eq!(run(&grammar, &compact), run(&grammar, &spaced));
    }

    /// Integers parse to their value
    #[test]
    fn test_integer_value(n in 0i64..=i64::MAX) {
        prop_assert_eq!(run(&int(), n.to_string()), Some(ResultValue::int(n)));
    }

    /// Repetition yields one value per occurrence
    #[test]
    fn test_repeat_count(count in 0usize..20) {
        let input = "x ".repeat(count);
        let value = run(&(many(lit("x")) >> end()), &input).unwrap();
        let items = value.as_sequence().unwrap()[0].as_sequence().unwrap().len();
        prop_assert_eq!(items, count);
    }
}
