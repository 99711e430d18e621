//! Grammar DSL
//!
//! Constructor functions, the [`ParserExt`] fluent methods and the `>>` /
//! `|` operators, which together read close to the grammar they build:
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! // list = "[" int ("," int)* "]"
//! let list = ch(b'[') >> int() >> many(ch(b',') >> int()) >> ch(b']');
//!
//! assert!(matches(&list, "[1, 2, 3]"));
//! assert!(!matches(&list, "[1, 2,]"));
//! ```

use super::action::{Action, FromParts};
use super::combinators::{Alternative, Chain, Choice, Optional, Repeat, Seq};
use super::dynamic::Dynamic;
use super::parser::Parser;
use super::primitives::{Char, End, Epsilon, Integer, Literal, Quoted};
use super::result::ResultValue;
use std::ops::{BitOr, Shr};

pub use super::deferred::recursive;

// ============================================================================
// Constructor functions
// ============================================================================

/// Match one byte
pub fn ch(ch: u8) -> Char {
    Char::new(ch)
}

/// Match a literal string
pub fn lit(pattern: &str) -> Literal {
    Literal::new(pattern)
}

/// Match a decimal integer
pub fn int() -> Integer {
    Integer::new()
}

/// Match a double-quoted string
pub fn quoted() -> Quoted {
    Quoted::new()
}

/// Match the end of input
pub fn end() -> End {
    End::new()
}

/// Match nothing, always
pub fn epsilon() -> Epsilon {
    Epsilon::new()
}

/// Match zero or more times
pub fn many<P: Parser>(p: P) -> Repeat<P> {
    Repeat::new(p)
}

/// One-or-more: `p >> many(p)`, with the first match prepended to the rest
pub type Many1<P> =
    Action<Chain<P, Repeat<P>>, fn(Vec<ResultValue>) -> ResultValue, Vec<ResultValue>>;

fn prepend_first(mut parts: Vec<ResultValue>) -> ResultValue {
    let rest = parts
        .pop()
        .and_then(ResultValue::into_sequence)
        .unwrap_or_default();
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(ResultValue::from_parts(parts));
    items.extend(rest);
    ResultValue::Sequence(items)
}

/// Match one or more times
pub fn many1<P: Parser + Clone>(p: P) -> Many1<P> {
    Action::new(
        Chain::new(p.clone(), Repeat::new(p)),
        prepend_first as fn(Vec<ResultValue>) -> ResultValue,
    )
}

/// Match optionally
pub fn optional<P: Parser>(p: P) -> Optional<P> {
    Optional::new(p)
}

/// Match the first of several nodes that matches
pub fn choice<I, P>(items: I) -> Choice<P>
where
    I: IntoIterator<Item = P>,
    P: Parser,
{
    Choice::new(items.into_iter().collect())
}

/// Match several nodes in order
pub fn seq<I, P>(items: I) -> Seq<P>
where
    I: IntoIterator<Item = P>,
    P: Parser,
{
    Seq::new(items.into_iter().collect())
}

/// Convert any node to a dynamic one
pub fn dynamic<P: Parser + 'static>(p: P) -> Dynamic {
    Dynamic::new(p)
}

// ============================================================================
// Extension trait
// ============================================================================

/// Fluent builder methods for every [`Parser`]
pub trait ParserExt: Parser + Sized {
    /// Sequence: `self >> other`
    fn then<B: Parser>(self, other: B) -> Chain<Self, B> {
        Chain::new(self, other)
    }

    /// Alternative: `self | other`
    fn or<B: Parser>(self, other: B) -> Alternative<Self, B> {
        Alternative::new(self, other)
    }

    /// Match zero or more times
    fn many(self) -> Repeat<Self> {
        Repeat::new(self)
    }

    /// Match one or more times
    fn many1(self) -> Many1<Self>
    where
        Self: Clone,
    {
        many1(self)
    }

    /// Match optionally
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Transform the parts of a match
    ///
    /// The argument type selects how parts are passed, see [`FromParts`].
    fn map<T, F>(self, f: F) -> Action<Self, F, T>
    where
        T: FromParts,
        F: Fn(T) -> ResultValue,
    {
        Action::new(self, f)
    }

    /// Erase the type of this node
    fn boxed(self) -> Dynamic
    where
        Self: 'static,
    {
        Dynamic::new(self)
    }
}

impl<P: Parser> ParserExt for P {}

// ============================================================================
// Operator overloading (>> for chain, | for alternative)
// ============================================================================

macro_rules! impl_operators {
    ($([$($generics:tt)*] $ty:ty;)*) => {
        $(
            impl<$($generics)* Rhs: Parser> Shr<Rhs> for $ty
            where
                $ty: Parser,
            {
                type Output = Chain<$ty, Rhs>;

                fn shr(self, rhs: Rhs) -> Self::Output {
                    Chain::new(self, rhs)
                }
            }

            impl<$($generics)* Rhs: Parser> BitOr<Rhs> for $ty
            where
                $ty: Parser,
            {
                type Output = Alternative<$ty, Rhs>;

                fn bitor(self, rhs: Rhs) -> Self::Output {
                    Alternative::new(self, rhs)
                }
            }
        )*
    };
}

impl_operators! {
    [K,] Char<K>;
    [K,] Literal<K>;
    [K,] Integer<K>;
    [K,] Quoted<K>;
    [K,] End<K>;
    [] Epsilon;
    [A, B,] Chain<A, B>;
    [A, B,] Alternative<A, B>;
    [P,] Seq<P>;
    [P,] Choice<P>;
    [P,] Repeat<P>;
    [P,] Optional<P>;
    [P, F, T,] Action<P, F, T>;
    [] super::deferred::Deferred;
    [] Dynamic;
}
