//! Semantic actions
//!
//! [`Action`] wraps a node and turns its parts into a new value with a user
//! function, the way a grammar builds domain nodes while it parses:
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! let sum = (int() >> ch(b'+') >> int())
//!     .map(|(a, _, b): (ResultValue, ResultValue, ResultValue)| {
//!         ResultValue::int(a.as_int().unwrap_or(0) + b.as_int().unwrap_or(0))
//!     });
//! assert_eq!(run(&sum, "2 + 3"), Some(ResultValue::int(5)));
//! ```
//!
//! The function runs once, as soon as the wrapped node succeeds, so values
//! never wait in a child slot while other nodes run.

use super::error::{misuse, UsageError};
use super::parser::Parser;
use super::result::ResultValue;
use super::stream::Stream;
use super::undo::Slot;
use std::fmt;
use std::marker::PhantomData;

/// Conversion from the parts of a match into an action's argument
pub trait FromParts: Sized {
    /// Build the argument
    ///
    /// # Panics
    ///
    /// Panics with [`UsageError::Arity`] when the number of parts does not
    /// fit the argument type.
    fn from_parts(parts: Vec<ResultValue>) -> Self;
}

/// A single part is passed as is, several as a `Sequence`
impl FromParts for ResultValue {
    fn from_parts(mut parts: Vec<ResultValue>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            ResultValue::Sequence(parts)
        }
    }
}

impl FromParts for Vec<ResultValue> {
    fn from_parts(parts: Vec<ResultValue>) -> Self {
        parts
    }
}

macro_rules! impl_from_parts_tuple {
    ($n:expr; $($name:ident),+) => {
        impl FromParts for ($(replace_ident!($name ResultValue),)+) {
            #[track_caller]
            fn from_parts(parts: Vec<ResultValue>) -> Self {
                let found = parts.len();
                match <[ResultValue; $n]>::try_from(parts) {
                    Ok([$($name),+]) => ($($name,)+),
                    Err(_) => misuse(UsageError::Arity { expected: $n, found }),
                }
            }
        }
    };
}

macro_rules! replace_ident {
    ($_ignored:ident $ty:ty) => {
        $ty
    };
}

impl_from_parts_tuple!(2; a, b);
impl_from_parts_tuple!(3; a, b, c);
impl_from_parts_tuple!(4; a, b, c, d);
impl_from_parts_tuple!(5; a, b, c, d, e);

/// Node that transforms the value of a successful match
pub struct Action<P, F, T = ResultValue> {
    inner: P,
    f: F,
    value: Slot<ResultValue>,
    _marker: PhantomData<fn(T) -> ResultValue>,
}

impl<P, F, T> Action<P, F, T>
where
    P: Parser,
    F: Fn(T) -> ResultValue,
    T: FromParts,
{
    /// Wrap `inner` with the transform `f`
    pub fn new(inner: P, f: F) -> Self {
        Self {
            inner,
            f,
            value: Slot::new("action"),
            _marker: PhantomData,
        }
    }
}

impl<P, F, T> Parser for Action<P, F, T>
where
    P: Parser,
    F: Fn(T) -> ResultValue,
    T: FromParts,
{
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        if !self.inner.attempt(stream) {
            return false;
        }
        let mut parts = Vec::new();
        self.inner.take_parts(&mut parts);
        self.value.fill((self.f)(T::from_parts(parts)));
        true
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.value.clear();
        self.inner.unparse(stream);
    }

    fn result(&self) -> ResultValue {
        self.value.take()
    }

    fn is_settled(&self) -> bool {
        self.inner.is_settled()
    }
}

impl<P: Clone, F: Clone, T> Clone for Action<P, F, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            f: self.f.clone(),
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<P: fmt::Debug, F, T> fmt::Debug for Action<P, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("inner", &self.inner)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
