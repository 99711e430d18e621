//! Rewind - Backtracking Parser Combinators
//!
//! A grammar is built from small nodes that each know how to match at a
//! cursor and how to undo their last match. Alternatives and repetitions
//! back out of wrong guesses by unwinding exactly what was consumed, and a
//! successful parse produces a typed result tree along the way.
//!
//! It provides:
//! - Primitive nodes for chars, literals, integers, quoted strings and end
//!   of input, with pluggable whitespace skipping
//! - Sequencing, first-match alternation, repetition and optional nodes
//! - Semantic actions that build domain values while parsing
//! - Mutually recursive grammars through deferred nodes
//! - Result trees with JSON export and pretty printing
//!
//! ## Quick Start
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! // pair = "(" int "," int ")"
//! let pair = ch(b'(') >> int() >> ch(b',') >> int() >> ch(b')') >> end();
//!
//! let value = run(&pair, "( 1, 2 )").unwrap();
//! assert_eq!(value.to_string(), "([String:(],[Int:1],[String:,],[Int:2],[String:)])");
//! ```
//!
//! ## Recursive Grammars
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! // nested = "[" nested* "]"
//! let nested = recursive("nested", |nested| ch(b'[') >> many(nested) >> ch(b']'));
//! assert!(matches(&(nested >> end()), "[ [] [[]] ]"));
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]

// Prelude module for convenient imports
pub mod prelude;

// Engine core
pub mod engine;

/// Re-export commonly used types for convenience
pub use engine::{
    // Debug tools
    debug::TreePrinter,
    // Grammar DSL
    dsl::{
        ch, choice, dynamic, end, epsilon, int, lit, many, many1, optional, quoted, recursive,
        seq, ParserExt,
    },
    // Errors
    error::{RunError, UsageError},
    matches,
    run,
    try_run,
    CustomNode,
    Cursor,
    Deferred,
    NodeConfig,
    Parser,
    ResultValue,
    RunConfig,
    Stream,
};
