//! Backtracking combinator engine
//!
//! Grammars are values built from small nodes. Every node can try to match
//! at a cursor, and can later undo its most recent match exactly, so a
//! combinator higher up can back out of a choice that turned out wrong.
//!
//! # Module Organization
//!
//! ## Input
//! - [`stream`] - Cursor and the [`Stream`] capability
//! - [`skip`] - Whitespace skipping policies
//!
//! ## Nodes
//! - [`primitives`] - Literal chars and strings, integers, quoted strings,
//!   end of input
//! - [`combinators`] - Sequence, alternative, repetition, optional
//! - [`action`] - Semantic actions
//! - [`deferred`] - Recursion through late-bound nodes
//! - [`dynamic`] - Type erasure
//!
//! ## Running
//! - [`parser`] - The [`Parser`] trait and [`run`]
//! - [`dsl`] - Constructors and operators
//! - [`result`] - Result trees
//! - [`debug`] - Result tree printing
//! - [`config`] / [`error`] - Configuration and misuse reporting

// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// ============================================================================
// Module Declarations
// ============================================================================

pub mod action;
pub mod combinators;
pub mod config;
pub mod debug;
pub mod deferred;
pub mod dsl;
pub mod dynamic;
pub mod error;
pub mod parser;
pub mod primitives;
pub mod result;
pub mod skip;
pub mod stream;
pub mod undo;

// ============================================================================
// Core Types
// ============================================================================

pub use parser::{matches, run, try_run, DynParser, Parser};
pub use result::{CustomNode, ResultValue};
pub use stream::{Cursor, Stream, StreamAdapter};

// ============================================================================
// Nodes
// ============================================================================

pub use action::{Action, FromParts};
pub use combinators::{Alternative, Chain, Choice, Optional, Repeat, Seq};
pub use deferred::{recursive, Deferred};
pub use dynamic::Dynamic;
pub use primitives::{Char, End, Epsilon, Integer, Literal, Quoted};
pub use skip::{NoSkip, SkipPolicy, Whitespace};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use config::{NodeConfig, RunConfig, DEFAULT_MAX_INPUT_SIZE};
pub use error::{RunError, UsageError};

// ============================================================================
// Debug Tools
// ============================================================================

pub use debug::TreePrinter;
